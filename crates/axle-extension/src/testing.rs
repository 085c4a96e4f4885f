//! Testing harness for Extension implementations.
//!
//! Provides a minimal environment for exercising an extension's hooks and
//! listener filters without constructing an event hub. Delivery mimics the
//! container contract: readiness gates delivery, and delivered events are
//! recorded for assertions.
//!
//! # Example
//!
//! ```
//! use axle_extension::testing::ExtensionTestHarness;
//! use axle_extension::{Extension, ExtensionError};
//! use axle_event::Event;
//!
//! struct Gated {
//!     open: bool,
//! }
//!
//! impl Extension for Gated {
//!     fn type_name(&self) -> &str {
//!         "com.example.module.gated"
//!     }
//!     fn version(&self) -> &str {
//!         "1.0.0"
//!     }
//!     fn ready_for_event(&self, _event: &Event) -> bool {
//!         self.open
//!     }
//! }
//!
//! let mut harness = ExtensionTestHarness::new(Gated { open: false });
//! harness.register().unwrap();
//!
//! // Not ready: the event is refused, mimicking queue retention.
//! assert!(!harness.deliver(&Event::new("e", "t", "s")));
//! assert!(harness.delivered().is_empty());
//!
//! harness.extension_mut().open = true;
//! assert!(harness.deliver(&Event::new("e", "t", "s")));
//! assert_eq!(harness.delivered().len(), 1);
//! ```

use crate::Extension;
use crate::ExtensionError;
use axle_event::Event;

/// Test harness driving one extension instance through its lifecycle.
pub struct ExtensionTestHarness<E: Extension> {
    extension: E,
    delivered: Vec<Event>,
    registered: bool,
}

impl<E: Extension> ExtensionTestHarness<E> {
    /// Creates a harness around the given extension.
    pub fn new(extension: E) -> Self {
        Self {
            extension,
            delivered: Vec::new(),
            registered: false,
        }
    }

    /// Returns a reference to the extension under test.
    pub fn extension(&self) -> &E {
        &self.extension
    }

    /// Returns a mutable reference to the extension under test.
    pub fn extension_mut(&mut self) -> &mut E {
        &mut self.extension
    }

    /// Runs the `on_registered` hook.
    ///
    /// # Errors
    ///
    /// Returns the extension's registration error, if any.
    pub fn register(&mut self) -> Result<(), ExtensionError> {
        self.extension.on_registered()?;
        self.registered = true;
        Ok(())
    }

    /// Runs the `on_unregistered` hook.
    pub fn unregister(&mut self) {
        self.extension.on_unregistered();
        self.registered = false;
    }

    /// Offers an event to the extension, mimicking the container handler.
    ///
    /// Returns `true` if the extension was ready and the event was recorded,
    /// `false` if the extension refused it (a container would retain the
    /// event at the head of its queue).
    pub fn deliver(&mut self, event: &Event) -> bool {
        if !self.extension.ready_for_event(event) {
            return false;
        }
        self.delivered.push(event.clone());
        true
    }

    /// Events accepted so far, in delivery order.
    pub fn delivered(&self) -> &[Event] {
        &self.delivered
    }

    /// Whether `register` has completed without a later `unregister`.
    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flaky {
        fail_registration: bool,
        unregistered: usize,
    }

    impl Extension for Flaky {
        fn type_name(&self) -> &str {
            "com.example.module.flaky"
        }

        fn version(&self) -> &str {
            "0.0.1"
        }

        fn on_registered(&mut self) -> Result<(), ExtensionError> {
            if self.fail_registration {
                Err(ExtensionError::RegistrationFailed("flaky".into()))
            } else {
                Ok(())
            }
        }

        fn on_unregistered(&mut self) {
            self.unregistered += 1;
        }
    }

    #[test]
    fn register_reports_hook_failure() {
        let mut harness = ExtensionTestHarness::new(Flaky {
            fail_registration: true,
            unregistered: 0,
        });

        assert!(harness.register().is_err());
        assert!(!harness.is_registered());
    }

    #[test]
    fn lifecycle_round_trip() {
        let mut harness = ExtensionTestHarness::new(Flaky {
            fail_registration: false,
            unregistered: 0,
        });

        harness.register().unwrap();
        assert!(harness.is_registered());

        harness.unregister();
        assert!(!harness.is_registered());
        assert_eq!(harness.extension().unregistered, 1);
    }

    #[test]
    fn delivery_records_in_order() {
        let mut harness = ExtensionTestHarness::new(Flaky {
            fail_registration: false,
            unregistered: 0,
        });
        harness.register().unwrap();

        harness.deliver(&Event::new("one", "t", "s"));
        harness.deliver(&Event::new("two", "t", "s"));

        let names: Vec<_> = harness.delivered().iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }
}
