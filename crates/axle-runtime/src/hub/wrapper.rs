//! Cross-platform wrapper identification.

use serde::{Deserialize, Serialize};

/// The cross-platform shell embedding the SDK, if any.
///
/// Reported in the hub's shared state so extensions (and backends reading
/// their payloads) can attribute traffic to the right integration surface.
/// Recorded before [`EventHub::start`](crate::EventHub::start); mutations
/// after start are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapperType {
    /// Direct native integration.
    #[default]
    None,
    /// React Native wrapper.
    ReactNative,
    /// Flutter wrapper.
    Flutter,
    /// Cordova wrapper.
    Cordova,
    /// Unity wrapper.
    Unity,
    /// Xamarin wrapper.
    Xamarin,
}

impl WrapperType {
    /// Single-letter tag recorded in the hub shared state.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::None => "N",
            Self::ReactNative => "R",
            Self::Flutter => "F",
            Self::Cordova => "C",
            Self::Unity => "U",
            Self::Xamarin => "X",
        }
    }

    /// Display name recorded in the hub shared state.
    #[must_use]
    pub fn friendly_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::ReactNative => "React Native",
            Self::Flutter => "Flutter",
            Self::Cordova => "Cordova",
            Self::Unity => "Unity",
            Self::Xamarin => "Xamarin",
        }
    }
}
