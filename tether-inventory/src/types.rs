//! Well-known typed fragments and their registrations.

use crate::asset::Asset;
use serde::{Deserialize, Serialize};
use tether_core::FragmentRegistry;

/// Wire key of the position fragment.
pub const POSITION: &str = "position";

/// Wire key of the firmware fragment.
pub const FIRMWARE: &str = "firmware";

/// Geographic position of an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Altitude in meters, when reported.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub altitude: Option<f64>,
}

/// Firmware installed on an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firmware {
    /// Firmware name.
    pub name: String,
    /// Installed version.
    pub version: String,
    /// Download URL, when known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
}

/// Register typed decoding for the well-known asset fragments.
///
/// Call once at start-up, before request traffic begins. Keys not
/// registered here still round-trip as generic values.
pub fn register_defaults(registry: &FragmentRegistry) {
    registry.register::<Asset, Position>(POSITION);
    registry.register::<Asset, Firmware>(FIRMWARE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn position_omits_absent_altitude() {
        let position = Position {
            latitude: 51.2,
            longitude: 6.7,
            altitude: None,
        };
        assert_eq!(
            serde_json::to_value(&position).unwrap(),
            json!({"latitude": 51.2, "longitude": 6.7})
        );
    }

    #[test]
    fn registered_defaults_cover_position_and_firmware() {
        use std::any::TypeId;

        let registry = FragmentRegistry::new();
        register_defaults(&registry);
        assert!(registry.lookup(TypeId::of::<Asset>(), POSITION).is_some());
        assert!(registry.lookup(TypeId::of::<Asset>(), FIRMWARE).is_some());
    }
}
