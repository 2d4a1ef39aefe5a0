#![doc = include_str!("../README.md")]

pub mod api;
pub mod asset;
pub mod measurement;
pub mod types;

pub use api::{
    AssetFilter, AssetPage, Inventory, MeasurementFilter, MeasurementPage, Measurements,
    PageStatistics,
};
pub use asset::Asset;
pub use measurement::{Measurement, Source};
pub use types::{FIRMWARE, Firmware, POSITION, Position, register_defaults};
