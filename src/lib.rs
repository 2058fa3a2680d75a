//! Polls a BME680 environmental sensor, derives an air-quality index from the
//! gas resistance and humidity, and forwards every stable reading to a
//! live-state publisher and a history logger.

pub mod air_quality;
pub mod config;
pub mod db;
pub mod error;
pub mod polling;
pub mod scheduler;
pub mod sensor;
pub mod sink;

pub use error::{Error, Result};
