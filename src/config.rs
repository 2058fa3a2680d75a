use std::time::Duration;

use crate::{Error, Result, sensor::SensorOptions, sink::Metric};

const MANUFACTURER: &str = "bme680";
const MODEL: &str = "RPI-BME680";

/// Poll period in whole seconds, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshInterval(u64);

impl RefreshInterval {
    pub const DEFAULT_SECS: u64 = 60;

    pub fn new(secs: u64) -> Result<Self> {
        if secs == 0 {
            return Err(Error::InvalidRefreshInterval(secs));
        }

        Ok(Self(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for RefreshInterval {
    fn default() -> Self {
        Self(Self::DEFAULT_SECS)
    }
}

/// Names of the services exposed to the host. Each falls back to `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNames {
    pub name: String,

    pub temperature: String,

    pub humidity: String,

    pub air_quality: String,
}

impl DisplayNames {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            temperature: name.clone(),
            humidity: name.clone(),
            air_quality: name.clone(),
            name,
        }
    }

    pub fn with_temperature(mut self, name: impl Into<String>) -> Self {
        self.temperature = name.into();
        self
    }

    pub fn with_humidity(mut self, name: impl Into<String>) -> Self {
        self.humidity = name.into();
        self
    }

    pub fn with_air_quality(mut self, name: impl Into<String>) -> Self {
        self.air_quality = name.into();
        self
    }

    /// Name of the service a metric is published on. Pressure rides on the
    /// temperature service.
    pub fn for_metric(&self, metric: Metric) -> &str {
        match metric {
            Metric::CurrentTemperature | Metric::AtmosphericPressureLevel => &self.temperature,
            Metric::CurrentRelativeHumidity => &self.humidity,
            Metric::AirQuality | Metric::VocDensity => &self.air_quality,
        }
    }
}

/// Accessory metadata reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInfo {
    pub manufacturer: &'static str,

    pub model: &'static str,

    pub serial_number: String,

    pub firmware_revision: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub device_id: String,

    pub names: DisplayNames,

    pub refresh: RefreshInterval,

    pub sensor: SensorOptions,
}

impl BridgeConfig {
    pub fn new(device_id: impl Into<String>, names: DisplayNames) -> Self {
        Self {
            device_id: device_id.into(),
            names,
            refresh: RefreshInterval::default(),
            sensor: SensorOptions::default(),
        }
    }

    pub fn with_refresh(mut self, refresh: RefreshInterval) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn with_sensor(mut self, sensor: SensorOptions) -> Self {
        self.sensor = sensor;
        self
    }

    /// Aggregation window, in minutes, for history hosts that bucket entries.
    pub fn history_minutes(&self) -> f64 {
        self.refresh.as_secs() as f64 * 10.0 / 60.0
    }

    pub fn accessory_info(&self) -> AccessoryInfo {
        AccessoryInfo {
            manufacturer: MANUFACTURER,
            model: MODEL,
            serial_number: format!("{}-{}", self.device_id, self.device_id),
            firmware_revision: env!("CARGO_PKG_VERSION"),
        }
    }
}
