use std::{fmt, str::FromStr};

use anyhow::{Error, bail};

/// Live-state characteristics updated for every stable reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    CurrentTemperature,
    AtmosphericPressureLevel,
    CurrentRelativeHumidity,
    AirQuality,
    VocDensity,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::CurrentTemperature,
        Metric::AtmosphericPressureLevel,
        Metric::CurrentRelativeHumidity,
        Metric::AirQuality,
        Metric::VocDensity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::CurrentTemperature => "CurrentTemperature",
            Metric::AtmosphericPressureLevel => "AtmosphericPressureLevel",
            Metric::CurrentRelativeHumidity => "CurrentRelativeHumidity",
            Metric::AirQuality => "AirQuality",
            Metric::VocDensity => "VOCDensity",
        }
    }

    /// Value range the host declares for the characteristic, if narrower than
    /// what the reading can produce.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Metric::CurrentTemperature => Some((-100.0, 100.0)),
            Metric::VocDensity => Some((0.0, 1000.0)),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CurrentTemperature" => Ok(Metric::CurrentTemperature),
            "AtmosphericPressureLevel" => Ok(Metric::AtmosphericPressureLevel),
            "CurrentRelativeHumidity" => Ok(Metric::CurrentRelativeHumidity),
            "AirQuality" => Ok(Metric::AirQuality),
            "VOCDensity" => Ok(Metric::VocDensity),
            _ => bail!("unknown metric: {}", s),
        }
    }
}
