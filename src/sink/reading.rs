use crate::{
    air_quality::{clamp, compute_iaq, round1, voc_density},
    sensor::Measurement,
    sink::Metric,
};

/// The record emitted for one stable measurement. Every value is rounded to one
/// decimal place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub timestamp_seconds: i64,

    pub temperature_celsius: f64,

    pub pressure_hpa: f64,

    pub humidity_percent: f64,

    pub air_quality_index: f64,

    pub voc_density: f64,
}

/// One row handed to the history logger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub time: i64,

    pub temp: f64,

    pub pressure: f64,

    pub humidity: f64,

    pub air_quality: f64,
}

impl Reading {
    pub fn from_measurement(measurement: &Measurement) -> Self {
        let humidity_percent = round1(measurement.humidity_percent);
        let gas_resistance_ohms = round1(measurement.gas_resistance_ohms);

        Self {
            timestamp_seconds: measurement.timestamp_seconds,
            temperature_celsius: round1(measurement.temperature_celsius),
            pressure_hpa: round1(measurement.pressure_hpa),
            humidity_percent,
            air_quality_index: round1(compute_iaq(gas_resistance_ohms, humidity_percent)),
            voc_density: voc_density(measurement.gas_resistance_ohms),
        }
    }

    /// Per-metric values for the live-state publisher, bounded to the host's
    /// declared ranges.
    pub fn characteristics(&self) -> [(Metric, f64); 5] {
        Metric::ALL.map(|metric| {
            let value = match metric {
                Metric::CurrentTemperature => self.temperature_celsius,
                Metric::AtmosphericPressureLevel => self.pressure_hpa,
                Metric::CurrentRelativeHumidity => self.humidity_percent,
                Metric::AirQuality => self.air_quality_index,
                Metric::VocDensity => self.voc_density,
            };

            match metric.bounds() {
                Some((min, max)) => (metric, clamp(value, min, max)),
                None => (metric, value),
            }
        })
    }

    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            time: self.timestamp_seconds,
            temp: self.temperature_celsius,
            pressure: self.pressure_hpa,
            humidity: self.humidity_percent,
            air_quality: self.air_quality_index,
        }
    }
}
