/// Raw payload returned by the sensor binding for one acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorData {
    pub temperature: f64,

    pub pressure: f64,

    pub humidity: f64,

    pub gas_resistance: f64,

    pub heat_stable: bool,
}

/// A single sensor sample. Only forwarded downstream when `stable` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub timestamp_seconds: i64,

    pub temperature_celsius: f64,

    pub pressure_hpa: f64,

    pub humidity_percent: f64,

    pub gas_resistance_ohms: f64,

    pub stable: bool,
}

impl Measurement {
    pub fn from_sensor_data(timestamp_seconds: i64, data: &SensorData) -> Self {
        Self {
            timestamp_seconds,
            temperature_celsius: data.temperature,
            pressure_hpa: data.pressure,
            humidity_percent: data.humidity,
            gas_resistance_ohms: data.gas_resistance,
            stable: data.heat_stable,
        }
    }
}
