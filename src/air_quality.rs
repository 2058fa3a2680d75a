//! Air-quality estimation from BME680 gas resistance and relative humidity.
//!
//! The index is a weighted sum of a humidity score (ideal at 40 %RH) and a gas
//! score (ideal at or above 50 kΩ), scaled down by 20. It is intentionally left
//! unclamped; only [`voc_density`] is bounded.

const HUMIDITY_WEIGHT: f64 = 0.25;
const HUMIDITY_REFERENCE_PERCENT: f64 = 40.0;
const GAS_REFERENCE_OHMS: f64 = 50_000.0;

const VOC_DENSITY_MIN: f64 = 0.0;
const VOC_DENSITY_MAX: f64 = 1000.0;

// 2^52: every f64 at or above this magnitude is already an integer.
const ROUNDING_LIMIT: f64 = 4_503_599_627_370_496.0;

/// Computes the air-quality index for a gas resistance (Ω) and relative
/// humidity (%). Nominally in `[0, 5]`, higher is worse.
pub fn compute_iaq(gas_resistance_ohms: f64, humidity_percent: f64) -> f64 {
    let gas_offset = GAS_REFERENCE_OHMS - gas_resistance_ohms;
    let humidity_offset = humidity_percent - HUMIDITY_REFERENCE_PERCENT;

    let humidity_score = if humidity_offset > 0.0 {
        (100.0 - HUMIDITY_REFERENCE_PERCENT - humidity_offset)
            / (100.0 - HUMIDITY_REFERENCE_PERCENT)
            * (HUMIDITY_WEIGHT * 100.0)
    } else {
        (HUMIDITY_REFERENCE_PERCENT + humidity_offset) / HUMIDITY_REFERENCE_PERCENT
            * (HUMIDITY_WEIGHT * 100.0)
    };

    let gas_score = if gas_offset > 0.0 {
        gas_resistance_ohms / GAS_REFERENCE_OHMS * (100.0 - HUMIDITY_WEIGHT * 100.0)
    } else {
        100.0 - HUMIDITY_WEIGHT * 100.0
    };

    (humidity_score + gas_score) / 20.0
}

/// VOC density proxy in `[0, 1000]`: the gas resistance in hundreds of ohms.
pub fn voc_density(gas_resistance_ohms: f64) -> f64 {
    clamp(
        round1(gas_resistance_ohms / 100.0),
        VOC_DENSITY_MIN,
        VOC_DENSITY_MAX,
    )
}

/// Rounds to one decimal place, halves rounding towards positive infinity.
pub fn round1(x: f64) -> f64 {
    if !x.is_finite() || x.abs() >= ROUNDING_LIMIT {
        return x;
    }

    (x * 10.0 + 0.5).floor() / 10.0
}

/// Bounds `num` to `[min, max]`. A NaN input collapses to `min`.
pub fn clamp(num: f64, min: f64, max: f64) -> f64 {
    num.max(min).min(max)
}
