use super::OpacityLimits;
use crate::error::CoreError;

/// Clamp `current + delta` into the configured range, rounded to one decimal.
pub fn adjust(current: f64, delta: f64, limits: &OpacityLimits) -> Result<f64, CoreError> {
    if !delta.is_finite() {
        return Err(CoreError::InvalidAdjustment { delta });
    }
    Ok(clamp(current + delta, limits))
}

/// Quantize and clamp an absolute opacity value.
pub fn clamp(value: f64, limits: &OpacityLimits) -> f64 {
    if !value.is_finite() {
        return limits.max;
    }
    round_tenth(value.clamp(limits.min, limits.max))
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
