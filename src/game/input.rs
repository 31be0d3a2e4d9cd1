use super::constants::{MAX_ACCESSORY, SKINS};
use super::math::normalize_angle;

/// Accepts any finite heading and wraps it into (-PI, PI].
pub fn parse_heading(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    Some(normalize_angle(value))
}

pub fn parse_skin(value: Option<f64>) -> usize {
    let Some(value) = value.filter(|value| value.is_finite()) else { return 0 };
    (value.trunc() as i64).rem_euclid(SKINS.len() as i64) as usize
}

pub fn parse_accessory(value: Option<f64>) -> u8 {
    let Some(value) = value.filter(|value| value.is_finite()) else { return 0 };
    value.trunc().clamp(0.0, MAX_ACCESSORY as f64) as u8
}
