//! Heuristic confidence score
//!
//! This is NOT a calibrated model confidence. It grows with the length of
//! the generated report and is clamped to a fixed band, so a long report
//! about a blurry image still scores high. It exists because clients
//! display a percentage next to every exam.

/// Lowest score ever reported
pub const CONFIDENCE_FLOOR: f64 = 75.0;

/// Highest score ever reported
pub const CONFIDENCE_CEILING: f64 = 95.0;

const BASE_SCORE: f64 = 80.0;
const CHARS_PER_POINT: f64 = 50.0;

/// Score a report: `80 + chars / 50`, clamped to [75, 95], one decimal place
pub fn heuristic_confidence(diagnosis: &str) -> f64 {
    let chars = diagnosis.chars().count() as f64;
    let raw = (BASE_SCORE + chars / CHARS_PER_POINT).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING);
    round_one_decimal(raw)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
