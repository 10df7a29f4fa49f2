//! Validation of loosely-typed numeric metrics.
//!
//! The upstream API reports every statistic as a floating point value, even
//! counters. These helpers convert them into integers only when the value is
//! finite, non-negative and integral.

use thiserror::Error;

/// Tolerance used when deciding whether a float carries an integral value.
const INTEGRAL_EPSILON: f64 = 1e-6;

/// A metric value that cannot be represented in the requested type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("metric '{name}' is not a finite number")]
    NotFinite { name: String },

    #[error("metric '{name}' must be non-negative, got {value}")]
    Negative { name: String, value: f64 },

    #[error("metric '{name}' must be a whole number, got {value}")]
    NotIntegral { name: String, value: f64 },

    #[error("metric '{name}' is out of range: {value}")]
    OutOfRange { name: String, value: f64 },
}

fn checked_whole(name: &str, value: f64) -> Result<f64, MetricError> {
    if !value.is_finite() {
        return Err(MetricError::NotFinite {
            name: name.to_string(),
        });
    }
    if value < 0.0 {
        return Err(MetricError::Negative {
            name: name.to_string(),
            value,
        });
    }
    let rounded = value.round();
    if (value - rounded).abs() > INTEGRAL_EPSILON {
        return Err(MetricError::NotIntegral {
            name: name.to_string(),
            value,
        });
    }
    Ok(rounded)
}

/// Validates a counter metric (kills, deaths, ...) and converts it to `i32`.
pub fn validate_count(name: &str, value: f64) -> Result<i32, MetricError> {
    let whole = checked_whole(name, value)?;
    if whole > i32::MAX as f64 {
        return Err(MetricError::OutOfRange {
            name: name.to_string(),
            value,
        });
    }
    Ok(whole as i32)
}

/// Validates a duration metric in seconds and converts it to `i64`.
pub fn validate_seconds(name: &str, value: f64) -> Result<i64, MetricError> {
    let whole = checked_whole(name, value)?;
    // i64::MAX is not representable; the cast rounds up to 2^63.
    if whole >= i64::MAX as f64 {
        return Err(MetricError::OutOfRange {
            name: name.to_string(),
            value,
        });
    }
    Ok(whole as i64)
}

/// Validates a ratio metric. Ratios are kept verbatim but must be finite.
pub fn validate_ratio(name: &str, value: f64) -> Result<f64, MetricError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MetricError::NotFinite {
            name: name.to_string(),
        })
    }
}

/// Interprets a 0/1 metric as a flag.
pub fn validate_flag(name: &str, value: f64) -> Result<bool, MetricError> {
    match validate_count(name, value)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(MetricError::OutOfRange {
            name: name.to_string(),
            value,
        }),
    }
}
