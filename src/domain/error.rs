use thiserror::Error;

/// Input or parameter errors detected before a solve is attempted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("forecast series are empty (zero intervals)")]
    EmptyHorizon,

    #[error("forecast length mismatch: solar={solar}, load={load}, price={price}")]
    LengthMismatch {
        solar: usize,
        load: usize,
        price: usize,
    },

    #[error("schedule shape mismatch: charge={charge}, discharge={discharge}, soc={soc} (expected soc = intervals + 1)")]
    ScheduleShape {
        charge: usize,
        discharge: usize,
        soc: usize,
    },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field}={value} is outside {range}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("{field}[{index}] is not finite")]
    NonFinite { field: &'static str, index: usize },
}

/// Reject NaN/inf scalars with the same error shape as series entries.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::NonFinite { field, index: 0 })
    }
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::NonPositive { field, value })
    }
}

pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: f64,
) -> Result<f64, ConfigurationError> {
    ensure_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::Negative { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigurationError::LengthMismatch {
            solar: 96,
            load: 95,
            price: 96,
        };
        assert_eq!(
            err.to_string(),
            "forecast length mismatch: solar=96, load=95, price=96"
        );
    }

    #[test]
    fn test_scalar_guards() {
        assert!(ensure_positive("capacity_kwh", 13.5).is_ok());
        assert_eq!(
            ensure_positive("capacity_kwh", 0.0),
            Err(ConfigurationError::NonPositive {
                field: "capacity_kwh",
                value: 0.0
            })
        );
        assert!(ensure_non_negative("grid_export_limit_kw", 0.0).is_ok());
        assert!(ensure_non_negative("grid_export_limit_kw", -0.1).is_err());
        assert!(matches!(
            ensure_positive("power_kw", f64::NAN),
            Err(ConfigurationError::NonFinite { .. })
        ));
    }
}
