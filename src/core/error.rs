use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },
}

impl EngineError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::invalid(field, "must be finite and >= 0"));
    }
    Ok(())
}

pub(crate) fn ensure_open_unit(field: &'static str, value: f64) -> Result<(), EngineError> {
    if !(value > 0.0 && value < 1.0) {
        return Err(EngineError::invalid(field, "must be strictly between 0 and 1"));
    }
    Ok(())
}
