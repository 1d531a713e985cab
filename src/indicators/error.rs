//! Indicator failures

/// Errors raised by indicator functions and their argument coercion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("{indicator}: invalid parameter: {reason}")]
    InvalidParameter { indicator: String, reason: String },

    #[error("{indicator}: argument '{token}' is neither a bound variable nor a numeric literal")]
    UnresolvedArgument { indicator: String, token: String },
}

impl IndicatorError {
    pub fn invalid(indicator: &str, reason: impl Into<String>) -> Self {
        IndicatorError::InvalidParameter {
            indicator: indicator.to_string(),
            reason: reason.into(),
        }
    }
}
