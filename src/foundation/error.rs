/// Result alias used across the crate.
pub type CemResult<T> = Result<T, CemError>;

/// Crate-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum CemError {
    /// Structural problem in the model or skeleton description.
    #[error("validation error: {0}")]
    Validation(String),

    /// Expression failed to lex, parse, or compile.
    #[error("expression error: {0}")]
    Expression(String),

    /// Runtime failure while evaluating a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Model or layer JSON could not be decoded.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CemError {
    /// Build a [`CemError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CemError::Expression`].
    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }

    /// Build a [`CemError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`CemError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CemError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

impl From<crate::expression::error::ExprError> for CemError {
    fn from(e: crate::expression::error::ExprError) -> Self {
        Self::expression(e.to_string())
    }
}

impl From<crate::expression::error::EvalError> for CemError {
    fn from(e: crate::expression::error::EvalError) -> Self {
        Self::evaluation(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
