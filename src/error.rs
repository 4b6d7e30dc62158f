//! Error types
//!
//! Every fallible operation in the crate returns [`ParamError`]. Failures are
//! synchronous and leave the state they were about to modify untouched.

use thiserror::Error;

/// Errors raised by the parameter system
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    /// Type, `allow_none`, or bounds violation
    #[error("validation failed: {0}")]
    Validation(String),

    /// Write to a constant after construction, or any write to a readonly parameter
    #[error("immutable parameter: {0}")]
    Immutability(String),

    /// Unknown parameter or override key
    #[error("unknown key: {0}")]
    Lookup(String),

    /// `state_pop` with nothing pushed
    #[error("state stack underflow: {0}")]
    StackUnderflow(String),

    /// Configuration loading or logging setup failure
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl From<::config::ConfigError> for ParamError {
    fn from(err: ::config::ConfigError) -> Self {
        ParamError::ConfigError(err.to_string())
    }
}

impl ParamError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ParamError::Validation(_))
    }

    pub fn is_immutability(&self) -> bool {
        matches!(self, ParamError::Immutability(_))
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, ParamError::Lookup(_))
    }
}
