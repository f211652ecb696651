//! Fluid property errors.

use jf_core::JfError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur while evaluating fluid properties or processes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative pressure, NaN temperature, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of valid range.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<FluidError> for JfError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what } => JfError::Invariant {
                what: format!("non-physical fluid value: {what}"),
            },
            FluidError::OutOfRange { what, value } => JfError::InvalidArg {
                what: format!("fluid value out of range: {what} = {value}"),
            },
            FluidError::InvalidArg { what } => JfError::InvalidArg {
                what: format!("invalid fluid argument: {what}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical { what: "pressure" };
        assert!(err.to_string().contains("pressure"));

        let err = FluidError::OutOfRange {
            what: "fraction",
            value: 1.5,
        };
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn error_to_jf_error() {
        let fluid_err = FluidError::InvalidArg { what: "efficiency" };
        let jf_err: JfError = fluid_err.into();
        assert!(matches!(jf_err, JfError::InvalidArg { .. }));
    }
}
