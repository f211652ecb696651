//! Error types for component operations.

use jf_core::error::JfError;
use jf_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur while a component transforms the flow.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("{component}: neither PI nor TAU is given or derivable")]
    MissingRatio { component: &'static str },

    #[error("afterburner needs a fixed fuel flow or a target exit temperature")]
    MissingFuelSchedule,

    #[error("{code} is not linked to a shaft")]
    NotOnShaft { code: &'static str },

    #[error("shaft work unavailable: {member} has not run yet")]
    ShaftWorkUnavailable { member: String },

    #[error("fluid error: {0}")]
    Fluid(#[from] FluidError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for JfError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => JfError::Invariant {
                what: what.to_string(),
            },
            ComponentError::Fluid(err) => err.into(),
            other => JfError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::MissingRatio {
            component: "compressor",
        };
        assert!(err.to_string().contains("compressor"));
    }

    #[test]
    fn error_conversion() {
        let comp_err = ComponentError::InvalidArg { what: "test" };
        let jf_err: JfError = comp_err.into();
        assert!(matches!(jf_err, JfError::InvalidArg { .. }));

        let fluid: ComponentError = FluidError::NonPhysical { what: "pressure" }.into();
        let jf_err: JfError = fluid.into();
        assert!(matches!(jf_err, JfError::Invariant { .. }));
    }
}
