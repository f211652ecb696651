//! Engine composition and execution errors.

use jf_components::ComponentError;
use jf_core::{Id, JfError};
use jf_fluids::FluidError;
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("stream {stream} has no fluid state assigned")]
    MissingFluidState { stream: String },

    #[error("no stage at path '{path}'")]
    StageNotFound { path: String },

    #[error("no stream at path '{path}'")]
    StreamNotFound { path: String },

    #[error("unknown {what} id {id}")]
    UnknownId { what: &'static str, id: Id },

    #[error("stage {stage}: {source}")]
    Component {
        stage: String,
        source: ComponentError,
    },

    #[error("fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("the system has not run yet")]
    NotRun,

    #[error("the system already ran; build a fresh system to evaluate again")]
    AlreadyRun,

    #[error("stream {stream}: enthalpy drop across the exhaust is not positive ({dt} K)")]
    NonPositiveEnthalpyDrop { stream: String, dt: f64 },

    #[error("diversion fraction must be in [0, 1], got {fraction}")]
    InvalidFraction { fraction: f64 },

    #[error("component {name} is already connected to stream {stream}")]
    AlreadyConnected { name: String, stream: String },

    #[error("component {name} is already linked to a shaft")]
    AlreadyOnShaft { name: String },

    #[error("stream {path} already feeds other streams")]
    AlreadyBranched { path: String },

    #[error("cannot merge stream {path} with itself")]
    SelfMerge { path: String },

    #[error("propeller thrust is undefined at zero flight speed")]
    StaticPropellerThrust,

    #[error("no heat was added to the flow")]
    NoHeatInput,

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("stream dependency cycle")]
    Cycle,
}

impl From<EngineError> for JfError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Fluid(e) => e.into(),
            EngineError::Component { source, .. } => source.into(),
            EngineError::UnknownId { what, id } => JfError::IndexOob {
                what,
                index: id.slot(),
                len: 0,
            },
            invariant @ (EngineError::Cycle | EngineError::NonPositiveEnthalpyDrop { .. }) => {
                JfError::Invariant {
                    what: invariant.to_string(),
                }
            }
            other => JfError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}
