//! Core traits for engine components.

use crate::error::{ComponentError, ComponentResult};
use core::fmt;
use jf_fluids::{FluidState, ProcessRecord};
use serde::{Deserialize, Serialize};

/// Capability tag used by shafts, burners and metrics to classify stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Extracts work from the flow for a shaft (turbines).
    WorkProducer,
    /// Draws work from a shaft (compressors, fans, propellers, electrical loads).
    WorkConsumer,
    /// Adds or removes heat (burners, heat exchangers).
    HeatSource,
    /// Neither (intakes, inlets, nozzles).
    Passive,
}

/// Engine-level information available to the stage being executed.
pub trait StageContext {
    /// Work the executing stage's shaft still needs from this stage [W].
    fn shaft_work_demand(&self) -> ComponentResult<f64>;

    /// Work demanded by every turbine causally downstream of this stage [W].
    fn downstream_work_demand(&self) -> ComponentResult<f64>;
}

/// Context for a component run outside an engine.
///
/// Shaft and downstream queries fail, so only components that need no
/// coupling information can run against it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoContext;

impl StageContext for NoContext {
    fn shaft_work_demand(&self) -> ComponentResult<f64> {
        Err(ComponentError::NotOnShaft { code: "stage" })
    }

    fn downstream_work_demand(&self) -> ComponentResult<f64> {
        Ok(0.0)
    }
}

/// What one stage did to the flow.
#[derive(Clone, Debug, PartialEq)]
pub struct StageOutput {
    pub record: ProcessRecord,
    /// Fuel injected before the process [kg/s]
    pub fuel_mf: f64,
    /// Nozzle only: the throat reached sonic conditions.
    pub choked: bool,
}

impl StageOutput {
    pub fn new(record: ProcessRecord) -> Self {
        Self {
            record,
            fuel_mf: 0.0,
            choked: false,
        }
    }
}

/// A stage of an engine stream.
///
/// Components are immutable configuration. Executing one never mutates
/// it: the resulting record is returned to the stream, which folds it
/// into the next fluid state and keeps it as the stage snapshot.
pub trait EngineComponent: Send + Sync + fmt::Debug {
    /// Component name for debugging and identification.
    fn name(&self) -> &str;

    /// Two-letter stage code (`cp`, `tb`, `nz`, ...).
    fn code(&self) -> &'static str;

    fn role(&self) -> Role;

    /// Apply the component to the flow entering it.
    fn transfer(&self, gas: &FluidState, ctx: &dyn StageContext)
    -> ComponentResult<StageOutput>;

    /// Driven through the shaft gearbox (fans, propellers).
    fn geared(&self) -> bool {
        false
    }

    /// Shaft work demanded independently of the flow [W] (electrical loads).
    fn fixed_work_demand(&self) -> Option<f64> {
        None
    }

    /// Propulsive power delivered directly as thrust, `w·eta_prop` [W].
    fn thrust_power(&self) -> Option<f64> {
        None
    }

    /// Exhausts the stream to ambient.
    fn is_exhaust(&self) -> bool {
        false
    }
}
