//! Recorded post-stage state of every executed component.

use jf_components::Role;
use jf_core::units::{Pressure, Temperature, k, pa};
use jf_core::{CompId, StreamId};
use jf_fluids::{FluidState, ProcessKind, ProcessRecord};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct StageSnapshot {
    pub component: CompId,
    pub stream: StreamId,
    /// Stage path, e.g. `0.cp2`
    pub path: String,
    pub name: String,
    pub role: Role,
    pub record: ProcessRecord,
    /// Fuel injected by this stage [kg/s]
    pub fuel_mf: f64,
    pub choked: bool,
    /// Fluid leaving the stage
    pub state: FluidState,
    /// [m³/kg]
    pub specific_volume: f64,
    /// [J/kg]
    pub specific_enthalpy: f64,
    /// [J/(kg·K)]
    pub specific_entropy: f64,
}

impl StageSnapshot {
    pub fn t0(&self) -> Temperature {
        k(self.state.t0)
    }

    pub fn p0(&self) -> Pressure {
        pa(self.state.p0)
    }

    /// Signed work exchanged with the flow [W].
    pub fn work(&self) -> f64 {
        self.record.work
    }

    /// Heat released by burning fuel in this stage [W].
    pub fn heat_released(&self) -> f64 {
        if self.record.kind == ProcessKind::Combustion {
            self.record.heat
        } else {
            0.0
        }
    }
}
