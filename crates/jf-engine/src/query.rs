//! Per-stage profiles of a run stream.

use jf_core::StreamId;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::snapshot::StageSnapshot;
use crate::system::System;

/// A quantity recorded for every stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageQuantity {
    /// Stagnation temperature [K]
    Temperature,
    /// Stagnation pressure [Pa]
    Pressure,
    /// [m³/kg]
    SpecificVolume,
    /// [J/kg]
    SpecificEnthalpy,
    /// [J/(kg·K)]
    SpecificEntropy,
    /// [kg/s]
    MassFlow,
    /// Signed work exchanged with the flow [W]
    Work,
}

impl StageQuantity {
    pub const ALL: [StageQuantity; 7] = [
        StageQuantity::Temperature,
        StageQuantity::Pressure,
        StageQuantity::SpecificVolume,
        StageQuantity::SpecificEnthalpy,
        StageQuantity::SpecificEntropy,
        StageQuantity::MassFlow,
        StageQuantity::Work,
    ];

    pub fn of(self, stage: &StageSnapshot) -> f64 {
        match self {
            StageQuantity::Temperature => stage.state.t0,
            StageQuantity::Pressure => stage.state.p0,
            StageQuantity::SpecificVolume => stage.specific_volume,
            StageQuantity::SpecificEnthalpy => stage.specific_enthalpy,
            StageQuantity::SpecificEntropy => stage.specific_entropy,
            StageQuantity::MassFlow => stage.state.mf,
            StageQuantity::Work => stage.record.work,
        }
    }
}

/// One row of a stream profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub path: String,
    pub value: f64,
}

impl System {
    /// `quantity` after each stage of `stream`, in stage order.
    pub fn profile(&self, stream: StreamId, quantity: StageQuantity) -> EngineResult<Vec<ProfilePoint>> {
        Ok(self
            .stream_stages(stream)?
            .into_iter()
            .map(|stage| ProfilePoint {
                path: stage.path.clone(),
                value: quantity.of(stage),
            })
            .collect())
    }

    /// `quantity` after each stage of the stream at `path`.
    pub fn profile_by_path(&self, path: &str, quantity: StageQuantity) -> EngineResult<Vec<ProfilePoint>> {
        let id = self.stream_by_path(path)?.id;
        self.profile(id, quantity)
    }
}
