//! Engine definition schema.

use jf_fluids::Property;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineDef {
    pub version: u32,
    pub name: String,
    pub flight: FlightDef,
    #[serde(default)]
    pub gas: GasDef,
    #[serde(default)]
    pub fuels: Vec<FuelDef>,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default)]
    pub shafts: Vec<ShaftDef>,
    pub streams: Vec<StreamDef>,
    #[serde(default)]
    pub diversions: Vec<DiversionDef>,
    #[serde(default)]
    pub merges: Vec<MergeDef>,
}

/// Ambient condition and captured air flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightDef {
    pub mass_flow_kgps: f64,
    #[serde(default)]
    pub mach: f64,
    pub temperature_k: f64,
    pub pressure_pa: f64,
}

/// Temperature-dependent gas properties of the working fluid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GasDef {
    pub cp: Property,
    pub k: Property,
}

impl Default for GasDef {
    /// Air below 1000 K, combustion products above.
    fn default() -> Self {
        Self {
            cp: Property::step(1000.0, 1000.0, 1150.0),
            k: Property::step(1000.0, 1.4, 1.33),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelDef {
    pub id: String,
    /// Lower heating value [J/kg]
    pub lhv_j_per_kg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub id: String,
    pub name: String,
    pub kind: ComponentKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentKind {
    Intake,
    Inlet {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        eta: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pi: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tau: Option<f64>,
    },
    Compressor(RatioDef),
    Fan(RatioDef),
    Propeller {
        eta_prop: f64,
        power_w: f64,
        #[serde(default)]
        propfan: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pi: Option<f64>,
    },
    /// Without `pi` or `tau` the turbine sizes itself to its shaft.
    Turbine(RatioDef),
    Combustor(BurnerDef),
    Afterburner(BurnerDef),
    Nozzle {
        eta: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pi: Option<f64>,
    },
    Intercooler {
        q_w: f64,
        eta: f64,
    },
    BleedDuct {
        t01_k: f64,
        eta: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pi: Option<f64>,
    },
    ElectricalLoad {
        power_w: f64,
        eta_generator: f64,
        eta_distribution: f64,
    },
}

/// Efficiency plus at most one of PI and TAU.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatioDef {
    pub eta: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BurnerDef {
    pub eta: f64,
    /// Fuel id; Jet-A when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t01_k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_mf_kgps: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShaftDef {
    pub id: String,
    pub members: Vec<String>,
    pub eta: f64,
    #[serde(default = "default_gearbox_eta")]
    pub eta_gearbox: f64,
}

fn default_gearbox_eta() -> f64 {
    1.0
}

/// A stream and the components along it, in flow order.
///
/// Streams not produced by a diversion or merge are fed from the flight
/// condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamDef {
    pub id: String,
    #[serde(default)]
    pub components: Vec<String>,
}

/// Split `parent` into `first` (carrying `fraction`) and `second`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiversionDef {
    pub parent: String,
    pub fraction: f64,
    pub first: String,
    pub second: String,
    /// Path labels of the two children; `m`/`s` by flow share when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MergeDef {
    pub parents: (String, String),
    pub into: String,
}

impl EngineDef {
    /// Streams fed from the flight condition.
    pub fn root_streams(&self) -> impl Iterator<Item = &StreamDef> {
        self.streams.iter().filter(|s| {
            !self
                .diversions
                .iter()
                .any(|d| d.first == s.id || d.second == s.id)
                && !self.merges.iter().any(|m| m.into == s.id)
        })
    }
}
