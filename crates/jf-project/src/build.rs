//! Construction of a runnable `System` from an engine definition.

use std::collections::HashMap;

use jf_components::{
    BleedDuct, Combustor, ComponentError, Compressor, ElectricalLoad, EngineComponent, Fan, Inlet,
    Intake, Intercooler, Nozzle, Propeller, Turbine,
};
use jf_core::units::{k, kgps, pa};
use jf_core::{CompId, ShaftId, StreamId};
use jf_engine::System;
use jf_fluids::{FluidError, FluidState, Fuel, GasProperties, RatioSpec};

use crate::schema::{BurnerDef, ComponentDef, ComponentKind, EngineDef, RatioDef};
use crate::validate::{Derivation, derivation_order, validate_engine};
use crate::{ProjectError, ProjectResult};

/// A built system and the ids behind each definition name.
#[derive(Debug)]
pub struct BuiltEngine {
    pub system: System,
    pub streams: HashMap<String, StreamId>,
    pub components: HashMap<String, CompId>,
    pub shafts: HashMap<String, ShaftId>,
}

impl BuiltEngine {
    pub fn stream(&self, id: &str) -> Option<StreamId> {
        self.streams.get(id).copied()
    }

    pub fn component(&self, id: &str) -> Option<CompId> {
        self.components.get(id).copied()
    }
}

pub fn build_system(def: &EngineDef) -> ProjectResult<BuiltEngine> {
    validate_engine(def)?;

    let fuels = def
        .fuels
        .iter()
        .map(|f| Ok((f.id.as_str(), Fuel::new(f.lhv_j_per_kg)?)))
        .collect::<Result<HashMap<&str, Fuel>, FluidError>>()?;

    let mut system = System::new();
    let mut components = HashMap::new();
    for component in &def.components {
        let built = make_component(component, &fuels).map_err(|source| ProjectError::Component {
            id: component.id.clone(),
            source,
        })?;
        components.insert(component.id.clone(), system.add_boxed(built));
    }

    let gas = GasProperties::new(def.gas.cp.clone(), def.gas.k.clone());
    let flight = FluidState::new(
        kgps(def.flight.mass_flow_kgps),
        gas,
        def.flight.mach,
        k(def.flight.temperature_k),
        pa(def.flight.pressure_pa),
    )?;

    let mut streams = HashMap::new();
    for step in derivation_order(def)? {
        match step {
            Derivation::Root(i) => {
                let id = system.root_stream(flight.clone())?;
                streams.insert(def.streams[i].id.clone(), id);
            }
            Derivation::Diversion(i) => {
                let d = &def.diversions[i];
                let parent = streams[&d.parent];
                let (first, second) = match &d.labels {
                    Some((a, b)) => system.divert_named(parent, d.fraction, (a.as_str(), b.as_str()))?,
                    None => system.divert(parent, d.fraction)?,
                };
                streams.insert(d.first.clone(), first);
                streams.insert(d.second.clone(), second);
            }
            Derivation::Merge(i) => {
                let m = &def.merges[i];
                let merged = system.merge(streams[&m.parents.0], streams[&m.parents.1])?;
                streams.insert(m.into.clone(), merged);
            }
        }
    }

    for stream in &def.streams {
        for component in &stream.components {
            system.attach(streams[&stream.id], components[component])?;
        }
    }

    let mut shafts = HashMap::new();
    for shaft in &def.shafts {
        let members: Vec<CompId> = shaft.members.iter().map(|m| components[m]).collect();
        let id = system.add_geared_shaft(&members, shaft.eta, shaft.eta_gearbox)?;
        shafts.insert(shaft.id.clone(), id);
    }

    Ok(BuiltEngine {
        system,
        streams,
        components,
        shafts,
    })
}

fn ratio_spec(ratio: &RatioDef) -> Option<RatioSpec> {
    ratio
        .pi
        .map(RatioSpec::Pressure)
        .or(ratio.tau.map(RatioSpec::Temperature))
}

fn missing_ratio(component: &'static str) -> ComponentError {
    ComponentError::MissingRatio { component }
}

fn make_burner(
    name: &str,
    burner: &BurnerDef,
    afterburner: bool,
    fuels: &HashMap<&str, Fuel>,
) -> Result<Combustor, ComponentError> {
    let fuel = match &burner.fuel {
        Some(id) => fuels
            .get(id.as_str())
            .cloned()
            .ok_or(ComponentError::InvalidArg {
                what: "unknown fuel",
            })?,
        None => Fuel::jet_a(),
    };
    let mut combustor = if afterburner {
        Combustor::afterburner(name, fuel, burner.eta)?
    } else {
        Combustor::chamber(name, fuel, burner.eta)?
    };
    if let Some(pi) = burner.pi {
        combustor = combustor.with_pressure_ratio(pi)?;
    }
    if let Some(t01) = burner.t01_k {
        combustor = combustor.with_exit_temperature(t01)?;
    }
    if let Some(fuel_mf) = burner.fuel_mf_kgps {
        combustor = combustor.with_fuel_flow(fuel_mf)?;
    }
    Ok(combustor)
}

fn make_component(
    def: &ComponentDef,
    fuels: &HashMap<&str, Fuel>,
) -> Result<Box<dyn EngineComponent>, ComponentError> {
    let name = def.name.as_str();
    let component: Box<dyn EngineComponent> = match &def.kind {
        ComponentKind::Intake => Box::new(Intake::new(name)),
        ComponentKind::Inlet { eta, pi, tau } => Box::new(Inlet::new(name, *eta, *pi, *tau)?),
        ComponentKind::Compressor(ratio) => {
            let spec = ratio_spec(ratio).ok_or(missing_ratio("compressor"))?;
            Box::new(Compressor::new(name, ratio.eta, spec)?)
        }
        ComponentKind::Fan(ratio) => {
            let spec = ratio_spec(ratio).ok_or(missing_ratio("fan"))?;
            Box::new(Fan::new(name, ratio.eta, spec)?)
        }
        ComponentKind::Propeller {
            eta_prop,
            power_w,
            propfan,
            pi,
        } => {
            let mut propeller = if *propfan {
                Propeller::propfan(name, *eta_prop, *power_w)?
            } else {
                Propeller::new(name, *eta_prop, *power_w)?
            };
            if let Some(pi) = pi {
                propeller = propeller.with_ratio(RatioSpec::Pressure(*pi))?;
            }
            Box::new(propeller)
        }
        ComponentKind::Turbine(ratio) => Box::new(match ratio_spec(ratio) {
            Some(spec) => Turbine::new(name, ratio.eta, spec)?,
            None => Turbine::self_sizing(name, ratio.eta)?,
        }),
        ComponentKind::Combustor(burner) => Box::new(make_burner(name, burner, false, fuels)?),
        ComponentKind::Afterburner(burner) => Box::new(make_burner(name, burner, true, fuels)?),
        ComponentKind::Nozzle { eta, pi } => {
            let nozzle = Nozzle::new(name, *eta)?;
            Box::new(match pi {
                Some(pi) => nozzle.with_pressure_ratio(*pi)?,
                None => nozzle,
            })
        }
        ComponentKind::Intercooler { q_w, eta } => Box::new(Intercooler::new(name, *q_w, *eta)?),
        ComponentKind::BleedDuct { t01_k, eta, pi } => {
            let duct = BleedDuct::new(name, *t01_k, *eta)?;
            Box::new(match pi {
                Some(pi) => duct.with_pressure_ratio(*pi)?,
                None => duct,
            })
        }
        ComponentKind::ElectricalLoad {
            power_w,
            eta_generator,
            eta_distribution,
        } => Box::new(ElectricalLoad::new(
            name,
            *power_w,
            *eta_generator,
            *eta_distribution,
        )?),
    };
    Ok(component)
}
