//! Engine definition validation logic.

use crate::schema::{BurnerDef, ComponentDef, ComponentKind, EngineDef, FlightDef, RatioDef};
use std::collections::{HashMap, HashSet};

/// Newest definition version this crate reads.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Order in which streams come into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Derivation {
    /// Index into `streams`
    Root(usize),
    /// Index into `diversions`
    Diversion(usize),
    /// Index into `merges`
    Merge(usize),
}

pub fn validate_engine(def: &EngineDef) -> Result<(), ValidationError> {
    if def.version == 0 || def.version > SCHEMA_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: def.version,
        });
    }
    validate_flight(&def.flight)?;

    let mut fuel_ids = HashSet::new();
    for fuel in &def.fuels {
        if !fuel_ids.insert(fuel.id.as_str()) {
            return Err(duplicate(&fuel.id, "fuels"));
        }
        positive(&format!("fuel '{}' lhv_j_per_kg", fuel.id), fuel.lhv_j_per_kg)?;
    }

    let mut component_ids = HashSet::new();
    for component in &def.components {
        if !component_ids.insert(component.id.as_str()) {
            return Err(duplicate(&component.id, "components"));
        }
        validate_component(component, &fuel_ids)?;
    }

    let mut stream_ids = HashSet::new();
    let mut placed: HashMap<&str, &str> = HashMap::new();
    for stream in &def.streams {
        if !stream_ids.insert(stream.id.as_str()) {
            return Err(duplicate(&stream.id, "streams"));
        }
        for component in &stream.components {
            if !component_ids.contains(component.as_str()) {
                return Err(missing(component, &format!("stream '{}' components", stream.id)));
            }
            if let Some(other) = placed.insert(component, &stream.id) {
                return Err(ValidationError::DuplicateId {
                    id: component.clone(),
                    context: format!("streams '{other}' and '{}'", stream.id),
                });
            }
        }
    }

    let mut shaft_ids = HashSet::new();
    let mut linked = HashSet::new();
    for shaft in &def.shafts {
        if !shaft_ids.insert(shaft.id.as_str()) {
            return Err(duplicate(&shaft.id, "shafts"));
        }
        efficiency(&format!("shaft '{}' eta", shaft.id), shaft.eta)?;
        efficiency(&format!("shaft '{}' eta_gearbox", shaft.id), shaft.eta_gearbox)?;
        for member in &shaft.members {
            if !component_ids.contains(member.as_str()) {
                return Err(missing(member, &format!("shaft '{}' members", shaft.id)));
            }
            if !linked.insert(member.as_str()) {
                return Err(duplicate(member, "shaft members"));
            }
        }
    }

    let mut produced = HashSet::new();
    let mut produce = |id: &str, context: &str| -> Result<(), ValidationError> {
        if !stream_ids.contains(id) {
            return Err(missing(id, context));
        }
        if !produced.insert(id.to_string()) {
            return Err(duplicate(id, "derived streams"));
        }
        Ok(())
    };
    // A stream's outlet feeds one diversion or one merge
    let mut branched = HashSet::new();
    for (i, diversion) in def.diversions.iter().enumerate() {
        let context = format!("diversions[{i}]");
        if !stream_ids.contains(diversion.parent.as_str()) {
            return Err(missing(&diversion.parent, &context));
        }
        if !branched.insert(diversion.parent.as_str()) {
            return Err(duplicate(&diversion.parent, "diversion and merge parents"));
        }
        if !diversion.fraction.is_finite() || !(0.0..=1.0).contains(&diversion.fraction) {
            return Err(ValidationError::InvalidValue {
                field: format!("{context} fraction"),
                value: diversion.fraction.to_string(),
                reason: "must be in [0, 1]".to_string(),
            });
        }
        produce(&diversion.first, &context)?;
        produce(&diversion.second, &context)?;
    }
    for (i, merge) in def.merges.iter().enumerate() {
        let context = format!("merges[{i}]");
        let (a, b) = &merge.parents;
        for parent in [a, b] {
            if !stream_ids.contains(parent.as_str()) {
                return Err(missing(parent, &context));
            }
        }
        if a == b {
            return Err(ValidationError::InvalidValue {
                field: format!("{context} parents"),
                value: a.clone(),
                reason: "a stream cannot merge with itself".to_string(),
            });
        }
        for parent in [a, b] {
            if !branched.insert(parent.as_str()) {
                return Err(duplicate(parent, "diversion and merge parents"));
            }
        }
        produce(&merge.into, &context)?;
    }

    if def.root_streams().next().is_none() {
        return Err(ValidationError::InvalidValue {
            field: "streams".to_string(),
            value: def.streams.len().to_string(),
            reason: "at least one stream must be fed from the flight condition".to_string(),
        });
    }
    derivation_order(def)?;
    Ok(())
}

/// Streams in creation order: roots first, then each diversion or merge
/// once its parents exist.
pub(crate) fn derivation_order(def: &EngineDef) -> Result<Vec<Derivation>, ValidationError> {
    let roots: HashSet<&str> = def.root_streams().map(|s| s.id.as_str()).collect();
    let mut order: Vec<Derivation> = def
        .streams
        .iter()
        .enumerate()
        .filter(|(_, s)| roots.contains(s.id.as_str()))
        .map(|(i, _)| Derivation::Root(i))
        .collect();
    let mut available = roots;

    let mut diversions: Vec<usize> = (0..def.diversions.len()).collect();
    let mut merges: Vec<usize> = (0..def.merges.len()).collect();
    loop {
        let before = order.len();
        diversions.retain(|&i| {
            let d = &def.diversions[i];
            if !available.contains(d.parent.as_str()) {
                return true;
            }
            available.insert(&d.first);
            available.insert(&d.second);
            order.push(Derivation::Diversion(i));
            false
        });
        merges.retain(|&i| {
            let m = &def.merges[i];
            if !(available.contains(m.parents.0.as_str()) && available.contains(m.parents.1.as_str())) {
                return true;
            }
            available.insert(&m.into);
            order.push(Derivation::Merge(i));
            false
        });
        if order.len() == before {
            break;
        }
    }

    let stuck = diversions
        .first()
        .map(|&i| def.diversions[i].first.clone())
        .or_else(|| merges.first().map(|&i| def.merges[i].into.clone()));
    match stuck {
        Some(stream) => Err(ValidationError::InvalidValue {
            field: "stream".to_string(),
            value: stream,
            reason: "derived from itself through diversions or merges".to_string(),
        }),
        None => Ok(order),
    }
}

fn validate_flight(flight: &FlightDef) -> Result<(), ValidationError> {
    positive("flight mass_flow_kgps", flight.mass_flow_kgps)?;
    positive("flight temperature_k", flight.temperature_k)?;
    positive("flight pressure_pa", flight.pressure_pa)?;
    if !flight.mach.is_finite() || flight.mach < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "flight mach".to_string(),
            value: flight.mach.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    Ok(())
}

fn validate_component(component: &ComponentDef, fuels: &HashSet<&str>) -> Result<(), ValidationError> {
    let field = |name: &str| format!("component '{}' {name}", component.id);
    match &component.kind {
        ComponentKind::Intake => Ok(()),
        ComponentKind::Inlet { eta, pi, .. } => {
            if eta.is_none() && pi.is_none() {
                return Err(ValidationError::InvalidValue {
                    field: field("eta/pi"),
                    value: "none".to_string(),
                    reason: "an inlet needs an efficiency or a pressure recovery".to_string(),
                });
            }
            Ok(())
        }
        ComponentKind::Compressor(ratio) | ComponentKind::Fan(ratio) => {
            efficiency(&field("eta"), ratio.eta)?;
            exactly_one_ratio(ratio, &field("pi/tau"), true)
        }
        ComponentKind::Turbine(ratio) => {
            efficiency(&field("eta"), ratio.eta)?;
            exactly_one_ratio(ratio, &field("pi/tau"), false)
        }
        ComponentKind::Propeller {
            eta_prop, power_w, ..
        } => {
            efficiency(&field("eta_prop"), *eta_prop)?;
            positive(&field("power_w"), *power_w)
        }
        ComponentKind::Combustor(burner) => validate_burner(burner, fuels, &field),
        ComponentKind::Afterburner(burner) => {
            if burner.t01_k.is_none() && burner.fuel_mf_kgps.is_none() {
                return Err(ValidationError::InvalidValue {
                    field: field("t01_k/fuel_mf_kgps"),
                    value: "none".to_string(),
                    reason: "an afterburner needs a target temperature or a fuel flow".to_string(),
                });
            }
            validate_burner(burner, fuels, &field)
        }
        ComponentKind::Nozzle { eta, .. } => efficiency(&field("eta"), *eta),
        ComponentKind::Intercooler { eta, .. } => efficiency(&field("eta"), *eta),
        ComponentKind::BleedDuct { t01_k, eta, .. } => {
            efficiency(&field("eta"), *eta)?;
            positive(&field("t01_k"), *t01_k)
        }
        ComponentKind::ElectricalLoad {
            power_w,
            eta_generator,
            eta_distribution,
        } => {
            positive(&field("power_w"), *power_w)?;
            efficiency(&field("eta_generator"), *eta_generator)?;
            efficiency(&field("eta_distribution"), *eta_distribution)
        }
    }
}

fn validate_burner(
    burner: &BurnerDef,
    fuels: &HashSet<&str>,
    field: &dyn Fn(&str) -> String,
) -> Result<(), ValidationError> {
    efficiency(&field("eta"), burner.eta)?;
    if let Some(fuel) = &burner.fuel
        && !fuels.contains(fuel.as_str())
    {
        return Err(missing(fuel, &field("fuel")));
    }
    Ok(())
}

fn exactly_one_ratio(ratio: &RatioDef, field: &str, required: bool) -> Result<(), ValidationError> {
    match (ratio.pi, ratio.tau) {
        (Some(pi), Some(tau)) => Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: format!("{pi}/{tau}"),
            reason: "give PI or TAU, not both".to_string(),
        }),
        (None, None) if required => Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: "none".to_string(),
            reason: "PI or TAU is required".to_string(),
        }),
        (pi, tau) => match pi.or(tau) {
            Some(value) => positive(field, value),
            None => Ok(()),
        },
    }
}

fn efficiency(field: &str, eta: f64) -> Result<(), ValidationError> {
    if !eta.is_finite() || eta <= 0.0 || eta > 1.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: eta.to_string(),
            reason: "must be in (0, 1]".to_string(),
        });
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}

fn duplicate(id: &str, context: &str) -> ValidationError {
    ValidationError::DuplicateId {
        id: id.to_string(),
        context: context.to_string(),
    }
}

fn missing(id: &str, context: &str) -> ValidationError {
    ValidationError::MissingReference {
        id: id.to_string(),
        context: context.to_string(),
    }
}
