//! Intake and inlet models.

use crate::common::{check_efficiency, check_optional_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{EngineComponent, Role, StageContext, StageOutput};
use jf_fluids::{FluidState, process};

/// Airflow fed directly to the engine without losses.
#[derive(Clone, Debug)]
pub struct Intake {
    pub name: String,
}

impl Intake {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl EngineComponent for Intake {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        "it"
    }

    fn role(&self) -> Role {
        Role::Passive
    }

    fn transfer(&self, gas: &FluidState, _ctx: &dyn StageContext) -> ComponentResult<StageOutput> {
        let record = process::diffusion(&gas.process_input()?, gas.mach, 1.0, Some(1.0), Some(1.0))?;
        Ok(StageOutput::new(record))
    }
}

/// Adiabatic diffuser.
///
/// Total pressure recovery is either fixed through `pi` or derived from
/// the diffusion efficiency at the flight Mach number. Total temperature
/// is held unless `tau` says otherwise.
#[derive(Clone, Debug)]
pub struct Inlet {
    pub name: String,
    pub eta: Option<f64>,
    pub pi: Option<f64>,
    pub tau: Option<f64>,
}

impl Inlet {
    pub fn new(
        name: impl Into<String>,
        eta: Option<f64>,
        pi: Option<f64>,
        tau: Option<f64>,
    ) -> ComponentResult<Self> {
        if eta.is_none() && pi.is_none() {
            return Err(ComponentError::MissingRatio { component: "inlet" });
        }
        if let Some(eta) = eta {
            check_efficiency(eta, "inlet efficiency must be in (0,1]")?;
        }
        check_optional_positive(pi, "inlet pressure ratio must be positive")?;
        check_optional_positive(tau, "inlet temperature ratio must be positive")?;
        Ok(Self {
            name: name.into(),
            eta,
            pi,
            tau,
        })
    }

    /// Inlet with a fixed total pressure recovery.
    pub fn with_recovery(name: impl Into<String>, pi: f64) -> ComponentResult<Self> {
        Self::new(name, None, Some(pi), None)
    }
}

impl EngineComponent for Inlet {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        "il"
    }

    fn role(&self) -> Role {
        Role::Passive
    }

    fn transfer(&self, gas: &FluidState, _ctx: &dyn StageContext) -> ComponentResult<StageOutput> {
        // eta only enters when pi is derived
        let eta = self.eta.unwrap_or(1.0);
        let record = process::diffusion(&gas.process_input()?, gas.mach, eta, self.pi, self.tau)?;
        Ok(StageOutput::new(record))
    }
}
