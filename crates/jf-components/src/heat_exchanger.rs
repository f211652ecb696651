//! Heat exchangers: intercooler and bleed duct.

use crate::common::{check_efficiency, check_finite, check_positive};
use crate::error::ComponentResult;
use crate::traits::{EngineComponent, Role, StageContext, StageOutput};
use jf_fluids::{FluidState, process};

/// Removes a fixed heat flow from the stream.
#[derive(Clone, Debug)]
pub struct Intercooler {
    pub name: String,
    /// Heat removed [W]
    pub q_out: f64,
    pub eta: f64,
}

impl Intercooler {
    pub fn new(name: impl Into<String>, q_out: f64, eta: f64) -> ComponentResult<Self> {
        check_finite(q_out, "intercooler heat flow")?;
        check_efficiency(eta, "intercooler efficiency must be in (0,1]")?;
        Ok(Self {
            name: name.into(),
            q_out,
            eta,
        })
    }
}

impl EngineComponent for Intercooler {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        "ic"
    }

    fn role(&self) -> Role {
        Role::HeatSource
    }

    fn transfer(&self, gas: &FluidState, _ctx: &dyn StageContext) -> ComponentResult<StageOutput> {
        let record = process::heat_exchange(&gas.process_input()?, -self.q_out, self.eta, 1.0)?;
        Ok(StageOutput::new(record))
    }
}

/// Duct exchanging heat so the flow leaves at `t01`.
///
/// `Q = (t01 - t0)·mf·cp(t0) / eta`
#[derive(Clone, Debug)]
pub struct BleedDuct {
    pub name: String,
    /// Exit stagnation temperature [K]
    pub t01: f64,
    pub eta: f64,
    pub pi: f64,
}

impl BleedDuct {
    pub fn new(name: impl Into<String>, t01: f64, eta: f64) -> ComponentResult<Self> {
        check_positive(t01, "bleed duct exit temperature must be positive")?;
        check_efficiency(eta, "bleed duct efficiency must be in (0,1]")?;
        Ok(Self {
            name: name.into(),
            t01,
            eta,
            pi: 1.0,
        })
    }

    pub fn with_pressure_ratio(mut self, pi: f64) -> ComponentResult<Self> {
        check_positive(pi, "bleed duct pressure ratio must be positive")?;
        self.pi = pi;
        Ok(self)
    }
}

impl EngineComponent for BleedDuct {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        "bd"
    }

    fn role(&self) -> Role {
        Role::HeatSource
    }

    fn transfer(&self, gas: &FluidState, _ctx: &dyn StageContext) -> ComponentResult<StageOutput> {
        let input = gas.process_input()?;
        let q = (self.t01 - gas.t0) * gas.mf * input.cp / self.eta;
        let record = process::heat_exchange(&input, q, self.eta, self.pi)?;
        Ok(StageOutput::new(record))
    }
}
