//! Work-consuming rotors: compressors, fans and propellers.

use crate::common::{check_efficiency, check_positive};
use crate::error::ComponentResult;
use crate::traits::{EngineComponent, Role, StageContext, StageOutput};
use jf_fluids::{FluidState, RatioSpec, process};

fn check_ratio(ratio: RatioSpec) -> ComponentResult<()> {
    match ratio {
        RatioSpec::Pressure(pi) => check_positive(pi, "pressure ratio must be positive"),
        RatioSpec::Temperature(tau) => check_positive(tau, "temperature ratio must be positive"),
    }
}

/// Adiabatic compressor.
///
/// Exactly one of PI or TAU drives the stage; the other follows from the
/// isentropic efficiency. Work absorbed: `cp·mf·t0·(TAU - 1)`.
#[derive(Clone, Debug)]
pub struct Compressor {
    pub name: String,
    pub eta: f64,
    pub ratio: RatioSpec,
}

impl Compressor {
    pub fn new(name: impl Into<String>, eta: f64, ratio: RatioSpec) -> ComponentResult<Self> {
        check_efficiency(eta, "compressor efficiency must be in (0,1]")?;
        check_ratio(ratio)?;
        Ok(Self {
            name: name.into(),
            eta,
            ratio,
        })
    }
}

impl EngineComponent for Compressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        "cp"
    }

    fn role(&self) -> Role {
        Role::WorkConsumer
    }

    fn transfer(&self, gas: &FluidState, _ctx: &dyn StageContext) -> ComponentResult<StageOutput> {
        let record = process::compression(&gas.process_input()?, self.eta, self.ratio)?;
        Ok(StageOutput::new(record))
    }
}

/// Ducted fan. Compresses like a compressor, but is driven through the
/// shaft gearbox.
#[derive(Clone, Debug)]
pub struct Fan {
    pub name: String,
    pub eta: f64,
    pub ratio: RatioSpec,
}

impl Fan {
    pub fn new(name: impl Into<String>, eta: f64, ratio: RatioSpec) -> ComponentResult<Self> {
        check_efficiency(eta, "fan efficiency must be in (0,1]")?;
        check_ratio(ratio)?;
        Ok(Self {
            name: name.into(),
            eta,
            ratio,
        })
    }
}

impl EngineComponent for Fan {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        "fn"
    }

    fn role(&self) -> Role {
        Role::WorkConsumer
    }

    fn transfer(&self, gas: &FluidState, _ctx: &dyn StageContext) -> ComponentResult<StageOutput> {
        let record = process::compression(&gas.process_input()?, self.eta, self.ratio)?;
        Ok(StageOutput::new(record))
    }

    fn geared(&self) -> bool {
        true
    }
}

/// Propeller or propfan absorbing a fixed brake power `w`.
///
/// The core flow passes through a reversible compression at `ratio`
/// (PI = 1 by default); the recorded work is the brake power. Thrust is
/// delivered directly: `w·eta_prop/v0`.
#[derive(Clone, Debug)]
pub struct Propeller {
    pub name: String,
    /// Propulsive efficiency
    pub eta_prop: f64,
    /// Brake power [W]
    pub w: f64,
    pub ratio: RatioSpec,
    /// Unducted fan rather than a conventional propeller.
    pub propfan: bool,
}

impl Propeller {
    pub fn new(name: impl Into<String>, eta_prop: f64, w: f64) -> ComponentResult<Self> {
        check_efficiency(eta_prop, "propeller efficiency must be in (0,1]")?;
        check_positive(w, "propeller brake power must be positive")?;
        Ok(Self {
            name: name.into(),
            eta_prop,
            w,
            ratio: RatioSpec::Pressure(1.0),
            propfan: false,
        })
    }

    pub fn propfan(name: impl Into<String>, eta_prop: f64, w: f64) -> ComponentResult<Self> {
        Ok(Self {
            propfan: true,
            ..Self::new(name, eta_prop, w)?
        })
    }

    pub fn with_ratio(mut self, ratio: RatioSpec) -> ComponentResult<Self> {
        check_ratio(ratio)?;
        self.ratio = ratio;
        Ok(self)
    }
}

impl EngineComponent for Propeller {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        if self.propfan { "pf" } else { "pr" }
    }

    fn role(&self) -> Role {
        Role::WorkConsumer
    }

    fn transfer(&self, gas: &FluidState, _ctx: &dyn StageContext) -> ComponentResult<StageOutput> {
        let mut record = process::compression(&gas.process_input()?, 1.0, self.ratio)?;
        record.work = self.w;
        Ok(StageOutput::new(record))
    }

    fn geared(&self) -> bool {
        true
    }

    fn thrust_power(&self) -> Option<f64> {
        Some(self.w * self.eta_prop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NoContext;
    use jf_core::units::{k, kgps, pa};
    use jf_fluids::GasProperties;

    fn core_flow() -> FluidState {
        FluidState::new(
            kgps(160.0),
            GasProperties::air_and_products(600.0),
            0.0,
            k(288.0),
            pa(93_219.0),
        )
        .unwrap()
    }

    #[test]
    fn compressor_pressure_ratio_four() {
        let c = Compressor::new("lpc", 0.85, RatioSpec::Pressure(4.0)).unwrap();
        let out = c.transfer(&core_flow(), &NoContext).unwrap();
        assert!((out.record.t01 - 452.6663).abs() < 0.01);
        assert!((out.record.work - 160.0 * 1000.0 * (out.record.t01 - 288.0)).abs() < 1e-3);
        assert_eq!(c.role(), Role::WorkConsumer);
        assert!(!c.geared());
    }

    #[test]
    fn fan_is_geared() {
        let f = Fan::new("fan", 0.94, RatioSpec::Pressure(1.54)).unwrap();
        assert!(f.geared());
        assert_eq!(f.code(), "fn");
    }

    #[test]
    fn propeller_records_brake_power() {
        let p = Propeller::new("prop", 0.8, 2.0e6).unwrap();
        let gas = core_flow();
        let out = p.transfer(&gas, &NoContext).unwrap();
        assert_eq!(out.record.work, 2.0e6);
        assert_eq!(out.record.p01, gas.p0);
        assert_eq!(p.thrust_power(), Some(1.6e6));
        assert_eq!(p.code(), "pr");
        assert_eq!(Propeller::propfan("pf", 0.8, 1.0).unwrap().code(), "pf");
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(Compressor::new("c", 0.0, RatioSpec::Pressure(4.0)).is_err());
        assert!(Compressor::new("c", 0.8, RatioSpec::Pressure(-1.0)).is_err());
        assert!(Propeller::new("p", 0.8, 0.0).is_err());
    }
}
