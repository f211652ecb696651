//! Exhaust nozzle with choking.

use crate::common::{check_efficiency, check_optional_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{EngineComponent, Role, StageContext, StageOutput};
use jf_fluids::{FluidState, RatioSpec, process};

/// Inverse critical pressure ratio `p_before/p_after` past which the
/// nozzle throat goes sonic:
///
/// ```text
/// 1 / (1 - (1/eta)(k-1)/(k+1))^(k/(k-1))
/// ```
pub fn inv_pi_crit(k: f64, eta: f64) -> ComponentResult<f64> {
    let base = 1.0 - (k - 1.0) / (k + 1.0) / eta;
    if base <= 0.0 || !base.is_finite() {
        return Err(ComponentError::NonPhysical {
            what: "nozzle efficiency too low for a critical pressure ratio",
        });
    }
    Ok(1.0 / base.powf(k / (k - 1.0)))
}

/// Adiabatic exhaust nozzle.
///
/// The demanded inverse pressure ratio is `p0/p_ambient`, or `1/pi` when a
/// ratio is fixed. Beyond the critical ratio the nozzle chokes and the
/// expansion stops at the critical ratio.
#[derive(Clone, Debug)]
pub struct Nozzle {
    pub name: String,
    pub eta: f64,
    pub pi: Option<f64>,
}

impl Nozzle {
    pub fn new(name: impl Into<String>, eta: f64) -> ComponentResult<Self> {
        check_efficiency(eta, "nozzle efficiency must be in (0,1]")?;
        Ok(Self {
            name: name.into(),
            eta,
            pi: None,
        })
    }

    pub fn with_pressure_ratio(mut self, pi: f64) -> ComponentResult<Self> {
        check_optional_positive(Some(pi), "nozzle pressure ratio must be positive")?;
        self.pi = Some(pi);
        Ok(self)
    }

    /// Effective pressure ratio and choking flag for the flow entering the nozzle.
    pub fn pressure_ratio(&self, gas: &FluidState) -> ComponentResult<(f64, bool)> {
        let inv_demanded = match self.pi {
            Some(pi) => 1.0 / pi,
            None => gas.p0 / gas.p_static,
        };
        let inv_crit = inv_pi_crit(gas.k()?, self.eta)?;
        if inv_demanded > inv_crit {
            Ok((1.0 / inv_crit, true))
        } else {
            Ok((1.0 / inv_demanded, false))
        }
    }
}

impl EngineComponent for Nozzle {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        "nz"
    }

    fn role(&self) -> Role {
        Role::Passive
    }

    fn transfer(&self, gas: &FluidState, _ctx: &dyn StageContext) -> ComponentResult<StageOutput> {
        let (pi, choked) = self.pressure_ratio(gas)?;
        let record = process::expansion(&gas.process_input()?, self.eta, RatioSpec::Pressure(pi))?;
        Ok(StageOutput {
            record,
            fuel_mf: 0.0,
            choked,
        })
    }

    fn is_exhaust(&self) -> bool {
        true
    }
}
