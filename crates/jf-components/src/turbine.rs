//! Turbine component model.

use crate::common::{check_efficiency, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{EngineComponent, Role, StageContext, StageOutput};
use jf_fluids::{FluidState, RatioSpec, process};

/// Adiabatic turbine extracting shaft work from the flow.
///
/// ## Model
///
/// With a ratio given, the standard expansion relation applies:
///
/// ```text
/// TAU = 1 - eta(1 - PI^((k-1)/k))
/// ```
///
/// Without one the turbine sizes itself to its shaft: it takes exactly
/// the work the shaft still needs,
///
/// ```text
/// TAU = 1 - W_required / (mf * cp(t0) * t0)
/// ```
///
/// ## Sign Conventions
///
/// - The recorded work is NEGATIVE (power extracted from fluid to shaft)
#[derive(Clone, Debug)]
pub struct Turbine {
    /// Component name for debugging
    pub name: String,
    /// Isentropic efficiency (0 < eta <= 1)
    pub eta: f64,
    /// Fixed PI or TAU; `None` sizes the turbine from shaft balance
    pub ratio: Option<RatioSpec>,
}

impl Turbine {
    /// Create a turbine with a fixed pressure or temperature ratio.
    ///
    /// # Errors
    /// Returns error if parameters are out of physical bounds.
    pub fn new(name: impl Into<String>, eta: f64, ratio: RatioSpec) -> ComponentResult<Self> {
        let turbine = Self::self_sizing(name, eta)?;
        match ratio {
            RatioSpec::Pressure(pi) => check_positive(pi, "turbine pressure ratio must be positive")?,
            RatioSpec::Temperature(tau) => {
                check_positive(tau, "turbine temperature ratio must be positive")?
            }
        }
        Ok(Self {
            ratio: Some(ratio),
            ..turbine
        })
    }

    /// Create a turbine that supplies whatever its shaft demands.
    pub fn self_sizing(name: impl Into<String>, eta: f64) -> ComponentResult<Self> {
        check_efficiency(eta, "turbine efficiency must be in (0,1]")?;
        Ok(Self {
            name: name.into(),
            eta,
            ratio: None,
        })
    }

    /// Temperature ratio that extracts `work` [W] from `gas`.
    pub fn tau_for_work(gas: &FluidState, work: f64) -> ComponentResult<f64> {
        let tau = 1.0 - work / (gas.mf * gas.cp()? * gas.t0);
        if !tau.is_finite() || tau <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "shaft demand exceeds the enthalpy of the turbine flow",
            });
        }
        Ok(tau)
    }
}

impl EngineComponent for Turbine {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        "tb"
    }

    fn role(&self) -> Role {
        Role::WorkProducer
    }

    fn transfer(&self, gas: &FluidState, ctx: &dyn StageContext) -> ComponentResult<StageOutput> {
        let ratio = match self.ratio {
            Some(ratio) => ratio,
            None => RatioSpec::Temperature(Self::tau_for_work(gas, ctx.shaft_work_demand()?)?),
        };
        let record = process::expansion(&gas.process_input()?, self.eta, ratio)?;
        Ok(StageOutput::new(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NoContext;
    use jf_core::units::{k, kgps, pa};
    use jf_fluids::GasProperties;

    struct FixedDemand(f64);

    impl StageContext for FixedDemand {
        fn shaft_work_demand(&self) -> ComponentResult<f64> {
            Ok(self.0)
        }

        fn downstream_work_demand(&self) -> ComponentResult<f64> {
            Ok(self.0)
        }
    }

    fn hot_gas() -> FluidState {
        let mut gas = FluidState::new(
            kgps(163.3),
            GasProperties::air_and_products(600.0),
            0.0,
            k(288.0),
            pa(101_325.0),
        )
        .unwrap();
        gas.t0 = 1450.0;
        gas.p0 = 1.49e6;
        gas
    }

    #[test]
    fn self_sizing_matches_demand_exactly() {
        let gas = hot_gas();
        let demand = 41.8e6;
        let t = Turbine::self_sizing("hpt", 0.9).unwrap();
        let out = t.transfer(&gas, &FixedDemand(demand)).unwrap();
        assert!((-out.record.work - demand).abs() < 1e-6 * demand);
        assert!(out.record.pi < 1.0);
    }

    #[test]
    fn fixed_ratio_ignores_shaft() {
        let t = Turbine::new("pt", 0.9, RatioSpec::Pressure(0.5)).unwrap();
        let out = t.transfer(&hot_gas(), &NoContext).unwrap();
        assert!(out.record.work < 0.0);
        assert!((out.record.p01 - 0.745e6).abs() < 1e-3);
    }

    #[test]
    fn self_sizing_without_shaft_fails() {
        let t = Turbine::self_sizing("lpt", 0.9).unwrap();
        assert!(matches!(
            t.transfer(&hot_gas(), &NoContext),
            Err(ComponentError::NotOnShaft { .. })
        ));
    }

    #[test]
    fn excessive_demand_is_non_physical() {
        let t = Turbine::self_sizing("lpt", 0.9).unwrap();
        let gas = hot_gas();
        let too_much = gas.mf * 1150.0 * gas.t0 * 1.1;
        assert!(matches!(
            t.transfer(&gas, &FixedDemand(too_much)),
            Err(ComponentError::NonPhysical { .. })
        ));
    }
}
