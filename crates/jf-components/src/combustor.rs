//! Combustion chamber and afterburner.

use crate::common::{check_efficiency, check_optional_positive, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{EngineComponent, Role, StageContext, StageOutput};
use jf_fluids::{FluidState, Fuel, ProcessInput, process};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombustorKind {
    /// Main burner; always burns at least enough to power downstream turbines.
    Chamber,
    /// Reheat; burns only to a fixed schedule or target temperature.
    Afterburner,
}

/// Heat addition by burning fuel.
///
/// ## Fuel resolution
///
/// The injected fuel flow is the largest of the candidates that apply:
/// - chamber only: `W_downstream / (eta·LHV)`, the flow whose heat covers
///   every turbine downstream
/// - a fixed fuel flow
/// - the flow reaching the target exit temperature `t01`:
///   `dt·mf·cp(t01) / (eta·LHV - dt·cp(t01))`
///
/// ## Heat addition
///
/// Two passes approximate the temperature dependence of cp: a provisional
/// exit temperature with cp at the entry temperature, then the final one
/// with cp at that provisional temperature. This is not iterated to
/// convergence.
#[derive(Clone, Debug)]
pub struct Combustor {
    pub name: String,
    pub kind: CombustorKind,
    pub fuel: Fuel,
    /// Combustion efficiency (0 < eta <= 1)
    pub eta: f64,
    /// Total pressure ratio across the burner
    pub pi: f64,
    /// Target exit stagnation temperature [K]
    pub t01: Option<f64>,
    /// Fixed fuel flow [kg/s]
    pub fuel_mf: Option<f64>,
}

impl Combustor {
    fn build(
        name: impl Into<String>,
        kind: CombustorKind,
        fuel: Fuel,
        eta: f64,
    ) -> ComponentResult<Self> {
        check_efficiency(eta, "combustion efficiency must be in (0,1]")?;
        check_positive(fuel.lhv, "fuel heating value must be positive")?;
        Ok(Self {
            name: name.into(),
            kind,
            fuel,
            eta,
            pi: 1.0,
            t01: None,
            fuel_mf: None,
        })
    }

    pub fn chamber(name: impl Into<String>, fuel: Fuel, eta: f64) -> ComponentResult<Self> {
        Self::build(name, CombustorKind::Chamber, fuel, eta)
    }

    pub fn afterburner(name: impl Into<String>, fuel: Fuel, eta: f64) -> ComponentResult<Self> {
        Self::build(name, CombustorKind::Afterburner, fuel, eta)
    }

    pub fn with_exit_temperature(mut self, t01: f64) -> ComponentResult<Self> {
        check_positive(t01, "burner exit temperature must be positive")?;
        self.t01 = Some(t01);
        Ok(self)
    }

    pub fn with_fuel_flow(mut self, fuel_mf: f64) -> ComponentResult<Self> {
        check_positive(fuel_mf, "burner fuel flow must be positive")?;
        self.fuel_mf = Some(fuel_mf);
        Ok(self)
    }

    pub fn with_pressure_ratio(mut self, pi: f64) -> ComponentResult<Self> {
        check_optional_positive(Some(pi), "burner pressure ratio must be positive")?;
        self.pi = pi;
        Ok(self)
    }

    /// Fuel flow raising `gas` to `t01`; zero when it is already hotter.
    pub fn fuel_for_temperature(&self, gas: &FluidState, t01: f64) -> ComponentResult<f64> {
        let dt = t01 - gas.t0;
        if dt <= 0.0 {
            return Ok(0.0);
        }
        let cp = gas.gas.cp_at(t01)?;
        let margin = self.eta * self.fuel.lhv - dt * cp;
        if margin <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "burner exit temperature unreachable with this fuel",
            });
        }
        Ok(dt * gas.mf * cp / margin)
    }

    /// Fuel flow whose heat release covers `work` [W].
    pub fn fuel_for_work(&self, work: f64) -> f64 {
        work / (self.eta * self.fuel.lhv)
    }

    /// Resolve the injected fuel flow for `gas`.
    pub fn resolve_fuel(&self, gas: &FluidState, ctx: &dyn StageContext) -> ComponentResult<f64> {
        let mut candidates = Vec::with_capacity(3);
        if self.kind == CombustorKind::Chamber {
            candidates.push(self.fuel_for_work(ctx.downstream_work_demand()?));
        }
        if let Some(fuel_mf) = self.fuel_mf {
            candidates.push(fuel_mf);
        }
        if let Some(t01) = self.t01 {
            candidates.push(self.fuel_for_temperature(gas, t01)?);
        }
        candidates
            .into_iter()
            .reduce(f64::max)
            .ok_or(ComponentError::MissingFuelSchedule)
    }
}

impl EngineComponent for Combustor {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        match self.kind {
            CombustorKind::Chamber => "cc",
            CombustorKind::Afterburner => "ab",
        }
    }

    fn role(&self) -> Role {
        Role::HeatSource
    }

    fn transfer(&self, gas: &FluidState, ctx: &dyn StageContext) -> ComponentResult<StageOutput> {
        let fuel_mf = self.resolve_fuel(gas, ctx)?;

        let mut fueled = gas.clone();
        fueled.add_fuel(fuel_mf)?;
        let cold = fueled.process_input()?;

        let provisional = process::combustion(&cold, fuel_mf, self.fuel.lhv, self.eta, 1.0)?;
        let hot = ProcessInput {
            cp: fueled.gas.cp_at(provisional.t01)?,
            ..cold
        };
        let record = process::combustion(&hot, fuel_mf, self.fuel.lhv, self.eta, self.pi)?;

        Ok(StageOutput {
            record,
            fuel_mf,
            choked: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NoContext;
    use jf_core::units::{k, kgps, pa};
    use jf_fluids::GasProperties;

    struct Downstream(f64);

    impl StageContext for Downstream {
        fn shaft_work_demand(&self) -> ComponentResult<f64> {
            Ok(0.0)
        }

        fn downstream_work_demand(&self) -> ComponentResult<f64> {
            Ok(self.0)
        }
    }

    fn compressed() -> FluidState {
        let mut gas = FluidState::new(
            kgps(160.0),
            GasProperties::air_and_products(600.0),
            0.0,
            k(288.0),
            pa(101_325.0),
        )
        .unwrap();
        gas.t0 = 711.4819;
        gas.p0 = 1_491_504.0;
        gas
    }

    #[test]
    fn chamber_reaches_target_temperature() {
        let cc = Combustor::chamber("cc", Fuel::jet_a(), 0.97)
            .unwrap()
            .with_exit_temperature(1450.0)
            .unwrap();
        let out = cc.transfer(&compressed(), &Downstream(68.0e6)).unwrap();
        // cp is constant above 600 K so both passes agree
        assert!((out.record.t01 - 1450.0).abs() < 1e-6);
        assert!(out.fuel_mf > 3.0 && out.fuel_mf < 3.4);
        assert!((out.record.heat - out.fuel_mf * 43.0e6).abs() < 1e-3);
    }

    #[test]
    fn chamber_burns_at_least_downstream_demand() {
        let cc = Combustor::chamber("cc", Fuel::jet_a(), 1.0)
            .unwrap()
            .with_exit_temperature(800.0)
            .unwrap();
        let demand = 200.0e6;
        let out = cc.transfer(&compressed(), &Downstream(demand)).unwrap();
        assert!((out.fuel_mf - demand / 43.0e6).abs() < 1e-12);
        assert!(out.record.t01 > 800.0);
    }

    #[test]
    fn fixed_fuel_wins_when_larger() {
        let cc = Combustor::chamber("cc", Fuel::jet_a(), 1.0)
            .unwrap()
            .with_fuel_flow(5.0)
            .unwrap();
        let out = cc.transfer(&compressed(), &Downstream(1.0e6)).unwrap();
        assert_eq!(out.fuel_mf, 5.0);
    }

    #[test]
    fn two_pass_uses_hot_specific_heat() {
        // Entry below the step, exit above it
        let mut gas = compressed();
        gas.t0 = 500.0;
        let cc = Combustor::afterburner("ab", Fuel::jet_a(), 1.0)
            .unwrap()
            .with_fuel_flow(2.0)
            .unwrap();
        let out = cc.transfer(&gas, &NoContext).unwrap();
        let expected = 500.0 + 2.0 * 43.0e6 / (162.0 * 1150.0);
        assert!((out.record.t01 - expected).abs() < 1e-9);
    }

    #[test]
    fn afterburner_without_schedule_fails() {
        let ab = Combustor::afterburner("ab", Fuel::jet_a(), 0.95).unwrap();
        assert_eq!(
            ab.transfer(&compressed(), &NoContext),
            Err(ComponentError::MissingFuelSchedule)
        );
    }

    #[test]
    fn pressure_ratio_applies() {
        let cc = Combustor::chamber("cc", Fuel::jet_a(), 0.985)
            .unwrap()
            .with_exit_temperature(1838.0)
            .unwrap()
            .with_pressure_ratio(0.99)
            .unwrap();
        let gas = compressed();
        let out = cc.transfer(&gas, &NoContext).unwrap();
        assert!((out.record.p01 - 0.99 * gas.p0).abs() < 1e-6);
        assert_eq!(cc.code(), "cc");
    }
}
