//! Shaft power sinks.

use crate::common::{check_efficiency, check_positive};
use crate::error::ComponentResult;
use crate::traits::{EngineComponent, Role, StageContext, StageOutput};
use jf_fluids::{FluidState, process};

/// Aircraft electrical system powered by a shaft-driven generator.
///
/// Demands `w / (eta_generator · eta_distribution)` of its shaft. It is
/// normally linked to a shaft only; placed on a stream it leaves the flow
/// untouched.
#[derive(Clone, Debug)]
pub struct ElectricalLoad {
    pub name: String,
    /// Electrical power required [W]
    pub w: f64,
    pub eta_generator: f64,
    pub eta_distribution: f64,
}

impl ElectricalLoad {
    pub fn new(
        name: impl Into<String>,
        w: f64,
        eta_generator: f64,
        eta_distribution: f64,
    ) -> ComponentResult<Self> {
        check_positive(w, "electrical load must be positive")?;
        check_efficiency(eta_generator, "generator efficiency must be in (0,1]")?;
        check_efficiency(eta_distribution, "distribution efficiency must be in (0,1]")?;
        Ok(Self {
            name: name.into(),
            w,
            eta_generator,
            eta_distribution,
        })
    }

    /// Shaft work drawn [W].
    pub fn required_work(&self) -> f64 {
        self.w / self.eta_generator / self.eta_distribution
    }
}

impl EngineComponent for ElectricalLoad {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        "el"
    }

    fn role(&self) -> Role {
        Role::WorkConsumer
    }

    fn transfer(&self, gas: &FluidState, _ctx: &dyn StageContext) -> ComponentResult<StageOutput> {
        Ok(StageOutput::new(process::identity(&gas.process_input()?)?))
    }

    fn fixed_work_demand(&self) -> Option<f64> {
        Some(self.required_work())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demand_includes_conversion_losses() {
        let el = ElectricalLoad::new("avionics", 90_000.0, 0.9, 0.8).unwrap();
        assert!((el.required_work() - 125_000.0).abs() < 1e-9);
        assert_eq!(el.fixed_work_demand(), Some(el.required_work()));
        assert_eq!(el.role(), Role::WorkConsumer);
    }

    #[test]
    fn rejects_bad_efficiency() {
        assert!(ElectricalLoad::new("el", 1.0, 0.0, 1.0).is_err());
        assert!(ElectricalLoad::new("el", -1.0, 1.0, 1.0).is_err());
    }
}
