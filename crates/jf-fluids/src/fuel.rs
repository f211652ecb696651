//! Fuel definitions.

use crate::error::{FluidError, FluidResult};
use jf_core::units::constants::LHV_JET_A;
use serde::{Deserialize, Serialize};

/// Fuel injected by a combustor or afterburner.
///
/// Only the lower heating value matters to the cycle; the injected mass
/// flow is resolved per burner at run time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fuel {
    /// Lower heating value [J/kg]
    pub lhv: f64,
}

impl Fuel {
    pub fn new(lhv: f64) -> FluidResult<Self> {
        if !lhv.is_finite() || lhv <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "fuel lower heating value must be positive and finite",
            });
        }
        Ok(Self { lhv })
    }

    /// Kerosene-type jet fuel (LHV = 43 MJ/kg).
    pub fn jet_a() -> Self {
        Self { lhv: LHV_JET_A }
    }

    /// Heat released by burning `mf` kg/s of this fuel [W].
    pub fn heat_release(&self, mf: f64) -> f64 {
        mf * self.lhv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_release_scales_with_flow() {
        let fuel = Fuel::jet_a();
        assert_eq!(fuel.heat_release(2.0), 86.0e6);
    }

    #[test]
    fn rejects_non_positive_lhv() {
        assert!(Fuel::new(0.0).is_err());
        assert!(Fuel::new(f64::NAN).is_err());
        assert!(Fuel::new(43.0e6).is_ok());
    }
}
