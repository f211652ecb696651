//! Working-fluid state threaded through an engine.

use crate::error::{FluidError, FluidResult};
use crate::process::{self, ProcessInput, ProcessRecord};
use crate::property::GasProperties;
use jf_core::units::constants::R_AIR;
use jf_core::units::{MassRate, Pressure, Temperature, Velocity, kgps, k, mps, pa};
use serde::{Deserialize, Serialize};

/// Ideal-gas working fluid.
///
/// Carries the ambient (static) flight condition it entered the engine
/// with, and the current stagnation state which every stage updates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FluidState {
    /// Mass flow [kg/s]
    pub mf: f64,
    pub gas: GasProperties,
    /// Flight Mach number
    pub mach: f64,
    /// Ambient static temperature [K]
    pub t_static: f64,
    /// Ambient static pressure [Pa]
    pub p_static: f64,
    /// Flight velocity [m/s]
    pub v0: f64,
    /// Current stagnation temperature [K]
    pub t0: f64,
    /// Current stagnation pressure [Pa]
    pub p0: f64,
    /// Fuel mass flow contained in `mf` [kg/s]
    pub fuel_mf: f64,
}

impl FluidState {
    /// Gas entering the engine at Mach `mach` through ambient `t_static`, `p_static`.
    ///
    /// The stagnation state starts at the free-stream total conditions.
    pub fn new(
        mf: MassRate,
        gas: GasProperties,
        mach: f64,
        t_static: Temperature,
        p_static: Pressure,
    ) -> FluidResult<Self> {
        let (mf, t_static, p_static) = (mf.value, t_static.value, p_static.value);
        if !mf.is_finite() || mf <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "mass flow must be positive and finite",
            });
        }
        if !t_static.is_finite() || t_static <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        if !p_static.is_finite() || p_static <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        if !mach.is_finite() || mach < 0.0 {
            return Err(FluidError::OutOfRange {
                what: "flight Mach number",
                value: mach,
            });
        }

        let k_static = gas.k_at(t_static)?;
        let free_stream = process::absolute(k_static, mach, t_static, p_static)?;
        Ok(Self {
            mf,
            v0: mach * (k_static * R_AIR * t_static).sqrt(),
            gas,
            mach,
            t_static,
            p_static,
            t0: free_stream.t01,
            p0: free_stream.p01,
            fuel_mf: 0.0,
        })
    }

    pub fn mass_flow(&self) -> MassRate {
        kgps(self.mf)
    }

    pub fn total_temperature(&self) -> Temperature {
        k(self.t0)
    }

    pub fn total_pressure(&self) -> Pressure {
        pa(self.p0)
    }

    pub fn flight_velocity(&self) -> Velocity {
        mps(self.v0)
    }

    pub fn cp(&self) -> FluidResult<f64> {
        self.gas.cp_at(self.t0)
    }

    pub fn k(&self) -> FluidResult<f64> {
        self.gas.k_at(self.t0)
    }

    /// Gas sample with cp and k evaluated at the current stagnation temperature.
    pub fn process_input(&self) -> FluidResult<ProcessInput> {
        Ok(ProcessInput {
            mf: self.mf,
            cp: self.cp()?,
            k: self.k()?,
            t00: self.t0,
            p00: self.p0,
        })
    }

    /// Stagnation state of the undisturbed free stream.
    pub fn absolute(&self) -> FluidResult<ProcessRecord> {
        let k_static = self.gas.k_at(self.t_static)?;
        process::absolute(k_static, self.mach, self.t_static, self.p_static)
    }

    /// Fold a process result into the state.
    pub fn apply(&mut self, record: &ProcessRecord) {
        self.t0 = record.t01;
        self.p0 = record.p01;
    }

    /// Inject fuel: mass flow grows, stagnation state and properties are unaltered.
    pub fn add_fuel(&mut self, fuel_mf: f64) -> FluidResult<()> {
        if !fuel_mf.is_finite() || fuel_mf < 0.0 {
            return Err(FluidError::NonPhysical {
                what: "fuel mass flow",
            });
        }
        self.mf += fuel_mf;
        self.fuel_mf += fuel_mf;
        Ok(())
    }

    /// Split into two copies carrying `fraction` and `1 - fraction` of the flow.
    pub fn divert(&self, fraction: f64) -> FluidResult<(FluidState, FluidState)> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(FluidError::OutOfRange {
                what: "diversion fraction must be in [0, 1]",
                value: fraction,
            });
        }
        let mut first = self.clone();
        let mut second = self.clone();
        first.mf = self.mf * fraction;
        first.fuel_mf = self.fuel_mf * fraction;
        second.mf = self.mf - first.mf;
        second.fuel_mf = self.fuel_mf - first.fuel_mf;
        Ok((first, second))
    }

    /// Adiabatic mixing of two streams.
    ///
    /// Stagnation temperature is weighted by `mf·cp(t0)`, stagnation
    /// pressure by mass flow, and property functions are blended by mass
    /// flow. The ambient flight condition is taken from `a`.
    pub fn mix(a: &FluidState, b: &FluidState) -> FluidResult<FluidState> {
        let mf = a.mf + b.mf;
        if !mf.is_finite() || mf <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "mixed mass flow must be positive",
            });
        }
        let (cpa, cpb) = (a.cp()?, b.cp()?);
        let capacity = a.mf * cpa + b.mf * cpb;
        let t0 = (a.mf * cpa * a.t0 + b.mf * cpb * b.t0) / capacity;
        let p0 = (a.mf * a.p0 + b.mf * b.p0) / mf;
        if !t0.is_finite() || !p0.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "mixed stagnation state",
            });
        }

        Ok(FluidState {
            mf,
            gas: GasProperties::blend(&a.gas, a.mf, &b.gas, b.mf)?,
            mach: a.mach,
            t_static: a.t_static,
            p_static: a.p_static,
            v0: a.v0,
            t0,
            p0,
            fuel_mf: a.fuel_mf + b.fuel_mf,
        })
    }

    /// Specific volume v = R·t0/p0 [m³/kg].
    pub fn specific_volume(&self) -> f64 {
        R_AIR * self.t0 / self.p0
    }

    /// Specific enthalpy h = cp(t0)·t0 [J/kg].
    pub fn specific_enthalpy(&self) -> FluidResult<f64> {
        Ok(self.cp()? * self.t0)
    }

    /// Specific entropy relative to the ambient static state [J/(kg·K)].
    pub fn specific_entropy(&self) -> FluidResult<f64> {
        let cp = self.cp()?;
        Ok(cp * (self.t0 / self.t_static).ln() - R_AIR * (self.p0 / self.p_static).ln())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn diversion_conserves_mass(mf in 0.1_f64..2000.0, f in 0.0_f64..=1.0) {
            let s = FluidState::new(
                kgps(mf),
                GasProperties::constant(1005.0, 1.4),
                0.0,
                k(288.0),
                pa(101_325.0),
            ).unwrap();
            let (a, b) = s.divert(f).unwrap();
            prop_assert!((a.mf + b.mf - mf).abs() <= 1e-9 * mf);
            prop_assert!((a.mf - f * mf).abs() <= 1e-9 * mf);
        }

        #[test]
        fn mixing_identical_states_is_intensive_noop(
            mf in 0.1_f64..500.0,
            t0 in 200.0_f64..2000.0,
            p0 in 1e4_f64..5e6,
        ) {
            let mut s = FluidState::new(
                kgps(mf),
                GasProperties::air_and_products(1000.0),
                0.0,
                k(288.0),
                pa(101_325.0),
            ).unwrap();
            s.t0 = t0;
            s.p0 = p0;
            let m = FluidState::mix(&s, &s).unwrap();
            prop_assert!((m.t0 - t0).abs() <= 1e-9 * t0);
            prop_assert!((m.p0 - p0).abs() <= 1e-9 * p0);
            prop_assert_eq!(&m.gas, &s.gas);
        }
    }
}
