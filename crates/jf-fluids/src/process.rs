//! Isentropic process library.
//!
//! Every function takes the gas sample entering the process (mass flow,
//! cp and k evaluated at the pre-process stagnation temperature) plus the
//! process parameters, and returns an immutable [`ProcessRecord`]. Folding
//! the record into the next fluid state is the caller's job.

use crate::error::{FluidError, FluidResult};
use serde::{Deserialize, Serialize};

/// Gas sample entering a process.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessInput {
    /// Mass flow [kg/s]
    pub mf: f64,
    /// cp at the inlet stagnation temperature [J/(kg·K)]
    pub cp: f64,
    /// k at the inlet stagnation temperature [-]
    pub k: f64,
    /// Inlet stagnation temperature [K]
    pub t00: f64,
    /// Inlet stagnation pressure [Pa]
    pub p00: f64,
}

/// The one ratio that drives a compression or expansion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioSpec {
    /// Total pressure ratio PI
    Pressure(f64),
    /// Total temperature ratio TAU
    Temperature(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    Absolute,
    Identity,
    Diffusion,
    Compression,
    Expansion,
    HeatExchange,
    Combustion,
}

/// Immutable result of one process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub kind: ProcessKind,
    /// Stagnation temperature before [K]
    pub t00: f64,
    /// Stagnation pressure before [Pa]
    pub p00: f64,
    /// Stagnation temperature after [K]
    pub t01: f64,
    /// Stagnation pressure after [Pa]
    pub p01: f64,
    /// Pressure ratio
    pub pi: f64,
    /// Temperature ratio
    pub tau: f64,
    /// Temperature change [K]
    pub dt: f64,
    /// Work done on the flow [W]; negative when extracted
    pub work: f64,
    /// Heat received by the flow [W]
    pub heat: f64,
}

impl ProcessRecord {
    fn checked(self) -> FluidResult<Self> {
        for (value, what) in [
            (self.t01, "process exit temperature"),
            (self.p01, "process exit pressure"),
            (self.pi, "process pressure ratio"),
            (self.tau, "process temperature ratio"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FluidError::NonPhysical { what });
            }
        }
        if !self.work.is_finite() || !self.heat.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "process energy exchange",
            });
        }
        Ok(self)
    }
}

pub fn check_efficiency(eta: f64) -> FluidResult<()> {
    if !eta.is_finite() || eta <= 0.0 || eta > 1.0 {
        return Err(FluidError::OutOfRange {
            what: "efficiency must be in (0, 1]",
            value: eta,
        });
    }
    Ok(())
}

fn check_input(input: &ProcessInput) -> FluidResult<()> {
    if !input.mf.is_finite() || input.mf < 0.0 {
        return Err(FluidError::NonPhysical { what: "mass flow" });
    }
    if !input.t00.is_finite() || input.t00 <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "stagnation temperature",
        });
    }
    if !input.p00.is_finite() || input.p00 <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "stagnation pressure",
        });
    }
    Ok(())
}

fn check_ratio(value: f64, what: &'static str) -> FluidResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FluidError::OutOfRange { what, value });
    }
    Ok(())
}

/// Isentropic exponent k/(k-1).
fn exponent(k: f64) -> f64 {
    k / (k - 1.0)
}

/// Stagnation state of a gas at Mach `mach` with static `t_static`, `p_static`.
pub fn absolute(k: f64, mach: f64, t_static: f64, p_static: f64) -> FluidResult<ProcessRecord> {
    let tau = 1.0 + (k - 1.0) / 2.0 * mach * mach;
    let pi = tau.powf(exponent(k));
    ProcessRecord {
        kind: ProcessKind::Absolute,
        t00: t_static,
        p00: p_static,
        t01: t_static * tau,
        p01: p_static * pi,
        pi,
        tau,
        dt: t_static * (tau - 1.0),
        work: 0.0,
        heat: 0.0,
    }
    .checked()
}

/// Pass-through with unit ratios.
pub fn identity(input: &ProcessInput) -> FluidResult<ProcessRecord> {
    check_input(input)?;
    Ok(ProcessRecord {
        kind: ProcessKind::Identity,
        t00: input.t00,
        p00: input.p00,
        t01: input.t00,
        p01: input.p00,
        pi: 1.0,
        tau: 1.0,
        dt: 0.0,
        work: 0.0,
        heat: 0.0,
    })
}

/// Diffusion of a free stream at Mach `mach`.
///
/// TAU defaults to 1. Without an explicit PI the total pressure recovery
/// follows from the efficiency:
/// `PI = (1 + eta(k-1)/2 M²)^(k/(k-1)) / (1 + (k-1)/2 M²)^(k/(k-1))`.
pub fn diffusion(
    input: &ProcessInput,
    mach: f64,
    eta: f64,
    pi: Option<f64>,
    tau: Option<f64>,
) -> FluidResult<ProcessRecord> {
    check_input(input)?;
    check_efficiency(eta)?;
    let k = input.k;
    let tau = tau.unwrap_or(1.0);
    check_ratio(tau, "diffusion temperature ratio")?;
    let pi = match pi {
        Some(pi) => pi,
        None => {
            let ram = (1.0 + (k - 1.0) / 2.0 * mach * mach).powf(exponent(k));
            let recovered = (1.0 + eta * (k - 1.0) / 2.0 * mach * mach).powf(exponent(k));
            recovered / ram
        }
    };
    check_ratio(pi, "diffusion pressure ratio")?;
    let dt = input.t00 * (tau - 1.0);
    ProcessRecord {
        kind: ProcessKind::Diffusion,
        t00: input.t00,
        p00: input.p00,
        t01: input.t00 * tau,
        p01: input.p00 * pi,
        pi,
        tau,
        dt,
        work: input.cp * dt * input.mf,
        heat: 0.0,
    }
    .checked()
}

/// Adiabatic compression.
///
/// `TAU = 1 + (PI^((k-1)/k) - 1)/eta`, `PI = (eta(TAU-1) + 1)^(k/(k-1))`.
pub fn compression(input: &ProcessInput, eta: f64, ratio: RatioSpec) -> FluidResult<ProcessRecord> {
    check_input(input)?;
    check_efficiency(eta)?;
    let k = input.k;
    let (pi, tau) = match ratio {
        RatioSpec::Pressure(pi) => {
            check_ratio(pi, "compression pressure ratio")?;
            (pi, 1.0 + (pi.powf(1.0 / exponent(k)) - 1.0) / eta)
        }
        RatioSpec::Temperature(tau) => {
            check_ratio(tau, "compression temperature ratio")?;
            ((eta * (tau - 1.0) + 1.0).powf(exponent(k)), tau)
        }
    };
    let dt = input.t00 * (tau - 1.0);
    ProcessRecord {
        kind: ProcessKind::Compression,
        t00: input.t00,
        p00: input.p00,
        t01: input.t00 * tau,
        p01: input.p00 * pi,
        pi,
        tau,
        dt,
        work: input.cp * dt * input.mf,
        heat: 0.0,
    }
    .checked()
}

/// Adiabatic expansion.
///
/// `TAU = 1 - eta(1 - PI^((k-1)/k))`, `PI = (1 - (1-TAU)/eta)^(k/(k-1))`.
/// The recorded work is negative: energy leaves the flow.
pub fn expansion(input: &ProcessInput, eta: f64, ratio: RatioSpec) -> FluidResult<ProcessRecord> {
    check_input(input)?;
    check_efficiency(eta)?;
    let k = input.k;
    let (pi, tau) = match ratio {
        RatioSpec::Pressure(pi) => {
            check_ratio(pi, "expansion pressure ratio")?;
            (pi, 1.0 - eta * (1.0 - pi.powf(1.0 / exponent(k))))
        }
        RatioSpec::Temperature(tau) => {
            check_ratio(tau, "expansion temperature ratio")?;
            let base = 1.0 - (1.0 - tau) / eta;
            if base <= 0.0 {
                return Err(FluidError::NonPhysical {
                    what: "expansion temperature ratio beyond isentropic limit",
                });
            }
            (base.powf(exponent(k)), tau)
        }
    };
    let dt = input.t00 * (tau - 1.0);
    ProcessRecord {
        kind: ProcessKind::Expansion,
        t00: input.t00,
        p00: input.p00,
        t01: input.t00 * tau,
        p01: input.p00 * pi,
        pi,
        tau,
        dt,
        work: input.cp * dt * input.mf,
        heat: 0.0,
    }
    .checked()
}

/// Heat exchange at a fixed total pressure ratio `pi` (1 for constant pressure).
///
/// `dt = eta*Q/(mf*cp)`; negative `q` cools the flow.
pub fn heat_exchange(input: &ProcessInput, q: f64, eta: f64, pi: f64) -> FluidResult<ProcessRecord> {
    check_input(input)?;
    check_efficiency(eta)?;
    check_ratio(pi, "heat exchange pressure ratio")?;
    if input.mf <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "heat exchange requires a positive mass flow",
        });
    }
    let dt = eta * q / (input.mf * input.cp);
    let t01 = input.t00 + dt;
    ProcessRecord {
        kind: ProcessKind::HeatExchange,
        t00: input.t00,
        p00: input.p00,
        t01,
        p01: input.p00 * pi,
        pi,
        tau: t01 / input.t00,
        dt,
        work: 0.0,
        heat: q,
    }
    .checked()
}

/// Heat release of `fuel_mf` kg/s of fuel with lower heating value `lhv`.
pub fn combustion(
    input: &ProcessInput,
    fuel_mf: f64,
    lhv: f64,
    eta: f64,
    pi: f64,
) -> FluidResult<ProcessRecord> {
    if !fuel_mf.is_finite() || fuel_mf < 0.0 {
        return Err(FluidError::NonPhysical {
            what: "fuel mass flow",
        });
    }
    let mut record = heat_exchange(input, fuel_mf * lhv, eta, pi)?;
    record.kind = ProcessKind::Combustion;
    Ok(record)
}
