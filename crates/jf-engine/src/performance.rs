//! Thrust, power and efficiency metrics of a run system.
//!
//! Every exhausting stream (a leaf stream whose last stage is a nozzle)
//! contributes flow thrust and jet power. System metrics sum over those
//! streams; fuel, heat and work sum over every stage that ran.
//!
//! ```text
//! v      = sqrt(k·R·t)                        choked
//!        = sqrt(2·cp·(t_in - t_out))          otherwise
//! A      = mf·R·t0 / (p0·v)
//! F      = mf·(v - v0) + [choked] A·(p0 - p_static)
//! P_jet  = ½·(mf·v² - (mf - mf_fuel)·v0²)
//! eta_p  = 2 / (1 + v/v0)
//! ```

use jf_components::Role;
use jf_core::constants::R_AIR;
use jf_core::units::{Area, Force, MassRate, Power, Velocity, kgps, m2, mps, newtons, watts};
use jf_core::{StreamId, finite_ratio};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::snapshot::StageSnapshot;
use crate::system::System;

/// Exhaust conditions and thrust of one stream.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamPerformance {
    pub stream: StreamId,
    pub path: String,
    pub choked: bool,
    pub exit_velocity: Velocity,
    pub exit_area: Area,
    pub thrust_flow: Force,
    /// Thrust of propellers placed on this stream
    pub thrust_prop: Force,
    pub power_jet: Power,
    pub power_available: Power,
    pub propulsive_efficiency: f64,
    /// Exhaust mass flow, fuel included
    pub mass_flow: MassRate,
    /// Fuel carried by the exhaust
    pub fuel_mass_flow: MassRate,
}

impl StreamPerformance {
    pub fn thrust(&self) -> Force {
        self.thrust_flow + self.thrust_prop
    }
}

/// Serializable record of every system-level metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// [kg/s]
    pub fuel_mass_flow: f64,
    /// [N]
    pub thrust_flow: f64,
    /// [N]
    pub thrust_prop: f64,
    /// [N]
    pub thrust: f64,
    /// Specific fuel consumption [kg/(N·s)]; absent without flow thrust
    pub sfc: Option<f64>,
    /// [W]
    pub heat_input: f64,
    /// [W]
    pub work_required: f64,
    /// [W]
    pub power_jet: f64,
    /// [W]
    pub power_available: f64,
    pub propulsive_efficiency: f64,
    /// Absent when no heat was added
    pub thermal_efficiency: Option<f64>,
    pub overall_efficiency: Option<f64>,
    pub exhausts: Vec<ExhaustSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExhaustSummary {
    pub path: String,
    pub choked: bool,
    /// [m/s]
    pub exit_velocity: f64,
    /// [m²]
    pub exit_area: f64,
    /// [N]
    pub thrust_flow: f64,
}

fn propeller_thrust<'a>(
    system: &System,
    stages: impl IntoIterator<Item = &'a StageSnapshot>,
) -> EngineResult<f64> {
    let mut thrust = 0.0;
    for stage in stages {
        let Some(power) = system.component(stage.component)?.thrust_power() else {
            continue;
        };
        let v0 = stage.state.v0;
        if v0 <= 0.0 {
            return Err(EngineError::StaticPropellerThrust);
        }
        thrust += power / v0;
    }
    Ok(thrust)
}

impl System {
    fn require_run(&self) -> EngineResult<()> {
        if self.has_run() {
            Ok(())
        } else {
            Err(EngineError::NotRun)
        }
    }

    /// Leaf streams ending in an exhausting component.
    ///
    /// Leaf streams without one are skipped with a warning.
    pub fn exhaust_streams(&self) -> EngineResult<Vec<StreamId>> {
        let mut out = Vec::new();
        for stream in self.streams() {
            if !self.graph().is_leaf(stream.id)? {
                continue;
            }
            let exhausts = match stream.components.last() {
                Some(&last) => self.component(last)?.is_exhaust(),
                None => false,
            };
            if exhausts {
                out.push(stream.id);
            } else {
                warn!(stream = %stream.path, "leaf stream has no nozzle; excluded from thrust");
            }
        }
        Ok(out)
    }

    /// Exhaust conditions and thrust of `stream`.
    pub fn stream_performance(&self, stream: StreamId) -> EngineResult<StreamPerformance> {
        let stages = self.stream_stages(stream)?;
        let s = self.stream(stream)?;
        let nozzle = stages
            .last()
            .copied()
            .filter(|stage| self.component(stage.component).is_ok_and(|c| c.is_exhaust()))
            .ok_or(EngineError::InvalidArg {
                what: "stream does not end in a nozzle",
            })?;
        let gas = s.outlet.as_ref().ok_or(EngineError::NotRun)?;

        let (t_in, t_out) = (nozzle.record.t00, nozzle.record.t01);
        let v = if nozzle.choked {
            (gas.gas.k_at(t_in)? * R_AIR * t_in).sqrt()
        } else {
            let dt = t_in - t_out;
            if dt <= 0.0 {
                return Err(EngineError::NonPositiveEnthalpyDrop {
                    stream: s.path.clone(),
                    dt,
                });
            }
            (2.0 * gas.gas.cp_at(t_in)? * dt).sqrt()
        };

        let area = gas.mf * R_AIR * gas.t0 / (gas.p0 * v);
        let mut thrust_flow = gas.mf * (v - gas.v0);
        if nozzle.choked {
            thrust_flow += area * (gas.p0 - gas.p_static);
        }

        let power_jet = 0.5 * (gas.mf * v * v - (gas.mf - gas.fuel_mf) * gas.v0 * gas.v0);
        let propulsive_efficiency = if gas.v0 > 0.0 {
            2.0 / (1.0 + v / gas.v0)
        } else {
            0.0
        };

        Ok(StreamPerformance {
            stream,
            path: s.path.clone(),
            choked: nozzle.choked,
            exit_velocity: mps(v),
            exit_area: m2(area),
            thrust_flow: newtons(thrust_flow),
            thrust_prop: newtons(propeller_thrust(self, stages.iter().copied())?),
            power_jet: watts(power_jet),
            power_available: watts(propulsive_efficiency * power_jet),
            propulsive_efficiency,
            mass_flow: kgps(gas.mf),
            fuel_mass_flow: kgps(gas.fuel_mf),
        })
    }

    /// Performance of every exhausting stream.
    pub fn exhaust_performance(&self) -> EngineResult<Vec<StreamPerformance>> {
        self.require_run()?;
        self.exhaust_streams()?
            .into_iter()
            .map(|id| self.stream_performance(id))
            .collect()
    }

    /// Thermal efficiency of one exhaust: its jet power over the heat of
    /// the fuel it carries.
    pub fn stream_thermal_efficiency(&self, perf: &StreamPerformance) -> EngineResult<f64> {
        let fuel = self.fuel_mass_flow()?.value;
        let heat = self.heat_input()?.value;
        let share = if fuel > 0.0 {
            heat * perf.fuel_mass_flow.value / fuel
        } else {
            0.0
        };
        if share <= 0.0 {
            return Err(EngineError::NoHeatInput);
        }
        Ok(perf.power_jet.value / share)
    }

    pub fn fuel_mass_flow(&self) -> EngineResult<MassRate> {
        self.require_run()?;
        Ok(kgps(self.snapshots().map(|s| s.fuel_mf).sum()))
    }

    /// Heat released by every burner.
    pub fn heat_input(&self) -> EngineResult<Power> {
        self.require_run()?;
        Ok(watts(self.snapshots().map(StageSnapshot::heat_released).sum()))
    }

    /// Work absorbed by every work-consuming stage.
    pub fn work_required(&self) -> EngineResult<Power> {
        self.require_run()?;
        Ok(watts(
            self.snapshots()
                .filter(|s| s.role == Role::WorkConsumer)
                .map(|s| s.record.work)
                .sum(),
        ))
    }

    pub fn thrust_flow(&self) -> EngineResult<Force> {
        let total = self
            .exhaust_performance()?
            .iter()
            .map(|p| p.thrust_flow.value)
            .sum();
        Ok(newtons(total))
    }

    /// Thrust of every propeller and propfan in the system.
    pub fn thrust_prop(&self) -> EngineResult<Force> {
        self.require_run()?;
        Ok(newtons(propeller_thrust(self, self.snapshots())?))
    }

    pub fn thrust(&self) -> EngineResult<Force> {
        Ok(self.thrust_flow()? + self.thrust_prop()?)
    }

    /// Fuel mass flow per unit flow thrust [kg/(N·s)].
    pub fn sfc(&self) -> EngineResult<f64> {
        let fuel = self.fuel_mass_flow()?.value;
        let thrust = self.thrust_flow()?.value;
        finite_ratio(fuel, thrust, "specific fuel consumption").map_err(|_| {
            EngineError::InvalidArg {
                what: "specific fuel consumption needs nonzero flow thrust",
            }
        })
    }

    pub fn power_jet(&self) -> EngineResult<Power> {
        let total = self
            .exhaust_performance()?
            .iter()
            .map(|p| p.power_jet.value)
            .sum();
        Ok(watts(total))
    }

    pub fn power_available(&self) -> EngineResult<Power> {
        let total = self
            .exhaust_performance()?
            .iter()
            .map(|p| p.power_available.value)
            .sum();
        Ok(watts(total))
    }

    /// Available power over jet power across all exhausts.
    pub fn propulsive_efficiency(&self) -> EngineResult<f64> {
        let jet = self.power_jet()?.value;
        if jet == 0.0 {
            return Ok(0.0);
        }
        Ok(self.power_available()?.value / jet)
    }

    fn over_heat_input(&self, power: f64) -> EngineResult<f64> {
        let heat = self.heat_input()?.value;
        if heat <= 0.0 {
            return Err(EngineError::NoHeatInput);
        }
        Ok(power / heat)
    }

    /// Jet power over heat input.
    pub fn thermal_efficiency(&self) -> EngineResult<f64> {
        self.over_heat_input(self.power_jet()?.value)
    }

    /// Available power over heat input.
    pub fn overall_efficiency(&self) -> EngineResult<f64> {
        self.over_heat_input(self.power_available()?.value)
    }

    pub fn summary(&self) -> EngineResult<PerformanceSummary> {
        let exhausts = self.exhaust_performance()?;
        let sum = |f: fn(&StreamPerformance) -> f64| exhausts.iter().map(f).sum::<f64>();

        let fuel_mass_flow = self.fuel_mass_flow()?.value;
        let heat_input = self.heat_input()?.value;
        let thrust_flow = sum(|p| p.thrust_flow.value);
        let thrust_prop = self.thrust_prop()?.value;
        let power_jet = sum(|p| p.power_jet.value);
        let power_available = sum(|p| p.power_available.value);

        let per_heat = |power: f64| (heat_input > 0.0).then(|| power / heat_input);

        Ok(PerformanceSummary {
            fuel_mass_flow,
            thrust_flow,
            thrust_prop,
            thrust: thrust_flow + thrust_prop,
            sfc: finite_ratio(fuel_mass_flow, thrust_flow, "sfc").ok(),
            heat_input,
            work_required: self.work_required()?.value,
            power_jet,
            power_available,
            propulsive_efficiency: if power_jet == 0.0 {
                0.0
            } else {
                power_available / power_jet
            },
            thermal_efficiency: per_heat(power_jet),
            overall_efficiency: per_heat(power_available),
            exhausts: exhausts
                .iter()
                .map(|p| ExhaustSummary {
                    path: p.path.clone(),
                    choked: p.choked,
                    exit_velocity: p.exit_velocity.value,
                    exit_area: p.exit_area.value,
                    thrust_flow: p.thrust_flow.value,
                })
                .collect(),
        })
    }
}
