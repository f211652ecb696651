//! jf-components: engine component library for jetflow.
//!
//! Provides the stage models of an airbreathing engine:
//! - Intakes and inlets (diffusion)
//! - Compressors, fans and propellers (work consumers)
//! - Turbines (work producers, optionally self-sizing from shaft demand)
//! - Combustion chambers and afterburners (fuel resolution)
//! - Nozzles with choking
//! - Intercoolers and bleed ducts (heat exchange)
//! - Electrical loads (shaft power sinks)
//!
//! Every component implements [`EngineComponent`]: a transfer function
//! from the entering fluid state to an immutable process record. Anything a
//! component needs from the rest of the engine (shaft balance, downstream
//! turbine demand) arrives through a [`StageContext`].
//!
//! # Example
//!
//! ```
//! use jf_components::{Compressor, EngineComponent, NoContext};
//! use jf_core::units::{k, kgps, pa};
//! use jf_fluids::{FluidState, GasProperties, RatioSpec};
//!
//! let gas = FluidState::new(
//!     kgps(160.0),
//!     GasProperties::air_and_products(600.0),
//!     0.0,
//!     k(288.0),
//!     pa(101_325.0),
//! )
//! .unwrap();
//!
//! let lpc = Compressor::new("lpc", 0.85, RatioSpec::Pressure(4.0)).unwrap();
//! let out = lpc.transfer(&gas, &NoContext).unwrap();
//! assert!(out.record.work > 0.0);
//! ```

pub mod combustor;
pub mod common;
pub mod compressor;
pub mod error;
pub mod heat_exchanger;
pub mod inlet;
pub mod nozzle;
pub mod power_sink;
pub mod traits;
pub mod turbine;

// Re-exports
pub use combustor::{Combustor, CombustorKind};
pub use compressor::{Compressor, Fan, Propeller};
pub use error::{ComponentError, ComponentResult};
pub use heat_exchanger::{BleedDuct, Intercooler};
pub use inlet::{Inlet, Intake};
pub use nozzle::{Nozzle, inv_pi_crit};
pub use power_sink::ElectricalLoad;
pub use traits::{EngineComponent, NoContext, Role, StageContext, StageOutput};
pub use turbine::Turbine;
