//! jf-fluids: working-fluid model and process library for jetflow.
//!
//! Provides:
//! - Temperature-dependent property functions (`Property`, `GasProperties`)
//! - Working-fluid state threaded through an engine (`FluidState`)
//! - Fuel definitions
//! - Isentropic process functions returning immutable `ProcessRecord`s
//!
//! # Example
//!
//! ```
//! use jf_core::units::{k, kgps, pa};
//! use jf_fluids::{FluidState, GasProperties, RatioSpec, process};
//!
//! let gas = GasProperties::constant(1000.0, 1.4);
//! let state = FluidState::new(kgps(100.0), gas, 0.0, k(288.0), pa(101_325.0)).unwrap();
//!
//! let input = state.process_input().unwrap();
//! let record = process::compression(&input, 0.85, RatioSpec::Pressure(4.0)).unwrap();
//! assert!(record.t01 > record.t00);
//! ```

pub mod error;
pub mod fuel;
pub mod process;
pub mod property;
pub mod state;

// Re-exports for ergonomics
pub use error::{FluidError, FluidResult};
pub use fuel::Fuel;
pub use process::{ProcessInput, ProcessKind, ProcessRecord, RatioSpec};
pub use property::{BlendPart, GasProperties, Property};
pub use state::FluidState;
