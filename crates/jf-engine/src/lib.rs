//! jf-engine: engine composition and cycle evaluation for jetflow.
//!
//! Provides:
//! - `System`: component arena, shafts and streams, executed generation by generation
//! - Stream algebra: connect, divert, merge
//! - Stage lookup by path (`0.cp2`, `1.m.nz`) and per-stage profiles
//! - Thrust, power and efficiency metrics
//!
//! # Example
//!
//! ```
//! use jf_components::{Compressor, Inlet, Nozzle, Turbine, Combustor};
//! use jf_core::units::{k, kgps, pa};
//! use jf_engine::System;
//! use jf_fluids::{FluidState, Fuel, GasProperties, RatioSpec};
//!
//! let air = FluidState::new(
//!     kgps(100.0),
//!     GasProperties::air_and_products(1000.0),
//!     0.0,
//!     k(288.0),
//!     pa(101_325.0),
//! )
//! .unwrap();
//!
//! let mut engine = System::new();
//! let core = engine.root_stream(air).unwrap();
//! engine.connect(core, Inlet::with_recovery("inlet", 0.98).unwrap()).unwrap();
//! let c = engine
//!     .connect(core, Compressor::new("hpc", 0.85, RatioSpec::Pressure(10.0)).unwrap())
//!     .unwrap();
//! engine
//!     .connect(
//!         core,
//!         Combustor::chamber("burner", Fuel::jet_a(), 0.98)
//!             .unwrap()
//!             .with_exit_temperature(1400.0)
//!             .unwrap(),
//!     )
//!     .unwrap();
//! let t = engine.connect(core, Turbine::self_sizing("hpt", 0.9).unwrap()).unwrap();
//! engine.connect(core, Nozzle::new("nozzle", 0.95).unwrap()).unwrap();
//! engine.add_shaft(&[c, t], 0.99).unwrap();
//!
//! engine.run().unwrap();
//! assert!(engine.stage("0.tb").unwrap().state.t0 < 1400.0);
//! assert!(engine.thrust().unwrap().value > 0.0);
//! ```

mod context;
pub mod error;
pub mod graph;
pub mod performance;
pub mod query;
pub mod shaft;
pub mod snapshot;
pub mod stream;
pub mod system;

pub use error::{EngineError, EngineResult};
pub use graph::StreamGraph;
pub use performance::{ExhaustSummary, PerformanceSummary, StreamPerformance};
pub use query::{ProfilePoint, StageQuantity};
pub use shaft::{ConsumerWork, Shaft};
pub use snapshot::StageSnapshot;
pub use stream::{Branch, Stream, StreamOrigin};
pub use system::System;
