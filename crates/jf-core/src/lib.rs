//! jf-core: stable foundation for jetflow.
//!
//! Contains:
//! - units (uom SI types + constructors, gas constant)
//! - numeric (finiteness checks and relative tolerances)
//! - ids (stable compact IDs for components, streams and shafts)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{JfError, JfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
