//! Common utilities for component parameters.

use crate::error::{ComponentError, ComponentResult};
use jf_core::numeric::ensure_finite;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Efficiencies live in (0, 1].
pub fn check_efficiency(eta: f64, what: &'static str) -> ComponentResult<()> {
    if !eta.is_finite() || eta <= 0.0 || eta > 1.0 {
        return Err(ComponentError::InvalidArg { what });
    }
    Ok(())
}

pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ComponentError::InvalidArg { what });
    }
    Ok(())
}

pub fn check_optional_positive(value: Option<f64>, what: &'static str) -> ComponentResult<()> {
    match value {
        Some(v) => check_positive(v, what),
        None => Ok(()),
    }
}
