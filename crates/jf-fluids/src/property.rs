//! Temperature-dependent gas property functions.
//!
//! Properties are plain data rather than closures so that they can be
//! cloned into diverted streams, blended when streams mix, and written to
//! engine definition files.

use crate::error::{FluidError, FluidResult};
use serde::{Deserialize, Serialize};

/// A scalar gas property as a function of temperature [K].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Property {
    /// Same value at every temperature.
    Constant { value: f64 },

    /// `below` up to and including `threshold`, `above` past it.
    Step {
        threshold: f64,
        below: f64,
        above: f64,
    },

    /// `c0 + c1*T + c2*T^2 + ...`
    Polynomial { coeffs: Vec<f64> },

    /// Weighted average of other property functions (weights sum to 1).
    Blend { parts: Vec<BlendPart> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendPart {
    pub weight: f64,
    pub property: Property,
}

impl Property {
    pub fn constant(value: f64) -> Self {
        Property::Constant { value }
    }

    pub fn step(threshold: f64, below: f64, above: f64) -> Self {
        Property::Step {
            threshold,
            below,
            above,
        }
    }

    /// Evaluate the property at temperature `t`.
    pub fn eval(&self, t: f64) -> f64 {
        match self {
            Property::Constant { value } => *value,
            Property::Step {
                threshold,
                below,
                above,
            } => {
                if t > *threshold {
                    *above
                } else {
                    *below
                }
            }
            // Horner
            Property::Polynomial { coeffs } => coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c),
            Property::Blend { parts } => parts
                .iter()
                .map(|part| part.weight * part.property.eval(t))
                .sum(),
        }
    }

    /// Mass-weighted combination of two property functions.
    ///
    /// Identical functions are returned unchanged, so mixing streams of the
    /// same gas never grows the expression.
    pub fn blend(a: &Property, wa: f64, b: &Property, wb: f64) -> FluidResult<Property> {
        let total = wa + wb;
        if !total.is_finite() || total <= 0.0 || wa < 0.0 || wb < 0.0 {
            return Err(FluidError::InvalidArg {
                what: "blend weights must be non-negative with a positive sum",
            });
        }
        if a == b {
            return Ok(a.clone());
        }
        Ok(Property::Blend {
            parts: vec![
                BlendPart {
                    weight: wa / total,
                    property: a.clone(),
                },
                BlendPart {
                    weight: wb / total,
                    property: b.clone(),
                },
            ],
        })
    }
}

/// Specific heat and specific-heat ratio of a working gas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GasProperties {
    /// Constant pressure specific heat cp(T) [J/(kg·K)]
    pub cp: Property,
    /// Specific heat ratio k(T) [-]
    pub k: Property,
}

impl GasProperties {
    pub fn new(cp: Property, k: Property) -> Self {
        Self { cp, k }
    }

    /// Calorically perfect gas.
    pub fn constant(cp: f64, k: f64) -> Self {
        Self {
            cp: Property::constant(cp),
            k: Property::constant(k),
        }
    }

    /// Cold air below `threshold`, combustion products above it.
    ///
    /// The classic two-value model used for quick cycle estimates:
    /// cp 1000/1150 J/(kg·K), k 1.4/1.33.
    pub fn air_and_products(threshold: f64) -> Self {
        Self {
            cp: Property::step(threshold, 1000.0, 1150.0),
            k: Property::step(threshold, 1.4, 1.33),
        }
    }

    /// cp at `t`, validated positive and finite.
    pub fn cp_at(&self, t: f64) -> FluidResult<f64> {
        let cp = self.cp.eval(t);
        if !cp.is_finite() || cp <= 0.0 {
            return Err(FluidError::OutOfRange {
                what: "specific heat cp",
                value: cp,
            });
        }
        Ok(cp)
    }

    /// k at `t`, validated finite and greater than one.
    pub fn k_at(&self, t: f64) -> FluidResult<f64> {
        let k = self.k.eval(t);
        if !k.is_finite() || k <= 1.0 {
            return Err(FluidError::OutOfRange {
                what: "specific heat ratio k",
                value: k,
            });
        }
        Ok(k)
    }

    /// Mass-weighted mixture of two gases.
    pub fn blend(a: &GasProperties, wa: f64, b: &GasProperties, wb: f64) -> FluidResult<Self> {
        Ok(Self {
            cp: Property::blend(&a.cp, wa, &b.cp, wb)?,
            k: Property::blend(&a.k, wa, &b.k, wb)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_switches_above_threshold() {
        let p = Property::step(600.0, 1000.0, 1150.0);
        assert_eq!(p.eval(600.0), 1000.0);
        assert_eq!(p.eval(600.1), 1150.0);
        assert_eq!(p.eval(288.0), 1000.0);
    }

    #[test]
    fn polynomial_evaluates_in_order() {
        // 2 + 3T + T^2 at T = 2
        let p = Property::Polynomial {
            coeffs: vec![2.0, 3.0, 1.0],
        };
        assert_eq!(p.eval(2.0), 12.0);
    }

    #[test]
    fn blend_of_identical_properties_is_identity() {
        let a = Property::step(600.0, 1000.0, 1150.0);
        let blended = Property::blend(&a, 3.0, &a, 7.0).unwrap();
        assert_eq!(blended, a);
    }

    #[test]
    fn blend_is_mass_weighted() {
        let a = Property::constant(1000.0);
        let b = Property::constant(1200.0);
        let blended = Property::blend(&a, 1.0, &b, 3.0).unwrap();
        assert!((blended.eval(500.0) - 1150.0).abs() < 1e-9);
    }

    #[test]
    fn blend_rejects_zero_weights() {
        let a = Property::constant(1.0);
        assert!(Property::blend(&a, 0.0, &a, 0.0).is_err());
    }

    #[test]
    fn k_must_exceed_one() {
        let gas = GasProperties::constant(1000.0, 1.0);
        assert!(gas.k_at(300.0).is_err());
        let gas = GasProperties::constant(-1.0, 1.4);
        assert!(gas.cp_at(300.0).is_err());
    }

    #[test]
    fn property_serde_tagged() {
        let p = Property::step(1000.0, 1000.0, 1150.0);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"kind\":\"step\""));
        let back: Property = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
