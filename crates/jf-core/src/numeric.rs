use crate::JfError;

/// Relative deviation of `value` from a nonzero `reference`.
pub fn relative_error(value: f64, reference: f64) -> f64 {
    ((value - reference) / reference).abs()
}

/// True when `value` lies within `fraction` (e.g. 0.001 for 0.1%) of `reference`.
pub fn within_fraction(value: f64, reference: f64, fraction: f64) -> bool {
    relative_error(value, reference) < fraction
}

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, JfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(JfError::NonFinite { what, value: v })
    }
}

/// Ratio of two quantities, rejecting non-finite results (e.g. a zero denominator).
pub fn finite_ratio(num: f64, den: f64, what: &'static str) -> Result<f64, JfError> {
    ensure_finite(num / den, what)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn within_fraction_band() {
        assert!(within_fraction(1000.5, 1000.0, 0.001));
        assert!(!within_fraction(1002.0, 1000.0, 0.001));
    }

    #[test]
    fn finite_ratio_rejects_zero_denominator() {
        assert!(finite_ratio(1.0, 0.0, "ratio").is_err());
        assert_eq!(finite_ratio(3.0, 2.0, "ratio").unwrap(), 1.5);
    }
}
