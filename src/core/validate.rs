//! Input checks shared by the catalog services. Everything here runs before
//! any database call.

use crate::errors::{Error, Result};

/// Trims a required name, rejecting empty or whitespace-only input.
pub fn require_name(kind: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{kind} name cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank input becomes `None`.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts finite, non-negative amounts.
pub fn require_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Accepts markup percentages in `[0, 100)`. At 100 the list price formula
/// divides by zero; above it the price turns negative.
pub fn require_markup(markup: f64) -> Result<f64> {
    if !markup.is_finite() || !(0.0..100.0).contains(&markup) {
        return Err(Error::InvalidMarkup { markup });
    }
    Ok(markup)
}

/// Case-insensitive comparison used for uniqueness checks.
#[must_use]
pub fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_require_name() {
        assert_eq!(require_name("Product", "  Milano ").unwrap(), "Milano");
        assert!(matches!(
            require_name("Product", "   "),
            Err(Error::Validation { message: _ })
        ));
    }

    #[test]
    fn test_require_amount() {
        assert_eq!(require_amount(0.0).unwrap(), 0.0);
        assert!(matches!(
            require_amount(-0.01),
            Err(Error::InvalidAmount { amount: _ })
        ));
        assert!(require_amount(f64::NAN).is_err());
        assert!(require_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_markup() {
        assert_eq!(require_markup(0.0).unwrap(), 0.0);
        assert_eq!(require_markup(99.9).unwrap(), 99.9);
        assert!(matches!(
            require_markup(100.0),
            Err(Error::InvalidMarkup { markup: _ })
        ));
        assert!(require_markup(-5.0).is_err());
        assert!(require_markup(f64::NAN).is_err());
    }

    #[test]
    fn test_optional_text_and_same_name() {
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" LR ".to_string())), Some("LR".to_string()));
        assert!(same_name("Legnami Rossi", " legnami rossi"));
        assert!(!same_name("Legnami", "Legnami Rossi"));
    }
}
