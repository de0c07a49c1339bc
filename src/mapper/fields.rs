//! Tolerant field parsers for loosely-typed stored documents.
//!
//! Every function takes the raw field (`None` when the key is missing) and
//! returns a typed optional. None of them fail: unusable values resolve to
//! `None` and are logged, so one malformed record never blocks a whole list.

use crate::models::{ComponentType, PricingMode, SofaType};
use serde_json::Value;
use tracing::{debug, warn};

/// Reads a finite JSON number. Strings, booleans and nulls are not numbers.
#[must_use]
pub fn parse_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::Null => None,
        other => {
            debug!("Ignoring non-numeric value {other}");
            None
        }
    }
}

/// Reads an integer id stored either as a JSON integer or as a numeric string.
#[must_use]
pub fn parse_id(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a string, trimmed. Empty strings count as absent.
#[must_use]
pub fn parse_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Reads a non-negative whole number that fits in a `u32`.
#[must_use]
pub fn parse_count(value: Option<&Value>) -> Option<u32> {
    let number = parse_number(value)?;
    if number < 0.0 || number.fract() != 0.0 || number > f64::from(u32::MAX) {
        warn!("Ignoring invalid count {number}");
        return None;
    }
    // Cast safety: checked above to be a whole number within u32 range.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = number as u32;
    Some(count)
}

/// Resolves a sofa type from its canonical value or key, in any letter case.
#[must_use]
pub fn parse_sofa_type(value: Option<&Value>) -> Option<SofaType> {
    let raw = value?;
    let resolved = raw.as_str().and_then(SofaType::from_str_loose);
    if resolved.is_none() && !raw.is_null() {
        warn!("Unrecognized sofa type {raw}; treating as none");
    }
    resolved
}

/// Resolves a component type from a numeric code or a key in any letter case.
#[must_use]
pub fn parse_component_type(value: Option<&Value>) -> Option<ComponentType> {
    let raw = value?;
    let resolved = match raw {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(whole_code))
            .and_then(ComponentType::from_code),
        Value::String(s) => ComponentType::from_str_loose(s),
        _ => None,
    };
    if resolved.is_none() && !raw.is_null() {
        warn!("Unrecognized component type {raw}; treating as untyped");
    }
    resolved
}

// Codes written by clients that store every number as a float (`3.0`).
fn whole_code(f: f64) -> Option<u64> {
    if f < 0.0 || f.fract() != 0.0 || f > 255.0 {
        return None;
    }
    // Cast safety: whole and within 0..=255.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let code = f as u64;
    Some(code)
}

/// Reads the pricing mode, defaulting to components for missing or unknown
/// values (records written before custom pricing existed).
#[must_use]
pub fn parse_pricing_mode(value: Option<&Value>) -> PricingMode {
    match value.and_then(Value::as_str) {
        Some(s) => PricingMode::from_str_loose(s).unwrap_or_else(|| {
            warn!("Unrecognized pricing mode '{s}'; using components");
            PricingMode::Components
        }),
        None => PricingMode::Components,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Some(&json!(45))), Some(45.0));
        assert_eq!(parse_number(Some(&json!(12.5))), Some(12.5));
        assert_eq!(parse_number(Some(&json!("45"))), None);
        assert_eq!(parse_number(Some(&json!(null))), None);
        assert_eq!(parse_number(Some(&json!(true))), None);
        assert_eq!(parse_number(None), None);
    }

    #[test]
    fn test_parse_id_accepts_numeric_strings() {
        assert_eq!(parse_id(Some(&json!(12))), Some(12));
        assert_eq!(parse_id(Some(&json!(" 12 "))), Some(12));
        assert_eq!(parse_id(Some(&json!("abc"))), None);
        assert_eq!(parse_id(Some(&json!(1.5))), None);
    }

    #[test]
    fn test_parse_text_trims_and_drops_empty() {
        assert_eq!(parse_text(Some(&json!("  Milano "))), Some("Milano".to_string()));
        assert_eq!(parse_text(Some(&json!("   "))), None);
        assert_eq!(parse_text(Some(&json!(3))), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some(&json!(3))), Some(3));
        assert_eq!(parse_count(Some(&json!(3.0))), Some(3));
        assert_eq!(parse_count(Some(&json!(2.5))), None);
        assert_eq!(parse_count(Some(&json!(-1))), None);
    }

    #[test]
    fn test_component_type_accepts_key_and_code() {
        let expected = Some(ComponentType::Fusto);
        assert_eq!(parse_component_type(Some(&json!("fusto"))), expected);
        assert_eq!(parse_component_type(Some(&json!("FUSTO"))), expected);
        assert_eq!(
            parse_component_type(Some(&json!(ComponentType::Fusto.code()))),
            expected
        );
        assert_eq!(
            parse_component_type(Some(&json!(13))),
            Some(ComponentType::Trasporto)
        );
    }

    #[test]
    fn test_component_type_tolerates_garbage() {
        assert_eq!(parse_component_type(Some(&json!("bogus"))), None);
        assert_eq!(parse_component_type(Some(&json!(99))), None);
        assert_eq!(parse_component_type(Some(&json!(-1))), None);
        assert_eq!(parse_component_type(Some(&json!({"k": 1}))), None);
        assert_eq!(parse_component_type(None), None);
    }

    #[test]
    fn test_sofa_type_parse() {
        assert_eq!(
            parse_sofa_type(Some(&json!("DIVANO 2 POSTI"))),
            Some(SofaType::TwoSeat)
        );
        assert_eq!(parse_sofa_type(Some(&json!("nope"))), None);
        assert_eq!(parse_sofa_type(Some(&json!(2))), None);
    }

    #[test]
    fn test_pricing_mode_defaults_to_components() {
        assert_eq!(parse_pricing_mode(None), PricingMode::Components);
        assert_eq!(
            parse_pricing_mode(Some(&json!("weird"))),
            PricingMode::Components
        );
        assert_eq!(
            parse_pricing_mode(Some(&json!("CUSTOM"))),
            PricingMode::Custom
        );
    }
}
