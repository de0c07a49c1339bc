//! Variant documents - read and write paths.
//!
//! The read path accepts anything the store has ever held: free-text long
//! names, the single `depth` field that predates open/closed depths, enum codes
//! stored as numbers, and prices that disagree with their components. The
//! write path always emits the current schema.

use super::component::{read_components, write_component};
use super::fields::{parse_count, parse_id, parse_number, parse_pricing_mode, parse_text};
use crate::models::{PricingMode, SofaType, UpholsterySelection, Variant};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Resolves the stored `longName`/`customName` pair.
///
/// A predefined type drops any stored custom name. The custom sentinel keeps
/// the trimmed custom name, unless that name spells a predefined type. Anything else is a legacy free-text name and
/// becomes a custom variant named after it.
#[must_use]
pub fn read_long_name(fields: &Map<String, Value>) -> (SofaType, Option<String>) {
    let raw = parse_text(fields.get("longName"));
    let stored_custom = parse_text(fields.get("customName"));

    match raw.as_deref().map(SofaType::from_str_loose) {
        Some(Some(SofaType::Custom)) => {
            if stored_custom.is_none() {
                warn!("Custom variant stored without a custom name");
            }
            custom_named(stored_custom)
        }
        Some(Some(known)) => (known, None),
        Some(None) => {
            debug!("Treating legacy long name {raw:?} as a custom name");
            (SofaType::Custom, raw)
        }
        None => {
            if stored_custom.is_none() {
                warn!("Variant stored without any name");
            }
            custom_named(stored_custom)
        }
    }
}

/// A custom name spelling a predefined type resolves to that type.
fn custom_named(name: Option<String>) -> (SofaType, Option<String>) {
    match name.as_deref().and_then(SofaType::from_str_loose) {
        Some(known) if !known.is_custom() => {
            debug!("Custom name {name:?} is the predefined type {known}");
            (known, None)
        }
        _ => (SofaType::Custom, name),
    }
}

fn read_upholsteries(value: Option<&Value>) -> Vec<UpholsterySelection> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let Some(name) = parse_text(entry.get("name")) else {
                warn!("Skipping upholstery entry without a name: {entry}");
                return None;
            };
            Some(UpholsterySelection {
                upholstery_id: parse_id(entry.get("upholsteryId")),
                name,
                meters: parse_number(entry.get("meters")).unwrap_or(0.0),
            })
        })
        .collect()
}

/// Parses a stored variant document. Never fails; a non-object document
/// yields an unnamed, empty custom variant.
///
/// A numeric stored `price` is trusted as persisted history even when it
/// disagrees with the components; a missing one is computed. A custom variant
/// with a custom price always ends up priced at that custom price.
#[must_use]
pub fn read_variant(doc: &Value) -> Variant {
    let empty = Map::new();
    let fields = doc.as_object().unwrap_or_else(|| {
        warn!("Variant document is not an object: {doc}");
        &empty
    });

    let (long_name, custom_name) = read_long_name(fields);

    let closed_depth = parse_number(fields.get("closedDepth")).or_else(|| {
        let legacy = parse_number(fields.get("depth"));
        if legacy.is_some() {
            debug!("Reading legacy depth {legacy:?} as closed depth");
        }
        legacy
    });

    let mut variant = Variant {
        id: parse_id(fields.get("id")),
        product_id: parse_id(fields.get("productId")).unwrap_or_default(),
        long_name,
        custom_name,
        price: 0.0,
        components: read_components(fields.get("components")),
        seats: parse_count(fields.get("seats")),
        mattress_width: parse_number(fields.get("mattressWidth")),
        open_depth: parse_number(fields.get("openDepth")),
        closed_depth,
        height: parse_number(fields.get("height")),
        upholsteries: read_upholsteries(fields.get("upholsteries")),
        pricing_mode: parse_pricing_mode(fields.get("pricingMode")),
        custom_price: parse_number(fields.get("customPrice")),
    };

    match parse_number(fields.get("price")) {
        Some(stored) => {
            variant.price = stored;
            if variant.pricing_mode == PricingMode::Components {
                let total = variant.components_total();
                if (total - stored).abs() > f64::EPSILON {
                    debug!(
                        "Variant {:?} stored price {stored} differs from component total {total}; keeping stored price",
                        variant.id
                    );
                }
            }
        }
        None => {
            variant.compute_price();
        }
    }
    if let (PricingMode::Custom, Some(custom)) = (variant.pricing_mode, variant.custom_price) {
        variant.price = custom;
    }

    variant
}

/// Serializes a variant into the current document schema.
///
/// Enum fields are written as canonical strings, custom names are mirrored
/// into `longName`, absent optionals are omitted, and the legacy `depth` field
/// is never written.
#[must_use]
pub fn write_variant(variant: &Variant) -> Value {
    let mut doc = Map::new();
    if let Some(id) = variant.id {
        doc.insert("id".into(), id.into());
    }
    doc.insert("productId".into(), variant.product_id.into());

    match (variant.long_name, variant.custom_name()) {
        (SofaType::Custom, Some(name)) => {
            let name = name.trim();
            doc.insert("longName".into(), name.into());
            doc.insert("customName".into(), name.into());
        }
        (long_name, _) => {
            doc.insert("longName".into(), long_name.as_str().into());
        }
    }

    doc.insert("price".into(), variant.price.into());
    doc.insert(
        "components".into(),
        Value::Array(variant.components.iter().map(write_component).collect()),
    );

    if let Some(seats) = variant.seats {
        doc.insert("seats".into(), seats.into());
    }
    let measurements = [
        ("mattressWidth", variant.mattress_width),
        ("openDepth", variant.open_depth),
        ("closedDepth", variant.closed_depth),
        ("height", variant.height),
    ];
    for (key, value) in measurements {
        if let Some(v) = value {
            doc.insert(key.into(), v.into());
        }
    }

    if !variant.upholsteries.is_empty() {
        let entries = variant
            .upholsteries
            .iter()
            .map(|u| {
                let mut entry = Map::new();
                if let Some(id) = u.upholstery_id {
                    entry.insert("upholsteryId".into(), id.into());
                }
                entry.insert("name".into(), u.name.clone().into());
                entry.insert("meters".into(), u.meters.into());
                Value::Object(entry)
            })
            .collect();
        doc.insert("upholsteries".into(), Value::Array(entries));
    }

    doc.insert("pricingMode".into(), variant.pricing_mode.as_str().into());
    if let Some(custom) = variant.custom_price {
        doc.insert("customPrice".into(), custom.into());
    }

    Value::Object(doc)
}

/// Nulls out the legacy `depth` field on a stored document, for migrations
/// that upgrade documents in place. Returns whether the document had one.
pub fn null_legacy_depth(doc: &mut Value) -> bool {
    match doc.get_mut("depth") {
        Some(depth) if !depth.is_null() => {
            *depth = Value::Null;
            true
        }
        _ => false,
    }
}
