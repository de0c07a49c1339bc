//! Component documents, as embedded in variant records.

use super::fields::{parse_component_type, parse_id, parse_number, parse_sofa_type, parse_text};
use crate::models::Component;
use serde_json::{Map, Value};
use tracing::warn;

/// Parses an embedded component. Returns `None` only when the entry is not a
/// JSON object at all; every individual field falls back to a default.
#[must_use]
pub fn read_component(doc: &Value) -> Option<Component> {
    let Some(fields) = doc.as_object() else {
        warn!("Skipping component entry that is not an object: {doc}");
        return None;
    };

    let name = parse_text(fields.get("name")).unwrap_or_else(|| {
        warn!("Component entry without a name: {doc}");
        String::new()
    });

    Some(Component {
        id: parse_id(fields.get("id")),
        name,
        price: parse_number(fields.get("price")).unwrap_or(0.0),
        supplier_id: parse_id(fields.get("supplierId")),
        component_type: parse_component_type(fields.get("type")),
        sofa_type: parse_sofa_type(fields.get("sofaType")),
        sofa_type_label: parse_text(fields.get("sofaTypeLabel")),
    })
}

/// Parses an array of embedded components, skipping unusable entries. A
/// missing or non-array field yields an empty list.
#[must_use]
pub fn read_components(value: Option<&Value>) -> Vec<Component> {
    match value {
        Some(Value::Array(entries)) => entries.iter().filter_map(read_component).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            warn!("Expected a component list, found {other}");
            Vec::new()
        }
    }
}

/// Serializes a component with enum fields in canonical string form.
#[must_use]
pub fn write_component(component: &Component) -> Value {
    let mut doc = Map::new();
    if let Some(id) = component.id {
        doc.insert("id".into(), id.into());
    }
    doc.insert("name".into(), component.name.clone().into());
    doc.insert("price".into(), component.price.into());
    if let Some(supplier_id) = component.supplier_id {
        doc.insert("supplierId".into(), supplier_id.into());
    }
    if let Some(component_type) = component.component_type {
        doc.insert("type".into(), component_type.key().into());
    }
    if let Some(sofa_type) = component.sofa_type {
        doc.insert("sofaType".into(), sofa_type.as_str().into());
    }
    if let Some(label) = &component.sofa_type_label {
        doc.insert("sofaTypeLabel".into(), label.clone().into());
    }
    Value::Object(doc)
}
