//! Component entity - the catalog of purchasable parts.
//!
//! Variants embed copies of these rows in their documents, so editing a
//! catalog component does not reprice existing variants. Enum-like columns are
//! stored as canonical strings and read back through the tolerant mapper.

use crate::mapper::fields::{parse_component_type, parse_sofa_type};
use crate::models::Component;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Component database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "components")]
pub struct Model {
    /// Unique identifier for the component
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Fusto 3 posti")
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Supplier this component is bought from
    pub supplier_id: Option<i64>,
    /// Component type key (e.g., "FUSTO")
    pub component_type: Option<String>,
    /// Canonical sofa type value this component is specific to
    pub sofa_type: Option<String>,
    /// Free-text label for the sofa type association
    pub sofa_type_label: Option<String>,
    /// When the component was created
    pub created_at: DateTime,
    /// When the component was last modified
    pub updated_at: DateTime,
}

impl Model {
    /// Converts the row into a domain component, resolving enum columns
    /// tolerantly.
    #[must_use]
    pub fn to_component(&self) -> Component {
        let component_type = self.component_type.clone().map(Value::String);
        let sofa_type = self.sofa_type.clone().map(Value::String);
        Component {
            id: Some(self.id),
            name: self.name.clone(),
            price: self.price,
            supplier_id: self.supplier_id,
            component_type: parse_component_type(component_type.as_ref()),
            sofa_type: parse_sofa_type(sofa_type.as_ref()),
            sofa_type_label: self.sofa_type_label.clone(),
        }
    }
}

/// Defines relationships between Component and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each component may belong to one supplier
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
