//! Product entity - a sofa model grouping its priced variants.
//!
//! A product owns the ordered list of its variant ids but not the variants
//! themselves, which live in their own table keyed by product id. Ids in the
//! list may dangle after a variant is removed out of band; readers skip them.

use crate::mapper::fields::parse_id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Milano")
    pub name: String,
    /// Marketing description
    pub description: String,
    /// Public URL of the product photo
    pub photo_url: Option<String>,
    /// Flat delivery price added to every list price
    pub delivery_price: f64,
    /// Default markup percentage, in `[0, 100)`
    pub markup_percentage: f64,
    /// JSON array of variant ids, in display order
    pub variant_ids: Json,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

impl Model {
    /// Variant ids in display order. Unreadable entries are skipped.
    #[must_use]
    pub fn variant_ids(&self) -> Vec<i64> {
        self.variant_ids
            .as_array()
            .map(|ids| ids.iter().filter_map(|id| parse_id(Some(id))).collect())
            .unwrap_or_default()
    }
}

/// Products have no foreign-key relations; variants reference them loosely.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
