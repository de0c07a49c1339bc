//! Variant entity - one stored variant document per row.
//!
//! The row keeps the owning product id as a column for lookups; everything
//! else lives in the loosely-typed JSON `document`, read through
//! [`crate::mapper::read_variant`].

use crate::mapper::read_variant;
use crate::models::Variant;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Variant database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "variants")]
pub struct Model {
    /// Unique identifier for the variant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning product; not a foreign key, products may be deleted first
    pub product_id: i64,
    /// The stored variant record
    pub document: Json,
    /// When the variant was created
    pub created_at: DateTime,
    /// When the variant was last modified
    pub updated_at: DateTime,
}

impl Model {
    /// Parses the document. The row's id and product id win over whatever
    /// the document says.
    #[must_use]
    pub fn to_variant(&self) -> Variant {
        let mut variant = read_variant(&self.document);
        variant.id = Some(self.id);
        variant.product_id = self.product_id;
        variant
    }
}

/// Variants have no foreign-key relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
