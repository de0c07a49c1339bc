//! Supplier entity - companies the catalog components are bought from.
//!
//! Names and codes are unique (case-insensitively); uniqueness is checked by
//! the catalog services before insert rather than by a database constraint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    /// Unique identifier for the supplier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Company name
    pub name: String,
    /// Short supplier code used on purchase orders
    pub code: Option<String>,
    /// Contact e-mail
    pub email: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the supplier was created
    pub created_at: DateTime,
    /// When the supplier was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Supplier and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One supplier provides many components
    #[sea_orm(has_many = "super::component::Entity")]
    Components,
}

impl Related<super::component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Components.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
