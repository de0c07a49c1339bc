//! Catalog services over the database. Every function takes a
//! `&DatabaseConnection` and returns [`crate::errors::Result`].

/// Catalog components and their cascade into variants
pub mod component;
/// Name to id lookup of products
pub mod directory;
/// Products and their variant lists
pub mod product;
/// Price lists with markup and delivery
pub mod report;
/// First-run catalog seeding
pub mod seed;
/// Suppliers
pub mod supplier;
/// Input validation shared by the services
pub mod validate;
/// Variant documents
pub mod variant;
