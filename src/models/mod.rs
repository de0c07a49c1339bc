//! Domain model - sofa types, components and priced variants.
//!
//! These types are framework-agnostic; the [`crate::mapper`] module converts
//! them to and from stored documents.

/// Components and component types
pub mod component;
/// Sofa type enumeration
pub mod sofa_type;
/// Variants and their pricing rules
pub mod variant;

pub use component::{Component, ComponentKey, ComponentType};
pub use sofa_type::SofaType;
pub use variant::{ComponentGroup, PricingMode, UpholsterySelection, Variant};
