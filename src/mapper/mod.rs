//! Persistence mapper - converts between stored JSON documents and the typed
//! domain model.
//!
//! Reading never fails: unknown enum strings, legacy fields and malformed
//! entries resolve to safe defaults and are logged. Writing always produces the
//! current schema with canonical enum strings.

/// Embedded component documents
pub mod component;
/// Tolerant single-field parsers
pub mod fields;
/// Variant documents
pub mod variant;

pub use component::{read_component, read_components, write_component};
pub use variant::{null_legacy_depth, read_long_name, read_variant, write_variant};
