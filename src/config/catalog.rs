//! Catalog configuration loading from config.toml
//!
//! The configuration file carries the pricing defaults applied to new
//! products and an optional seed catalog (suppliers, components, products with
//! their variants) used to populate an empty database on first run.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default configuration path when `SOFA_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct CatalogConfig {
    /// Defaults for new products
    #[serde(default)]
    pub pricing: PricingDefaults,
    /// Suppliers to seed
    #[serde(default)]
    pub suppliers: Vec<SupplierSeed>,
    /// Catalog components to seed
    #[serde(default)]
    pub components: Vec<ComponentSeed>,
    /// Products (with variants) to seed
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// Pricing defaults for new products
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct PricingDefaults {
    /// Markup percentage applied when a product does not set one
    #[serde(default = "default_markup")]
    pub markup_percentage: f64,
    /// Delivery price applied when a product does not set one
    #[serde(default)]
    pub delivery_price: f64,
}

const fn default_markup() -> f64 {
    30.0
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            markup_percentage: default_markup(),
            delivery_price: 0.0,
        }
    }
}

/// A supplier to seed
#[derive(Debug, Deserialize, Clone)]
pub struct SupplierSeed {
    /// Company name
    pub name: String,
    /// Supplier code
    pub code: Option<String>,
    /// Contact e-mail
    pub email: Option<String>,
}

/// A catalog component to seed
#[derive(Debug, Deserialize, Clone)]
pub struct ComponentSeed {
    /// Component name, unique
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Component type key (e.g., "FUSTO"); unknown keys seed an untyped component
    #[serde(rename = "type")]
    pub component_type: Option<String>,
    /// Name of the supplier, which must also be seeded
    pub supplier: Option<String>,
    /// Sofa type value or key this component is specific to
    pub sofa_type: Option<String>,
}

/// A product to seed
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Product name
    pub name: String,
    /// Marketing description
    #[serde(default)]
    pub description: String,
    /// Markup override
    pub markup_percentage: Option<f64>,
    /// Delivery price override
    pub delivery_price: Option<f64>,
    /// Variants to create with the product
    #[serde(default)]
    pub variants: Vec<VariantSeed>,
}

/// A variant to seed
#[derive(Debug, Deserialize, Clone)]
pub struct VariantSeed {
    /// Sofa type value/key, or a free-text name
    pub name: String,
    /// Component names; repeat a name to add several units
    #[serde(default)]
    pub components: Vec<String>,
    /// Custom price overriding the component sum
    pub custom_price: Option<f64>,
}

/// Loads catalog configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let path = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads the configuration named by `SOFA_CONFIG`, or ./config.toml.
///
/// A missing file is not an error: the defaults are used and nothing is seeded.
pub fn load_default_config() -> Result<CatalogConfig> {
    let path = std::env::var("SOFA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        tracing::info!("No configuration file at {path}; using defaults");
        return Ok(CatalogConfig::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_catalog_config() {
        let toml_str = r#"
            [pricing]
            markup_percentage = 35.0
            delivery_price = 120.0

            [[suppliers]]
            name = "Legnami Rossi"
            code = "LR"

            [[components]]
            name = "Fusto 3 posti"
            price = 180.0
            type = "FUSTO"
            supplier = "Legnami Rossi"

            [[components]]
            name = "Piedino"
            price = 4.5

            [[products]]
            name = "Milano"
            description = "Divano modulare"

            [[products.variants]]
            name = "Divano 3 posti"
            components = ["Fusto 3 posti", "Piedino", "Piedino"]

            [[products.variants]]
            name = "Milano Relax"
            custom_price = 950.0
        "#;

        let config: CatalogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pricing.markup_percentage, 35.0);
        assert_eq!(config.pricing.delivery_price, 120.0);
        assert_eq!(config.suppliers[0].code.as_deref(), Some("LR"));
        assert_eq!(config.components.len(), 2);
        assert_eq!(config.components[0].component_type.as_deref(), Some("FUSTO"));
        assert!(config.components[1].supplier.is_none());
        assert_eq!(config.products[0].variants.len(), 2);
        assert_eq!(config.products[0].variants[0].components.len(), 3);
        assert_eq!(config.products[0].variants[1].custom_price, Some(950.0));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: CatalogConfig = toml::from_str("").unwrap();
        assert_eq!(config.pricing, PricingDefaults::default());
        assert!(config.suppliers.is_empty());
        assert!(config.products.is_empty());
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
