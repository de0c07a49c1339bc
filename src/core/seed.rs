//! First-run catalog seeding from `config.toml`.

use super::{
    component::{ComponentInput, create_component},
    product::{ProductInput, create_product},
    supplier::{SupplierInput, create_supplier},
};
use crate::{
    config::catalog::{CatalogConfig, ComponentSeed, VariantSeed},
    entities::{component, product, supplier},
    errors::Result,
    models::{Component, ComponentType, SofaType, Variant},
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Counts of what a seeding run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Suppliers created
    pub suppliers: usize,
    /// Catalog components created
    pub components: usize,
    /// Products created
    pub products: usize,
    /// Variants created across all products
    pub variants: usize,
}

impl SeedSummary {
    /// True when the run created nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.suppliers == 0 && self.components == 0 && self.products == 0
    }
}

async fn catalog_is_empty(db: &DatabaseConnection) -> Result<bool> {
    Ok(supplier::Entity::find().count(db).await? == 0
        && component::Entity::find().count(db).await? == 0
        && product::Entity::find().count(db).await? == 0)
}

fn component_input(seed: &ComponentSeed, suppliers: &HashMap<String, i64>) -> ComponentInput {
    let component_type = seed.component_type.as_deref().and_then(|raw| {
        let parsed = ComponentType::from_str_loose(raw);
        if parsed.is_none() {
            warn!("Component '{}' has unknown type '{raw}'; seeding it untyped", seed.name);
        }
        parsed
    });
    let sofa_type = seed.sofa_type.as_deref().and_then(|raw| {
        let parsed = SofaType::from_str_loose(raw);
        if parsed.is_none() {
            warn!("Component '{}' has unknown sofa type '{raw}'", seed.name);
        }
        parsed
    });
    let supplier_id = seed.supplier.as_deref().and_then(|name| {
        let id = suppliers.get(&name.trim().to_lowercase()).copied();
        if id.is_none() {
            warn!("Component '{}' names unknown supplier '{name}'", seed.name);
        }
        id
    });

    ComponentInput {
        supplier_id,
        component_type,
        sofa_type,
        ..ComponentInput::new(seed.name.clone(), seed.price)
    }
}

fn build_variant(seed: &VariantSeed, catalog: &HashMap<String, Component>) -> Variant {
    let mut variant = match SofaType::from_str_loose(&seed.name) {
        Some(sofa_type) if !sofa_type.is_custom() => Variant::new(0, sofa_type),
        _ => Variant::with_custom_name(0, seed.name.trim()),
    };

    for name in &seed.components {
        match catalog.get(&name.trim().to_lowercase()) {
            Some(component) => {
                variant.add_component(component.clone());
            }
            None => warn!("Variant '{}' names unknown component '{name}'", seed.name),
        }
    }
    if let Some(price) = seed.custom_price {
        variant.set_custom_price(price);
    }
    variant
}

/// Populates an empty catalog from the configuration.
///
/// Nothing happens when any supplier, component or product already exists.
/// Unknown component types, sofa types, suppliers and component names are
/// logged and skipped rather than failing the run.
///
/// # Errors
/// Returns the first failing write; earlier writes are kept.
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();
    if !catalog_is_empty(db).await? {
        info!("Catalog already populated; skipping seed.");
        return Ok(summary);
    }
    info!(
        "Seeding catalog: {} suppliers, {} components, {} products",
        config.suppliers.len(),
        config.components.len(),
        config.products.len()
    );

    let mut suppliers = HashMap::new();
    for seed in &config.suppliers {
        let created = create_supplier(
            db,
            SupplierInput {
                name: seed.name.clone(),
                code: seed.code.clone(),
                email: seed.email.clone(),
                notes: None,
            },
        )
        .await?;
        suppliers.insert(created.name.to_lowercase(), created.id);
        summary.suppliers += 1;
    }

    let mut catalog = HashMap::new();
    for seed in &config.components {
        let created = create_component(db, component_input(seed, &suppliers)).await?;
        debug!("Seeded component {} ({})", created.name, created.id);
        catalog.insert(created.name.to_lowercase(), created.to_component());
        summary.components += 1;
    }

    for seed in &config.products {
        let variants: Vec<Variant> = seed
            .variants
            .iter()
            .map(|v| build_variant(v, &catalog))
            .collect();
        let input = ProductInput {
            name: seed.name.clone(),
            description: seed.description.clone(),
            photo_url: None,
            delivery_price: seed
                .delivery_price
                .unwrap_or(config.pricing.delivery_price),
            markup_percentage: seed
                .markup_percentage
                .unwrap_or(config.pricing.markup_percentage),
        };
        let creation = create_product(db, input, variants).await?;
        summary.products += 1;
        summary.variants += creation.variants.len();
    }

    info!("Finished seeding catalog: {summary:?}");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::product::{get_all_products, get_product_variants};
    use crate::models::PricingMode;
    use crate::test_utils::*;

    const CATALOG: &str = r#"
[pricing]
markup_percentage = 40.0
delivery_price = 60.0

[[suppliers]]
name = "Legnami Rossi"
code = "LR"

[[components]]
name = "Fusto 2P"
price = 100.0
type = "FUSTO"
supplier = "Legnami Rossi"

[[components]]
name = "Gomma HR"
price = 25.0
type = "gomma"

[[components]]
name = "Cuscino"
price = 10.0
type = "PIUME"

[[products]]
name = "Milano"
delivery_price = 80.0

[[products.variants]]
name = "Divano 2 posti"
components = ["Fusto 2P", "Gomma HR", "Gomma HR", "Pouf"]

[[products.variants]]
name = "Milano Relax"
custom_price = 450.0
"#;

    #[tokio::test]
    async fn test_seed_empty_catalog() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let config: CatalogConfig = toml::from_str(CATALOG).unwrap();

        let summary = seed_catalog(&db, &config).await?;
        assert_eq!(
            summary,
            SeedSummary {
                suppliers: 1,
                components: 3,
                products: 1,
                variants: 2,
            }
        );

        let products = get_all_products(&db).await?;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].markup_percentage, 40.0);
        assert_eq!(products[0].delivery_price, 80.0);

        let variants = get_product_variants(&db, products[0].id).await?;
        assert_eq!(variants[0].long_name(), SofaType::TwoSeat);
        assert_eq!(variants[0].components().len(), 3);
        assert_eq!(variants[0].price(), 150.0);
        assert_eq!(
            variants[0].components()[0].component_type,
            Some(ComponentType::Fusto)
        );
        assert!(variants[0].components()[0].supplier_id.is_some());
        assert_eq!(variants[1].display_name(), "Milano Relax");
        assert_eq!(variants[1].pricing_mode(), PricingMode::Custom);
        assert_eq!(variants[1].price(), 450.0);

        let untyped = crate::core::component::get_component_by_name(&db, "cuscino")
            .await?
            .unwrap();
        assert!(untyped.component_type.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_skips_populated_catalog() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_supplier(&db, "Existing").await?;
        let config: CatalogConfig = toml::from_str(CATALOG).unwrap();

        let summary = seed_catalog(&db, &config).await?;

        assert!(summary.is_empty());
        assert!(get_all_products(&db).await?.is_empty());
        Ok(())
    }
}
