//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating catalog rows with sensible defaults.

use crate::{
    core::{
        component::{self, ComponentInput},
        product::{self, ProductInput},
        supplier::{self, SupplierInput},
        variant,
    },
    entities,
    errors::Result,
    models::{SofaType, Variant},
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set};

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a supplier with only a name.
pub async fn create_test_supplier(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::supplier::Model> {
    supplier::create_supplier(db, SupplierInput::named(name)).await
}

/// Creates an untyped catalog component with no supplier.
pub async fn create_test_component(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<entities::component::Model> {
    component::create_component(db, ComponentInput::new(name, price)).await
}

/// Creates a catalog component bought from `supplier_id`.
pub async fn create_supplied_component(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    supplier_id: i64,
) -> Result<entities::component::Model> {
    component::create_component(
        db,
        ComponentInput {
            supplier_id: Some(supplier_id),
            ..ComponentInput::new(name, price)
        },
    )
    .await
}

/// Creates a product with no variants.
///
/// # Defaults
/// * `markup_percentage`: 30.0
/// * `delivery_price`: 50.0
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    let input = ProductInput {
        name: name.to_string(),
        description: "Test product".to_string(),
        photo_url: None,
        delivery_price: 50.0,
        markup_percentage: 30.0,
    };
    Ok(product::create_product(db, input, Vec::new()).await?.product)
}

/// Creates a variant of `product_id` and adds the given catalog components,
/// in order. Repeat an id to add several units.
pub async fn create_variant_with_components(
    db: &DatabaseConnection,
    product_id: i64,
    sofa_type: SofaType,
    component_ids: &[i64],
) -> Result<Variant> {
    let mut created = variant::create_variant(db, Variant::new(product_id, sofa_type)).await?;
    let id = created.id.unwrap_or_default();
    for component_id in component_ids {
        created = variant::add_component_to_variant(db, id, *component_id).await?;
    }
    Ok(created)
}

/// Stores a raw variant document as-is, bypassing the mapper. The variant is
/// not linked to the product. Returns the row id.
pub async fn insert_raw_variant(
    db: &DatabaseConnection,
    product_id: i64,
    document: serde_json::Value,
) -> Result<i64> {
    let now = chrono::Utc::now().naive_utc();
    let row = entities::variant::ActiveModel {
        product_id: Set(product_id),
        document: Set(document),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(row.id)
}

/// Makes the database reject inserts of variant documents containing `marker`,
/// so a single write of a batch fails.
pub async fn reject_variant_inserts(db: &DatabaseConnection, marker: &str) -> Result<()> {
    db.execute_unprepared(&format!(
        "CREATE TRIGGER reject_variant_insert BEFORE INSERT ON variants \
         WHEN NEW.document LIKE '%{marker}%' \
         BEGIN SELECT RAISE(ABORT, 'variant insert rejected'); END"
    ))
    .await?;
    Ok(())
}

/// Makes the database reject every update of one variant row.
pub async fn reject_variant_updates(db: &DatabaseConnection, variant_id: i64) -> Result<()> {
    db.execute_unprepared(&format!(
        "CREATE TRIGGER reject_variant_update BEFORE UPDATE ON variants \
         WHEN OLD.id = {variant_id} \
         BEGIN SELECT RAISE(ABORT, 'variant update rejected'); END"
    ))
    .await?;
    Ok(())
}

/// Drops the triggers installed by [`reject_variant_inserts`] and
/// [`reject_variant_updates`].
pub async fn accept_variant_writes(db: &DatabaseConnection) -> Result<()> {
    db.execute_unprepared("DROP TRIGGER IF EXISTS reject_variant_insert")
        .await?;
    db.execute_unprepared("DROP TRIGGER IF EXISTS reject_variant_update")
        .await?;
    Ok(())
}
