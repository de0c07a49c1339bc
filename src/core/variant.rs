//! Variant business logic - persistence of priced variants.
//!
//! Every write goes through [`save_variant`] (or [`create_variant`]), which
//! recomputes the price and validates the variant before serializing it, so
//! stored documents always satisfy the pricing invariants.

use super::validate::require_amount;
use crate::{
    entities::{product, variant},
    errors::{Error, Result},
    mapper::{null_legacy_depth, write_variant},
    models::{ComponentKey, Variant},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, warn};

/// Retrieves a variant by id, parsed from its stored document.
pub async fn get_variant_by_id(
    db: &DatabaseConnection,
    variant_id: i64,
) -> Result<Option<Variant>> {
    Ok(variant::Entity::find_by_id(variant_id)
        .one(db)
        .await?
        .map(|row| row.to_variant()))
}

async fn require_variant(db: &DatabaseConnection, variant_id: i64) -> Result<Variant> {
    get_variant_by_id(db, variant_id)
        .await?
        .ok_or(Error::VariantNotFound { id: variant_id })
}

/// Retrieves every variant stored for a product, in creation order,
/// regardless of whether the product still lists it.
pub async fn get_variants_for_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<Variant>> {
    Ok(variant::Entity::find()
        .filter(variant::Column::ProductId.eq(product_id))
        .order_by_asc(variant::Column::Id)
        .all(db)
        .await?
        .iter()
        .map(variant::Model::to_variant)
        .collect())
}

/// Appends a variant id to its product's list, if the product exists and does
/// not list it already.
pub(crate) async fn link_variant(
    db: &DatabaseConnection,
    product_id: i64,
    variant_id: i64,
) -> Result<()> {
    let Some(found) = product::Entity::find_by_id(product_id).one(db).await? else {
        warn!("Cannot link variant {variant_id}: product {product_id} is gone");
        return Ok(());
    };
    let mut ids = found.variant_ids();
    if ids.contains(&variant_id) {
        return Ok(());
    }
    ids.push(variant_id);

    let mut active: product::ActiveModel = found.into();
    active.variant_ids = Set(serde_json::to_value(&ids)?);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await?;
    debug!("Linked variant {variant_id} to product {product_id}");
    Ok(())
}

async fn unlink_variant(db: &DatabaseConnection, product_id: i64, variant_id: i64) -> Result<()> {
    let Some(found) = product::Entity::find_by_id(product_id).one(db).await? else {
        return Ok(());
    };
    let ids = found.variant_ids();
    if !ids.contains(&variant_id) {
        return Ok(());
    }
    let remaining: Vec<i64> = ids.into_iter().filter(|id| *id != variant_id).collect();

    let mut active: product::ActiveModel = found.into();
    active.variant_ids = Set(serde_json::to_value(&remaining)?);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await?;
    Ok(())
}

/// Recomputes the price and runs every check a write needs.
pub(crate) fn prepare_for_write(variant: &mut Variant) -> Result<()> {
    variant.compute_price();
    variant.validate()?;
    if let Some(custom) = variant.custom_price() {
        require_amount(custom)?;
    }
    for component in variant.components() {
        require_amount(component.price)?;
    }
    require_amount(variant.price())?;
    Ok(())
}

/// Inserts a new variant row without touching the product's id list.
pub(crate) async fn insert_variant(
    db: &DatabaseConnection,
    mut variant: Variant,
) -> Result<Variant> {
    prepare_for_write(&mut variant)?;

    let now = chrono::Utc::now().naive_utc();
    variant.id = None;
    let row = variant::ActiveModel {
        product_id: Set(variant.product_id),
        document: Set(write_variant(&variant)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    // Store the id inside the document as well, for readers of raw documents.
    variant.id = Some(row.id);
    let mut active: variant::ActiveModel = row.into();
    active.document = Set(write_variant(&variant));
    let row = active.update(db).await?;

    info!(
        "Created variant {} ({}) for product {} at {:.2}",
        variant.display_name(),
        row.id,
        variant.product_id,
        variant.price()
    );
    Ok(row.to_variant())
}

/// Creates a variant for an existing product and appends it to the product's
/// variant list.
///
/// # Errors
/// Returns an error if:
/// - The variant fails [`Variant::validate`]
/// - The custom price is negative
/// - The product does not exist
/// - A database write fails
pub async fn create_variant(db: &DatabaseConnection, mut variant: Variant) -> Result<Variant> {
    prepare_for_write(&mut variant)?;

    if product::Entity::find_by_id(variant.product_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(Error::ProductNotFound {
            id: variant.product_id,
        });
    }

    let created = insert_variant(db, variant).await?;
    if let Some(id) = created.id {
        link_variant(db, created.product_id, id).await?;
    }
    Ok(created)
}

/// Recomputes, validates and writes back an existing variant.
///
/// # Errors
/// Returns [`Error::Validation`] for a variant that was never saved or fails
/// validation, [`Error::InvalidAmount`] for a negative custom price and
/// [`Error::VariantNotFound`] when the row is gone.
pub async fn save_variant(db: &DatabaseConnection, variant: &Variant) -> Result<Variant> {
    let Some(variant_id) = variant.id else {
        return Err(Error::validation("Cannot save a variant that was never created"));
    };
    let mut variant = variant.clone();
    prepare_for_write(&mut variant)?;
    store_variant(db, variant_id, &variant).await
}

async fn store_variant(
    db: &DatabaseConnection,
    variant_id: i64,
    variant: &Variant,
) -> Result<Variant> {
    let row = variant::Entity::find_by_id(variant_id)
        .one(db)
        .await?
        .ok_or(Error::VariantNotFound { id: variant_id })?;
    if row.product_id != variant.product_id {
        warn!(
            "Variant {variant_id} moves from product {} to {}",
            row.product_id, variant.product_id
        );
    }

    let mut active: variant::ActiveModel = row.into();
    active.product_id = Set(variant.product_id);
    active.document = Set(write_variant(variant));
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let row = active.update(db).await?;
    debug!("Saved variant {variant_id} at {:.2}", variant.price());
    Ok(row.to_variant())
}

/// Adds one unit of a catalog component to a variant and saves it.
///
/// # Errors
/// [`Error::VariantNotFound`] or [`Error::ComponentNotFound`] when either
/// side is missing, plus any [`save_variant`] error.
pub async fn add_component_to_variant(
    db: &DatabaseConnection,
    variant_id: i64,
    component_id: i64,
) -> Result<Variant> {
    let mut variant = require_variant(db, variant_id).await?;
    let component = super::component::get_component_by_id(db, component_id)
        .await?
        .ok_or(Error::ComponentNotFound { id: component_id })?;

    variant.add_component(component.to_component());
    save_variant(db, &variant).await
}

/// Removes every occurrence of a component from a variant and saves it.
pub async fn remove_component_from_variant(
    db: &DatabaseConnection,
    variant_id: i64,
    key: &ComponentKey,
) -> Result<Variant> {
    let mut variant = require_variant(db, variant_id).await?;
    let removed = variant.remove_components(key);
    if removed == 0 {
        debug!("Variant {variant_id} has no component {key}");
    }
    save_variant(db, &variant).await
}

/// Strips a deleted catalog component from a variant and reprices it.
///
/// Unlike [`remove_component_from_variant`] this skips [`Variant::validate`]:
/// a stored variant that predates the naming rules must not block the
/// deletion of a component it embeds.
pub(crate) async fn strip_component(
    db: &DatabaseConnection,
    variant_id: i64,
    key: &ComponentKey,
) -> Result<Variant> {
    let mut variant = require_variant(db, variant_id).await?;
    variant.remove_components(key);
    if let Err(e) = variant.validate() {
        debug!("Stripping {key} from variant {variant_id} despite: {e}");
    }
    store_variant(db, variant_id, &variant).await
}

/// Switches a variant to a custom price and saves it.
///
/// # Errors
/// [`Error::InvalidAmount`] for a negative or non-finite price, checked before
/// anything is read.
pub async fn set_variant_custom_price(
    db: &DatabaseConnection,
    variant_id: i64,
    price: f64,
) -> Result<Variant> {
    require_amount(price)?;
    let mut variant = require_variant(db, variant_id).await?;
    variant.set_custom_price(price);
    save_variant(db, &variant).await
}

/// Switches a variant back to component pricing and saves it.
pub async fn set_variant_components_mode(
    db: &DatabaseConnection,
    variant_id: i64,
) -> Result<Variant> {
    let mut variant = require_variant(db, variant_id).await?;
    variant.set_components_mode();
    save_variant(db, &variant).await
}

/// Deletes a variant and removes it from its product's list.
pub async fn delete_variant(db: &DatabaseConnection, variant_id: i64) -> Result<Variant> {
    let variant = require_variant(db, variant_id).await?;
    variant::Entity::delete_by_id(variant_id).exec(db).await?;
    unlink_variant(db, variant.product_id, variant_id).await?;
    info!("Deleted variant {} ({variant_id})", variant.display_name());
    Ok(variant)
}

/// Rewrites stored documents that still carry the legacy `depth` field.
///
/// The current fields are written over the stored document, so
/// `closedDepth` picks up the legacy value; `depth` is set to null. Fields
/// this crate does not know about are left alone. Returns the ids of the
/// upgraded variants.
pub async fn upgrade_legacy_documents(db: &DatabaseConnection) -> Result<Vec<i64>> {
    let mut upgraded = Vec::new();
    for row in variant::Entity::find()
        .order_by_asc(variant::Column::Id)
        .all(db)
        .await?
    {
        let mut document = row.document.clone();
        if !null_legacy_depth(&mut document) {
            continue;
        }
        let parsed = row.to_variant();
        if let (Some(stored), serde_json::Value::Object(current)) =
            (document.as_object_mut(), write_variant(&parsed))
        {
            stored.extend(current);
        }

        let id = row.id;
        let mut active: variant::ActiveModel = row.into();
        active.document = Set(document);
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        active.update(db).await?;
        debug!("Upgraded legacy document of variant {id}");
        upgraded.push(id);
    }
    if !upgraded.is_empty() {
        info!("Upgraded {} legacy variant documents", upgraded.len());
    }
    Ok(upgraded)
}
