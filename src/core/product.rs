//! Product business logic - Handles all product-related operations.
//!
//! A product groups variants by id. Creating a product with its variants is a
//! multi-document save: the product row is written first, then each variant
//! independently. A failed variant write does not undo the rest; the caller
//! gets [`Error::BatchFailed`] and can retry the missing variants, and
//! [`retry_variant_links`] repairs a product whose id list fell behind.

use super::validate::{optional_text, require_amount, require_markup, require_name};
use crate::{
    entities::{product, variant},
    errors::{Error, Result},
    models::Variant,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;
use tracing::{info, warn};

/// User-editable product fields.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    /// Product name, required
    pub name: String,
    /// Marketing description
    pub description: String,
    /// Public URL of the product photo
    pub photo_url: Option<String>,
    /// Flat delivery price
    pub delivery_price: f64,
    /// Markup percentage in `[0, 100)`
    pub markup_percentage: f64,
}

/// Result of creating a product together with its variants.
#[derive(Debug, Clone)]
pub struct ProductCreation {
    /// The product as stored after linking
    pub product: product::Model,
    /// The created variants, in input order
    pub variants: Vec<Variant>,
}

struct ValidProduct {
    name: String,
    description: String,
    photo_url: Option<String>,
    delivery_price: f64,
    markup_percentage: f64,
}

fn validate_input(input: ProductInput) -> Result<ValidProduct> {
    Ok(ValidProduct {
        name: require_name("Product", &input.name)?,
        description: input.description.trim().to_string(),
        photo_url: optional_text(input.photo_url),
        delivery_price: require_amount(input.delivery_price)?,
        markup_percentage: require_markup(input.markup_percentage)?,
    })
}

/// Retrieves all products, ordered alphabetically by name.
pub async fn get_all_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    product::Entity::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    product::Entity::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a product and then each of its variants.
///
/// Everything is validated before the first write. Variant writes are
/// independent: all are attempted, the successful ones are linked to the
/// product, and any failure is reported as [`Error::BatchFailed`] without
/// rolling back the product or the other variants.
///
/// # Errors
/// Returns an error if:
/// - The name is empty, the delivery price negative or the markup outside `[0, 100)`
/// - Any variant fails validation
/// - The product insert fails
/// - One or more variant writes fail ([`Error::BatchFailed`])
pub async fn create_product(
    db: &DatabaseConnection,
    input: ProductInput,
    variants: Vec<Variant>,
) -> Result<ProductCreation> {
    let valid = validate_input(input)?;
    let mut prepared = Vec::with_capacity(variants.len());
    for mut variant in variants {
        super::variant::prepare_for_write(&mut variant)?;
        prepared.push(variant);
    }

    let now = chrono::Utc::now().naive_utc();
    let product = product::ActiveModel {
        name: Set(valid.name),
        description: Set(valid.description),
        photo_url: Set(valid.photo_url),
        delivery_price: Set(valid.delivery_price),
        markup_percentage: Set(valid.markup_percentage),
        variant_ids: Set(serde_json::json!([])),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!("Created product {} ({})", product.name, product.id);

    let total = prepared.len();
    let mut created = Vec::with_capacity(total);
    let mut failures = Vec::new();
    for mut variant in prepared {
        variant.product_id = product.id;
        let name = variant.display_name().to_string();
        match super::variant::insert_variant(db, variant).await {
            Ok(v) => created.push(v),
            Err(e) => {
                warn!("Variant {name} of product {} failed: {e}", product.id);
                failures.push(format!("variant {name}: {e}"));
            }
        }
    }

    let ids: Vec<i64> = created.iter().filter_map(|v| v.id).collect();
    let mut active: product::ActiveModel = product.into();
    active.variant_ids = Set(serde_json::to_value(&ids)?);
    let product = active.update(db).await?;

    if !failures.is_empty() {
        return Err(Error::BatchFailed {
            failed: failures.len(),
            total,
            message: format!(
                "product {} was created; retry the missing variants: {}",
                product.id,
                failures.join("; ")
            ),
        });
    }

    Ok(ProductCreation {
        product,
        variants: created,
    })
}

/// Replaces a product's editable fields. The variant list is untouched.
///
/// # Errors
/// Same validation as [`create_product`], plus [`Error::ProductNotFound`].
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    let valid = validate_input(input)?;

    let mut product: product::ActiveModel = get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    product.name = Set(valid.name);
    product.description = Set(valid.description);
    product.photo_url = Set(valid.photo_url);
    product.delivery_price = Set(valid.delivery_price);
    product.markup_percentage = Set(valid.markup_percentage);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    product.update(db).await.map_err(Into::into)
}

/// Loads a product's variants in the product's display order. Ids whose
/// variant no longer exists are skipped with a warning.
pub async fn get_product_variants(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<Variant>> {
    let product = get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;
    let ids = product.variant_ids();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_id: HashMap<i64, Variant> = variant::Entity::find()
        .filter(variant::Column::Id.is_in(ids.clone()))
        .all(db)
        .await?
        .iter()
        .map(|row| (row.id, row.to_variant()))
        .collect();

    Ok(ids
        .into_iter()
        .filter_map(|id| {
            let found = by_id.remove(&id);
            if found.is_none() {
                warn!("Product {product_id} lists missing variant {id}");
            }
            found
        })
        .collect())
}

/// Appends to the product's list every stored variant of this product that
/// the list is missing, in creation order. Returns the ids added.
pub async fn retry_variant_links(db: &DatabaseConnection, product_id: i64) -> Result<Vec<i64>> {
    let product = get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;
    let mut ids = product.variant_ids();

    let missing: Vec<i64> = super::variant::get_variants_for_product(db, product_id)
        .await?
        .into_iter()
        .filter_map(|v| v.id)
        .filter(|id| !ids.contains(id))
        .collect();
    if missing.is_empty() {
        return Ok(missing);
    }

    ids.extend(&missing);
    let mut active: product::ActiveModel = product.into();
    active.variant_ids = Set(serde_json::to_value(&ids)?);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await?;
    info!("Relinked {} variants to product {product_id}", missing.len());
    Ok(missing)
}

/// Deletes a product row. Its variants are kept; readers tolerate the
/// dangling product id.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let product = get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;
    product::Entity::delete_by_id(product_id).exec(db).await?;
    info!(
        "Deleted product {} ({product_id}); {} variants left in place",
        product.name,
        product.variant_ids().len()
    );
    Ok(product)
}
