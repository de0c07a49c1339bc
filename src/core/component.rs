//! Component catalog business logic.
//!
//! Catalog rows are the source variants copy components from. A variant keeps
//! its own copy, so price edits here apply to variants only when a component
//! is added again. Deleting a catalog component strips every copy of it from
//! every variant (matched by id) and reprices those variants.

use super::validate::{optional_text, require_amount, require_name, same_name};
use crate::{
    entities::{component, product, variant},
    errors::{Error, Result},
    models::{ComponentKey, ComponentType, SofaType},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;
use tracing::{info, warn};

/// User-editable component fields.
#[derive(Debug, Clone, Default)]
pub struct ComponentInput {
    /// Display name, required and unique
    pub name: String,
    /// Unit price, finite and non-negative
    pub price: f64,
    /// Supplier the component is bought from
    pub supplier_id: Option<i64>,
    /// Category
    pub component_type: Option<ComponentType>,
    /// Sofa type this component is specific to
    pub sofa_type: Option<SofaType>,
    /// Free-text label for the sofa type association
    pub sofa_type_label: Option<String>,
}

impl ComponentInput {
    /// Input with a name and a price only.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            ..Self::default()
        }
    }
}

/// One variant that embeds a catalog component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentUsage {
    /// Variant embedding the component
    pub variant_id: i64,
    /// Display name of the variant
    pub variant_name: String,
    /// Product owning the variant
    pub product_id: i64,
    /// Product name, `None` when the product no longer exists
    pub product_name: Option<String>,
    /// How many times the component appears in the variant
    pub occurrences: usize,
}

/// What a component deletion changed.
#[derive(Debug, Clone)]
pub struct ComponentDeletion {
    /// The deleted catalog row
    pub component: component::Model,
    /// Variants that lost the component and were repriced
    pub updated_variants: Vec<i64>,
}

/// Retrieves all catalog components, ordered alphabetically by name.
pub async fn get_all_components(db: &DatabaseConnection) -> Result<Vec<component::Model>> {
    component::Entity::find()
        .order_by_asc(component::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific catalog component by its unique ID.
pub async fn get_component_by_id(
    db: &DatabaseConnection,
    component_id: i64,
) -> Result<Option<component::Model>> {
    component::Entity::find_by_id(component_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a catalog component by name, case-insensitively.
pub async fn get_component_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<component::Model>> {
    Ok(get_all_components(db)
        .await?
        .into_iter()
        .find(|c| same_name(&c.name, name)))
}

struct ValidComponent {
    name: String,
    price: f64,
    sofa_type_label: Option<String>,
}

fn validate_input(input: &ComponentInput) -> Result<ValidComponent> {
    let name = require_name("Component", &input.name)?;
    let price = require_amount(input.price)?;
    let sofa_type_label = optional_text(input.sofa_type_label.clone());
    if sofa_type_label.is_some() && input.sofa_type.is_none() {
        return Err(Error::validation(
            "A sofa type label needs a sofa type to describe",
        ));
    }
    Ok(ValidComponent {
        name,
        price,
        sofa_type_label,
    })
}

async fn ensure_unique(db: &DatabaseConnection, name: &str, except_id: Option<i64>) -> Result<()> {
    if let Some(existing) = get_component_by_name(db, name).await?
        && Some(existing.id) != except_id
    {
        return Err(Error::DuplicateName {
            kind: "component",
            name: name.to_string(),
        });
    }
    Ok(())
}

async fn ensure_supplier_exists(db: &DatabaseConnection, supplier_id: Option<i64>) -> Result<()> {
    if let Some(id) = supplier_id
        && super::supplier::get_supplier_by_id(db, id).await?.is_none()
    {
        return Err(Error::SupplierNotFound { id });
    }
    Ok(())
}

/// Creates a catalog component after validating the input.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or already used by another component
/// - The price is negative or not finite
/// - A sofa type label is given without a sofa type
/// - The referenced supplier does not exist
/// - The database insert fails
pub async fn create_component(
    db: &DatabaseConnection,
    input: ComponentInput,
) -> Result<component::Model> {
    let valid = validate_input(&input)?;
    ensure_unique(db, &valid.name, None).await?;
    ensure_supplier_exists(db, input.supplier_id).await?;

    let now = chrono::Utc::now().naive_utc();
    let component = component::ActiveModel {
        name: Set(valid.name),
        price: Set(valid.price),
        supplier_id: Set(input.supplier_id),
        component_type: Set(input.component_type.map(|t| t.key().to_string())),
        sofa_type: Set(input.sofa_type.map(|t| t.as_str().to_string())),
        sofa_type_label: Set(valid.sofa_type_label),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = component.insert(db).await?;
    info!(
        "Created component {} ({}) at {:.2}",
        created.name, created.id, created.price
    );
    Ok(created)
}

/// Replaces a catalog component's editable fields. Variants keep their
/// existing copies.
///
/// # Errors
/// Same validation as [`create_component`], plus [`Error::ComponentNotFound`].
pub async fn update_component(
    db: &DatabaseConnection,
    component_id: i64,
    input: ComponentInput,
) -> Result<component::Model> {
    let valid = validate_input(&input)?;

    let mut component: component::ActiveModel = get_component_by_id(db, component_id)
        .await?
        .ok_or(Error::ComponentNotFound { id: component_id })?
        .into();
    ensure_unique(db, &valid.name, Some(component_id)).await?;
    ensure_supplier_exists(db, input.supplier_id).await?;

    component.name = Set(valid.name);
    component.price = Set(valid.price);
    component.supplier_id = Set(input.supplier_id);
    component.component_type = Set(input.component_type.map(|t| t.key().to_string()));
    component.sofa_type = Set(input.sofa_type.map(|t| t.as_str().to_string()));
    component.sofa_type_label = Set(valid.sofa_type_label);
    component.updated_at = Set(chrono::Utc::now().naive_utc());

    component.update(db).await.map_err(Into::into)
}

/// Lists every variant embedding this catalog component, with the owning
/// product's name. This is what a deletion confirmation shows.
pub async fn component_usage(
    db: &DatabaseConnection,
    component_id: i64,
) -> Result<Vec<ComponentUsage>> {
    let key = ComponentKey::Id(component_id);
    let product_names: HashMap<i64, String> = product::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    let rows = variant::Entity::find()
        .order_by_asc(variant::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .iter()
        .map(variant::Model::to_variant)
        .filter_map(|v| {
            let occurrences = v.quantity_of(&key);
            (occurrences > 0).then(|| ComponentUsage {
                variant_id: v.id.unwrap_or_default(),
                variant_name: v.display_name().to_string(),
                product_id: v.product_id,
                product_name: product_names.get(&v.product_id).cloned(),
                occurrences,
            })
        })
        .collect())
}

/// Deletes a catalog component after stripping it from every variant.
///
/// Variant updates are independent writes. If any fails, the catalog row is
/// kept and [`Error::BatchFailed`] is returned; variants already updated stay
/// updated, so calling this again finishes the job.
pub async fn delete_component(
    db: &DatabaseConnection,
    component_id: i64,
) -> Result<ComponentDeletion> {
    let component = get_component_by_id(db, component_id)
        .await?
        .ok_or(Error::ComponentNotFound { id: component_id })?;
    let key = ComponentKey::Id(component_id);

    let usages = component_usage(db, component_id).await?;
    let total = usages.len();
    let mut updated_variants = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for usage in usages {
        match super::variant::strip_component(db, usage.variant_id, &key).await {
            Ok(_) => updated_variants.push(usage.variant_id),
            Err(e) => {
                warn!(
                    "Failed to strip component {component_id} from variant {}: {e}",
                    usage.variant_id
                );
                failures.push(format!("variant {}: {e}", usage.variant_id));
            }
        }
    }

    if !failures.is_empty() {
        return Err(Error::BatchFailed {
            failed: failures.len(),
            total,
            message: failures.join("; "),
        });
    }

    component::Entity::delete_by_id(component_id).exec(db).await?;
    info!(
        "Deleted component {} ({component_id}); {} variants repriced",
        component.name,
        updated_variants.len()
    );

    Ok(ComponentDeletion {
        component,
        updated_variants,
    })
}
