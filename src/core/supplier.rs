//! Supplier business logic - Handles all supplier-related operations.
//!
//! Deleting a supplier cascades: every catalog component bought from it is
//! deleted too, which in turn strips those components from every variant.
//! Callers are expected to show [`supplier_dependents`] to the user and only
//! call [`delete_supplier`] after explicit confirmation.

use super::validate::{optional_text, require_name, same_name};
use crate::{
    entities::{component, supplier},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// User-editable supplier fields.
#[derive(Debug, Clone, Default)]
pub struct SupplierInput {
    /// Company name, required and unique
    pub name: String,
    /// Supplier code, unique when present
    pub code: Option<String>,
    /// Contact e-mail
    pub email: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

impl SupplierInput {
    /// Input with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// What a supplier deletion removed.
#[derive(Debug, Clone)]
pub struct SupplierDeletion {
    /// The deleted supplier
    pub supplier: supplier::Model,
    /// Ids of the catalog components deleted with it
    pub deleted_components: Vec<i64>,
    /// Ids of the variants that lost components and were repriced
    pub updated_variants: Vec<i64>,
}

/// Retrieves all suppliers, ordered alphabetically by name.
pub async fn get_all_suppliers(db: &DatabaseConnection) -> Result<Vec<supplier::Model>> {
    supplier::Entity::find()
        .order_by_asc(supplier::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific supplier by its unique ID.
pub async fn get_supplier_by_id(
    db: &DatabaseConnection,
    supplier_id: i64,
) -> Result<Option<supplier::Model>> {
    supplier::Entity::find_by_id(supplier_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Rejects a name or code another supplier already uses.
async fn ensure_unique(
    db: &DatabaseConnection,
    name: &str,
    code: Option<&str>,
    except_id: Option<i64>,
) -> Result<()> {
    for existing in get_all_suppliers(db).await? {
        if Some(existing.id) == except_id {
            continue;
        }
        if same_name(&existing.name, name) {
            return Err(Error::DuplicateName {
                kind: "supplier",
                name: name.to_string(),
            });
        }
        if let (Some(theirs), Some(ours)) = (existing.code.as_deref(), code)
            && same_name(theirs, ours)
        {
            return Err(Error::DuplicateName {
                kind: "supplier code",
                name: ours.to_string(),
            });
        }
    }
    Ok(())
}

/// Creates a new supplier after validating the input.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - Another supplier has the same name or code (case-insensitive)
/// - The database insert fails
pub async fn create_supplier(
    db: &DatabaseConnection,
    input: SupplierInput,
) -> Result<supplier::Model> {
    let name = require_name("Supplier", &input.name)?;
    let code = optional_text(input.code);
    ensure_unique(db, &name, code.as_deref(), None).await?;

    let now = chrono::Utc::now().naive_utc();
    let supplier = supplier::ActiveModel {
        name: Set(name),
        code: Set(code),
        email: Set(optional_text(input.email)),
        notes: Set(optional_text(input.notes)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = supplier.insert(db).await?;
    info!("Created supplier {} ({})", created.name, created.id);
    Ok(created)
}

/// Replaces a supplier's editable fields.
///
/// # Errors
/// Same validation as [`create_supplier`], plus [`Error::SupplierNotFound`].
pub async fn update_supplier(
    db: &DatabaseConnection,
    supplier_id: i64,
    input: SupplierInput,
) -> Result<supplier::Model> {
    let name = require_name("Supplier", &input.name)?;
    let code = optional_text(input.code);

    let mut supplier: supplier::ActiveModel = get_supplier_by_id(db, supplier_id)
        .await?
        .ok_or(Error::SupplierNotFound { id: supplier_id })?
        .into();
    ensure_unique(db, &name, code.as_deref(), Some(supplier_id)).await?;

    supplier.name = Set(name);
    supplier.code = Set(code);
    supplier.email = Set(optional_text(input.email));
    supplier.notes = Set(optional_text(input.notes));
    supplier.updated_at = Set(chrono::Utc::now().naive_utc());

    supplier.update(db).await.map_err(Into::into)
}

/// Catalog components bought from this supplier, i.e. what
/// [`delete_supplier`] would delete.
pub async fn supplier_dependents(
    db: &DatabaseConnection,
    supplier_id: i64,
) -> Result<Vec<component::Model>> {
    component::Entity::find()
        .filter(component::Column::SupplierId.eq(supplier_id))
        .order_by_asc(component::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a supplier and, first, every component bought from it.
///
/// Component deletions are independent writes. If any fails, the supplier is
/// kept and the error is returned; components already deleted stay deleted,
/// so calling this again finishes the job.
pub async fn delete_supplier(
    db: &DatabaseConnection,
    supplier_id: i64,
) -> Result<SupplierDeletion> {
    let supplier = get_supplier_by_id(db, supplier_id)
        .await?
        .ok_or(Error::SupplierNotFound { id: supplier_id })?;

    let dependents = supplier_dependents(db, supplier_id).await?;
    let total = dependents.len();
    let mut deleted_components = Vec::with_capacity(total);
    let mut updated_variants = Vec::new();
    let mut failures = Vec::new();

    for dependent in dependents {
        match super::component::delete_component(db, dependent.id).await {
            Ok(deletion) => {
                deleted_components.push(dependent.id);
                updated_variants.extend(deletion.updated_variants);
            }
            Err(e) => failures.push(format!("component {}: {e}", dependent.id)),
        }
    }

    if !failures.is_empty() {
        return Err(Error::BatchFailed {
            failed: failures.len(),
            total,
            message: failures.join("; "),
        });
    }

    supplier::Entity::delete_by_id(supplier_id).exec(db).await?;
    updated_variants.sort_unstable();
    updated_variants.dedup();
    info!(
        "Deleted supplier {} with {} components ({} variants repriced)",
        supplier.name,
        deleted_components.len(),
        updated_variants.len()
    );

    Ok(SupplierDeletion {
        supplier,
        deleted_components,
        updated_variants,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::models::SofaType;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_supplier_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_supplier(&db, SupplierInput::named("   ")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_supplier_trims_fields() -> Result<()> {
        let db = setup_test_db().await?;

        let supplier = create_supplier(
            &db,
            SupplierInput {
                name: "  Legnami Rossi ".to_string(),
                code: Some(" LR ".to_string()),
                email: Some("  ".to_string()),
                notes: None,
            },
        )
        .await?;

        assert_eq!(supplier.name, "Legnami Rossi");
        assert_eq!(supplier.code.as_deref(), Some("LR"));
        assert_eq!(supplier.email, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_name_and_code_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        create_supplier(
            &db,
            SupplierInput {
                name: "Legnami Rossi".to_string(),
                code: Some("LR".to_string()),
                ..SupplierInput::default()
            },
        )
        .await?;

        let same_name = create_supplier(&db, SupplierInput::named("legnami rossi")).await;
        assert!(matches!(
            same_name.unwrap_err(),
            Error::DuplicateName { kind: "supplier", name: _ }
        ));

        let same_code = create_supplier(
            &db,
            SupplierInput {
                name: "Altro".to_string(),
                code: Some("lr".to_string()),
                ..SupplierInput::default()
            },
        )
        .await;
        assert!(matches!(
            same_code.unwrap_err(),
            Error::DuplicateName { kind: "supplier code", name: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_supplier_keeps_own_name() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = create_test_supplier(&db, "Gomme Srl").await?;

        let updated = update_supplier(
            &db,
            supplier.id,
            SupplierInput {
                name: "Gomme Srl".to_string(),
                email: Some("ordini@gomme.it".to_string()),
                ..SupplierInput::default()
            },
        )
        .await?;
        assert_eq!(updated.email.as_deref(), Some("ordini@gomme.it"));

        let missing = update_supplier(&db, 999, SupplierInput::named("X")).await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::SupplierNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_supplier_cascades_to_components_and_variants() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = create_test_supplier(&db, "Legnami Rossi").await?;
        let other = create_test_supplier(&db, "Ferramenta Bianchi").await?;
        let frame = create_supplied_component(&db, "Fusto", 100.0, supplier.id).await?;
        let feet = create_supplied_component(&db, "Piedino", 5.0, other.id).await?;
        let product = create_test_product(&db, "Milano").await?;
        let variant = create_variant_with_components(
            &db,
            product.id,
            SofaType::TwoSeat,
            &[frame.id, feet.id, feet.id],
        )
        .await?;
        assert_eq!(variant.price(), 110.0);

        let dependents = supplier_dependents(&db, supplier.id).await?;
        assert_eq!(dependents.len(), 1);

        let deletion = delete_supplier(&db, supplier.id).await?;
        assert_eq!(deletion.deleted_components, vec![frame.id]);
        assert_eq!(deletion.updated_variants, vec![variant.id.unwrap()]);

        assert!(get_supplier_by_id(&db, supplier.id).await?.is_none());
        assert!(
            crate::core::component::get_component_by_id(&db, frame.id)
                .await?
                .is_none()
        );
        let repriced = crate::core::variant::get_variant_by_id(&db, variant.id.unwrap())
            .await?
            .unwrap();
        assert_eq!(repriced.components().len(), 2);
        assert_eq!(repriced.price(), 10.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_supplier() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_supplier(&db, 42).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::SupplierNotFound { id: 42 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_supplier_partial_failure_then_retry() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = create_test_supplier(&db, "Legnami Rossi").await?;
        let frame = create_supplied_component(&db, "Fusto", 100.0, supplier.id).await?;
        let net = create_supplied_component(&db, "Rete", 30.0, supplier.id).await?;
        let product = create_test_product(&db, "Milano").await?;
        let variant =
            create_variant_with_components(&db, product.id, SofaType::TwoSeat, &[frame.id])
                .await?;
        reject_variant_updates(&db, variant.id.unwrap()).await?;

        let result = delete_supplier(&db, supplier.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::BatchFailed {
                failed: 1,
                total: 2,
                message: _
            }
        ));
        assert!(get_supplier_by_id(&db, supplier.id).await?.is_some());
        assert!(
            crate::core::component::get_component_by_id(&db, net.id)
                .await?
                .is_none()
        );
        assert!(
            crate::core::component::get_component_by_id(&db, frame.id)
                .await?
                .is_some()
        );

        accept_variant_writes(&db).await?;
        let deletion = delete_supplier(&db, supplier.id).await?;
        assert_eq!(deletion.deleted_components, vec![frame.id]);
        assert_eq!(deletion.updated_variants, vec![variant.id.unwrap()]);
        assert!(get_supplier_by_id(&db, supplier.id).await?.is_none());

        Ok(())
    }
}
