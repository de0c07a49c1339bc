//! Product directory - session-scoped lookup of product ids by name.
//!
//! Built once per session. Lookups never touch the database, so product
//! writes only show up after [`ProductDirectory::refresh`].

use crate::errors::Result;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, trace};

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Maps product names (case-insensitive, trimmed) to product ids.
#[derive(Debug, Default)]
pub struct ProductDirectory {
    by_name: RwLock<HashMap<String, i64>>,
}

impl ProductDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory already populated from the database.
    pub async fn load(db: &DatabaseConnection) -> Result<Self> {
        let directory = Self::new();
        directory.refresh(db).await?;
        Ok(directory)
    }

    /// Replaces the directory content with the current products. Returns the
    /// number of entries. When two products share a name the one with the
    /// lower id wins.
    pub async fn refresh(&self, db: &DatabaseConnection) -> Result<usize> {
        info!("Refreshing product directory...");
        let products = super::product::get_all_products(db).await?;

        let mut names = HashMap::with_capacity(products.len());
        for product in products {
            names
                .entry(normalize(&product.name))
                .and_modify(|id: &mut i64| *id = (*id).min(product.id))
                .or_insert(product.id);
        }

        let mut writer = self.by_name.write().await;
        *writer = names;
        info!("Product directory refreshed with {} items.", writer.len());
        trace!("Product directory now contains: {:?}", writer);
        Ok(writer.len())
    }

    /// Id of the product with this name, if known.
    pub async fn lookup(&self, name: &str) -> Option<i64> {
        self.by_name.read().await.get(&normalize(name)).copied()
    }

    /// Number of known products.
    pub async fn len(&self) -> usize {
        self.by_name.read().await.len()
    }

    /// True when no products are known.
    pub async fn is_empty(&self) -> bool {
        self.by_name.read().await.is_empty()
    }
}
