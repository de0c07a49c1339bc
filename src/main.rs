use dotenvy::dotenv;
use sofa_pricing::{
    config::{catalog::load_default_config, database},
    core::{
        directory::ProductDirectory, product::get_all_products, report, seed::seed_catalog,
        variant::upgrade_legacy_documents,
    },
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the catalog configuration
    let config = load_default_config()
        .inspect_err(|e| error!("Critical error loading configuration: {}", e))?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    upgrade_legacy_documents(&db)
        .await
        .inspect_err(|e| error!("Failed to upgrade legacy variants: {}", e))?;

    // 5. Seed the catalog on first run
    seed_catalog(&db, &config)
        .await
        .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;

    // 6. Print every product's price list
    let directory = ProductDirectory::load(&db).await?;
    info!("{} products in catalog", directory.len().await);
    for product in get_all_products(&db).await? {
        match report::generate_price_list(&db, product.id).await {
            Ok(list) => info!("\n{}", report::format_price_list(&list)),
            Err(e) => error!("Cannot price product {}: {}", product.name, e),
        }
    }

    Ok(())
}
