//! Database-backed command handlers: catalog seeding and audit history.

use std::path::PathBuf;

use rxp_core::AppConfig;
use sqlx::PgPool;

pub(crate) async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool_config = rxp_db::PoolConfig::from_app_config(config);
    let pool = rxp_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

/// Apply migrations, then upsert every drug and ZIP from the catalog file.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or validated, or if any
/// database step fails. Seeding is transactional, so a failure leaves the
/// tables as they were.
pub(crate) async fn run_seed(config: &AppConfig, catalog: Option<PathBuf>) -> anyhow::Result<()> {
    let path = catalog.unwrap_or_else(|| config.catalog_path.clone());
    let catalog = rxp_core::load_catalog(&path)?;

    let pool = connect(config).await?;
    let applied = rxp_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let summary = rxp_db::seed_catalog(&pool, &catalog).await?;
    println!(
        "seeded {} drugs and {} zip codes from {}",
        summary.drugs,
        summary.zips,
        path.display()
    );
    Ok(())
}

pub(crate) async fn run_history(config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let rows = rxp_db::list_recent_search_queries(&pool, limit).await?;

    if rows.is_empty() {
        println!("no searches recorded");
        return Ok(());
    }

    for row in &rows {
        println!("{}", format_history_row(row));
    }
    Ok(())
}

pub(crate) fn format_history_row(row: &rxp_db::SearchQueryRow) -> String {
    format!(
        "{}  {:<10} {:<12} x{:<5} {}",
        row.created_at.format("%Y-%m-%d %H:%M:%S"),
        row.rx_cui,
        row.strength,
        row.quantity,
        row.zip
    )
}
