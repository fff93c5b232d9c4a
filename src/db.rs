use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::models::coupon::generate_code;
use crate::store::DataStore;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(8)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Top the coupon pool up with `count` generated codes when it has none left.
/// Production pools are seeded externally; this is for local runs.
pub async fn seed_coupons(store: &dyn DataStore, count: u32) {
    if count == 0 {
        return;
    }

    let unused = match store.count_unused_coupons().await {
        Ok(n) => n,
        Err(e) => {
            log::error!("Coupon seed skipped, count failed: {e}");
            return;
        }
    };
    if unused > 0 {
        log::info!("Coupon pool has {unused} unused codes, skipping seed");
        return;
    }

    let codes: Vec<String> = (0..count).map(|_| generate_code()).collect();
    match store.seed_coupons(&codes).await {
        Ok(added) => log::info!("Seeded {added} coupons"),
        Err(e) => log::error!("Coupon seed failed: {e}"),
    }
}
