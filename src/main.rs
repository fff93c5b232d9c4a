use std::sync::Arc;

use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use ticket_survey::config::{AppConfig, StoreBackend};
use ticket_survey::state::AppState;
use ticket_survey::store::{MemoryStore, PgStore, SharedStore};
use ticket_survey::{db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();

    let store: SharedStore = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = db::init_pool(&config.database_url)
                .await
                .map_err(std::io::Error::other)?;
            db::run_migrations(&pool).await.map_err(std::io::Error::other)?;
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store; all data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    db::seed_coupons(store.as_ref(), config.seed_coupons).await;

    // Session encryption key. SESSION_KEY keeps sessions valid across restarts
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    log::info!(
        "Starting server at http://{} (store={}, coupons={}, origin={})",
        config.bind_addr,
        config.store_backend,
        config.coupon_mode,
        config.origin
    );

    let bind_addr = config.bind_addr.clone();
    let state = web::Data::new(AppState::new(store, config));

    HttpServer::new(move || {
        App::new()
            .wrap(routes::session_middleware(secret_key.clone(), &state.config))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
