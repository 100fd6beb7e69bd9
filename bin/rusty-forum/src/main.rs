//! # Rusty-Forum Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod settings;

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use rf_api::handlers::AppState;
use rf_api::middleware::{cors_policy, standard_middleware};
use rf_core::Services;

#[cfg(feature = "db-sqlite")]
use rf_db_sqlite::SqliteStore;

#[cfg(not(feature = "db-sqlite"))]
compile_error!("rusty-forum needs a storage plugin; enable the `db-sqlite` feature");

use crate::settings::Settings;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::load().context("failed to load configuration")?;
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&settings.logging.level));

    // 1. Initialize the store
    #[cfg(feature = "db-sqlite")]
    let store = SqliteStore::connect(&settings.database.url, settings.database.max_connections)
        .await
        .context("failed to init SQLite")?;

    // 2. Wire every service to the one store handle
    let services = Services::new(Arc::new(store));
    let state = web::Data::new(AppState::new(
        services,
        Duration::from_millis(settings.server.request_timeout_ms),
    ));

    let address = settings.server.address.clone();
    let port = settings.server.port;
    log::info!("Rusty-Forum starting on http://{address}:{port}");

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(standard_middleware())
            .wrap(cors_policy())
            .configure(rf_api::configure_routes)
    })
    .shutdown_timeout(settings.server.shutdown_timeout);
    if settings.server.workers > 0 {
        server = server.workers(settings.server.workers);
    }

    server
        .bind((address.as_str(), port))
        .with_context(|| format!("failed to bind {address}:{port}"))?
        .run()
        .await?;
    log::info!("Rusty-Forum stopped");
    Ok(())
}
