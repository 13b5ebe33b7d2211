use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;

mod availability;
mod clock;
mod config;
mod db;
mod error;
mod handlers;
mod identity;
mod models;
mod repository;
mod routes;
mod service;

use clock::SystemClock;
use config::AppConfig;
use db::SqliteStore;
use handlers::AppState;
use service::BookingService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    log::info!("Connecting to database...");
    let pool = db::get_db_pool(&config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    log::info!("Running migrations...");
    db::run_migrations(&pool)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let store = Arc::new(SqliteStore::new(pool));
    let state = web::Data::new(AppState {
        bookings: BookingService::new(store.clone(), store.clone(), Arc::new(SystemClock)),
        rooms: store,
    });

    let address = config.server_address();
    log::info!("Starting server at http://{}", address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind(address)?
    .run()
    .await
}
