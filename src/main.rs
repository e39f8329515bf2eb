use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;

use todoapp::config::Config;
use todoapp::routes;
use todoapp::state::AppState;
use todoapp::store::{MemoryStore, PgStore, MEMORY_SCHEME};

fn fatal(context: &str, error: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, error);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, error))
}

fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| fatal("Invalid configuration", e))?;
    let tokens = config
        .token_service()
        .map_err(|e| fatal("Invalid token configuration", e))?;

    let (state, pg_store) = if config.database_url.starts_with(MEMORY_SCHEME) {
        log::warn!("Using the in-memory store; data is lost on shutdown");
        (AppState::new(Arc::new(MemoryStore::new()), tokens), None)
    } else {
        let store = PgStore::connect(&config.database_url, config.database_max_connections)
            .await
            .map(Arc::new)
            .map_err(|e| fatal("Could not connect to the database", e))?;
        (AppState::new(store.clone(), tokens), Some(store))
    };
    let state = web::Data::new(state);

    log::info!("Starting todoapp server at {}", config.server_url());
    let origins = config.cors_allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(&origins))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    if let Some(store) = pg_store {
        store.close().await;
        log::info!("Database pool closed");
    }
    Ok(())
}
