mod api;
mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod import;
mod models;
mod routes;
mod spreadsheet;
mod templates;
#[cfg(test)]
mod testing;
mod view;

use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{catalog::Catalog, config::Config};

pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movie_catalog=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let state = Arc::new(AppState { config: config.clone(), catalog: Catalog::new(db) });

    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_str(&config.cors_origin).context("CORS_ORIGIN")?)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = routes::router(state).layer(cors).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
