use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    Json, Router,
};
use cadastro_core::config::ServerConfig;
use cadastro_db::repositories::{ClienteRepository, SqlClienteRepository};
use cadastro_db::DbPool;
use tower_http::cors::CorsLayer;

use crate::clientes::{self, ErrorBody};
use crate::{doc, health, portal};

pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Rota não encontrada.";

pub fn router(db_pool: DbPool, server: &ServerConfig) -> anyhow::Result<Router> {
    let repository: Arc<dyn ClienteRepository> = Arc::new(SqlClienteRepository::new(db_pool.clone()));
    Ok(assemble(repository, db_pool).layer(cors_layer(&server.frontend_url)?))
}

/// Every route of the service, without middleware.
pub fn assemble(repository: Arc<dyn ClienteRepository>, db_pool: DbPool) -> Router {
    Router::new()
        .merge(clientes::router(repository.clone()))
        .merge(health::router(db_pool))
        .merge(portal::router(repository))
        .merge(doc::router())
        .fallback(route_not_found)
}

fn cors_layer(frontend_url: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/'))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

async fn route_not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::message(ROUTE_NOT_FOUND_MESSAGE)))
}
