use std::time::Instant;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use cadastro_db::DbPool;
use chrono::Utc;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
    started_at: Instant,
}

impl HealthState {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool, started_at: Instant::now() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct HealthCheck {
    #[schema(value_type = String, example = "ready")]
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(value_type = String, example = "OK")]
    pub status: &'static str,
    /// Seconds since the router was built.
    pub uptime: f64,
    pub database: HealthCheck,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState::new(db_pool))
}

/// Report uptime and whether the database answers a trivial query.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database check failed", body = HealthResponse)
    ),
    tags = ["health"],
    operation_id = "health"
)]
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = database_check(&state.db_pool).await;
    let ready = database.status == "ready";

    if !ready {
        warn!(
            event_name = "system.health.degraded",
            correlation_id = "health",
            detail = %database.detail,
            "health check reported a degraded database"
        );
    }

    let payload = HealthResponse {
        status: if ready { "OK" } else { "DEGRADED" },
        uptime: state.started_at.elapsed().as_secs_f64(),
        database,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn database_check(pool: &DbPool) -> HealthCheck {
    match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await {
        Ok(_) => HealthCheck { status: "ready", detail: "database query succeeded".to_string() },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("database query failed: {error}") }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};
    use cadastro_db::connect_with_settings;

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_reports_ok_when_database_is_reachable() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool should connect");

        let (status, Json(payload)) = health(State(HealthState::new(pool.clone()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "OK");
        assert_eq!(payload.database.status, "ready");
        assert!(payload.uptime >= 0.0);

        pool.close().await;
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_database_is_closed() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool should connect");
        pool.close().await;

        let (status, Json(payload)) = health(State(HealthState::new(pool))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "DEGRADED");
        assert_eq!(payload.database.status, "degraded");
    }
}
