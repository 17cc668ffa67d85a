// GET /api/health handler

use std::convert::Infallible;
use warp::http::StatusCode;

use crate::models::HealthResponse;
use crate::state::AppState;

pub async fn health_handler(state: AppState) -> Result<impl warp::Reply, Infallible> {
    let (status, body) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, HealthResponse::healthy()),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HealthResponse::unhealthy(e.to_string()),
            )
        }
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
