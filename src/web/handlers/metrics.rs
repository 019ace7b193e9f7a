use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::metrics::TEXT_CONTENT_TYPE;
use crate::web::AppState;

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics(State(state): State<AppState>) -> Result<Response, StatusCode> {
    match state.metrics.encode() {
        Ok(output) => Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
            output,
        )
            .into_response()),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
