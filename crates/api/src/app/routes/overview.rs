use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn get_overview(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.overview().await {
        Ok(metrics) => (
            StatusCode::OK,
            Json(dto::overview_to_json(metrics, services.currency())),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
