use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::InvalidIdError;
use stockroom_infra::StoreError;

use crate::app::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": e.code(),
                "field": e.field(),
                "message": e.to_string(),
            })),
        )
            .into_response(),
        ServiceError::NoCategories => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "no_categories",
            "create a category first",
        ),
        ServiceError::Store(e) => store_error_to_response(e),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::ForeignKeyViolation(msg) => {
            json_error(StatusCode::CONFLICT, "foreign_key_violation", msg)
        }
        StoreError::ConnectionFailure(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
        StoreError::Unknown(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg),
    }
}

pub fn invalid_id_to_response(err: InvalidIdError) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", err.to_string())
}

/// Unparsable or ill-typed request body (missing field, wrong JSON type, bad content type).
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
