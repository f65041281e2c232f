use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use newsfeed_render::EncodeError;

/// Map an encoding failure to a 500 JSON error body.
pub fn encode_error_to_response(err: EncodeError) -> axum::response::Response {
    tracing::warn!(code = err.code(), "response encoding failed: {err}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, err.code(), err.to_string())
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
