//! JSON responses built from encoder output.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use newsfeed_render::{EncodeError, Encoder, Value};

use crate::errors::encode_error_to_response;

/// Encoded JSON body ready to be sent as `application/json`.
///
/// Construction fails before any I/O when the body is not acceptable.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    status: StatusCode,
    body: serde_json::Value,
}

impl JsonResponse {
    /// Wrap an already encoded document.
    ///
    /// With `safe`, only objects are accepted at the top level.
    pub fn new(body: serde_json::Value, safe: bool) -> Result<Self, EncodeError> {
        if safe && !body.is_object() {
            return Err(EncodeError::NotAnObject);
        }
        Ok(Self {
            status: StatusCode::OK,
            body,
        })
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }
}

impl IntoResponse for JsonResponse {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self.body)).into_response()
    }
}

/// Encode `value` with `encoder` into a safe (object-only) JSON response.
pub fn render_json(encoder: &Encoder, value: &Value) -> Result<JsonResponse, EncodeError> {
    JsonResponse::new(encoder.encode(value)?, true)
}

/// Encoder plus response policy, shared by handlers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Renderer {
    encoder: Encoder,
    safe: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Encoder::strict(), true)
    }
}

impl Renderer {
    pub fn new(encoder: Encoder, safe: bool) -> Self {
        Self { encoder, safe }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn render_json(&self, value: &Value) -> Result<JsonResponse, EncodeError> {
        JsonResponse::new(self.encoder.encode(value)?, self.safe)
    }

    /// Render `value`, turning failures into a JSON error response.
    pub fn respond(&self, value: &Value) -> Response {
        match self.render_json(value) {
            Ok(resp) => resp.into_response(),
            Err(e) => encode_error_to_response(e),
        }
    }
}
