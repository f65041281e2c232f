//! HTTP edge: settings and `application/json` responses.
//!
//! - `config.rs`: environment-driven settings
//! - `response.rs`: encode a value graph into a JSON response
//! - `errors.rs`: consistent error responses

pub mod config;
pub mod errors;
pub mod response;

pub use config::Settings;
pub use errors::{encode_error_to_response, json_error};
pub use response::{JsonResponse, Renderer, render_json};
