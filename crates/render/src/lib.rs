//! `newsfeed-render` — response rendering helpers.
//!
//! - [`encoder`]: normalizes an application [`Value`] graph into plain JSON.
//! - [`sanitize`]: allow-list HTML sanitizer for user supplied markup.
//!
//! Both are stateless; an [`Encoder`] or [`SanitizePolicy`] can be shared
//! freely between request handlers.

pub mod encoder;
pub mod error;
pub mod sanitize;

pub use encoder::{
    AsJson, CallableBool, Decimal, DictView, Encoder, EnumMember, FallbackMode, Field,
    LazyQuery, Opaque, Value, ValueSet,
};
pub use error::EncodeError;
pub use sanitize::{SanitizePolicy, sanitize_html};
