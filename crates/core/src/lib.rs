//! `newsfeed-core` — shared domain building blocks.
//!
//! Identifiers, the domain error type and the string-backed enumeration
//! capability. Nothing here knows about HTTP or JSON encoding.

pub mod error;
pub mod id;
pub mod str_enum;

pub use error::{DomainError, DomainResult};
pub use id::{NewsItemId, UserId};
pub use str_enum::StrEnum;
