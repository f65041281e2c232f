//! News domain module.
//!
//! Plain domain types (no IO, no HTTP, no storage) that know how to present
//! themselves to the JSON encoder.

pub mod category;
pub mod item;
pub mod user;

pub use category::Category;
pub use item::{NewsItem, NewNewsItem};
pub use user::{RequestUser, User};
