//! Core types - pure abstractions shared across the codebase.

mod context;
mod resource;
mod url;

pub use context::ContextId;
pub use resource::{Resource, ResourcePtr, UrlResource};
pub use url::UrlRelativity;
