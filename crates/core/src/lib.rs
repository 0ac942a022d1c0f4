//! `pitlane-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod pagination;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use pagination::{MAX_PER_PAGE, Page, PageRequest};
