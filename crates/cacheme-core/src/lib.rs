//! cacheme-core: core traits and types for the cacheme library
//!
//! This crate provides the foundational schema (the `Node` trait), the
//! `Storage`/`Doorkeeper`/`Serializer` external-interface contracts, the
//! per-node-class `Metrics` record, and the error type shared across the
//! `cacheme` ecosystem. It has no opinion on how nodes are registered, how
//! stampede control works, or how tags are invalidated — that orchestration
//! lives in the `cacheme` crate.

mod error;
mod traits;
mod types;

pub use error::{CacheError, Result};
pub use traits::*;
pub use types::*;
