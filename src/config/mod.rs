// src/config/mod.rs

//! Configuration loading and input resolution for callgraph-hook.
//!
//! Responsibilities:
//! - Define the JSON-backed job description (`model.rs`).
//! - Load a config document from disk (`loader.rs`).
//! - Expand it into a concrete, validated input set (`resolve.rs`).

pub mod loader;
pub mod model;
pub mod resolve;

pub use loader::load_from_path;
pub use model::{JobConfig, ResolvedInputSet, SOURCE_EXT};
pub use resolve::resolve;
