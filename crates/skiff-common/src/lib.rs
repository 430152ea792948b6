//! # skiff-common
//!
//! Shared utilities and types for the Skiff container runtime.
//!
//! This crate provides common functionality used across all Skiff crates:
//! - Common error types
//! - Standard filesystem paths and well-known file names

#![warn(missing_docs)]

pub mod error;
pub mod paths;

pub use error::{SkiffError, SkiffResult};
pub use paths::SkiffPaths;
