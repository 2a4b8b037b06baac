//! # ChunkStore Testkit
//!
//! Test utilities for ChunkStore.
//!
//! This crate provides:
//! - Fresh stores on every backend, with temp-dir cleanup
//! - Conformance checks every backend must pass
//! - A model-checking harness that mirrors writes into a plain map
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use chunkstore_testkit::prelude::*;
//!
//! for_each_backend(|store, _backend| check_store(store));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod conformance;
pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::conformance::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use conformance::check_store;
pub use fixtures::*;
pub use generators::*;
pub use integration::*;
