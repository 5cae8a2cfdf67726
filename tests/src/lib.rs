//! # RelayMesh Test Suite
//!
//! Unified test crate for cross-subsystem behavior.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── mining_pipeline.rs   # served relays → miner → mined/error streams
//!     ├── ring_lifecycle.rs    # cache miss/hit/invalidate + response signing
//!     └── fan_out.rs           # broadcast primitive under concurrency
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rm-tests
//! cargo test -p rm-tests integration::mining_pipeline
//! ```

#![allow(dead_code)]

pub mod integration;
