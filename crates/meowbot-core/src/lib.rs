//! meowbot core: transport-agnostic protocol primitives and error types.
//!
//! This crate turns the backend's untyped JSON notifications into typed events
//! and builds the reply actions sent back for decision-bearing events. It
//! carries no transport or runtime dependencies so the client crate and any
//! tooling can share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed frames
//! surface as `MeowError` so a bad notification only drops that frame.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorCode, MeowError, Result};
