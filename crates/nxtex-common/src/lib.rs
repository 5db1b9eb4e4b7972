//! Common utilities for nxtex.
//!
//! This crate provides the foundation shared by the container parser and the
//! conversion pipeline:
//!
//! - [`BinaryReader`] - Bounds-checked little-endian reading from byte slices
//! - [`Error`] - The single failure type of every checked read

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;
