//! Utility functions and supporting infrastructure.
//!
//! Provides the broadcast character set codec, the (7,4) block code tables
//! and error types shared across the crate.

pub mod blockcode;
pub mod charset;
pub mod errors;
