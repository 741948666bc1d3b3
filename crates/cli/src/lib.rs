//! Terminal output utilities for circle-build-tools binaries
//!
//! Provides shared CLI functionality:
//! - Consistent status message formatting
//! - Health status glyph rendering

#![warn(missing_docs)]

pub mod output;
