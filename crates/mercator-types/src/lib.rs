//! Foundation types for Mercator.
//!
//! Shared by every Mercator crate: the workspace error type, the TOML
//! configuration model, and the color helpers used to render command output.

pub mod config;
pub mod error;
pub mod style;
