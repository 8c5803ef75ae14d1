//! tcslim library
//!
//! Fetches vendor toolchains, prunes them down to what CI builds need and
//! repackages the result as a zip archive. Used by the `tcslim` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
