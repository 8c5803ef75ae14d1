pub mod config;
pub mod download;
pub mod installer;
pub mod package;
pub mod pipeline;
pub mod policy;
pub mod prune;
pub mod toolchain;
