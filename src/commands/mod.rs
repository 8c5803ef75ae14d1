pub mod build;
pub mod package;
pub mod policy;
pub mod prune;
