//! Tideline Migration Library
//!
//! This library provides the build-script and file generation helpers used by
//! the CLI tool (main.rs).

pub mod build_script;
pub mod template;

pub use template::{migration_file_name, migration_template};
