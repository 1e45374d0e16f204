//! New migration file templates

/// File name for a migration with version `timestamp`
pub fn migration_file_name(timestamp: &str) -> String {
    format!("version{}.rs", timestamp)
}

/// Source of a new, empty migration
///
/// The struct is named `Version{timestamp}` so discovery derives `timestamp`
/// as its version.
pub fn migration_template(timestamp: &str, description: &str, generated_time: &str) -> String {
    format!(
        r#"//! Migration: {description}
//! Version: {timestamp}
//! Generated: {generated_time}

use tideline::Migration;

#[derive(Default)]
pub struct Version{timestamp};

impl Migration for Version{timestamp} {{
    fn description(&self) -> &str {{
        {description:?}
    }}

    fn up(&self) -> Vec<String> {{
        // Statements applying the migration, e.g.
        // vec!["CREATE TABLE example (id SERIAL PRIMARY KEY)".to_string()]
        Vec::new()
    }}

    fn down(&self) -> Vec<String> {{
        // Statements rolling the migration back, e.g.
        // vec!["DROP TABLE example".to_string()]
        Vec::new()
    }}
}}
"#
    )
}
