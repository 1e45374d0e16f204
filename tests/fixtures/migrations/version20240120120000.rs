//! Migration: create users table
//! Version: 20240120120000

use tideline::Migration;

#[derive(Default)]
pub struct Version20240120120000;

impl Migration for Version20240120120000 {
    fn description(&self) -> &str {
        "create users table"
    }

    fn up(&self) -> Vec<String> {
        vec![
            "CREATE TABLE users (id SERIAL PRIMARY KEY, email VARCHAR(255) NOT NULL UNIQUE)".to_string(),
        ]
    }

    fn down(&self) -> Vec<String> {
        vec!["DROP TABLE users".to_string()]
    }
}
