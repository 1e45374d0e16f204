//! Migration: create chart of accounts
//! Version: 20240121090000

use tideline::Migration;

/// Column names shared by up() and down()
struct Columns;

impl Columns {
    const CODE: &'static str = "code";
}

#[derive(Default)]
pub struct Version20240121090000;

impl Migration for Version20240121090000 {
    fn description(&self) -> &str {
        "create chart of accounts"
    }

    fn up(&self) -> Vec<String> {
        vec![
            "CREATE TABLE chart_of_accounts (id SERIAL PRIMARY KEY, name VARCHAR(255) NOT NULL)".to_string(),
            format!("ALTER TABLE chart_of_accounts ADD COLUMN {} VARCHAR(32)", Columns::CODE),
        ]
    }

    fn down(&self) -> Vec<String> {
        vec!["DROP TABLE chart_of_accounts".to_string()]
    }
}
