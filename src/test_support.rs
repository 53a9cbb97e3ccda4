//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::state::App;
use crate::table::Table;

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Five rows, two communities, every column the queries reference.
pub fn roster_table() -> Table {
    Table::build(
        strings(&["Name", "Community Name", "Email Address"]),
        vec![
            strings(&["Al", "Book Club", "al@example.com"]),
            strings(&["Al", "Chess Club", "al@example.com"]),
            strings(&["Bea", "Book Club", "bea@example.com"]),
            strings(&["Cy", "Chess Club", "cy@example.com"]),
            strings(&["Bea", "Chess Club", "bea@example.com"]),
        ],
    )
    .expect("fixture table is well formed")
}

/// Creates a test App with a small activity log.
pub fn test_app() -> App {
    App::new(100)
}
