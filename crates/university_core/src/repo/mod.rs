//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Keep SQL details and join-table reconciliation inside the core
//!   persistence boundary.
//!
//! # Invariants
//! - Write paths call `FieldValidator::validate()` before SQL mutations.
//! - An entity write and its association reconciliation share one
//!   transaction.

pub mod association;
pub mod course_repo;
pub mod error;
pub mod faculty_repo;
pub mod project_repo;
pub mod student_repo;

use error::{RepoError, RepoResult};
use rusqlite::Connection;

/// Joins list-valued fields into their single text column.
pub(crate) fn join_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits a stored list column; blank entries are dropped.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rejects connections that were not bootstrapped with migrations.
pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for &table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{join_list, split_list};

    #[test]
    fn list_columns_trim_and_drop_blank_entries() {
        let stored = join_list(&[
            " Algebra ".to_string(),
            String::new(),
            "Logic".to_string(),
        ]);
        assert_eq!(stored, "Algebra,Logic");
        assert_eq!(split_list("Algebra, ,Logic,"), vec!["Algebra", "Logic"]);
        assert!(split_list("").is_empty());
    }
}
