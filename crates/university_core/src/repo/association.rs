//! Many-to-many association reconciliation.
//!
//! # Responsibility
//! - Replace an owner's full set of join rows with a target set.
//! - Read and purge join rows from the owner side of a link.
//!
//! # Invariants
//! - Reconciliation deletes every existing row of the owner, then inserts
//!   one row per distinct target, inside a single transaction.
//! - Join rows only reference existing parents; a missing owner or target
//!   aborts the whole transaction.
//! - Reconciling with the same target set twice yields the same stored set.

use crate::model::faculty::FacultyToProject;
use crate::repo::error::{RepoError, RepoResult};
use log::debug;
use rusqlite::types::FromSql;
use rusqlite::{Connection, ToSql, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use std::fmt::Display;

/// One direction of a join table, seen from the owner side.
///
/// Join columns share their names with the parent key columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociationLink {
    pub table: &'static str,
    pub owner_table: &'static str,
    pub owner_column: &'static str,
    pub owner_entity: &'static str,
    pub related_table: &'static str,
    pub related_column: &'static str,
    pub related_entity: &'static str,
}

impl AssociationLink {
    /// Returns the same join table seen from the related side.
    pub const fn reversed(self) -> Self {
        Self {
            table: self.table,
            owner_table: self.related_table,
            owner_column: self.related_column,
            owner_entity: self.related_entity,
            related_table: self.owner_table,
            related_column: self.owner_column,
            related_entity: self.owner_entity,
        }
    }
}

/// Faculty member → assigned research projects.
pub const FACULTY_PROJECTS: AssociationLink = AssociationLink {
    table: "faculty_to_project",
    owner_table: "faculty_members",
    owner_column: "faculty_id",
    owner_entity: "faculty member",
    related_table: "research_projects",
    related_column: "project_id",
    related_entity: "research project",
};

/// Research project → assigned faculty members.
pub const PROJECT_FACULTY: AssociationLink = FACULTY_PROJECTS.reversed();

/// Course → enrolled students.
pub const COURSE_STUDENTS: AssociationLink = AssociationLink {
    table: "course_students",
    owner_table: "courses",
    owner_column: "course_code",
    owner_entity: "course",
    related_table: "students",
    related_column: "student_id",
    related_entity: "student",
};

/// Student → enrolled courses.
pub const STUDENT_COURSES: AssociationLink = COURSE_STUDENTS.reversed();

/// Reconciles the owner's associations with `targets` in one commit.
///
/// # Errors
/// - `NotFound` when the owner does not exist.
/// - `MissingReference` when any target does not exist; the previous set
///   stays intact.
pub fn reconcile_links<O, T>(
    conn: &mut Connection,
    link: &AssociationLink,
    owner: &O,
    targets: &[T],
) -> RepoResult<()>
where
    O: ToSql + Display + ?Sized,
    T: ToSql + Display + Ord,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    replace_links(&tx, link, owner, targets)?;
    tx.commit()?;
    Ok(())
}

/// Replaces the owner's join rows inside a caller-owned transaction.
///
/// Used directly when an entity update and its reconciliation must land in
/// the same commit.
pub fn replace_links<O, T>(
    tx: &Transaction<'_>,
    link: &AssociationLink,
    owner: &O,
    targets: &[T],
) -> RepoResult<()>
where
    O: ToSql + Display + ?Sized,
    T: ToSql + Display + Ord,
{
    if !key_exists(tx, link.owner_table, link.owner_column, owner)? {
        return Err(RepoError::NotFound {
            entity: link.owner_entity,
            key: owner.to_string(),
        });
    }

    let removed = tx.execute(
        &format!("DELETE FROM {} WHERE {} = ?1;", link.table, link.owner_column),
        [owner],
    )?;

    let unique: BTreeSet<&T> = targets.iter().collect();
    let insert_sql = format!(
        "INSERT INTO {} ({}, {}) VALUES (?1, ?2);",
        link.table, link.owner_column, link.related_column
    );
    for target in &unique {
        if !key_exists(tx, link.related_table, link.related_column, *target)? {
            return Err(RepoError::MissingReference {
                entity: link.related_entity,
                key: target.to_string(),
            });
        }
        tx.execute(&insert_sql, rusqlite::params![owner, *target])?;
    }

    debug!(
        "event=links_replace module=repo status=ok table={} owner_column={} removed={} inserted={}",
        link.table,
        link.owner_column,
        removed,
        unique.len()
    );
    Ok(())
}

/// Reads the owner's related keys. An unknown owner yields an empty set.
pub fn load_links<O, T>(conn: &Connection, link: &AssociationLink, owner: &O) -> RepoResult<BTreeSet<T>>
where
    O: ToSql + ?Sized,
    T: FromSql + Ord,
{
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM {} WHERE {} = ?1;",
        link.related_column, link.table, link.owner_column
    ))?;
    let mut rows = stmt.query([owner])?;
    let mut related = BTreeSet::new();
    while let Some(row) = rows.next()? {
        related.insert(row.get::<_, T>(0)?);
    }
    Ok(related)
}

/// Deletes every join row of the owner and returns the removed count.
pub fn purge_links<O>(tx: &Transaction<'_>, link: &AssociationLink, owner: &O) -> RepoResult<usize>
where
    O: ToSql + ?Sized,
{
    let removed = tx.execute(
        &format!("DELETE FROM {} WHERE {} = ?1;", link.table, link.owner_column),
        [owner],
    )?;
    Ok(removed)
}

/// Lists every faculty↔project edge ordered by faculty, then project.
pub fn list_faculty_to_project(conn: &Connection) -> RepoResult<Vec<FacultyToProject>> {
    let mut stmt = conn.prepare(
        "SELECT faculty_id, project_id
         FROM faculty_to_project
         ORDER BY faculty_id ASC, project_id ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut edges = Vec::new();
    while let Some(row) = rows.next()? {
        edges.push(FacultyToProject {
            faculty_id: row.get("faculty_id")?,
            project_id: row.get("project_id")?,
        });
    }
    Ok(edges)
}

fn key_exists<K>(conn: &Connection, table: &str, column: &str, key: &K) -> RepoResult<bool>
where
    K: ToSql + ?Sized,
{
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {column} = ?1);"),
        [key],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
