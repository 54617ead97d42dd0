//! Faculty member repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Member writes and project reconciliation commit together.
//! - Deleting a member purges its `faculty_to_project` rows in the same
//!   transaction.

use crate::model::faculty::{FacultyId, FacultyMember};
use crate::model::project::ProjectId;
use crate::model::validation::FieldValidator;
use crate::repo::association::{
    load_links, purge_links, reconcile_links, replace_links, FACULTY_PROJECTS,
};
use crate::repo::ensure_tables;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeSet;

const FACULTY_SELECT_SQL: &str = "SELECT
    faculty_id,
    name,
    age,
    gender,
    department,
    position,
    email,
    office_room_number
FROM faculty_members";

const ENTITY: &str = "faculty member";
/// Names used in the duplicate-key rejection shown by the add form.
const FORM_ENTITY: &str = "FacultyMember";
const FORM_KEY_LABEL: &str = "FacultyID";

/// Repository interface for faculty members and their project links.
pub trait FacultyRepository {
    fn list_faculty(&self) -> RepoResult<Vec<FacultyMember>>;
    fn get_faculty(&self, faculty_id: &str) -> RepoResult<Option<FacultyMember>>;
    /// Inserts a member with its initial project set.
    fn create_faculty(&mut self, member: &FacultyMember, projects: &[ProjectId])
        -> RepoResult<()>;
    /// Updates member fields and reconciles its project set.
    fn update_faculty(&mut self, member: &FacultyMember, projects: &[ProjectId])
        -> RepoResult<()>;
    fn delete_faculty(&mut self, faculty_id: &str) -> RepoResult<()>;
    fn assigned_projects(&self, faculty_id: &str) -> RepoResult<BTreeSet<ProjectId>>;
    /// Reconciles the member's project set in its own transaction.
    fn replace_projects(&mut self, faculty_id: &str, projects: &[ProjectId]) -> RepoResult<()>;
}

/// SQLite-backed faculty repository.
pub struct SqliteFacultyRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteFacultyRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["faculty_members", "faculty_to_project"])?;
        Ok(Self { conn })
    }
}

impl FacultyRepository for SqliteFacultyRepository<'_> {
    fn list_faculty(&self) -> RepoResult<Vec<FacultyMember>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FACULTY_SELECT_SQL} ORDER BY faculty_id ASC;"))?;
        let members = stmt
            .query_map([], parse_faculty_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    fn get_faculty(&self, faculty_id: &str) -> RepoResult<Option<FacultyMember>> {
        let member = self
            .conn
            .query_row(
                &format!("{FACULTY_SELECT_SQL} WHERE faculty_id = ?1;"),
                [faculty_id],
                parse_faculty_row,
            )
            .optional()?;
        Ok(member)
    }

    fn create_faculty(
        &mut self,
        member: &FacultyMember,
        projects: &[ProjectId],
    ) -> RepoResult<()> {
        member.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO faculty_members (
                faculty_id,
                name,
                age,
                gender,
                department,
                position,
                email,
                office_room_number
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                member.faculty_id.as_str(),
                member.name.as_str(),
                member.age,
                member.gender.as_str(),
                member.department.as_str(),
                member.position.as_str(),
                member.email.as_str(),
                member.office_room_number.as_str(),
            ],
        )?;
        if inserted == 0 {
            return Err(RepoError::AlreadyExists {
                entity: FORM_ENTITY,
                key_label: FORM_KEY_LABEL,
                key: member.faculty_id.clone(),
            });
        }

        replace_links(&tx, &FACULTY_PROJECTS, member.faculty_id.as_str(), projects)?;
        tx.commit()?;
        Ok(())
    }

    fn update_faculty(
        &mut self,
        member: &FacultyMember,
        projects: &[ProjectId],
    ) -> RepoResult<()> {
        member.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE faculty_members
             SET
                name = ?2,
                age = ?3,
                gender = ?4,
                department = ?5,
                position = ?6,
                email = ?7,
                office_room_number = ?8
             WHERE faculty_id = ?1;",
            params![
                member.faculty_id.as_str(),
                member.name.as_str(),
                member.age,
                member.gender.as_str(),
                member.department.as_str(),
                member.position.as_str(),
                member.email.as_str(),
                member.office_room_number.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                key: member.faculty_id.clone(),
            });
        }

        replace_links(&tx, &FACULTY_PROJECTS, member.faculty_id.as_str(), projects)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_faculty(&mut self, faculty_id: &str) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        purge_links(&tx, &FACULTY_PROJECTS, faculty_id)?;
        let removed = tx.execute(
            "DELETE FROM faculty_members WHERE faculty_id = ?1;",
            [faculty_id],
        )?;
        if removed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                key: faculty_id.to_string(),
            });
        }
        tx.commit()?;
        Ok(())
    }

    fn assigned_projects(&self, faculty_id: &str) -> RepoResult<BTreeSet<ProjectId>> {
        load_links(self.conn, &FACULTY_PROJECTS, faculty_id)
    }

    fn replace_projects(&mut self, faculty_id: &str, projects: &[ProjectId]) -> RepoResult<()> {
        reconcile_links(self.conn, &FACULTY_PROJECTS, faculty_id, projects)
    }
}

fn parse_faculty_row(row: &Row<'_>) -> rusqlite::Result<FacultyMember> {
    Ok(FacultyMember {
        faculty_id: row.get::<_, FacultyId>("faculty_id")?,
        name: row.get("name")?,
        age: row.get("age")?,
        gender: row.get("gender")?,
        department: row.get("department")?,
        position: row.get("position")?,
        email: row.get("email")?,
        office_room_number: row.get("office_room_number")?,
    })
}
