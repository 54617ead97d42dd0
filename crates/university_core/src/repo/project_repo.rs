//! Research project repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Project writes and faculty reconciliation commit together.
//! - `team_members` is stored as one comma-joined column.

use crate::model::faculty::FacultyId;
use crate::model::project::{ProjectId, ResearchProject};
use crate::model::validation::FieldValidator;
use crate::repo::association::{
    load_links, purge_links, reconcile_links, replace_links, PROJECT_FACULTY,
};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::{ensure_tables, join_list, split_list};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeSet;

const PROJECT_SELECT_SQL: &str = "SELECT
    project_id,
    title,
    description,
    team_members,
    supervisor,
    start_date,
    end_date,
    budget
FROM research_projects";

const ENTITY: &str = "research project";
/// Names used in the duplicate-key rejection shown by the add form.
const FORM_ENTITY: &str = "Research Project";
const FORM_KEY_LABEL: &str = "Project ID";

/// Repository interface for research projects and their faculty links.
pub trait ProjectRepository {
    fn list_projects(&self) -> RepoResult<Vec<ResearchProject>>;
    fn get_project(&self, project_id: &str) -> RepoResult<Option<ResearchProject>>;
    fn create_project(&mut self, project: &ResearchProject, faculty: &[FacultyId])
        -> RepoResult<()>;
    fn update_project(&mut self, project: &ResearchProject, faculty: &[FacultyId])
        -> RepoResult<()>;
    fn delete_project(&mut self, project_id: &str) -> RepoResult<()>;
    fn assigned_faculty(&self, project_id: &str) -> RepoResult<BTreeSet<FacultyId>>;
    fn replace_faculty(&mut self, project_id: &str, faculty: &[FacultyId]) -> RepoResult<()>;
}

/// SQLite-backed research project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["research_projects", "faculty_to_project"])?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn list_projects(&self) -> RepoResult<Vec<ResearchProject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY project_id ASC;"))?;
        let projects = stmt
            .query_map([], parse_project_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    fn get_project(&self, project_id: &str) -> RepoResult<Option<ResearchProject>> {
        let project = self
            .conn
            .query_row(
                &format!("{PROJECT_SELECT_SQL} WHERE project_id = ?1;"),
                [project_id],
                parse_project_row,
            )
            .optional()?;
        Ok(project)
    }

    fn create_project(
        &mut self,
        project: &ResearchProject,
        faculty: &[FacultyId],
    ) -> RepoResult<()> {
        project.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO research_projects (
                project_id,
                title,
                description,
                team_members,
                supervisor,
                start_date,
                end_date,
                budget
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                project.project_id.as_str(),
                project.title.as_str(),
                project.description.as_str(),
                join_list(&project.team_members),
                project.supervisor.as_str(),
                project.start_date,
                project.end_date,
                project.budget,
            ],
        )?;
        if inserted == 0 {
            return Err(RepoError::AlreadyExists {
                entity: FORM_ENTITY,
                key_label: FORM_KEY_LABEL,
                key: project.project_id.clone(),
            });
        }

        replace_links(&tx, &PROJECT_FACULTY, project.project_id.as_str(), faculty)?;
        tx.commit()?;
        Ok(())
    }

    fn update_project(
        &mut self,
        project: &ResearchProject,
        faculty: &[FacultyId],
    ) -> RepoResult<()> {
        project.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE research_projects
             SET
                title = ?2,
                description = ?3,
                team_members = ?4,
                supervisor = ?5,
                start_date = ?6,
                end_date = ?7,
                budget = ?8
             WHERE project_id = ?1;",
            params![
                project.project_id.as_str(),
                project.title.as_str(),
                project.description.as_str(),
                join_list(&project.team_members),
                project.supervisor.as_str(),
                project.start_date,
                project.end_date,
                project.budget,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                key: project.project_id.clone(),
            });
        }

        replace_links(&tx, &PROJECT_FACULTY, project.project_id.as_str(), faculty)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_project(&mut self, project_id: &str) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        purge_links(&tx, &PROJECT_FACULTY, project_id)?;
        let removed = tx.execute(
            "DELETE FROM research_projects WHERE project_id = ?1;",
            [project_id],
        )?;
        if removed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                key: project_id.to_string(),
            });
        }
        tx.commit()?;
        Ok(())
    }

    fn assigned_faculty(&self, project_id: &str) -> RepoResult<BTreeSet<FacultyId>> {
        load_links(self.conn, &PROJECT_FACULTY, project_id)
    }

    fn replace_faculty(&mut self, project_id: &str, faculty: &[FacultyId]) -> RepoResult<()> {
        reconcile_links(self.conn, &PROJECT_FACULTY, project_id, faculty)
    }
}

fn parse_project_row(row: &Row<'_>) -> rusqlite::Result<ResearchProject> {
    let team_members: String = row.get("team_members")?;
    Ok(ResearchProject {
        project_id: row.get::<_, ProjectId>("project_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        team_members: split_list(&team_members),
        supervisor: row.get("supervisor")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        budget: row.get("budget")?,
    })
}
