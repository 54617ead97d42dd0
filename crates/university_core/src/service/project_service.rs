//! Research project use-case service.
//!
//! # Responsibility
//! - Provide the add/edit/remove/list flows of the project forms.
//! - Reconcile a project's assigned faculty members on every save.

use crate::model::faculty::FacultyId;
use crate::model::project::{ProjectId, ResearchProject};
use crate::model::validation::FieldValidator;
use crate::repo::error::RepoResult;
use crate::repo::project_repo::ProjectRepository;
use crate::service::dialog::{removal_confirmed, ConfirmDialog, RemoveOutcome};
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};
use std::collections::BTreeSet;

const ENTITY: &str = "research project";

/// Read model returned after a project save.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub project: ResearchProject,
    pub faculty: BTreeSet<FacultyId>,
}

pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_projects(&self) -> RepoResult<Vec<ResearchProject>> {
        self.repo.list_projects()
    }

    pub fn get_project(&self, project_id: &str) -> RepoResult<Option<ResearchProject>> {
        self.repo.get_project(project_id)
    }

    pub fn assigned_faculty(&self, project_id: &str) -> RepoResult<BTreeSet<FacultyId>> {
        self.repo.assigned_faculty(project_id)
    }

    pub fn create_project(
        &mut self,
        project: &ResearchProject,
        faculty: &[FacultyId],
    ) -> ServiceResult<ProjectRecord> {
        reject_invalid(project, "create")?;
        self.repo.create_project(project, faculty)?;
        info!(
            "event=project_create module=service status=ok faculty={}",
            faculty.len()
        );
        self.read_back(&project.project_id, "created project not found in read-back")
    }

    pub fn update_project(
        &mut self,
        project: &ResearchProject,
        faculty: &[FacultyId],
    ) -> ServiceResult<ProjectRecord> {
        reject_invalid(project, "update")?;
        self.repo.update_project(project, faculty)?;
        info!(
            "event=project_update module=service status=ok faculty={}",
            faculty.len()
        );
        self.read_back(&project.project_id, "updated project not found in read-back")
    }

    /// Replaces the project's faculty set without touching its fields.
    pub fn assign_faculty(
        &mut self,
        project_id: &str,
        faculty: &[FacultyId],
    ) -> ServiceResult<BTreeSet<FacultyId>> {
        self.repo.replace_faculty(project_id, faculty)?;
        Ok(self.repo.assigned_faculty(project_id)?)
    }

    pub fn remove_project<D: ConfirmDialog + ?Sized>(
        &mut self,
        project_id: &str,
        dialog: &D,
    ) -> ServiceResult<RemoveOutcome> {
        let project = self
            .repo
            .get_project(project_id)?
            .ok_or_else(|| ServiceError::NotFound {
                entity: ENTITY,
                key: project_id.to_string(),
            })?;

        if !removal_confirmed(dialog, &project.display_label()) {
            info!("event=project_remove module=service status=cancelled");
            return Ok(RemoveOutcome::Cancelled);
        }

        self.repo.delete_project(project_id)?;
        info!("event=project_remove module=service status=ok");
        Ok(RemoveOutcome::Removed)
    }

    fn read_back(&self, project_id: &ProjectId, details: &'static str) -> ServiceResult<ProjectRecord> {
        let project = self
            .repo
            .get_project(project_id)?
            .ok_or(ServiceError::InconsistentState(details))?;
        let faculty = self.repo.assigned_faculty(project_id)?;
        Ok(ProjectRecord { project, faculty })
    }
}

fn reject_invalid(project: &ResearchProject, action: &str) -> ServiceResult<()> {
    project.validate().map_err(|err| {
        warn!(
            "event=project_{action} module=service status=rejected field={}",
            err.field
        );
        ServiceError::Invalid(err)
    })
}
