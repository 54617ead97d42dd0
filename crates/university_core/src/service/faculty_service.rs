//! Faculty member use-case service.
//!
//! # Responsibility
//! - Provide the add/edit/remove/list flows of the faculty forms.
//! - Reconcile a member's research project assignments on every save.
//!
//! # Invariants
//! - Invalid drafts are rejected before any repository write.
//! - The faculty key never changes on edit.

use crate::model::faculty::{FacultyId, FacultyMember};
use crate::model::project::ProjectId;
use crate::model::validation::FieldValidator;
use crate::repo::faculty_repo::FacultyRepository;
use crate::repo::error::RepoResult;
use crate::service::dialog::{removal_confirmed, ConfirmDialog, RemoveOutcome};
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};
use std::collections::BTreeSet;

const ENTITY: &str = "faculty member";

/// Read model returned after a faculty save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacultyRecord {
    pub member: FacultyMember,
    /// Assigned research projects, ordered by key.
    pub projects: BTreeSet<ProjectId>,
}

/// Faculty service facade over repository implementations.
pub struct FacultyService<R: FacultyRepository> {
    repo: R,
}

impl<R: FacultyRepository> FacultyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_faculty(&self) -> RepoResult<Vec<FacultyMember>> {
        self.repo.list_faculty()
    }

    pub fn get_faculty(&self, faculty_id: &str) -> RepoResult<Option<FacultyMember>> {
        self.repo.get_faculty(faculty_id)
    }

    pub fn assigned_projects(&self, faculty_id: &str) -> RepoResult<BTreeSet<ProjectId>> {
        self.repo.assigned_projects(faculty_id)
    }

    /// Saves a new member together with its initial project assignments.
    pub fn create_faculty(
        &mut self,
        member: &FacultyMember,
        projects: &[ProjectId],
    ) -> ServiceResult<FacultyRecord> {
        reject_invalid(member, "create")?;
        self.repo.create_faculty(member, projects)?;
        info!(
            "event=faculty_create module=service status=ok projects={}",
            projects.len()
        );
        self.read_back(&member.faculty_id, "created faculty member not found in read-back")
    }

    /// Saves edited fields and replaces the member's project set.
    pub fn update_faculty(
        &mut self,
        member: &FacultyMember,
        projects: &[ProjectId],
    ) -> ServiceResult<FacultyRecord> {
        reject_invalid(member, "update")?;
        self.repo.update_faculty(member, projects)?;
        info!(
            "event=faculty_update module=service status=ok projects={}",
            projects.len()
        );
        self.read_back(&member.faculty_id, "updated faculty member not found in read-back")
    }

    /// Replaces the member's project set without touching its fields.
    pub fn assign_projects(
        &mut self,
        faculty_id: &str,
        projects: &[ProjectId],
    ) -> ServiceResult<BTreeSet<ProjectId>> {
        self.repo.replace_projects(faculty_id, projects)?;
        Ok(self.repo.assigned_projects(faculty_id)?)
    }

    /// Removes a member and its project links after confirmation.
    pub fn remove_faculty<D: ConfirmDialog + ?Sized>(
        &mut self,
        faculty_id: &str,
        dialog: &D,
    ) -> ServiceResult<RemoveOutcome> {
        let member = self
            .repo
            .get_faculty(faculty_id)?
            .ok_or_else(|| ServiceError::NotFound {
                entity: ENTITY,
                key: faculty_id.to_string(),
            })?;

        if !removal_confirmed(dialog, &member.display_label()) {
            info!("event=faculty_remove module=service status=cancelled");
            return Ok(RemoveOutcome::Cancelled);
        }

        self.repo.delete_faculty(faculty_id)?;
        info!("event=faculty_remove module=service status=ok");
        Ok(RemoveOutcome::Removed)
    }

    fn read_back(&self, faculty_id: &FacultyId, details: &'static str) -> ServiceResult<FacultyRecord> {
        let member = self
            .repo
            .get_faculty(faculty_id)?
            .ok_or(ServiceError::InconsistentState(details))?;
        let projects = self.repo.assigned_projects(faculty_id)?;
        Ok(FacultyRecord { member, projects })
    }
}

fn reject_invalid(member: &FacultyMember, action: &str) -> ServiceResult<()> {
    member.validate().map_err(|err| {
        warn!(
            "event=faculty_{action} module=service status=rejected field={}",
            err.field
        );
        ServiceError::Invalid(err)
    })
}
