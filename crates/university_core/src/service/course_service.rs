//! Course use-case service.
//!
//! # Responsibility
//! - Provide the add/edit/remove/list flows of the course forms.
//! - Reconcile a course's enrolled students on every save.

use crate::model::course::{Course, CourseCode};
use crate::model::student::StudentId;
use crate::model::validation::FieldValidator;
use crate::repo::course_repo::CourseRepository;
use crate::repo::error::RepoResult;
use crate::service::dialog::{removal_confirmed, ConfirmDialog, RemoveOutcome};
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};
use std::collections::BTreeSet;

const ENTITY: &str = "course";

/// Read model returned after a course save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    pub course: Course,
    pub students: BTreeSet<StudentId>,
}

pub struct CourseService<R: CourseRepository> {
    repo: R,
}

impl<R: CourseRepository> CourseService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_courses(&self) -> RepoResult<Vec<Course>> {
        self.repo.list_courses()
    }

    pub fn get_course(&self, course_code: &str) -> RepoResult<Option<Course>> {
        self.repo.get_course(course_code)
    }

    pub fn enrolled_students(&self, course_code: &str) -> RepoResult<BTreeSet<StudentId>> {
        self.repo.enrolled_students(course_code)
    }

    pub fn create_course(
        &mut self,
        course: &Course,
        students: &[StudentId],
    ) -> ServiceResult<CourseRecord> {
        reject_invalid(course, "create")?;
        self.repo.create_course(course, students)?;
        info!(
            "event=course_create module=service status=ok students={}",
            students.len()
        );
        self.read_back(&course.course_code, "created course not found in read-back")
    }

    pub fn update_course(
        &mut self,
        course: &Course,
        students: &[StudentId],
    ) -> ServiceResult<CourseRecord> {
        reject_invalid(course, "update")?;
        self.repo.update_course(course, students)?;
        info!(
            "event=course_update module=service status=ok students={}",
            students.len()
        );
        self.read_back(&course.course_code, "updated course not found in read-back")
    }

    /// Replaces the course's student set without touching its fields.
    pub fn enroll_students(
        &mut self,
        course_code: &str,
        students: &[StudentId],
    ) -> ServiceResult<BTreeSet<StudentId>> {
        self.repo.replace_students(course_code, students)?;
        Ok(self.repo.enrolled_students(course_code)?)
    }

    pub fn remove_course<D: ConfirmDialog + ?Sized>(
        &mut self,
        course_code: &str,
        dialog: &D,
    ) -> ServiceResult<RemoveOutcome> {
        let course = self
            .repo
            .get_course(course_code)?
            .ok_or_else(|| ServiceError::NotFound {
                entity: ENTITY,
                key: course_code.to_string(),
            })?;

        if !removal_confirmed(dialog, &course.display_label()) {
            info!("event=course_remove module=service status=cancelled");
            return Ok(RemoveOutcome::Cancelled);
        }

        self.repo.delete_course(course_code)?;
        info!("event=course_remove module=service status=ok");
        Ok(RemoveOutcome::Removed)
    }

    fn read_back(&self, course_code: &CourseCode, details: &'static str) -> ServiceResult<CourseRecord> {
        let course = self
            .repo
            .get_course(course_code)?
            .ok_or(ServiceError::InconsistentState(details))?;
        let students = self.repo.enrolled_students(course_code)?;
        Ok(CourseRecord { course, students })
    }
}

fn reject_invalid(course: &Course, action: &str) -> ServiceResult<()> {
    course.validate().map_err(|err| {
        warn!(
            "event=course_{action} module=service status=rejected field={}",
            err.field
        );
        ServiceError::Invalid(err)
    })
}
