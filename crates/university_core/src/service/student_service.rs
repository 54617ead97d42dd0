//! Student use-case service.
//!
//! # Responsibility
//! - Provide the add/edit/remove/list flows of the student forms.
//! - Reconcile a student's course enrollments on every save.
//!
//! # Invariants
//! - Created students receive their key from the store.

use crate::model::course::CourseCode;
use crate::model::student::{Student, StudentId};
use crate::model::validation::FieldValidator;
use crate::repo::error::RepoResult;
use crate::repo::student_repo::StudentRepository;
use crate::service::dialog::{removal_confirmed, ConfirmDialog, RemoveOutcome};
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};
use std::collections::BTreeSet;

const ENTITY: &str = "student";

/// Read model returned after a student save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub student: Student,
    pub courses: BTreeSet<CourseCode>,
}

pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_students(&self) -> RepoResult<Vec<Student>> {
        self.repo.list_students()
    }

    pub fn get_student(&self, student_id: StudentId) -> RepoResult<Option<Student>> {
        self.repo.get_student(student_id)
    }

    pub fn enrolled_courses(&self, student_id: StudentId) -> RepoResult<BTreeSet<CourseCode>> {
        self.repo.enrolled_courses(student_id)
    }

    /// Saves a new student; `student.student_id` is ignored.
    pub fn create_student(
        &mut self,
        student: &Student,
        courses: &[CourseCode],
    ) -> ServiceResult<StudentRecord> {
        reject_invalid(student, "create")?;
        let student_id = self.repo.create_student(student, courses)?;
        info!(
            "event=student_create module=service status=ok student_id={student_id} courses={}",
            courses.len()
        );
        self.read_back(student_id, "created student not found in read-back")
    }

    pub fn update_student(
        &mut self,
        student: &Student,
        courses: &[CourseCode],
    ) -> ServiceResult<StudentRecord> {
        reject_invalid(student, "update")?;
        self.repo.update_student(student, courses)?;
        info!(
            "event=student_update module=service status=ok student_id={} courses={}",
            student.student_id,
            courses.len()
        );
        self.read_back(student.student_id, "updated student not found in read-back")
    }

    /// Replaces the student's course set without touching its fields.
    pub fn enroll_courses(
        &mut self,
        student_id: StudentId,
        courses: &[CourseCode],
    ) -> ServiceResult<BTreeSet<CourseCode>> {
        self.repo.replace_courses(student_id, courses)?;
        Ok(self.repo.enrolled_courses(student_id)?)
    }

    pub fn remove_student<D: ConfirmDialog + ?Sized>(
        &mut self,
        student_id: StudentId,
        dialog: &D,
    ) -> ServiceResult<RemoveOutcome> {
        let student = self
            .repo
            .get_student(student_id)?
            .ok_or_else(|| ServiceError::NotFound {
                entity: ENTITY,
                key: student_id.to_string(),
            })?;

        if !removal_confirmed(dialog, &student.display_label()) {
            info!("event=student_remove module=service status=cancelled student_id={student_id}");
            return Ok(RemoveOutcome::Cancelled);
        }

        self.repo.delete_student(student_id)?;
        info!("event=student_remove module=service status=ok student_id={student_id}");
        Ok(RemoveOutcome::Removed)
    }

    fn read_back(&self, student_id: StudentId, details: &'static str) -> ServiceResult<StudentRecord> {
        let student = self
            .repo
            .get_student(student_id)?
            .ok_or(ServiceError::InconsistentState(details))?;
        let courses = self.repo.enrolled_courses(student_id)?;
        Ok(StudentRecord { student, courses })
    }
}

fn reject_invalid(student: &Student, action: &str) -> ServiceResult<()> {
    student.validate().map_err(|err| {
        warn!(
            "event=student_{action} module=service status=rejected field={}",
            err.field
        );
        ServiceError::Invalid(err)
    })
}
