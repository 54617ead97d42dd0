//! Core domain logic for university records.
//! This crate is the single source of truth for record validation and
//! association rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::course::{Course, CourseCode};
pub use model::faculty::{FacultyId, FacultyMember, FacultyToProject};
pub use model::project::{ProjectId, ResearchProject};
pub use model::student::{Student, StudentId};
pub use model::validation::{is_valid_pesel, FieldValidator, ValidationError};
pub use repo::association::{list_faculty_to_project, load_links, reconcile_links, AssociationLink};
pub use repo::course_repo::{CourseRepository, SqliteCourseRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::faculty_repo::{FacultyRepository, SqliteFacultyRepository};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use service::course_service::{CourseRecord, CourseService};
pub use service::dialog::{ConfirmDialog, RemoveOutcome};
pub use service::faculty_service::{FacultyRecord, FacultyService};
pub use service::project_service::{ProjectRecord, ProjectService};
pub use service::student_service::{StudentRecord, StudentService};
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
