//! University records domain model.
//!
//! # Responsibility
//! - Define the entity records persisted by the repository layer.
//! - Own the per-field validation rules every write path must pass.
//!
//! # Invariants
//! - Entity keys are immutable once stored.
//! - Join rows (`FacultyToProject`, course enrollments) carry keys only.

pub mod course;
pub mod faculty;
pub mod project;
pub mod student;
pub mod validation;
