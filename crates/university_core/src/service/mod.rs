//! Use-case services for the university records.
//!
//! # Responsibility
//! - Run the form-level save/remove flows on top of repositories.
//! - Reject invalid drafts before any store mutation.
//! - Keep UI callers decoupled from storage details.

pub mod course_service;
pub mod dialog;
pub mod faculty_service;
pub mod project_service;
pub mod student_service;

use crate::model::validation::ValidationError;
use crate::repo::error::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error surfaced to form callers.
#[derive(Debug)]
pub enum ServiceError {
    /// A checked field failed; the store was not touched.
    Invalid(ValidationError),
    /// Create target key is already taken.
    AlreadyExists {
        entity: &'static str,
        key_label: &'static str,
        key: String,
    },
    /// Target entity does not exist.
    NotFound { entity: &'static str, key: String },
    /// An association target does not exist.
    MissingReference { entity: &'static str, key: String },
    /// Persistence-layer failure, propagated unchanged.
    Repo(RepoError),
    /// Write succeeded but read-back did not find the entity.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(_) => write!(f, "Please complete all required fields"),
            Self::AlreadyExists {
                entity, key_label, ..
            } => write!(f, "{entity} with this {key_label} already exists."),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::MissingReference { entity, key } => {
                write!(f, "referenced {entity} does not exist: {key}")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent record state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Invalid(err),
            RepoError::AlreadyExists {
                entity,
                key_label,
                key,
            } => Self::AlreadyExists {
                entity,
                key_label,
                key,
            },
            RepoError::NotFound { entity, key } => Self::NotFound { entity, key },
            RepoError::MissingReference { entity, key } => Self::MissingReference { entity, key },
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}
