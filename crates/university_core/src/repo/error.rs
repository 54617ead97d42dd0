//! Repository error shared by every entity repository.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// Entity failed field validation; nothing was written.
    Validation(ValidationError),
    Db(DbError),
    /// Keyed entity does not exist.
    NotFound { entity: &'static str, key: String },
    /// Insert target key is already taken. `entity` and `key_label` are the
    /// form-facing names, e.g. `Course` and `Course_Code`.
    AlreadyExists {
        entity: &'static str,
        key_label: &'static str,
        key: String,
    },
    /// Join row would reference a parent that does not exist.
    MissingReference { entity: &'static str, key: String },
    /// Connection was not bootstrapped through `db::open_db*`.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::AlreadyExists {
                entity,
                key_label,
                key,
            } => write!(f, "{entity} with {key_label} `{key}` already exists"),
            Self::MissingReference { entity, key } => {
                write!(f, "referenced {entity} does not exist: {key}")
            }
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
