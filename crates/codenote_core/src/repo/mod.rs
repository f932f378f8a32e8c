//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for categories and documents.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories never apply business defaults or validation; the store
//!   service does that before calling in.
//! - Reads reject malformed persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::timestamp::{self, Timestamp};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod category_repo;
pub mod document_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by category and document persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Update target row does not exist.
    NotFound(Uuid),
    /// Persisted data cannot be converted into a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
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

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn parse_timestamp(value: &str, column: &'static str) -> RepoResult<Timestamp> {
    timestamp::parse(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}
