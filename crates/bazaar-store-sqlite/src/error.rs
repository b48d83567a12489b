//! Error type for `bazaar-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] bazaar_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// An item references a category row that does not exist.
  #[error("category not found: {0}")]
  CategoryNotFound(i64),

  /// Category creation kept colliding with concurrent creators.
  #[error("could not create category {0:?}: too many conflicting writers")]
  CategoryConflict(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
