//! Error types for `bazaar-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A position that is not an integer reached the core boundary.
  #[error("invalid item position: {0:?}")]
  InvalidPosition(String),

  /// An item with this name already exists and the store is configured with
  /// [`DuplicatePolicy::Reject`](crate::policy::DuplicatePolicy::Reject).
  #[error("an item named {0:?} already exists")]
  DuplicateName(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
