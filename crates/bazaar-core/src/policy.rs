//! What happens when an item is submitted under a name that already exists.

use serde::{Deserialize, Serialize};

/// Handling of a submission whose item name is already stored.
///
/// The item name is treated as a global uniqueness key. Under either policy
/// the first write wins and the stored item is never modified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
  /// Drop the submission silently and report success.
  #[default]
  Ignore,
  /// Refuse the submission with [`Error::DuplicateName`](crate::Error::DuplicateName).
  Reject,
}

/// The policy the service has always applied: resubmissions are ignored.
pub const ON_DUPLICATE_NAME: DuplicatePolicy = DuplicatePolicy::Ignore;
