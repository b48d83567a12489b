//! Stored image names.
//!
//! An uploaded image is stored under a name derived from the filename the
//! client declared, not from the image bytes. Two different images uploaded
//! under the same filename map to the same stored name, so the second upload
//! overwrites the first in the image directory. Existing image references
//! depend on this keying, so it must stay filename-based.

use sha2::{Digest, Sha256};

/// Extension appended to every stored image name.
pub const IMAGE_EXTENSION: &str = ".jpg";

/// Derive the stored image name for an upload declared as `original_filename`.
///
/// Returns the lowercase hex SHA-256 of the filename's UTF-8 bytes followed by
/// `.jpg`.
pub fn derive_image_name(original_filename: &str) -> String {
  let digest = Sha256::digest(original_filename.as_bytes());
  format!("{}{IMAGE_EXTENSION}", hex::encode(digest))
}
