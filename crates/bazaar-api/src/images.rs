//! The on-disk image directory and `GET /image/{image_name}`.
//!
//! Images are stored flat under one directory, keyed by the stored image name
//! the core derives. Saving under an existing name overwrites the file.

use std::{
  io,
  path::{Path, PathBuf},
};

use axum::{
  extract::{Path as UrlPath, State},
  http::header,
  response::IntoResponse,
};
use bazaar_core::{image::IMAGE_EXTENSION, store::ItemStore};
use bytes::Bytes;

use crate::{ApiState, error::ApiError};

/// Served in place of any image that is missing from the directory.
pub const DEFAULT_IMAGE: &str = "default.jpg";

/// A directory of stored images.
#[derive(Debug, Clone)]
pub struct ImageDir {
  root: PathBuf,
}

impl ImageDir {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  /// Write `bytes` under `name`, creating the directory if needed.
  pub async fn save(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
    tokio::fs::create_dir_all(&self.root).await?;
    tokio::fs::write(self.root.join(name), bytes).await
  }

  /// Read the image called `name`, falling back to [`DEFAULT_IMAGE`].
  ///
  /// Returns `None` when neither exists.
  pub async fn load(&self, name: &str) -> io::Result<Option<Bytes>> {
    if let Some(bytes) = read_if_exists(&self.root.join(name)).await? {
      return Ok(Some(bytes));
    }
    tracing::debug!(image = %name, "image not found, serving default");
    read_if_exists(&self.root.join(DEFAULT_IMAGE)).await
  }
}

async fn read_if_exists(path: &Path) -> io::Result<Option<Bytes>> {
  match tokio::fs::read(path).await {
    Ok(bytes) => Ok(Some(Bytes::from(bytes))),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e),
  }
}

/// Reject names that could escape the image directory or are not `.jpg`.
pub fn check_image_name(name: &str) -> Result<(), ApiError> {
  if !name.ends_with(IMAGE_EXTENSION) {
    return Err(ApiError::BadRequest(
      "Image path does not end with .jpg".to_owned(),
    ));
  }
  if name.contains(['/', '\\']) || name.starts_with('.') {
    return Err(ApiError::BadRequest(format!("invalid image name: {name:?}")));
  }
  Ok(())
}

/// `GET /image/{image_name}` — `image/jpeg` bytes, or the default image.
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  UrlPath(image_name): UrlPath<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ItemStore,
{
  check_image_name(&image_name)?;
  let bytes = state
    .images
    .load(&image_name)
    .await?
    .ok_or_else(|| ApiError::NotFound("image not found".to_owned()))?;
  Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}
