//! Handlers for `/` and `/items` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Greeting |
//! | `POST` | `/items` | Multipart: `name`, `category`, `image` (file) |
//! | `GET`  | `/items` | `{"items": [...]}` |
//! | `GET`  | `/items/:item_id` | 1-based position; 404 if out of range |

use axum::{
  Json,
  extract::{Multipart, Path, State},
};
use bazaar_core::{
  image::derive_image_name,
  item::{NewItem, ViewItem},
  position::parse_position,
  store::ItemStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

// ─── Response bodies ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
  pub message: String,
}

impl Message {
  pub fn new(message: impl Into<String>) -> Self {
    Self { message: message.into() }
  }
}

/// Body of every item listing, including search results.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemList {
  pub items: Vec<ViewItem>,
}

// ─── Root ─────────────────────────────────────────────────────────────────────

/// `GET /`
pub async fn root() -> Json<Message> { Json(Message::new("Hello, world!")) }

// ─── Create ───────────────────────────────────────────────────────────────────

/// The fields of a `POST /items` form.
#[derive(Debug, Default)]
struct Submission {
  name:           Option<String>,
  category:       Option<String>,
  image_filename: Option<String>,
  image:          Option<bytes::Bytes>,
}

impl Submission {
  async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
    let mut form = Submission::default();
    while let Some(field) = multipart
      .next_field()
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
      let field_name = field.name().map(str::to_owned);
      match field_name.as_deref() {
        Some("name") => form.name = Some(field_text(field).await?),
        Some("category") => form.category = Some(field_text(field).await?),
        Some("image") => {
          form.image_filename = field.file_name().map(str::to_owned);
          form.image = Some(
            field
              .bytes()
              .await
              .map_err(|e| ApiError::BadRequest(e.body_text()))?,
          );
        }
        _ => {}
      }
    }
    Ok(form)
  }
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
  field
    .text()
    .await
    .map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
  value.ok_or_else(|| ApiError::BadRequest(format!("missing form field: {field}")))
}

/// `POST /items` — stores the item, then writes the image bytes under the
/// name derived from the upload's declared filename.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  multipart: Multipart,
) -> Result<Json<Message>, ApiError>
where
  S: ItemStore,
{
  let form = Submission::read(multipart).await?;
  let name = required(form.name, "name")?;
  let category = required(form.category, "category")?;
  let image = required(form.image, "image")?;
  let filename = required(form.image_filename, "image filename")?;

  tracing::info!(item = %name, category = %category, image = %filename, "receive item");

  let image_name = derive_image_name(&filename);
  let outcome = state
    .store
    .add_item(NewItem::new(name.clone(), category, image_name.clone()))
    .await
    .map_err(ApiError::from_store)?;
  if !outcome.is_inserted() {
    tracing::info!(item = %name, "item name already stored, submission ignored");
  }
  state.images.save(&image_name, &image).await?;

  Ok(Json(Message::new(format!("item received: {name}"))))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /items`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<ItemList>, ApiError>
where
  S: ItemStore,
{
  let items = state
    .store
    .list_all_items()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ItemList { items }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /items/:item_id`
///
/// Non-integer ids are rejected before the store is queried.
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(item_id): Path<String>,
) -> Result<Json<ViewItem>, ApiError>
where
  S: ItemStore,
{
  let not_found = || ApiError::NotFound("item not found".to_owned());

  let position = parse_position(&item_id)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?
    .ok_or_else(not_found)?;

  let item = state
    .store
    .get_item_by_position(position)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(not_found)?;
  Ok(Json(item))
}
