//! Handler for `GET /categories`.

use axum::{Json, extract::State};
use bazaar_core::{item::Category, store::ItemStore};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryList {
  pub categories: Vec<Category>,
}

/// `GET /categories`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<CategoryList>, ApiError>
where
  S: ItemStore,
{
  let categories = state
    .store
    .list_categories()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(CategoryList { categories }))
}
