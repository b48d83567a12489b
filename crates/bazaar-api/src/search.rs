//! Handler for `GET /search`.

use axum::{
  Json,
  extract::{Query, State},
};
use bazaar_core::store::ItemStore;
use serde::Deserialize;

use crate::{ApiState, error::ApiError, items::ItemList};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Substring to look for in item names. Absent means the empty keyword,
  /// which matches everything.
  pub keyword: Option<String>,
}

/// `GET /search[?keyword=...]`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<ItemList>, ApiError>
where
  S: ItemStore,
{
  let keyword = params.keyword.unwrap_or_default();
  let items = state
    .store
    .search_by_keyword(&keyword)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ItemList { items }))
}
