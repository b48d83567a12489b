//! The `ItemStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `bazaar-store-sqlite`).
//! The transport shell (`bazaar-api`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  item::{AddOutcome, Category, NewItem, ViewItem},
  position::Position,
};

/// Abstraction over a Bazaar item store backend.
///
/// Items and categories are append-only: nothing is ever updated or deleted.
/// No reads are cached, every call re-queries storage.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ItemStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Category registry ─────────────────────────────────────────────────

  /// Return the category called `name`, creating it on first use.
  fn resolve_or_create_category<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Category, Self::Error>> + Send + 'a;

  /// Name of the category with `id`. Returns `None` if no such row exists.
  fn category_name(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// All categories, in id order.
  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  // ── Items — writes ────────────────────────────────────────────────────

  /// Store a new item, resolving its category first.
  ///
  /// Item names are deduplicated according to the store's
  /// [`DuplicatePolicy`](crate::policy::DuplicatePolicy). The category is
  /// created and kept even if the item step subsequently fails or is skipped.
  fn add_item(
    &self,
    item: NewItem,
  ) -> impl Future<Output = Result<AddOutcome, Self::Error>> + Send + '_;

  // ── Items — reads ─────────────────────────────────────────────────────

  /// Number of stored items.
  fn item_count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// The item at `position` in insertion order. Returns `None` when the
  /// position is past the last item.
  fn get_item_by_position(
    &self,
    position: Position,
  ) -> impl Future<Output = Result<Option<ViewItem>, Self::Error>> + Send + '_;

  /// Every item, in insertion order.
  fn list_all_items(
    &self,
  ) -> impl Future<Output = Result<Vec<ViewItem>, Self::Error>> + Send + '_;

  /// Items whose name contains `keyword`, in insertion order.
  ///
  /// Matching is a case-sensitive SQL `LIKE` against `%keyword%`. `%` and `_`
  /// inside `keyword` are not escaped and act as wildcards. The empty keyword
  /// matches every item.
  fn search_by_keyword<'a>(
    &'a self,
    keyword: &'a str,
  ) -> impl Future<Output = Result<Vec<ViewItem>, Self::Error>> + Send + 'a;
}
