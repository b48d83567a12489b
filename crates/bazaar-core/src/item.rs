//! Items, categories, and the denormalised view returned to callers.

use serde::{Deserialize, Serialize};

/// A named grouping for items. `name` is the natural key; `id` is the
/// surrogate used for joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:   i64,
  pub name: String,
}

/// A submission accepted by [`ItemStore::add_item`](crate::store::ItemStore::add_item).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
  pub name:       String,
  /// Category name; resolved (or created) by the store.
  pub category:   String,
  /// Stored image name, see [`derive_image_name`](crate::image::derive_image_name).
  pub image_name: String,
}

impl NewItem {
  pub fn new(
    name: impl Into<String>,
    category: impl Into<String>,
    image_name: impl Into<String>,
  ) -> Self {
    Self {
      name:       name.into(),
      category:   category.into(),
      image_name: image_name.into(),
    }
  }
}

/// The read model for an item: its category id resolved to a name.
///
/// Never stored, always rehydrated from the item and category rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewItem {
  pub name:       String,
  pub category:   String,
  pub image_name: String,
}

/// What [`ItemStore::add_item`](crate::store::ItemStore::add_item) did with a
/// submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
  /// A new item row was written.
  Inserted { item_id: i64 },
  /// An item with the same name already existed; nothing was written.
  Ignored { existing_id: i64 },
}

impl AddOutcome {
  pub fn is_inserted(&self) -> bool { matches!(self, Self::Inserted { .. }) }
}
