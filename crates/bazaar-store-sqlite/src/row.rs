//! Raw item rows as read from SQLite, and their conversion to [`ViewItem`].

use bazaar_core::item::ViewItem;

use crate::{Error, Result};

/// Column list shared by every item read. Categories are LEFT JOINed so a
/// dangling `category_id` surfaces as an error instead of a silently missing
/// row.
pub const SELECT_ITEMS: &str = "
SELECT i.name, c.name, i.image_name, i.category_id
FROM items_table i
LEFT JOIN categories_table c ON c.id = i.category_id";

pub struct RawItem {
  pub name:        String,
  pub category:    Option<String>,
  pub image_name:  String,
  pub category_id: i64,
}

impl RawItem {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name:        row.get(0)?,
      category:    row.get(1)?,
      image_name:  row.get(2)?,
      category_id: row.get(3)?,
    })
  }

  pub fn into_view(self) -> Result<ViewItem> {
    let category = self
      .category
      .ok_or(Error::CategoryNotFound(self.category_id))?;
    Ok(ViewItem {
      name: self.name,
      category,
      image_name: self.image_name,
    })
  }
}

/// Run an item query and collect its rows.
pub fn query_items(
  conn: &rusqlite::Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<RawItem>> {
  let mut stmt = conn.prepare(sql)?;
  stmt.query_map(params, RawItem::from_row)?.collect()
}
