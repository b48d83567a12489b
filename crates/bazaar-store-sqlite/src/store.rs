//! [`SqliteStore`] — the SQLite implementation of [`ItemStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, TransactionBehavior};

use bazaar_core::{
  item::{AddOutcome, Category, NewItem, ViewItem},
  policy::{DuplicatePolicy, ON_DUPLICATE_NAME},
  position::Position,
  store::ItemStore,
};

use crate::{
  registry,
  row::{RawItem, SELECT_ITEMS, query_items},
  schema::SCHEMA,
  Error, Result,
};

/// Outcome of the item-insertion step, before the duplicate policy applies.
enum ItemWrite {
  Inserted(i64),
  Existing(i64),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Bazaar item store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  policy:          DuplicatePolicy,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// Missing parent directories are created.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  /// Replace the duplicate-name policy (defaults to [`ON_DUPLICATE_NAME`]).
  pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn duplicate_policy(&self) -> DuplicatePolicy { self.policy }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, policy: ON_DUPLICATE_NAME })
  }

  /// Insert the item row unless one with the same name exists.
  ///
  /// Runs in its own transaction, separate from category resolution.
  async fn write_item(&self, item: NewItem, category_id: i64) -> Result<ItemWrite> {
    let write = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<i64> = tx
          .query_row(
            "SELECT id FROM items_table WHERE name = ?1 ORDER BY id LIMIT 1",
            rusqlite::params![item.name],
            |row| row.get(0),
          )
          .optional()?;

        if let Some(id) = existing {
          tx.commit()?;
          return Ok(ItemWrite::Existing(id));
        }

        tx.execute(
          "INSERT INTO items_table (name, category_id, image_name) VALUES (?1, ?2, ?3)",
          rusqlite::params![item.name, category_id, item.image_name],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(ItemWrite::Inserted(id))
      })
      .await?;
    Ok(write)
  }
}

// ─── ItemStore impl ──────────────────────────────────────────────────────────

impl ItemStore for SqliteStore {
  type Error = Error;

  // ── Category registry ─────────────────────────────────────────────────────

  async fn resolve_or_create_category(&self, name: &str) -> Result<Category> {
    let owned = name.to_owned();

    let resolved = self
      .conn
      .call(move |conn| Ok(registry::resolve_or_create(conn, &owned)?))
      .await?
      .ok_or_else(|| Error::CategoryConflict(name.to_owned()))?;

    if resolved.created {
      tracing::debug!(
        category = %resolved.category.name,
        id = resolved.category.id,
        "created category"
      );
    }
    Ok(resolved.category)
  }

  async fn category_name(&self, id: i64) -> Result<Option<String>> {
    let name = self
      .conn
      .call(move |conn| Ok(registry::find_category_name(conn, id)?))
      .await?;
    Ok(name)
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    let categories = self
      .conn
      .call(|conn| Ok(registry::list_categories(conn)?))
      .await?;
    Ok(categories)
  }

  // ── Items — writes ────────────────────────────────────────────────────────

  async fn add_item(&self, item: NewItem) -> Result<AddOutcome> {
    // Committed on its own: the category survives a failed item insert.
    let category = self.resolve_or_create_category(&item.category).await?;

    let name = item.name.clone();
    match self.write_item(item, category.id).await? {
      ItemWrite::Inserted(item_id) => Ok(AddOutcome::Inserted { item_id }),
      ItemWrite::Existing(existing_id) => match self.policy {
        DuplicatePolicy::Ignore => {
          tracing::debug!(item = %name, existing_id, "ignoring duplicate item name");
          Ok(AddOutcome::Ignored { existing_id })
        }
        DuplicatePolicy::Reject => Err(bazaar_core::Error::DuplicateName(name).into()),
      },
    }
  }

  // ── Items — reads ─────────────────────────────────────────────────────────

  async fn item_count(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM items_table", [], |row| row.get(0))?)
      })
      .await?;
    Ok(u64::try_from(count).unwrap_or_default())
  }

  async fn get_item_by_position(&self, position: Position) -> Result<Option<ViewItem>> {
    let Ok(offset) = i64::try_from(position.offset()) else {
      return Ok(None);
    };

    let raw: Option<RawItem> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{SELECT_ITEMS} ORDER BY i.id LIMIT 1 OFFSET ?1"),
            rusqlite::params![offset],
            RawItem::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawItem::into_view).transpose()
  }

  async fn list_all_items(&self) -> Result<Vec<ViewItem>> {
    let raws = self
      .conn
      .call(|conn| Ok(query_items(conn, &format!("{SELECT_ITEMS} ORDER BY i.id"), [])?))
      .await?;

    raws.into_iter().map(RawItem::into_view).collect()
  }

  async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<ViewItem>> {
    // `%` and `_` in `keyword` stay live wildcards.
    let pattern = format!("%{keyword}%");

    let raws = self
      .conn
      .call(move |conn| {
        Ok(query_items(
          conn,
          &format!("{SELECT_ITEMS} WHERE i.name LIKE ?1 ORDER BY i.id"),
          rusqlite::params![pattern],
        )?)
      })
      .await?;

    raws.into_iter().map(RawItem::into_view).collect()
  }
}
