//! Category registry: name → id lookups and create-on-first-use.
//!
//! These run inside a `tokio_rusqlite` call, directly against the connection.

use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, ffi};

use bazaar_core::item::Category;

/// How many times a creator retries after losing a uniqueness race.
pub const MAX_CREATE_ATTEMPTS: usize = 3;

/// Result of [`resolve_or_create`].
pub struct Resolved {
  pub category: Category,
  pub created:  bool,
}

pub fn find_category_id(conn: &Connection, name: &str) -> rusqlite::Result<Option<i64>> {
  conn
    .query_row(
      "SELECT id FROM categories_table WHERE name = ?1",
      rusqlite::params![name],
      |row| row.get(0),
    )
    .optional()
}

pub fn find_category_name(conn: &Connection, id: i64) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT name FROM categories_table WHERE id = ?1",
      rusqlite::params![id],
      |row| row.get(0),
    )
    .optional()
}

/// Look `name` up, inserting it when missing.
///
/// Each attempt is its own transaction, so a failed insert leaves nothing
/// behind. If another writer inserts the same name between our lookup and our
/// insert, the `UNIQUE` constraint rejects ours and we look again. Returns
/// `None` once [`MAX_CREATE_ATTEMPTS`] is exhausted.
pub fn resolve_or_create(
  conn: &mut Connection,
  name: &str,
) -> rusqlite::Result<Option<Resolved>> {
  for _ in 0..MAX_CREATE_ATTEMPTS {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if let Some(id) = find_category_id(&tx, name)? {
      tx.commit()?;
      return Ok(Some(Resolved {
        category: Category { id, name: name.to_owned() },
        created:  false,
      }));
    }

    if let Some(id) = insert_category(&tx, name)? {
      tx.commit()?;
      return Ok(Some(Resolved {
        category: Category { id, name: name.to_owned() },
        created:  true,
      }));
    }
    // Lost the race. Dropping `tx` rolls the attempt back.
  }
  Ok(None)
}

pub fn list_categories(conn: &Connection) -> rusqlite::Result<Vec<Category>> {
  let mut stmt = conn.prepare("SELECT id, name FROM categories_table ORDER BY id")?;
  stmt
    .query_map([], |row| {
      Ok(Category {
        id:   row.get(0)?,
        name: row.get(1)?,
      })
    })?
    .collect()
}

/// Insert `name`, returning `None` if the `UNIQUE` constraint on
/// `categories_table.name` rejects it.
fn insert_category(conn: &Connection, name: &str) -> rusqlite::Result<Option<i64>> {
  match conn.execute(
    "INSERT INTO categories_table (name) VALUES (?1)",
    rusqlite::params![name],
  ) {
    Ok(_) => Ok(Some(conn.last_insert_rowid())),
    Err(e) if is_unique_violation(&e) => Ok(None),
    Err(e) => Err(e),
  }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _) if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::schema::SCHEMA;

  fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn
  }

  // Every insert of `name` also inserts it from inside the statement, so the
  // outer row always collides. The statement rollback discards both rows.
  fn always_collide(conn: &Connection, name: &str) {
    conn
      .execute_batch(&format!(
        "CREATE TEMP TRIGGER collide BEFORE INSERT ON categories_table
         WHEN NEW.name = '{name}'
         BEGIN
           INSERT INTO categories_table (name) VALUES (NEW.name);
         END;"
      ))
      .unwrap();
  }

  #[test]
  fn insert_reports_existing_name_as_none() {
    let conn = conn();

    let id = insert_category(&conn, "garden").unwrap().unwrap();
    assert_eq!(insert_category(&conn, "garden").unwrap(), None);
    assert_eq!(find_category_id(&conn, "garden").unwrap(), Some(id));
  }

  #[test]
  fn resolve_after_conflict_finds_the_winner() {
    let mut conn = conn();
    let winner = insert_category(&conn, "garden").unwrap().unwrap();
    assert_eq!(insert_category(&conn, "garden").unwrap(), None);

    let resolved = resolve_or_create(&mut conn, "garden").unwrap().unwrap();
    assert_eq!(resolved.category.id, winner);
    assert!(!resolved.created);
    assert_eq!(list_categories(&conn).unwrap().len(), 1);
  }

  #[test]
  fn resolve_gives_up_after_repeated_conflicts() {
    let mut conn = conn();
    always_collide(&conn, "garden");

    assert!(resolve_or_create(&mut conn, "garden").unwrap().is_none());
    assert!(list_categories(&conn).unwrap().is_empty());

    let other = resolve_or_create(&mut conn, "kitchen").unwrap().unwrap();
    assert!(other.created);
  }

  #[test]
  fn only_unique_failures_count_as_conflicts() {
    let conn = conn();
    insert_category(&conn, "garden").unwrap();

    let unique = conn
      .execute("INSERT INTO categories_table (name) VALUES ('garden')", [])
      .unwrap_err();
    assert!(is_unique_violation(&unique));

    let foreign_key = conn
      .execute(
        "INSERT INTO items_table (name, category_id, image_name) VALUES ('hat', 999, 'h.jpg')",
        [],
      )
      .unwrap_err();
    assert!(!is_unique_violation(&foreign_key));

    conn
      .execute_batch("CREATE TEMP TABLE checked (x INTEGER NOT NULL CHECK (x > 0));")
      .unwrap();
    let check = conn.execute("INSERT INTO checked (x) VALUES (-1)", []).unwrap_err();
    let not_null = conn.execute("INSERT INTO checked (x) VALUES (NULL)", []).unwrap_err();
    assert!(!is_unique_violation(&check));
    assert!(!is_unique_violation(&not_null));
  }

  #[test]
  fn other_constraint_failures_are_not_retried() {
    let mut conn = conn();
    conn
      .execute_batch(
        "CREATE TEMP TRIGGER refuse BEFORE INSERT ON categories_table
         BEGIN
           SELECT RAISE(ABORT, 'categories are frozen');
         END;",
      )
      .unwrap();

    let err = resolve_or_create(&mut conn, "garden").err().unwrap();
    assert!(matches!(
      err,
      rusqlite::Error::SqliteFailure(ref e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_TRIGGER
    ));
  }
}
