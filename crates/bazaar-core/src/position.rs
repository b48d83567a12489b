//! 1-based item positions, the external item identifier.

use std::fmt;

use crate::Error;

/// The 1-based ordinal of an item in storage insertion order.
///
/// A `Position` is always `>= 1`. Whether it is `<=` the current item count is
/// only known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(u64);

impl Position {
  /// Returns `None` for values below 1; no item can live there.
  pub fn new(value: i64) -> Option<Self> {
    u64::try_from(value).ok().filter(|v| *v >= 1).map(Self)
  }

  pub fn get(self) -> u64 { self.0 }

  /// Zero-based row offset, for `OFFSET` clauses.
  pub fn offset(self) -> u64 { self.0 - 1 }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Parses a raw path segment.
///
/// Non-integers are a validation failure ([`Error::InvalidPosition`]).
/// Integers below 1, and integers too large for any store to hold, parse
/// successfully as `None`: they are well-formed but can never resolve to an
/// item.
pub fn parse_position(raw: &str) -> Result<Option<Position>, Error> {
  let trimmed = raw.trim();
  let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Error::InvalidPosition(raw.to_owned()));
  }
  Ok(trimmed.parse::<i64>().ok().and_then(Position::new))
}
