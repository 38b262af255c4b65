//! Line/column positions and position-level utilities.
//!
//! A [`Position`] is a `(line, column)` address into the host document's
//! coordinate space. Columns count characters, not bytes, so multi-byte
//! letters occupy a single column. Ordering is lexicographic on
//! `(line, col)`, which is the order used everywhere selections are
//! normalized.

use std::borrow::Cow;

use crate::{
  chars::char_is_letter,
  host::TextSource,
  selection::Selection,
};

/// A single point in the document. 0-indexed as all things should be.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
  pub line: usize,
  pub col:  usize,
}

impl Position {
  pub fn new(line: usize, col: usize) -> Self {
    Self { line, col }
  }

  pub const fn zero() -> Self {
    Self { line: 0, col: 0 }
  }
}

impl From<(usize, usize)> for Position {
  fn from(value: (usize, usize)) -> Self {
    Position::new(value.0, value.1)
  }
}

/// Position at column 0 of `line`.
#[inline]
pub fn line_start(line: usize) -> Position {
  Position::new(line, 0)
}

/// Position just past the last character of `line`.
#[inline]
pub fn line_end(doc: &(impl TextSource + ?Sized), line: usize) -> Position {
  Position::new(line, doc.line_len(line))
}

/// The longest whitespace prefix of `line_text`.
pub fn leading_whitespace(line_text: &str) -> &str {
  let end = line_text
    .char_indices()
    .find(|(_, ch)| !ch.is_whitespace())
    .map(|(idx, _)| idx)
    .unwrap_or(line_text.len());
  &line_text[..end]
}

/// Expands `pos` to the enclosing run of letters on `line_text`.
///
/// Expansion goes left while the character before the cursor is a letter (or
/// combining mark) and right while the character at the cursor is one. The
/// result never crosses the line boundary and collapses to a point at `pos`
/// when no adjacent letters exist.
pub fn word_range_at(pos: Position, line_text: &str) -> Selection {
  let chars: Vec<char> = line_text.chars().collect();
  let col = pos.col.min(chars.len());

  let mut start = col;
  while start > 0 && char_is_letter(chars[start - 1]) {
    start -= 1;
  }

  let mut end = col;
  while end < chars.len() && char_is_letter(chars[end]) {
    end += 1;
  }

  if start == end {
    return Selection::cursor(pos);
  }

  Selection::new(Position::new(pos.line, start), Position::new(pos.line, end))
}

/// The position one character cell before `pos`, rolling to the end of the
/// previous line at column 0. `None` at the absolute document start.
pub fn prev_position(doc: &(impl TextSource + ?Sized), pos: Position) -> Option<Position> {
  if pos.col > 0 {
    return Some(Position::new(pos.line, pos.col - 1));
  }
  if pos.line == 0 {
    return None;
  }
  Some(line_end(doc, pos.line - 1))
}

/// The position one character cell after `pos`, rolling to the start of the
/// next line at the line end. `None` at the absolute document end.
pub fn next_position(doc: &(impl TextSource + ?Sized), pos: Position) -> Option<Position> {
  if pos.col < doc.line_len(pos.line) {
    return Some(Position::new(pos.line, pos.col + 1));
  }
  if pos.line >= doc.last_line() {
    return None;
  }
  Some(line_start(pos.line + 1))
}

/// Clamps `pos` into the addressable positions of `doc`.
pub fn clamp(doc: &(impl TextSource + ?Sized), pos: Position) -> Position {
  let line = pos.line.min(doc.last_line());
  Position::new(line, pos.col.min(doc.line_len(line)))
}

/// Character-indexed slice of `text`. Columns are char offsets, so byte
/// slicing would split multi-byte letters.
pub(crate) fn char_slice(text: &str, from: usize, to: usize) -> Cow<'_, str> {
  let mut indices = text
    .char_indices()
    .map(|(idx, _)| idx)
    .chain(std::iter::once(text.len()));
  let start = indices.by_ref().nth(from).unwrap_or(text.len());
  let end = if to > from {
    indices.nth(to - from - 1).unwrap_or(text.len())
  } else {
    start
  };
  Cow::Borrowed(&text[start..end])
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::host::Buffer;

  #[test]
  fn position_ordering_is_lexicographic() {
    assert!(Position::new(0, 9) < Position::new(1, 0));
    assert!(Position::new(2, 3) < Position::new(2, 4));
    assert_eq!(Position::new(1, 1), Position::new(1, 1));
  }

  #[test]
  fn leading_whitespace_prefixes() {
    assert_eq!(leading_whitespace("    dolor sit"), "    ");
    assert_eq!(leading_whitespace("\t\tdolor"), "\t\t");
    assert_eq!(leading_whitespace("dolor"), "");
    assert_eq!(leading_whitespace("   "), "   ");
    assert_eq!(leading_whitespace(""), "");
  }

  #[test]
  fn word_range_expands_unicode_letters() {
    let sel = word_range_at(Position::new(0, 2), "café au lait");
    assert_eq!(sel.from(), Position::new(0, 0));
    assert_eq!(sel.to(), Position::new(0, 4));
  }

  #[test]
  fn word_range_collapses_without_letters() {
    // Column 6 sits between two spaces, no letter on either side.
    let sel = word_range_at(Position::new(0, 6), "lorem  ipsum");
    assert!(sel.is_empty());
    assert_eq!(sel.head, Position::new(0, 6));

    // Digits are not letters either.
    let sel = word_range_at(Position::new(0, 2), "1234");
    assert!(sel.is_empty());
    assert_eq!(sel.head, Position::new(0, 2));
  }

  #[test]
  fn word_range_stops_at_line_bounds() {
    let sel = word_range_at(Position::new(3, 5), "lorem");
    assert_eq!(sel.from(), Position::new(3, 0));
    assert_eq!(sel.to(), Position::new(3, 5));
  }

  #[test]
  fn stepping_rolls_across_lines() {
    let doc = Buffer::from_str("ab\ncd");
    assert_eq!(
      prev_position(&doc, Position::new(1, 0)),
      Some(Position::new(0, 2))
    );
    assert_eq!(prev_position(&doc, Position::new(0, 0)), None);
    assert_eq!(
      next_position(&doc, Position::new(0, 2)),
      Some(Position::new(1, 0))
    );
    assert_eq!(next_position(&doc, Position::new(1, 2)), None);
  }

  #[test]
  fn char_slice_is_char_indexed() {
    assert_eq!(char_slice("café au", 2, 5), "fé ");
    assert_eq!(char_slice("café", 0, 4), "café");
    assert_eq!(char_slice("café", 3, 3), "");
    assert_eq!(char_slice("ab", 1, 9), "b");
  }
}
