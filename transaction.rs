//! Edits and atomic transactions.
//!
//! An [`Edit`] replaces the span `[from, to)` with `text`; an empty span with
//! non-empty text is a pure insertion. A [`Transaction`] is the unit of atomic
//! mutation: a sequence of [`ChangeGroup`]s, one per cursor, each carrying the
//! edits that cursor produced plus the selection it wants afterwards.
//!
//! # Coordinate spaces
//!
//! Every edit in a transaction is expressed against the *pre-commit* document,
//! as if no other cursor's edit had happened. A group's resulting selection is
//! expressed against the pre-commit document *plus that group's own edits*
//! (the callback that produced it already accounts for them). The committing
//! host remaps edits through previously applied edits and remaps each group's
//! selection through every other earlier group; see [`map_position`] and the
//! reference implementation in [`crate::host::Buffer`].
//!
//! # Conflicts
//!
//! A transaction must be internally non-conflicting: all edits, across all
//! groups, must form non-overlapping spans in pre-commit coordinates.
//! Insertions at the same point are fine (they apply in group order);
//! overlapping replacements are a [`TransactionError`], not silent corruption.

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
  Tendril,
  position::Position,
  selection::Selection,
};

pub type Result<T> = std::result::Result<T, TransactionError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransactionError {
  #[error("invalid edit range: start {from:?} is after end {to:?}")]
  InvalidRange { from: Position, to: Position },
  #[error("edit range end {to:?} is out of bounds for a document of {lines} lines")]
  RangeOutOfBounds { to: Position, lines: usize },
  #[error("edit at {from:?} overlaps a previous edit ending at {prev_to:?}")]
  OverlappingRanges { prev_to: Position, from: Position },
}

/// Replace the span `[from, to)` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
  pub from: Position,
  pub to:   Position,
  pub text: Tendril,
}

impl Edit {
  pub fn replace(from: Position, to: Position, text: impl Into<Tendril>) -> Self {
    Self {
      from,
      to,
      text: text.into(),
    }
  }

  /// A pure insertion at `at`.
  pub fn insert(at: Position, text: impl Into<Tendril>) -> Self {
    Self::replace(at, at, text)
  }

  /// A pure deletion of `[from, to)`.
  pub fn delete(from: Position, to: Position) -> Self {
    Self::replace(from, to, "")
  }

  #[inline]
  pub fn is_insert(&self) -> bool {
    self.from == self.to
  }

  /// The position just past the inserted text once this edit is applied.
  pub fn end_position(&self) -> Position {
    let newlines = self.text.matches('\n').count();
    if newlines == 0 {
      return Position::new(self.from.line, self.from.col + self.text.chars().count());
    }
    let last_line_len = self
      .text
      .rsplit('\n')
      .next()
      .map(|tail| tail.chars().count())
      .unwrap_or(0);
    Position::new(self.from.line + newlines, last_line_len)
  }
}

/// Maps a position through `edit`.
///
/// Positions before the edit are untouched; positions inside the replaced
/// span clamp to its start; positions at or after the span end shift by the
/// edit's line/column delta. A position exactly at a pure insertion point is
/// pushed past the inserted text, which is what makes same-point insertions
/// from multiple cursors stack in application order.
pub fn map_position(pos: Position, edit: &Edit) -> Position {
  if pos < edit.from {
    return pos;
  }
  if pos < edit.to {
    return edit.from;
  }

  let end = edit.end_position();
  if pos.line == edit.to.line {
    Position::new(end.line, end.col + (pos.col - edit.to.col))
  } else {
    Position::new(end.line + (pos.line - edit.to.line), pos.col)
  }
}

/// One cursor's contribution to a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeGroup {
  pub edits:     SmallVec<[Edit; 1]>,
  /// Resulting selection, in pre-commit coordinates adjusted for this group's
  /// own edits. `None` lets the host derive one from the edit span.
  pub selection: Option<Selection>,
}

impl ChangeGroup {
  pub fn new(edits: SmallVec<[Edit; 1]>, selection: Option<Selection>) -> Self {
    Self { edits, selection }
  }

  /// A group that only moves a selection.
  pub fn selection_only(selection: Selection) -> Self {
    Self {
      edits:     SmallVec::new(),
      selection: Some(selection),
    }
  }

  pub fn has_edits(&self) -> bool {
    !self.edits.is_empty()
  }
}

/// An atomic batch of per-cursor changes, committed as one undo step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
  groups: Vec<ChangeGroup>,
}

impl Transaction {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, group: ChangeGroup) {
    self.groups.push(group);
  }

  pub fn groups(&self) -> &[ChangeGroup] {
    &self.groups
  }

  pub fn into_groups(self) -> Vec<ChangeGroup> {
    self.groups
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  pub fn has_edits(&self) -> bool {
    self.groups.iter().any(ChangeGroup::has_edits)
  }

  /// All edits, flattened, in group order.
  pub fn edits(&self) -> impl Iterator<Item = &Edit> {
    self.groups.iter().flat_map(|group| group.edits.iter())
  }

  /// Resulting selections, in group order.
  pub fn selections(&self) -> impl Iterator<Item = Option<Selection>> + '_ {
    self.groups.iter().map(|group| group.selection)
  }

  /// Checks that all edits form independent, non-overlapping spans in
  /// pre-commit coordinates. Insertions sharing a point are allowed.
  pub fn validate(&self) -> Result<()> {
    let mut spans: Vec<(Position, Position)> = Vec::new();
    for edit in self.edits() {
      if edit.to < edit.from {
        return Err(TransactionError::InvalidRange {
          from: edit.from,
          to:   edit.to,
        });
      }
      spans.push((edit.from, edit.to));
    }
    spans.sort_by_key(|(from, _)| *from);

    for pair in spans.windows(2) {
      let (_, prev_to) = pair[0];
      let (from, _) = pair[1];
      if from < prev_to {
        return Err(TransactionError::OverlappingRanges { prev_to, from });
      }
    }
    Ok(())
  }
}

impl FromIterator<ChangeGroup> for Transaction {
  fn from_iter<I: IntoIterator<Item = ChangeGroup>>(iter: I) -> Self {
    Self {
      groups: iter.into_iter().collect(),
    }
  }
}

#[cfg(test)]
mod test {
  use quickcheck::{
    QuickCheck,
    TestResult,
  };
  use smallvec::smallvec;

  use super::*;

  fn pos(line: usize, col: usize) -> Position {
    Position::new(line, col)
  }

  #[test]
  fn end_position_single_line() {
    let edit = Edit::insert(pos(2, 3), "abc");
    assert_eq!(edit.end_position(), pos(2, 6));
  }

  #[test]
  fn end_position_multi_line() {
    let edit = Edit::insert(pos(2, 3), "ab\ncd\ne");
    assert_eq!(edit.end_position(), pos(4, 1));
  }

  #[test]
  fn map_before_edit_is_identity() {
    let edit = Edit::replace(pos(3, 0), pos(4, 0), "x");
    assert_eq!(map_position(pos(2, 9), &edit), pos(2, 9));
    assert_eq!(map_position(pos(3, 0), &edit), pos(3, 0));
  }

  #[test]
  fn map_inside_clamps_to_start() {
    let edit = Edit::delete(pos(1, 2), pos(2, 4));
    assert_eq!(map_position(pos(1, 5), &edit), pos(1, 2));
    assert_eq!(map_position(pos(2, 3), &edit), pos(1, 2));
  }

  #[test]
  fn map_after_line_insertion_shifts_lines() {
    let edit = Edit::insert(pos(1, 0), "\n");
    assert_eq!(map_position(pos(1, 0), &edit), pos(2, 0));
    assert_eq!(map_position(pos(1, 4), &edit), pos(2, 4));
    assert_eq!(map_position(pos(5, 2), &edit), pos(6, 2));
    assert_eq!(map_position(pos(0, 9), &edit), pos(0, 9));
  }

  #[test]
  fn map_after_same_line_replacement_shifts_columns() {
    let edit = Edit::replace(pos(1, 2), pos(1, 5), "longer");
    // 3 chars replaced by 6: +3 columns past the span.
    assert_eq!(map_position(pos(1, 5), &edit), pos(1, 8));
    assert_eq!(map_position(pos(1, 9), &edit), pos(1, 12));
    assert_eq!(map_position(pos(2, 0), &edit), pos(2, 0));
  }

  #[test]
  fn map_after_join_pulls_next_line_up() {
    // Deleting a line break: "[to end of line 1][start of line 2)" removed.
    let edit = Edit::delete(pos(1, 7), pos(2, 0));
    assert_eq!(map_position(pos(2, 3), &edit), pos(1, 10));
    assert_eq!(map_position(pos(3, 1), &edit), pos(2, 1));
  }

  #[test]
  fn validate_rejects_overlap() {
    let tx: Transaction = vec![
      ChangeGroup::new(smallvec![Edit::delete(pos(0, 0), pos(0, 5))], None),
      ChangeGroup::new(smallvec![Edit::delete(pos(0, 3), pos(0, 8))], None),
    ]
    .into_iter()
    .collect();

    assert_eq!(tx.validate(), Err(TransactionError::OverlappingRanges {
      prev_to: pos(0, 5),
      from:    pos(0, 3),
    }));
  }

  #[test]
  fn validate_allows_same_point_insertions() {
    let tx: Transaction = vec![
      ChangeGroup::new(smallvec![Edit::insert(pos(4, 0), "\n")], None),
      ChangeGroup::new(smallvec![Edit::insert(pos(4, 0), "\n")], None),
    ]
    .into_iter()
    .collect();

    assert!(tx.validate().is_ok());
  }

  #[test]
  fn map_position_is_monotone() {
    fn prop(
      a: (u8, u8),
      b: (u8, u8),
      span: ((u8, u8), (u8, u8)),
      text: String,
    ) -> TestResult {
      let from = pos(span.0.0 as usize, span.0.1 as usize);
      let to = pos(span.1.0 as usize, span.1.1 as usize);
      if to < from {
        return TestResult::discard();
      }
      let edit = Edit::replace(from, to, text.replace('\r', ""));

      let p1 = pos(a.0 as usize, a.1 as usize);
      let p2 = pos(b.0 as usize, b.1 as usize);
      let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };

      TestResult::from_bool(map_position(lo, &edit) <= map_position(hi, &edit))
    }

    QuickCheck::new()
      .tests(500)
      .quickcheck(prop as fn((u8, u8), (u8, u8), ((u8, u8), (u8, u8)), String) -> TestResult);
  }
}
