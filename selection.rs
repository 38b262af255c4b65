//! Anchor/head selections.
//!
//! A [`Selection`] has two positions: `anchor`, where the selection began,
//! and `head`, the active end the cursor sits on. When `anchor == head` the
//! selection is a plain cursor. Selections are not pre-sorted: the anchor may
//! come after the head, and `from()`/`to()` normalize the bounds without
//! losing direction.
//!
//! Selection *sets* are plain ordered `Vec<Selection>`s. Order is significant
//! (index corresponds to creation / top-to-bottom order at call time) and two
//! selections may coincide, so there is no implicit sorting or merging here.
//! The host surface decides when coincident cursors collapse.

use crate::{
  movement::Direction,
  position::Position,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
  pub anchor: Position,
  pub head:   Position,
}

impl Selection {
  pub fn new(anchor: Position, head: Position) -> Self {
    Self { anchor, head }
  }

  /// A collapsed selection (a cursor) at `pos`.
  #[inline]
  pub fn cursor(pos: Position) -> Self {
    Self::new(pos, pos)
  }

  /// Start of the selection, regardless of direction.
  #[inline]
  #[must_use]
  pub fn from(&self) -> Position {
    std::cmp::min(self.anchor, self.head)
  }

  /// End of the selection, regardless of direction.
  #[inline]
  #[must_use]
  pub fn to(&self) -> Position {
    std::cmp::max(self.anchor, self.head)
  }

  /// When the head and anchor coincide, we have no range.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.anchor == self.head
  }

  #[inline]
  #[must_use]
  pub fn direction(&self) -> Direction {
    if self.head < self.anchor {
      Direction::Backward
    } else {
      Direction::Forward
    }
  }

  /// Flips anchor and head.
  #[inline]
  #[must_use]
  pub fn flip(&self) -> Self {
    Self::new(self.head, self.anchor)
  }

  /// Returns the selection if it runs in `direction`, else flips it.
  #[inline]
  #[must_use]
  pub fn with_direction(self, direction: Direction) -> Self {
    if self.direction() == direction {
      self
    } else {
      self.flip()
    }
  }

  #[inline]
  pub fn contains(&self, pos: Position) -> bool {
    self.from() <= pos && pos < self.to()
  }

  /// First and last line touched by the selection, inclusive.
  #[inline]
  #[must_use]
  pub fn line_span(&self) -> (usize, usize) {
    (self.from().line, self.to().line)
  }

  /// Shifts both ends down by `lines`, preserving columns.
  #[must_use]
  pub(crate) fn shifted_down(&self, lines: usize) -> Self {
    Self::new(
      Position::new(self.anchor.line + lines, self.anchor.col),
      Position::new(self.head.line + lines, self.head.col),
    )
  }
}

impl From<(Position, Position)> for Selection {
  fn from(value: (Position, Position)) -> Self {
    Self::new(value.0, value.1)
  }
}
