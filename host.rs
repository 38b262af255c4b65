//! The host editing surface.
//!
//! Everything in this crate runs against an external editor through two
//! traits: [`TextSource`] for read-only line/offset addressing and
//! [`HostSurface`] for selection management and mutation. A real embedding
//! implements these over its editor widget; [`Buffer`] is a ropey-backed
//! reference implementation used by the tests and by embedders that have no
//! editor surface of their own.
//!
//! # Commit semantics
//!
//! [`HostSurface::commit`] receives a [`Transaction`] whose edits are all in
//! pre-commit coordinates (see [`crate::transaction`]). A committing host must
//! apply edits in increasing position order, remapping each through the edits
//! already applied, and must remap every group's resulting selection through
//! every *other* earlier group. `Buffer::commit` is the reference for that
//! remapping. Hosts that cannot commit atomically advertise a coarser
//! [`CommitCapability`] and the orchestrator falls back to sequential
//! application.

use std::{
  borrow::Cow,
  fmt,
};

use ropey::Rope;

use crate::{
  position::{
    self,
    Position,
  },
  selection::Selection,
  transaction::{
    self,
    Edit,
    Transaction,
    TransactionError,
    map_position,
  },
};

/// How atomically a host can take a batch of changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitCapability {
  /// Full atomic transactions: one commit, one undo step.
  Transactions,
  /// No atomic commit, but sequential edits can be bracketed into one undo
  /// group via `begin_group`/`end_group`.
  GroupedEdits,
  /// Plain sequential edits only; undo granularity is per edit.
  PlainEdits,
}

/// Read-only line/offset addressing over the document.
///
/// Lines exclude their line ending. Offsets are character offsets with line
/// endings counting one character.
pub trait TextSource {
  fn line_count(&self) -> usize;

  /// Text of line `idx`, or `None` past the last line.
  fn line(&self, idx: usize) -> Option<Cow<'_, str>>;

  fn last_line(&self) -> usize {
    self.line_count().saturating_sub(1)
  }

  fn line_len(&self, idx: usize) -> usize {
    self.line(idx).map(|text| text.chars().count()).unwrap_or(0)
  }

  /// The whole document.
  fn content(&self) -> String {
    let mut out = String::new();
    for idx in 0..self.line_count() {
      if idx > 0 {
        out.push('\n');
      }
      if let Some(text) = self.line(idx) {
        out.push_str(&text);
      }
    }
    out
  }

  fn pos_to_offset(&self, pos: Position) -> usize {
    let line = pos.line.min(self.last_line());
    let mut offset = 0;
    for idx in 0..line {
      offset += self.line_len(idx) + 1;
    }
    offset + pos.col.min(self.line_len(line))
  }

  fn offset_to_pos(&self, offset: usize) -> Position {
    let mut remaining = offset;
    for idx in 0..self.line_count() {
      let len = self.line_len(idx);
      if remaining <= len {
        return Position::new(idx, remaining);
      }
      remaining -= len + 1;
    }
    Position::new(self.last_line(), self.line_len(self.last_line()))
  }

  /// Text of the span `[from, to)`, clamped to the document.
  fn text_in_range(&self, from: Position, to: Position) -> String {
    let from = position::clamp(self, from);
    let to = position::clamp(self, to);
    if to <= from {
      return String::new();
    }

    if from.line == to.line {
      return self
        .line(from.line)
        .map(|text| position::char_slice(&text, from.col, to.col).into_owned())
        .unwrap_or_default();
    }

    let mut out = String::new();
    if let Some(text) = self.line(from.line) {
      out.push_str(&position::char_slice(&text, from.col, text.chars().count()));
    }
    for idx in from.line + 1..to.line {
      out.push('\n');
      if let Some(text) = self.line(idx) {
        out.push_str(&text);
      }
    }
    out.push('\n');
    if let Some(text) = self.line(to.line) {
      out.push_str(&position::char_slice(&text, 0, to.col));
    }
    out
  }
}

/// Mutating host surface: live selections, range replacement, commits.
pub trait HostSurface: TextSource {
  /// Current selections, order-significant and live: reflects the latest
  /// mutations, which is what the orchestrator re-reads every iteration.
  fn selections(&self) -> Vec<Selection>;

  fn set_selections(&mut self, selections: Vec<Selection>);

  /// Replaces `[from, to)` with `text`, remapping live selections.
  fn replace_range(&mut self, from: Position, to: Position, text: &str);

  fn capability(&self) -> CommitCapability;

  /// Atomically applies a transaction and installs its selections.
  fn commit(&mut self, tx: Transaction) -> transaction::Result<()>;

  /// Brackets a run of sequential edits into one undo step, on hosts that
  /// support it. Default is a no-op.
  fn begin_group(&mut self) {}
  fn end_group(&mut self) {}
}

/// A heading's span as reported by the host's metadata collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingSpan {
  pub start: Position,
  pub end:   Position,
}

/// Read-only heading lookup for the active document. The host app owns the
/// metadata; this crate only consumes it.
pub trait HeadingProvider {
  fn headings(&self) -> Vec<HeadingSpan>;
}

impl HeadingProvider for [HeadingSpan] {
  fn headings(&self) -> Vec<HeadingSpan> {
    self.to_vec()
  }
}

impl HeadingProvider for Vec<HeadingSpan> {
  fn headings(&self) -> Vec<HeadingSpan> {
    self.clone()
  }
}

/// Ropey-backed reference host.
///
/// Coincident cursors collapse after mutations, the way host editors merge
/// overlapping selections; this is what makes selections "disappear"
/// mid-iteration for the orchestrator's missing-selection skip path.
#[derive(Debug, Clone)]
pub struct Buffer {
  text:       Rope,
  selections: Vec<Selection>,
  capability: CommitCapability,
}

impl Buffer {
  pub fn from_str(text: &str) -> Self {
    Self {
      text:       Rope::from_str(text),
      selections: vec![Selection::cursor(Position::zero())],
      capability: CommitCapability::Transactions,
    }
  }

  /// Same buffer, advertising a degraded commit capability. Used to exercise
  /// the orchestrator's fallback paths.
  #[must_use]
  pub fn with_capability(mut self, capability: CommitCapability) -> Self {
    self.capability = capability;
    self
  }

  /// Char span of line `idx`, excluding the line ending.
  fn line_bounds(&self, idx: usize) -> (usize, usize) {
    let start = self.text.line_to_char(idx);
    let mut end = if idx + 1 < self.text.len_lines() {
      self.text.line_to_char(idx + 1)
    } else {
      self.text.len_chars()
    };
    if end > start && self.text.char(end - 1) == '\n' {
      end -= 1;
      if end > start && self.text.char(end - 1) == '\r' {
        end -= 1;
      }
    }
    (start, end)
  }

  fn char_idx(&self, pos: Position) -> usize {
    let line = pos.line.min(self.last_line());
    let (start, end) = self.line_bounds(line);
    (start + pos.col).min(end)
  }

  fn apply_edit(&mut self, edit: &Edit) {
    let from = self.char_idx(edit.from);
    let to = self.char_idx(edit.to).max(from);
    if to > from {
      self.text.remove(from..to);
    }
    if !edit.text.is_empty() {
      self.text.insert(from, &edit.text);
    }
  }

  fn clamp(&self, sel: Selection) -> Selection {
    Selection::new(
      position::clamp(self, sel.anchor),
      position::clamp(self, sel.head),
    )
  }

  /// Collapses runs of identical selections, the way a host editor merges
  /// cursors that ended up on top of each other.
  fn merge_coincident(selections: &mut Vec<Selection>) {
    selections.dedup();
  }
}

impl fmt::Display for Buffer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.text)
  }
}

impl TextSource for Buffer {
  fn line_count(&self) -> usize {
    self.text.len_lines()
  }

  fn line(&self, idx: usize) -> Option<Cow<'_, str>> {
    if idx >= self.text.len_lines() {
      return None;
    }
    let (start, end) = self.line_bounds(idx);
    Some(Cow::from(self.text.slice(start..end)))
  }

  fn line_len(&self, idx: usize) -> usize {
    if idx >= self.text.len_lines() {
      return 0;
    }
    let (start, end) = self.line_bounds(idx);
    end - start
  }

  fn content(&self) -> String {
    self.text.to_string()
  }

  fn pos_to_offset(&self, pos: Position) -> usize {
    self.char_idx(pos)
  }

  fn offset_to_pos(&self, offset: usize) -> Position {
    let offset = offset.min(self.text.len_chars());
    let line = self.text.char_to_line(offset);
    Position::new(line, offset - self.text.line_to_char(line))
  }
}

impl HostSurface for Buffer {
  fn selections(&self) -> Vec<Selection> {
    self.selections.clone()
  }

  fn set_selections(&mut self, selections: Vec<Selection>) {
    self.selections = selections
      .into_iter()
      .map(|sel| self.clamp(sel))
      .collect();
  }

  fn replace_range(&mut self, from: Position, to: Position, text: &str) {
    let (from, to) = if to < from { (to, from) } else { (from, to) };
    let edit = Edit::replace(from, to, text);
    self.apply_edit(&edit);

    for sel in &mut self.selections {
      sel.anchor = map_position(sel.anchor, &edit);
      sel.head = map_position(sel.head, &edit);
    }
    let mut selections = std::mem::take(&mut self.selections);
    for sel in &mut selections {
      *sel = self.clamp(*sel);
    }
    Self::merge_coincident(&mut selections);
    self.selections = selections;
  }

  fn capability(&self) -> CommitCapability {
    self.capability
  }

  fn commit(&mut self, tx: Transaction) -> transaction::Result<()> {
    tx.validate()?;
    let lines = self.line_count();
    for edit in tx.edits() {
      if edit.to.line >= lines {
        return Err(TransactionError::RangeOutOfBounds { to: edit.to, lines });
      }
    }

    let old_selections = std::mem::take(&mut self.selections);
    let groups = tx.into_groups();

    // Apply groups in increasing position order; ties keep group order so
    // same-point insertions from multiple cursors stack predictably.
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by_key(|&idx| {
      groups[idx]
        .edits
        .first()
        .map(|edit| edit.from)
        .unwrap_or(Position::new(usize::MAX, usize::MAX))
    });

    let mut applied: Vec<Edit> = Vec::new();
    let mut results: Vec<Option<Selection>> = vec![None; groups.len()];

    for &group_idx in &order {
      let group = &groups[group_idx];
      let foreign = applied.len();

      // The group's selection already accounts for its own edits; remap it
      // only through the foreign edits applied before this group.
      let mapped = group.selection.map(|sel| {
        let mut sel = sel;
        for edit in &applied[..foreign] {
          sel.anchor = map_position(sel.anchor, edit);
          sel.head = map_position(sel.head, edit);
        }
        sel
      });

      let mut derived = None;
      for edit in &group.edits {
        let mut adjusted = edit.clone();
        for prev in &applied {
          adjusted.from = map_position(adjusted.from, prev);
          adjusted.to = map_position(adjusted.to, prev);
        }
        if derived.is_none() {
          derived = Some(Selection::cursor(adjusted.from));
        }
        self.apply_edit(&adjusted);
        applied.push(adjusted);
      }

      results[group_idx] = mapped.or(derived);
    }

    let mut selections: Vec<Selection> = results
      .iter()
      .enumerate()
      .filter_map(|(idx, result)| result.or_else(|| old_selections.get(idx).copied()))
      .map(|sel| self.clamp(sel))
      .collect();
    Self::merge_coincident(&mut selections);

    if selections.is_empty() {
      self.selections = old_selections
        .into_iter()
        .map(|sel| self.clamp(sel))
        .collect();
    } else {
      self.selections = selections;
    }
    Ok(())
  }
}
