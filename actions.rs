//! The editing-action library.
//!
//! Every action is a pure function `(document, selection, config) ->`
//! [`ActionOutput`]: the edits it wants, in pre-transaction coordinates, plus
//! the selection it wants afterwards. Actions never mutate anything;
//! fan-out across cursors and committing is the
//! [orchestrator](crate::orchestrator)'s job.
//!
//! Boundary conditions clamp and impossible requests (join on the last line,
//! expansion with no delimiter) come back as unchanged-selection no-ops,
//! never as errors; an interactive tool has no business throwing mid-keystroke.
//!
//! Two set-level operations ([`select_next_occurrence`],
//! [`select_all_occurrences`]) act on the whole selection set instead of one
//! selection at a time, so they take the host directly.

use smallvec::{
  SmallVec,
  smallvec,
};

use crate::{
  Tendril,
  case_convention::{
    self,
    CaseKind,
  },
  host::{
    HeadingProvider,
    HostSurface,
    TextSource,
  },
  movement::Direction,
  position::{
    self,
    Position,
    leading_whitespace,
    line_end,
    line_start,
    word_range_at,
  },
  search,
  selection::Selection,
  surround,
  transaction::Edit,
};

/// What a single-selection action wants done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutput {
  pub edits:     SmallVec<[Edit; 1]>,
  /// The selection after the action, adjusted for this action's own edits.
  /// `None` asks the host to derive one from the edit span.
  pub selection: Option<Selection>,
}

impl ActionOutput {
  pub fn new(edits: SmallVec<[Edit; 1]>, selection: Option<Selection>) -> Self {
    Self { edits, selection }
  }

  /// No edits, selection kept as-is.
  pub fn unchanged(selection: Selection) -> Self {
    Self::selection_only(selection)
  }

  /// No edits, only a selection change.
  pub fn selection_only(selection: Selection) -> Self {
    Self {
      edits:     SmallVec::new(),
      selection: Some(selection),
    }
  }

  fn edit(edit: Edit, selection: Selection) -> Self {
    Self {
      edits:     smallvec![edit],
      selection: Some(selection),
    }
  }

  pub fn has_edits(&self) -> bool {
    !self.edits.is_empty()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyDirection {
  Up,
  Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBoundary {
  Start,
  End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingTarget {
  Prev,
  Next,
}

/// Inserts an empty line above the cursor's line; cursor lands on it.
pub fn insert_line_above(
  _doc: &(impl TextSource + ?Sized),
  selection: Selection,
) -> ActionOutput {
  let at = line_start(selection.head.line);
  ActionOutput::edit(Edit::insert(at, "\n"), Selection::cursor(at))
}

/// Inserts a line below the cursor's line, pre-filled with the current line's
/// leading whitespace; cursor lands after the inherited indentation.
pub fn insert_line_below(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
) -> ActionOutput {
  let line = selection.head.line;
  let text = doc.line(line).unwrap_or_default();
  let indent = leading_whitespace(&text);

  let mut inserted = Tendril::from("\n");
  inserted.push_str(indent);

  ActionOutput::edit(
    Edit::insert(line_end(doc, line), inserted),
    Selection::cursor(Position::new(line + 1, indent.chars().count())),
  )
}

/// Removes every line the selection touches.
///
/// When the span ends on the last document line the deletion runs from the
/// end of the previous line instead, so no dangling empty line is left
/// behind. The resulting cursor is derived by the host from the edit span.
pub fn delete_selected_lines(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
) -> ActionOutput {
  let (first, last) = selection.line_span();

  let edit = if last < doc.last_line() {
    Edit::delete(line_start(first), line_start(last + 1))
  } else if first == 0 {
    Edit::delete(Position::zero(), line_end(doc, last))
  } else {
    Edit::delete(line_end(doc, first - 1), line_end(doc, last))
  };

  ActionOutput::new(smallvec![edit], None)
}

/// Deletes from the cursor to the end of its line; at the line end, deletes
/// the line break instead, merging with the next line.
pub fn delete_to_end_of_line(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
) -> ActionOutput {
  let pos = position::clamp(doc, selection.head);
  let end = line_end(doc, pos.line);

  if pos < end {
    return ActionOutput::edit(Edit::delete(pos, end), Selection::cursor(pos));
  }
  if pos.line < doc.last_line() {
    return ActionOutput::edit(
      Edit::delete(pos, line_start(pos.line + 1)),
      Selection::cursor(pos),
    );
  }
  ActionOutput::unchanged(selection)
}

/// Appends the next line (leading whitespace trimmed) to the cursor's line,
/// separated by a single space unless the next line is blank. The cursor
/// stays at the former end of the line.
pub fn join_lines(doc: &(impl TextSource + ?Sized), selection: Selection) -> ActionOutput {
  let line = selection.head.line;
  if line >= doc.last_line() {
    return ActionOutput::unchanged(selection);
  }

  let next = doc.line(line + 1).unwrap_or_default();
  let trimmed = next.trim_start();
  let seam = line_end(doc, line);

  let (to, separator) = if trimmed.is_empty() {
    (line_end(doc, line + 1), "")
  } else {
    let indent_chars = next.chars().count() - trimmed.chars().count();
    (Position::new(line + 1, indent_chars), " ")
  };

  ActionOutput::edit(Edit::replace(seam, to, separator), Selection::cursor(seam))
}

/// Duplicates the full text of every selected line, inserting the copy above
/// or below the block.
///
/// Upward copies keep the selection where it is (it now covers the copy);
/// downward copies move it onto the duplicate, same columns.
pub fn copy_line(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
  direction: CopyDirection,
) -> ActionOutput {
  let (first, last) = selection.line_span();
  let count = last - first + 1;

  let mut block = String::new();
  for idx in first..=last {
    if idx > first {
      block.push('\n');
    }
    if let Some(text) = doc.line(idx) {
      block.push_str(&text);
    }
  }

  match direction {
    CopyDirection::Up => {
      let mut text = Tendril::from(block.as_str());
      text.push('\n');
      ActionOutput::edit(Edit::insert(line_start(first), text), selection)
    },
    CopyDirection::Down => {
      let mut text = Tendril::from("\n");
      text.push_str(&block);
      ActionOutput::edit(
        Edit::insert(line_end(doc, last), text),
        selection.shifted_down(count),
      )
    },
  }
}

/// Expands an empty selection to the enclosing word; non-empty selections
/// are left alone.
pub fn select_word(doc: &(impl TextSource + ?Sized), selection: Selection) -> ActionOutput {
  if !selection.is_empty() {
    return ActionOutput::unchanged(selection);
  }

  let pos = position::clamp(doc, selection.head);
  match doc.line(pos.line) {
    Some(text) => ActionOutput::selection_only(word_range_at(pos, &text)),
    None => ActionOutput::unchanged(selection),
  }
}

/// Expands the selection to whole lines: from the start of the first selected
/// line to the start of the line after the last. Repeated invocation with an
/// already line-wise selection grows it by one more line. At the document end
/// the selection stops at the end of the last line.
pub fn select_line(doc: &(impl TextSource + ?Sized), selection: Selection) -> ActionOutput {
  let (first, last) = selection.line_span();

  let head = if last >= doc.last_line() {
    line_end(doc, doc.last_line())
  } else {
    line_start(last + 1)
  };

  ActionOutput::selection_only(Selection::new(line_start(first), head))
}

/// Case-transforms the selection (or the enclosing word at a bare cursor) and
/// restores the original selection afterwards, so the visual position is
/// preserved even though the content changed.
pub fn transform_case(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
  kind: CaseKind,
) -> ActionOutput {
  let target = if selection.is_empty() {
    let pos = position::clamp(doc, selection.head);
    match doc.line(pos.line) {
      Some(text) => word_range_at(pos, &text),
      None => selection,
    }
  } else {
    selection
  };

  if target.is_empty() {
    return ActionOutput::unchanged(selection);
  }

  let original = doc.text_in_range(target.from(), target.to());
  let replaced = case_convention::transform(&original, kind);

  ActionOutput::new(
    smallvec![Edit::replace(target.from(), target.to(), replaced)],
    Some(selection),
  )
}

/// Expands to the contents of the nearest surrounding bracket pair; silently
/// keeps the selection when either delimiter is missing.
pub fn expand_to_brackets(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
) -> ActionOutput {
  match surround::expand_to_brackets(doc, selection) {
    Some(expanded) => ActionOutput::selection_only(expanded),
    None => ActionOutput::unchanged(selection),
  }
}

/// Expands to the contents of the nearest surrounding quote pair; silently
/// keeps the selection when either delimiter is missing.
pub fn expand_to_quotes(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
) -> ActionOutput {
  match surround::expand_to_quotes(doc, selection) {
    Some(expanded) => ActionOutput::selection_only(expanded),
    None => ActionOutput::unchanged(selection),
  }
}

/// Moves the cursor one line up or down, clamped at the document edges; the
/// column sticks as far as the target line allows.
pub fn navigate_line(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
  direction: Direction,
) -> ActionOutput {
  let head = selection.head;
  let line = match direction {
    Direction::Backward => head.line.saturating_sub(1),
    Direction::Forward => (head.line + 1).min(doc.last_line()),
  };
  let col = head.col.min(doc.line_len(line));
  ActionOutput::selection_only(Selection::cursor(Position::new(line, col)))
}

/// Moves the cursor one character cell, wrapping across line boundaries but
/// never past the absolute document start or end.
pub fn move_cursor(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
  direction: Direction,
) -> ActionOutput {
  let pos = position::clamp(doc, selection.head);
  let moved = match direction {
    Direction::Forward => position::next_position(doc, pos),
    Direction::Backward => position::prev_position(doc, pos),
  };
  ActionOutput::selection_only(Selection::cursor(moved.unwrap_or(pos)))
}

/// Moves the cursor to the start or end of its line.
pub fn go_to_line_boundary(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
  boundary: LineBoundary,
) -> ActionOutput {
  let line = selection.head.line.min(doc.last_line());
  let pos = match boundary {
    LineBoundary::Start => line_start(line),
    LineBoundary::End => line_end(doc, line),
  };
  ActionOutput::selection_only(Selection::cursor(pos))
}

/// Moves the cursor to the previous or next heading, as reported by the
/// host's metadata collaborator. No-op when there is none in that direction.
pub fn go_to_heading(
  doc: &(impl TextSource + ?Sized),
  provider: &(impl HeadingProvider + ?Sized),
  selection: Selection,
  target: HeadingTarget,
) -> ActionOutput {
  let headings = provider.headings();
  let line = selection.head.line;

  let found = match target {
    HeadingTarget::Prev => headings
      .iter()
      .filter(|heading| heading.start.line < line)
      .next_back(),
    HeadingTarget::Next => headings.iter().find(|heading| heading.start.line > line),
  };

  match found {
    Some(heading) => {
      ActionOutput::selection_only(Selection::cursor(position::clamp(doc, heading.end)))
    },
    None => ActionOutput::unchanged(selection),
  }
}

/// Extends the selection set with the next occurrence of the primary
/// selection's text, wrapping around the document and skipping occurrences
/// that are already selected. A bare cursor grows into its enclosing word
/// first.
pub fn select_next_occurrence<H: HostSurface>(host: &mut H, search_within_words: bool) {
  let mut selections = host.selections();
  let Some(primary) = selections.last().copied() else {
    return;
  };

  if primary.is_empty() {
    let pos = position::clamp(&*host, primary.head);
    let Some(text) = host.line(pos.line) else {
      return;
    };
    let word = word_range_at(pos, &text);
    if word.is_empty() {
      return;
    }
    let last = selections.len() - 1;
    selections[last] = word;
    host.set_selections(selections);
    return;
  }

  let query = host.text_in_range(primary.from(), primary.to());
  if query.is_empty() || query.contains('\n') {
    return;
  }

  let Some(found) =
    search::find_next_match_offset(&*host, &selections, primary.from(), &query, search_within_words)
  else {
    return;
  };

  let span = Selection::new(
    host.offset_to_pos(found.offset),
    host.offset_to_pos(found.end()),
  );
  if !selections.contains(&span) {
    selections.push(span);
    host.set_selections(selections);
  }
}

/// Replaces the selection set with every occurrence of the primary
/// selection's text (or of the enclosing word at a bare cursor).
pub fn select_all_occurrences<H: HostSurface>(host: &mut H, search_within_words: bool) {
  let selections = host.selections();
  let Some(primary) = selections.last().copied() else {
    return;
  };

  let target = if primary.is_empty() {
    let pos = position::clamp(&*host, primary.head);
    match host.line(pos.line) {
      Some(text) => word_range_at(pos, &text),
      None => return,
    }
  } else {
    primary
  };
  if target.is_empty() {
    return;
  }

  let query = host.text_in_range(target.from(), target.to());
  if query.is_empty() || query.contains('\n') {
    return;
  }

  let spans = search::find_all_match_positions(&*host, &query, search_within_words);
  if !spans.is_empty() {
    host.set_selections(spans);
  }
}
