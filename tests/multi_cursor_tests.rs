//! End-to-end multi-cursor runs: actions fanned out through the orchestrator
//! and landed on the ropey-backed reference buffer.

use cursormux::{
  actions,
  case_convention::CaseKind,
  host::{
    Buffer,
    CommitCapability,
    HostSurface,
  },
  orchestrator::{
    Options,
    for_each_selection,
  },
  position::Position,
  selection::Selection,
};

const LOREM: &str = "\
Lorem ipsum dolor sit amet
consectetur adipiscing elit
sed do eiusmod tempor
incididunt ut labore
et dolore magna aliqua
ut enim ad minim
veniam quis nostrud";

fn pos(line: usize, col: usize) -> Position {
  Position::new(line, col)
}

fn cursor(line: usize, col: usize) -> Selection {
  Selection::cursor(pos(line, col))
}

/// Four cursors, one of them a multi-line selection and two sharing a line,
/// each get their own blank line.
#[test]
fn four_cursor_insert_line_above() {
  let mut doc = Buffer::from_str(LOREM);
  doc.set_selections(vec![
    cursor(0, 6),
    Selection::new(pos(1, 2), pos(2, 3)),
    cursor(4, 0),
    cursor(4, 5),
  ]);

  for_each_selection(&mut doc, &Options::default(), |doc, sel, _| {
    actions::insert_line_above(doc, sel)
  })
  .unwrap();

  let text = doc.to_string();
  let lines: Vec<&str> = text.split('\n').collect();
  assert_eq!(lines.len(), 11);
  for (idx, line) in lines.iter().enumerate() {
    let expect_blank = matches!(idx, 0 | 3 | 6 | 7);
    assert_eq!(line.is_empty(), expect_blank, "line {idx}: {line:?}");
  }
  assert_eq!(doc.selections(), vec![
    cursor(0, 0),
    cursor(3, 0),
    cursor(6, 0),
    cursor(7, 0),
  ]);
}

/// With same-line repetition off, only the first cursor per line acts; the
/// rest keep their columns and ride the shifts.
#[test]
fn same_line_dedup_runs_once_per_line() {
  let mut doc = Buffer::from_str(LOREM);
  doc.set_selections(vec![
    cursor(0, 6),
    Selection::new(pos(1, 2), pos(2, 3)),
    cursor(4, 0),
    cursor(4, 5),
  ]);

  let options = Options {
    repeat_same_line_actions: false,
  };
  for_each_selection(&mut doc, &options, |doc, sel, _| {
    actions::insert_line_above(doc, sel)
  })
  .unwrap();

  let text = doc.to_string();
  assert_eq!(text.split('\n').count(), 10);
  assert_eq!(doc.selections(), vec![
    cursor(0, 0),
    cursor(3, 0),
    cursor(6, 0),
    cursor(7, 5),
  ]);
}

#[test]
fn multi_cursor_insert_below_inherits_each_indent() {
  let mut doc = Buffer::from_str("fn lorem() {\n    ipsum;\n}");
  doc.set_selections(vec![cursor(0, 3), cursor(1, 6)]);

  for_each_selection(&mut doc, &Options::default(), |doc, sel, _| {
    actions::insert_line_below(doc, sel)
  })
  .unwrap();

  assert_eq!(doc.to_string(), "fn lorem() {\n\n    ipsum;\n    \n}");
  assert_eq!(doc.selections(), vec![cursor(1, 0), cursor(3, 4)]);
}

/// Adjacent line deletions collapse onto a single merged cursor.
#[test]
fn multi_cursor_delete_lines_merges_coincident_cursors() {
  let mut doc = Buffer::from_str("Lorem\nipsum\ndolor\namet");
  doc.set_selections(vec![cursor(1, 3), cursor(2, 1)]);

  for_each_selection(&mut doc, &Options::default(), |doc, sel, _| {
    actions::delete_selected_lines(doc, sel)
  })
  .unwrap();

  assert_eq!(doc.to_string(), "Lorem\namet");
  assert_eq!(doc.selections(), vec![cursor(1, 0)]);
}

#[test]
fn multi_cursor_join_lines() {
  let mut doc = Buffer::from_str("Lorem\n  ipsum\ndolor\n  amet");
  doc.set_selections(vec![cursor(0, 0), cursor(2, 0)]);

  for_each_selection(&mut doc, &Options::default(), |doc, sel, _| {
    actions::join_lines(doc, sel)
  })
  .unwrap();

  assert_eq!(doc.to_string(), "Lorem ipsum\ndolor amet");
  assert_eq!(doc.selections(), vec![cursor(0, 5), cursor(1, 5)]);
}

#[test]
fn multi_cursor_copy_line_down() {
  let mut doc = Buffer::from_str("Lorem\nipsum\ndolor");
  doc.set_selections(vec![cursor(0, 2), cursor(2, 1)]);

  for_each_selection(&mut doc, &Options::default(), |doc, sel, _| {
    actions::copy_line(doc, sel, actions::CopyDirection::Down)
  })
  .unwrap();

  assert_eq!(doc.to_string(), "Lorem\nLorem\nipsum\ndolor\ndolor");
  assert_eq!(doc.selections(), vec![cursor(1, 2), cursor(4, 1)]);
}

/// Select every occurrence of a word, then uppercase them all in one pass.
#[test]
fn select_all_then_transform_case() {
  let mut doc = Buffer::from_str("cat category cat\ndog cat");
  doc.set_selections(vec![cursor(0, 1)]);

  actions::select_all_occurrences(&mut doc, false);
  assert_eq!(doc.selections().len(), 3);

  for_each_selection(&mut doc, &Options::default(), |doc, sel, _| {
    actions::transform_case(doc, sel, CaseKind::Upper)
  })
  .unwrap();

  assert_eq!(doc.to_string(), "CAT category CAT\ndog CAT");
}

/// The sequential fallback produces the same document and cursors as the
/// transactional path.
#[test]
fn grouped_edits_fallback_matches_transactional_path() {
  let run = |capability| {
    let mut doc = Buffer::from_str(LOREM).with_capability(capability);
    doc.set_selections(vec![cursor(0, 6), cursor(2, 3), cursor(4, 0)]);
    for_each_selection(&mut doc, &Options::default(), |doc, sel, _| {
      actions::insert_line_above(doc, sel)
    })
    .unwrap();
    (doc.to_string(), doc.selections())
  };

  let transactional = run(CommitCapability::Transactions);
  assert_eq!(run(CommitCapability::GroupedEdits), transactional);
  assert_eq!(run(CommitCapability::PlainEdits), transactional);
}

#[test]
fn selection_only_actions_go_through_the_same_pipeline() {
  let mut doc = Buffer::from_str("Lorem (ipsum [dolor]) amet");
  doc.set_selections(vec![cursor(0, 16)]);

  for_each_selection(&mut doc, &Options::default(), |doc, sel, _| {
    actions::expand_to_brackets(doc, sel)
  })
  .unwrap();

  assert_eq!(doc.selections(), vec![Selection::new(pos(0, 14), pos(0, 19))]);
  assert_eq!(doc.to_string(), "Lorem (ipsum [dolor]) amet");
}
