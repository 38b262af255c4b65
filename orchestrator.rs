//! Fan-out of a single-selection action across the whole selection set.
//!
//! [`for_each_selection`] is the one entry point. It snapshots the selection
//! set, runs the action once per selection in snapshot order, and lands the
//! results through whichever commit surface the host offers:
//!
//! - [`CommitCapability::Transactions`]: every output becomes a
//!   [`ChangeGroup`] and the whole batch is committed atomically. The host
//!   resolves all cross-cursor coordinate shifts in one pass.
//! - [`CommitCapability::GroupedEdits`]: edits are applied one at a time
//!   through [`HostSurface::replace_range`], bracketed by
//!   `begin_group`/`end_group` so undo still sees a single step.
//! - [`CommitCapability::PlainEdits`]: same sequential walk, but undo
//!   granularity is whatever the host gives us. We warn once and carry on.
//!
//! On the sequential paths the selection set is re-read from the host every
//! iteration, so each action sees coordinates that already include all
//! earlier cursors' edits. A selection that disappeared mid-run (collapsed
//! into a neighbor by a deletion) is skipped, not an error.

use std::collections::HashSet;

use smallvec::SmallVec;
use tracing::{
  trace,
  warn,
};

use crate::{
  actions::ActionOutput,
  host::{
    CommitCapability,
    HostSurface,
  },
  position,
  selection::Selection,
  transaction::{
    self,
    ChangeGroup,
    Edit,
    Transaction,
    map_position,
  },
};

/// Knobs for a fan-out run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
  /// Run the action for every cursor even when several share a line. When
  /// off, only the first cursor on each line acts; the rest just ride the
  /// resulting coordinate shifts.
  pub repeat_same_line_actions: bool,
}

impl Default for Options {
  fn default() -> Self {
    Self {
      repeat_same_line_actions: true,
    }
  }
}

/// Where the current invocation sits within the fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationCtx {
  /// Zero-based position among the selections that actually run.
  pub index: usize,
  /// How many selections run in this pass.
  pub total: usize,
}

/// Runs `action` once per selection and lands the combined result on the
/// host.
///
/// The action sees the document as it was when its turn came (pre-batch on
/// the transactional path, mid-run on the sequential ones) and must return
/// edits in those coordinates. An empty selection set is a no-op.
pub fn for_each_selection<H, F>(
  host: &mut H,
  options: &Options,
  mut action: F,
) -> transaction::Result<()>
where
  H: HostSurface,
  F: FnMut(&H, Selection, IterationCtx) -> ActionOutput,
{
  let snapshot = host.selections();
  if snapshot.is_empty() {
    return Ok(());
  }

  let picked = pick_indices(&snapshot, options);

  match host.capability() {
    CommitCapability::Transactions => run_batched(host, &snapshot, &picked, &mut action),
    CommitCapability::GroupedEdits => {
      host.begin_group();
      let result = run_sequential(host, &picked, &mut action);
      host.end_group();
      result
    },
    CommitCapability::PlainEdits => {
      warn!("host cannot group edits; multi-cursor undo will be split per edit");
      run_sequential(host, &picked, &mut action)
    },
  }
}

/// Indices of the selections that get to act, in snapshot order.
fn pick_indices(snapshot: &[Selection], options: &Options) -> Vec<usize> {
  if options.repeat_same_line_actions {
    return (0..snapshot.len()).collect();
  }

  let mut seen_lines = HashSet::new();
  (0..snapshot.len())
    .filter(|&idx| seen_lines.insert(snapshot[idx].head.line))
    .collect()
}

fn run_batched<H, F>(
  host: &mut H,
  snapshot: &[Selection],
  picked: &[usize],
  action: &mut F,
) -> transaction::Result<()>
where
  H: HostSurface,
  F: FnMut(&H, Selection, IterationCtx) -> ActionOutput,
{
  let total = picked.len();
  let mut next_slot = 0;
  let mut tx = Transaction::new();

  for (idx, &selection) in snapshot.iter().enumerate() {
    if picked.get(next_slot) != Some(&idx) {
      // Deduplicated cursor: it does not act, but it stays in the set and
      // rides the coordinate shifts of the cursors that do.
      tx.push(ChangeGroup::selection_only(selection));
      continue;
    }

    let ctx = IterationCtx {
      index: next_slot,
      total,
    };
    next_slot += 1;

    let out = action(&*host, selection, ctx);
    trace!(
      cursor = idx,
      edits = out.edits.len(),
      "collected action output"
    );

    let kept = match out.selection {
      Some(sel) => Some(sel),
      // An edit with no selection lets the host derive the cursor; a pure
      // no-op keeps the selection it had.
      None if out.edits.is_empty() => Some(selection),
      None => None,
    };
    tx.push(ChangeGroup::new(out.edits, kept));
  }

  let untouched = !tx.has_edits()
    && tx
      .selections()
      .zip(snapshot)
      .all(|(sel, &orig)| sel == Some(orig));
  if untouched {
    return Ok(());
  }
  host.commit(tx)
}

fn run_sequential<H, F>(
  host: &mut H,
  picked: &[usize],
  action: &mut F,
) -> transaction::Result<()>
where
  H: HostSurface,
  F: FnMut(&H, Selection, IterationCtx) -> ActionOutput,
{
  let total = picked.len();

  for (slot, &idx) in picked.iter().enumerate() {
    // Live re-read: earlier iterations may have moved or removed this
    // cursor.
    let live = host.selections();
    let Some(&selection) = live.get(idx) else {
      trace!(cursor = idx, "selection no longer present, skipping");
      continue;
    };

    let out = action(
      &*host,
      selection,
      IterationCtx { index: slot, total },
    );

    let mut applied: SmallVec<[Edit; 1]> = SmallVec::new();
    for edit in out.edits {
      // Edits within one output share pre-edit coordinates; later ones are
      // mapped through the ones already applied.
      let mut adjusted = edit;
      for prev in &applied {
        adjusted.from = map_position(adjusted.from, prev);
        adjusted.to = map_position(adjusted.to, prev);
      }
      host.replace_range(adjusted.from, adjusted.to, &adjusted.text);
      applied.push(adjusted);
    }

    let landed = match out.selection {
      Some(sel) => Some(sel),
      None => applied
        .first()
        .map(|edit| Selection::cursor(position::clamp(&*host, edit.from))),
    };
    if let Some(sel) = landed {
      let mut live = host.selections();
      if let Some(slot) = live.get_mut(idx) {
        *slot = sel;
        host.set_selections(live);
      }
    }
  }

  Ok(())
}
