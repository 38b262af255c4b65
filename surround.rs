//! Delimiter expansion for selections.
//!
//! Expands a cursor or selection to the span between the nearest surrounding
//! bracket pair or quote pair, delimiters excluded. The backward scan from the
//! anchor finds the nearest *unmatched* opening delimiter (closers seen on the
//! way are counted so their own openers are stepped over); the forward scan
//! from the head takes the first matching closer.
//!
//! Pairing is purely nearest-opening/nearest-closing, not depth-balanced: with
//! nested same-type delimiters the forward scan can stop at an inner closer.
//! That behavior is intentional and kept as-is.

use crate::{
  host::TextSource,
  movement::Direction,
  position::next_position,
  search::find_character,
  selection::Selection,
};

pub const BRACKET_PAIRS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}')];
pub const QUOTE_CHARS: &[char] = &['\'', '"', '`'];

fn open_index(ch: char) -> Option<usize> {
  BRACKET_PAIRS.iter().position(|&(open, _)| open == ch)
}

fn close_index(ch: char) -> Option<usize> {
  BRACKET_PAIRS.iter().position(|&(_, close)| close == ch)
}

fn closing_bracket(open: char) -> char {
  BRACKET_PAIRS
    .iter()
    .find(|&&(o, _)| o == open)
    .map(|&(_, close)| close)
    .unwrap_or(open)
}

/// Expands `selection` to the contents of the nearest surrounding bracket
/// pair. `None` (no selection change) when either delimiter is missing.
pub fn expand_to_brackets(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
) -> Option<Selection> {
  let mut pending = [0usize; BRACKET_PAIRS.len()];
  let (open_pos, open_ch) =
    find_character(doc, selection.anchor, Direction::Backward, |ch: char| {
      if let Some(idx) = close_index(ch) {
        pending[idx] += 1;
        return false;
      }
      if let Some(idx) = open_index(ch) {
        if pending[idx] == 0 {
          return true;
        }
        pending[idx] -= 1;
      }
      false
    })?;

  let close = closing_bracket(open_ch);
  let (close_pos, _) = find_character(doc, selection.head, Direction::Forward, close)?;
  if close_pos <= open_pos {
    return None;
  }

  let start = next_position(doc, open_pos)?;
  Some(Selection::new(start, close_pos))
}

/// Expands `selection` to the contents of the nearest surrounding quote pair
/// (`'`, `"` or `` ` ``). `None` when either delimiter is missing.
pub fn expand_to_quotes(
  doc: &(impl TextSource + ?Sized),
  selection: Selection,
) -> Option<Selection> {
  let (open_pos, quote) =
    find_character(doc, selection.anchor, Direction::Backward, |ch: char| {
      QUOTE_CHARS.contains(&ch)
    })?;

  let (close_pos, _) = find_character(doc, selection.head, Direction::Forward, quote)?;
  if close_pos <= open_pos {
    return None;
  }

  let start = next_position(doc, open_pos)?;
  Some(Selection::new(start, close_pos))
}
