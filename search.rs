//! Character and string search.
//!
//! Two engines live here. The character scan ([`find_character`]) walks the
//! document one character cell at a time, wrapping across line boundaries in
//! either direction; it backs delimiter expansion. The string match engine
//! ([`find_all_matches`], [`find_next_match_offset`],
//! [`find_all_match_positions`]) finds literal occurrences of a query,
//! optionally whole-word only.
//!
//! # Word boundaries
//!
//! Whole-word matching checks the characters flanking a candidate match with
//! [`crate::chars::char_is_word`], which is Unicode-aware. A regex `\b` would
//! treat `é` as a boundary and happily match `cat` inside `cafécat`, so
//! boundary checks are explicit rather than delegated to a pattern engine.
//!
//! Matching is deterministic: a pure function of document content and query.
//! No state persists between calls except what callers thread through as the
//! latest match position.

use crate::{
  chars::char_is_word,
  host::TextSource,
  movement::Direction,
  position::Position,
  selection::Selection,
};

/// Trait for matching characters during scan operations.
///
/// Implemented for `char` (exact match) and `FnMut(char) -> bool`
/// (predicates, possibly stateful: delimiter scans count skipped pairs).
pub trait CharMatcher {
  fn char_match(&mut self, ch: char) -> bool;
}

impl CharMatcher for char {
  fn char_match(&mut self, ch: char) -> bool {
    *self == ch
  }
}

impl<F: FnMut(char) -> bool> CharMatcher for F {
  fn char_match(&mut self, ch: char) -> bool {
    (*self)(ch)
  }
}

/// Scans character-by-character from `from`, wrapping across line boundaries,
/// and returns the first matching position and its character.
///
/// Backward: the cell *before* `from` is examined first; at column 0 the scan
/// rolls to the end of the previous line and stops past line 0. Forward: the
/// cell *at* `from` is examined first; at the line end the scan rolls to the
/// start of the next line and stops past the last line. Line endings
/// themselves are never candidates.
pub fn find_character<M: CharMatcher>(
  doc: &(impl TextSource + ?Sized),
  from: Position,
  direction: Direction,
  mut matcher: M,
) -> Option<(Position, char)> {
  match direction {
    Direction::Backward => {
      let mut line = from.line.min(doc.last_line());
      let mut end_col = if line == from.line {
        from.col
      } else {
        doc.line_len(line)
      };

      loop {
        let text = doc.line(line)?;
        let chars: Vec<char> = text.chars().collect();
        let end = end_col.min(chars.len());
        for col in (0..end).rev() {
          if matcher.char_match(chars[col]) {
            return Some((Position::new(line, col), chars[col]));
          }
        }
        if line == 0 {
          return None;
        }
        line -= 1;
        end_col = doc.line_len(line);
      }
    },
    Direction::Forward => {
      let mut line = from.line;
      let mut start_col = from.col;

      while line < doc.line_count() {
        let text = doc.line(line)?;
        for (col, ch) in text.chars().enumerate().skip(start_col) {
          if matcher.char_match(ch) {
            return Some((Position::new(line, col), ch));
          }
        }
        line += 1;
        start_col = 0;
      }
      None
    },
  }
}

/// A literal match: start offset and length, both in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
  pub offset: usize,
  pub len:    usize,
}

impl Match {
  #[inline]
  pub fn end(&self) -> usize {
    self.offset + self.len
  }
}

/// Every occurrence of `query` in `content`: case-sensitive, non-overlapping,
/// left to right. With `search_within_words` false, a match must be flanked
/// by non-word characters or string boundaries on both sides.
pub fn find_all_matches(content: &str, query: &str, search_within_words: bool) -> Vec<Match> {
  if query.is_empty() {
    return Vec::new();
  }

  let query_chars = query.chars().count();
  let mut matches = Vec::new();

  // Incremental byte-to-char offset conversion; match_indices walks left to
  // right, so one forward counter suffices.
  let mut counted_bytes = 0;
  let mut counted_chars = 0;

  for (byte_idx, found) in content.match_indices(query) {
    counted_chars += content[counted_bytes..byte_idx].chars().count();
    counted_bytes = byte_idx;

    if !search_within_words {
      let before = content[..byte_idx].chars().next_back();
      let after = content[byte_idx + found.len()..].chars().next();
      if before.is_some_and(char_is_word) || after.is_some_and(char_is_word) {
        continue;
      }
    }

    matches.push(Match {
      offset: counted_chars,
      len:    query_chars,
    });
  }

  matches
}

/// The first match of `query` strictly after `latest_match_pos`.
///
/// When no later match exists, wraps to the first match whose start offset is
/// not already the start of an active selection, so repeated invocation
/// cycles through all matches before re-visiting selected ones. `None` when
/// the document holds no eligible match at all.
pub fn find_next_match_offset(
  doc: &(impl TextSource + ?Sized),
  selections: &[Selection],
  latest_match_pos: Position,
  query: &str,
  search_within_words: bool,
) -> Option<Match> {
  let content = doc.content();
  let matches = find_all_matches(&content, query, search_within_words);
  let after = doc.pos_to_offset(latest_match_pos);

  if let Some(mat) = matches.iter().find(|mat| mat.offset > after) {
    return Some(*mat);
  }

  let selected: Vec<usize> = selections
    .iter()
    .map(|sel| doc.pos_to_offset(sel.from()))
    .collect();
  matches
    .into_iter()
    .find(|mat| !selected.contains(&mat.offset))
}

/// Every match of `query`, as anchor/head spans in position space.
pub fn find_all_match_positions(
  doc: &(impl TextSource + ?Sized),
  query: &str,
  search_within_words: bool,
) -> Vec<Selection> {
  let content = doc.content();
  find_all_matches(&content, query, search_within_words)
    .into_iter()
    .map(|mat| {
      Selection::new(
        doc.offset_to_pos(mat.offset),
        doc.offset_to_pos(mat.end()),
      )
    })
    .collect()
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::host::Buffer;

  #[test]
  fn find_character_forward_wraps_lines() {
    let doc = Buffer::from_str("lorem\nipsum q");
    let hit = find_character(&doc, Position::new(0, 3), Direction::Forward, 'q');
    assert_eq!(hit, Some((Position::new(1, 6), 'q')));
  }

  #[test]
  fn find_character_backward_wraps_lines() {
    let doc = Buffer::from_str("lorem(\nipsum");
    let hit = find_character(&doc, Position::new(1, 3), Direction::Backward, '(');
    assert_eq!(hit, Some((Position::new(0, 5), '(')));
  }

  #[test]
  fn find_character_backward_excludes_start_cell() {
    let doc = Buffer::from_str("abc");
    // Cell at the start position is not a candidate going backward.
    let hit = find_character(&doc, Position::new(0, 2), Direction::Backward, 'c');
    assert_eq!(hit, None);
  }

  #[test]
  fn find_character_respects_document_bounds() {
    let doc = Buffer::from_str("ab\ncd");
    assert_eq!(
      find_character(&doc, Position::new(0, 0), Direction::Backward, 'x'),
      None
    );
    assert_eq!(
      find_character(&doc, Position::new(1, 2), Direction::Forward, 'x'),
      None
    );
  }

  #[test]
  fn matches_within_words_by_default_flag() {
    let matches = find_all_matches("category cat concat", "cat", true);
    let offsets: Vec<usize> = matches.iter().map(|mat| mat.offset).collect();
    assert_eq!(offsets, vec![0, 9, 16]);
  }

  #[test]
  fn whole_word_matching_skips_embedded_occurrences() {
    let matches = find_all_matches("category cat concat", "cat", false);
    let offsets: Vec<usize> = matches.iter().map(|mat| mat.offset).collect();
    assert_eq!(offsets, vec![9]);
  }

  #[test]
  fn whole_word_matching_is_unicode_aware() {
    // `é` is a word character; a plain-ASCII boundary check would match here.
    assert!(find_all_matches("cafécat", "cat", false).is_empty());
    let matches = find_all_matches("café cat", "cat", false);
    assert_eq!(matches, vec![Match { offset: 5, len: 3 }]);
  }

  #[test]
  fn next_match_is_strictly_after_latest() {
    let doc = Buffer::from_str("cat dog cat dog cat");
    let mat = find_next_match_offset(&doc, &[], Position::new(0, 0), "cat", false).unwrap();
    assert_eq!(mat.offset, 8);
  }

  #[test]
  fn next_match_wraps_and_skips_selected_starts() {
    let doc = Buffer::from_str("cat dog cat");
    let selections = [Selection::new(Position::new(0, 8), Position::new(0, 11))];
    // Latest match was the trailing one; wrap must land on the first
    // occurrence because the trailing one is already selected.
    let mat =
      find_next_match_offset(&doc, &selections, Position::new(0, 8), "cat", false).unwrap();
    assert_eq!(mat.offset, 0);
  }

  #[test]
  fn next_match_exhausted_returns_none() {
    let doc = Buffer::from_str("cat");
    let selections = [Selection::new(Position::new(0, 0), Position::new(0, 3))];
    assert_eq!(
      find_next_match_offset(&doc, &selections, Position::new(0, 0), "cat", false),
      None
    );
  }

  #[test]
  fn match_positions_span_lines() {
    let doc = Buffer::from_str("lorem ipsum\ndolor lorem");
    let spans = find_all_match_positions(&doc, "lorem", false);
    assert_eq!(spans, vec![
      Selection::new(Position::new(0, 0), Position::new(0, 5)),
      Selection::new(Position::new(1, 6), Position::new(1, 11)),
    ]);
  }
}
