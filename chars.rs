//! Character classification helpers.
//!
//! Word and letter checks are Unicode-aware. ASCII-only classification is not
//! enough for word-boundary checks: `é` or a combining mark must count as part
//! of a word just like `e` does.

use unicode_general_category::{
  GeneralCategory,
  get_general_category,
};

#[inline]
pub fn char_is_word(ch: char) -> bool {
  ch.is_alphanumeric() || ch == '_'
}

/// A letter or combining mark, the character class used for word-range
/// expansion around a cursor.
#[inline]
pub fn char_is_letter(ch: char) -> bool {
  if ch.is_alphabetic() {
    return true;
  }

  matches!(
    get_general_category(ch),
    GeneralCategory::NonspacingMark
      | GeneralCategory::SpacingMark
      | GeneralCategory::EnclosingMark
  )
}

#[inline]
pub fn char_is_whitespace(ch: char) -> bool {
  ch.is_whitespace()
}
