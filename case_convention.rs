//! Case transforms for selected text.

use crate::Tendril;

/// Words kept lowercase in title case unless they are the first or last word.
pub const LOWERCASE_ARTICLES: &[&str] = &[
  "a", "an", "the", "and", "but", "or", "for", "nor", "as", "at", "by", "in", "of", "on", "to",
  "up",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
  Upper,
  Lower,
  Title,
}

pub fn transform(text: &str, kind: CaseKind) -> Tendril {
  match kind {
    CaseKind::Upper => to_upper_case(text.chars()),
    CaseKind::Lower => to_lower_case(text.chars()),
    CaseKind::Title => to_title_case(text),
  }
}

pub fn to_upper_case(text: impl Iterator<Item = char>) -> Tendril {
  let mut res = Tendril::new();
  text.for_each(|c| res.extend(c.to_uppercase()));
  res
}

pub fn to_lower_case(text: impl Iterator<Item = char>) -> Tendril {
  let mut res = Tendril::new();
  text.for_each(|c| res.extend(c.to_lowercase()));
  res
}

/// Title case: split on whitespace runs (kept verbatim as separators),
/// capitalize each word's first character and lowercase the rest, except
/// words in [`LOWERCASE_ARTICLES`] when they are neither first nor last.
pub fn to_title_case(text: &str) -> Tendril {
  let tokens = tokenize(text);
  let word_count = tokens
    .iter()
    .filter(|token| matches!(token, Token::Word(_)))
    .count();

  let mut res = Tendril::new();
  let mut word_idx = 0;
  for token in tokens {
    match token {
      Token::Separator(run) => res.push_str(run),
      Token::Word(word) => {
        let edge = word_idx == 0 || word_idx + 1 == word_count;
        let lowered = to_lower_case(word.chars());
        if !edge && LOWERCASE_ARTICLES.contains(&lowered.as_str()) {
          res.push_str(&lowered);
        } else {
          let mut chars = word.chars();
          if let Some(first) = chars.next() {
            res.extend(first.to_uppercase());
            res.push_str(&to_lower_case(chars));
          }
        }
        word_idx += 1;
      },
    }
  }
  res
}

enum Token<'a> {
  Word(&'a str),
  Separator(&'a str),
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
  let mut tokens = Vec::new();
  let mut rest = text;
  while !rest.is_empty() {
    let in_separator = rest
      .chars()
      .next()
      .map(char::is_whitespace)
      .unwrap_or(false);
    let end = rest
      .char_indices()
      .find(|(_, ch)| ch.is_whitespace() != in_separator)
      .map(|(idx, _)| idx)
      .unwrap_or(rest.len());
    let (run, tail) = rest.split_at(end);
    tokens.push(if in_separator {
      Token::Separator(run)
    } else {
      Token::Word(run)
    });
    rest = tail;
  }
  tokens
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn upper_and_lower_are_unicode_aware() {
    assert_eq!(to_upper_case("café".chars()).as_str(), "CAFÉ");
    assert_eq!(to_lower_case("STRAßE".chars()).as_str(), "straße");
  }

  #[test]
  fn title_case_capitalizes_words() {
    assert_eq!(
      to_title_case("lorem ipsum DOLOR sit").as_str(),
      "Lorem Ipsum Dolor Sit"
    );
  }

  #[test]
  fn title_case_lowers_inner_articles() {
    assert_eq!(
      to_title_case("the fall of the house of usher").as_str(),
      "The Fall of the House of Usher"
    );
  }

  #[test]
  fn title_case_keeps_edge_articles_capitalized() {
    // First and last words stay capitalized even when they are articles.
    assert_eq!(to_title_case("of mice and men of").as_str(), "Of Mice and Men Of");
  }

  #[test]
  fn title_case_preserves_whitespace_runs() {
    assert_eq!(
      to_title_case("lorem \t ipsum  dolor").as_str(),
      "Lorem \t Ipsum  Dolor"
    );
    assert_eq!(to_title_case("  lorem  ").as_str(), "  Lorem  ");
  }
}
