//! Extraction of the token under the cursor.
//!
//! Positions are char indices into the query. A cursor sitting right after a
//! word (on a delimiter or at the end of the text) resolves to that word, so
//! `"t:pre|"` yields `t:pre` with the narrow set and `pre` with the extended
//! set.
//!
//! # Examples
//!
//! ```ignore
//! use the_search_lib::tokenizer::{token_at_cursor, Delimiters};
//!
//! let token = token_at_cursor("t:pre", 5, Delimiters::Extended);
//! assert_eq!(token.text, "pre");
//! assert_eq!((token.start, token.end), (2, 5));
//! ```

use std::ops::Range;

pub use the_search_core::chars::Delimiters;
use the_search_core::chars::char_is_word;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
  pub text:  String,
  /// Char index of the first token char.
  pub start: usize,
  /// Char index one past the last token char.
  pub end:   usize,
}

impl Token {
  fn empty(at: usize) -> Self {
    Self {
      text:  String::new(),
      start: at,
      end:   at,
    }
  }

  pub fn range(&self) -> Range<usize> {
    self.start..self.end
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }
}

/// Token under `cursor` delimited by one of the two delimiter sets.
pub fn token_at_cursor(text: &str, cursor: usize, delimiters: Delimiters) -> Token {
  token_at_cursor_by(text, cursor, |ch| delimiters.contains(ch))
}

/// Identifier under `cursor`: breaks on anything that is not alphanumeric or `_`.
pub fn word_at_cursor(text: &str, cursor: usize) -> Token {
  token_at_cursor_by(text, cursor, |ch| !char_is_word(ch))
}

/// Token under `cursor` where `is_delimiter` decides where tokens break.
pub fn token_at_cursor_by<F>(text: &str, cursor: usize, is_delimiter: F) -> Token
where
  F: Fn(char) -> bool,
{
  let chars: Vec<char> = text.chars().collect();
  let len = chars.len();
  let cursor = cursor.min(len);
  if len == 0 {
    return Token::empty(cursor);
  }

  let pos = if cursor == len || is_delimiter(chars[cursor]) {
    cursor.saturating_sub(1)
  } else {
    cursor
  };

  // Cursor is between two delimiters.
  if is_delimiter(chars[pos]) {
    return Token::empty(cursor);
  }

  let start = chars[..pos]
    .iter()
    .rposition(|&ch| is_delimiter(ch))
    .map_or(0, |idx| idx + 1);
  let end = chars[pos..]
    .iter()
    .position(|&ch| is_delimiter(ch))
    .map_or(len, |idx| pos + idx);

  Token {
    text: chars[start..end].iter().collect(),
    start,
    end,
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn narrow(text: &str, cursor: usize) -> (String, usize, usize) {
    let token = token_at_cursor(text, cursor, Delimiters::Narrow);
    (token.text, token.start, token.end)
  }

  fn extended(text: &str, cursor: usize) -> (String, usize, usize) {
    let token = token_at_cursor(text, cursor, Delimiters::Extended);
    (token.text, token.start, token.end)
  }

  #[test]
  fn empty_text() {
    assert_eq!(narrow("", 0), (String::new(), 0, 0));
    // out of range cursor is clamped
    assert_eq!(narrow("", 7), (String::new(), 0, 0));
  }

  #[test]
  fn cursor_at_end_resolves_previous_word() {
    assert_eq!(narrow("foo bar", 7), ("bar".into(), 4, 7));
    assert_eq!(narrow("foo bar", 100), ("bar".into(), 4, 7));
  }

  #[test]
  fn cursor_on_delimiter_resolves_previous_word() {
    assert_eq!(narrow("foo bar", 3), ("foo".into(), 0, 3));
  }

  #[test]
  fn cursor_inside_word() {
    assert_eq!(narrow("foo bar baz", 5), ("bar".into(), 4, 7));
    assert_eq!(narrow("foo bar baz", 0), ("foo".into(), 0, 3));
  }

  #[test]
  fn cursor_between_delimiters_is_empty() {
    assert_eq!(narrow("foo  bar", 4), (String::new(), 4, 4));
    assert_eq!(narrow(" foo", 0), (String::new(), 0, 0));
  }

  #[test]
  fn filter_prefix_split_only_by_extended_set() {
    assert_eq!(narrow("t:pre", 5), ("t:pre".into(), 0, 5));
    assert_eq!(extended("t:pre", 5), ("pre".into(), 2, 5));
    assert_eq!(extended("a t:", 4), (String::new(), 4, 4));
    assert_eq!(narrow("a t:", 4), ("t:".into(), 2, 4));
  }

  #[test]
  fn braces_and_equals_break_both_sets() {
    assert_eq!(narrow("{a,b}", 2), ("a".into(), 1, 2));
    assert_eq!(narrow("size=12", 7), ("12".into(), 5, 7));
    assert_eq!(extended("[x:y]", 4), ("y".into(), 3, 4));
  }

  #[test]
  fn word_ignores_delimiter_sets() {
    let word = word_at_cursor("t:my_asset.prefab", 6);
    assert_eq!(word.text, "my_asset");
    assert_eq!(word.range(), 2..10);

    let word = word_at_cursor("size>=10", 8);
    assert_eq!(word.text, "10");
  }

  #[test]
  fn multibyte_positions_are_char_indices() {
    let token = token_at_cursor("ä ö:ü", 5, Delimiters::Extended);
    assert_eq!(token.text, "ü");
    assert_eq!(token.range(), 4..5);
  }

  quickcheck::quickcheck! {
    fn tokenizer_is_deterministic(text: String, cursor: usize) -> bool {
      token_at_cursor(&text, cursor, Delimiters::Extended)
        == token_at_cursor(&text, cursor, Delimiters::Extended)
    }

    fn token_range_is_well_formed(text: String, cursor: usize) -> bool {
      let token = token_at_cursor(&text, cursor, Delimiters::Narrow);
      let len = text.chars().count();
      token.start <= token.end
        && token.end <= len
        && token.text.chars().count() == token.end - token.start
        && !token.text.chars().any(|ch| Delimiters::Narrow.contains(ch))
    }
  }
}
