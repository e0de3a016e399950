//! Inserting a chosen proposition into the query text.
//!
//! The token around the cursor (narrow delimiters) is replaced by the
//! proposition's replacement text. A `\t` inside the replacement marks where
//! the cursor should land and is removed from the result.
//!
//! All positions are char indices.

use the_search_core::chars::{
  Delimiters,
  char_is_word,
};

use crate::proposition::{
  CursorPlacement,
  Proposition,
};

/// Marks the cursor position inside a replacement string.
pub const CURSOR_MARKER: char = '\t';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
  pub text:    String,
  pub cursor:  usize,
  /// False when the text was left untouched.
  pub changed: bool,
}

/// Replaces the token around `cursor` with `replacement`.
///
/// Nothing changes when the token already starts with `replacement`
/// (ignoring case), so accepting what the user already typed does not move
/// the cursor.
pub fn replace_text(text: &str, replacement: &str, cursor: usize) -> Replacement {
  let chars: Vec<char> = text.chars().collect();
  let cursor = cursor.min(chars.len());

  let from = chars[..cursor]
    .iter()
    .rposition(|&ch| Delimiters::Narrow.contains(ch))
    .map_or(0, |idx| idx + 1);
  let to = chars[cursor..]
    .iter()
    .position(|&ch| Delimiters::Narrow.contains(ch))
    .map_or(chars.len(), |idx| cursor + idx);

  let current: String = chars[from..to].iter().collect();
  if current
    .to_lowercase()
    .starts_with(&replacement.to_lowercase())
  {
    return Replacement {
      text: text.to_string(),
      cursor,
      changed: false,
    };
  }

  let mut inserted: Vec<char> = replacement.chars().collect();
  let new_cursor = match inserted.iter().position(|&ch| ch == CURSOR_MARKER) {
    Some(marker) => {
      inserted.remove(marker);
      from + marker
    },
    None => from + inserted.len(),
  };

  let text = chars[..from]
    .iter()
    .chain(inserted.iter())
    .chain(chars[to..].iter())
    .collect();

  Replacement {
    text,
    cursor: new_cursor,
    changed: true,
  }
}

/// Cursor position after applying `placement` at `cursor`.
pub fn apply_cursor_placement(text: &str, cursor: usize, placement: CursorPlacement) -> usize {
  let chars: Vec<char> = text.chars().collect();
  let len = chars.len();
  let mut pos = cursor.min(len);
  let is_word = |idx: usize| char_is_word(chars[idx]);

  match placement {
    CursorPlacement::None | CursorPlacement::MoveAutoComplete => {},
    CursorPlacement::MoveLineEnd => pos = len,
    CursorPlacement::MoveLineStart => pos = 0,
    CursorPlacement::MoveWordLeft => {
      while pos > 0 && !is_word(pos - 1) {
        pos -= 1;
      }
      while pos > 0 && is_word(pos - 1) {
        pos -= 1;
      }
    },
    CursorPlacement::MoveWordRight => {
      while pos < len && !is_word(pos) {
        pos += 1;
      }
      while pos < len && is_word(pos) {
        pos += 1;
      }
    },
    CursorPlacement::MoveToEndOfPreviousWord => {
      while pos > 0 && is_word(pos - 1) {
        pos -= 1;
      }
      while pos > 0 && !is_word(pos - 1) {
        pos -= 1;
      }
    },
    CursorPlacement::MoveToStartOfNextWord => {
      while pos < len && is_word(pos) {
        pos += 1;
      }
      while pos < len && !is_word(pos) {
        pos += 1;
      }
    },
  }
  pos
}

/// Inserts `proposition` at `cursor` and moves the cursor as it asks.
pub fn apply_proposition(text: &str, proposition: &Proposition, cursor: usize) -> Replacement {
  let mut replacement = replace_text(text, &proposition.replacement, cursor);
  replacement.cursor =
    apply_cursor_placement(&replacement.text, replacement.cursor, proposition.cursor);
  replacement
}
