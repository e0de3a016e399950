//! Character classification used when splitting a query into tokens.
//!
//! Queries are split on two delimiter sets. The narrow set keeps filter
//! prefixes such as `t:` attached to their argument (`t:prefab` is one token),
//! the extended set additionally breaks on `:` so the argument can be looked up
//! on its own.

/// Which delimiter set a token scan breaks on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Delimiters {
  /// `{ } [ ] = ,` and whitespace.
  #[default]
  Narrow,
  /// The narrow set plus `:`.
  Extended,
}

impl Delimiters {
  #[inline]
  pub fn contains(self, ch: char) -> bool {
    match self {
      Delimiters::Narrow => char_is_narrow_delimiter(ch),
      Delimiters::Extended => char_is_extended_delimiter(ch),
    }
  }
}

#[inline]
pub fn char_is_whitespace(ch: char) -> bool {
  match ch {
      '\u{0009}' | // Character Tabulation
      '\u{000A}' | // Line Feed
      '\u{000D}' | // Carriage Return
      '\u{0020}' | // Space
      '\u{00A0}' | // No-break Space
      '\u{180E}' | // Mongolian Vowel Separator
      '\u{202F}' | // Narrow No-break Space
      '\u{205F}' | // Medium Mathematical Space
      '\u{3000}' | // Ideographic Space
      '\u{FEFF}'   // Zero Width No-break Space
      => true,

      // En Quad through Zero Width Space.
      ch if ('\u{2000}' ..= '\u{200B}').contains(&ch) => true,

      _ => false,
    }
}

#[inline]
pub fn char_is_filter_separator(ch: char) -> bool {
  ch == ':'
}

#[inline]
pub fn char_is_narrow_delimiter(ch: char) -> bool {
  matches!(ch, '{' | '}' | '[' | ']' | '=' | ',') || char_is_whitespace(ch)
}

#[inline]
pub fn char_is_extended_delimiter(ch: char) -> bool {
  char_is_narrow_delimiter(ch) || char_is_filter_separator(ch)
}

#[inline]
pub fn char_is_word(ch: char) -> bool {
  ch.is_alphanumeric() || ch == '_'
}
