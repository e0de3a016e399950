use bitflags::bitflags;
use smallvec::SmallVec;

use crate::tokenizer::{
  Delimiters,
  token_at_cursor,
  word_at_cursor,
};

bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
  pub struct PropositionFlags: u8 {
    /// Skip recent searches, saved queries and favorites.
    const IGNORE_RECENTS = 0b01;
    /// Propositions are requested by the structured query builder.
    const QUERY_BUILDER  = 0b10;
  }
}

/// Query context for one proposition fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropositionOptions {
  pub query:  String,
  /// Char index into `query`.
  pub cursor: usize,
  pub flags:  PropositionFlags,
  /// Identifier under the cursor.
  pub word:   String,
  /// Distinct tokens under the cursor: the narrow token first, then the
  /// extended one when it differs. Never empty.
  pub tokens: SmallVec<[String; 2]>,
}

impl PropositionOptions {
  pub fn new(query: impl Into<String>, cursor: usize, flags: PropositionFlags) -> Self {
    let query = query.into();
    let cursor = cursor.min(query.chars().count());

    let word = word_at_cursor(&query, cursor).text;
    let mut tokens = SmallVec::new();
    for delimiters in [Delimiters::Narrow, Delimiters::Extended] {
      let token = token_at_cursor(&query, cursor, delimiters).text;
      if !tokens.contains(&token) {
        tokens.push(token);
      }
    }

    Self {
      query,
      cursor,
      flags,
      word,
      tokens,
    }
  }

  pub fn has_flag(&self, flag: PropositionFlags) -> bool {
    self.flags.contains(flag)
  }

  /// The token delimited by the extended set (filter prefix stripped).
  pub fn token(&self) -> &str {
    self.tokens.last().map_or("", String::as_str)
  }
}
