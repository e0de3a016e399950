//! Narrowing a candidate pool down to the visible completion list.
//!
//! Candidates go through three stages, cheapest first, and each matched
//! candidate leaves the pool so later stages never see it again:
//!
//! 1. **Prefix**: a token starts the label. These are re-sorted by the
//!    proposition order.
//! 2. **Substring**: a token occurs in the label or the help text. Appended in
//!    pool order.
//! 3. **Fuzzy**: the label is within a fraction of its length in edit
//!    distance from a long enough token. Appended in pool order.
//!
//! A stage stops as soon as the list holds `max_count` items, and later
//! stages do not run at all once it is full.

use crate::{
  fuzzy::levenshtein,
  proposition::Proposition,
};

/// Tokens shorter than this never reach the fuzzy stage.
const FUZZY_MIN_TOKEN_LEN: usize = 4;

/// Number of rows of `row_height` fitting in `popup_height`.
pub fn max_visible(popup_height: f32, row_height: f32) -> usize {
  if !(row_height > 0.0) || !(popup_height > 0.0) {
    return 0;
  }
  (popup_height / row_height).floor() as usize
}

/// Ranked, bounded subset of `pool` matching `tokens`.
pub fn build_complete_list<S: AsRef<str>>(
  mut pool: Vec<Proposition>,
  tokens: &[S],
  max_count: usize,
  fuzzy_threshold: f32,
) -> Vec<Proposition> {
  let tokens: Vec<String> = tokens
    .iter()
    .map(|token| token.as_ref().to_lowercase())
    .filter(|token| !token.is_empty())
    .collect();

  let mut list = Vec::with_capacity(max_count.min(pool.len()));
  if max_count == 0 || tokens.is_empty() {
    return list;
  }

  fill(&mut list, &mut pool, max_count, |p| {
    let label = p.label.to_lowercase();
    tokens.iter().any(|token| label.starts_with(token.as_str()))
  });
  list.sort_by(Proposition::rank_cmp);
  let prefix_count = list.len();

  if list.len() < max_count {
    fill(&mut list, &mut pool, max_count, |p| {
      let label = p.label.to_lowercase();
      let help = p.help.as_deref().map(str::to_lowercase);
      tokens.iter().any(|token| {
        label.contains(token.as_str())
          || help
            .as_deref()
            .is_some_and(|help| help.contains(token.as_str()))
      })
    });
  }
  let substring_count = list.len() - prefix_count;

  let threshold = fuzzy_threshold.clamp(0.0, 1.0);
  let fuzzy_tokens: Vec<String> = tokens
    .iter()
    .map(|token| token.chars().filter(|ch| !matches!(ch, '<' | '=' | '>')).collect::<String>())
    .filter(|token| token.chars().count() >= FUZZY_MIN_TOKEN_LEN)
    .collect();
  if list.len() < max_count && threshold > 0.0 && !fuzzy_tokens.is_empty() {
    fill(&mut list, &mut pool, max_count, |p| {
      let limit = (threshold * p.label.chars().count() as f32).floor() as usize;
      fuzzy_tokens
        .iter()
        .any(|token| levenshtein(&p.label, token) < limit)
    });
  }

  tracing::trace!(
    prefix = prefix_count,
    substring = substring_count,
    fuzzy = list.len() - prefix_count - substring_count,
    remaining = pool.len(),
    "built completion list"
  );
  list
}

/// Moves matching pool items into `list` until it holds `max_count` items.
fn fill<F>(list: &mut Vec<Proposition>, pool: &mut Vec<Proposition>, max_count: usize, mut matches: F)
where
  F: FnMut(&Proposition) -> bool,
{
  let mut remaining = Vec::with_capacity(pool.len());
  for proposition in pool.drain(..) {
    if list.len() < max_count && matches(&proposition) {
      list.push(proposition);
    } else {
      remaining.push(proposition);
    }
  }
  *pool = remaining;
}
