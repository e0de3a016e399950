//! Edit distance used by the last ranking stage.
//!
//! Matching is done synchronously on the current thread. The ranking engine
//! only reaches this stage for the few candidates left after prefix and
//! substring matching, with tokens long enough that a distance is meaningful.
//!
//! # Examples
//!
//! ```ignore
//! use the_search_lib::fuzzy::levenshtein;
//!
//! assert_eq!(levenshtein("search", "seerch"), 1);
//! assert_eq!(levenshtein("Prefab", "prefab"), 0);
//! ```

/// Case-insensitive Levenshtein distance counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
  strsim::levenshtein(&a.to_lowercase(), &b.to_lowercase())
}
