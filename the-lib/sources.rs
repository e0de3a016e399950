//! Propositions that do not come from a provider: favorite and saved
//! queries, and the most recent searches.

use std::collections::VecDeque;

use serde::{
  Deserialize,
  Serialize,
};

use crate::{
  options::PropositionOptions,
  proposition::{
    CursorPlacement,
    Proposition,
  },
};

pub const FAVORITES_CATEGORY: &str = "Favorites";
pub const RECENT_CATEGORY: &str = "Recent Searches";
pub const SAVED_CATEGORY: &str = "Saved Searches";

const DEFAULT_RECENT_CAPACITY: usize = 50;

/// Most-recently-used list of submitted queries, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearches {
  capacity: usize,
  entries:  VecDeque<String>,
}

impl RecentSearches {
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity: capacity.max(1),
      entries:  VecDeque::new(),
    }
  }

  /// Moves `query` to the front, evicting the oldest entry when full.
  pub fn push(&mut self, query: impl Into<String>) {
    let query = query.into();
    if query.trim().is_empty() {
      return;
    }
    self.entries.retain(|entry| *entry != query);
    self.entries.push_front(query);
    self.entries.truncate(self.capacity);
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(String::as_str)
  }

  /// Up to `limit` entries starting with `text` (ignoring case), newest first.
  pub fn matching<'a>(&'a self, text: &str, limit: usize) -> impl Iterator<Item = &'a str> {
    let text = text.to_lowercase();
    self
      .iter()
      .filter(move |entry| entry.to_lowercase().starts_with(&text))
      .take(limit)
  }
}

impl Default for RecentSearches {
  fn default() -> Self {
    Self::new(DEFAULT_RECENT_CAPACITY)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SavedQuery {
  pub name:        String,
  pub text:        String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub favorite:    bool,
}

impl SavedQuery {
  fn proposition(&self, category: &str, priority: i32) -> Proposition {
    Proposition::new(&self.name)
      .with_replacement(&self.text)
      .with_help(
        self
          .description
          .clone()
          .unwrap_or_else(|| self.text.clone()),
      )
      .with_category(category)
      .with_priority(priority)
      .with_cursor(CursorPlacement::MoveLineEnd)
  }
}

#[derive(Debug, Clone, Default)]
pub struct BuiltinSources {
  pub recent: RecentSearches,
  pub saved:  Vec<SavedQuery>,
}

impl BuiltinSources {
  /// Favorites, then recent searches matching the query, then the remaining
  /// saved queries. Priorities increase by one from `base`.
  pub fn propositions(
    &self,
    options: &PropositionOptions,
    max_recent: usize,
    base: i32,
  ) -> Vec<Proposition> {
    let mut priority = base;
    let mut next_priority = || {
      let current = priority;
      priority = priority.saturating_add(1);
      current
    };

    let mut propositions = Vec::new();
    for query in self.saved.iter().filter(|query| query.favorite) {
      propositions.push(query.proposition(FAVORITES_CATEGORY, next_priority()));
    }

    for recent in self.recent.matching(&options.query, max_recent) {
      propositions.push(
        Proposition::new(recent)
          .with_help("Recent search")
          .with_category(RECENT_CATEGORY)
          .with_priority(next_priority())
          .with_cursor(CursorPlacement::MoveLineEnd),
      );
    }

    for query in self.saved.iter().filter(|query| !query.favorite) {
      propositions.push(query.proposition(SAVED_CATEGORY, next_priority()));
    }

    propositions
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::options::PropositionFlags;

  #[test]
  fn recent_searches_are_most_recent_first() {
    let mut recent = RecentSearches::new(3);
    recent.push("t:prefab");
    recent.push("dir:Assets");
    recent.push("t:prefab");
    recent.push("   ");
    recent.push("ext:png");
    recent.push("size>100");
    assert_eq!(recent.iter().collect::<Vec<_>>(), vec![
      "size>100", "ext:png", "t:prefab"
    ]);
  }

  #[test]
  fn matching_is_case_insensitive_prefix() {
    let mut recent = RecentSearches::default();
    for query in ["T:Prefab hero", "t:material", "dir:t", "t:pre"] {
      recent.push(query);
    }
    let matches: Vec<_> = recent.matching("t:P", 5).collect();
    assert_eq!(matches, vec!["t:pre", "T:Prefab hero"]);
    assert_eq!(recent.matching("", 2).count(), 2);
  }

  #[test]
  fn recent_searches_round_trip_through_json() {
    let mut recent = RecentSearches::new(4);
    recent.push("a");
    recent.push("b");
    let json = serde_json::to_string(&recent).unwrap();
    let back: RecentSearches = serde_json::from_str(&json).unwrap();
    assert_eq!(back, recent);
  }

  #[test]
  fn builtin_priorities_strictly_increase() {
    let mut recent = RecentSearches::default();
    recent.push("hero");
    recent.push("house");
    let sources = BuiltinSources {
      recent,
      saved: vec![
        SavedQuery {
          name:        "Big textures".into(),
          text:        "t:texture size>1000000".into(),
          description: None,
          favorite:    false,
        },
        SavedQuery {
          name:        "Heroes".into(),
          text:        "t:prefab hero".into(),
          description: Some("All hero prefabs".into()),
          favorite:    true,
        },
      ],
    };

    let options = PropositionOptions::new("h", 1, PropositionFlags::empty());
    let items = sources.propositions(&options, 5, -1000);
    let summary: Vec<_> = items
      .iter()
      .map(|p| (p.category.as_deref().unwrap(), p.label.as_str(), p.priority))
      .collect();
    assert_eq!(summary, vec![
      (FAVORITES_CATEGORY, "Heroes", -1000),
      (RECENT_CATEGORY, "house", -999),
      (RECENT_CATEGORY, "hero", -998),
      (SAVED_CATEGORY, "Big textures", -997),
    ]);
    assert_eq!(items[0].replacement, "t:prefab hero");
    assert_eq!(items[0].help.as_deref(), Some("All hero prefabs"));
    assert_eq!(items[3].help.as_deref(), Some("t:texture size>1000000"));
  }

  #[test]
  fn builtin_priorities_saturate() {
    let mut recent = RecentSearches::default();
    recent.push("a");
    recent.push("b");
    let sources = BuiltinSources {
      recent,
      saved: Vec::new(),
    };
    let options = PropositionOptions::new("", 0, PropositionFlags::empty());
    let priorities: Vec<_> = sources
      .propositions(&options, 5, i32::MAX)
      .iter()
      .map(|p| p.priority)
      .collect();
    assert_eq!(priorities, vec![i32::MAX, i32::MAX]);
  }
}
