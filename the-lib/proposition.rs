//! Auto-complete candidates and the set they are collected into.
//!
//! A [`Proposition`] is identified by its `category/label` path and its help
//! text. Two propositions with the same identity are duplicates no matter
//! their priority, and [`PropositionSet`] keeps the first one inserted.
//!
//! Propositions are ranked categorized-first, then by ascending priority,
//! then ordinally by path and help ([`Proposition::rank_cmp`]). Uncategorized
//! entries (the ones a query builder produces) therefore come last among
//! equal priorities.

use std::{
  borrow::Cow,
  cmp::Ordering,
  fmt,
  hash::{
    Hash,
    Hasher,
  },
  str::FromStr,
};

use bitflags::bitflags;
use indexmap::IndexMap;
use thiserror::Error;

use crate::help::HelpTable;

/// Where the cursor goes after a proposition has been inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorPlacement {
  /// Leave the cursor where the replacement left it.
  None,
  MoveLineEnd,
  MoveLineStart,
  MoveToEndOfPreviousWord,
  MoveToStartOfNextWord,
  MoveWordLeft,
  MoveWordRight,
  /// Place the cursor at the `\t` marker of the replacement, or right after
  /// the inserted text.
  #[default]
  MoveAutoComplete,
}

bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
  pub struct Visibility: u8 {
    const HIDDEN_IN_TEXT    = 0b01;
    const HIDDEN_IN_BUILDER = 0b10;
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropositionParseError {
  #[error("proposition label is empty")]
  EmptyLabel,
}

/// One candidate completion.
#[derive(Debug, Clone)]
pub struct Proposition {
  pub label:       String,
  pub replacement: String,
  pub help:        Option<String>,
  pub priority:    i32,
  pub cursor:      CursorPlacement,
  pub category:    Option<String>,
  pub visibility:  Visibility,
}

impl Proposition {
  pub fn new(label: impl Into<String>) -> Self {
    let label = label.into();
    Self {
      replacement: label.clone(),
      label,
      help: None,
      priority: 0,
      cursor: CursorPlacement::default(),
      category: None,
      visibility: Visibility::empty(),
    }
  }

  pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
    self.replacement = replacement.into();
    self
  }

  pub fn with_help(mut self, help: impl Into<String>) -> Self {
    self.help = Some(help.into());
    self
  }

  pub fn with_priority(mut self, priority: i32) -> Self {
    self.priority = priority;
    self
  }

  pub fn with_cursor(mut self, cursor: CursorPlacement) -> Self {
    self.cursor = cursor;
    self
  }

  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  pub fn with_visibility(mut self, visibility: Visibility) -> Self {
    self.visibility = visibility;
    self
  }

  /// `category/label`, or just the label when uncategorized.
  pub fn path(&self) -> Cow<'_, str> {
    match &self.category {
      Some(category) => Cow::Owned(format!("{category}/{}", self.label)),
      None => Cow::Borrowed(&self.label),
    }
  }

  pub fn key(&self) -> PropositionKey {
    PropositionKey {
      path: self.path().into_owned(),
      help: self.help.clone(),
    }
  }

  fn same_identity(&self, other: &Self) -> bool {
    self.help == other.help && self.path() == other.path()
  }

  /// Display order: categorized first, then ascending priority, then path and
  /// help compared ordinally. Total over all propositions, including
  /// duplicates of one identity with different priorities.
  pub fn rank_cmp(&self, other: &Self) -> Ordering {
    other
      .category
      .is_some()
      .cmp(&self.category.is_some())
      .then(self.priority.cmp(&other.priority))
      .then_with(|| self.path().cmp(&other.path()))
      .then_with(|| self.help.cmp(&other.help))
  }
}

impl PartialEq for Proposition {
  fn eq(&self, other: &Self) -> bool {
    self.same_identity(other)
  }
}

impl Eq for Proposition {}

impl Hash for Proposition {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.path().hash(state);
    self.help.hash(state);
  }
}

impl fmt::Display for Proposition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.help {
      Some(help) => write!(f, "{}|{help}", self.label),
      None => f.write_str(&self.label),
    }
  }
}

/// Parses the `label|help` form found in saved provider lists.
impl FromStr for Proposition {
  type Err = PropositionParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (label, help) = match s.split_once('|') {
      Some((label, help)) => (label, Some(help.trim())),
      None => (s, None),
    };
    let label = label.trim();
    if label.is_empty() {
      return Err(PropositionParseError::EmptyLabel);
    }

    let mut proposition = Proposition::new(label);
    proposition.help = help.filter(|help| !help.is_empty()).map(str::to_owned);
    Ok(proposition)
  }
}

/// Identity of a proposition inside a [`PropositionSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropositionKey {
  pub path: String,
  pub help: Option<String>,
}

/// Deduplicating collection of propositions; the first insert of an identity
/// wins.
#[derive(Debug, Clone, Default)]
pub struct PropositionSet {
  items: IndexMap<PropositionKey, Proposition>,
}

impl PropositionSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns false when an equal proposition was already present.
  pub fn insert(&mut self, proposition: Proposition) -> bool {
    let key = proposition.key();
    if self.items.contains_key(&key) {
      return false;
    }
    self.items.insert(key, proposition);
    true
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn contains(&self, proposition: &Proposition) -> bool {
    self.items.contains_key(&proposition.key())
  }

  /// Propositions in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = &Proposition> {
    self.items.values()
  }

  /// Fills in missing help from `table` (keyed by replacement). Entries that
  /// become equal after the backfill collapse to the one inserted first.
  pub fn backfill_help(&mut self, table: &HelpTable) {
    if self.items.values().all(|p| p.help.is_some()) {
      return;
    }

    let mut filled = PropositionSet::new();
    for mut proposition in std::mem::take(&mut self.items).into_values() {
      if proposition.help.is_none() {
        proposition.help = table.get(&proposition.replacement).map(str::to_owned);
      }
      filled.insert(proposition);
    }
    *self = filled;
  }

  pub fn into_sorted_vec(self) -> Vec<Proposition> {
    let mut items: Vec<_> = self.items.into_values().collect();
    items.sort_by(Proposition::rank_cmp);
    items
  }
}

impl Extend<Proposition> for PropositionSet {
  fn extend<T: IntoIterator<Item = Proposition>>(&mut self, iter: T) {
    for proposition in iter {
      self.insert(proposition);
    }
  }
}

impl FromIterator<Proposition> for PropositionSet {
  fn from_iter<T: IntoIterator<Item = Proposition>>(iter: T) -> Self {
    let mut set = PropositionSet::new();
    set.extend(iter);
    set
  }
}

#[cfg(test)]
mod test {
  use quickcheck::{
    Arbitrary,
    Gen,
  };

  use super::*;

  #[test]
  fn replacement_defaults_to_label() {
    let p = Proposition::new("t:prefab");
    assert_eq!(p.replacement, "t:prefab");
    assert_eq!(p.cursor, CursorPlacement::MoveAutoComplete);
    assert_eq!(p.path(), "t:prefab");

    let p = Proposition::new("Prefab").with_category("Types");
    assert_eq!(p.path(), "Types/Prefab");
  }

  #[test]
  fn identity_ignores_priority_and_replacement() {
    let a = Proposition::new("dir:").with_help("Folder").with_priority(3);
    let b = Proposition::new("dir:")
      .with_help("Folder")
      .with_priority(-7)
      .with_replacement("dir:\"\t\"");
    assert_eq!(a, b);
    assert_eq!(a.rank_cmp(&b), Ordering::Greater);

    let c = Proposition::new("dir:").with_help("Directory");
    assert_ne!(a, c);
  }

  #[test]
  fn ordering_rules() {
    let categorized = Proposition::new("z").with_category("Recent").with_priority(50);
    let low = Proposition::new("b").with_priority(-1);
    let same_priority_a = Proposition::new("a");
    let same_priority_b = Proposition::new("b");
    let with_help = Proposition::new("b").with_help("help");

    let mut items = vec![
      with_help.clone(),
      same_priority_b.clone(),
      same_priority_a.clone(),
      low.clone(),
      categorized.clone(),
    ];
    items.sort_by(Proposition::rank_cmp);
    assert_eq!(items, vec![
      categorized,
      low,
      same_priority_a,
      same_priority_b,
      with_help
    ]);
  }

  #[test]
  fn legacy_label_help_form() {
    let p: Proposition = "ext:|Search by extension".parse().unwrap();
    assert_eq!(p.label, "ext:");
    assert_eq!(p.replacement, "ext:");
    assert_eq!(p.help.as_deref(), Some("Search by extension"));

    let p: Proposition = "t:texture".parse().unwrap();
    assert_eq!(p.help, None);
    assert_eq!(p.to_string(), "t:texture");

    let p: Proposition = "a:assets|".parse().unwrap();
    assert_eq!(p.help, None);

    assert_eq!(
      "|help".parse::<Proposition>().unwrap_err(),
      PropositionParseError::EmptyLabel
    );
  }

  #[test]
  fn set_keeps_first_insert() {
    let mut set = PropositionSet::new();
    assert!(set.insert(Proposition::new("ref:").with_priority(1)));
    assert!(!set.insert(Proposition::new("ref:").with_priority(-10)));
    assert_eq!(set.len(), 1);
    assert_eq!(set.iter().next().unwrap().priority, 1);
  }

  #[test]
  fn backfill_collapses_new_duplicates() {
    let mut table = HelpTable::empty();
    table.insert("dir:", "Search by folder");

    let mut set = PropositionSet::new();
    set.insert(Proposition::new("dir:").with_priority(2));
    set.insert(
      Proposition::new("dir:")
        .with_help("Search by folder")
        .with_priority(5),
    );
    set.insert(Proposition::new("unknown:"));
    assert_eq!(set.len(), 3);

    set.backfill_help(&table);
    let items = set.into_sorted_vec();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].label, "unknown:");
    assert_eq!(items[0].help, None);
    assert_eq!(items[1].label, "dir:");
    assert_eq!(items[1].priority, 2);
    assert_eq!(items[1].help.as_deref(), Some("Search by folder"));
  }

  #[test]
  fn backfill_keeps_first_inserted_duplicate() {
    let mut table = HelpTable::empty();
    table.insert("dir:", "Search by folder");

    let mut set = PropositionSet::new();
    set.insert(
      Proposition::new("dir:")
        .with_help("Search by folder")
        .with_priority(5),
    );
    set.insert(Proposition::new("dir:").with_priority(2));
    assert_eq!(set.len(), 2);

    set.backfill_help(&table);
    let items = set.into_sorted_vec();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].priority, 5);
  }

  #[test]
  fn duplicates_with_different_priorities_sort() {
    let mut items: Vec<_> = (0..40)
      .flat_map(|i| {
        [
          Proposition::new("dup").with_priority(40 - i),
          Proposition::new(format!("dup{i}")).with_priority(i),
        ]
      })
      .collect();
    items.sort_by(Proposition::rank_cmp);
    assert!(
      items
        .windows(2)
        .all(|pair| pair[0].rank_cmp(&pair[1]) != Ordering::Greater)
    );
    assert_eq!(items[0].label, "dup0");
    assert_eq!(items[1].label, "dup");
    assert_eq!(items[1].priority, 1);
  }

  impl Arbitrary for Proposition {
    fn arbitrary(g: &mut Gen) -> Self {
      let labels = ["a", "b", "t:", "t:prefab", "dir:", "Ab"];
      let helps = [None, Some("x"), Some("y")];
      let categories = [None, Some("Recent"), Some("Types")];
      let mut p = Proposition::new(*g.choose(&labels).unwrap());
      p.help = g.choose(&helps).unwrap().map(str::to_owned);
      p.category = g.choose(&categories).unwrap().map(str::to_owned);
      p.priority = i32::from(i8::arbitrary(g) % 3);
      p
    }
  }

  fn distinct(items: &[Proposition]) -> bool {
    items
      .iter()
      .enumerate()
      .all(|(i, a)| items[i + 1..].iter().all(|b| a != b))
  }

  quickcheck::quickcheck! {
    fn ordering_is_antisymmetric(a: Proposition, b: Proposition) -> bool {
      a.rank_cmp(&b) == b.rank_cmp(&a).reverse()
        && (a.rank_cmp(&b) != Ordering::Equal || a == b)
    }

    fn ordering_is_transitive(a: Proposition, b: Proposition, c: Proposition) -> bool {
      let less = |x: &Proposition, y: &Proposition| x.rank_cmp(y) == Ordering::Less;
      !(less(&a, &b) && less(&b, &c)) || less(&a, &c)
    }

    fn set_deduplicates(items: Vec<Proposition>) -> bool {
      let set: PropositionSet = items.iter().cloned().collect();
      let sorted = set.into_sorted_vec();
      distinct(&sorted) && items.iter().all(|p| sorted.contains(p))
    }
  }
}
