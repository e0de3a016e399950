//! Fallback help text for propositions that do not carry their own.
//!
//! Keys are replacement strings (`dir:`, `t:prefab`, ...). The table is
//! seeded with the built-in filters and extended with the type names the host
//! knows about, each registered as a `t:<type>` entry.

use std::{
  collections::{
    BTreeSet,
    HashMap,
  },
  sync::{
    Arc,
    LazyLock,
  },
};

const BUILTIN_HELP: &[(&str, &str)] = &[
  ("a:", "Search within an area (assets, packages, scene)"),
  ("a:assets", "Search only in the project assets"),
  ("a:packages", "Search only in installed packages"),
  ("age:", "Search objects by age in days since last modification"),
  ("dir:", "Search objects inside a folder"),
  ("ext:", "Search objects by file extension"),
  ("id:", "Search objects by identifier"),
  ("is:", "Search objects by state (dirty, prefab, root, ...)"),
  ("is:child", "Search objects that have a parent"),
  ("is:leaf", "Search objects without children"),
  ("is:root", "Search objects without a parent"),
  ("l:", "Search objects by label"),
  ("name:", "Search objects by name"),
  ("path:", "Search objects by path"),
  ("prefab:", "Search prefabs by kind (root, instance, variant)"),
  ("ref:", "Search objects referencing another object"),
  ("size:", "Search objects by file size in bytes"),
  ("t:", "Search objects by type"),
  ("tag:", "Search objects by tag"),
  ("and", "Both conditions must match"),
  ("or", "Either condition must match"),
  ("-", "Exclude objects matching the next condition"),
  ("=", "Exact match"),
  ("!=", "Does not match"),
  ("<", "Less than"),
  ("<=", "Less than or equal"),
  (">", "Greater than"),
  (">=", "Greater than or equal"),
];

static BUILTIN: LazyLock<Arc<HelpTable>> =
  LazyLock::new(|| Arc::new(HelpTable::with_builtins()));

#[derive(Debug, Clone, Default)]
pub struct HelpTable {
  entries:    HashMap<String, String>,
  type_names: BTreeSet<String>,
}

impl HelpTable {
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn with_builtins() -> Self {
    let mut table = Self::empty();
    for (key, help) in BUILTIN_HELP {
      table.insert(*key, *help);
    }
    table
  }

  /// Shared table holding only the built-in filters.
  pub fn builtin() -> Arc<HelpTable> {
    BUILTIN.clone()
  }

  pub fn insert(&mut self, key: impl Into<String>, help: impl Into<String>) {
    self.entries.insert(key.into(), help.into());
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Registers `t:<name>` help for every type name. Existing entries are kept.
  pub fn register_type_names<I, S>(&mut self, names: I)
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    for name in names {
      let name = name.as_ref().trim();
      if name.is_empty() {
        continue;
      }
      self
        .entries
        .entry(format!("t:{}", name.to_lowercase()))
        .or_insert_with(|| format!("Search {name} objects"));
      self.type_names.insert(name.to_string());
    }
  }

  /// Registered type names in sorted order.
  pub fn type_names(&self) -> impl Iterator<Item = &str> {
    self.type_names.iter().map(String::as_str)
  }
}
