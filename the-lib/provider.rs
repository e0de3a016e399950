//! Search providers as seen by the proposition engine.
//!
//! The engine only needs three things from a provider: its identity and
//! filter prefix ([`ProviderInfo`]) and a way to produce propositions for the
//! current query ([`PropositionProvider::fetch_propositions`]).

use std::sync::Arc;

use bitflags::bitflags;

use crate::{
  help::HelpTable,
  options::PropositionOptions,
  proposition::{
    CursorPlacement,
    Proposition,
    Visibility,
  },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
  pub id:        String,
  pub name:      String,
  /// Filter prefix typed to restrict a query to this provider, e.g. `t:`.
  pub filter_id: String,
  pub priority:  i32,
  /// Explicit providers only run when their filter id is typed.
  pub explicit:  bool,
}

impl ProviderInfo {
  pub fn new(id: impl Into<String>, name: impl Into<String>, filter_id: impl Into<String>) -> Self {
    Self {
      id:        id.into(),
      name:      name.into(),
      filter_id: filter_id.into(),
      priority:  0,
      explicit:  false,
    }
  }

  pub fn with_priority(mut self, priority: i32) -> Self {
    self.priority = priority;
    self
  }

  pub fn explicit(mut self, explicit: bool) -> Self {
    self.explicit = explicit;
    self
  }
}

pub trait PropositionProvider: Send + Sync {
  fn info(&self) -> &ProviderInfo;

  /// `None` means the provider has nothing to propose for this query.
  fn fetch_propositions(
    &self,
    ctx: &SearchContext,
    options: &PropositionOptions,
  ) -> Option<Vec<Proposition>> {
    let _ = (ctx, options);
    None
  }
}

bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
  pub struct SearchFlags: u8 {
    const DEBUG         = 0b01;
    const QUERY_BUILDER = 0b10;
  }
}

/// Everything the aggregator reads from the host search view.
#[derive(Clone, Default)]
pub struct SearchContext {
  pub search_text:      String,
  pub cursor:           usize,
  pub providers:        Vec<Arc<dyn PropositionProvider>>,
  /// Restricts propositions to the provider with this filter id.
  pub filter_id:        Option<String>,
  pub flags:            SearchFlags,
  /// Provider merged for every non-empty text query.
  pub default_provider: Option<Arc<dyn PropositionProvider>>,
}

impl SearchContext {
  pub fn new(search_text: impl Into<String>, cursor: usize) -> Self {
    Self {
      search_text: search_text.into(),
      cursor,
      ..Default::default()
    }
  }

  pub fn with_provider(mut self, provider: Arc<dyn PropositionProvider>) -> Self {
    self.providers.push(provider);
    self
  }

  pub fn with_default_provider(mut self, provider: Arc<dyn PropositionProvider>) -> Self {
    self.default_provider = Some(provider);
    self
  }

  pub fn with_filter_id(mut self, filter_id: impl Into<String>) -> Self {
    self.filter_id = Some(filter_id.into());
    self
  }

  pub fn with_flags(mut self, flags: SearchFlags) -> Self {
    self.flags = flags;
    self
  }

  pub fn is_query_builder(&self) -> bool {
    self.flags.contains(SearchFlags::QUERY_BUILDER)
  }

  pub fn is_debug(&self) -> bool {
    self.flags.contains(SearchFlags::DEBUG)
  }

  /// Providers allowed by the current filter id, in registration order.
  pub fn active_providers(&self) -> impl Iterator<Item = &Arc<dyn PropositionProvider>> {
    self.providers.iter().filter(|provider| {
      self
        .filter_id
        .as_deref()
        .is_none_or(|filter_id| provider.info().filter_id == filter_id)
    })
  }
}

/// Provider with a fixed list of propositions.
#[derive(Debug, Clone)]
pub struct StaticProvider {
  info:         ProviderInfo,
  propositions: Vec<Proposition>,
}

impl StaticProvider {
  pub fn new(info: ProviderInfo, propositions: Vec<Proposition>) -> Self {
    Self { info, propositions }
  }
}

impl PropositionProvider for StaticProvider {
  fn info(&self) -> &ProviderInfo {
    &self.info
  }

  fn fetch_propositions(
    &self,
    _ctx: &SearchContext,
    _options: &PropositionOptions,
  ) -> Option<Vec<Proposition>> {
    if self.propositions.is_empty() {
      return None;
    }
    Some(self.propositions.clone())
  }
}

/// Proposes a `t:<type>` filter for every type name in a help table.
#[derive(Debug, Clone)]
pub struct TypeFilterProvider {
  info:       ProviderInfo,
  type_names: Vec<String>,
}

impl TypeFilterProvider {
  pub fn new(info: ProviderInfo, help: &HelpTable) -> Self {
    Self {
      info,
      type_names: help.type_names().map(str::to_owned).collect(),
    }
  }
}

impl PropositionProvider for TypeFilterProvider {
  fn info(&self) -> &ProviderInfo {
    &self.info
  }

  fn fetch_propositions(
    &self,
    _ctx: &SearchContext,
    _options: &PropositionOptions,
  ) -> Option<Vec<Proposition>> {
    let filter_id = &self.info.filter_id;
    let propositions = self
      .type_names
      .iter()
      .map(|name| {
        Proposition::new(format!("{filter_id}{}", name.to_lowercase()))
          .with_priority(self.info.priority)
      })
      .collect();
    Some(propositions)
  }
}

const EXPRESSION_OPERATORS: &[(&str, &str, CursorPlacement)] = &[
  ("and", "and ", CursorPlacement::MoveAutoComplete),
  ("or", "or ", CursorPlacement::MoveAutoComplete),
  ("-", "-", CursorPlacement::MoveAutoComplete),
  ("(", "(\t)", CursorPlacement::MoveAutoComplete),
];

/// Boolean operators proposed for any free text query.
#[derive(Debug, Clone)]
pub struct ExpressionProvider {
  info: ProviderInfo,
}

impl ExpressionProvider {
  pub fn new() -> Self {
    Self {
      info: ProviderInfo::new("expression", "Expression", "").with_priority(100),
    }
  }
}

impl Default for ExpressionProvider {
  fn default() -> Self {
    Self::new()
  }
}

impl PropositionProvider for ExpressionProvider {
  fn info(&self) -> &ProviderInfo {
    &self.info
  }

  fn fetch_propositions(
    &self,
    _ctx: &SearchContext,
    options: &PropositionOptions,
  ) -> Option<Vec<Proposition>> {
    // Operators only make sense between terms.
    if options.query.trim().is_empty() {
      return None;
    }

    let propositions = EXPRESSION_OPERATORS
      .iter()
      .map(|&(label, replacement, cursor)| {
        Proposition::new(label)
          .with_replacement(replacement)
          .with_priority(self.info.priority)
          .with_cursor(cursor)
          .with_visibility(Visibility::HIDDEN_IN_BUILDER)
      })
      .collect();
    Some(propositions)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::options::PropositionFlags;

  fn options(query: &str) -> PropositionOptions {
    PropositionOptions::new(query, query.chars().count(), PropositionFlags::empty())
  }

  #[test]
  fn filter_id_restricts_active_providers() {
    let types = Arc::new(StaticProvider::new(
      ProviderInfo::new("type", "Types", "t:"),
      vec![],
    ));
    let dirs = Arc::new(StaticProvider::new(
      ProviderInfo::new("dir", "Folders", "dir:"),
      vec![],
    ));
    let ctx = SearchContext::new("", 0)
      .with_provider(types)
      .with_provider(dirs);
    assert_eq!(ctx.active_providers().count(), 2);

    let ctx = ctx.with_filter_id("dir:");
    let ids: Vec<_> = ctx
      .active_providers()
      .map(|p| p.info().id.clone())
      .collect();
    assert_eq!(ids, vec!["dir"]);
  }

  #[test]
  fn static_provider_without_items_contributes_nothing() {
    let provider = StaticProvider::new(ProviderInfo::new("s", "S", "s:"), vec![]);
    let ctx = SearchContext::new("s:", 2);
    assert!(provider.fetch_propositions(&ctx, &options("s:")).is_none());
  }

  #[test]
  fn type_filter_provider_lists_types() {
    let mut help = HelpTable::empty();
    help.register_type_names(["Prefab", "Material"]);
    let provider = TypeFilterProvider::new(
      ProviderInfo::new("type", "Types", "t:").with_priority(5),
      &help,
    );
    let ctx = SearchContext::new("t:", 2);
    let labels: Vec<_> = provider
      .fetch_propositions(&ctx, &options("t:"))
      .unwrap()
      .into_iter()
      .map(|p| (p.label, p.priority))
      .collect();
    assert_eq!(labels, vec![
      ("t:material".to_string(), 5),
      ("t:prefab".to_string(), 5)
    ]);
  }

  #[test]
  fn expression_provider_needs_text() {
    let provider = ExpressionProvider::new();
    let ctx = SearchContext::new("", 0);
    assert!(provider.fetch_propositions(&ctx, &options("  ")).is_none());

    let items = provider
      .fetch_propositions(&ctx, &options("foo "))
      .unwrap();
    assert!(items.iter().any(|p| p.label == "and"));
    assert!(
      items
        .iter()
        .all(|p| p.visibility.contains(Visibility::HIDDEN_IN_BUILDER))
    );
  }
}
