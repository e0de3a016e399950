//! Collecting propositions from every source into one deduplicated set.
//!
//! Sources are merged in this order, the first occurrence of an identity
//! winning: built-in sources (favorites, recent searches, saved queries),
//! active providers, then the default provider. Missing help text is filled
//! from the [`HelpTable`] last.

use std::sync::Arc;

use crate::{
  help::HelpTable,
  options::{
    PropositionFlags,
    PropositionOptions,
  },
  proposition::{
    CursorPlacement,
    Proposition,
    PropositionSet,
    Visibility,
  },
  provider::{
    PropositionProvider,
    SearchContext,
  },
  sources::BuiltinSources,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
  /// Recent searches proposed at most.
  pub max_recent:             usize,
  /// Priority of the first built-in proposition.
  pub builtin_priority_base:  i32,
  /// Priority of the first provider-selection proposition.
  pub provider_priority_base: i32,
}

impl Default for AggregatorConfig {
  fn default() -> Self {
    Self {
      max_recent:             5,
      builtin_priority_base:  -10_000,
      provider_priority_base: -1_000,
    }
  }
}

#[derive(Debug, Clone)]
pub struct Aggregator {
  help:     Arc<HelpTable>,
  builtins: BuiltinSources,
  config:   AggregatorConfig,
}

impl Aggregator {
  pub fn new(help: Arc<HelpTable>) -> Self {
    Self {
      help,
      builtins: BuiltinSources::default(),
      config: AggregatorConfig::default(),
    }
  }

  /// Aggregator over the shared built-in help table.
  pub fn with_builtin_help() -> Self {
    Self::new(HelpTable::builtin())
  }

  pub fn with_builtins(mut self, builtins: BuiltinSources) -> Self {
    self.builtins = builtins;
    self
  }

  pub fn with_config(mut self, config: AggregatorConfig) -> Self {
    self.config = config;
    self
  }

  pub fn builtins(&self) -> &BuiltinSources {
    &self.builtins
  }

  pub fn builtins_mut(&mut self) -> &mut BuiltinSources {
    &mut self.builtins
  }

  pub fn help(&self) -> &HelpTable {
    &self.help
  }

  /// All propositions for `options` in the given search context.
  pub fn fetch(&self, ctx: &SearchContext, options: &PropositionOptions) -> PropositionSet {
    let query_builder =
      ctx.is_query_builder() || options.has_flag(PropositionFlags::QUERY_BUILDER);
    let mut set = PropositionSet::new();

    if !ctx.is_debug() && !query_builder && !options.has_flag(PropositionFlags::IGNORE_RECENTS) {
      set.extend(self.builtins.propositions(
        options,
        self.config.max_recent,
        self.config.builtin_priority_base,
      ));
    }

    let active: Vec<&Arc<dyn PropositionProvider>> = ctx.active_providers().collect();
    let implicit = active
      .iter()
      .filter(|provider| !provider.info().explicit)
      .count();

    if options.query.is_empty() && implicit > 1 {
      self.propose_providers(&mut set, &active);
    } else {
      for provider in &active {
        merge_provider(&mut set, provider.as_ref(), ctx, options, query_builder);
      }
    }

    if !query_builder
      && !options.query.is_empty()
      && let Some(default_provider) = &ctx.default_provider
    {
      merge_provider(&mut set, default_provider.as_ref(), ctx, options, query_builder);
    }

    set.backfill_help(&self.help);
    set
  }

  /// One "select provider" proposition per provider instead of its values.
  fn propose_providers(&self, set: &mut PropositionSet, active: &[&Arc<dyn PropositionProvider>]) {
    let mut providers: Vec<_> = active
      .iter()
      .map(|provider| provider.info())
      .filter(|info| !info.filter_id.is_empty())
      .collect();
    providers.sort_by_key(|info| info.priority);

    let mut priority = self.config.provider_priority_base;
    for info in providers {
      set.insert(
        Proposition::new(&info.filter_id)
          .with_replacement(format!("{} ", info.filter_id))
          .with_help(&info.name)
          .with_priority(priority)
          .with_cursor(CursorPlacement::MoveAutoComplete),
      );
      priority = priority.saturating_add(1);
    }
  }
}

fn merge_provider(
  set: &mut PropositionSet,
  provider: &dyn PropositionProvider,
  ctx: &SearchContext,
  options: &PropositionOptions,
  query_builder: bool,
) {
  let info = provider.info();
  let Some(propositions) = provider.fetch_propositions(ctx, options) else {
    tracing::trace!(provider = %info.id, "provider has no propositions");
    return;
  };

  let hidden = if query_builder {
    Visibility::HIDDEN_IN_BUILDER
  } else {
    Visibility::HIDDEN_IN_TEXT
  };
  let before = set.len();
  set.extend(
    propositions
      .into_iter()
      .filter(|proposition| !proposition.visibility.intersects(hidden)),
  );
  tracing::trace!(
    provider = %info.id,
    added = set.len() - before,
    "merged provider propositions"
  );
}
