//! User configuration of the proposition engine.
//!
//! ```toml
//! fuzzy-threshold = 0.4
//! row-height = 18.0
//! popup-height = 200.0
//! type-names = ["Prefab", "Material"]
//!
//! [[saved-query]]
//! name = "Heroes"
//! text = "t:prefab hero"
//! favorite = true
//!
//! [[provider]]
//! id = "dir"
//! name = "Folders"
//! filter-id = "dir:"
//! propositions = ["dir:Assets|Project assets", "dir:Packages"]
//! ```

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::{
  aggregator::{
    Aggregator,
    AggregatorConfig,
  },
  help::HelpTable,
  proposition::{
    Proposition,
    PropositionParseError,
  },
  provider::{
    ProviderInfo,
    StaticProvider,
  },
  session::{
    AutoCompleteSession,
    DEFAULT_FUZZY_THRESHOLD,
  },
  sources::{
    BuiltinSources,
    RecentSearches,
    SavedQuery,
  },
};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to parse config: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("row-height must be positive, got {0}")]
  InvalidRowHeight(f32),
  #[error("provider `{provider}` has an invalid proposition: {source}")]
  Proposition {
    provider: String,
    #[source]
    source:   PropositionParseError,
  },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SearchConfig {
  pub fuzzy_threshold:        f32,
  pub row_height:             f32,
  pub popup_height:           f32,
  pub max_recent:             usize,
  pub recent_capacity:        usize,
  pub builtin_priority_base:  i32,
  pub provider_priority_base: i32,
  /// Type names proposed as `t:<type>` filters.
  pub type_names:             Vec<String>,
  #[serde(rename = "saved-query")]
  pub saved_queries:          Vec<SavedQuery>,
  #[serde(rename = "provider")]
  pub providers:              Vec<ProviderConfig>,
}

impl Default for SearchConfig {
  fn default() -> Self {
    let aggregator = AggregatorConfig::default();
    Self {
      fuzzy_threshold:        DEFAULT_FUZZY_THRESHOLD,
      row_height:             18.0,
      popup_height:           200.0,
      max_recent:             aggregator.max_recent,
      recent_capacity:        50,
      builtin_priority_base:  aggregator.builtin_priority_base,
      provider_priority_base: aggregator.provider_priority_base,
      type_names:             Vec::new(),
      saved_queries:          Vec::new(),
      providers:              Vec::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProviderConfig {
  pub id:           String,
  #[serde(default)]
  pub name:         Option<String>,
  pub filter_id:    String,
  #[serde(default)]
  pub priority:     i32,
  #[serde(default)]
  pub explicit:     bool,
  /// Entries in `label|help` form.
  #[serde(default)]
  pub propositions: Vec<String>,
}

impl ProviderConfig {
  pub fn build(&self) -> Result<StaticProvider> {
    let info = ProviderInfo::new(
      &self.id,
      self.name.as_deref().unwrap_or(&self.id),
      &self.filter_id,
    )
    .with_priority(self.priority)
    .explicit(self.explicit);

    let propositions = self
      .propositions
      .iter()
      .map(|entry| {
        entry
          .parse::<Proposition>()
          .map(|proposition| proposition.with_priority(self.priority))
          .map_err(|source| {
            ConfigError::Proposition {
              provider: self.id.clone(),
              source,
            }
          })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(StaticProvider::new(info, propositions))
  }
}

impl SearchConfig {
  pub fn from_toml(value: toml::Value) -> Result<Self> {
    let config: SearchConfig = value.try_into()?;
    config.validate()
  }

  pub fn parse(source: &str) -> Result<Self> {
    let config: SearchConfig = toml::from_str(source)?;
    config.validate()
  }

  fn validate(mut self) -> Result<Self> {
    if !(self.row_height > 0.0) {
      return Err(ConfigError::InvalidRowHeight(self.row_height));
    }
    let clamped = self.fuzzy_threshold.clamp(0.0, 1.0);
    if clamped != self.fuzzy_threshold {
      tracing::warn!(
        "fuzzy-threshold {} is outside [0, 1], using {clamped}",
        self.fuzzy_threshold
      );
      self.fuzzy_threshold = if clamped.is_nan() { 0.0 } else { clamped };
    }
    Ok(self)
  }

  pub fn aggregator_config(&self) -> AggregatorConfig {
    AggregatorConfig {
      max_recent:             self.max_recent,
      builtin_priority_base:  self.builtin_priority_base,
      provider_priority_base: self.provider_priority_base,
    }
  }

  /// Built-in help plus a `t:<type>` entry per configured type name.
  pub fn help_table(&self) -> HelpTable {
    let mut table = HelpTable::with_builtins();
    table.register_type_names(&self.type_names);
    table
  }

  pub fn builtin_sources(&self) -> BuiltinSources {
    BuiltinSources {
      recent: RecentSearches::new(self.recent_capacity),
      saved:  self.saved_queries.clone(),
    }
  }

  pub fn providers(&self) -> Result<Vec<StaticProvider>> {
    self.providers.iter().map(ProviderConfig::build).collect()
  }

  /// Aggregator sharing the built-in help table unless type names extend it.
  pub fn aggregator(&self) -> Aggregator {
    let aggregator = if self.type_names.is_empty() {
      Aggregator::with_builtin_help()
    } else {
      Aggregator::new(Arc::new(self.help_table()))
    };
    aggregator
      .with_builtins(self.builtin_sources())
      .with_config(self.aggregator_config())
  }

  pub fn session(&self) -> AutoCompleteSession {
    let mut session = AutoCompleteSession::new().with_fuzzy_threshold(self.fuzzy_threshold);
    session.set_popup_height(self.popup_height, self.row_height);
    session
  }
}
