use std::{
  path::PathBuf,
  sync::Arc,
};

use eyre::{
  Result,
  eyre,
};
use the_search_event::Dispatcher;
use the_search_lib::{
  aggregator::Aggregator,
  config::{
    self,
    SearchConfig,
  },
  provider::{
    ExpressionProvider,
    PropositionProvider,
    ProviderInfo,
    SearchContext,
    SearchFlags,
    TypeFilterProvider,
  },
  replace::Replacement,
  session::{
    AutoCompleteSession,
    Key,
    KeyOutcome,
  },
  sources::RecentSearches,
};

/// The engine wired up the way an editor search field would use it.
pub struct Host {
  aggregator:       Aggregator,
  providers:        Vec<Arc<dyn PropositionProvider>>,
  default_provider: Arc<dyn PropositionProvider>,
  session:          AutoCompleteSession,
  dispatcher:       Dispatcher,
  recent_file:      PathBuf,
}

impl Host {
  pub fn new(config: &SearchConfig, recent: RecentSearches) -> config::Result<Self> {
    let mut aggregator = config.aggregator();
    aggregator.builtins_mut().recent = recent;

    let mut providers: Vec<Arc<dyn PropositionProvider>> = config
      .providers()?
      .into_iter()
      .map(|provider| Arc::new(provider) as Arc<dyn PropositionProvider>)
      .collect();
    providers.push(Arc::new(TypeFilterProvider::new(
      ProviderInfo::new("type", "Types", "t:"),
      aggregator.help(),
    )));

    Ok(Self {
      aggregator,
      providers,
      default_provider: Arc::new(ExpressionProvider::new()),
      session: config.session(),
      dispatcher: Dispatcher::new(),
      recent_file: the_search_loader::recent_file(),
    })
  }

  pub fn context(
    &self,
    text: &str,
    cursor: usize,
    filter_id: Option<&str>,
    flags: SearchFlags,
  ) -> SearchContext {
    let mut ctx = SearchContext::new(text, cursor)
      .with_default_provider(self.default_provider.clone())
      .with_flags(flags);
    ctx.providers = self.providers.clone();
    if let Some(filter_id) = filter_id {
      ctx = ctx.with_filter_id(filter_id);
    }
    ctx
  }

  pub fn show(&mut self, ctx: &SearchContext) {
    self.session.show(&self.aggregator, ctx);
  }

  pub fn handle_key(&mut self, key: Key, text: &str, cursor: usize) -> KeyOutcome {
    self.session.handle_key(key, text, cursor)
  }

  /// Selects the proposition at `index` and accepts it.
  pub fn accept_at(&mut self, index: usize, text: &str, cursor: usize) -> Result<Replacement> {
    let shown = self.session.items().len();
    if index >= shown {
      return Err(eyre!("no proposition at index {index}, {shown} shown"));
    }
    while self.session.selected() != Some(index) {
      self.session.select_next();
    }
    self
      .session
      .accept(text, cursor)
      .ok_or_else(|| eyre!("the completion popup is hidden"))
  }

  /// One line per shown proposition, the selected one marked with `>`.
  pub fn lines(&self) -> Vec<String> {
    let selected = self.session.selected();
    self
      .session
      .items()
      .iter()
      .enumerate()
      .map(|(index, proposition)| {
        let marker = if selected == Some(index) { '>' } else { ' ' };
        match &proposition.help {
          Some(help) => format!("{marker} {}\t{help}", proposition.label),
          None => format!("{marker} {}", proposition.label),
        }
      })
      .collect()
  }

  /// Adds `query` to the recent searches and schedules saving them.
  pub fn remember(&mut self, query: String) {
    let recent = &mut self.aggregator.builtins_mut().recent;
    recent.push(query);
    let recent = recent.clone();
    let path = self.recent_file.clone();
    self.dispatcher.enqueue(move || {
      if let Err(err) = the_search_loader::write_toml(&path, &recent) {
        log::error!("failed to save recent searches: {err:#}");
      }
    });
  }

  /// Runs the deferred work left for this frame.
  pub fn finish(&self) {
    let ran = self.dispatcher.process();
    log::debug!("ran {ran} deferred tasks before exit");
  }
}
