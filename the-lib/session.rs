//! State of one auto-complete popup.
//!
//! The popup is either hidden or shown. While shown, the filtered list is
//! rebuilt whenever the query text changes, the selection wraps around when
//! navigating, and accepting a proposition rewrites the query and hides the
//! popup.

use crate::{
  aggregator::Aggregator,
  options::{
    PropositionFlags,
    PropositionOptions,
  },
  proposition::Proposition,
  provider::SearchContext,
  ranking::{
    build_complete_list,
    max_visible,
  },
  replace::{
    Replacement,
    apply_proposition,
  },
};

pub const DEFAULT_MAX_VISIBLE: usize = 10;
pub const DEFAULT_FUZZY_THRESHOLD: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
  Up,
  Down,
  Escape,
  Enter,
  Tab,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
  /// The popup is hidden and did not consume the key.
  Ignored,
  Moved(Option<usize>),
  Hidden,
  Accepted(Replacement),
}

#[derive(Debug, Clone)]
pub struct AutoCompleteSession {
  enabled:         bool,
  items:           Vec<Proposition>,
  selected:        Option<usize>,
  last_input:      Option<String>,
  max_count:       usize,
  fuzzy_threshold: f32,
}

impl AutoCompleteSession {
  pub fn new() -> Self {
    Self {
      enabled:         false,
      items:           Vec::new(),
      selected:        None,
      last_input:      None,
      max_count:       DEFAULT_MAX_VISIBLE,
      fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
    }
  }

  pub fn with_fuzzy_threshold(mut self, threshold: f32) -> Self {
    self.fuzzy_threshold = threshold.clamp(0.0, 1.0);
    self
  }

  pub fn with_max_count(mut self, max_count: usize) -> Self {
    self.max_count = max_count;
    self
  }

  /// Sizes the list to the rows fitting in the popup.
  pub fn set_popup_height(&mut self, popup_height: f32, row_height: f32) {
    self.max_count = max_visible(popup_height, row_height);
  }

  pub fn is_shown(&self) -> bool {
    self.enabled
  }

  pub fn items(&self) -> &[Proposition] {
    &self.items
  }

  pub fn selected(&self) -> Option<usize> {
    self.selected
  }

  pub fn selected_item(&self) -> Option<&Proposition> {
    self.selected.and_then(|index| self.items.get(index))
  }

  pub fn max_count(&self) -> usize {
    self.max_count
  }

  pub fn show(&mut self, aggregator: &Aggregator, ctx: &SearchContext) {
    self.enabled = true;
    self.selected = Some(0);
    self.rebuild(aggregator, ctx);
  }

  /// Rebuilds the list if the query text changed since the last build.
  /// Returns whether a rebuild happened.
  pub fn update(&mut self, aggregator: &Aggregator, ctx: &SearchContext) -> bool {
    if !self.enabled || self.last_input.as_deref() == Some(ctx.search_text.as_str()) {
      return false;
    }
    self.rebuild(aggregator, ctx);
    true
  }

  pub fn hide(&mut self) {
    self.enabled = false;
    self.items.clear();
    self.selected = None;
    self.last_input = None;
  }

  pub fn select_next(&mut self) -> Option<usize> {
    if !self.enabled || self.items.is_empty() {
      return self.selected;
    }
    let next = match self.selected {
      Some(current) if current + 1 < self.items.len() => current + 1,
      _ => 0,
    };
    self.selected = Some(next);
    self.selected
  }

  pub fn select_prev(&mut self) -> Option<usize> {
    if !self.enabled || self.items.is_empty() {
      return self.selected;
    }
    let prev = match self.selected {
      Some(current) if current > 0 => current - 1,
      _ => self.items.len() - 1,
    };
    self.selected = Some(prev);
    self.selected
  }

  /// Inserts the selected proposition into `text` and hides the popup.
  pub fn accept(&mut self, text: &str, cursor: usize) -> Option<Replacement> {
    if !self.enabled {
      return None;
    }
    let replacement = self
      .selected_item()
      .map(|proposition| apply_proposition(text, proposition, cursor));
    self.hide();
    replacement
  }

  pub fn handle_key(&mut self, key: Key, text: &str, cursor: usize) -> KeyOutcome {
    if !self.enabled {
      return KeyOutcome::Ignored;
    }
    match key {
      Key::Up => KeyOutcome::Moved(self.select_prev()),
      Key::Down => KeyOutcome::Moved(self.select_next()),
      Key::Escape => {
        self.hide();
        KeyOutcome::Hidden
      },
      Key::Enter | Key::Tab => {
        match self.accept(text, cursor) {
          Some(replacement) => KeyOutcome::Accepted(replacement),
          None => KeyOutcome::Hidden,
        }
      },
    }
  }

  fn rebuild(&mut self, aggregator: &Aggregator, ctx: &SearchContext) {
    let flags = if ctx.is_query_builder() {
      PropositionFlags::QUERY_BUILDER
    } else {
      PropositionFlags::empty()
    };
    let options = PropositionOptions::new(&ctx.search_text, ctx.cursor, flags);
    let pool = aggregator.fetch(ctx, &options).into_sorted_vec();
    let pool_len = pool.len();

    self.items = build_complete_list(
      pool,
      options.tokens.as_slice(),
      self.max_count,
      self.fuzzy_threshold,
    );
    self.last_input = Some(ctx.search_text.clone());
    self.clamp();

    tracing::debug!(
      query = %ctx.search_text,
      candidates = pool_len,
      shown = self.items.len(),
      "rebuilt completion list"
    );
  }

  fn clamp(&mut self) {
    self.selected = match (self.selected, self.items.len()) {
      (_, 0) => None,
      (Some(index), len) => Some(index.min(len - 1)),
      (None, _) => None,
    };
  }
}

impl Default for AutoCompleteSession {
  fn default() -> Self {
    Self::new()
  }
}
