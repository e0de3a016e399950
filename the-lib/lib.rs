//! Proposition engine behind the quick-search auto-complete popup.
//!
//! Data flows from the query under the cursor to a bounded, ranked list and
//! back into the query:
//!
//! 1. [`options::PropositionOptions`] tokenizes the query around the cursor.
//! 2. [`aggregator::Aggregator`] collects propositions from built-in sources
//!    and providers into a deduplicated set.
//! 3. [`ranking::build_complete_list`] narrows the set to what fits the popup.
//! 4. [`replace::apply_proposition`] writes the chosen proposition back.
//!
//! [`session::AutoCompleteSession`] ties these together for one popup.

pub mod aggregator;
pub mod config;
pub mod fuzzy;
pub mod help;
pub mod options;
pub mod proposition;
pub mod provider;
pub mod ranking;
pub mod replace;
pub mod session;
pub mod sources;
pub mod tokenizer;
