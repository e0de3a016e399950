//! Command line host for the-search.
//!
//! Runs one auto-complete round for a query and prints the ranked
//! propositions, optionally feeding navigation keys to the popup and
//! accepting a proposition.

mod cli;
mod host;
mod logging;

use eyre::{
  Result,
  WrapErr,
};
use the_search_lib::{
  config::SearchConfig,
  session::KeyOutcome,
  sources::RecentSearches,
};

use crate::{
  cli::Cli,
  host::Host,
};

fn main() -> Result<()> {
  let cli = Cli::parse_args();

  the_search_loader::initialize_log_file(cli.log_file.clone());
  logging::setup_logging(cli.verbosity).wrap_err("failed to set up logging")?;

  let value = match &cli.config_file {
    Some(path) => the_search_loader::config::file_config(path)?,
    None => {
      the_search_loader::initialize_config_file(None);
      the_search_loader::config::user_config()?
    },
  };
  let config = SearchConfig::from_toml(value).wrap_err("invalid configuration")?;

  let recent = load_recent(config.recent_capacity);
  let mut host = Host::new(&config, recent).wrap_err("failed to build providers")?;

  let cursor = cli.cursor.unwrap_or_else(|| cli.query.chars().count());
  let ctx = host.context(&cli.query, cursor, cli.filter.as_deref(), cli.search_flags());
  host.show(&ctx);

  let mut accepted = None;
  for key in &cli.keys {
    match host.handle_key((*key).into(), &cli.query, cursor) {
      KeyOutcome::Accepted(replacement) => {
        accepted = Some(replacement);
        break;
      },
      KeyOutcome::Hidden | KeyOutcome::Ignored => break,
      KeyOutcome::Moved(_) => {},
    }
  }
  if accepted.is_none()
    && let Some(index) = cli.accept
  {
    accepted = Some(host.accept_at(index, &cli.query, cursor)?);
  }

  match &accepted {
    Some(replacement) => {
      println!("{}", replacement.text);
      println!("cursor: {}", replacement.cursor);
    },
    None => {
      for line in host.lines() {
        println!("{line}");
      }
    },
  }

  if cli.remember {
    let query = accepted.map_or_else(|| cli.query.clone(), |replacement| replacement.text);
    host.remember(query);
  }
  host.finish();

  Ok(())
}

fn load_recent(capacity: usize) -> RecentSearches {
  let mut recent = RecentSearches::new(capacity);
  match the_search_loader::read_toml::<RecentSearches>(&the_search_loader::recent_file()) {
    Ok(Some(stored)) => {
      let entries: Vec<&str> = stored.iter().collect();
      for entry in entries.into_iter().rev() {
        recent.push(entry);
      }
    },
    Ok(None) => {},
    Err(err) => log::warn!("ignoring recent searches: {err:#}"),
  }
  recent
}
