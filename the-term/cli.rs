use std::path::PathBuf;

use clap::{
  ArgAction,
  Parser,
  ValueEnum,
};
use the_search_lib::{
  provider::SearchFlags,
  session::Key,
};

#[derive(Parser, Debug)]
#[command(name = "the-search", about, long_about = None)]
pub struct Cli {
  /// Query text to complete
  #[arg(default_value = "")]
  pub query: String,

  /// Cursor position in chars (defaults to the end of the query)
  #[arg(long)]
  pub cursor: Option<usize>,

  /// Only ask providers with this filter id
  #[arg(long, value_name = "FILTER")]
  pub filter: Option<String>,

  /// Complete as the query builder would
  #[arg(long)]
  pub builder: bool,

  /// Leave recent and saved searches out
  #[arg(long)]
  pub debug: bool,

  /// Keys fed to the popup before printing, comma separated
  #[arg(long, value_enum, value_delimiter = ',')]
  pub keys: Vec<KeyArg>,

  /// Accept the proposition at this index and print the new query
  #[arg(long, value_name = "INDEX")]
  pub accept: Option<usize>,

  /// Add the final query to the recent searches
  #[arg(long)]
  pub remember: bool,

  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  pub verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE")]
  pub log_file: Option<PathBuf>,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  pub config_file: Option<PathBuf>,
}

impl Cli {
  pub fn parse_args() -> Self {
    Self::parse()
  }

  pub fn search_flags(&self) -> SearchFlags {
    let mut flags = SearchFlags::empty();
    flags.set(SearchFlags::QUERY_BUILDER, self.builder);
    flags.set(SearchFlags::DEBUG, self.debug);
    flags
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KeyArg {
  Up,
  Down,
  Tab,
  Enter,
  Esc,
}

impl From<KeyArg> for Key {
  fn from(key: KeyArg) -> Self {
    match key {
      KeyArg::Up => Key::Up,
      KeyArg::Down => Key::Down,
      KeyArg::Tab => Key::Tab,
      KeyArg::Enter => Key::Enter,
      KeyArg::Esc => Key::Escape,
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn parses_keys_and_flags() {
    let cli = Cli::try_parse_from([
      "the-search",
      "t:pre",
      "--keys",
      "down,down,tab",
      "--builder",
      "-vv",
    ])
    .unwrap();
    assert_eq!(cli.query, "t:pre");
    assert_eq!(cli.keys, vec![KeyArg::Down, KeyArg::Down, KeyArg::Tab]);
    assert_eq!(cli.verbosity, 2);
    assert_eq!(cli.search_flags(), SearchFlags::QUERY_BUILDER);
  }

  #[test]
  fn query_defaults_to_empty() {
    let cli = Cli::try_parse_from(["the-search"]).unwrap();
    assert!(cli.query.is_empty());
    assert!(cli.cursor.is_none());
    assert!(cli.search_flags().is_empty());
  }
}
