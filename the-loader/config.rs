use std::path::{
  Path,
  PathBuf,
};

use eyre::{
  Result,
  WrapErr,
};

/// Nesting depth up to which config documents are merged.
pub const MERGE_DEPTH: usize = 3;

/// Global config file merged with the workspace one, workspace winning.
pub fn user_config() -> Result<toml::Value> {
  merged_config([crate::config_file(), crate::workspace_config_file()])
}

/// Folds the existing files of `paths` over an empty table, later files
/// overriding earlier ones. Missing files are skipped.
pub fn merged_config(paths: impl IntoIterator<Item = PathBuf>) -> Result<toml::Value> {
  let empty = toml::Value::Table(toml::Table::new());

  let config = paths
    .into_iter()
    .map(|path| crate::read_toml::<toml::Value>(&path))
    .collect::<Result<Vec<_>>>()
    .wrap_err("failed to load user config")?
    .into_iter()
    .flatten()
    .fold(empty, |a, b| crate::merge_toml_values(a, b, MERGE_DEPTH));

  Ok(config)
}

/// Config from a single explicit file, which must exist.
pub fn file_config(path: &Path) -> Result<toml::Value> {
  crate::read_toml(path)?
    .ok_or_else(|| eyre::eyre!("config file {} does not exist", path.display()))
}
