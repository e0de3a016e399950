pub mod config;

use std::{
  fs,
  path::{
    Path,
    PathBuf,
  },
  sync::OnceLock,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};
use eyre::{
  Result,
  WrapErr,
};
use serde::{
  Serialize,
  de::DeserializeOwned,
};

const APP_DIR: &str = "the-search";

/// Name of the per-workspace config directory.
pub const WORKSPACE_DIR: &str = ".the-search";

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

pub fn config_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("THE_SEARCH_CONFIG_DIR") {
    return expand_tilde(Path::new(&dir));
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.config_dir().join(APP_DIR),
    Err(err) => {
      log::warn!("unable to find the config directory: {err}");
      PathBuf::from(WORKSPACE_DIR)
    },
  }
}

pub fn cache_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("THE_SEARCH_CACHE_DIR") {
    return expand_tilde(Path::new(&dir));
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.cache_dir().join(APP_DIR),
    Err(err) => {
      log::warn!("unable to find the cache directory: {err}");
      PathBuf::from(WORKSPACE_DIR)
    },
  }
}

pub fn config_file() -> PathBuf {
  CONFIG_FILE.get_or_init(default_config_file).clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

pub fn default_log_file() -> PathBuf {
  cache_dir().join("the-search.log")
}

/// Where the recent-search list is persisted between runs.
pub fn recent_file() -> PathBuf {
  cache_dir().join("recent.toml")
}

pub fn workspace_config_file() -> PathBuf {
  find_workspace().0.join(WORKSPACE_DIR).join("config.toml")
}

/// Finds the current workspace folder.
///
/// Searches upward from the CWD and returns the first directory containing
/// `.git`, `.svn`, `.jj` or `.the-search`. If none is found returns
/// `(CWD, true)`, otherwise `(workspace, false)`.
pub fn find_workspace() -> (PathBuf, bool) {
  match std::env::current_dir() {
    Ok(current_dir) => find_workspace_in(current_dir),
    Err(_) => (PathBuf::new(), true),
  }
}

pub fn find_workspace_in(dir: impl AsRef<Path>) -> (PathBuf, bool) {
  let dir = dir.as_ref();
  for ancestor in dir.ancestors() {
    if ancestor.join(".git").exists()
      || ancestor.join(".svn").exists()
      || ancestor.join(".jj").exists()
      || ancestor.join(WORKSPACE_DIR).exists()
    {
      return (ancestor.to_owned(), false);
    }
  }

  (dir.to_owned(), true)
}

/// Replaces a leading `~` with the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let mut components = path.components();
  if let Some(std::path::Component::Normal(first)) = components.next()
    && first == "~"
    && let Ok(home) = etcetera::home_dir()
  {
    return home.join(components.as_path());
  }
  path.to_owned()
}

/// Reads a TOML file into `T`. A missing file is `Ok(None)`.
pub fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
  let source = match fs::read_to_string(path) {
    Ok(source) => source,
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
    Err(err) => return Err(err).wrap_err_with(|| format!("failed to read {}", path.display())),
  };
  toml::from_str(&source)
    .map(Some)
    .wrap_err_with(|| format!("failed to parse {}", path.display()))
}

/// Writes `value` as TOML, creating parent directories as needed.
pub fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  ensure_parent_dir(path);
  let source = toml::to_string(value).wrap_err("failed to serialize value")?;
  fs::write(path, source).wrap_err_with(|| format!("failed to write {}", path.display()))
}

/// Merge two TOML documents, merging values from `right` onto `left`
///
/// `merge_depth` sets the nesting depth up to which values are merged instead
/// of overridden.
///
/// When a table exists in both `left` and `right`, the merged table consists of
/// all keys in `left`'s table unioned with all keys in `right` with the values
/// of `right` being merged recursively onto values of `left`. Array entries
/// that are tables are matched by their `id` key, or `name` when there is no
/// `id`.
///
/// `crate::merge_toml_values(a, b, 3)` combines, for example:
///
/// a:
/// ```toml
/// [[provider]]
/// id = "dir"
/// filter-id = "dir:"
/// propositions = ["dir:Assets"]
/// ```
/// b:
/// ```toml
/// [[provider]]
/// id = "dir"
/// priority = 4
/// ```
///
/// into:
/// ```toml
/// [[provider]]
/// id = "dir"
/// filter-id = "dir:"
/// propositions = ["dir:Assets"]
/// priority = 4
/// ```
pub fn merge_toml_values(left: toml::Value, right: toml::Value, merge_depth: usize) -> toml::Value {
  use toml::Value;

  fn get_key(v: &Value) -> Option<&str> {
    v.get("id")
      .or_else(|| v.get("name"))
      .and_then(Value::as_str)
  }

  match (left, right) {
    (Value::Array(mut left_items), Value::Array(right_items)) => {
      if merge_depth > 0 {
        left_items.reserve(right_items.len());
        for rvalue in right_items {
          let lvalue = get_key(&rvalue)
            .and_then(|rkey| left_items.iter().position(|v| get_key(v) == Some(rkey)))
            .map(|lpos| left_items.remove(lpos));
          let mvalue = match lvalue {
            Some(lvalue) => merge_toml_values(lvalue, rvalue, merge_depth - 1),
            None => rvalue,
          };
          left_items.push(mvalue);
        }
        Value::Array(left_items)
      } else {
        Value::Array(right_items)
      }
    },
    (Value::Table(mut left_map), Value::Table(right_map)) => {
      if merge_depth > 0 {
        for (rname, rvalue) in right_map {
          match left_map.remove(&rname) {
            Some(lvalue) => {
              let merged_value = merge_toml_values(lvalue, rvalue, merge_depth - 1);
              left_map.insert(rname, merged_value);
            },
            None => {
              left_map.insert(rname, rvalue);
            },
          }
        }
        Value::Table(left_map)
      } else {
        Value::Table(right_map)
      }
    },
    (_, value) => value,
  }
}

fn ensure_parent_dir(path: &Path) {
  if let Some(parent) = path.parent()
    && !parent.exists()
  {
    fs::create_dir_all(parent).ok();
  }
}

#[cfg(test)]
mod test {
  use std::collections::BTreeMap;

  use super::*;

  #[test]
  fn workspace_is_found_from_nested_dir() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join(WORKSPACE_DIR)).unwrap();
    let nested = root.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    let (found, fallback) = find_workspace_in(&nested);
    assert_eq!(found, root.path());
    assert!(!fallback);
  }

  #[test]
  fn missing_toml_file_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let value: Option<toml::Value> = read_toml(&dir.path().join("nope.toml")).unwrap();
    assert!(value.is_none());
  }

  #[test]
  fn toml_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.toml");
    let mut state = BTreeMap::new();
    state.insert("entries".to_string(), vec!["t:prefab".to_string()]);

    write_toml(&path, &state).unwrap();
    let back: BTreeMap<String, Vec<String>> = read_toml(&path).unwrap().unwrap();
    assert_eq!(back, state);
  }

  #[test]
  fn broken_toml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "this is = = not toml").unwrap();
    assert!(read_toml::<toml::Value>(&path).is_err());
  }

  #[test]
  fn plain_paths_are_not_expanded() {
    assert_eq!(expand_tilde(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
    assert_eq!(expand_tilde(Path::new("a/~")), PathBuf::from("a/~"));
  }
}
