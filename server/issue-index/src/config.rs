//! Engine configuration with sane defaults.

use std::path::PathBuf;

use crate::error::IndexError;

/// Tunables for the index and its host.
#[derive(Debug, Clone)]
pub struct Config {
  /// Max gap in days between two same-category reports for them to be linked.
  pub similarity_window_days: i64,
  /// Default tracing filter when `RUST_LOG` is unset.
  pub log_filter: String,
  /// JSON array of issues to seed the index with at startup.
  pub seed_path: Option<PathBuf>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      similarity_window_days: 3,
      log_filter: "info".to_string(),
      seed_path: None,
    }
  }
}

impl Config {
  /// Defaults overlaid with `ISSUE_INDEX_SIMILARITY_DAYS`, `ISSUE_INDEX_LOG`
  /// and `ISSUE_INDEX_SEED`.
  pub fn from_env() -> Result<Self, IndexError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IndexError> {
    let mut config = Self::default();

    if let Some(raw) = lookup("ISSUE_INDEX_SIMILARITY_DAYS") {
      let days: i64 = raw
        .trim()
        .parse()
        .map_err(|e| IndexError::validation("ISSUE_INDEX_SIMILARITY_DAYS", &format!("not an integer: {}", e)))?;
      if !(0..=3650).contains(&days) {
        return Err(IndexError::validation(
          "ISSUE_INDEX_SIMILARITY_DAYS",
          "expected 0..=3650",
        ));
      }
      config.similarity_window_days = days;
    }

    if let Some(filter) = lookup("ISSUE_INDEX_LOG").filter(|f| !f.trim().is_empty()) {
      config.log_filter = filter;
    }

    if let Some(path) = lookup("ISSUE_INDEX_SEED").filter(|p| !p.trim().is_empty()) {
      config.seed_path = Some(PathBuf::from(path));
    }

    Ok(config)
  }

  /// The similarity window as a duration.
  pub fn similarity_window(&self) -> chrono::Duration {
    chrono::Duration::days(self.similarity_window_days)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    move |key: &str| map.get(key).cloned()
  }

  #[test]
  fn defaults_without_env() {
    let config = Config::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.similarity_window_days, 3);
    assert_eq!(config.log_filter, "info");
    assert!(config.seed_path.is_none());
  }

  #[test]
  fn env_overrides_apply() {
    let config = Config::from_lookup(lookup_from(&[
      ("ISSUE_INDEX_SIMILARITY_DAYS", "5"),
      ("ISSUE_INDEX_LOG", "debug"),
      ("ISSUE_INDEX_SEED", "/tmp/issues.json"),
    ]))
    .unwrap();
    assert_eq!(config.similarity_window_days, 5);
    assert_eq!(config.log_filter, "debug");
    assert_eq!(config.seed_path, Some(PathBuf::from("/tmp/issues.json")));
  }

  #[test]
  fn bad_window_is_rejected() {
    let err = Config::from_lookup(lookup_from(&[("ISSUE_INDEX_SIMILARITY_DAYS", "three")])).unwrap_err();
    assert!(err.to_string().contains("ISSUE_INDEX_SIMILARITY_DAYS"));
    let err = Config::from_lookup(lookup_from(&[("ISSUE_INDEX_SIMILARITY_DAYS", "-1")])).unwrap_err();
    assert!(err.to_string().contains("0..=3650"));
  }
}
