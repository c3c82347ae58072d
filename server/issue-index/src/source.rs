//! Backing-store seam: where the full issue collection comes from at startup.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IndexError;
use crate::normalize;
use crate::types::{InboundIssue, Issue};

/// Supplies every issue the index should be rebuilt from.
pub trait IssueSource {
  fn load_all(&self) -> Result<Vec<Issue>, IndexError>;
}

impl IssueSource for Vec<Issue> {
  fn load_all(&self) -> Result<Vec<Issue>, IndexError> {
    Ok(self.clone())
  }
}

/// A JSON file holding an array of inbound issue records (a store export).
#[derive(Debug, Clone)]
pub struct JsonFileSource {
  path: PathBuf,
}

impl JsonFileSource {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl IssueSource for JsonFileSource {
  fn load_all(&self) -> Result<Vec<Issue>, IndexError> {
    let raw = fs::read_to_string(&self.path)?;
    let records: Vec<InboundIssue> = serde_json::from_str(&raw)?;
    records.iter().map(normalize::normalize_issue).collect()
  }
}
