//! Thread-safe handle: one lock around the whole engine.
//!
//! Writers take the write lock once per event, so a created issue appears in
//! the tree and the graph together. Readers share the read lock; the heap a
//! query builds is local to that call.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::engine::Engine;
use crate::error::IndexError;
use crate::source::IssueSource;
use crate::types::*;

#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
  inner: Arc<RwLock<Engine>>,
}

impl SharedEngine {
  pub fn new(engine: Engine) -> Self {
    Self {
      inner: Arc::new(RwLock::new(engine)),
    }
  }

  pub fn build(&self, issues: Vec<Issue>) -> usize {
    self.inner.write().build(issues)
  }

  pub fn rebuild_from(&self, source: &dyn IssueSource) -> Result<usize, IndexError> {
    // Load outside the lock; only the swap-in blocks readers.
    let issues = source.load_all()?;
    Ok(self.inner.write().build(issues))
  }

  pub fn create(&self, issue: Issue) -> Result<(), IndexError> {
    self.inner.write().create(issue)
  }

  pub fn update_status(&self, id: u64, status: IssueStatus) -> Result<Issue, IndexError> {
    self.inner.write().update_status(id, status)
  }

  pub fn update_issue(&self, issue: Issue) -> Result<(), IndexError> {
    self.inner.write().update_issue(issue)
  }

  pub fn get(&self, id: u64) -> Option<Issue> {
    self.inner.read().get(id).cloned()
  }

  pub fn query(&self, filter: &IssueFilter) -> Vec<Issue> {
    self.inner.read().query(filter)
  }

  pub fn related(&self, id: u64) -> Vec<Issue> {
    self.inner.read().related(id)
  }

  pub fn related_count(&self, id: u64) -> usize {
    self.inner.read().related_count(id)
  }

  pub fn count(&self) -> usize {
    self.inner.read().count()
  }

  pub fn stats(&self) -> IndexStats {
    self.inner.read().stats()
  }

  pub fn clusters(&self) -> Vec<IssueCluster> {
    self.inner.read().clusters()
  }

  /// Run `f` against a consistent view of the engine.
  pub fn with_read<R>(&self, f: impl FnOnce(&Engine) -> R) -> R {
    f(&self.inner.read())
  }
}
