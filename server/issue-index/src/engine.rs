//! Core engine: owns the tree and graph, applies write events, answers reads.

use std::collections::HashSet;

use crate::avl::IssueTree;
use crate::cluster;
use crate::config::Config;
use crate::error::IndexError;
use crate::graph::SimilarityGraph;
use crate::query;
use crate::source::IssueSource;
use crate::stats;
use crate::types::*;

/// The issue index. Tree and graph are only ever mutated together, so every
/// write is visible to both or to neither.
#[derive(Debug)]
pub struct Engine {
  config: Config,
  tree: IssueTree,
  graph: SimilarityGraph,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    let graph = SimilarityGraph::new(config.similarity_window());
    Self {
      config,
      tree: IssueTree::new(),
      graph,
    }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Clear and repopulate from the full issue collection.
  ///
  /// Duplicate IDs are skipped (first occurrence wins). Returns the number of
  /// issues indexed.
  pub fn build(&mut self, issues: impl IntoIterator<Item = Issue>) -> usize {
    let mut seen = HashSet::new();
    let mut accepted = Vec::new();
    for issue in issues {
      if seen.insert(issue.id) {
        accepted.push(issue);
      } else {
        tracing::warn!(issue_id = issue.id, "duplicate issue id in seed; skipped");
      }
    }

    let loaded = accepted.len();
    self.tree.build(accepted.iter().cloned());
    self.graph.build(accepted);
    tracing::info!(issues = loaded, "index built");
    loaded
  }

  /// Rebuild from the backing store. On a load error the current index is
  /// left untouched.
  pub fn rebuild_from(&mut self, source: &dyn IssueSource) -> Result<usize, IndexError> {
    let issues = source.load_all()?;
    Ok(self.build(issues))
  }

  /// "Issue created": index a new issue in the tree and the graph.
  pub fn create(&mut self, issue: Issue) -> Result<(), IndexError> {
    if self.tree.contains(issue.id) {
      return Err(IndexError::DuplicateId(issue.id));
    }
    let id = issue.id;
    self.tree.insert(issue.clone());
    self.graph.add_report(issue);
    tracing::debug!(issue_id = id, related = self.graph.related_count(id), "issue indexed");
    Ok(())
  }

  /// "Issue status changed": returns the updated issue.
  ///
  /// Status only moves forward (submitted, in progress, resolved); setting the
  /// current status again is a no-op.
  pub fn update_status(&mut self, id: u64, status: IssueStatus) -> Result<Issue, IndexError> {
    let current = self.tree.search(id).ok_or(IndexError::UnknownIssue(id))?;
    if current.status == status {
      return Ok(current.clone());
    }
    if !current.status.can_transition_to(status) {
      return Err(IndexError::InvalidTransition {
        id,
        from: current.status,
        to: status,
      });
    }

    let mut updated = current.clone();
    updated.status = status;
    self.apply_update(updated.clone());
    tracing::debug!(issue_id = id, status = status.display_name(), "issue status updated");
    Ok(updated)
  }

  /// Replace the stored fields of an existing issue. `category` and
  /// `created_at` decide graph edges and must not change.
  pub fn update_issue(&mut self, issue: Issue) -> Result<(), IndexError> {
    let current = self.tree.search(issue.id).ok_or(IndexError::UnknownIssue(issue.id))?;
    if current.category != issue.category {
      return Err(IndexError::ImmutableField {
        id: issue.id,
        field: "category",
      });
    }
    if current.created_at != issue.created_at {
      return Err(IndexError::ImmutableField {
        id: issue.id,
        field: "created_at",
      });
    }
    if current.status != issue.status && !current.status.can_transition_to(issue.status) {
      return Err(IndexError::InvalidTransition {
        id: issue.id,
        from: current.status,
        to: issue.status,
      });
    }

    let id = issue.id;
    self.apply_update(issue);
    tracing::debug!(issue_id = id, "issue updated");
    Ok(())
  }

  fn apply_update(&mut self, issue: Issue) {
    self.tree.update(issue.clone());
    self.graph.update_report(issue);
  }

  pub fn get(&self, id: u64) -> Option<&Issue> {
    self.tree.search(id)
  }

  /// Issues matching `filter`, in priority order.
  pub fn query(&self, filter: &IssueFilter) -> Vec<Issue> {
    query::filtered_and_sorted(&self.tree, filter)
  }

  /// Everything transitively linked to `id`, breadth-first.
  pub fn related(&self, id: u64) -> Vec<Issue> {
    self.graph.related_reports(id).into_iter().cloned().collect()
  }

  /// Direct links of `id`.
  pub fn related_count(&self, id: u64) -> usize {
    self.graph.related_count(id)
  }

  pub fn count(&self) -> usize {
    self.tree.count()
  }

  pub fn stats(&self) -> IndexStats {
    stats::compute(self.tree.iter())
  }

  pub fn clusters(&self) -> Vec<IssueCluster> {
    cluster::summarize(self.graph.connected_components())
  }

  pub fn tree(&self) -> &IssueTree {
    &self.tree
  }

  pub fn graph(&self) -> &SimilarityGraph {
    &self.graph
  }
}

impl Default for Engine {
  fn default() -> Self {
    Self::with_defaults()
  }
}
