//! Similarity graph: links reports that likely describe the same incident.
//!
//! Two reports are linked when their categories match exactly and they were
//! created within the similarity window of each other. Edges are decided once,
//! when a report is added, and adjacency is kept symmetric.

use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::types::Issue;

/// Edge rule: same category and `|created_a - created_b| <= window`.
pub fn is_similar(a: &Issue, b: &Issue, window: Duration) -> bool {
  a.category == b.category && gap(a.created_at, b.created_at) <= window
}

fn gap(a: DateTime<Utc>, b: DateTime<Utc>) -> Duration {
  if a >= b {
    a - b
  } else {
    b - a
  }
}

/// Undirected adjacency over issue IDs plus a snapshot of each issue.
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
  window: Duration,
  adjacency: BTreeMap<u64, BTreeSet<u64>>,
  reports: BTreeMap<u64, Issue>,
}

impl SimilarityGraph {
  pub fn new(window: Duration) -> Self {
    Self {
      window,
      adjacency: BTreeMap::new(),
      reports: BTreeMap::new(),
    }
  }

  /// Clear, then add every issue in iteration order. O(n^2).
  pub fn build(&mut self, issues: impl IntoIterator<Item = Issue>) {
    self.adjacency.clear();
    self.reports.clear();
    for issue in issues {
      self.add_report(issue);
    }
  }

  /// Store the snapshot and link it to every similar stored report.
  pub fn add_report(&mut self, issue: Issue) {
    let id = issue.id;
    self.adjacency.entry(id).or_default();

    let similar: Vec<u64> = self
      .reports
      .values()
      .filter(|other| other.id != id && is_similar(&issue, other, self.window))
      .map(|other| other.id)
      .collect();

    for other in similar {
      self.add_edge(id, other);
    }
    self.reports.insert(id, issue);
  }

  fn add_edge(&mut self, a: u64, b: u64) {
    self.adjacency.entry(a).or_default().insert(b);
    self.adjacency.entry(b).or_default().insert(a);
  }

  /// Replace the stored snapshot of a known report. Adjacency is left as is.
  pub fn update_report(&mut self, issue: Issue) {
    if let Some(slot) = self.reports.get_mut(&issue.id) {
      *slot = issue;
    }
  }

  /// Every report reachable from `id`, in breadth-first discovery order,
  /// excluding `id` itself. Unknown IDs yield nothing.
  pub fn related_reports(&self, id: u64) -> Vec<&Issue> {
    let mut results = Vec::new();
    if !self.adjacency.contains_key(&id) {
      return results;
    }

    let mut visited = BTreeSet::from([id]);
    let mut queue = VecDeque::from([id]);

    while let Some(current) = queue.pop_front() {
      let neighbors = match self.adjacency.get(&current) {
        Some(n) => n,
        None => continue,
      };
      for &neighbor in neighbors {
        if visited.insert(neighbor) {
          queue.push_back(neighbor);
          if let Some(report) = self.reports.get(&neighbor) {
            results.push(report);
          }
        }
      }
    }

    results
  }

  /// Partition every known report into connected components, depth-first.
  /// Components come out in ascending order of their smallest ID.
  pub fn connected_components(&self) -> Vec<Vec<&Issue>> {
    let mut components = Vec::new();
    let mut visited = BTreeSet::new();

    for &start in self.adjacency.keys() {
      if visited.contains(&start) {
        continue;
      }
      let mut cluster = Vec::new();
      let mut stack = vec![start];
      while let Some(current) = stack.pop() {
        if !visited.insert(current) {
          continue;
        }
        if let Some(report) = self.reports.get(&current) {
          cluster.push(report);
        }
        if let Some(neighbors) = self.adjacency.get(&current) {
          // Reverse so the smallest neighbor is explored first.
          stack.extend(neighbors.iter().rev().filter(|n| !visited.contains(*n)));
        }
      }
      components.push(cluster);
    }

    components
  }

  /// Number of direct neighbors of `id` (0 when unknown).
  pub fn related_count(&self, id: u64) -> usize {
    self.adjacency.get(&id).map_or(0, BTreeSet::len)
  }

  pub fn neighbors(&self, id: u64) -> impl Iterator<Item = u64> + '_ {
    self.adjacency.get(&id).into_iter().flatten().copied()
  }

  pub fn snapshot(&self, id: u64) -> Option<&Issue> {
    self.reports.get(&id)
  }

  pub fn len(&self) -> usize {
    self.reports.len()
  }

  pub fn is_empty(&self) -> bool {
    self.reports.is_empty()
  }

  #[cfg(test)]
  pub(crate) fn is_symmetric(&self) -> bool {
    self.adjacency.iter().all(|(a, set)| {
      set.iter().all(|b| {
        self
          .adjacency
          .get(b)
          .map_or(false, |back| back.contains(a))
      })
    })
  }
}
