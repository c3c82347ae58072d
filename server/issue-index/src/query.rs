//! Filtered, priority-ordered listings.
//!
//! Candidates come from the tree (one search for an ID filter, otherwise the
//! full in-order scan), are narrowed by each populated predicate in turn, then
//! reordered through a scratch heap.

use crate::avl::IssueTree;
use crate::heap::PriorityHeap;
use crate::types::{Issue, IssueFilter};

/// Issues matching every predicate in `filter`, in priority order.
pub fn filtered_and_sorted(tree: &IssueTree, filter: &IssueFilter) -> Vec<Issue> {
  let mut candidates: Vec<&Issue> = match filter.id {
    Some(id) => tree.search(id).into_iter().collect(),
    None => tree.in_order(),
  };

  if let Some(category) = filter.category() {
    candidates.retain(|i| i.category == category);
  }
  if let Some(status) = filter.status {
    candidates.retain(|i| i.status == status);
  }
  if let Some(day) = filter.date {
    candidates.retain(|i| i.created_at.date_naive() == day);
  }
  if let Some(start) = filter.start_date {
    candidates.retain(|i| i.created_at.date_naive() >= start);
  }
  if let Some(end) = filter.end_date {
    candidates.retain(|i| i.created_at.date_naive() <= end);
  }

  if candidates.is_empty() {
    return Vec::new();
  }

  let mut heap = PriorityHeap::new();
  heap.build(candidates.into_iter().cloned());
  heap.extract_all_sorted()
}
