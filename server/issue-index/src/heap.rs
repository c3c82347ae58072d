//! Binary min-heap producing issues in priority order.
//!
//! Ordering: status code ascending (lower code first); on a status tie,
//! newer `created_at` first.

use std::cmp::Ordering;

use crate::types::Issue;

/// `Less` means `a` is extracted before `b`.
pub fn compare_priority(a: &Issue, b: &Issue) -> Ordering {
  a.status
    .code()
    .cmp(&b.status.code())
    .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Array-backed complete binary tree; each parent compares <= its children.
#[derive(Debug, Default)]
pub struct PriorityHeap {
  items: Vec<Issue>,
}

impl PriorityHeap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear, then insert each issue.
  pub fn build(&mut self, issues: impl IntoIterator<Item = Issue>) {
    self.items.clear();
    for issue in issues {
      self.insert(issue);
    }
  }

  pub fn insert(&mut self, issue: Issue) {
    self.items.push(issue);
    self.sift_up(self.items.len() - 1);
  }

  /// Remove and return the highest-priority issue.
  pub fn extract_min(&mut self) -> Option<Issue> {
    if self.items.is_empty() {
      return None;
    }
    let min = self.items.swap_remove(0);
    if !self.items.is_empty() {
      self.sift_down(0);
    }
    Some(min)
  }

  pub fn peek(&self) -> Option<&Issue> {
    self.items.first()
  }

  /// Drain the heap in priority order.
  pub fn extract_all_sorted(&mut self) -> Vec<Issue> {
    let mut sorted = Vec::with_capacity(self.items.len());
    while let Some(issue) = self.extract_min() {
      sorted.push(issue);
    }
    sorted
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  fn sift_up(&mut self, mut index: usize) {
    while index > 0 {
      let parent = (index - 1) / 2;
      if compare_priority(&self.items[index], &self.items[parent]) != Ordering::Less {
        break;
      }
      self.items.swap(index, parent);
      index = parent;
    }
  }

  fn sift_down(&mut self, mut index: usize) {
    let len = self.items.len();
    loop {
      let left = 2 * index + 1;
      let right = left + 1;
      let mut smallest = index;

      if left < len && compare_priority(&self.items[left], &self.items[smallest]) == Ordering::Less {
        smallest = left;
      }
      if right < len && compare_priority(&self.items[right], &self.items[smallest]) == Ordering::Less {
        smallest = right;
      }
      if smallest == index {
        break;
      }
      self.items.swap(index, smallest);
      index = smallest;
    }
  }

  #[cfg(test)]
  fn is_heap(&self) -> bool {
    (1..self.items.len())
      .all(|i| compare_priority(&self.items[(i - 1) / 2], &self.items[i]) != Ordering::Greater)
  }
}
