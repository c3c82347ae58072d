//! Balanced search index: AVL tree of issues keyed by issue ID.
//!
//! Point operations are O(log n). The in-order walk is the canonical
//! ascending-ID ordering used by unfiltered listings.

use std::cmp::Ordering;

use crate::types::Issue;

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
  issue: Issue,
  height: i32,
  left: Link,
  right: Link,
}

impl Node {
  fn new(issue: Issue) -> Box<Self> {
    Box::new(Self {
      issue,
      height: 1,
      left: None,
      right: None,
    })
  }

  fn key(&self) -> u64 {
    self.issue.id
  }

  fn update_height(&mut self) {
    self.height = 1 + height(&self.left).max(height(&self.right));
  }

  /// height(left) - height(right)
  fn balance_factor(&self) -> i32 {
    height(&self.left) - height(&self.right)
  }
}

fn height(link: &Link) -> i32 {
  link.as_ref().map_or(0, |n| n.height)
}

fn balance_factor(link: &Link) -> i32 {
  link.as_ref().map_or(0, |n| n.balance_factor())
}

fn rotate_right(mut y: Box<Node>) -> Box<Node> {
  let mut x = match y.left.take() {
    Some(x) => x,
    None => return y,
  };
  y.left = x.right.take();
  y.update_height();
  x.right = Some(y);
  x.update_height();
  x
}

fn rotate_left(mut x: Box<Node>) -> Box<Node> {
  let mut y = match x.right.take() {
    Some(y) => y,
    None => return x,
  };
  x.right = y.left.take();
  x.update_height();
  y.left = Some(x);
  y.update_height();
  y
}

/// Recompute the height of `node` and apply whichever of the four rotation
/// cases its balance factor (and its heavier child's) calls for.
fn rebalance(mut node: Box<Node>) -> Box<Node> {
  node.update_height();
  let balance = node.balance_factor();

  if balance > 1 {
    // Left-right: straighten the left child first.
    if balance_factor(&node.left) < 0 {
      node.left = node.left.take().map(rotate_left);
    }
    return rotate_right(node);
  }

  if balance < -1 {
    // Right-left: straighten the right child first.
    if balance_factor(&node.right) > 0 {
      node.right = node.right.take().map(rotate_right);
    }
    return rotate_left(node);
  }

  node
}

fn insert_rec(link: Link, issue: Issue, inserted: &mut bool) -> Box<Node> {
  let mut node = match link {
    Some(node) => node,
    None => {
      *inserted = true;
      return Node::new(issue);
    }
  };

  match issue.id.cmp(&node.key()) {
    Ordering::Less => node.left = Some(insert_rec(node.left.take(), issue, inserted)),
    Ordering::Greater => node.right = Some(insert_rec(node.right.take(), issue, inserted)),
    Ordering::Equal => return node,
  }

  rebalance(node)
}

fn remove_rec(link: Link, id: u64) -> Link {
  let mut node = link?;

  match id.cmp(&node.key()) {
    Ordering::Less => node.left = remove_rec(node.left.take(), id),
    Ordering::Greater => node.right = remove_rec(node.right.take(), id),
    Ordering::Equal => match (node.left.take(), node.right.take()) {
      (None, right) => return right,
      (left, None) => return left,
      (left, Some(right)) => {
        // Two children: take over the in-order successor's payload and
        // remove it from the right subtree.
        let (rest, successor) = take_min(right);
        node.issue = successor;
        node.left = left;
        node.right = rest;
      }
    },
  }

  Some(rebalance(node))
}

/// Detach the minimum issue of a subtree, rebalancing on the way back up.
fn take_min(mut node: Box<Node>) -> (Link, Issue) {
  match node.left.take() {
    Some(left) => {
      let (rest, min) = take_min(left);
      node.left = rest;
      (Some(rebalance(node)), min)
    }
    None => {
      let Node { issue, right, .. } = *node;
      (right, issue)
    }
  }
}

fn count_rec(link: &Link) -> usize {
  match link {
    Some(node) => 1 + count_rec(&node.left) + count_rec(&node.right),
    None => 0,
  }
}

/// AVL tree of issues keyed by `Issue::id`.
#[derive(Debug, Default)]
pub struct IssueTree {
  root: Link,
}

impl IssueTree {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reset, then insert each issue in iteration order.
  pub fn build(&mut self, issues: impl IntoIterator<Item = Issue>) {
    self.root = None;
    for issue in issues {
      self.insert(issue);
    }
  }

  /// Insert `issue`. Returns `false` (and leaves the tree untouched) when an
  /// issue with the same ID is already present.
  pub fn insert(&mut self, issue: Issue) -> bool {
    let mut inserted = false;
    self.root = Some(insert_rec(self.root.take(), issue, &mut inserted));
    inserted
  }

  pub fn search(&self, id: u64) -> Option<&Issue> {
    let mut cursor = self.root.as_deref();
    while let Some(node) = cursor {
      cursor = match id.cmp(&node.key()) {
        Ordering::Equal => return Some(&node.issue),
        Ordering::Less => node.left.as_deref(),
        Ordering::Greater => node.right.as_deref(),
      };
    }
    None
  }

  pub fn contains(&self, id: u64) -> bool {
    self.search(id).is_some()
  }

  /// Replace the stored payload for `issue.id` by deleting and re-inserting.
  /// An unknown ID ends up inserted.
  pub fn update(&mut self, issue: Issue) {
    self.root = remove_rec(self.root.take(), issue.id);
    self.insert(issue);
  }

  /// Issues in ascending ID order.
  pub fn in_order(&self) -> Vec<&Issue> {
    self.iter().collect()
  }

  pub fn iter(&self) -> InOrderIter<'_> {
    let mut iter = InOrderIter { stack: Vec::new() };
    iter.push_left(self.root.as_deref());
    iter
  }

  /// Number of issues, by full traversal.
  pub fn count(&self) -> usize {
    count_rec(&self.root)
  }

  pub fn is_empty(&self) -> bool {
    self.root.is_none()
  }

  /// Height of the root (0 for an empty tree).
  pub fn height(&self) -> i32 {
    height(&self.root)
  }

  /// Check key ordering, stored heights and balance of every node.
  #[cfg(test)]
  pub(crate) fn check_invariants(&self) -> Result<(), String> {
    fn walk(link: &Link, lo: Option<u64>, hi: Option<u64>) -> Result<i32, String> {
      let node = match link {
        Some(node) => node,
        None => return Ok(0),
      };
      let key = node.key();
      if lo.map_or(false, |lo| key <= lo) || hi.map_or(false, |hi| key >= hi) {
        return Err(format!("key {} out of order", key));
      }
      let lh = walk(&node.left, lo, Some(key))?;
      let rh = walk(&node.right, Some(key), hi)?;
      if (lh - rh).abs() > 1 {
        return Err(format!("node {} unbalanced: {} vs {}", key, lh, rh));
      }
      let h = 1 + lh.max(rh);
      if h != node.height {
        return Err(format!("node {} stores height {} but is {}", key, node.height, h));
      }
      Ok(h)
    }
    walk(&self.root, None, None).map(|_| ())
  }
}

/// Borrowing in-order iterator over an [`IssueTree`].
pub struct InOrderIter<'a> {
  stack: Vec<&'a Node>,
}

impl<'a> InOrderIter<'a> {
  fn push_left(&mut self, mut cursor: Option<&'a Node>) {
    while let Some(node) = cursor {
      self.stack.push(node);
      cursor = node.left.as_deref();
    }
  }
}

impl<'a> Iterator for InOrderIter<'a> {
  type Item = &'a Issue;

  fn next(&mut self) -> Option<Self::Item> {
    let node = self.stack.pop()?;
    self.push_left(node.right.as_deref());
    Some(&node.issue)
  }
}
