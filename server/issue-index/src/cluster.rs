//! Stable identifiers for similarity-graph components.

use crate::types::{Issue, IssueCluster};

/// Compute a stable cluster ID from member issue IDs.
///
/// Order-insensitive: the IDs are sorted before hashing. Uses blake3 and keeps
/// the first 8 bytes (16 hex chars), prefixed `cl-`.
pub fn cluster_id(member_ids: &[u64]) -> String {
  let mut sorted = member_ids.to_vec();
  sorted.sort_unstable();

  let mut hasher = blake3::Hasher::new();
  for (n, id) in sorted.iter().enumerate() {
    if n > 0 {
      hasher.update(b"|");
    }
    hasher.update(id.to_string().as_bytes());
  }
  let hex = hasher.finalize().to_hex();
  format!("cl-{}", &hex[..16])
}

/// Turn connected components into clusters. Empty components are dropped.
pub fn summarize(components: Vec<Vec<&Issue>>) -> Vec<IssueCluster> {
  components
    .into_iter()
    .filter_map(|members| {
      let category = members.first()?.category.clone();
      let mut issue_ids: Vec<u64> = members.iter().map(|i| i.id).collect();
      issue_ids.sort_unstable();
      Some(IssueCluster {
        cluster_id: cluster_id(&issue_ids),
        category,
        issue_ids,
      })
    })
    .collect()
}
