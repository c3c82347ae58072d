//! Totals by status and category over the indexed issues.

use crate::types::{IndexStats, Issue};

/// Tally issues into an [`IndexStats`].
pub fn compute<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> IndexStats {
  let mut stats = IndexStats::default();
  for issue in issues {
    stats.total_issues += 1;
    *stats.by_status.entry(issue.status).or_insert(0) += 1;
    *stats.by_category.entry(issue.category.clone()).or_insert(0) += 1;
  }
  stats
}
