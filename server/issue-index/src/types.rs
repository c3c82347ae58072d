//! Core types for the issue index (JSON contracts + internal models).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: what the host sends)
// ---------------------------------------------------------------------------

/// One issue record as supplied by the backing store or a create request.
/// Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundIssue {
  pub id: u64,
  pub category: String,
  #[serde(default)]
  pub status: Option<InboundStatus>,
  pub created_at: String,
  #[serde(default)]
  pub address: String,
  #[serde(default)]
  pub suburb: String,
  #[serde(default)]
  pub location: Option<String>,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub attachments: Vec<String>,
}

/// Status as sent by callers: either the numeric code or a loose name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InboundStatus {
  Code(u8),
  Name(String),
}

/// Filter options for a listing query. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundFilter {
  #[serde(default)]
  pub id: Option<u64>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub status: Option<InboundStatus>,
  #[serde(default)]
  pub date: Option<String>,
  #[serde(default)]
  pub start_date: Option<String>,
  #[serde(default)]
  pub end_date: Option<String>,
}

/// One command line on stdin, tagged by `op`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
  Build { issues: Vec<InboundIssue> },
  Create { issue: InboundIssue },
  UpdateStatus { id: u64, status: InboundStatus },
  Get { id: u64 },
  Query {
    #[serde(default)]
    filter: InboundFilter,
  },
  Related { id: u64 },
  RelatedCount { id: u64 },
  Count,
  Stats,
  Clusters,
}

// ---------------------------------------------------------------------------
// Status enum (normalized)
// ---------------------------------------------------------------------------

/// Issue status. The discriminant is the status code, and lower codes sort
/// first in the priority ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum IssueStatus {
  Resolved = 1,
  Submitted = 2,
  InProgress = 3,
}

impl IssueStatus {
  /// Workflow order for staff updates: submitted, then in progress, then resolved.
  const WORKFLOW: [IssueStatus; 3] = [Self::Submitted, Self::InProgress, Self::Resolved];

  pub fn code(self) -> u8 {
    self as u8
  }

  pub fn from_code(code: u8) -> Option<Self> {
    match code {
      1 => Some(Self::Resolved),
      2 => Some(Self::Submitted),
      3 => Some(Self::InProgress),
      _ => None,
    }
  }

  pub fn from_str_loose(s: &str) -> Option<Self> {
    let lowered = s.trim().to_ascii_lowercase();
    match lowered.as_str() {
      "submitted" | "open" | "new" => Some(Self::Submitted),
      "in_progress" | "inprogress" | "in progress" | "in-progress" => Some(Self::InProgress),
      "resolved" | "closed" | "done" => Some(Self::Resolved),
      other => other.parse::<u8>().ok().and_then(Self::from_code),
    }
  }

  fn workflow_rank(self) -> usize {
    Self::WORKFLOW
      .iter()
      .position(|s| *s == self)
      .unwrap_or_default()
  }

  /// Status only moves forward through the workflow. Staying put is allowed.
  pub fn can_transition_to(self, next: IssueStatus) -> bool {
    next.workflow_rank() >= self.workflow_rank()
  }

  pub fn display_name(self) -> &'static str {
    match self {
      Self::Resolved => "Resolved",
      Self::Submitted => "Submitted",
      Self::InProgress => "In Progress",
    }
  }
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

/// A reported civic problem. `id`, `category` and `created_at` never change
/// once the issue has been indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
  pub id: u64,
  pub category: String,
  pub status: IssueStatus,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub address: String,
  #[serde(default)]
  pub suburb: String,
  #[serde(default)]
  pub location: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub attachments: Vec<String>,
}

impl Issue {
  /// Minimal issue with only the indexed fields populated.
  pub fn new(id: u64, category: impl Into<String>, status: IssueStatus, created_at: DateTime<Utc>) -> Self {
    Self {
      id,
      category: category.into(),
      status,
      created_at,
      address: String::new(),
      suburb: String::new(),
      location: String::new(),
      description: String::new(),
      attachments: Vec::new(),
    }
  }
}

/// Normalized listing filter. Every populated field must hold for an issue
/// to match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
  pub id: Option<u64>,
  pub category: Option<String>,
  pub status: Option<IssueStatus>,
  /// Exact UTC calendar day of `created_at`.
  pub date: Option<NaiveDate>,
  /// Inclusive lower bound on the UTC calendar day of `created_at`.
  pub start_date: Option<NaiveDate>,
  /// Inclusive upper bound on the UTC calendar day of `created_at`.
  pub end_date: Option<NaiveDate>,
}

impl IssueFilter {
  pub fn by_id(id: u64) -> Self {
    Self {
      id: Some(id),
      ..Self::default()
    }
  }

  /// Category filter, treating an empty string as absent.
  pub fn category(&self) -> Option<&str> {
    self.category.as_deref().filter(|c| !c.is_empty())
  }

  pub fn has_filters(&self) -> bool {
    self.id.is_some()
      || self.category().is_some()
      || self.status.is_some()
      || self.date.is_some()
      || self.start_date.is_some()
      || self.end_date.is_some()
  }

  /// Whether `issue` satisfies every populated predicate.
  pub fn matches(&self, issue: &Issue) -> bool {
    let day = issue.created_at.date_naive();
    self.id.map_or(true, |id| issue.id == id)
      && self.category().map_or(true, |c| issue.category == c)
      && self.status.map_or(true, |s| issue.status == s)
      && self.date.map_or(true, |d| day == d)
      && self.start_date.map_or(true, |d| day >= d)
      && self.end_date.map_or(true, |d| day <= d)
  }
}

// ---------------------------------------------------------------------------
// Output types (JSON contract: what we emit)
// ---------------------------------------------------------------------------

/// Totals over every indexed issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
  pub total_issues: usize,
  pub by_status: BTreeMap<IssueStatus, usize>,
  pub by_category: BTreeMap<String, usize>,
}

/// One connected component of the similarity graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueCluster {
  pub cluster_id: String,
  pub category: String,
  pub issue_ids: Vec<u64>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Successful response line.
#[derive(Debug, Clone, Serialize)]
pub struct OkOutput<T: Serialize> {
  pub ok: bool,
  pub data: T,
}

impl<T: Serialize> OkOutput<T> {
  pub fn new(data: T) -> Self {
    Self { ok: true, data }
  }
}

/// Structured error output for rejected command lines.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn status_codes_order_priority() {
    assert!(IssueStatus::Resolved < IssueStatus::Submitted);
    assert!(IssueStatus::Submitted < IssueStatus::InProgress);
    assert_eq!(IssueStatus::InProgress.code(), 3);
  }

  #[test]
  fn loose_status_parsing() {
    assert_eq!(IssueStatus::from_str_loose("In Progress"), Some(IssueStatus::InProgress));
    assert_eq!(IssueStatus::from_str_loose("RESOLVED"), Some(IssueStatus::Resolved));
    assert_eq!(IssueStatus::from_str_loose("2"), Some(IssueStatus::Submitted));
    assert_eq!(IssueStatus::from_str_loose("9"), None);
    assert_eq!(IssueStatus::from_str_loose("pending"), None);
  }

  #[test]
  fn workflow_only_moves_forward() {
    assert!(IssueStatus::Submitted.can_transition_to(IssueStatus::InProgress));
    assert!(IssueStatus::Submitted.can_transition_to(IssueStatus::Resolved));
    assert!(IssueStatus::InProgress.can_transition_to(IssueStatus::InProgress));
    assert!(!IssueStatus::Resolved.can_transition_to(IssueStatus::Submitted));
    assert!(!IssueStatus::InProgress.can_transition_to(IssueStatus::Submitted));
  }

  #[test]
  fn empty_category_is_not_a_filter() {
    let filter = IssueFilter {
      category: Some(String::new()),
      ..IssueFilter::default()
    };
    assert!(!filter.has_filters());
    let issue = Issue::new(1, "Roads", IssueStatus::Submitted, Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap());
    assert!(filter.matches(&issue));
  }

  #[test]
  fn command_tags_parse() {
    let cmd: Command = serde_json::from_str(r#"{"op":"related_count","id":7}"#).unwrap();
    assert!(matches!(cmd, Command::RelatedCount { id: 7 }));
    let cmd: Command = serde_json::from_str(r#"{"op":"query"}"#).unwrap();
    assert!(matches!(cmd, Command::Query { .. }));
    let cmd: Command = serde_json::from_str(r#"{"op":"update_status","id":3,"status":1}"#).unwrap();
    match cmd {
      Command::UpdateStatus { id, status } => {
        assert_eq!(id, 3);
        assert_eq!(status, InboundStatus::Code(1));
      }
      other => panic!("unexpected command {:?}", other),
    }
  }
}
