//! Structured error types for the issue index.

use thiserror::Error;

use crate::types::IssueStatus;

#[derive(Debug, Error)]
pub enum IndexError {
  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("duplicate issue id {0}")]
  DuplicateId(u64),

  #[error("unknown issue id {0}")]
  UnknownIssue(u64),

  #[error("issue {id}: cannot move status from {} to {}", .from.display_name(), .to.display_name())]
  InvalidTransition {
    id: u64,
    from: IssueStatus,
    to: IssueStatus,
  },

  #[error("issue {id}: {field} cannot change after creation")]
  ImmutableField { id: u64, field: &'static str },
}

impl IndexError {
  pub fn validation(field: &str, reason: &str) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  /// Field name to attach to an error line, when the error concerns one.
  pub fn field(&self) -> Option<&str> {
    match self {
      Self::Validation { field, .. } => Some(field.as_str()),
      Self::ImmutableField { field, .. } => Some(*field),
      Self::InvalidTransition { .. } => Some("status"),
      Self::DuplicateId(_) | Self::UnknownIssue(_) => Some("id"),
      _ => None,
    }
  }
}
