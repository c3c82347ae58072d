//! Normalize inbound records into validated internal models.
//!
//! The index structures never validate their input; everything reaching them
//! goes through here first.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::IndexError;
use crate::types::*;

/// Parse and validate an InboundIssue into an Issue.
pub fn normalize_issue(raw: &InboundIssue) -> Result<Issue, IndexError> {
  let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&raw.created_at)
    .map_err(|e| IndexError::validation("created_at", &format!("invalid RFC3339: {}", e)))?
    .with_timezone(&Utc);

  let category = raw.category.trim();
  if category.is_empty() {
    return Err(IndexError::validation("category", "must not be empty"));
  }

  let status = match &raw.status {
    Some(s) => parse_status(s)?,
    None => IssueStatus::Submitted,
  };

  // Location defaults to "address, suburb" as entered on the report form.
  let location = match &raw.location {
    Some(l) if !l.trim().is_empty() => l.trim().to_string(),
    _ => join_location(&raw.address, &raw.suburb),
  };

  Ok(Issue {
    id: raw.id,
    category: category.to_string(),
    status,
    created_at,
    address: raw.address.trim().to_string(),
    suburb: raw.suburb.trim().to_string(),
    location,
    description: raw.description.trim().to_string(),
    attachments: raw
      .attachments
      .iter()
      .map(|a| a.trim())
      .filter(|a| !a.is_empty())
      .map(str::to_string)
      .collect(),
  })
}

fn join_location(address: &str, suburb: &str) -> String {
  let parts: Vec<&str> = [address.trim(), suburb.trim()]
    .into_iter()
    .filter(|p| !p.is_empty())
    .collect();
  parts.join(", ")
}

pub fn parse_status(raw: &InboundStatus) -> Result<IssueStatus, IndexError> {
  let parsed = match raw {
    InboundStatus::Code(code) => IssueStatus::from_code(*code),
    InboundStatus::Name(name) => IssueStatus::from_str_loose(name),
  };
  parsed.ok_or_else(|| IndexError::validation("status", "expected submitted|in_progress|resolved or 1..=3"))
}

/// Parse and validate an InboundFilter into an IssueFilter.
pub fn normalize_filter(raw: &InboundFilter) -> Result<IssueFilter, IndexError> {
  let status = raw.status.as_ref().map(parse_status).transpose()?;
  let date = parse_day("date", raw.date.as_deref())?;
  let start_date = parse_day("start_date", raw.start_date.as_deref())?;
  let end_date = parse_day("end_date", raw.end_date.as_deref())?;

  if let (Some(start), Some(end)) = (start_date, end_date) {
    if start > end {
      return Err(IndexError::validation("start_date", "must not be after end_date"));
    }
  }

  Ok(IssueFilter {
    id: raw.id,
    category: raw
      .category
      .as_deref()
      .map(str::trim)
      .filter(|c| !c.is_empty())
      .map(str::to_string),
    status,
    date,
    start_date,
    end_date,
  })
}

/// Blank strings count as absent.
fn parse_day(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, IndexError> {
  match raw.map(str::trim).filter(|s| !s.is_empty()) {
    Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
      .map(Some)
      .map_err(|e| IndexError::validation(field, &format!("expected YYYY-MM-DD: {}", e))),
    None => Ok(None),
  }
}
