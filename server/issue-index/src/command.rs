//! Host protocol: apply one inbound command and produce its response payload.

use serde_json::{json, Value};

use crate::error::IndexError;
use crate::normalize;
use crate::shared::SharedEngine;
use crate::types::{Command, ErrorOutput, Issue, OkOutput};

/// Execute `cmd` against the engine.
///
/// Lookups of unknown IDs are not errors: `get` answers `null`, `related`
/// answers `[]`.
pub fn execute(engine: &SharedEngine, cmd: &Command) -> Result<Value, IndexError> {
  let value = match cmd {
    Command::Build { issues } => {
      let normalized = issues
        .iter()
        .map(normalize::normalize_issue)
        .collect::<Result<Vec<Issue>, _>>()?;
      json!({ "loaded": engine.build(normalized) })
    }
    Command::Create { issue } => {
      let issue = normalize::normalize_issue(issue)?;
      let id = issue.id;
      engine.create(issue)?;
      json!({ "id": id, "related_count": engine.related_count(id) })
    }
    Command::UpdateStatus { id, status } => {
      let status = normalize::parse_status(status)?;
      serde_json::to_value(engine.update_status(*id, status)?)?
    }
    Command::Get { id } => serde_json::to_value(engine.get(*id))?,
    Command::Query { filter } => {
      let filter = normalize::normalize_filter(filter)?;
      serde_json::to_value(engine.query(&filter))?
    }
    Command::Related { id } => serde_json::to_value(engine.related(*id))?,
    Command::RelatedCount { id } => json!({ "id": id, "related_count": engine.related_count(*id) }),
    Command::Count => json!({ "count": engine.count() }),
    Command::Stats => serde_json::to_value(engine.stats())?,
    Command::Clusters => serde_json::to_value(engine.clusters())?,
  };
  Ok(value)
}

/// Handle one raw input line and render its response line.
///
/// Blank lines produce nothing. Every other line produces exactly one JSON
/// line: an `OkOutput` on success, an `ErrorOutput` when the line is not a
/// valid command or the command is rejected.
pub fn handle_line(engine: &SharedEngine, line: &str) -> Option<String> {
  let trimmed = line.trim();
  if trimmed.is_empty() {
    return None;
  }

  let cmd: Command = match serde_json::from_str(trimmed) {
    Ok(v) => v,
    Err(e) => {
      tracing::debug!(error = %e, "rejected command line");
      return Some(render(&ErrorOutput::new(format!("json parse: {}", e))));
    }
  };

  let rendered = match execute(engine, &cmd) {
    Ok(data) => render(&OkOutput::new(data)),
    Err(e) => {
      tracing::debug!(error = %e, "command failed");
      render(&error_output(&e))
    }
  };
  Some(rendered)
}

/// Error line for a rejected command. Validation errors report only their
/// reason; the field goes in `field`.
pub fn error_output(e: &IndexError) -> ErrorOutput {
  let output = match e {
    IndexError::Validation { reason, .. } => ErrorOutput::new(reason.clone()),
    _ => ErrorOutput::new(e.to_string()),
  };
  match e.field() {
    Some(field) => output.with_field(field),
    None => output,
  }
}

fn render<T: serde::Serialize>(value: &T) -> String {
  serde_json::to_string(value).unwrap_or_else(|e| {
    tracing::error!(error = %e, "response serialization failed");
    r#"{"error":true,"message":"response serialization failed"}"#.to_string()
  })
}
