//! Integration tests for the issue index.

use chrono::{DateTime, Duration, TimeZone, Utc};
use issue_index::types::{InboundIssue, IssueCluster};
use issue_index::{command, normalize};
use issue_index::{Command, Config, Engine, Issue, IssueFilter, IssueStatus, SharedEngine};

fn day(d: i64) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap() + Duration::days(d)
}

fn fixture_issues() -> Vec<Issue> {
  let json = r#"[
    {"id": 5, "category": "Roads", "created_at": "2025-01-01T09:00:00Z",
     "address": "12 Long Street", "suburb": "Gardens", "description": "Pothole"},
    {"id": 3, "category": "Roads", "created_at": "2025-01-03T09:00:00Z", "status": "in_progress"},
    {"id": 8, "category": "Roads", "created_at": "2025-01-11T09:00:00Z", "status": "resolved"},
    {"id": 1, "category": "Water", "created_at": "2025-01-02T09:00:00Z"},
    {"id": 4, "category": "Water", "created_at": "2025-01-04T12:00:00Z", "unknown_field": true}
  ]"#;
  let raw: Vec<InboundIssue> = serde_json::from_str(json).unwrap();
  raw.iter().map(|r| normalize::normalize_issue(r).unwrap()).collect()
}

fn ids(issues: &[Issue]) -> Vec<u64> {
  issues.iter().map(|i| i.id).collect()
}

#[test]
fn in_order_scan_is_ascending_id() {
  let mut engine = Engine::with_defaults();
  engine.build(fixture_issues());
  let scan: Vec<u64> = engine.tree().in_order().iter().map(|i| i.id).collect();
  assert_eq!(scan, vec![1, 3, 4, 5, 8]);
}

#[test]
fn similarity_scenario() {
  let mut engine = Engine::with_defaults();
  engine.build(vec![
    Issue::new(1, "Roads", IssueStatus::Submitted, day(0)),
    Issue::new(2, "Roads", IssueStatus::Submitted, day(2)),
    Issue::new(3, "Roads", IssueStatus::Submitted, day(10)),
  ]);
  assert_eq!(ids(&engine.related(1)), vec![2]);
  assert_eq!(ids(&engine.related(2)), vec![1]);
  assert!(engine.related(3).is_empty());
}

#[test]
fn priority_scenario_keeps_literal_code_order() {
  let mut engine = Engine::with_defaults();
  engine.build(vec![
    Issue::new(1, "Parks", IssueStatus::Submitted, day(0)),
    Issue::new(2, "Parks", IssueStatus::InProgress, day(0)),
    Issue::new(3, "Parks", IssueStatus::Resolved, day(0)),
  ]);
  let statuses: Vec<IssueStatus> = engine
    .query(&IssueFilter::default())
    .iter()
    .map(|i| i.status)
    .collect();
  assert_eq!(
    statuses,
    vec![IssueStatus::Resolved, IssueStatus::Submitted, IssueStatus::InProgress]
  );
}

#[test]
fn write_path_keeps_structures_in_step() {
  let engine = SharedEngine::new(Engine::with_defaults());
  engine.build(fixture_issues());

  let created = Issue::new(9, "Roads", IssueStatus::Submitted, day(12));
  engine.create(created).unwrap();
  assert_eq!(engine.count(), 6);
  assert_eq!(ids(&engine.related(9)), vec![8]);

  engine.update_status(9, IssueStatus::InProgress).unwrap();
  assert_eq!(engine.get(9).unwrap().status, IssueStatus::InProgress);
  assert_eq!(engine.related(8)[0].status, IssueStatus::InProgress);

  let stats = engine.stats();
  assert_eq!(stats.total_issues, 6);
  assert_eq!(stats.by_status.get(&IssueStatus::InProgress), Some(&2));
}

#[test]
fn clusters_partition_the_index() {
  let mut engine = Engine::with_defaults();
  engine.build(fixture_issues());
  let clusters: Vec<IssueCluster> = engine.clusters();
  let members: Vec<Vec<u64>> = clusters.iter().map(|c| c.issue_ids.clone()).collect();
  assert_eq!(members, vec![vec![1, 4], vec![3, 5], vec![8]]);
  assert!(clusters.iter().all(|c| c.cluster_id.starts_with("cl-")));

  // Stable across independent builds.
  let mut again = Engine::with_defaults();
  again.build(fixture_issues());
  assert_eq!(again.clusters(), clusters);
}

#[test]
fn wider_window_from_config() {
  let mut engine = Engine::new(Config {
    similarity_window_days: 10,
    ..Config::default()
  });
  engine.build(fixture_issues());
  assert_eq!(ids(&engine.related(5)), vec![3, 8]);
}

#[test]
fn command_lines_round_trip_through_json() {
  let engine = SharedEngine::default();
  let lines = [
    r#"{"op":"create","issue":{"id":1,"category":"Roads","created_at":"2025-01-01T09:00:00Z"}}"#,
    r#"{"op":"create","issue":{"id":2,"category":"Roads","created_at":"2025-01-02T09:00:00Z"}}"#,
    r#"{"op":"update_status","id":1,"status":"resolved"}"#,
    r#"{"op":"query","filter":{"category":"Roads","start_date":"2025-01-01","end_date":"2025-01-31"}}"#,
  ];

  let mut last = serde_json::Value::Null;
  for line in lines {
    let cmd: Command = serde_json::from_str(line).unwrap();
    last = command::execute(&engine, &cmd).unwrap();
  }

  let listed: Vec<u64> = last
    .as_array()
    .unwrap()
    .iter()
    .map(|i| i["id"].as_u64().unwrap())
    .collect();
  assert_eq!(listed, vec![1, 2]);
  assert_eq!(last[0]["status"], "resolved");
}

#[test]
fn duplicate_create_is_reported() {
  let engine = SharedEngine::default();
  let line = r#"{"op":"create","issue":{"id":7,"category":"Roads","created_at":"2025-01-01T09:00:00Z"}}"#;
  let cmd: Command = serde_json::from_str(line).unwrap();
  command::execute(&engine, &cmd).unwrap();
  let err = command::execute(&engine, &cmd).unwrap_err();
  assert!(err.to_string().contains("duplicate issue id 7"));
  assert_eq!(engine.count(), 1);
}
