//! Issue Index Engine: in-memory indexing for municipal service requests.
//!
//! An AVL tree answers lookups by ID and gives the ascending-ID scan, a
//! similarity graph links reports of the same category filed within a few
//! days of each other, and a per-query min-heap orders filtered listings by
//! status, then recency.
//!
//! No DB, no network; the index is rebuilt from the backing store at startup.

pub mod avl;
pub mod cluster;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod heap;
pub mod normalize;
pub mod query;
pub mod shared;
pub mod source;
pub mod stats;
pub mod types;

pub use config::Config;
pub use engine::Engine;
pub use error::IndexError;
pub use shared::SharedEngine;
pub use source::{IssueSource, JsonFileSource};
pub use types::{Command, Issue, IssueFilter, IssueStatus};
