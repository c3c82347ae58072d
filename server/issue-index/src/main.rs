//! Binary entrypoint: read JSON command lines from stdin, write JSON lines to stdout.
//!
//! Each input line is a Command. Each produces exactly one output line:
//! - An OkOutput wrapping the command's result
//! - An ErrorOutput when the line cannot be parsed or the command is rejected
//!
//! Logs go to stderr so stdout stays machine-readable.

use issue_index::command;
use issue_index::{Config, Engine, JsonFileSource, SharedEngine};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn main() {
  let config = match Config::from_env() {
    Ok(c) => c,
    Err(e) => {
      let _ = writeln!(io::stderr(), "issue-index: config error: {}", e);
      std::process::exit(2);
    }
  };
  init_tracing(&config);

  if let Err(e) = run(config) {
    tracing::error!(error = %e, "issue-index stopped");
    std::process::exit(1);
  }
}

fn init_tracing(config: &Config) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .try_init();
}

fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
  let seed = config.seed_path.clone();
  let engine = SharedEngine::new(Engine::new(config));

  if let Some(path) = seed {
    let source = JsonFileSource::new(path);
    let loaded = engine.rebuild_from(&source)?;
    tracing::info!(issues = loaded, path = %source.path().display(), "seeded from backing store export");
  }

  let stdin = io::stdin();
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());

  for line in stdin.lock().lines() {
    if let Some(response) = command::handle_line(&engine, &line?) {
      writeln!(out, "{}", response)?;
      out.flush()?;
    }
  }

  out.flush()?;
  Ok(())
}
