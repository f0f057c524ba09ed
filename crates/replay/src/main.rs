//! Authorship replay binary.
//!
//! Reads a JSON edit script, runs every step through an
//! [`AuthorshipSession`](coauthor_authorship::AuthorshipSession), and prints
//! the final text, spans, and markers as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use coauthor_authorship::AuthorshipConfig;
use tracing::info;

mod script;

use script::{Script, run_script};

/// Replay command line arguments.
#[derive(Parser, Debug)]
#[command(name = "coauthor-replay")]
#[command(about = "Replay an edit script through the authorship tracker")]
#[command(version)]
struct Args {
	/// JSON edit script to replay
	#[arg(short, long, value_name = "PATH")]
	script: PathBuf,

	/// TOML authorship configuration
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let config = match &args.config {
		Some(path) => AuthorshipConfig::load(path)
			.with_context(|| format!("loading config {}", path.display()))?,
		None => AuthorshipConfig::default(),
	};
	let script = Script::load(&args.script)?;
	info!(
		script = %args.script.display(),
		steps = script.steps.len(),
		"replay.start"
	);

	let report = run_script(&script, &config)?;
	info!(spans = report.spans.len(), "replay.done");

	println!("{}", serde_json::to_string_pretty(&report)?);
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("COAUTHOR_LOG")
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("coauthor=trace,info")
			} else {
				EnvFilter::new("coauthor=info,warn")
			}
		});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
