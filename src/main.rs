//! imsg-first - CLI for finding the earliest message exchanged with a contact.
//!
//! Scans one or more local Messages databases (the live chat.db and any
//! backup/container copies), matches the target number against every stored
//! handle by comparing digits-only forms, and reports the globally earliest
//! message among the matches.

mod cli;
mod display;
mod normalize;
mod search;
mod source;

use anyhow::{bail, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::Args;
use display::ResultDisplay;
use normalize::normalize;
use search::{first_message_for_target, Candidate};
use source::{ChatDb, MessageRecord, MessageSource};

fn main() -> Result<()> {
    let args = Args::parse_args();

    init_logging(args.verbose);

    let paths = args.source_paths();
    if paths.is_empty() {
        bail!("no database locations configured and no home directory to derive defaults from");
    }
    if normalize(&args.target).is_empty() {
        bail!(
            "target {:?} contains no digits; supply a phone number or fragment",
            args.target
        );
    }

    debug!("searching {} configured locations", paths.len());

    let sources: Vec<Box<dyn MessageSource>> = paths
        .iter()
        .map(|p| Box::new(ChatDb::new(p)) as Box<dyn MessageSource>)
        .collect();

    let result = first_message_for_target(&sources, &args.target);

    // Not finding a message is a normal outcome, so both branches exit 0.
    if args.json {
        let json = serde_json::to_string_pretty(&JsonResult::from(result.as_ref()))?;
        println!("{}", json);
    } else {
        let display = ResultDisplay::new();
        match &result {
            Some(candidate) => display.display(&args.target, candidate)?,
            None => display.display_not_found()?,
        }
    }

    Ok(())
}

/// Initialize the tracing subscriber for logging
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// JSON shape for `--json` output
#[derive(serde::Serialize)]
struct JsonResult<'a> {
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    #[serde(flatten)]
    message: Option<&'a MessageRecord>,
}

impl<'a> From<Option<&'a Candidate>> for JsonResult<'a> {
    fn from(candidate: Option<&'a Candidate>) -> Self {
        Self {
            found: candidate.is_some(),
            source: candidate.map(|c| c.source_label.as_str()),
            message: candidate.map(|c| &c.message),
        }
    }
}
