//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// imsg-first - Find the earliest message exchanged with a contact
#[derive(Parser, Debug, Clone)]
#[command(name = "imsg-first")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Phone number (or fragment) to search for; formatting is ignored
    #[arg(value_name = "NUMBER")]
    pub target: String,

    /// Path to a chat.db copy to search; repeat to search several in order.
    /// Defaults to the standard Messages locations when omitted.
    #[arg(long = "db", value_name = "PATH", env = "IMSG_DB")]
    pub db: Vec<PathBuf>,

    /// Output the result as JSON (useful for piping to other tools)
    #[arg(long, env = "IMSG_JSON")]
    pub json: bool,

    /// Enable verbose/debug logging
    #[arg(short, long, env = "IMSG_VERBOSE")]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Database paths to search, in priority order
    pub fn source_paths(&self) -> Vec<PathBuf> {
        if !self.db.is_empty() {
            return self.db.clone();
        }
        default_locations()
    }
}

/// The standard Messages database locations: the live copy, then the
/// sandboxed container copy older systems keep.
pub fn default_locations() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };
    vec![
        home.join("Library/Messages/chat.db"),
        home.join("Library/Containers/com.apple.iChat/Data/Library/Messages/chat.db"),
    ]
}
