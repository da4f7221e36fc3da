use std::path::PathBuf;

use clap::Parser;

/// Everything else is chosen from the interactive menu.
#[derive(Parser, Debug, Clone)]
#[command(name = "hardenctl", about = "Linux system hardening tool", version)]
pub struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Read settings from this file instead of the default hardenrc.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
