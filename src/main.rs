//! Crop Advisor CLI entry point
//!
//! - `crop-advisor` - interactive chat (default)
//! - `crop-advisor login` / `register` / `logout` - manage the session
//! - `crop-advisor ask <question>` - one-shot question
//! - `crop-advisor status` - session and backend status

use crop_advisor::cli::{commands, Cli};
use owo_colors::OwoColorize;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    if let Err(e) = commands::run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
