//! CLI module for Crop Advisor
//!
//! Provides command-line interface parsing and handling for the crop-advisor binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod commands;
pub mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Ethiopia Crop Advisor - terminal client
///
/// Sign in to the advisory backend and ask agricultural experts about
/// planting, pests, soil, weather and water.
#[derive(Parser, Debug)]
#[command(
    name = "crop-advisor",
    version,
    about = "Ethiopia Crop Advisor - ask agricultural experts from your terminal",
    long_about = "Terminal client for the Ethiopia Crop Advisor service.\n\n\
                  Sign in once with 'login'; the session is kept between runs.\n\
                  Run without arguments to start an interactive chat.",
    after_help = "EXAMPLES:\n    \
                  crop-advisor login                          # Sign in interactively\n    \
                  crop-advisor                                # Start chatting\n    \
                  crop-advisor ask \"How do I control stalk borer?\" --crop maize\n    \
                  crop-advisor status                         # Session and backend status\n    \
                  crop-advisor --api-url http://10.0.0.5:8000/api/v1 chat"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to ./crop-advisor.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the config file and environment
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Farm context overrides shared by `ask` and `chat`
#[derive(Args, Debug, Clone, Default)]
pub struct ContextArgs {
    /// Region the question is about
    #[arg(short, long)]
    pub location: Option<String>,

    /// Crop the question is about
    #[arg(long = "crop")]
    pub crop_type: Option<String>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and keep the session for later runs
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Account password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account and sign in
    Register {
        /// Display name (prompted when omitted)
        #[arg(short, long)]
        name: Option<String>,

        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Account password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        question: String,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Interactive chat (same as running without subcommand)
    Chat {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Show session, advisory and backend status
    Status,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["crop-advisor"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_ask_with_context() {
        let cli = Cli::try_parse_from([
            "crop-advisor",
            "ask",
            "What fertilizer should I use?",
            "--location",
            "Amhara",
            "--crop",
            "teff",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Ask { question, context }) => {
                assert_eq!(question, "What fertilizer should I use?");
                assert_eq!(context.location.as_deref(), Some("Amhara"));
                assert_eq!(context.crop_type.as_deref(), Some("teff"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "crop-advisor",
            "status",
            "--api-url",
            "http://example.org/api/v1",
            "--no-color",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Status)));
        assert_eq!(cli.api_url.as_deref(), Some("http://example.org/api/v1"));
        assert!(cli.no_color);
    }
}
