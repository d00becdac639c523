//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the Crop Advisor CLI.

use chrono::{DateTime, Local, Utc};
use crop_advisor_core::chat::{BreakdownEntry, ChatMessage, MessageKind, QUICK_QUESTIONS};
use crop_advisor_core::status::Indicator;
use owo_colors::OwoColorize;

/// Width of a full-confidence bar, in cells.
const BAR_WIDTH: usize = 20;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the welcome banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}",
                "🌾 Ethiopia Crop Advisor".bright_green().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
            println!(
                "   {}\n",
                "Ask about planting, pests, soil, weather and water.".dimmed()
            );
        } else {
            println!(
                "\n   Ethiopia Crop Advisor v{}\n   Ask about planting, pests, soil, weather and water.\n",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a status line with a colored indicator
    pub fn indicator(&self, key: &str, indicator: Indicator) {
        if self.colored {
            let value = match indicator {
                Indicator::Active => indicator.as_str().green().bold().to_string(),
                Indicator::Inactive => indicator.as_str().red().bold().to_string(),
                Indicator::Checking => indicator.as_str().yellow().to_string(),
            };
            println!("    {}: {}", key.dimmed(), value);
        } else {
            println!("    {}: {}", key, indicator);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print the numbered quick questions
    pub fn quick_questions(&self) {
        self.header("Quick questions");
        for (i, question) in QUICK_QUESTIONS.iter().enumerate() {
            if self.colored {
                println!("    {} {}", format!("{}.", i + 1).bright_cyan(), question);
            } else {
                println!("    {}. {}", i + 1, question);
            }
        }
        self.hint("Type /quick N to ask one of them.");
    }

    /// Print one transcript message, including its expert breakdown
    pub fn message(&self, message: &ChatMessage) {
        let time = clock_time(message.created_at);
        if self.colored {
            let sender = match message.kind {
                MessageKind::User => message.sender().bright_blue().bold().to_string(),
                MessageKind::Assistant => message.sender().bright_green().bold().to_string(),
                MessageKind::Error => message.sender().red().bold().to_string(),
            };
            println!("\n  {} {}", sender, time.dimmed());
            for line in message.content.lines() {
                match message.kind {
                    MessageKind::Error => println!("  {}", line.red()),
                    _ => println!("  {}", line),
                }
            }
        } else {
            println!("\n  {} [{}]", message.sender(), time);
            for line in message.content.lines() {
                println!("  {}", line);
            }
        }

        if !message.breakdown.is_empty() {
            if self.colored {
                println!("\n    {}", "Expert Analysis".cyan().bold());
            } else {
                println!("\n    Expert Analysis");
            }
            for entry in &message.breakdown {
                println!("    {}", self.breakdown_line(entry));
            }
        }
    }

    /// One breakdown row: label, bar and percentage
    pub fn breakdown_line(&self, entry: &BreakdownEntry) -> String {
        let bar = confidence_bar(entry.percent());
        let label = format!("{:<22}", entry.label());
        let percent = format!("{:>3}%", entry.percent());
        if self.colored {
            format!("{} {} {}", label, bar.green(), percent.dimmed())
        } else {
            format!("{} [{}] {}", label, bar, percent)
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}

/// `HH:MM` in the user's local time zone
pub fn clock_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

/// Fixed-width bar where filled cells track `percent`.
pub fn confidence_bar(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}
