//! Subcommand handlers and the interactive chat loop.

use crate::api::AdvisorClient;
use crate::cli::output::Output;
use crate::cli::{Cli, Commands, ContextArgs};
use crate::logging;
use crate::session::FileTokenStore;
use crate::types::{AdvisorError, Result};
use crate::utils::config::AdvisorConfig;
use crop_advisor_core::chat::{quick_question, ChatContext, ChatSession, SendOutcome, SendRejected};
use crop_advisor_core::error::ClientError;
use crop_advisor_core::session::{Gate, Navigator, Route, SessionManager, SessionStatus};
use crop_advisor_core::types::UserInfo;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Spinner text while a chat call is outstanding.
pub const THINKING: &str = "Agricultural experts are analyzing your question...";

/// Remembers the last route the session asked for.
///
/// The terminal has no pages; the chat loop polls this to notice a sign-out.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    requested: Mutex<Option<Route>>,
}

impl TerminalNavigator {
    pub fn take(&self) -> Option<Route> {
        self.requested.lock().take()
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        debug!(path = route.path(), "navigate");
        *self.requested.lock() = Some(route);
    }
}

/// One line typed at the chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Empty,
    Ask(String),
    /// `/quick` lists the questions, `/quick N` asks one.
    Quick(Option<usize>),
    Clear,
    Status,
    Health,
    Logout,
    Help,
    Quit,
    Unknown(String),
}

impl ReplInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplInput::Empty;
        }
        if !line.starts_with('/') {
            return ReplInput::Ask(line.to_string());
        }

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let arg = parts.next();
        match (command, arg) {
            ("/quick", None) => ReplInput::Quick(None),
            ("/quick", Some(n)) => match n.parse() {
                Ok(n) => ReplInput::Quick(Some(n)),
                Err(_) => ReplInput::Unknown(line.to_string()),
            },
            ("/clear", None) => ReplInput::Clear,
            ("/status", None) => ReplInput::Status,
            ("/health", None) => ReplInput::Health,
            ("/logout", None) => ReplInput::Logout,
            ("/help", None) => ReplInput::Help,
            ("/quit" | "/exit", None) => ReplInput::Quit,
            _ => ReplInput::Unknown(line.to_string()),
        }
    }
}

/// Everything a command needs, wired from configuration.
pub struct App {
    config: AdvisorConfig,
    output: Output,
    navigator: Arc<TerminalNavigator>,
    session: SessionManager<AdvisorClient>,
    chat: ChatSession<AdvisorClient>,
}

impl App {
    pub fn new(config: AdvisorConfig, output: Output) -> Result<Self> {
        let store = Arc::new(FileTokenStore::new(config.token_path()?));
        debug!(path = %store.path().display(), "token store");

        let navigator = Arc::new(TerminalNavigator::default());
        let client = AdvisorClient::from_config(&config)?.with_token_store(store.clone());
        let session = SessionManager::new(client.clone(), store, navigator.clone())
            .with_policy(config.store_policy());
        let chat = ChatSession::new(client);

        Ok(Self {
            config,
            output,
            navigator,
            session,
            chat,
        })
    }

    fn context(&self, args: &ContextArgs) -> ChatContext {
        let mut context = self.config.chat_context();
        if let Some(location) = &args.location {
            context.location = location.clone();
        }
        if let Some(crop_type) = &args.crop_type {
            context.crop_type = crop_type.clone();
        }
        context
    }

    async fn require_session(&self) -> Result<()> {
        match Gate::for_status(self.session.initialize().await) {
            Gate::Content => Ok(()),
            _ => Err(AdvisorError::NotSignedIn),
        }
    }

    pub async fn login(&self, email: Option<String>, password: Option<String>) -> Result<()> {
        let email = match email {
            Some(email) => email,
            None => Input::<String>::new().with_prompt("Email").interact_text()?,
        };
        let password = match password {
            Some(password) => password,
            None => Password::new().with_prompt("Password").interact()?,
        };

        let result = self.session.login(email.trim(), &password).await;
        match result.error {
            None => {
                self.output.success("Signed in.");
                Ok(())
            }
            Some(message) => Err(AdvisorError::Auth(message)),
        }
    }

    pub async fn register(
        &self,
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<()> {
        let name = match name {
            Some(name) => name,
            None => Input::<String>::new().with_prompt("Full name").interact_text()?,
        };
        let email = match email {
            Some(email) => email,
            None => Input::<String>::new().with_prompt("Email").interact_text()?,
        };
        let password = match password {
            Some(password) => password,
            None => Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?,
        };

        let result = self
            .session
            .register(name.trim(), email.trim(), &password)
            .await;
        match result.error {
            None => {
                self.output.success("Account created. You are signed in.");
                Ok(())
            }
            Some(message) => Err(AdvisorError::Auth(message)),
        }
    }

    pub fn logout(&self) {
        self.session.logout();
        self.output.success("Signed out.");
    }

    pub async fn ask(&self, question: &str, args: &ContextArgs) -> Result<()> {
        self.require_session().await?;
        let context = self.context(args);

        match self.send_with_spinner(question, &context).await {
            SendOutcome::Answered(_) => {
                if let Some(answer) = self.chat.messages().last() {
                    self.output.message(answer);
                }
                self.output.newline();
                Ok(())
            }
            SendOutcome::Failed(e) => Err(e.into()),
            SendOutcome::Ignored(_) => Err(ClientError::Validation(
                "Question must not be empty".to_string(),
            )
            .into()),
        }
    }

    pub async fn status(&self) -> Result<()> {
        self.output.header("Session");
        self.output.kv("API", self.chat.api().base_url());

        let status = self.session.initialize().await;
        self.output.kv("Session", status_label(status));
        if let Some(label) = self.session.session().user.as_ref().and_then(user_label) {
            self.output.kv("User", &label);
        }

        self.output.header("Backend");
        let indicator = self.chat.refresh_backend_status().await;
        self.output.indicator("Advisory service", indicator);
        let report = self.chat.test_connection().await;
        if report.reachable {
            self.output.success(&report.message);
        } else {
            self.output.warning(&report.message);
        }
        self.output.newline();
        Ok(())
    }

    /// Interactive chat loop. Offers to sign in first when needed.
    pub async fn chat(&self, args: &ContextArgs) -> Result<()> {
        if Gate::for_status(self.session.initialize().await) != Gate::Content {
            self.output.warning("You are not signed in.");
            self.login(None, None).await?;
        }
        self.navigator.take();

        let context = self.context(args);
        self.output.banner();
        self.output.kv("Location", &context.location);
        self.output.kv("Crop", &context.crop_type);
        self.output.quick_questions();
        self.output.hint("Type /help for commands, /quit to leave.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = std::io::stdout();

        loop {
            print!("\n> ");
            stdout.flush().ok();

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match ReplInput::parse(&line) {
                ReplInput::Empty => continue,
                ReplInput::Quit => break,
                ReplInput::Help => self.print_help(),
                ReplInput::Quick(None) => self.output.quick_questions(),
                ReplInput::Quick(Some(n)) => match quick_question(n) {
                    Some(question) => self.ask_in_loop(question, &context).await,
                    None => self
                        .output
                        .warning("Pick a quick question between 1 and 5."),
                },
                ReplInput::Ask(question) => self.ask_in_loop(&question, &context).await,
                ReplInput::Clear => {
                    self.chat.clear();
                    self.output.info("Chat cleared.");
                }
                ReplInput::Status => {
                    let status = self.chat.system_status();
                    self.output.indicator("API", status.api);
                    let health = self.chat.refresh_backend_status().await;
                    self.output.indicator("Backend", health);
                }
                ReplInput::Health => {
                    let report = self.chat.test_connection().await;
                    if report.reachable {
                        self.output.success(&report.message);
                    } else {
                        self.output.warning(&report.message);
                    }
                }
                ReplInput::Logout => self.session.logout(),
                ReplInput::Unknown(input) => {
                    self.output
                        .warning(&format!("Unknown command: {}. Type /help.", input));
                }
            }

            if self.navigator.take() == Some(Route::Login) {
                self.output.info("Signed out.");
                self.output.command("crop-advisor login");
                break;
            }
        }

        Ok(())
    }

    async fn ask_in_loop(&self, question: &str, context: &ChatContext) {
        let before = self.chat.len();
        if let SendOutcome::Ignored(SendRejected::InFlight) =
            self.send_with_spinner(question, context).await
        {
            self.output.warning("Still waiting for the previous answer.");
            return;
        }
        for message in self.chat.messages().iter().skip(before) {
            self.output.message(message);
        }
    }

    async fn send_with_spinner(&self, question: &str, context: &ChatContext) -> SendOutcome {
        let spinner = thinking_spinner();
        let outcome = self.chat.send(question, context).await;
        spinner.finish_and_clear();
        outcome
    }

    fn print_help(&self) {
        self.output.header("Commands");
        self.output.kv("/quick", "list example questions");
        self.output.kv("/quick N", "ask example question N");
        self.output.kv("/clear", "clear the conversation");
        self.output.kv("/status", "show API and advisory status");
        self.output.kv("/health", "test the backend connection");
        self.output.kv("/logout", "sign out");
        self.output.kv("/quit", "leave the chat");
    }
}

// Every exit path, including errors and Ctrl-C, ends the process session.
impl Drop for App {
    fn drop(&mut self) {
        self.session.unload();
    }
}

/// `name <email>`, or whichever of the two the backend sent.
fn user_label(user: &UserInfo) -> Option<String> {
    match (user.name.as_deref(), user.email.as_deref()) {
        (Some(name), Some(email)) => Some(format!("{} <{}>", name, email)),
        (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
        (None, None) => None,
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(THINKING);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Unknown => "unknown",
        SessionStatus::Checking => "checking",
        SessionStatus::Authenticated => "signed in",
        SessionStatus::Unauthenticated => "signed out",
    }
}

/// Load configuration, apply overrides and dispatch the subcommand.
pub async fn run(cli: Cli) -> Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AdvisorConfig::load_or_default(cli.config.as_deref())?;
    config.apply_env();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    config.validate()?;

    logging::init(&config.logging, cli.verbose);

    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };
    let app = App::new(config, output)?;

    let result = tokio::select! {
        result = dispatch(&app, cli.command) => result,
        _ = tokio::signal::ctrl_c() => {
            debug!("interrupted");
            println!();
            Ok(())
        }
    };
    result
}

async fn dispatch(app: &App, command: Option<Commands>) -> Result<()> {
    match command {
        None => app.chat(&ContextArgs::default()).await,
        Some(Commands::Chat { context }) => app.chat(&context).await,
        Some(Commands::Login { email, password }) => app.login(email, password).await,
        Some(Commands::Register {
            name,
            email,
            password,
        }) => app.register(name, email, password).await,
        Some(Commands::Logout) => {
            app.logout();
            Ok(())
        }
        Some(Commands::Ask { question, context }) => app.ask(&question, &context).await,
        Some(Commands::Status) => app.status().await,
    }
}
