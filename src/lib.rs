//! # Crop Advisor
//!
//! Native client for the Ethiopia Crop Advisor service: sign in, keep the
//! session between runs, and put agricultural questions to the backend's
//! panel of experts.
//!
//! The session state machine, the chat transcript and the wire types live in
//! [`crop_advisor_core`]. This crate supplies their native collaborators:
//!
//! - [`api::AdvisorClient`] - reqwest transport for every backend endpoint
//! - [`session::FileTokenStore`] - the bearer token kept in a private file
//! - [`utils::config::AdvisorConfig`] - `crop-advisor.toml` plus environment overrides
//! - [`cli`] - the `crop-advisor` terminal front end
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use crop_advisor::{AdvisorClient, FileTokenStore};
//! use crop_advisor_core::chat::{ChatContext, ChatSession};
//! use crop_advisor_core::session::{NoopNavigator, SessionManager};
//! use std::sync::Arc;
//!
//! let store = Arc::new(FileTokenStore::new("/tmp/crop-advisor/token"));
//! let client = AdvisorClient::new("http://localhost:8000/api/v1")?
//!     .with_token_store(store.clone());
//!
//! let session = SessionManager::new(client.clone(), store, Arc::new(NoopNavigator));
//! session.login("farmer@example.org", "secret").await;
//!
//! let chat = ChatSession::new(client);
//! chat.send("When is the best time to plant maize?", &ChatContext::default()).await;
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

/// reqwest transport and failure classification.
pub mod api;
/// Terminal front end.
pub mod cli;
/// Tracing subscriber setup.
pub mod logging;
/// File-backed token storage.
pub mod session;
/// Error type and re-exported wire types.
pub mod types;
/// Configuration loading.
pub mod utils;

pub use api::AdvisorClient;
pub use session::FileTokenStore;
pub use types::{AdvisorError, Result};
pub use utils::config::{AdvisorConfig, ConfigError};
