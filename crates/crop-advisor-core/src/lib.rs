//! # crop-advisor-core
//!
//! Platform-neutral heart of the Crop Advisor clients: the backend wire
//! types, the failure taxonomy, the session state machine and the chat
//! transcript. Nothing in here performs I/O on its own; the HTTP transport,
//! token storage and navigation are collaborators supplied by each front end:
//!
//! | Seam | Native (`crop-advisor`) | Browser (`crop-advisor-ui`) |
//! |------|-------------------------|-----------------------------|
//! | [`session::AuthApi`], [`chat::ChatApi`], [`status::StatusApi`] | reqwest | gloo-net |
//! | [`session::TokenStore`] | token file | `localStorage` |
//! | [`session::Navigator`] | terminal prompts | router redirects |
//!
//! The collaborator traits are `?Send` so browser fetch futures can
//! implement them.
//!
//! ## Example
//!
//! ```rust,ignore
//! use crop_advisor_core::chat::{ChatContext, ChatSession};
//!
//! let chat = ChatSession::new(client);
//! chat.send("When should I plant maize?", &ChatContext::default()).await;
//! for message in chat.messages() {
//!     println!("{}: {}", message.sender(), message.content);
//! }
//! ```

pub mod chat;
pub mod error;
pub mod flight;
pub mod session;
pub mod status;
pub mod types;

pub use chat::{ChatContext, ChatMessage, ChatSession, MessageKind, SendOutcome};
pub use error::{ClientError, FailureSignals, Result};
pub use session::{AuthResult, Gate, Route, SessionManager, SessionStatus, TokenStore};
pub use status::{Indicator, SystemStatus};
