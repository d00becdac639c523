//! Chat request/response cycle.

use super::transcript::{ChatMessage, MessageId, Transcript};
use super::ChatContext;
use crate::error::{ClientError, Result};
use crate::flight::FlightGuard;
use crate::status::{ConnectionReport, Indicator, StatusApi, SystemStatus};
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Backend chat endpoint.
#[async_trait(?Send)]
pub trait ChatApi {
    /// `POST /chat`
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

/// Why a send did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    /// Input was empty after trimming.
    Empty,
    /// A previous send has not settled yet.
    InFlight,
}

/// Result of one [`ChatSession::send`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Nothing was appended.
    Ignored(SendRejected),
    /// An assistant message was appended.
    Answered(MessageId),
    /// An error message was appended.
    Failed(ClientError),
}

/// A send that has passed validation and shown the user message.
///
/// Holds the in-flight claim; dropping it without settling releases the
/// claim, leaving only the user message in the transcript.
#[derive(Debug)]
pub struct PendingSend {
    request: ChatRequest,
    _guard: FlightGuard,
}

impl PendingSend {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// Transcript plus the calls that feed it.
pub struct ChatSession<A> {
    api: A,
    transcript: Mutex<Transcript>,
    status: Mutex<SystemStatus>,
    sending: Arc<AtomicBool>,
}

impl<A> ChatSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            transcript: Mutex::new(Transcript::new()),
            status: Mutex::new(SystemStatus::default()),
            sending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Copy of the current messages.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.lock().messages().to_vec()
    }

    pub fn len(&self) -> usize {
        self.transcript.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.lock().is_empty()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    pub fn system_status(&self) -> SystemStatus {
        *self.status.lock()
    }

    /// Drop every message. The session and status are untouched.
    pub fn clear(&self) {
        self.transcript.lock().clear();
        debug!("transcript cleared");
    }

    /// Validate the input, claim the in-flight slot and append the user
    /// message. The caller then passes the result to [`settle`](Self::settle).
    pub fn begin(
        &self,
        text: &str,
        context: &ChatContext,
    ) -> std::result::Result<PendingSend, SendRejected> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendRejected::Empty);
        }
        let guard = FlightGuard::try_begin(&self.sending).ok_or(SendRejected::InFlight)?;

        self.transcript.lock().push_user(text);
        Ok(PendingSend {
            request: ChatRequest {
                message: text.to_string(),
                location: context.location.clone(),
                crop_type: context.crop_type.clone(),
            },
            _guard: guard,
        })
    }
}

impl<A: ChatApi> ChatSession<A> {
    /// Send one question and record the answer or the failure.
    pub async fn send(&self, text: &str, context: &ChatContext) -> SendOutcome {
        match self.begin(text, context) {
            Ok(pending) => self.settle(pending).await,
            Err(reason) => {
                debug!(?reason, "send ignored");
                SendOutcome::Ignored(reason)
            }
        }
    }

    /// Issue the network call for a begun send and append its result.
    ///
    /// The in-flight claim is released when `pending` drops at the end of
    /// this call, whatever the outcome.
    pub async fn settle(&self, pending: PendingSend) -> SendOutcome {
        debug!(
            location = %pending.request.location,
            crop_type = %pending.request.crop_type,
            "sending chat request"
        );

        match self.api.chat(&pending.request).await {
            Ok(response) => {
                let id = self.transcript.lock().push_assistant(&response).id;
                self.status.lock().api = Indicator::Active;
                info!(
                    experts = response.agent_breakdown.as_ref().map_or(0, Vec::len),
                    "chat answered"
                );
                SendOutcome::Answered(id)
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                self.transcript.lock().push_error(e.chat_message());
                self.status.lock().api = Indicator::Inactive;
                SendOutcome::Failed(e)
            }
        }
    }
}

impl<A: StatusApi> ChatSession<A> {
    /// Probe the advisory subsystem and record the result.
    pub async fn refresh_backend_status(&self) -> Indicator {
        let indicator = match self.api.rag_status().await {
            Ok(_) => Indicator::Active,
            Err(e) => {
                warn!(error = %e, "advisory status check failed");
                Indicator::Inactive
            }
        };
        self.status.lock().backend_health = indicator;
        indicator
    }

    /// Probe `/health` and describe the result for the user.
    pub async fn test_connection(&self) -> ConnectionReport {
        let report = match self.api.health().await {
            Ok(health) => ConnectionReport::reachable(&health.status),
            Err(e) => {
                warn!(error = %e, "health check failed");
                ConnectionReport::unreachable()
            }
        };
        self.status.lock().backend_health = if report.reachable {
            Indicator::Active
        } else {
            Indicator::Inactive
        };
        report
    }
}
