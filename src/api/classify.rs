//! Maps reqwest failures onto the shared failure taxonomy.

use crop_advisor_core::error::{detail_from_body, ClientError, FailureSignals};
use std::error::Error as StdError;
use std::io;

/// Describe a transport-level reqwest error and classify it.
///
/// A timed-out call is reported only as a timeout: reqwest marks deadline
/// errors as request errors too, which would otherwise shadow the timeout.
pub fn classify_transport(err: &reqwest::Error) -> ClientError {
    if err.is_decode() {
        return ClientError::Decode(err.to_string());
    }

    let timed_out = err.is_timeout();
    let signals = FailureSignals {
        connection_refused: err.is_connect() && is_connection_refused(err),
        http_status: err.status().map(|s| (s.as_u16(), None)),
        request_sent: !timed_out && !err.is_connect() && (err.is_request() || err.is_body()),
        network: !timed_out && (err.is_connect() || err.is_request()),
        timed_out,
        message: error_chain(err),
    };
    signals.classify()
}

/// Classify a non-success response from its status and body.
pub fn classify_status(status: reqwest::StatusCode, body: &str) -> ClientError {
    FailureSignals::new(format!("HTTP {}", status))
        .with_status(status.as_u16(), detail_from_body(body))
        .classify()
}

fn is_connection_refused(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(e) = source {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = e.source();
    }
    error_chain(err).to_lowercase().contains("connection refused")
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        text.push_str(": ");
        text.push_str(&e.to_string());
        source = e.source();
    }
    text
}
