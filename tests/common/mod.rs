//! Shared helpers for integration tests against a mocked advisory backend.

#![allow(dead_code)]

use crop_advisor::AdvisorClient;
use serde_json::json;
use std::io::Read;
use std::net::TcpListener;
use std::time::Duration;
use wiremock::MockServer;

/// Path prefix the backend serves its API under.
pub const API_PREFIX: &str = "/api/v1";

/// Base URL for a client talking to `server`.
pub fn base_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), API_PREFIX)
}

/// Full mock path for an endpoint, e.g. `api_path("/chat")`.
pub fn api_path(endpoint: &str) -> String {
    format!("{}{}", API_PREFIX, endpoint)
}

/// Client with short deadlines so failure tests stay fast.
pub fn client_for(server: &MockServer) -> AdvisorClient {
    AdvisorClient::new(base_url(server))
        .unwrap()
        .with_chat_timeout(Duration::from_secs(5))
        .with_request_timeout(Duration::from_secs(5))
}

/// Base URL on a port nothing listens on.
pub fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}{}", port, API_PREFIX)
}

/// Base URL of a server that reads one request and hangs up without answering.
pub fn hang_up_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
        }
    });
    format!("http://127.0.0.1:{}{}", port, API_PREFIX)
}

/// `POST /chat` body answering the maize planting question.
pub fn planting_answer() -> serde_json::Value {
    json!({
        "response": "Plant in March",
        "agent_breakdown": [
            { "agent_type": "weather_expert", "confidence": 0.9 }
        ]
    })
}
