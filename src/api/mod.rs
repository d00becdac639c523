//! HTTP client for the advisory backend
//!
//! This module provides the native transport behind the core collaborator
//! traits, built on reqwest.
//!
//! # Backend Endpoints
//!
//! All paths are relative to the configured base URL
//! (default `http://localhost:8000/api/v1`).
//!
//! ## Authentication
//! - `POST /login` - Exchange email and password for a bearer token
//! - `POST /register` - Create an account and receive a bearer token
//! - `GET /protected` - Check that a bearer token is still valid
//!
//! ## Chat
//! - `POST /chat` - Ask a question with the farm's location and crop
//!
//! ## Status
//! - `GET /rag/status` - Liveness of the advisory subsystem
//! - `GET /health` - Backend liveness
//!
//! Failed calls are reported as [`ClientError`](crop_advisor_core::ClientError)
//! values classified by [`classify`].

/// Failure classification for reqwest errors.
pub mod classify;
/// The reqwest-backed [`AdvisorClient`].
pub mod client;

pub use client::AdvisorClient;
