//! # API Shared
//!
//! Shared utilities and definitions for the intake APIs.
//!
//! Contains:
//! - Wire request/response types (`wire` module)
//! - The shared `HealthService`
//! - A blocking HTTP client for driving a remote intake service
//!
//! Used by `api-rest` for the server side and by `intake-cli` for the
//! remote mode.

pub mod client;
pub mod health;
pub mod wire;

pub use client::{ApiClient, ClientError};
pub use health::HealthService;
pub use wire::*;
