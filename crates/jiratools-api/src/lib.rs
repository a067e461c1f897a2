//! jira-tools JIRA API client
//!
//! Authenticated client for the JIRA Cloud REST v3 API: a retrying request
//! executor plus the named issue operations built on top of it.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod types;

pub use client::JiraClient;
pub use config::JiraConfig;
pub use error::{ApiError, ApiErrorKind, Error, Result};
pub use executor::{ApiRequest, Idempotency, RequestExecutor, RetryPolicy};
pub use types::*;
