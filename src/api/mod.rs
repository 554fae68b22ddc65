//! HTTP API client for the knowledge-base data service.

mod client;

pub use client::{ApiClient, DEFAULT_API_BASE};
