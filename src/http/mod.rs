//! HTTP client module
//!
//! Provides the HTTP client used to talk to forum GraphQL endpoints.
//!
//! # Features
//!
//! - **Fixed identity**: every request carries the configured `User-Agent`
//! - **Optional Retries**: off by default, configurable backoff when enabled
//! - **Optional Rate Limiting**: token bucket rate limiter using governor

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
