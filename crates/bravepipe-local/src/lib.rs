//! Local implementations for bravepipe: the per-endpoint rate limiter and the
//! reqwest-backed Brave Search API client.

pub mod client;
pub mod limit;

pub use client::BraveClient;
pub use limit::RateLimiter;
