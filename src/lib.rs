//! Telegram bot that completes user phrases with a locally hosted
//! Ollama model.
//!
//! The kernel is the pair of [`rate_limit::RateLimiter`] (per-user
//! sliding-window admission control) and [`gateway::CompletionGateway`]
//! (single-flight inference call with typed failure classification).
//! Everything else is the Telegram front-end, configuration and
//! observability around them.

pub mod availability;
pub mod config;
pub mod gateway;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
