use std::time::Duration;

use crate::config::Args;
use crate::gateway::CompletionGateway;
use crate::rate_limit::RateLimiter;

/// Shared state behind every message handler.
pub struct AppState {
    pub limiter: RateLimiter,
    pub gateway: CompletionGateway,
}

impl AppState {
    pub fn from_args(args: &Args) -> Result<Self, reqwest::Error> {
        Ok(Self {
            limiter: RateLimiter::new(args.rate_limit, Duration::from_secs(args.rate_window)),
            gateway: CompletionGateway::new(
                &args.ollama_host,
                args.model.clone(),
                args.max_tokens,
                args.temperature,
                args.top_p,
            )?,
        })
    }
}
