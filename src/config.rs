use clap::Parser;

/// Runtime configuration, from CLI flags or the matching environment
/// variables (a `.env` file is loaded before parsing). All values are
/// read-only for the lifetime of the process.
#[derive(Parser, Debug, Clone)]
#[command(name = "phrasebot")]
#[command(about = "Telegram bot that completes phrases with a local Ollama model")]
pub struct Args {
    /// Telegram bot API token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// Ollama server base URL
    #[arg(long, env = "OLLAMA_HOST", default_value = "http://localhost:11434")]
    pub ollama_host: String,

    /// Model identifier passed to the backend
    #[arg(long, env = "AI_MODEL", default_value = "gpt-oss:20b")]
    pub model: String,

    /// Output length cap (num_predict)
    #[arg(long, env = "MAX_TOKENS", default_value_t = 100)]
    pub max_tokens: u32,

    /// Sampling temperature
    #[arg(long, env = "TEMPERATURE", default_value_t = 0.7)]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[arg(long, env = "TOP_P", default_value_t = 0.9)]
    pub top_p: f32,

    /// Max admitted requests per identity per window
    #[arg(long, env = "MAX_REQUESTS_PER_MINUTE", default_value_t = 5)]
    pub rate_limit: u32,

    /// Rate limit window in seconds
    #[arg(long, env = "RATE_WINDOW_SECS", default_value_t = 60)]
    pub rate_window: u64,

    /// Route Telegram traffic through a proxy
    #[arg(long, env = "USE_PROXY", default_value_t = false)]
    pub use_proxy: bool,

    /// Proxy URL, only used with --use-proxy
    #[arg(long, env = "PROXY_URL")]
    pub proxy_url: Option<String>,

    /// Log level filter when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Port for the health/metrics endpoint
    #[arg(long, env = "METRICS_PORT", default_value_t = 8080)]
    pub metrics_port: u16,
}
