use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{routing::get, Router};
use clap::Parser;
use teloxide::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use phrasebot::availability;
use phrasebot::config::Args;
use phrasebot::handlers;
use phrasebot::state::AppState;

/// How often idle rate-limit windows get swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("starting phrasebot");

    let probe_client = reqwest::Client::new();
    if !availability::check_ollama(&probe_client, &args.ollama_host).await {
        anyhow::bail!("Ollama API is unavailable at {}", args.ollama_host);
    }
    if !args.use_proxy && !availability::check_telegram(&probe_client).await {
        warn!("Telegram API unreachable directly, consider USE_PROXY=true");
    }

    let state = Arc::new(AppState::from_args(&args).context("building app state")?);

    spawn_metrics_server(args.metrics_port).await?;
    spawn_sweeper(Arc::clone(&state));

    let bot = build_bot(&args)?;
    info!(
        model = %args.model,
        rate_limit = args.rate_limit,
        rate_window = args.rate_window,
        "bot is ready, starting polling"
    );

    let repl_state = Arc::clone(&state);
    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let state = Arc::clone(&repl_state);
        async move { handlers::handle_update(bot, msg, state).await }
    })
    .await;

    info!("bot stopped");
    Ok(())
}

fn build_bot(args: &Args) -> anyhow::Result<Bot> {
    if !args.use_proxy {
        return Ok(Bot::new(args.bot_token.clone()));
    }

    let proxy_url = args
        .proxy_url
        .as_deref()
        .context("--use-proxy requires PROXY_URL to be set")?;
    info!(%proxy_url, "routing Telegram traffic through a proxy");

    let client = reqwest::Client::builder()
        .proxy(reqwest::Proxy::all(proxy_url).context("invalid proxy URL")?)
        .connect_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(30))
        .build()
        .context("building proxied HTTP client")?;
    Ok(Bot::with_client(args.bot_token.clone(), client))
}

/// Serve /health and /metrics on the configured port.
async fn spawn_metrics_server(port: u16) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler));

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding metrics endpoint on {addr}"))?;
    info!(%addr, "metrics endpoint listening");

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            error!(error = %err, "metrics server exited");
        }
    });
    Ok(())
}

/// Periodically drop idle identities so the limiter map stays bounded.
fn spawn_sweeper(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            state.limiter.sweep();
            handlers::refresh_gauges(state.limiter.tracked_identities());
        }
    });
}
