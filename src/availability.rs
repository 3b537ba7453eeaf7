use std::time::Duration;

use reqwest::Client;
use tracing::{error, info, warn};

const OLLAMA_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const TELEGRAM_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Probe the Ollama server root. Ollama answers GET / with 200.
pub async fn check_ollama(client: &Client, host: &str) -> bool {
    info!(%host, "checking Ollama API availability");
    match client
        .get(host)
        .timeout(OLLAMA_PROBE_TIMEOUT)
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            info!("Ollama API is available");
            true
        }
        Ok(resp) => {
            error!(status = %resp.status(), "Ollama API returned an unexpected status");
            false
        }
        Err(err) => {
            error!(error = %err, "cannot reach the Ollama API, is the server running?");
            false
        }
    }
}

/// Probe the Telegram API. A failure here is only a hint to enable the
/// proxy, not a fatal condition.
pub async fn check_telegram(client: &Client) -> bool {
    info!("checking Telegram API availability");
    match client
        .get("https://api.telegram.org")
        .timeout(TELEGRAM_PROBE_TIMEOUT)
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            info!("Telegram API is available");
            true
        }
        Ok(resp) => {
            warn!(status = %resp.status(), "Telegram API returned an unexpected status, a proxy may be needed");
            false
        }
        Err(err) => {
            warn!(error = %err, "cannot reach the Telegram API directly, a proxy may be needed");
            false
        }
    }
}
