use std::time::{Duration, Instant};

use teloxide::prelude::*;
use teloxide::types::ChatAction;
use tracing::{error, info, warn};

use crate::gateway::{valid_text, CompletionError, MAX_TEXT_CHARS};
use crate::metrics::{
    COMPLETIONS_TOTAL, COMPLETION_FAILURES_TOTAL, COMPLETION_INTERNAL_ERRORS_TOTAL,
    COMPLETION_LATENCY, COMPLETION_MALFORMED_TOTAL, COMPLETION_UNREACHABLE_TOTAL,
    COMPLETION_UPSTREAM_ERRORS_TOTAL, MESSAGES_TOTAL, RATE_LIMITED_TOTAL,
};
use crate::state::AppState;

/// Run the completion pipeline for one plain-text message:
/// validate, admit, call the gateway, render the outcome.
pub async fn handle_text(
    bot: &Bot,
    msg: &Message,
    text: &str,
    state: &AppState,
) -> ResponseResult<()> {
    MESSAGES_TOTAL.inc();

    // messages without a sender (channel posts etc.) carry no identity
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let identity = user.id.0;

    let Some(text) = valid_text(text) else {
        bot.send_message(msg.chat.id, invalid_text_reply()).await?;
        return Ok(());
    };

    if !state.limiter.check(identity).is_admitted() {
        RATE_LIMITED_TOTAL.inc();
        warn!(user = identity, "rate limit exceeded");
        let reply = rate_limited_reply(state.limiter.limit(), state.limiter.window());
        bot.send_message(msg.chat.id, reply).await?;
        return Ok(());
    }

    info!(user = identity, chars = text.chars().count(), "completing phrase");
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let started = Instant::now();
    let result = state.gateway.complete(text).await;
    COMPLETION_LATENCY.observe(started.elapsed().as_secs_f64());

    match &result {
        Ok(_) => COMPLETIONS_TOTAL.inc(),
        Err(err) => {
            record_failure(err);
            error!(user = identity, error = %err, "completion failed");
        }
    }

    bot.send_message(msg.chat.id, reply_for_result(text, &result))
        .await?;
    Ok(())
}

/// Count a failed completion, both in aggregate and per kind.
fn record_failure(err: &CompletionError) {
    COMPLETION_FAILURES_TOTAL.inc();
    match err {
        CompletionError::Unreachable(_) => COMPLETION_UNREACHABLE_TOTAL.inc(),
        CompletionError::Upstream(_) => COMPLETION_UPSTREAM_ERRORS_TOTAL.inc(),
        CompletionError::EmptyOrMalformed => COMPLETION_MALFORMED_TOTAL.inc(),
        // validation short-circuits before the gateway is called, so
        // InvalidInput here means something unexpected happened
        CompletionError::InvalidInput | CompletionError::Internal(_) => {
            COMPLETION_INTERNAL_ERRORS_TOTAL.inc()
        }
    }
}

pub fn invalid_text_reply() -> String {
    format!(
        "⚠️ Your message must be between 1 and {MAX_TEXT_CHARS} characters \
         and not consist only of whitespace."
    )
}

pub fn rate_limited_reply(limit: u32, window: Duration) -> String {
    let secs = window.as_secs();
    let per = if secs == 60 {
        "minute".to_string()
    } else {
        format!("{secs} seconds")
    };
    format!(
        "⏳ You are sending requests too often. Please wait a bit. \
         (Limit: {limit} requests per {per})"
    )
}

/// Map a completion outcome to the user-facing reply text.
pub fn reply_for_result(text: &str, result: &Result<String, CompletionError>) -> String {
    match result {
        Ok(completion) => {
            format!("Your phrase:\n{text}\n\nContinuation:\n{completion}")
        }
        Err(CompletionError::InvalidInput) => invalid_text_reply(),
        Err(CompletionError::Unreachable(_)) => {
            "⚠️ Cannot connect to the model service. Please try again later.".to_string()
        }
        Err(CompletionError::Upstream(_)) | Err(CompletionError::EmptyOrMalformed) => {
            "⚠️ Something went wrong while generating a response. \
             Try rephrasing your request."
                .to_string()
        }
        Err(CompletionError::Internal(_)) => {
            "🤖 An internal error occurred. We are already looking into it.".to_string()
        }
    }
}
