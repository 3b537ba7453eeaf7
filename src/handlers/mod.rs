mod commands;
mod completion;
mod health;
mod metrics;

use std::sync::Arc;

use teloxide::prelude::*;

use crate::state::AppState;

pub use commands::{help_text, parse_command, start_text, Command};
pub use completion::{invalid_text_reply, rate_limited_reply, reply_for_result};
pub use health::health_handler;
pub use metrics::{metrics_handler, refresh_gauges};

/// Entry point for every incoming Telegram message.
///
/// Commands get their static replies; any other text runs the
/// completion pipeline. Non-text updates are ignored.
pub async fn handle_update(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if text.starts_with('/') {
        commands::handle_command(&bot, &msg, text).await
    } else {
        completion::handle_text(&bot, &msg, text, &state).await
    }
}
