use teloxide::prelude::*;

/// Bot commands the front-end understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Unknown,
}

/// Parse a `/command` message, tolerating the `@botname` suffix.
pub fn parse_command(text: &str) -> Command {
    let first = text.split_whitespace().next().unwrap_or("");
    let name = first.split_once('@').map_or(first, |(head, _)| head);
    match name {
        "/start" => Command::Start,
        "/help" => Command::Help,
        _ => Command::Unknown,
    }
}

pub fn start_text() -> &'static str {
    "Hi! Send me the beginning of a phrase and I will continue it \
     with a few words using a locally hosted model.\n\n\
     Use /help for details."
}

pub fn help_text() -> &'static str {
    "Send any text between 1 and 500 characters and I will reply with \
     a short continuation of your phrase.\n\n\
     Commands:\n\
     /start - what this bot does\n\
     /help - this message"
}

pub async fn handle_command(bot: &Bot, msg: &Message, text: &str) -> ResponseResult<()> {
    let reply = match parse_command(text) {
        Command::Start => start_text(),
        Command::Help | Command::Unknown => help_text(),
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command("/start"), Command::Start);
        assert_eq!(parse_command("/help"), Command::Help);
        assert_eq!(parse_command("/start@phrasebot extra"), Command::Start);
    }

    #[test]
    fn everything_else_is_unknown() {
        assert_eq!(parse_command("/frobnicate"), Command::Unknown);
        assert_eq!(parse_command("/"), Command::Unknown);
    }
}
