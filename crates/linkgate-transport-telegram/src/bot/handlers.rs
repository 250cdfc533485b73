use crate::bot::TelegramChatTransport;
use anyhow::Result;
use linkgate_core::reply::CallbackAction;
use linkgate_core::transport::ChatTransport;
use linkgate_core::GateContext;
use std::sync::Arc;
use teloxide::{prelude::*, types::CallbackQuery, utils::command::BotCommands};
use tracing::{debug, info};

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Supported commands for the bot
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome card
    #[command(description = "Start the bot.")]
    Start,
    /// Show usage statistics (admin only)
    #[command(description = "Admin panel.")]
    Admin,
}

/// Command handler
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn command(bot: Bot, msg: Message, cmd: Command, ctx: Arc<GateContext>) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let chat = TelegramChatTransport::for_message(bot, &msg);

    match cmd {
        Command::Start => {
            info!("User {user_id} initiated /start command.");
            ctx.on_start(&chat, user_id).await
        }
        Command::Admin => {
            info!("Admin command received from user {user_id}.");
            ctx.on_admin_command(&chat, user_id).await
        }
    }
}

/// Text message handler
///
/// # Errors
///
/// Returns an error if a reply cannot be sent.
pub async fn handle_text(bot: Bot, msg: Message, ctx: Arc<GateContext>) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let user_id = get_user_id_safe(&msg);
    let chat = TelegramChatTransport::for_message(bot, &msg);

    ctx.on_text_message(&chat, user_id, text).await
}

/// Inline button handler
///
/// # Errors
///
/// Returns an error if the callback cannot be answered or the message edited.
pub async fn handle_callback(bot: Bot, q: CallbackQuery, ctx: Arc<GateContext>) -> Result<()> {
    let user_id = q.from.id.0.cast_signed();
    let chat = TelegramChatTransport::for_callback(bot, &q);

    match q.data.as_deref().map(str::parse::<CallbackAction>) {
        Some(Ok(CallbackAction::CheckSubscription)) => {
            ctx.on_check_subscription(&chat, user_id).await
        }
        Some(Ok(CallbackAction::Shorten)) => ctx.on_shorten_action(&chat, user_id).await,
        Some(Err(e)) => {
            debug!("Ignoring callback from user {user_id}: {e}");
            chat.answer_callback(None, false).await
        }
        None => chat.answer_callback(None, false).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_parse() {
        assert!(matches!(
            Command::parse("/start", "linkgate_bot"),
            Ok(Command::Start)
        ));
        assert!(matches!(
            Command::parse("/admin@linkgate_bot", "linkgate_bot"),
            Ok(Command::Admin)
        ));
        assert!(Command::parse("/stats", "linkgate_bot").is_err());
    }
}
