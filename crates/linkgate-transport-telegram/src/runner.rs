use crate::bot;
use crate::bot::handlers::{get_user_id_safe, Command};
use crate::bot::TelegramMembershipChecker;
use linkgate_core::config::GateSettings;
use anyhow::{Context, Result};
use linkgate_core::shortener::TinyUrlClient;
use linkgate_core::GateContext;
use std::sync::Arc;
use teloxide::dispatching::{ShutdownToken, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{error, info, warn};

/// Run the Telegram transport runtime until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the bot's service clients cannot be constructed.
pub async fn run_bot(settings: Arc<GateSettings>) -> Result<()> {
    let bot = Bot::new(settings.bot_token.clone());
    let ctx = init_context(&bot, settings)?;
    let handler = setup_handler();

    info!(
        "Bot is running (channel: {}, admin: {})...",
        ctx.settings().channel_id,
        ctx.settings().admin_id
    );

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build();

    spawn_sigterm_handler(dispatcher.shutdown_token());

    dispatcher.dispatch().await;

    info!("Bot stopped.");
    Ok(())
}

fn init_context(bot: &Bot, settings: Arc<GateSettings>) -> Result<Arc<GateContext>> {
    let membership = Arc::new(TelegramMembershipChecker::new(bot.clone()));
    let shortener = Arc::new(
        TinyUrlClient::from_settings(&settings).context("Failed to build shortener client")?,
    );
    info!(
        "Shortener client initialized ({}, timeout {}s).",
        settings.shortener_api_url, settings.shortener_timeout_secs
    );

    Ok(Arc::new(GateContext::new(settings, membership, shortener)))
}

#[cfg(unix)]
fn spawn_sigterm_handler(token: ShutdownToken) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                return;
            }
        };
        sigterm.recv().await;
        info!("SIGTERM received, stopping the dispatcher...");
        match token.shutdown() {
            Ok(stopped) => stopped.await,
            Err(e) => warn!("Dispatcher was not running: {}", e),
        }
    });
}

#[cfg(not(unix))]
fn spawn_sigterm_handler(_token: ShutdownToken) {}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handle_callback))
        .branch(
            Update::filter_message()
                // Anonymous admins and channel forwards carry no user to check
                .filter(|msg: Message| msg.from.is_some())
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(
                    dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_text),
                ),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: Arc<GateContext>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::command(bot, msg, cmd, ctx).await {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_text(
    bot: Bot,
    msg: Message,
    ctx: Arc<GateContext>,
) -> Result<(), teloxide::RequestError> {
    let user_id = get_user_id_safe(&msg);
    if let Err(e) = bot::handlers::handle_text(bot, msg, ctx).await {
        error!("Text handler error for user {}: {}", user_id, e);
    }
    respond(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    ctx: Arc<GateContext>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::handle_callback(bot, q, ctx).await {
        error!("Callback handler error: {}", e);
    }
    respond(())
}
