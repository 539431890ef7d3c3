use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::Me;
use tracing::{error, info, warn};

use crate::command::Command;
use crate::config::Config;
use crate::kg::KgClient;

/// Reply for `!ask` with no query text.
const EMPTY_QUERY_REPLY: &str = "Ask me something, e.g. !ask Ada Lovelace";

const HELP_REPLY: &str = "I look up entities in the Google Knowledge Graph.\n\n\
     Commands:\n\
     !ask <something> - Look up an entity\n\
     !help - Show this message";

/// Start the Telegram bot
pub async fn run(config: Config) -> Result<()> {
    let bot = Bot::new(&config.telegram.bot_token);

    let me = bot.get_me().await?;
    info!("Logged in as @{}", me.username());

    let kg = Arc::new(KgClient::new(config.knowledge_graph.clone()));

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![kg, me])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("bot"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    me: Me,
    kg: Arc<KgClient>,
) -> ResponseResult<()> {
    // Never react to our own messages; replying to ourselves would loop.
    if let Some(user) = msg.from.as_ref() {
        if user.id == me.id {
            return Ok(());
        }
    }

    let text = match msg.text() {
        Some(t) => t,
        None => return Ok(()),
    };

    let command = match Command::parse(text) {
        Some(c) => c,
        None => return Ok(()),
    };

    info!("Command in chat {}: {}", msg.chat.id, text);

    match command {
        Command::Help => {
            bot.send_message(msg.chat.id, HELP_REPLY).await?;
        }
        Command::AskEmpty => {
            bot.send_message(msg.chat.id, EMPTY_QUERY_REPLY).await?;
        }
        Command::Ask(query) => match kg.get_answer(&query).await {
            Ok(answer) => {
                bot.send_message(msg.chat.id, answer).await?;
            }
            Err(e) => {
                // Drop the event; the dispatcher carries on with the next one.
                error!("Knowledge graph lookup failed: {:#}", e);
            }
        },
    }

    Ok(())
}
