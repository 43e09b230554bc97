//! Telegram long-polling loop wired to the navigation engine

use std::sync::Arc;
use std::time::Duration;
use lb_core::{Delivery, InMemorySessionStore, NavigationEngine, Reply, Screen, UserId};
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::payloads::setters::*;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId, ParseMode};
use teloxide::utils::command::BotCommands;
use teloxide::{ApiError, RequestError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::keyboard;

/// Engine type shared with every handler
pub type BotEngine = NavigationEngine<InMemorySessionStore>;

type HandlerResult = anyhow::Result<()>;

/// Supported commands
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "open the main menu")]
    Start,
}

/// Routing tree: commands first, then button presses
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(on_command),
        )
        .branch(Update::filter_callback_query().endpoint(on_callback))
}

/// Run the dispatcher until Ctrl-C
pub async fn run(bot: Bot, engine: Arc<BotEngine>) {
    info!("Starting long polling");
    
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![engine])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    
    info!("Dispatcher stopped");
}

/// Periodically drop sessions that have been idle longer than `ttl`
pub fn spawn_idle_sweeper(sessions: Arc<InMemorySessionStore>, ttl: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ttl);
        loop {
            interval.tick().await;
            let evicted = sessions.evict_idle(ttl);
            if evicted > 0 {
                debug!(evicted, "Evicted idle sessions");
            }
        }
    })
}

async fn on_command(bot: Bot, msg: Message, cmd: Command, engine: Arc<BotEngine>) -> HandlerResult {
    match cmd {
        Command::Start => {
            let Some(user) = msg.from.as_ref() else {
                return Ok(());
            };
            let reply = engine.start(UserId(user.id.0));
            if let Reply::Show { screen, .. } = reply {
                show(&bot, msg.chat.id, None, &screen).await?;
            }
        }
    }
    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, engine: Arc<BotEngine>) -> HandlerResult {
    let user = UserId(q.from.id.0);
    let payload = q.data.as_deref().unwrap_or_default();
    
    match engine.handle_payload(user, payload) {
        Reply::Notice(section) => {
            bot.answer_callback_query(q.id.clone())
                .text(keyboard::notice_text(section))
                .await?;
        }
        Reply::Show { screen, delivery } => {
            bot.answer_callback_query(q.id.clone()).await?;
            
            let Some(message) = q.message.as_ref() else {
                warn!(%user, payload, "Callback without an accessible message");
                return Ok(());
            };
            let edit = match delivery {
                Delivery::Edit => Some(message.id()),
                Delivery::Send => None,
            };
            show(&bot, message.chat().id, edit, &screen).await?;
        }
    }
    Ok(())
}

/// One outgoing Telegram request for a rendered chunk
#[derive(Debug, Clone, PartialEq, Eq)]
struct Outgoing {
    /// Message to edit in place; a new message is sent when `None`
    edit: Option<MessageId>,
    text: String,
    with_markup: bool,
}

/// Only the first chunk may edit, only the last one carries the keyboard
fn delivery_plan(chunks: &[String], edit: Option<MessageId>) -> Vec<Outgoing> {
    let last = chunks.len().saturating_sub(1);
    chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| Outgoing {
            edit: edit.filter(|_| idx == 0),
            text: chunk.clone(),
            with_markup: idx == last,
        })
        .collect()
}

/// A failed edit falls back to a fresh message unless the text was already current
fn should_resend(error: &RequestError) -> bool {
    !matches!(error, RequestError::Api(ApiError::MessageNotModified))
}

/// Deliver a screen, editing `edit` in place when given
async fn show(bot: &Bot, chat: ChatId, edit: Option<MessageId>, screen: &Screen) -> HandlerResult {
    let rendered = keyboard::render(screen);
    
    for outgoing in delivery_plan(&rendered.chunks, edit) {
        let markup = outgoing.with_markup.then(|| rendered.markup.clone());
        
        match outgoing.edit {
            Some(message_id) => {
                let mut request = bot
                    .edit_message_text(chat, message_id, outgoing.text.clone())
                    .parse_mode(ParseMode::Html);
                if let Some(markup) = markup.clone() {
                    request = request.reply_markup(markup);
                }
                match request.await {
                    Ok(_) => {}
                    Err(e) if should_resend(&e) => {
                        warn!(error = %e, "Editing message failed, sending a new one");
                        send(bot, chat, &outgoing.text, markup).await?;
                    }
                    Err(e) => debug!(error = %e, "Message already shows this screen"),
                }
            }
            None => send(bot, chat, &outgoing.text, markup).await?,
        }
    }
    Ok(())
}

async fn send(bot: &Bot, chat: ChatId, text: &str, markup: Option<InlineKeyboardMarkup>) -> HandlerResult {
    let mut request = bot
        .send_message(chat, text.to_string())
        .parse_mode(ParseMode::Html);
    if let Some(markup) = markup {
        request = request.reply_markup(markup);
    }
    request.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_start_command_parses() {
        let command = Command::parse("/start", "lookup_bot").unwrap();
        assert!(matches!(command, Command::Start));
        assert!(Command::parse("/stop", "lookup_bot").is_err());
    }
    
    #[test]
    fn test_command_descriptions_mention_start() {
        assert!(Command::descriptions().to_string().contains("/start"));
    }
    
    fn chunks(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }
    
    #[test]
    fn test_single_chunk_edits_with_keyboard() {
        let plan = delivery_plan(&chunks(&["menu"]), Some(MessageId(42)));
        assert_eq!(
            plan,
            vec![Outgoing { edit: Some(MessageId(42)), text: "menu".into(), with_markup: true }]
        );
        
        let plan = delivery_plan(&chunks(&["menu"]), None);
        assert_eq!(plan[0].edit, None);
        assert!(plan[0].with_markup);
    }
    
    #[test]
    fn test_split_screen_edits_first_and_keys_last() {
        let plan = delivery_plan(&chunks(&["one", "two", "three"]), Some(MessageId(42)));
        let edits: Vec<_> = plan.iter().map(|o| o.edit).collect();
        let keyed: Vec<_> = plan.iter().map(|o| o.with_markup).collect();
        let texts: Vec<_> = plan.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(edits, vec![Some(MessageId(42)), None, None]);
        assert_eq!(keyed, vec![false, false, true]);
        assert_eq!(texts, vec!["one", "two", "three"]);
    }
    
    #[test]
    fn test_split_screen_without_edit_sends_all() {
        let plan = delivery_plan(&chunks(&["one", "two"]), None);
        assert!(plan.iter().all(|o| o.edit.is_none()));
        assert_eq!(plan.iter().filter(|o| o.with_markup).count(), 1);
        assert!(plan[1].with_markup);
    }
    
    #[test]
    fn test_unchanged_message_is_not_resent() {
        assert!(!should_resend(&RequestError::Api(ApiError::MessageNotModified)));
        assert!(should_resend(&RequestError::Api(ApiError::MessageToEditNotFound)));
        assert!(should_resend(&RequestError::Api(ApiError::MessageCantBeEdited)));
    }
}
