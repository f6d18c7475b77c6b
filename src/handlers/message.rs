use poise::serenity_prelude::{Context, Message, MessageType};

use crate::services::flood::{ChatRef, MessageEvent, MessageRef, Sender};
use crate::utils::formatting::truncate;

/// Longest chat title carried into audit lines
const MAX_TITLE_LEN: usize = 100;

/// Turn a guild message into a flood event.
///
/// Returns `None` for DMs, system messages and the bot's own messages.
/// Webhook posts become events without a sender.
pub fn to_flood_event(ctx: &Context, message: &Message) -> Option<MessageEvent> {
    let guild_id = message.guild_id?;

    if !matches!(message.kind, MessageType::Regular | MessageType::InlineReply) {
        return None;
    }

    if message.author.id == ctx.cache.current_user().id {
        return None;
    }

    let sender = if message.webhook_id.is_some() {
        None
    } else {
        Some(Sender {
            id: message.author.id.get() as i64,
            display_name: message.author.name.clone(),
        })
    };

    let title = guild_id
        .name(&ctx.cache)
        .unwrap_or_else(|| guild_id.to_string());

    Some(MessageEvent {
        chat: ChatRef {
            id: guild_id.get() as i64,
            title: truncate(&title, MAX_TITLE_LEN),
        },
        sender,
        reply_to: MessageRef {
            channel_id: message.channel_id.get() as i64,
            message_id: message.id.get() as i64,
        },
    })
}
