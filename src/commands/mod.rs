pub mod flood;
pub mod lang;
pub mod settings;

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::services::flood::{ChatRef, Sender};

/// The guild a command was issued in, as a flood chat
fn chat_of(ctx: Context<'_>) -> Result<ChatRef, Error> {
    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;
    let title = ctx
        .guild()
        .map(|guild| guild.name.clone())
        .unwrap_or_else(|| guild_id.to_string());

    Ok(ChatRef {
        id: guild_id.get() as i64,
        title,
    })
}

fn sender_of(ctx: Context<'_>) -> Sender {
    let author = ctx.author();
    Sender {
        id: author.id.get() as i64,
        display_name: author.name.clone(),
    }
}
