use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::chat_of;
use crate::constants::embeds;
use crate::utils::formatting::mention_channel;

/// Show this server's moderation settings
#[poise::command(slash_command, guild_only)]
pub async fn settings(ctx: Context<'_>) -> Result<(), Error> {
    let chat = chat_of(ctx)?;
    let data = ctx.data();

    let flood = data.antiflood.chat_settings(chat.id).await?;
    let language = data.language.chat_settings(chat.id).await?;
    let log_channel = data
        .settings
        .log_channel_id
        .map(|id| format!("Audit log: {}", mention_channel(id)));

    let mut lines = vec![flood.as_str(), language.as_str()];
    if let Some(log_channel) = &log_channel {
        lines.push(log_channel.as_str());
    }

    let embed = embeds::standard_embed()
        .title(format!("Settings for {}", chat.title))
        .description(embeds::bullet_list(&lines));
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}
