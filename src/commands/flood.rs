use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::{chat_of, sender_of};
use crate::constants::embeds;
use crate::services::flood::SetFloodOutcome;

/// Show the current flood limit
#[poise::command(slash_command, guild_only)]
pub async fn flood(ctx: Context<'_>) -> Result<(), Error> {
    let chat = chat_of(ctx)?;
    let status = ctx.data().antiflood.flood_status(chat.id).await?;

    let embed = embeds::info_embed().title("Flood Protection").description(status);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Remove members after this many consecutive messages (at least 3, or "off")
#[poise::command(slash_command, guild_only)]
pub async fn setflood(
    ctx: Context<'_>,
    #[description = "Number of consecutive messages, or off"] value: String,
) -> Result<(), Error> {
    let chat = chat_of(ctx)?;
    let user = sender_of(ctx);
    let antiflood = &ctx.data().antiflood;

    let response = antiflood.set_flood(&chat, &value, &user).await?;

    let embed = match (response.outcome, response.reply) {
        (SetFloodOutcome::Unauthorized, _) => {
            embeds::error_embed().description(antiflood.text(chat.id, "unauthorized").await?)
        }
        (SetFloodOutcome::Missing, _) | (_, None) => {
            embeds::info_embed().description(antiflood.help(chat.id).await?)
        }
        (outcome, Some(reply)) if outcome.is_success() => {
            embeds::success_embed().description(reply)
        }
        (_, Some(reply)) => embeds::error_embed().description(reply),
    };

    let ephemeral = !response.outcome.is_success();
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(ephemeral))
        .await?;

    if let Some(audit) = response.audit {
        antiflood.record_audit(chat.id, &audit).await;
    }

    Ok(())
}
