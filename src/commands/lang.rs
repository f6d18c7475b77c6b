use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::{chat_of, sender_of};
use crate::constants::embeds;

/// Set the bot's language for this server (de or en)
#[poise::command(slash_command, guild_only)]
pub async fn lang(
    ctx: Context<'_>,
    #[description = "Language code: de or en"] language: Option<String>,
) -> Result<(), Error> {
    let chat = chat_of(ctx)?;
    let user = sender_of(ctx);

    let reply = ctx
        .data()
        .language
        .set_lang(&chat, language.as_deref().unwrap_or_default(), &user)
        .await?;

    let embed = embeds::standard_embed().description(reply);
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}
