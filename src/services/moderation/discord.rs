use async_trait::async_trait;
use serenity::all::{ChannelId, Context, CreateMessage, GuildId, MessageId, UserId};
use serenity::http::HttpError;
use serenity::model::ModelError;
use tracing::{debug, info, warn};

use crate::bot::error::Error;
use crate::constants::flood::KICK_REASON;
use crate::services::flood::ports::{AdminGate, MessageRef, ModerationTransport, RemovalOutcome};
use crate::utils::permissions;

/// Discord side of the flood module: guilds are chats, kicks are removals
#[derive(Clone)]
pub struct DiscordModeration {
    ctx: Context,
    log_channel: Option<ChannelId>,
}

impl DiscordModeration {
    pub fn new(ctx: Context, log_channel_id: Option<u64>) -> Self {
        Self {
            ctx,
            log_channel: log_channel_id.map(ChannelId::new),
        }
    }

    async fn bot_can_kick(&self, guild_id: GuildId) -> bool {
        let bot_id = self.ctx.cache.current_user().id;
        permissions::can_restrict(&self.ctx, guild_id, bot_id).await
    }
}

fn guild(chat_id: i64) -> GuildId {
    GuildId::new(chat_id as u64)
}

fn user(user_id: i64) -> UserId {
    UserId::new(user_id as u64)
}

/// Why Discord turned a kick down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KickRefusal {
    /// The bot is known to lack KICK_MEMBERS
    MissingPermission,
    /// 403 or hierarchy: either a missing permission or a target that
    /// outranks the bot. Resolved by checking the bot's own permissions.
    Forbidden,
}

fn kick_refusal(err: &serenity::Error) -> Option<KickRefusal> {
    match err {
        serenity::Error::Model(ModelError::InvalidPermissions { .. }) => {
            Some(KickRefusal::MissingPermission)
        }
        serenity::Error::Model(ModelError::Hierarchy) => Some(KickRefusal::Forbidden),
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403 =>
        {
            Some(KickRefusal::Forbidden)
        }
        _ => None,
    }
}

/// Only a bot without kick rights loses the ability to enforce; an
/// outranking target is a one-off failure
fn removal_outcome(refusal: KickRefusal, bot_can_kick: bool) -> Option<RemovalOutcome> {
    match refusal {
        KickRefusal::MissingPermission => Some(RemovalOutcome::PermissionDenied),
        KickRefusal::Forbidden if !bot_can_kick => Some(RemovalOutcome::PermissionDenied),
        KickRefusal::Forbidden => None,
    }
}

/// Reply to the triggering message so the notice threads under it
fn reply_message(target: MessageRef, text: &str) -> CreateMessage {
    CreateMessage::new().content(text).reference_message((
        ChannelId::new(target.channel_id as u64),
        MessageId::new(target.message_id as u64),
    ))
}

#[async_trait]
impl AdminGate for DiscordModeration {
    async fn is_admin(&self, chat_id: i64, user_id: i64) -> bool {
        permissions::is_admin(&self.ctx, guild(chat_id), user(user_id)).await
    }

    async fn can_restrict(&self, chat_id: i64, user_id: i64) -> bool {
        permissions::can_restrict(&self.ctx, guild(chat_id), user(user_id)).await
    }
}

#[async_trait]
impl ModerationTransport for DiscordModeration {
    async fn remove_member(&self, chat_id: i64, user_id: i64) -> Result<RemovalOutcome, Error> {
        let guild_id = guild(chat_id);
        let user_id = user(user_id);

        match guild_id
            .kick_with_reason(&self.ctx.http, user_id, KICK_REASON)
            .await
        {
            Ok(()) => {
                info!("Kicked user {} from guild {}", user_id, guild_id);
                Ok(RemovalOutcome::Removed)
            }
            Err(e) => {
                let Some(refusal) = kick_refusal(&e) else {
                    return Err(Error::Serenity(e));
                };

                let bot_can_kick = self.bot_can_kick(guild_id).await;
                debug!(
                    "Kick of user {} in guild {} refused ({:?}, bot can kick: {}): {:?}",
                    user_id, guild_id, refusal, bot_can_kick, e
                );

                match removal_outcome(refusal, bot_can_kick) {
                    Some(outcome) => Ok(outcome),
                    None => {
                        warn!("User {} outranks the bot in guild {}, not removed", user_id, guild_id);
                        Err(Error::Serenity(e))
                    }
                }
            }
        }
    }

    async fn reply(&self, target: MessageRef, text: &str) -> Result<(), Error> {
        ChannelId::new(target.channel_id as u64)
            .send_message(&self.ctx.http, reply_message(target, text))
            .await?;
        Ok(())
    }

    async fn log_action(&self, _chat_id: i64, text: &str) -> Result<(), Error> {
        if let Some(channel) = self.log_channel {
            channel.say(&self.ctx.http, text).await?;
        }
        Ok(())
    }
}
