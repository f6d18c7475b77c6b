use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, FullEvent};
use tracing::{debug, info};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::handlers::message;

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, Arc<Data>, Error>,
    data: &Arc<Data>,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot, .. } => {
            info!("Bot ready as {}", data_about_bot.user.name);
        }

        FullEvent::Message { new_message } => {
            // Handed off to the flood worker; the gateway loop never waits on it
            if let Some(flood_event) = message::to_flood_event(ctx, new_message) {
                data.submit_message(flood_event);
            }
        }

        FullEvent::GuildDelete { incomplete, .. } => {
            // An outage also deletes the guild; only a real leave closes the lane
            if incomplete.unavailable {
                debug!("Guild {} became unavailable", incomplete.id);
            } else {
                info!("Left guild {}", incomplete.id);
                data.close_chat(incomplete.id.get() as i64);
            }
        }

        _ => {}
    }

    Ok(())
}
