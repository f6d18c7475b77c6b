use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, GatewayIntents, GuildId};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::commands;
use crate::config::Settings;
use crate::db::Stores;
use crate::handlers::event_handler::event_handler;
use crate::i18n::{BundledStrings, ChatTexts};
use crate::services::flood::{AntiFlood, FloodWorker};
use crate::services::language::LanguageSettings;
use crate::services::moderation::discord::DiscordModeration;

pub async fn run(settings: Settings, stores: Stores) -> Result<(), Error> {
    let strings = BundledStrings::bundled()?;
    let token = settings.discord_token.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::flood::flood(),
                commands::flood::setflood(),
                commands::lang::lang(),
                commands::settings::settings(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: None, // Slash commands only
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command error: {:?}", error);
                            let _ = ctx.say(format!("Error: {}", error)).await;
                        }
                        poise::FrameworkError::ArgumentParse { error, ctx, .. } => {
                            let _ = ctx.say(format!("Invalid argument: {}", error)).await;
                        }
                        poise::FrameworkError::UnknownCommand { .. } => {}
                        err => {
                            error!("Framework error: {:?}", err);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as {}", ready.user.name);

                // The gateway context becomes the admin gate and removal transport
                let moderation = Arc::new(DiscordModeration::new(
                    ctx.clone(),
                    settings.log_channel_id,
                ));
                let texts = ChatTexts::new(
                    Arc::new(strings),
                    stores.locales.clone(),
                    settings.default_locale,
                );

                let antiflood = Arc::new(AntiFlood::new(
                    stores.flood.clone(),
                    stores.locales.clone(),
                    moderation.clone(),
                    moderation.clone(),
                    texts.clone(),
                ));
                let language = LanguageSettings::new(moderation, texts);

                let (flood_tx, flood_rx) = mpsc::unbounded_channel();
                FloodWorker::new(antiflood.clone()).spawn(flood_rx);
                info!("Started flood worker");

                match settings.guild_id {
                    Some(guild_id) => {
                        let guild_id = GuildId::new(guild_id);
                        poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                            .await
                            .map_err(|e| {
                                error!("Failed to register guild commands: {:?}", e);
                                Error::Serenity(e)
                            })?;
                        info!(
                            "Registered {} commands in guild {}",
                            framework.options().commands.len(),
                            guild_id
                        );
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await
                            .map_err(|e| {
                                error!("Failed to register commands globally: {:?}", e);
                                Error::Serenity(e)
                            })?;
                        info!(
                            "Registered {} commands globally (may take up to an hour to appear)",
                            framework.options().commands.len()
                        );
                    }
                }

                Ok(Arc::new(Data::new(settings, antiflood, language, flood_tx)))
            })
        })
        .build();

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES;

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(Error::Serenity)?;

    info!("Starting Discord client...");
    client.start().await.map_err(Error::Serenity)
}
