use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, ChannelId, GatewayIntents, GuildId};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::commands;
use crate::config::Settings;
use crate::handlers::event_handler::event_handler;
use crate::services::giveaway::registry::Registry;
use crate::services::giveaway::scheduler::{spawn_giveaway_checker, Scheduler};
use crate::services::giveaway::surface::SerenitySurface;
use crate::services::log_channel::{spawn_log_forwarder, LogEntry, LogSink};
use crate::services::status::status_message::spawn_status_updater;

pub async fn run(
    settings: Settings,
    registry: Registry,
    log: LogSink,
    log_rx: mpsc::UnboundedReceiver<LogEntry>,
) -> Result<(), Error> {
    // The log channel only needs HTTP, so it works before the gateway connects
    let http = Arc::new(serenity::Http::new(&settings.discord_token));
    spawn_log_forwarder(http, ChannelId::new(settings.log_channel_id), log_rx);

    let data = Arc::new(Data::new(settings.clone(), registry, log));

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![commands::giveaway::giveaway(), commands::invite::invite()],
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
                            if error.is_validation() {
                                warn!("Rejected command input: {}", error);
                            } else {
                                error!("Command error: {:?}", error);
                            }
                            let reply = if error.is_validation() {
                                error.to_string()
                            } else {
                                format!("Failed to run command: {}", error)
                            };
                            let _ = ctx
                                .send(poise::CreateReply::default().content(reply).ephemeral(true))
                                .await;
                        }
                        poise::FrameworkError::ArgumentParse { error, ctx, .. } => {
                            let _ = ctx
                                .send(
                                    poise::CreateReply::default()
                                        .content(format!("Invalid argument: {}", error))
                                        .ephemeral(true),
                                )
                                .await;
                        }
                        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
                            let _ = ctx
                                .send(
                                    poise::CreateReply::default()
                                        .content("You need the \"Manage Server\" permission to create giveaways.")
                                        .ephemeral(true),
                                )
                                .await;
                        }
                        poise::FrameworkError::UnknownCommand { .. } => {
                            // Prefix commands are disabled; mentions land here
                        }
                        err => {
                            error!("Framework error: {:?}", err);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as {} ({})", ready.user.tag(), ready.user.id);

                data.log.info(
                    "🚀 Bot Online",
                    format!("Logged in as **{}** (ID: {})", ready.user.tag(), ready.user.id),
                );

                // A failed registration still leaves the sweep and status tasks running
                register_commands(ctx, framework, &data).await;

                let surface = SerenitySurface::new(ctx.http.clone(), data.settings.call_timeout);
                let scheduler = Scheduler::new(
                    surface,
                    data.registry.clone(),
                    data.log.clone(),
                    data.settings.max_transient_retries,
                );
                spawn_giveaway_checker(Arc::new(scheduler), data.settings.sweep_interval);
                info!(
                    "Started checking for ongoing giveaways every {:?}",
                    data.settings.sweep_interval
                );

                spawn_status_updater(
                    ctx.clone(),
                    data.clone(),
                    framework.shard_manager().clone(),
                );
                info!(
                    "Started status updates every {:?}",
                    data.settings.status_interval
                );

                Ok(data)
            })
        })
        .build();

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::GUILD_MEMBERS;

    let mut client = serenity::ClientBuilder::new(&settings.discord_token, intents)
        .framework(framework)
        .await
        .map_err(Error::Serenity)?;

    info!("Starting Discord client...");
    client.start().await.map_err(Error::Serenity)
}

/// Register slash commands globally, or for a single guild when GUILD_ID is set
async fn register_commands(
    ctx: &serenity::Context,
    framework: &poise::Framework<Arc<Data>, Error>,
    data: &Data,
) {
    let commands = &framework.options().commands;

    let result = match data.settings.guild_id {
        Some(guild_id) => {
            let guild_id = GuildId::new(guild_id);
            info!("Registering {} commands in guild {}", commands.len(), guild_id);
            poise::builtins::register_in_guild(ctx, commands, guild_id).await
        }
        None => {
            info!("Registering {} commands globally", commands.len());
            poise::builtins::register_globally(ctx, commands).await
        }
    };

    report_registration(&data.log, result);
}

/// Log the registration result; failures never stop startup
fn report_registration(log: &LogSink, result: Result<(), ::serenity::Error>) {
    match result {
        Ok(()) => {
            info!("Commands registered");
            log.success(
                "✅ Commands Registered",
                "Successfully registered slash commands.",
            );
        }
        Err(e) => {
            error!("Failed to register commands: {:?}", e);
            log.error(
                "🚨 Command Registration Error",
                format!("Failed to register slash commands: ```{}```", e),
            );
        }
    }
}
