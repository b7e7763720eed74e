use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, FullEvent};
use tracing::{debug, info};

use crate::bot::data::Data;
use crate::bot::error::Error;

pub async fn event_handler(
    _ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, Arc<Data>, Error>,
    data: &Arc<Data>,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot, .. } => {
            info!(
                "Bot ready as {} in {} guild(s)",
                data_about_bot.user.name,
                data_about_bot.guilds.len()
            );
        }

        FullEvent::Resume { .. } => {
            debug!("Gateway session resumed");
        }

        FullEvent::GuildCreate { guild, is_new } => {
            // is_new is only Some(true) for guilds joined after startup
            if *is_new == Some(true) {
                info!("Joined guild {} ({})", guild.name, guild.id);
                data.log.info(
                    "➕ Joined Server",
                    format!(
                        "Added to **{}** (ID: {}, {} members).",
                        guild.name, guild.id, guild.member_count
                    ),
                );
            }
        }

        FullEvent::GuildDelete { incomplete, .. } => {
            // unavailable means an outage, not a removal
            if !incomplete.unavailable {
                info!("Removed from guild {}", incomplete.id);
                data.log.notice(
                    "➖ Left Server",
                    format!("Removed from server with ID {}.", incomplete.id),
                );
            }
        }

        _ => {}
    }

    Ok(())
}
