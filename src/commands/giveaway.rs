use chrono::Utc;
use poise::serenity_prelude::Channel;

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::constants::timeouts::MAX_WINNERS;
use crate::services::giveaway::creator::{self, NewGiveaway};
use crate::services::giveaway::surface::SerenitySurface;
use crate::utils::duration::parse_duration;
use crate::utils::formatting::mention_channel;

/// Manages giveaways.
#[poise::command(
    slash_command,
    subcommands("create"),
    required_permissions = "MANAGE_GUILD",
    guild_only
)]
pub async fn giveaway(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Use `/giveaway create` to start a new giveaway.").await?;
    Ok(())
}

/// Starts a new giveaway.
#[poise::command(slash_command, required_permissions = "MANAGE_GUILD", guild_only)]
pub async fn create(
    ctx: Context<'_>,
    #[description = "The prize for the giveaway."] prize: String,
    #[description = "The number of winners for the giveaway."]
    #[min = 1]
    #[max = 50]
    winners: u32,
    #[description = "How long the giveaway will last (e.g., 1h, 30m, 2d)."] duration: String,
    #[description = "The channel to start the giveaway in."]
    #[channel_types("Text")]
    channel: Option<Channel>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;

    // Reject bad input before anything is posted
    let duration = parse_duration(&duration)?;
    if !(1..=MAX_WINNERS).contains(&winners) {
        return Err(Error::InvalidWinnerCount);
    }

    let channel_id = channel.map(|c| c.id()).unwrap_or_else(|| ctx.channel_id());

    ctx.defer_ephemeral().await?;

    let data = ctx.data();
    let surface = SerenitySurface::new(
        ctx.serenity_context().http.clone(),
        data.settings.call_timeout,
    );

    let request = NewGiveaway {
        channel_id,
        guild_id,
        prize,
        winner_count: winners,
        duration,
        host: ctx.author().tag(),
    };

    let record = match creator::start_giveaway(&surface, &data.registry, request, Utc::now()).await {
        Ok(record) => record,
        Err(e) => {
            data.log.error(
                "🚨 Giveaway Creation Error",
                format!("Failed to create giveaway: ```{}```", e),
            );
            return Err(e);
        }
    };

    ctx.send(
        poise::CreateReply::default()
            .content("Giveaway created successfully!")
            .ephemeral(true),
    )
    .await?;

    data.log.success(
        "✅ Giveaway Created",
        format!(
            "User **{}** created a giveaway for \"{}\" in {}.",
            ctx.author().tag(),
            record.prize,
            mention_channel(record.channel_id)
        ),
    );

    Ok(())
}
