use std::time::Duration;

use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, GuildId};
use tracing::{info, warn};

use crate::bot::error::Error;
use crate::constants::timeouts::MAX_WINNERS;
use crate::db::models::GiveawayRecord;
use crate::services::giveaway::announcement;
use crate::services::giveaway::registry::Registry;
use crate::services::giveaway::surface::ChatSurface;

/// Request to start a giveaway; validated by `start_giveaway`
#[derive(Debug, Clone)]
pub struct NewGiveaway {
    pub channel_id: ChannelId,
    pub guild_id: GuildId,
    pub prize: String,
    pub winner_count: u32,
    pub duration: Duration,
    /// Display name of the user hosting it
    pub host: String,
}

/// Post the announcement and start tracking the giveaway.
///
/// Validation happens before anything is posted. If the record cannot be
/// saved the announcement is already live; the store reports that failure.
pub async fn start_giveaway<S: ChatSurface>(
    surface: &S,
    registry: &Registry,
    request: NewGiveaway,
    now: DateTime<Utc>,
) -> Result<GiveawayRecord, Error> {
    if !(1..=MAX_WINNERS).contains(&request.winner_count) {
        return Err(Error::InvalidWinnerCount);
    }

    let duration_ms = i64::try_from(request.duration.as_millis())
        .ok()
        .filter(|ms| *ms > 0)
        .ok_or(Error::InvalidDuration)?;

    let prize = request.prize.trim().to_string();
    if prize.is_empty() {
        return Err(Error::Validation("The prize cannot be empty.".to_string()));
    }

    let ends_at = now.timestamp_millis() + duration_ms;

    let embed = announcement::giveaway_embed(&prize, request.winner_count, ends_at, &request.host);
    let message_id = surface.post_announcement(request.channel_id, embed).await?;

    let record = GiveawayRecord {
        id: message_id.get(),
        channel_id: request.channel_id.get(),
        guild_id: request.guild_id.get(),
        prize,
        winner_count: request.winner_count,
        ends_at,
    };

    if registry.create(record.clone()).await {
        info!(
            "Giveaway {} for \"{}\" started by {} in channel {}",
            record.id, record.prize, request.host, request.channel_id
        );
    } else {
        warn!(
            "Giveaway {} is posted but could not be saved; it will not end automatically",
            record.id
        );
    }

    Ok(record)
}
