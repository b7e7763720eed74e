use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serenity::all::{
    ChannelId, Context, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage, GetMessages,
    MessageId, ShardManager,
};
use tokio::sync::Mutex;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::constants::embeds::{self, STATUS_FOOTER, STATUS_TITLE};
use crate::constants::timeouts::STATUS_SEARCH_LIMIT;
use crate::services::giveaway::surface::SurfaceError;
use crate::utils::formatting::format_uptime;

/// Id of the status message we keep editing.
///
/// Empty after a restart until the channel has been searched once.
#[derive(Debug, Default)]
pub struct StatusTracker {
    message_id: Mutex<Option<MessageId>>,
}

impl StatusTracker {
    pub async fn message_id(&self) -> Option<MessageId> {
        *self.message_id.lock().await
    }
}

#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub ping: Option<Duration>,
    pub uptime: Duration,
    pub guilds: usize,
}

pub fn status_embed(snapshot: &StatusSnapshot, now: DateTime<Utc>) -> CreateEmbed {
    let ping = snapshot
        .ping
        .map(|latency| format!("{}ms", latency.as_millis()))
        .unwrap_or_else(|| "n/a".to_string());

    embeds::success_embed()
        .title(STATUS_TITLE)
        .description("I am online and ready to host amazing giveaways!")
        .field("📊 Ping", ping, true)
        .field("📈 Uptime", format_uptime(snapshot.uptime), true)
        .field("🏠 Servers", snapshot.guilds.to_string(), true)
        .footer(CreateEmbedFooter::new(format!(
            "{} • Today at {}",
            STATUS_FOOTER,
            now.format("%H:%M UTC")
        )))
}

/// Whether an embed title belongs to one of our status messages
pub fn is_status_title(title: &str) -> bool {
    title.contains("PrizePal-Bot Status")
}

/// Start the periodic status republisher. The first update runs immediately.
pub fn spawn_status_updater(ctx: Context, data: Arc<Data>, shard_manager: Arc<ShardManager>) {
    tokio::spawn(async move {
        let mut ticker = interval(data.settings.status_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(e) = update_status_message(&ctx, &data, &shard_manager).await {
                error!("Error updating status message: {}", e);
                data.log.error(
                    "🚨 Status Update Error",
                    format!(
                        "An unexpected error occurred during status message update: ```{}```",
                        e
                    ),
                );
            }
        }
    });
}

async fn update_status_message(
    ctx: &Context,
    data: &Data,
    shard_manager: &ShardManager,
) -> Result<(), Error> {
    let channel_id = ChannelId::new(data.settings.status_channel_id);

    let snapshot = StatusSnapshot {
        ping: gateway_latency(ctx, shard_manager).await,
        uptime: data.started_at.elapsed(),
        guilds: ctx.cache.guild_count(),
    };
    let embed = status_embed(&snapshot, Utc::now());

    let mut cached = data.status.message_id.lock().await;
    if cached.is_none() {
        *cached = find_existing_status(ctx, channel_id).await?;
    }

    if let Some(message_id) = *cached {
        let edit = EditMessage::new().embed(embed.clone());
        match channel_id.edit_message(ctx, message_id, edit).await {
            Ok(_) => {
                debug!("Status message updated");
                return Ok(());
            }
            Err(e) => match SurfaceError::from(e) {
                SurfaceError::NotFound(_) => {
                    warn!("Status message {} is gone, posting a new one", message_id);
                    *cached = None;
                }
                other => return Err(other.into()),
            },
        }
    }

    let message = channel_id
        .send_message(ctx, CreateMessage::new().embed(embed))
        .await?;
    *cached = Some(message.id);

    info!("Initial status message sent");
    data.log.success(
        "🚀 Status Message Sent",
        "Initial bot status message has been posted.",
    );

    Ok(())
}

/// Look for a status message we posted before the last restart
async fn find_existing_status(
    ctx: &Context,
    channel_id: ChannelId,
) -> Result<Option<MessageId>, Error> {
    let bot_id = ctx.cache.current_user().id;

    let messages = channel_id
        .messages(ctx, GetMessages::new().limit(STATUS_SEARCH_LIMIT))
        .await?;

    Ok(messages
        .into_iter()
        .find(|message| {
            message.author.id == bot_id
                && message
                    .embeds
                    .iter()
                    .any(|embed| embed.title.as_deref().is_some_and(is_status_title))
        })
        .map(|message| message.id))
}

async fn gateway_latency(ctx: &Context, shard_manager: &ShardManager) -> Option<Duration> {
    let runners = shard_manager.runners.lock().await;
    runners.get(&ctx.shard_id).and_then(|runner| runner.latency)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_status_embed_fields() {
        let snapshot = StatusSnapshot {
            ping: Some(Duration::from_millis(42)),
            uptime: Duration::from_secs(3_661),
            guilds: 7,
        };
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 5, 0).unwrap();
        let value = serde_json::to_value(status_embed(&snapshot, now)).unwrap();

        assert_eq!(value["title"], STATUS_TITLE);
        let fields = value["fields"].as_array().unwrap();
        assert_eq!(fields[0]["value"], "42ms");
        assert_eq!(fields[1]["value"], "0d 1h 1m 1s");
        assert_eq!(fields[2]["value"], "7");
        assert!(value["footer"]["text"]
            .as_str()
            .unwrap()
            .ends_with("Today at 09:05 UTC"));
    }

    #[test]
    fn test_unknown_ping() {
        let snapshot = StatusSnapshot {
            ping: None,
            uptime: Duration::ZERO,
            guilds: 0,
        };
        let value = serde_json::to_value(status_embed(&snapshot, Utc::now())).unwrap();
        assert_eq!(value["fields"][0]["value"], "n/a");
    }

    #[test]
    fn test_status_title_recognised() {
        assert!(is_status_title(STATUS_TITLE));
        assert!(is_status_title("🔴 PrizePal-Bot Status"));
        assert!(!is_status_title("🎉 Giveaway Ended! 🎉"));
    }

    #[tokio::test]
    async fn test_tracker_starts_empty() {
        let tracker = StatusTracker::default();
        assert_eq!(tracker.message_id().await, None);
    }
}
