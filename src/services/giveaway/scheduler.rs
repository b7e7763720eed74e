//! Periodic sweep that finalizes expired giveaways.
//!
//! Each due giveaway goes `Pending -> Selecting -> Announced`, or straight to
//! `NotFound` or `Errored`. Every one of those ends by deleting the record.
//! The only way to stay `Pending` is a transient failure while resolving
//! entrants, which is retried on the next sweep until the retry cap is hit.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serenity::all::UserId;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::db::models::GiveawayRecord;
use crate::services::giveaway::announcement;
use crate::services::giveaway::registry::Registry;
use crate::services::giveaway::selector::select;
use crate::services::giveaway::surface::{ChatSurface, SurfaceError};
use crate::services::log_channel::LogSink;
use crate::utils::formatting::mention_list;

/// How a finalized giveaway ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Winners(Vec<UserId>),
    NoParticipants,
    NotFound,
    Errored(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Record deleted
    Finalized(Outcome),
    /// Record kept for the next sweep
    Deferred { attempts: u32 },
}

pub struct Scheduler<S> {
    surface: S,
    registry: Registry,
    log: LogSink,
    rng: Mutex<StdRng>,
    /// giveaway id -> consecutive transient failures
    transient_failures: DashMap<u64, u32>,
    max_transient_retries: u32,
}

impl<S: ChatSurface> Scheduler<S> {
    pub fn new(surface: S, registry: Registry, log: LogSink, max_transient_retries: u32) -> Self {
        Self {
            surface,
            registry,
            log,
            rng: Mutex::new(StdRng::from_entropy()),
            transient_failures: DashMap::new(),
            max_transient_retries,
        }
    }

    /// Replace the random source, e.g. with a seeded one
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Finalize every giveaway whose end time has passed
    pub async fn sweep(&self, now_ms: i64) -> Vec<(u64, Disposition)> {
        let due = self.registry.all_due(now_ms).await;
        if due.is_empty() {
            return Vec::new();
        }

        debug!("{} giveaway(s) due", due.len());

        let mut results = Vec::with_capacity(due.len());
        for record in due {
            info!("Ending giveaway: {} for {}", record.id, record.prize);
            let disposition = self.finalize(&record).await;
            results.push((record.id, disposition));
        }
        results
    }

    /// Drive one giveaway to a terminal state, or defer it
    pub async fn finalize(&self, record: &GiveawayRecord) -> Disposition {
        let outcome = match self.conclude(record).await {
            Ok(outcome) => outcome,
            Err(SurfaceError::Transient(reason)) => {
                let attempts = self.note_transient_failure(record.id);
                if self.max_transient_retries == 0 || attempts < self.max_transient_retries {
                    warn!(
                        "Giveaway {} deferred to next sweep (attempt {}): {}",
                        record.id, attempts, reason
                    );
                    return Disposition::Deferred { attempts };
                }

                let reason = format!("gave up after {} attempts: {}", attempts, reason);
                self.report_error(record, &reason);
                Outcome::Errored(reason)
            }
            Err(SurfaceError::NotFound(reason)) => {
                warn!("Giveaway {} message not found: {}", record.id, reason);
                self.log.warning(
                    "⚠️ Giveaway Not Found",
                    format!(
                        "Attempted to end giveaway {}, but message was not found. Removed from storage.",
                        record.id
                    ),
                );
                Outcome::NotFound
            }
            Err(SurfaceError::Other(reason)) => {
                self.report_error(record, &reason);
                Outcome::Errored(reason)
            }
        };

        self.transient_failures.remove(&record.id);
        self.registry.remove(record.id).await;

        Disposition::Finalized(outcome)
    }

    /// Resolve entrants, draw winners and render the result
    async fn conclude(&self, record: &GiveawayRecord) -> Result<Outcome, SurfaceError> {
        let channel_id = record.channel();
        let message_id = record.message_id();

        let entrants = self
            .surface
            .resolve_entrants(channel_id, message_id)
            .await?;

        let winners = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            select(&entrants, record.winner_count as usize, &mut *rng)
        };

        if winners.is_empty() {
            self.surface
                .edit_message(
                    channel_id,
                    message_id,
                    announcement::no_participants_embed(&record.prize, record.id),
                )
                .await
                .map_err(rendering_failure)?;

            self.log.error(
                "❌ No Participants",
                format!(
                    "Giveaway for \"{}\" (ID: {}) ended with no participants.",
                    record.prize, record.id
                ),
            );
            return Ok(Outcome::NoParticipants);
        }

        self.surface
            .edit_message(
                channel_id,
                message_id,
                announcement::winners_embed(&record.prize, &winners, record.id),
            )
            .await
            .map_err(rendering_failure)?;

        self.surface
            .send_message(
                channel_id,
                announcement::winners_message(&record.prize, &winners),
            )
            .await
            .map_err(rendering_failure)?;

        info!(
            "Giveaway {} concluded with {} winner(s)",
            record.id,
            winners.len()
        );
        self.log.success(
            "✅ Giveaway Concluded",
            format!(
                "Giveaway for \"{}\" (ID: {}) concluded. Winners: {}.",
                record.prize,
                record.id,
                mention_list(&winners)
            ),
        );

        Ok(Outcome::Winners(winners))
    }

    fn note_transient_failure(&self, id: u64) -> u32 {
        let mut attempts = self.transient_failures.entry(id).or_insert(0);
        *attempts += 1;
        *attempts
    }

    fn report_error(&self, record: &GiveawayRecord, reason: &str) {
        error!("Error ending giveaway {}: {}", record.id, reason);
        self.log.error(
            "🚨 Giveaway End Error",
            format!(
                "An error occurred while ending giveaway {} for \"{}\": ```{}```",
                record.id, record.prize, reason
            ),
        );
    }
}

/// Winners are already drawn once rendering starts, so a retry would draw
/// different ones. Rendering failures are never deferred.
fn rendering_failure(e: SurfaceError) -> SurfaceError {
    match e {
        SurfaceError::Transient(reason) => {
            SurfaceError::Other(format!("could not announce the result: {}", reason))
        }
        other => other,
    }
}

/// Start the background sweep
pub fn spawn_giveaway_checker<S>(scheduler: Arc<Scheduler<S>>, every: Duration)
where
    S: ChatSurface + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let results = scheduler.sweep(Utc::now().timestamp_millis()).await;
            let deferred = results
                .iter()
                .filter(|(_, d)| matches!(d, Disposition::Deferred { .. }))
                .count();
            if deferred > 0 {
                debug!("{} giveaway(s) deferred this sweep", deferred);
            }
        }
    });
}
