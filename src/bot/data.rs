use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::services::giveaway::registry::Registry;
use crate::services::log_channel::LogSink;
use crate::services::status::status_message::StatusTracker;

/// Shared data available to all commands and handlers
pub struct Data {
    pub settings: Settings,
    /// Live giveaways backed by the giveaways file
    pub registry: Registry,
    /// Reports to the log channel
    pub log: LogSink,
    /// Last known status message
    pub status: StatusTracker,
    pub started_at: Instant,
}

impl Data {
    pub fn new(settings: Settings, registry: Registry, log: LogSink) -> Self {
        Self {
            settings,
            registry,
            log,
            status: StatusTracker::default(),
            started_at: Instant::now(),
        }
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("giveaways_file", &self.settings.giveaways_file)
            .field("uptime", &self.started_at.elapsed())
            .finish_non_exhaustive()
    }
}

pub type Context<'a> = poise::Context<'a, Arc<Data>, crate::bot::error::Error>;
