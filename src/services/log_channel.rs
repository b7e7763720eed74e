//! Operational log forwarded to a Discord channel.
//!
//! Entries are queued on an unbounded channel and posted by a background
//! task, so reporting never blocks or fails the operation that reports.

use std::sync::Arc;

use serenity::all::{ChannelId, Colour, CreateEmbed, CreateMessage, Http, Timestamp};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::constants::embeds::{
    ERROR_COLOR, INFO_COLOR, NOTICE_COLOR, SUCCESS_COLOR, WARNING_COLOR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Notice,
    Warning,
    Error,
}

impl LogLevel {
    pub fn colour(self) -> Colour {
        match self {
            LogLevel::Info => INFO_COLOR,
            LogLevel::Success => SUCCESS_COLOR,
            LogLevel::Notice => NOTICE_COLOR,
            LogLevel::Warning => WARNING_COLOR,
            LogLevel::Error => ERROR_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub title: String,
    pub description: String,
    pub level: LogLevel,
}

impl LogEntry {
    pub fn to_embed(&self) -> CreateEmbed {
        CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .color(self.level.colour())
            .timestamp(Timestamp::now())
    }
}

/// Cloneable handle used to report to the log channel
#[derive(Debug, Clone)]
pub struct LogSink {
    tx: Option<mpsc::UnboundedSender<LogEntry>>,
}

impl LogSink {
    /// Create a sink together with the receiver the forwarder drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LogEntry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that drops everything
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn report(&self, level: LogLevel, title: impl Into<String>, description: impl Into<String>) {
        let Some(tx) = &self.tx else {
            return;
        };

        let entry = LogEntry {
            title: title.into(),
            description: description.into(),
            level,
        };

        if tx.send(entry).is_err() {
            debug!("Log channel forwarder has stopped, dropping entry");
        }
    }

    pub fn info(&self, title: impl Into<String>, description: impl Into<String>) {
        self.report(LogLevel::Info, title, description);
    }

    pub fn success(&self, title: impl Into<String>, description: impl Into<String>) {
        self.report(LogLevel::Success, title, description);
    }

    pub fn notice(&self, title: impl Into<String>, description: impl Into<String>) {
        self.report(LogLevel::Notice, title, description);
    }

    pub fn warning(&self, title: impl Into<String>, description: impl Into<String>) {
        self.report(LogLevel::Warning, title, description);
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) {
        self.report(LogLevel::Error, title, description);
    }
}

/// Start the task that posts queued entries to the log channel
pub fn spawn_log_forwarder(
    http: Arc<Http>,
    channel_id: ChannelId,
    mut rx: mpsc::UnboundedReceiver<LogEntry>,
) {
    tokio::spawn(async move {
        while let Some(entry) = rx.recv().await {
            let message = CreateMessage::new().embed(entry.to_embed());
            if let Err(e) = channel_id.send_message(&*http, message).await {
                warn!(
                    "Error sending log \"{}\" to channel {}: {:?}",
                    entry.title, channel_id, e
                );
            }
        }
    });
}
