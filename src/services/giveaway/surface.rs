//! The chat platform as seen by the giveaway lifecycle.
//!
//! [`ChatSurface`] is the narrow interface the creator and scheduler call;
//! [`SerenitySurface`] implements it over the Discord HTTP client with a
//! bounded timeout on every call.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serenity::all::{
    ChannelId, CreateEmbed, CreateMessage, EditMessage, Http, MessageId, ReactionType, UserId,
};
use serenity::http::HttpError;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

use crate::constants::timeouts::{GIVEAWAY_EMOJI, REACTION_PAGE_SIZE};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The message or channel no longer exists
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network trouble, rate limits, server errors and timeouts; worth retrying
    #[error("Temporary failure: {0}")]
    Transient(String),

    #[error("{0}")]
    Other(String),
}

impl From<serenity::Error> for SurfaceError {
    fn from(err: serenity::Error) -> Self {
        let text = err.to_string();
        match &err {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
                match response.status_code.as_u16() {
                    404 => SurfaceError::NotFound(text),
                    429 | 500..=599 => SurfaceError::Transient(text),
                    _ => SurfaceError::Other(text),
                }
            }
            serenity::Error::Http(HttpError::Request(_)) | serenity::Error::Io(_) => {
                SurfaceError::Transient(text)
            }
            _ => SurfaceError::Other(text),
        }
    }
}

pub trait ChatSurface: Send + Sync {
    /// Post a giveaway announcement, add the entry reaction and return the message id
    fn post_announcement(
        &self,
        channel_id: ChannelId,
        embed: CreateEmbed,
    ) -> impl Future<Output = Result<MessageId, SurfaceError>> + Send;

    /// Replace the embed of an existing message
    fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        embed: CreateEmbed,
    ) -> impl Future<Output = Result<(), SurfaceError>> + Send;

    /// Plain text message, used to ping winners
    fn send_message(
        &self,
        channel_id: ChannelId,
        content: String,
    ) -> impl Future<Output = Result<(), SurfaceError>> + Send;

    /// Non-bot users who reacted with the entry emoji
    fn resolve_entrants(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> impl Future<Output = Result<Vec<UserId>, SurfaceError>> + Send;
}

/// Discord-backed surface
#[derive(Clone)]
pub struct SerenitySurface {
    http: Arc<Http>,
    call_timeout: Duration,
}

impl SerenitySurface {
    pub fn new(http: Arc<Http>, call_timeout: Duration) -> Self {
        Self { http, call_timeout }
    }

    async fn call<T, F>(&self, request: F) -> Result<T, SurfaceError>
    where
        F: Future<Output = serenity::Result<T>>,
    {
        match timeout(self.call_timeout, request).await {
            Ok(result) => result.map_err(SurfaceError::from),
            Err(_) => Err(SurfaceError::Transient(format!(
                "Discord did not answer within {}s",
                self.call_timeout.as_secs()
            ))),
        }
    }
}

fn entry_reaction() -> ReactionType {
    ReactionType::Unicode(GIVEAWAY_EMOJI.to_string())
}

impl ChatSurface for SerenitySurface {
    async fn post_announcement(
        &self,
        channel_id: ChannelId,
        embed: CreateEmbed,
    ) -> Result<MessageId, SurfaceError> {
        let http = self.http.as_ref();
        let message = self
            .call(channel_id.send_message(http, CreateMessage::new().embed(embed)))
            .await?;
        self.call(message.react(http, entry_reaction())).await?;
        Ok(message.id)
    }

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        embed: CreateEmbed,
    ) -> Result<(), SurfaceError> {
        self.call(channel_id.edit_message(
            self.http.as_ref(),
            message_id,
            EditMessage::new().embed(embed),
        ))
        .await?;
        Ok(())
    }

    async fn send_message(&self, channel_id: ChannelId, content: String) -> Result<(), SurfaceError> {
        self.call(channel_id.say(self.http.as_ref(), content)).await?;
        Ok(())
    }

    async fn resolve_entrants(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<Vec<UserId>, SurfaceError> {
        let http = self.http.as_ref();
        let message = self.call(channel_id.message(http, message_id)).await?;

        let reaction = entry_reaction();
        if !message.reactions.iter().any(|r| r.reaction_type == reaction) {
            debug!("Giveaway {} has no entry reactions", message_id);
            return Ok(Vec::new());
        }

        let mut entrants = Vec::new();
        let mut after: Option<UserId> = None;
        loop {
            let page = self
                .call(channel_id.reaction_users(
                    http,
                    message_id,
                    reaction.clone(),
                    Some(REACTION_PAGE_SIZE),
                    after,
                ))
                .await?;

            let full_page = page.len() >= REACTION_PAGE_SIZE as usize;
            after = page.last().map(|user| user.id);
            entrants.extend(page.into_iter().filter(|user| !user.bot).map(|user| user.id));

            if !full_page {
                break;
            }
        }

        entrants.sort();
        entrants.dedup();
        Ok(entrants)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Something the mock surface was asked to do
    #[derive(Debug, Clone)]
    pub(crate) enum Call {
        Post { channel_id: ChannelId, embed: serde_json::Value },
        Edit { message_id: MessageId, embed: serde_json::Value },
        Send { channel_id: ChannelId, content: String },
        Resolve { message_id: MessageId },
    }

    /// In-memory surface: records calls and replays scripted entrant answers
    #[derive(Default)]
    pub(crate) struct MockSurface {
        pub calls: Mutex<Vec<Call>>,
        pub entrants: Mutex<VecDeque<Result<Vec<UserId>, SurfaceError>>>,
        pub post_result: Mutex<Option<Result<MessageId, SurfaceError>>>,
        pub edit_error: Mutex<Option<SurfaceError>>,
    }

    impl MockSurface {
        pub fn with_entrants(answers: Vec<Result<Vec<UserId>, SurfaceError>>) -> Self {
            Self {
                entrants: Mutex::new(answers.into()),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    fn embed_json(embed: &CreateEmbed) -> serde_json::Value {
        serde_json::to_value(embed).unwrap()
    }

    impl ChatSurface for MockSurface {
        async fn post_announcement(
            &self,
            channel_id: ChannelId,
            embed: CreateEmbed,
        ) -> Result<MessageId, SurfaceError> {
            self.record(Call::Post { channel_id, embed: embed_json(&embed) });
            self.post_result
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(Ok(MessageId::new(9000)))
        }

        async fn edit_message(
            &self,
            _channel_id: ChannelId,
            message_id: MessageId,
            embed: CreateEmbed,
        ) -> Result<(), SurfaceError> {
            self.record(Call::Edit { message_id, embed: embed_json(&embed) });
            match self.edit_error.lock().unwrap().clone() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        async fn send_message(&self, channel_id: ChannelId, content: String) -> Result<(), SurfaceError> {
            self.record(Call::Send { channel_id, content });
            Ok(())
        }

        async fn resolve_entrants(
            &self,
            _channel_id: ChannelId,
            message_id: MessageId,
        ) -> Result<Vec<UserId>, SurfaceError> {
            self.record(Call::Resolve { message_id });
            self.entrants
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn surface(call_timeout: Duration) -> SerenitySurface {
        SerenitySurface::new(Arc::new(Http::new("")), call_timeout)
    }

    #[tokio::test]
    async fn test_call_timeout_is_transient() {
        let surface = surface(Duration::from_millis(10));

        let result = surface
            .call(std::future::pending::<serenity::Result<()>>())
            .await;
        assert!(matches!(result, Err(SurfaceError::Transient(_))));
    }

    #[tokio::test]
    async fn test_call_passes_through_answers() {
        let surface = surface(Duration::from_secs(5));

        let result = surface.call(async { Ok::<_, serenity::Error>(7) }).await;
        assert_eq!(result, Ok(7));

        let result = surface
            .call(async { Err::<(), _>(serenity::Error::Other("Missing Access")) })
            .await;
        assert!(matches!(result, Err(SurfaceError::Other(_))));
    }

    #[test]
    fn test_error_classification() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        assert!(matches!(
            SurfaceError::from(serenity::Error::Io(io)),
            SurfaceError::Transient(_)
        ));

        assert!(matches!(
            SurfaceError::from(serenity::Error::Other("unexpected")),
            SurfaceError::Other(_)
        ));

        let json = serde_json::from_str::<u64>("not a number").unwrap_err();
        assert!(matches!(
            SurfaceError::from(serenity::Error::Json(json)),
            SurfaceError::Other(_)
        ));
    }

    #[tokio::test]
    async fn test_mock_replays_answers_in_order() {
        let surface = MockSurface::with_entrants(vec![
            Err(SurfaceError::Transient("rate limited".into())),
            Ok(vec![UserId::new(1)]),
        ]);
        let message_id = MessageId::new(5);

        assert!(surface.resolve_entrants(ChannelId::new(1), message_id).await.is_err());
        assert_eq!(
            surface.resolve_entrants(ChannelId::new(1), message_id).await.unwrap(),
            vec![UserId::new(1)]
        );
        assert!(surface.resolve_entrants(ChannelId::new(1), message_id).await.unwrap().is_empty());
        assert_eq!(surface.calls().len(), 3);
    }
}
