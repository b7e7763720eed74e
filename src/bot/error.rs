use thiserror::Error;

use crate::services::giveaway::surface::SurfaceError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Discord API error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error("{0}")]
    Surface(#[from] SurfaceError),

    #[error("Please provide a valid duration (e.g., `1h`, `30m`, `2d`).")]
    InvalidDuration,

    #[error("The number of winners must be between 1 and 50.")]
    InvalidWinnerCount,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        Error::Custom(msg.into())
    }

    /// Rejected before any side effect; shown to the requester as-is
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidDuration | Error::InvalidWinnerCount | Error::Validation(_)
        )
    }
}
