/// Scheduler and status defaults (can be overridden via env vars)
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 10;
pub const DEFAULT_STATUS_INTERVAL_SECONDS: u64 = 5 * 60;
pub const DEFAULT_CALL_TIMEOUT_SECONDS: u64 = 15;
pub const DEFAULT_MAX_TRANSIENT_RETRIES: u32 = 30;

pub const DEFAULT_GIVEAWAYS_FILE: &str = "giveaways.json";

/// Emoji users react with to enter a giveaway
pub const GIVEAWAY_EMOJI: &str = "🎉";

/// Discord returns at most this many users per reaction page
pub const REACTION_PAGE_SIZE: u8 = 100;

/// How many recent messages to search for an old status message after a restart
pub const STATUS_SEARCH_LIMIT: u8 = 10;

/// Longest accepted giveaway duration (365 days)
pub const MAX_GIVEAWAY_DURATION_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Most winners one giveaway can draw; keeps the winner ping under Discord's 2000-character limit
pub const MAX_WINNERS: u32 = 50;
