use serenity::all::{Colour, CreateEmbed};

// ============================================================================
// Color Palette
// ============================================================================

/// Giveaway announcements - Discord purple
pub const GIVEAWAY_COLOR: Colour = Colour::from_rgb(114, 137, 218);

/// Invite/branding - Discord blurple
pub const BRAND_COLOR: Colour = Colour::from_rgb(88, 101, 242);

/// Success color - green
pub const SUCCESS_COLOR: Colour = Colour::from_rgb(0, 255, 0);

/// Error color - red
pub const ERROR_COLOR: Colour = Colour::from_rgb(255, 0, 0);

/// Warning color - yellow
pub const WARNING_COLOR: Colour = Colour::from_rgb(255, 255, 0);

/// Storage housekeeping - orange
pub const NOTICE_COLOR: Colour = Colour::from_rgb(255, 165, 0);

/// Info color - blue
pub const INFO_COLOR: Colour = Colour::from_rgb(0, 0, 255);

// ============================================================================
// Text
// ============================================================================

pub const BOT_NAME: &str = "PrizePal-Bot";

/// Marker used to recognise our own status message after a restart
pub const STATUS_TITLE: &str = "🟢 PrizePal-Bot Status";

pub const STATUS_FOOTER: &str = "PrizePal - Giving Back, made Easy. ✨";

pub const ENDED_TITLE: &str = "🎉 Giveaway Ended! 🎉";

// ============================================================================
// Embed Builders
// ============================================================================

/// Create a giveaway embed
pub fn giveaway_embed() -> CreateEmbed {
    CreateEmbed::new().color(GIVEAWAY_COLOR)
}

/// Create a branded embed
pub fn brand_embed() -> CreateEmbed {
    CreateEmbed::new().color(BRAND_COLOR)
}

/// Create a success embed
pub fn success_embed() -> CreateEmbed {
    CreateEmbed::new().color(SUCCESS_COLOR)
}

/// Create an error embed
pub fn error_embed() -> CreateEmbed {
    CreateEmbed::new().color(ERROR_COLOR)
}
