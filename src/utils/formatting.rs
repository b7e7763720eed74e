use std::time::Duration;

use serenity::all::UserId;

/// Format a user mention
pub fn mention_user(user_id: UserId) -> String {
    format!("<@{}>", user_id)
}

/// Format a channel mention
pub fn mention_channel(channel_id: u64) -> String {
    format!("<#{}>", channel_id)
}

/// Comma-separated mentions
pub fn mention_list(users: &[UserId]) -> String {
    users
        .iter()
        .map(|id| mention_user(*id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Discord timestamp markup, e.g. style 'R' renders "in 5 minutes"
pub fn discord_timestamp(unix_seconds: i64, style: char) -> String {
    format!("<t:{}:{}>", unix_seconds, style)
}

/// Uptime as "1d 2h 3m 4s"
pub fn format_uptime(uptime: Duration) -> String {
    let mut secs = uptime.as_secs();
    let days = secs / 86400;
    secs %= 86400;
    let hours = secs / 3600;
    secs %= 3600;
    let minutes = secs / 60;
    let seconds = secs % 60;
    format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions() {
        assert_eq!(mention_user(UserId::new(5)), "<@5>");
        assert_eq!(mention_channel(9), "<#9>");
        assert_eq!(mention_list(&[]), "");
        assert_eq!(mention_list(&[UserId::new(1), UserId::new(2)]), "<@1>, <@2>");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0d 0h 0m 0s");
        assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 1h 1m 1s");
        assert_eq!(format_uptime(Duration::from_secs(3_599)), "0d 0h 59m 59s");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long prize name", 10), "a very ...");
        assert_eq!(truncate("🎉🎉🎉🎉", 2), "🎉🎉");
    }
}
