use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serenity::all::{ChannelId, GuildId, MessageId};

/// Every live giveaway, keyed by the id of its announcement message
pub type GiveawayMap = BTreeMap<u64, GiveawayRecord>;

/// A giveaway that has not been finalized yet.
///
/// Records are written once at creation and deleted when the giveaway is
/// finalized; presence in the store is what makes a giveaway live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiveawayRecord {
    /// Announcement message id. Stored as the map key, not inside the value.
    #[serde(skip)]
    pub id: u64,
    #[serde(with = "snowflake")]
    pub channel_id: u64,
    #[serde(with = "snowflake")]
    pub guild_id: u64,
    pub prize: String,
    #[serde(rename = "winners", alias = "winnerCount")]
    pub winner_count: u32,
    /// Expiry as epoch milliseconds
    pub ends_at: i64,
}

impl GiveawayRecord {
    pub fn is_due(&self, now_ms: i64) -> bool {
        self.ends_at <= now_ms
    }

    /// Whether every id can be turned into a Discord id (they are non-zero)
    pub fn is_addressable(&self) -> bool {
        self.id != 0 && self.channel_id != 0 && self.guild_id != 0
    }

    pub fn message_id(&self) -> MessageId {
        MessageId::new(self.id)
    }

    pub fn channel(&self) -> ChannelId {
        ChannelId::new(self.channel_id)
    }

    pub fn guild(&self) -> GuildId {
        GuildId::new(self.guild_id)
    }

    /// Expiry as unix seconds, for Discord timestamp markup
    pub fn ends_at_unix(&self) -> i64 {
        self.ends_at.div_euclid(1000)
    }
}

/// Snowflakes are written as strings and read back from strings or numbers
mod snowflake {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(id) => Ok(id),
            Raw::Text(text) => text.trim().parse().map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> GiveawayRecord {
        GiveawayRecord {
            id: 1200000000000000001,
            channel_id: 1100000000000000002,
            guild_id: 1000000000000000003,
            prize: "Nitro".to_string(),
            winner_count: 2,
            ends_at: 1_700_000_000_500,
        }
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(value["channelId"], "1100000000000000002");
        assert_eq!(value["guildId"], "1000000000000000003");
        assert_eq!(value["winners"], 2);
        assert_eq!(value["endsAt"], 1_700_000_000_500i64);
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_accepts_numeric_ids_and_alias() {
        let parsed: GiveawayRecord = serde_json::from_str(
            r#"{"channelId": 42, "guildId": "7", "prize": "Key", "winnerCount": 1, "endsAt": 10}"#,
        )
        .unwrap();
        assert_eq!(parsed.channel_id, 42);
        assert_eq!(parsed.guild_id, 7);
        assert_eq!(parsed.winner_count, 1);
        assert_eq!(parsed.id, 0);
        assert!(!parsed.is_addressable());
    }

    #[test]
    fn test_is_due() {
        let r = record();
        assert!(!r.is_due(r.ends_at - 1));
        assert!(r.is_due(r.ends_at));
        assert!(r.is_due(r.ends_at + 1));
        assert_eq!(r.ends_at_unix(), 1_700_000_000);
    }
}
