use serenity::all::{CreateEmbed, CreateEmbedFooter, Timestamp, UserId};

use crate::constants::embeds::{self, ENDED_TITLE};
use crate::constants::timeouts::GIVEAWAY_EMOJI;
use crate::utils::formatting::{discord_timestamp, mention_list, truncate};

/// Embed titles are capped by Discord at 256 characters
const MAX_PRIZE_IN_TITLE: usize = 200;

/// Prize text shown in results; with `MAX_WINNERS` mentions the ping stays under 2000 characters
const MAX_PRIZE_IN_RESULT: usize = 400;

/// The entry message users react to
pub fn giveaway_embed(prize: &str, winner_count: u32, ends_at_ms: i64, host: &str) -> CreateEmbed {
    let ends_at = ends_at_ms.div_euclid(1000);

    let mut embed = embeds::giveaway_embed()
        .title(format!("🎉 Giveaway: {} 🎉", truncate(prize, MAX_PRIZE_IN_TITLE)))
        .description(format!(
            "React with {} to enter!\nWinners: **{}**\nEnds: {} ({})",
            GIVEAWAY_EMOJI,
            winner_count,
            discord_timestamp(ends_at, 'R'),
            discord_timestamp(ends_at, 'F'),
        ))
        .footer(CreateEmbedFooter::new(format!("Giveaway hosted by {}", host)));

    if let Ok(timestamp) = Timestamp::from_unix_timestamp(ends_at) {
        embed = embed.timestamp(timestamp);
    }

    embed
}

pub fn winners_embed(prize: &str, winners: &[UserId], giveaway_id: u64) -> CreateEmbed {
    embeds::success_embed()
        .title(ENDED_TITLE)
        .description(format!(
            "Congratulations to {}!\nYou won **{}**!",
            mention_list(winners),
            truncate(prize, MAX_PRIZE_IN_RESULT)
        ))
        .footer(giveaway_footer(giveaway_id))
}

pub fn no_participants_embed(prize: &str, giveaway_id: u64) -> CreateEmbed {
    embeds::error_embed()
        .title(ENDED_TITLE)
        .description(format!(
            "No one entered the giveaway for **{}**. Better luck next time!",
            truncate(prize, MAX_PRIZE_IN_RESULT)
        ))
        .footer(giveaway_footer(giveaway_id))
}

/// Channel message that pings the winners
pub fn winners_message(prize: &str, winners: &[UserId]) -> String {
    format!(
        "Congratulations {}! You won the **{}**!",
        mention_list(winners),
        truncate(prize, MAX_PRIZE_IN_RESULT)
    )
}

fn giveaway_footer(giveaway_id: u64) -> CreateEmbedFooter {
    CreateEmbedFooter::new(format!("Giveaway ID: {}", giveaway_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::timeouts::MAX_WINNERS;

    fn json(embed: CreateEmbed) -> serde_json::Value {
        serde_json::to_value(embed).unwrap()
    }

    #[test]
    fn test_giveaway_embed() {
        let value = json(giveaway_embed("Nitro", 2, 1_700_000_000_999, "host#0001"));
        assert_eq!(value["title"], "🎉 Giveaway: Nitro 🎉");
        let description = value["description"].as_str().unwrap();
        assert!(description.contains("Winners: **2**"));
        assert!(description.contains("<t:1700000000:R>"));
        assert!(description.contains("<t:1700000000:F>"));
        assert_eq!(value["footer"]["text"], "Giveaway hosted by host#0001");
    }

    #[test]
    fn test_winner_outputs() {
        let winners = [UserId::new(1), UserId::new(2)];
        let value = json(winners_embed("Key", &winners, 77));
        assert!(value["description"]
            .as_str()
            .unwrap()
            .starts_with("Congratulations to <@1>, <@2>!"));
        assert_eq!(value["footer"]["text"], "Giveaway ID: 77");
        assert_eq!(
            winners_message("Key", &winners),
            "Congratulations <@1>, <@2>! You won the **Key**!"
        );
    }

    #[test]
    fn test_largest_result_fits_discord_limits() {
        let winners: Vec<UserId> = (0..MAX_WINNERS as u64)
            .map(|i| UserId::new(u64::MAX - i))
            .collect();
        let prize = "x".repeat(5000);

        let message = winners_message(&prize, &winners);
        assert!(message.chars().count() <= 2000, "{} chars", message.chars().count());
        assert!(message.contains(&format!("<@{}>", u64::MAX)));

        let value = json(winners_embed(&prize, &winners, 77));
        assert!(value["description"].as_str().unwrap().chars().count() <= 4096);

        let value = json(no_participants_embed(&prize, 77));
        assert!(value["description"].as_str().unwrap().chars().count() <= 4096);
    }

    #[test]
    fn test_no_participants_embed() {
        let value = json(no_participants_embed("Key", 77));
        assert_eq!(value["title"], ENDED_TITLE);
        assert!(value["description"].as_str().unwrap().contains("No one entered"));
    }
}
