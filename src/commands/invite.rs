use poise::serenity_prelude::CreateEmbedFooter;

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::constants::embeds::{self, BOT_NAME};

/// Permissions requested by the invite link (Manage Roles)
const INVITE_PERMISSIONS: u64 = 268435456;

/// OAuth2 link that adds the bot with slash commands enabled
pub fn invite_link(client_id: &str) -> String {
    format!(
        "https://discord.com/oauth2/authorize?client_id={}&permissions={}&scope=bot%20applications.commands",
        client_id, INVITE_PERMISSIONS
    )
}

/// Get the bot's invite link and support server invite.
#[poise::command(slash_command)]
pub async fn invite(ctx: Context<'_>) -> Result<(), Error> {
    let settings = &ctx.data().settings;

    let embed = embeds::brand_embed()
        .title(format!("🔗 Invite {} & Join Support Server", BOT_NAME))
        .description(format!(
            "You can invite {} to your server using this link:\n[**Invite Me!**]({})\n\n\
            Need help or want to suggest a feature? Join our official server:\n[**Support Server**]({})",
            BOT_NAME,
            invite_link(&settings.client_id),
            settings.official_server_invite
        ))
        .footer(CreateEmbedFooter::new(format!(
            "Thank you for using {}!",
            BOT_NAME
        )));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    ctx.data().log.info(
        "🔗 Invite Command Used",
        format!("User **{}** used the invite command.", ctx.author().tag()),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_link() {
        assert_eq!(
            invite_link("1234"),
            "https://discord.com/oauth2/authorize?client_id=1234&permissions=268435456&scope=bot%20applications.commands"
        );
    }
}
