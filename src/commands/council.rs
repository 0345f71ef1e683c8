use poise::serenity_prelude as serenity;
use tracing::error;

use crate::{Context, Error};

/// List the members of the active council
#[poise::command(prefix_command, slash_command)]
pub async fn council(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let councils = match ctx.data().query_node.active_council_members().await {
        Ok(councils) => councils,
        Err(e) => {
            error!("Failed to fetch council members: {}", e);
            ctx.send(poise::CreateReply::default()
                .content("Could not reach the query node. Please try again later.")
                .ephemeral(true))
                .await?;
            return Ok(());
        }
    };

    let handles = councils.member_handles();
    let embed = serenity::CreateEmbed::new()
        .title("Active Council")
        .description(
            handles
                .iter()
                .map(|h| format!("• {}", h))
                .collect::<Vec<_>>()
                .join("\n"),
        )
        .footer(serenity::CreateEmbedFooter::new(format!("{} members", handles.len())))
        .color(0x4038ff);

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true)).await?;
    Ok(())
}
