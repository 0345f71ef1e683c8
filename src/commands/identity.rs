use tracing::{error, info, warn};

use crate::managers::identity_manager::StartClaimOutcome;
use crate::messages;
use crate::{Context, Error};

/// Discord handle used as the key of pending verifications and bindings
fn discord_handle(ctx: &Context<'_>) -> String {
    ctx.author().tag()
}

async fn reply_ephemeral(ctx: &Context<'_>, content: String) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Start claiming an on-chain membership
///
/// Issues a challenge that has to be signed with the membership's controller account.
#[poise::command(prefix_command, slash_command)]
pub async fn claim(
    ctx: Context<'_>,
    #[description = "Your on-chain membership handle"] handle: String,
) -> Result<(), Error> {
    // Query node retries can outlast the interaction deadline
    ctx.defer_ephemeral().await?;

    let handle = handle.trim().to_string();
    let requester = discord_handle(&ctx);

    let members = match ctx
        .data()
        .query_node
        .members_by_handles(std::slice::from_ref(&handle))
        .await
    {
        Ok(members) => members,
        Err(e) => {
            warn!("Membership lookup for '{}' failed: {}", handle, e);
            return reply_ephemeral(&ctx, messages::membership_not_found_message(&handle)).await;
        }
    };

    let Some(membership) = members.find_by_handle(&handle) else {
        return reply_ephemeral(&ctx, messages::membership_not_found_message(&handle)).await;
    };

    match ctx
        .data()
        .identity_manager
        .start_claim(&requester, membership)
        .await
    {
        Ok(StartClaimOutcome::ChallengeIssued(pending)) => {
            info!("Sent claim challenge to {} for '{}'", requester, handle);
            reply_ephemeral(
                &ctx,
                messages::challenge_message(
                    &membership.handle,
                    &pending.claimed_account_address,
                    &pending.challenge,
                ),
            )
            .await
        }
        Ok(StartClaimOutcome::AlreadyClaimed { .. }) => {
            reply_ephemeral(&ctx, messages::already_claimed_message()).await
        }
        Err(e) => {
            error!("Failed to start claim for {}: {}", requester, e);
            reply_ephemeral(&ctx, messages::try_again_message()).await
        }
    }
}

/// Finish claiming an on-chain identity
#[poise::command(prefix_command, slash_command)]
pub async fn solve(
    ctx: Context<'_>,
    #[description = "The challenge signed with your account (0x followed by 128 hex characters)"]
    challenge: String,
) -> Result<(), Error> {
    let requester = discord_handle(&ctx);
    let outcome = ctx
        .data()
        .identity_manager
        .solve(&requester, &challenge)
        .await;

    if let Some(content) = outcome.reply() {
        reply_ephemeral(&ctx, content).await?;
    }
    Ok(())
}
