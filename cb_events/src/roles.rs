//! Keeps the "Top Trainer" and "Shiny Master" roles in sync with the
//! leaderboard computed from the collection map.

use crate::{Data, Error};
use cb_core::engine::{RoleHolders, leaderboard_roles};
use poise::serenity_prelude as serenity;
use serenity::{Colour, EditRole, GuildId, RoleId, UserId};
use std::sync::Arc;

const TOP_ROLE: &str = "Top Trainer";
const SHINY_ROLE: &str = "Shiny Master";

/// Recomputes both role holders and applies the result to every member.
pub async fn update_roles(
    ctx: &serenity::Context,
    guild_id: GuildId,
    data: &Arc<Data>,
) -> Result<(), Error> {
    let holders = { leaderboard_roles(&data.game.read().pokedex) };

    let (top_role, shiny_role) = ensure_roles(ctx, guild_id).await?;
    let members = guild_id.members(&ctx.http, None, None).await?;

    for member in members {
        let user_id = member.user.id;
        apply(
            ctx,
            guild_id,
            user_id,
            top_role,
            member.roles.contains(&top_role),
            holders.top == Some(user_id),
        )
        .await?;
        apply(
            ctx,
            guild_id,
            user_id,
            shiny_role,
            member.roles.contains(&shiny_role),
            holders.shiny_best == Some(user_id),
        )
        .await?;
    }

    Ok(())
}

/// Convenience wrapper for the post-catch hook, failures only get logged.
pub async fn update_roles_quietly(ctx: &serenity::Context, guild_id: GuildId, data: &Arc<Data>) {
    if let Err(error) = update_roles(ctx, guild_id, data).await {
        println!("Failed to update leaderboard roles: {error}");
    }
}

async fn apply(
    ctx: &serenity::Context,
    guild_id: GuildId,
    user_id: UserId,
    role: RoleId,
    has_role: bool,
    deserves_role: bool,
) -> Result<(), Error> {
    if deserves_role && !has_role {
        ctx.http
            .add_member_role(guild_id, user_id, role, Some("Leaderboard role sync"))
            .await?;
    } else if !deserves_role && has_role {
        ctx.http
            .remove_member_role(guild_id, user_id, role, Some("Leaderboard role sync"))
            .await?;
    }

    Ok(())
}

/// Finds the two leaderboard roles, creating whichever is missing.
async fn ensure_roles(
    ctx: &serenity::Context,
    guild_id: GuildId,
) -> Result<(RoleId, RoleId), Error> {
    let (top, shiny) = {
        let guild = ctx
            .cache
            .guild(guild_id)
            .ok_or("Guild is not cached, cannot sync roles.")?;

        let find = |name: &str| guild.roles.iter().find(|r| &*r.name == name).map(|r| r.id);
        (find(TOP_ROLE), find(SHINY_ROLE))
    };

    let top = match top {
        Some(role) => role,
        None => create_role(ctx, guild_id, TOP_ROLE, Colour::GOLD).await?,
    };
    let shiny = match shiny {
        Some(role) => role,
        None => create_role(ctx, guild_id, SHINY_ROLE, Colour::PURPLE).await?,
    };

    Ok((top, shiny))
}

async fn create_role(
    ctx: &serenity::Context,
    guild_id: GuildId,
    name: &str,
    colour: Colour,
) -> Result<RoleId, Error> {
    let role = guild_id
        .create_role(&ctx.http, EditRole::new().name(name).colour(colour))
        .await?;

    Ok(role.id)
}

/// The holders as they would be assigned right now, for status output.
#[must_use]
pub fn current_holders(data: &Arc<Data>) -> RoleHolders {
    leaderboard_roles(&data.game.read().pokedex)
}
