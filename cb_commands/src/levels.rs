use std::fmt::Write;

use crate::{Context, Error};
use poise::{
    ChoiceParameter, CreateReply,
    serenity_prelude::{self as serenity, CreateEmbed},
};
use rand::Rng;

pub fn commands() -> [crate::Command; 8] {
    [
        level(),
        leaderboard(),
        duel(),
        setxp(),
        getxpconfig(),
        togglelevelup(),
        resetlevel(),
        resetalllevels(),
    ]
}

/// Show a user's level and XP.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn level(
    ctx: Context<'_>,
    #[description = "The user to look up."] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.as_ref().unwrap_or_else(|| ctx.author());
    let data = ctx.data();
    let record = {
        let levels = data.levels.read();
        levels.users.get(&user.id).copied().unwrap_or_default()
    };

    ctx.say(format!(
        "⭐ {} is **Level {}** with **{} XP**.",
        user.display_name(),
        record.level,
        record.xp
    ))
    .await?;

    Ok(())
}

/// Show the top 10 users by XP.
#[poise::command(prefix_command, slash_command, guild_only, aliases("levels"))]
pub async fn leaderboard(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let mut board: Vec<(serenity::UserId, cb_core::structs::LevelRecord)> = {
        let levels = data.levels.read();
        levels.users.iter().map(|(id, rec)| (*id, *rec)).collect()
    };

    if board.is_empty() {
        ctx.say("📭 Nobody has earned any XP yet!").await?;
        return Ok(());
    }

    board.sort_by(|(_, a), (_, b)| b.xp.cmp(&a.xp));
    board.truncate(10);

    let mut description = String::new();
    for (rank, (user, record)) in board.iter().enumerate() {
        writeln!(
            description,
            "**#{}** <@{user}>: Level {} ({} XP)",
            rank + 1,
            record.level,
            record.xp
        )
        .unwrap();
    }

    let embed = CreateEmbed::new()
        .title("⭐ XP Leaderboard")
        .colour(serenity::Colour::BLUE)
        .description(description);
    ctx.send(CreateReply::new().embed(embed)).await?;

    Ok(())
}

/// Challenge another user to a coin-flip duel for XP.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn duel(
    ctx: Context<'_>,
    #[description = "The user to challenge."] opponent: serenity::User,
) -> Result<(), Error> {
    let challenger = ctx.author();
    if opponent.id == challenger.id {
        ctx.say("🤨 You can't duel yourself!").await?;
        return Ok(());
    }
    if opponent.bot() {
        ctx.say("🤖 Bots don't duel.").await?;
        return Ok(());
    }

    let data = ctx.data();
    let challenger_wins = rand::thread_rng().gen_bool(0.5);
    let winner = if challenger_wins { challenger } else { &opponent };

    let (amount, announce) = {
        let config = &data.levels.read().config;
        (config.duel_win_xp, config.announce_levelup)
    };
    let (record, leveled_up) = data.add_xp(winner.id, amount);

    ctx.say(format!(
        "⚔️ <@{}> challenged <@{}> and **<@{}> wins**! (+{amount} XP)",
        challenger.id, opponent.id, winner.id
    ))
    .await?;

    if leveled_up && announce {
        ctx.say(format!(
            "🎉 <@{}> leveled up to **Level {}**!",
            winner.id, record.level
        ))
        .await?;
    }

    Ok(())
}

#[derive(poise::ChoiceParameter, Copy, Clone)]
pub enum XpKind {
    Message,
    Catch,
    Meme,
    Joke,
    #[name = "Duel win"]
    DuelWin,
}

/// Change how much XP an action grants.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn setxp(
    ctx: Context<'_>,
    #[description = "Which action to change."] kind: XpKind,
    #[description = "XP granted per action."] amount: u64,
) -> Result<(), Error> {
    let data = ctx.data();
    {
        let mut levels = data.levels.write();
        let field = match kind {
            XpKind::Message => &mut levels.config.message_xp,
            XpKind::Catch => &mut levels.config.catch_xp,
            XpKind::Meme => &mut levels.config.meme_xp,
            XpKind::Joke => &mut levels.config.joke_xp,
            XpKind::DuelWin => &mut levels.config.duel_win_xp,
        };
        *field = amount;
    }
    data.write_levels();

    ctx.say(format!("✅ {} XP set to {amount}.", kind.name()))
        .await?;

    Ok(())
}

/// Show the current XP configuration.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn getxpconfig(ctx: Context<'_>) -> Result<(), Error> {
    let config = { ctx.data().levels.read().config.clone() };

    let embed = CreateEmbed::new()
        .title("⚙️ XP Configuration")
        .colour(serenity::Colour::TEAL)
        .field("Message", config.message_xp.to_string(), true)
        .field("Catch", config.catch_xp.to_string(), true)
        .field("Meme", config.meme_xp.to_string(), true)
        .field("Joke", config.joke_xp.to_string(), true)
        .field("Duel win", config.duel_win_xp.to_string(), true)
        .field(
            "Level-up announcements",
            if config.announce_levelup { "on" } else { "off" },
            true,
        );
    ctx.send(CreateReply::new().embed(embed)).await?;

    Ok(())
}

/// Toggle level-up announcements.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn togglelevelup(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let now_on = {
        let mut levels = data.levels.write();
        levels.config.announce_levelup = !levels.config.announce_levelup;
        levels.config.announce_levelup
    };
    data.write_levels();

    ctx.say(if now_on {
        "🔔 Level-up announcements are now **on**."
    } else {
        "🔕 Level-up announcements are now **off**."
    })
    .await?;

    Ok(())
}

/// Reset one user's XP and level.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn resetlevel(
    ctx: Context<'_>,
    #[description = "The user to reset."] user: serenity::User,
) -> Result<(), Error> {
    let data = ctx.data();
    let removed = { data.levels.write().users.remove(&user.id).is_some() };
    data.write_levels();

    if removed {
        ctx.say(format!("🗑️ Reset XP for {}.", user.display_name()))
            .await?;
    } else {
        ctx.say(format!("{} has no XP to reset.", user.display_name()))
            .await?;
    }

    Ok(())
}

/// Reset everyone's XP. Requires typing `confirm`.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn resetalllevels(
    ctx: Context<'_>,
    #[description = "Type `confirm` to wipe all XP."] confirm: Option<String>,
) -> Result<(), Error> {
    if confirm.as_deref() != Some("confirm") {
        ctx.say("⚠️ This wipes **all** XP. Run again with `confirm` to proceed.")
            .await?;
        return Ok(());
    }

    let data = ctx.data();
    data.levels.write().users.clear();
    data.write_levels();
    ctx.say("🗑️ All XP has been reset.").await?;

    Ok(())
}
