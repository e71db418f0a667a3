use std::borrow::Cow;
use std::fmt::Write;
use std::sync::atomic::Ordering;

use crate::{Context, Error};
use aformat::{ToArrayString, aformat};
use cb_core::engine::CatchOutcome;
use cb_events::{roles, spawner};
use poise::{
    CreateReply,
    serenity_prelude::{
        self as serenity, ComponentInteractionCollector, CreateActionRow, CreateButton,
        CreateEmbed, CreateEmbedFooter, CreateInteractionResponse,
        CreateInteractionResponseMessage,
    },
};

pub fn commands() -> [crate::Command; 8] {
    [
        catch(),
        pokedex(),
        top(),
        pokemonstatus(),
        startpokemon(),
        stoppokemon(),
        setcatchcd(),
        forceroles(),
    ]
}

/// Try to catch the currently active wild Pokémon.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn catch(
    ctx: Context<'_>,
    #[rest]
    #[description = "The name of the Pokémon."]
    name: String,
) -> Result<(), Error> {
    let data = ctx.data();
    let user_id = ctx.author().id;

    if let Some(left) = data.check_catch_cooldown(user_id) {
        ctx.say(format!(
            "⏳ Wait {} seconds before trying to catch again.",
            left.as_secs().max(1)
        ))
        .await?;
        return Ok(());
    }

    let outcome = {
        let mut game = data.game.write();
        game.attempt_catch(
            user_id,
            &name,
            &data.config.catch_rates,
            &mut rand::thread_rng(),
        )
    };

    match outcome {
        CatchOutcome::NoActiveSpawn => {
            ctx.say("❌ There is no Pokémon to catch right now!").await?;
            return Ok(());
        }
        CatchOutcome::Miss { name } => {
            data.touch_catch_cooldown(user_id);
            ctx.say(format!("❌ That's not the Pokémon! The wild {name} escaped…"))
                .await?;
        }
        CatchOutcome::Escaped { name } => {
            data.touch_catch_cooldown(user_id);
            data.write_game();
            ctx.say(format!("💨 The wild {name} escaped <@{user_id}>!"))
                .await?;
        }
        CatchOutcome::Caught { entry, streak } => {
            data.touch_catch_cooldown(user_id);
            data.write_game();

            let shiny_text = if entry.shiny { " ✨SHINY✨" } else { "" };
            let mut msg = format!(
                "✅ <@{user_id}> caught **{}** ({}){shiny_text}!",
                entry.name, entry.rarity
            );
            if streak >= 3 {
                write!(msg, " 🔥 That's {streak} catches in a row!").unwrap();
            }
            ctx.say(msg).await?;

            let (amount, announce) = {
                let config = &data.levels.read().config;
                (config.catch_xp, config.announce_levelup)
            };
            let (record, leveled_up) = data.add_xp(user_id, amount);
            if leveled_up && announce {
                ctx.say(format!(
                    "🎉 <@{user_id}> leveled up to **Level {}**!",
                    record.level
                ))
                .await?;
            }

            if let Some(guild_id) = ctx.guild_id().or(data.config.guild) {
                roles::update_roles_quietly(ctx.serenity_context(), guild_id, &data).await;
            }
        }
    }

    Ok(())
}

/// Show a trainer's Pokédex, grouped by rarity.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn pokedex(
    ctx: Context<'_>,
    #[description = "The trainer to look up."] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.as_ref().unwrap_or_else(|| ctx.author());
    let data = ctx.data();

    let (entries, streak) = {
        let game = data.game.read();
        (
            game.pokedex.get(&user.id).cloned().unwrap_or_default(),
            game.streaks.get(&user.id).copied().unwrap_or(0),
        )
    };

    if entries.is_empty() {
        ctx.say(format!(
            "📭 {} has not caught any Pokémon yet!",
            user.display_name()
        ))
        .await?;
        return Ok(());
    }

    // shinies get their own group regardless of tier.
    let mut groups: [(&str, Vec<&str>); 5] = [
        ("Shiny", Vec::new()),
        ("Legendary", Vec::new()),
        ("Rare", Vec::new()),
        ("Uncommon", Vec::new()),
        ("Common", Vec::new()),
    ];
    for entry in &entries {
        let index = if entry.shiny {
            0
        } else {
            match entry.rarity {
                cb_core::catalog::Rarity::Legendary => 1,
                cb_core::catalog::Rarity::Rare => 2,
                cb_core::catalog::Rarity::Uncommon => 3,
                cb_core::catalog::Rarity::Common => 4,
            }
        };
        groups[index].1.push(&entry.name);
    }

    let mut embed = CreateEmbed::new()
        .title(format!("📘 Pokédex for {}", user.display_name()))
        .colour(serenity::Colour::DARK_GREEN);
    for (label, mut names) in groups {
        if names.is_empty() {
            continue;
        }
        names.sort_unstable();
        embed = embed.field(format!("{label} ({})", names.len()), names.join(", "), false);
    }
    if streak > 0 {
        embed = embed.footer(CreateEmbedFooter::new(format!("🔥 Current streak: {streak}")));
    }

    ctx.send(CreateReply::new().embed(embed)).await?;
    Ok(())
}

/// Show the trainer leaderboard.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn top(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let mut board: Vec<(serenity::UserId, usize, usize)> = {
        let game = data.game.read();
        game.pokedex
            .iter()
            .map(|(user, mons)| {
                let shinies = mons.iter().filter(|m| m.shiny).count();
                (*user, mons.len(), shinies)
            })
            .collect()
    };

    if board.is_empty() {
        ctx.say("📭 No Pokémon have been caught yet!").await?;
        return Ok(());
    }

    board.sort_by(|(_, a_total, a_shiny), (_, b_total, b_shiny)| {
        (b_total, b_shiny).cmp(&(a_total, a_shiny))
    });

    let mut pages = Vec::new();
    let mut current_page = String::new();
    for (rank, (user, total, shinies)) in board.iter().enumerate() {
        writeln!(
            current_page,
            "**#{}** <@{user}>: {total} Pokémon ({shinies} shiny)",
            rank + 1
        )
        .unwrap();

        if (rank + 1) % 10 == 0 {
            pages.push(std::mem::take(&mut current_page));
        }
    }
    if !current_page.is_empty() {
        pages.push(current_page);
    }

    paginate(ctx, &pages).await
}

/// Two-button pager with wrap-around, over prebuilt pages.
async fn paginate(ctx: Context<'_>, pages: &[String]) -> Result<(), Error> {
    let builder = CreateReply::new().embed(leaderboard_embed(&pages[0]));

    if pages.len() == 1 {
        ctx.send(builder).await?;
        return Ok(());
    }

    let ctx_id = ctx.id();
    let previous_id = aformat!("{ctx_id}previous");
    let next_id = aformat!("{ctx_id}next");

    let components = [serenity::CreateComponent::ActionRow(
        CreateActionRow::Buttons(Cow::Owned(vec![
            CreateButton::new(previous_id.as_str()).emoji('◀'),
            CreateButton::new(next_id.as_str()).emoji('▶'),
        ])),
    )];

    let msg = ctx.send(builder.components(&components)).await?;

    let mut current_page = 0;
    while let Some(press) = ComponentInteractionCollector::new(ctx.serenity_context())
        .filter(move |press| {
            press
                .data
                .custom_id
                .starts_with(ctx_id.to_arraystring().as_str())
        })
        .timeout(std::time::Duration::from_secs(180))
        .await
    {
        if *press.data.custom_id == *next_id {
            current_page += 1;
            if current_page >= pages.len() {
                current_page = 0;
            }
        } else if *press.data.custom_id == *previous_id {
            current_page = current_page.checked_sub(1).unwrap_or(pages.len() - 1);
        } else {
            continue;
        }

        let _ = press
            .create_response(
                ctx.http(),
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::default()
                        .embed(leaderboard_embed(&pages[current_page])),
                ),
            )
            .await;
    }

    msg.edit(
        ctx,
        CreateReply::new().embed(leaderboard_embed(&pages[current_page])),
    )
    .await?;
    Ok(())
}

fn leaderboard_embed(page: &str) -> CreateEmbed<'_> {
    CreateEmbed::new()
        .title("🏆 Top Pokémon Trainers")
        .colour(serenity::Colour::GOLD)
        .description(page)
}

/// Show whether spawning is running and what is currently catchable.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn pokemonstatus(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let active = { data.game.read().active };

    if !data.is_spawning() {
        ctx.say("🛑 Pokémon spawning is currently **OFF**.").await?;
    } else if let Some(spawn) = active {
        let shiny_text = if spawn.shiny { " ✨SHINY✨" } else { "" };
        ctx.say(format!(
            "✅ Spawning is **ON**. Active Pokémon: **{}** ({}){shiny_text}",
            spawn.name, spawn.rarity
        ))
        .await?;
    } else {
        ctx.say("✅ Spawning is **ON**, but no Pokémon is currently active.")
            .await?;
    }

    Ok(())
}

/// Start the spawner.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn startpokemon(ctx: Context<'_>) -> Result<(), Error> {
    if spawner::start(ctx.serenity_context().clone(), &ctx.data()) {
        ctx.say("🐾 Pokémon spawning has started!").await?;
    } else {
        ctx.say("Pokémon spawns are already running!").await?;
    }

    Ok(())
}

/// Stop the spawner.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn stoppokemon(ctx: Context<'_>) -> Result<(), Error> {
    if spawner::stop(&ctx.data()) {
        ctx.say("🛑 Pokémon spawning has been stopped.").await?;
    } else {
        ctx.say("Pokémon spawns are not running!").await?;
    }

    Ok(())
}

/// Change the per-user catch cooldown.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn setcatchcd(
    ctx: Context<'_>,
    #[description = "Cooldown in seconds."] seconds: u64,
) -> Result<(), Error> {
    ctx.data()
        .catch_cooldown_secs
        .store(seconds, Ordering::SeqCst);
    ctx.say(format!("✅ Catch cooldown set to {seconds} seconds."))
        .await?;

    Ok(())
}

/// Recompute and apply the leaderboard roles right now.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn forceroles(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let Some(guild_id) = ctx.guild_id().or(data.config.guild) else {
        ctx.say("⚠️ Guild not found for role updates.").await?;
        return Ok(());
    };

    roles::update_roles(ctx.serenity_context(), guild_id, &data).await?;

    let holders = roles::current_holders(&data);
    let mut msg = String::from("🔄 Roles refreshed.");
    if let Some(top) = holders.top {
        write!(msg, " Top Trainer: <@{top}>.").unwrap();
    }
    if let Some(shiny) = holders.shiny_best {
        write!(msg, " Shiny Master: <@{shiny}>.").unwrap();
    }
    ctx.say(msg).await?;

    Ok(())
}
