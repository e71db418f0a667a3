use crate::{Context, Error};
use poise::{
    CreateReply,
    serenity_prelude::{self as serenity, CreateEmbed},
};
use rand::seq::SliceRandom;

pub fn commands() -> [crate::Command; 2] {
    [meme(), joke()]
}

/// Post a random meme.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn meme(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let Some(meme) = data.memes.choose(&mut rand::thread_rng()) else {
        ctx.say("📭 No memes available.").await?;
        return Ok(());
    };

    let mut embed = CreateEmbed::new().colour(serenity::Colour::ORANGE);
    if let Some(title) = &meme.title {
        embed = embed.title(title.as_str());
    }
    if let Some(url) = &meme.url {
        embed = embed.image(url.as_str(), None);
    }
    ctx.send(CreateReply::new().embed(embed)).await?;

    award_fun_xp(ctx, FunXp::Meme).await?;
    Ok(())
}

/// Tell a random joke, punchline behind a spoiler.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn joke(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let Some(joke) = data.jokes.choose(&mut rand::thread_rng()) else {
        ctx.say("📭 No jokes available.").await?;
        return Ok(());
    };

    let content = match (&joke.setup, &joke.punchline, &joke.text) {
        (Some(setup), Some(punchline), _) => format!("🤣 {setup}\n||{punchline}||"),
        (_, _, Some(text)) => format!("🤣 {text}"),
        _ => {
            ctx.say("📭 No jokes available.").await?;
            return Ok(());
        }
    };
    ctx.say(content).await?;

    award_fun_xp(ctx, FunXp::Joke).await?;
    Ok(())
}

enum FunXp {
    Meme,
    Joke,
}

async fn award_fun_xp(ctx: Context<'_>, kind: FunXp) -> Result<(), Error> {
    let data = ctx.data();
    let (amount, announce) = {
        let config = &data.levels.read().config;
        let amount = match kind {
            FunXp::Meme => config.meme_xp,
            FunXp::Joke => config.joke_xp,
        };
        (amount, config.announce_levelup)
    };

    let (record, leveled_up) = data.add_xp(ctx.author().id, amount);
    if leveled_up && announce {
        ctx.say(format!(
            "🎉 <@{}> leveled up to **Level {}**!",
            ctx.author().id,
            record.level
        ))
        .await?;
    }

    Ok(())
}
