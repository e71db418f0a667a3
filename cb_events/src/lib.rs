#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use poise::serenity_prelude as serenity;

pub(crate) use cb_core::structs::{Data, Error, FrameworkContext};

pub mod roles;
pub mod spawner;

pub async fn handler(
    event: &serenity::FullEvent,
    framework: FrameworkContext<'_>,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot, .. } => {
            println!("Logged in as {}", data_about_bot.user.tag());
            if spawner::start(framework.serenity_context.clone(), &framework.user_data()) {
                println!("Auto-started the spawner.");
            }
        }
        serenity::FullEvent::Message { new_message, .. } => {
            message_xp(framework, new_message).await?;
        }
        _ => {}
    }
    Ok(())
}

/// Every human message is worth a little XP.
async fn message_xp(
    framework: FrameworkContext<'_>,
    message: &serenity::Message,
) -> Result<(), Error> {
    if message.author.bot() {
        return Ok(());
    }

    let data = framework.user_data();
    let (amount, announce) = {
        let config = &data.levels.read().config;
        (config.message_xp, config.announce_levelup)
    };
    if amount == 0 {
        return Ok(());
    }

    let (record, leveled_up) = data.add_xp(message.author.id, amount);
    if leveled_up && announce {
        message
            .channel_id
            .send_message(
                &framework.serenity_context.http,
                serenity::CreateMessage::new().content(format!(
                    "🎉 <@{}> leveled up to **Level {}**!",
                    message.author.id, record.level
                )),
            )
            .await?;
    }

    Ok(())
}
