//! The background task that periodically publishes a new spawn.

use crate::Data;
use cb_core::structs::Spawn;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio_util::sync::CancellationToken;

/// Starts the spawner loop. Returns false if it was already running.
pub fn start(ctx: serenity::Context, data: &Arc<Data>) -> bool {
    if data.spawning.swap(true, Ordering::SeqCst) {
        return false;
    }

    let token = CancellationToken::new();
    *data.spawner.lock() = Some(token.clone());

    let data = Arc::clone(data);
    tokio::spawn(async move {
        run(ctx, data, token).await;
    });

    true
}

/// Cancels the spawner loop. Returns false if it was not running.
pub fn stop(data: &Arc<Data>) -> bool {
    if !data.spawning.swap(false, Ordering::SeqCst) {
        return false;
    }

    if let Some(token) = data.spawner.lock().take() {
        token.cancel();
    }

    true
}

async fn run(ctx: serenity::Context, data: Arc<Data>, token: CancellationToken) {
    loop {
        tokio::select! {
            () = token.cancelled() => {
                println!("Spawner stopped.");
                return;
            }
            () = tokio::time::sleep(data.config.spawn_interval) => {}
        }

        tick(&ctx, &data).await;
    }
}

/// One spawn attempt. A missing or unsendable channel skips the tick, the
/// next one retries with no extra backoff.
async fn tick(ctx: &serenity::Context, data: &Arc<Data>) {
    let Some(channel) = data.config.spawn_channel else {
        println!("Spawn channel is not configured, skipping tick.");
        return;
    };

    let spawn = Spawn::roll(&mut rand::thread_rng(), data.config.shiny_rate);
    let shiny_text = if spawn.shiny { " ✨SHINY✨" } else { "" };
    let content = format!(
        "A wild **{}** ({}){shiny_text} appeared! Type `!catch {}` to try and catch it!",
        spawn.name, spawn.rarity, spawn.name
    );

    match channel
        .widen()
        .send_message(&ctx.http, serenity::CreateMessage::new().content(content))
        .await
    {
        // Only a spawn the channel heard about becomes catchable.
        Ok(_) => data.game.write().publish_spawn(spawn),
        Err(error) => println!("Could not announce spawn in {channel}: {error}"),
    }
}
