pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type PrefixContext<'a> = poise::PrefixContext<'a, Data, Error>;
pub type FrameworkContext<'a> = poise::FrameworkContext<'a, Data, Error>;
pub type Command = poise::Command<Data, Error>;

use crate::catalog::Rarity;
use crate::config::Config;
use crate::store::{JsonFile, Store};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serenity::all::UserId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

const GAME_FILE: &str = "pokemon_data.json";
const LEVELS_FILE: &str = "levels.json";
const MEMES_FILE: &str = "memes.json";
const JOKES_FILE: &str = "jokes.json";

pub struct Data {
    pub game: RwLock<GameState>,
    pub levels: RwLock<Levels>,
    pub config: Config,
    pub memes: Vec<Meme>,
    pub jokes: Vec<Joke>,
    /// Last catch attempt per user, checked against the configured cooldown.
    pub catch_cooldowns: DashMap<UserId, Instant>,
    /// Runtime-adjustable via the setcatchcd command.
    pub catch_cooldown_secs: AtomicU64,
    pub spawning: AtomicBool,
    pub spawner: Mutex<Option<CancellationToken>>,
    game_file: JsonFile<GameState>,
    levels_file: JsonFile<Levels>,
}

/// Collections, streaks and the currently catchable spawn.
///
/// The active spawn is deliberately not persisted, a restart simply waits for
/// the next spawner tick.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct GameState {
    pub pokedex: HashMap<UserId, Vec<CaughtCreature>>,
    pub streaks: HashMap<UserId, u32>,
    #[serde(skip)]
    pub active: Option<Spawn>,
}

/// The currently catchable creature, if any. At most one exists at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Spawn {
    pub name: &'static str,
    pub rarity: Rarity,
    pub shiny: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CaughtCreature {
    pub name: String,
    pub rarity: Rarity,
    pub shiny: bool,
}

/// Per-user XP records plus the tunable XP amounts, persisted together.
///
/// The on-disk layout keeps user ids at the top level with the config under a
/// reserved `_config` key.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct Levels {
    #[serde(rename = "_config", default)]
    pub config: XpConfig,
    #[serde(flatten)]
    pub users: HashMap<UserId, LevelRecord>,
}

#[derive(Serialize, Deserialize, Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct LevelRecord {
    pub xp: u64,
    pub level: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct XpConfig {
    pub message_xp: u64,
    pub catch_xp: u64,
    pub meme_xp: u64,
    pub joke_xp: u64,
    pub duel_win_xp: u64,
    pub announce_levelup: bool,
    /// The `k` in `level = floor(sqrt(xp / k))`.
    pub level_divisor: u64,
}

impl Default for XpConfig {
    fn default() -> Self {
        XpConfig {
            message_xp: 5,
            catch_xp: 20,
            meme_xp: 10,
            joke_xp: 10,
            duel_win_xp: 30,
            announce_levelup: true,
            level_divisor: 50,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Meme {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Joke {
    #[serde(default)]
    pub setup: Option<String>,
    #[serde(default)]
    pub punchline: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Data {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let game_file = JsonFile::new(GAME_FILE);
        let levels_file = JsonFile::new(LEVELS_FILE);
        let memes: Vec<Meme> = JsonFile::new(MEMES_FILE).load();
        let jokes: Vec<Joke> = JsonFile::new(JOKES_FILE).load();

        Data {
            game: RwLock::new(game_file.load()),
            levels: RwLock::new(levels_file.load()),
            memes,
            jokes,
            catch_cooldowns: DashMap::new(),
            catch_cooldown_secs: AtomicU64::new(config.catch_cooldown_secs),
            spawning: AtomicBool::new(false),
            spawner: Mutex::new(None),
            config,
            game_file,
            levels_file,
        }
    }

    /// Full-document rewrite of the game file. Failures are logged, losing a
    /// save is not worth killing the process over.
    pub fn write_game(&self) {
        if let Err(error) = self.game_file.save(&self.game.read()) {
            eprintln!("Failed to save {GAME_FILE}: {error}");
        }
    }

    pub fn write_levels(&self) {
        if let Err(error) = self.levels_file.save(&self.levels.read()) {
            eprintln!("Failed to save {LEVELS_FILE}: {error}");
        }
    }

    /// Grants XP and persists, returning the new record and whether the user
    /// crossed a level boundary.
    pub fn add_xp(&self, user: UserId, amount: u64) -> (LevelRecord, bool) {
        let result = self.levels.write().add_xp(user, amount);
        self.write_levels();
        result
    }

    /// Remaining catch cooldown for a user, if one is active.
    #[must_use]
    pub fn check_catch_cooldown(&self, user: UserId) -> Option<Duration> {
        let last = self.catch_cooldowns.get(&user)?;
        let cooldown = Duration::from_secs(self.catch_cooldown_secs.load(Ordering::SeqCst));

        cooldown
            .checked_sub(Instant::now().saturating_duration_since(*last))
            .filter(|left| !left.is_zero())
    }

    pub fn touch_catch_cooldown(&self, user: UserId) {
        self.catch_cooldowns.insert(user, Instant::now());
    }

    #[must_use]
    pub fn is_spawning(&self) -> bool {
        self.spawning.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_document_layout_matches_the_flat_file() {
        let mut levels = Levels::default();
        levels.users.insert(
            UserId::new(42),
            LevelRecord {
                xp: 100,
                level: 1,
            },
        );

        let json = serde_json::to_value(&levels).unwrap();
        assert!(json.get("_config").is_some());
        assert_eq!(json["42"]["xp"], 100);
        assert_eq!(json["42"]["level"], 1);

        let back: Levels = serde_json::from_value(json).unwrap();
        assert_eq!(back.users[&UserId::new(42)].xp, 100);
    }

    #[test]
    fn game_state_round_trips_without_the_active_spawn() {
        let mut game = GameState::default();
        game.pokedex.entry(UserId::new(7)).or_default().push(CaughtCreature {
            name: "Pidgey".to_owned(),
            rarity: crate::catalog::Rarity::Common,
            shiny: false,
        });
        game.streaks.insert(UserId::new(7), 2);
        game.active = Some(Spawn {
            name: "Mew",
            rarity: crate::catalog::Rarity::Legendary,
            shiny: true,
        });

        let json = serde_json::to_string(&game).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(back.pokedex[&UserId::new(7)].len(), 1);
        assert_eq!(back.streaks[&UserId::new(7)], 2);
        assert!(back.active.is_none(), "spawns must not survive a restart");
    }
}
