use crate::catalog::Rarity;
use serenity::all::{ChannelId, GuildId};
use std::str::FromStr;
use std::time::Duration;

/// Chance that a correct guess actually catches the creature, per tier.
///
/// Shiny spawns are harder: their base rate is scaled by `shiny_multiplier`.
#[derive(Clone, Copy, Debug)]
pub struct CatchRates {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
    pub legendary: f64,
    pub shiny_multiplier: f64,
}

impl Default for CatchRates {
    fn default() -> Self {
        CatchRates {
            common: 0.8,
            uncommon: 0.5,
            rare: 0.3,
            legendary: 0.05,
            shiny_multiplier: 0.5,
        }
    }
}

impl CatchRates {
    /// The lookup is total over the enum, a tier without a rate cannot exist.
    #[must_use]
    pub fn rate(&self, rarity: Rarity, shiny: bool) -> f64 {
        let base = match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Legendary => self.legendary,
        };

        if shiny {
            (base * self.shiny_multiplier).clamp(0.0, 1.0)
        } else {
            base
        }
    }
}

/// Tunables read once from the environment at startup.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Where spawns get announced. Spawner ticks are skipped until this is set.
    pub spawn_channel: Option<ChannelId>,
    /// Fallback guild for role management when a command runs outside one.
    pub guild: Option<GuildId>,
    pub shiny_rate: f64,
    pub spawn_interval: Duration,
    pub catch_cooldown_secs: u64,
    pub catch_rates: CatchRates,
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        let rates = CatchRates::default();
        let catch_rates = CatchRates {
            common: env_parse("CATCH_RATE_COMMON", rates.common),
            uncommon: env_parse("CATCH_RATE_UNCOMMON", rates.uncommon),
            rare: env_parse("CATCH_RATE_RARE", rates.rare),
            legendary: env_parse("CATCH_RATE_LEGENDARY", rates.legendary),
            shiny_multiplier: env_parse("SHINY_CATCH_MULTIPLIER", rates.shiny_multiplier),
        };

        let spawn_channel = env_parse("SPAWN_CHANNEL_ID", 0u64);
        let guild = env_parse("GUILD_ID", 0u64);

        Config {
            spawn_channel: (spawn_channel != 0).then(|| ChannelId::new(spawn_channel)),
            guild: (guild != 0).then(|| GuildId::new(guild)),
            shiny_rate: env_parse("SHINY_RATE", 0.01f64).clamp(0.0, 1.0),
            spawn_interval: Duration::from_secs(env_parse("SPAWN_INTERVAL_SECS", 1800)),
            catch_cooldown_secs: env_parse("CATCH_COOLDOWN_SECS", 10),
            catch_rates,
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_has_a_positive_catch_rate() {
        let rates = CatchRates::default();
        for rarity in Rarity::ALL {
            assert!(rates.rate(rarity, false) > 0.0, "{rarity} is uncatchable");
        }
    }

    #[test]
    fn shiny_rate_is_never_easier() {
        let rates = CatchRates::default();
        for rarity in Rarity::ALL {
            assert!(rates.rate(rarity, true) <= rates.rate(rarity, false));
        }
    }

    #[test]
    fn shiny_multiplier_clamps_into_unit_interval() {
        let rates = CatchRates {
            shiny_multiplier: 100.0,
            ..CatchRates::default()
        };
        assert!(rates.rate(Rarity::Common, true) <= 1.0);
    }
}
