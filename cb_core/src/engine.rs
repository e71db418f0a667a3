//! The spawn/catch state machine.
//!
//! A spawn slot moves `Empty -> Active` on a spawner tick and back to `Empty`
//! on the first catch attempt of any kind, success or not.

use crate::catalog::{self, Rarity};
use crate::config::CatchRates;
use crate::structs::{CaughtCreature, GameState, LevelRecord, Levels, Spawn};
use rand::Rng;
use rand::seq::SliceRandom;
use serenity::all::UserId;
use std::collections::HashMap;

/// What happened to a single catch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatchOutcome {
    /// Nothing is spawned, state is untouched.
    NoActiveSpawn,
    /// Wrong name. The spawn escapes, the streak is left alone.
    Miss { name: &'static str },
    /// Right name, failed the catch roll. The spawn escapes, streak resets.
    Escaped { name: &'static str },
    /// Caught. The entry is appended and the streak incremented.
    Caught { entry: CaughtCreature, streak: u32 },
}

impl Spawn {
    /// Rolls a new spawn: weighted tier, uniform creature within the tier and
    /// an independent shiny draw.
    pub fn roll(rng: &mut impl Rng, shiny_rate: f64) -> Self {
        let rarity = *Rarity::ALL
            .choose_weighted(rng, |r| r.spawn_weight())
            .expect("spawn weights are constant and positive");
        let name = *catalog::tier_members(rarity)
            .choose(rng)
            .expect("every tier has at least one creature");

        Spawn {
            name,
            rarity,
            shiny: rng.gen_bool(shiny_rate.clamp(0.0, 1.0)),
        }
    }
}

impl GameState {
    /// Publishes `spawn` as the unique active instance, replacing any prior.
    pub fn publish_spawn(&mut self, spawn: Spawn) {
        self.active = Some(spawn);
    }

    /// Resolves one catch attempt. The active spawn is consumed no matter the
    /// outcome, except when there was nothing to catch in the first place.
    pub fn attempt_catch(
        &mut self,
        user: UserId,
        guess: &str,
        rates: &CatchRates,
        rng: &mut impl Rng,
    ) -> CatchOutcome {
        let Some(spawn) = self.active.take() else {
            return CatchOutcome::NoActiveSpawn;
        };

        if !guess.trim().eq_ignore_ascii_case(spawn.name) {
            return CatchOutcome::Miss { name: spawn.name };
        }

        if rng.r#gen::<f64>() <= rates.rate(spawn.rarity, spawn.shiny) {
            let entry = CaughtCreature {
                name: spawn.name.to_owned(),
                rarity: spawn.rarity,
                shiny: spawn.shiny,
            };
            self.pokedex.entry(user).or_default().push(entry.clone());
            let streak = self.streaks.entry(user).or_insert(0);
            *streak += 1;

            CatchOutcome::Caught {
                entry,
                streak: *streak,
            }
        } else {
            self.streaks.insert(user, 0);
            CatchOutcome::Escaped { name: spawn.name }
        }
    }
}

impl Levels {
    /// Adds XP and recomputes the level. Levels only ever go up.
    pub fn add_xp(&mut self, user: UserId, amount: u64) -> (LevelRecord, bool) {
        let divisor = self.config.level_divisor.max(1);
        let record = self.users.entry(user).or_default();
        record.xp += amount;

        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let new_level = (record.xp as f64 / divisor as f64).sqrt().floor() as u32;

        let leveled_up = new_level > record.level;
        if leveled_up {
            record.level = new_level;
        }

        (*record, leveled_up)
    }
}

/// Who currently deserves the leaderboard roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleHolders {
    /// Owner of the largest collection.
    pub top: Option<UserId>,
    /// Owner of the most shinies, only defined once a shiny exists at all.
    pub shiny_best: Option<UserId>,
}

/// Pure computation over the full collection map.
///
/// Ties resolve to whichever owner the map happens to yield, there is no
/// deterministic tie-break.
#[must_use]
pub fn leaderboard_roles(pokedex: &HashMap<UserId, Vec<CaughtCreature>>) -> RoleHolders {
    let top = pokedex
        .iter()
        .max_by_key(|(_, mons)| mons.len())
        .map(|(user, _)| *user);

    let shiny_best = pokedex
        .iter()
        .map(|(user, mons)| (*user, mons.iter().filter(|m| m.shiny).count()))
        .filter(|(_, shinies)| *shinies > 0)
        .max_by_key(|(_, shinies)| *shinies)
        .map(|(user, _)| user);

    RoleHolders { top, shiny_best }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    fn always_succeeds() -> StepRng {
        // gen::<f64>() maps this to 0.0, below every catch rate.
        StepRng::new(0, 0)
    }

    fn always_fails() -> StepRng {
        // maps to ~1.0, above every catch rate.
        StepRng::new(u64::MAX, 0)
    }

    fn pikachu() -> Spawn {
        Spawn {
            name: "Pikachu",
            rarity: Rarity::Uncommon,
            shiny: false,
        }
    }

    #[test]
    fn catch_without_a_spawn_changes_nothing() {
        let mut game = GameState::default();
        let user = UserId::new(1);

        let outcome = game.attempt_catch(
            user,
            "Pikachu",
            &CatchRates::default(),
            &mut always_succeeds(),
        );

        assert_eq!(outcome, CatchOutcome::NoActiveSpawn);
        assert!(game.pokedex.is_empty());
        assert!(game.streaks.is_empty());
    }

    #[test]
    fn successful_catch_appends_and_bumps_streak() {
        let mut game = GameState::default();
        let user = UserId::new(1);
        game.publish_spawn(pikachu());

        // rate for uncommon is 0.5, the forced draw of 0.0 is below it.
        let outcome = game.attempt_catch(
            user,
            "pikachu",
            &CatchRates::default(),
            &mut always_succeeds(),
        );

        let CatchOutcome::Caught { entry, streak } = outcome else {
            panic!("expected a catch, got {outcome:?}");
        };
        assert_eq!(entry.name, "Pikachu");
        assert_eq!(entry.rarity, Rarity::Uncommon);
        assert_eq!(streak, 1);
        assert_eq!(game.pokedex[&user].len(), 1);
        assert!(game.active.is_none(), "spawn must be consumed");
    }

    #[test]
    fn wrong_guess_clears_spawn_and_keeps_streak() {
        let mut game = GameState::default();
        let user = UserId::new(1);
        game.streaks.insert(user, 4);
        game.publish_spawn(pikachu());

        let outcome = game.attempt_catch(
            user,
            "Bulbasaur",
            &CatchRates::default(),
            &mut always_succeeds(),
        );

        assert_eq!(outcome, CatchOutcome::Miss { name: "Pikachu" });
        assert!(game.active.is_none(), "a wrong guess consumes the spawn");
        assert_eq!(game.streaks[&user], 4);
        assert!(game.pokedex.is_empty());
    }

    #[test]
    fn failed_roll_resets_streak() {
        let mut game = GameState::default();
        let user = UserId::new(1);
        game.streaks.insert(user, 7);
        game.publish_spawn(pikachu());

        let outcome =
            game.attempt_catch(user, "PIKACHU", &CatchRates::default(), &mut always_fails());

        assert_eq!(outcome, CatchOutcome::Escaped { name: "Pikachu" });
        assert_eq!(game.streaks[&user], 0);
        assert!(game.active.is_none());
        assert!(game.pokedex.is_empty());
    }

    #[test]
    fn collection_only_ever_grows() {
        let mut game = GameState::default();
        let user = UserId::new(1);
        let mut last_len = 0;

        for attempt in 0..20 {
            game.publish_spawn(pikachu());
            let mut rng = if attempt % 2 == 0 {
                always_succeeds()
            } else {
                always_fails()
            };
            game.attempt_catch(user, "Pikachu", &CatchRates::default(), &mut rng);

            let len = game.pokedex.get(&user).map_or(0, Vec::len);
            assert!(len >= last_len);
            assert!(len <= last_len + 1);
            last_len = len;
        }
        assert_eq!(last_len, 10);
    }

    #[test]
    fn streak_counts_consecutive_catches() {
        let mut game = GameState::default();
        let user = UserId::new(1);
        let rates = CatchRates::default();

        for expected in 1..=3 {
            game.publish_spawn(pikachu());
            let outcome = game.attempt_catch(user, "Pikachu", &rates, &mut always_succeeds());
            assert!(matches!(outcome, CatchOutcome::Caught { streak, .. } if streak == expected));
        }

        game.publish_spawn(pikachu());
        game.attempt_catch(user, "Pikachu", &rates, &mut always_fails());
        assert_eq!(game.streaks[&user], 0);
    }

    #[test]
    fn publishing_replaces_the_previous_spawn() {
        let mut game = GameState::default();
        game.publish_spawn(pikachu());
        game.publish_spawn(Spawn {
            name: "Mew",
            rarity: Rarity::Legendary,
            shiny: false,
        });

        assert_eq!(game.active.unwrap().name, "Mew");
    }

    #[test]
    fn rolled_spawns_come_from_their_tier() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let spawn = Spawn::roll(&mut rng, 0.0);
            assert!(
                catalog::tier_members(spawn.rarity).contains(&spawn.name),
                "{} is not {}",
                spawn.name,
                spawn.rarity
            );
            assert!(!spawn.shiny, "shiny rate of zero rolled a shiny");
        }
    }

    #[test]
    fn shiny_rate_of_one_always_shines() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(Spawn::roll(&mut rng, 1.0).shiny);
        }
    }

    #[test]
    fn level_never_decreases() {
        let mut levels = Levels::default();
        let user = UserId::new(1);
        let mut last_level = 0;

        for _ in 0..100 {
            let (record, _) = levels.add_xp(user, 13);
            assert!(record.level >= last_level);
            last_level = record.level;
        }
        assert!(last_level > 0, "1300 xp should be well past level 1");
    }

    #[test]
    fn level_is_floor_sqrt_of_xp_over_divisor() {
        let mut levels = Levels::default();
        let user = UserId::new(1);

        // divisor defaults to 50: 50 xp -> level 1, 200 xp -> level 2.
        let (record, leveled_up) = levels.add_xp(user, 50);
        assert_eq!(record.level, 1);
        assert!(leveled_up);

        let (record, leveled_up) = levels.add_xp(user, 150);
        assert_eq!(record.level, 2);
        assert!(leveled_up);

        let (record, leveled_up) = levels.add_xp(user, 1);
        assert_eq!(record.level, 2);
        assert!(!leveled_up);
    }

    #[test]
    fn leaderboard_picks_largest_collection() {
        let mut pokedex: HashMap<UserId, Vec<CaughtCreature>> = HashMap::new();
        let common = |name: &str| CaughtCreature {
            name: name.to_owned(),
            rarity: Rarity::Common,
            shiny: false,
        };
        pokedex.insert(UserId::new(1), vec![common("Pidgey")]);
        pokedex.insert(
            UserId::new(2),
            vec![common("Rattata"), common("Zubat"), common("Ekans")],
        );

        let holders = leaderboard_roles(&pokedex);
        assert_eq!(holders.top, Some(UserId::new(2)));
        assert_eq!(holders.shiny_best, None, "nobody owns a shiny yet");
    }

    #[test]
    fn shiny_best_requires_at_least_one_shiny() {
        let mut pokedex: HashMap<UserId, Vec<CaughtCreature>> = HashMap::new();
        pokedex.insert(
            UserId::new(1),
            vec![
                CaughtCreature {
                    name: "Pidgey".to_owned(),
                    rarity: Rarity::Common,
                    shiny: false,
                },
                CaughtCreature {
                    name: "Magikarp".to_owned(),
                    rarity: Rarity::Common,
                    shiny: true,
                },
            ],
        );
        pokedex.insert(
            UserId::new(2),
            vec![
                CaughtCreature {
                    name: "Mew".to_owned(),
                    rarity: Rarity::Legendary,
                    shiny: false,
                },
                CaughtCreature {
                    name: "Ditto".to_owned(),
                    rarity: Rarity::Rare,
                    shiny: false,
                },
                CaughtCreature {
                    name: "Onix".to_owned(),
                    rarity: Rarity::Common,
                    shiny: false,
                },
            ],
        );

        let holders = leaderboard_roles(&pokedex);
        assert_eq!(holders.top, Some(UserId::new(2)));
        assert_eq!(holders.shiny_best, Some(UserId::new(1)));
    }

    #[test]
    fn empty_pokedex_has_no_role_holders() {
        let holders = leaderboard_roles(&HashMap::new());
        assert_eq!(holders.top, None);
        assert_eq!(holders.shiny_best, None);
    }
}
