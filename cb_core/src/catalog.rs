use serde::{Deserialize, Serialize};
use std::fmt;

/// The four buckets that govern how often a creature spawns and how hard it is
/// to catch. Shiny is a cosmetic variant rolled independently of the tier.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Legendary,
    ];

    /// Relative weight used when picking the tier of a new spawn.
    #[must_use]
    pub fn spawn_weight(self) -> u32 {
        match self {
            Rarity::Common => 70,
            Rarity::Uncommon => 20,
            Rarity::Rare => 9,
            Rarity::Legendary => 1,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every creature in the game, in Pokédex order, each with exactly one tier.
pub const CATALOG: &[(&str, Rarity)] = &[
    ("Bulbasaur", Rarity::Rare),
    ("Ivysaur", Rarity::Rare),
    ("Venusaur", Rarity::Rare),
    ("Charmander", Rarity::Rare),
    ("Charmeleon", Rarity::Rare),
    ("Charizard", Rarity::Rare),
    ("Squirtle", Rarity::Rare),
    ("Wartortle", Rarity::Rare),
    ("Blastoise", Rarity::Rare),
    ("Caterpie", Rarity::Common),
    ("Metapod", Rarity::Common),
    ("Butterfree", Rarity::Common),
    ("Weedle", Rarity::Common),
    ("Kakuna", Rarity::Common),
    ("Beedrill", Rarity::Common),
    ("Pidgey", Rarity::Common),
    ("Pidgeotto", Rarity::Common),
    ("Pidgeot", Rarity::Common),
    ("Rattata", Rarity::Common),
    ("Raticate", Rarity::Common),
    ("Spearow", Rarity::Common),
    ("Fearow", Rarity::Common),
    ("Ekans", Rarity::Common),
    ("Arbok", Rarity::Common),
    ("Pikachu", Rarity::Uncommon),
    ("Raichu", Rarity::Rare),
    ("Sandshrew", Rarity::Common),
    ("Sandslash", Rarity::Common),
    ("Nidoran-F", Rarity::Common),
    ("Nidorina", Rarity::Common),
    ("Nidoqueen", Rarity::Common),
    ("Nidoran-M", Rarity::Common),
    ("Nidorino", Rarity::Common),
    ("Nidoking", Rarity::Common),
    ("Clefairy", Rarity::Common),
    ("Clefable", Rarity::Common),
    ("Vulpix", Rarity::Uncommon),
    ("Ninetales", Rarity::Uncommon),
    ("Jigglypuff", Rarity::Uncommon),
    ("Wigglytuff", Rarity::Uncommon),
    ("Zubat", Rarity::Common),
    ("Golbat", Rarity::Common),
    ("Oddish", Rarity::Common),
    ("Gloom", Rarity::Common),
    ("Vileplume", Rarity::Common),
    ("Paras", Rarity::Common),
    ("Parasect", Rarity::Common),
    ("Venonat", Rarity::Common),
    ("Venomoth", Rarity::Common),
    ("Diglett", Rarity::Common),
    ("Dugtrio", Rarity::Common),
    ("Meowth", Rarity::Common),
    ("Persian", Rarity::Common),
    ("Psyduck", Rarity::Common),
    ("Golduck", Rarity::Common),
    ("Mankey", Rarity::Common),
    ("Primeape", Rarity::Common),
    ("Growlithe", Rarity::Uncommon),
    ("Arcanine", Rarity::Uncommon),
    ("Poliwag", Rarity::Common),
    ("Poliwhirl", Rarity::Common),
    ("Poliwrath", Rarity::Common),
    ("Abra", Rarity::Uncommon),
    ("Kadabra", Rarity::Uncommon),
    ("Alakazam", Rarity::Rare),
    ("Machop", Rarity::Common),
    ("Machoke", Rarity::Common),
    ("Machamp", Rarity::Rare),
    ("Bellsprout", Rarity::Uncommon),
    ("Weepinbell", Rarity::Uncommon),
    ("Victreebel", Rarity::Uncommon),
    ("Tentacool", Rarity::Common),
    ("Tentacruel", Rarity::Uncommon),
    ("Geodude", Rarity::Common),
    ("Graveler", Rarity::Common),
    ("Golem", Rarity::Uncommon),
    ("Ponyta", Rarity::Common),
    ("Rapidash", Rarity::Uncommon),
    ("Slowpoke", Rarity::Common),
    ("Slowbro", Rarity::Uncommon),
    ("Magnemite", Rarity::Common),
    ("Magneton", Rarity::Uncommon),
    ("Farfetch'd", Rarity::Uncommon),
    ("Doduo", Rarity::Common),
    ("Dodrio", Rarity::Uncommon),
    ("Seel", Rarity::Common),
    ("Dewgong", Rarity::Uncommon),
    ("Grimer", Rarity::Common),
    ("Muk", Rarity::Uncommon),
    ("Shellder", Rarity::Common),
    ("Cloyster", Rarity::Uncommon),
    ("Gastly", Rarity::Common),
    ("Haunter", Rarity::Uncommon),
    ("Gengar", Rarity::Rare),
    ("Onix", Rarity::Common),
    ("Drowzee", Rarity::Common),
    ("Hypno", Rarity::Uncommon),
    ("Krabby", Rarity::Common),
    ("Kingler", Rarity::Uncommon),
    ("Voltorb", Rarity::Common),
    ("Electrode", Rarity::Uncommon),
    ("Exeggcute", Rarity::Common),
    ("Exeggutor", Rarity::Uncommon),
    ("Cubone", Rarity::Common),
    ("Marowak", Rarity::Uncommon),
    ("Hitmonlee", Rarity::Common),
    ("Hitmonchan", Rarity::Common),
    ("Lickitung", Rarity::Uncommon),
    ("Koffing", Rarity::Common),
    ("Weezing", Rarity::Uncommon),
    ("Rhyhorn", Rarity::Common),
    ("Rhydon", Rarity::Uncommon),
    ("Chansey", Rarity::Rare),
    ("Tangela", Rarity::Uncommon),
    ("Kangaskhan", Rarity::Uncommon),
    ("Horsea", Rarity::Common),
    ("Seadra", Rarity::Uncommon),
    ("Goldeen", Rarity::Common),
    ("Seaking", Rarity::Uncommon),
    ("Staryu", Rarity::Common),
    ("Starmie", Rarity::Uncommon),
    ("Mr. Mime", Rarity::Uncommon),
    ("Scyther", Rarity::Uncommon),
    ("Jynx", Rarity::Uncommon),
    ("Electabuzz", Rarity::Uncommon),
    ("Magmar", Rarity::Uncommon),
    ("Pinsir", Rarity::Uncommon),
    ("Tauros", Rarity::Uncommon),
    ("Magikarp", Rarity::Common),
    ("Gyarados", Rarity::Rare),
    ("Lapras", Rarity::Rare),
    ("Ditto", Rarity::Rare),
    ("Eevee", Rarity::Uncommon),
    ("Vaporeon", Rarity::Uncommon),
    ("Jolteon", Rarity::Uncommon),
    ("Flareon", Rarity::Uncommon),
    ("Porygon", Rarity::Uncommon),
    ("Omanyte", Rarity::Common),
    ("Omastar", Rarity::Rare),
    ("Kabuto", Rarity::Common),
    ("Kabutops", Rarity::Rare),
    ("Aerodactyl", Rarity::Rare),
    ("Snorlax", Rarity::Rare),
    ("Articuno", Rarity::Legendary),
    ("Zapdos", Rarity::Legendary),
    ("Moltres", Rarity::Legendary),
    ("Dratini", Rarity::Rare),
    ("Dragonair", Rarity::Rare),
    ("Dragonite", Rarity::Rare),
    ("Mewtwo", Rarity::Legendary),
    ("Mew", Rarity::Legendary),
];

/// All creatures belonging to one tier.
#[must_use]
pub fn tier_members(rarity: Rarity) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|(_, r)| *r == rarity)
        .map(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_is_a_partition() {
        let names: HashSet<&str> = CATALOG.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), CATALOG.len(), "duplicate catalog entries");
        assert_eq!(CATALOG.len(), 151);

        let per_tier: usize = Rarity::ALL.iter().map(|r| tier_members(*r).len()).sum();
        assert_eq!(per_tier, CATALOG.len());
    }

    #[test]
    fn every_tier_is_populated() {
        for rarity in Rarity::ALL {
            assert!(!tier_members(rarity).is_empty(), "{rarity} has no creatures");
        }
    }

    #[test]
    fn spawn_weights_are_positive() {
        let total: u32 = Rarity::ALL.iter().map(|r| r.spawn_weight()).sum();
        assert!(total > 0);
        for rarity in Rarity::ALL {
            assert!(rarity.spawn_weight() > 0, "{rarity} can never spawn");
        }
    }

    #[test]
    fn rarity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Rarity::Legendary).unwrap(),
            "\"legendary\""
        );
        let back: Rarity = serde_json::from_str("\"uncommon\"").unwrap();
        assert_eq!(back, Rarity::Uncommon);
    }
}
