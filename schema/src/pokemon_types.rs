use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
    Typeless,
}

impl PokemonType {
    /// Multiplier for one attacking type against one defending type.
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective, 0.0 = No Effect
    pub fn type_effectiveness(attacking: PokemonType, defending: PokemonType) -> f64 {
        use PokemonType::*;

        match (attacking, defending) {
            // Normal
            (Normal, Ghost) => 0.0,
            (Normal, Rock) | (Normal, Steel) => 0.5,

            // Fire
            (Fire, Grass) | (Fire, Ice) | (Fire, Bug) | (Fire, Steel) => 2.0,
            (Fire, Fire) | (Fire, Water) | (Fire, Rock) | (Fire, Dragon) => 0.5,

            // Water
            (Water, Fire) | (Water, Ground) | (Water, Rock) => 2.0,
            (Water, Water) | (Water, Grass) | (Water, Dragon) => 0.5,

            // Electric
            (Electric, Water) | (Electric, Flying) => 2.0,
            (Electric, Electric) | (Electric, Grass) | (Electric, Dragon) => 0.5,
            (Electric, Ground) => 0.0,

            // Grass
            (Grass, Water) | (Grass, Ground) | (Grass, Rock) => 2.0,
            (Grass, Fire)
            | (Grass, Grass)
            | (Grass, Poison)
            | (Grass, Flying)
            | (Grass, Bug)
            | (Grass, Dragon)
            | (Grass, Steel) => 0.5,

            // Ice
            (Ice, Grass) | (Ice, Ground) | (Ice, Flying) | (Ice, Dragon) => 2.0,
            (Ice, Fire) | (Ice, Water) | (Ice, Ice) | (Ice, Steel) => 0.5,

            // Fighting
            (Fighting, Normal) | (Fighting, Ice) | (Fighting, Rock) | (Fighting, Dark) | (Fighting, Steel) => 2.0,
            (Fighting, Poison) | (Fighting, Flying) | (Fighting, Psychic) | (Fighting, Bug) | (Fighting, Fairy) => 0.5,
            (Fighting, Ghost) => 0.0,

            // Poison
            (Poison, Grass) | (Poison, Fairy) => 2.0,
            (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) => 0.5,
            (Poison, Steel) => 0.0,

            // Ground
            (Ground, Fire) | (Ground, Electric) | (Ground, Poison) | (Ground, Rock) | (Ground, Steel) => 2.0,
            (Ground, Grass) | (Ground, Bug) => 0.5,
            (Ground, Flying) => 0.0,

            // Flying
            (Flying, Grass) | (Flying, Fighting) | (Flying, Bug) => 2.0,
            (Flying, Electric) | (Flying, Rock) | (Flying, Steel) => 0.5,

            // Psychic
            (Psychic, Fighting) | (Psychic, Poison) => 2.0,
            (Psychic, Psychic) | (Psychic, Steel) => 0.5,
            (Psychic, Dark) => 0.0,

            // Bug
            (Bug, Grass) | (Bug, Psychic) | (Bug, Dark) => 2.0,
            (Bug, Fire)
            | (Bug, Fighting)
            | (Bug, Poison)
            | (Bug, Flying)
            | (Bug, Ghost)
            | (Bug, Steel)
            | (Bug, Fairy) => 0.5,

            // Rock
            (Rock, Fire) | (Rock, Ice) | (Rock, Flying) | (Rock, Bug) => 2.0,
            (Rock, Fighting) | (Rock, Ground) | (Rock, Steel) => 0.5,

            // Ghost
            (Ghost, Psychic) | (Ghost, Ghost) => 2.0,
            (Ghost, Dark) => 0.5,
            (Ghost, Normal) => 0.0,

            // Dragon
            (Dragon, Dragon) => 2.0,
            (Dragon, Steel) => 0.5,
            (Dragon, Fairy) => 0.0,

            // Dark
            (Dark, Psychic) | (Dark, Ghost) => 2.0,
            (Dark, Fighting) | (Dark, Dark) | (Dark, Fairy) => 0.5,

            // Steel
            (Steel, Ice) | (Steel, Rock) | (Steel, Fairy) => 2.0,
            (Steel, Fire) | (Steel, Water) | (Steel, Electric) | (Steel, Steel) => 0.5,

            // Fairy
            (Fairy, Fighting) | (Fairy, Dragon) | (Fairy, Dark) => 2.0,
            (Fairy, Fire) | (Fairy, Poison) | (Fairy, Steel) => 0.5,

            // Everything else, including Typeless on either side
            _ => 1.0,
        }
    }

    pub fn is_immune(attacking: PokemonType, defending: PokemonType) -> bool {
        Self::type_effectiveness(attacking, defending) == 0.0
    }
}

/// Combined multiplier of an attacking type against every type of the defender.
pub fn effectiveness(attacking: PokemonType, defending: &[PokemonType]) -> f64 {
    defending
        .iter()
        .map(|defending_type| PokemonType::type_effectiveness(attacking, *defending_type))
        .product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_single_type_lookups() {
        assert_eq!(PokemonType::type_effectiveness(PokemonType::Water, PokemonType::Fire), 2.0);
        assert_eq!(PokemonType::type_effectiveness(PokemonType::Fire, PokemonType::Water), 0.5);
        assert_eq!(PokemonType::type_effectiveness(PokemonType::Normal, PokemonType::Ghost), 0.0);
        assert_eq!(PokemonType::type_effectiveness(PokemonType::Normal, PokemonType::Normal), 1.0);
    }

    #[test]
    fn test_dual_types_multiply() {
        // Ground vs Fire/Flying: 2.0 * 0.0
        assert_eq!(effectiveness(PokemonType::Ground, &[PokemonType::Fire, PokemonType::Flying]), 0.0);
        // Ice vs Grass/Flying: 2.0 * 2.0
        assert_eq!(effectiveness(PokemonType::Ice, &[PokemonType::Grass, PokemonType::Flying]), 4.0);
        // Fire vs Water/Rock: 0.5 * 0.5
        assert_eq!(effectiveness(PokemonType::Fire, &[PokemonType::Water, PokemonType::Rock]), 0.25);
    }

    #[test]
    fn test_typeless_is_always_neutral() {
        for other in PokemonType::iter() {
            assert_eq!(PokemonType::type_effectiveness(PokemonType::Typeless, other), 1.0);
            assert_eq!(PokemonType::type_effectiveness(other, PokemonType::Typeless), 1.0);
        }
    }

    #[test]
    fn test_every_pair_is_a_known_multiplier() {
        for attacking in PokemonType::iter() {
            for defending in PokemonType::iter() {
                let multiplier = PokemonType::type_effectiveness(attacking, defending);
                assert!(
                    [0.0, 0.5, 1.0, 2.0].contains(&multiplier),
                    "{} vs {} produced {}",
                    attacking,
                    defending,
                    multiplier
                );
            }
        }
    }

    #[test]
    fn test_immunities() {
        assert!(PokemonType::is_immune(PokemonType::Electric, PokemonType::Ground));
        assert!(PokemonType::is_immune(PokemonType::Dragon, PokemonType::Fairy));
        assert!(!PokemonType::is_immune(PokemonType::Fire, PokemonType::Grass));
    }
}
