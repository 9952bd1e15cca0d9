use crate::battle_data::{StatusCondition, Weather};
use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveCategory::Physical => write!(f, "Physical"),
            MoveCategory::Special => write!(f, "Special"),
            MoveCategory::Status => write!(f, "Status"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatType {
    Atk,
    Def,
    SpAtk,
    SpDef,
    Spe,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatType::Atk => write!(f, "Attack"),
            StatType::Def => write!(f, "Defense"),
            StatType::SpAtk => write!(f, "Special Attack"),
            StatType::SpDef => write!(f, "Special Defense"),
            StatType::Spe => write!(f, "Speed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    User,
    Target,
}

/// Secondary effect applied after a move resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    /// Give the target a major status, `chance` percent (100 never misses).
    Inflict { status: StatusCondition, chance: u8 },
    /// Replace the current weather and restart its duration.
    SetWeather(Weather),
    /// Shift the speed stage of the user or the target.
    SpeedStage { target: Target, stages: i8 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: u16,
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u16,
    /// Carried for display; this core never rolls accuracy.
    pub accuracy: Option<u8>,
    pub max_pp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub effect: Option<MoveEffect>,
}

impl MoveData {
    pub fn new(
        id: u16,
        name: &str,
        move_type: PokemonType,
        category: MoveCategory,
        power: u16,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            move_type,
            category,
            power,
            accuracy: Some(100),
            max_pp: 10,
            priority: 0,
            effect: None,
        }
    }

    pub fn with_pp(mut self, max_pp: u8) -> Self {
        self.max_pp = max_pp;
        self
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_accuracy(mut self, accuracy: Option<u8>) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_effect(mut self, effect: MoveEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status
    }
}
