//! Injectable random source for every stochastic decision of a turn.
//!
//! Critical hits, damage rolls, sleep/freeze checks, secondary effect
//! chances and speed ties all draw from a [`RandomSource`], so a turn is
//! fully reproducible given the same sequence of outcomes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub trait RandomSource {
    /// Uniform draw in `0..sides`. `reason` names the decision for tracing.
    fn roll(&mut self, reason: &str, sides: u32) -> u32;

    /// True with `percent`% probability. 100 or more never consumes a draw.
    fn chance(&mut self, reason: &str, percent: u8) -> bool {
        if percent >= 100 {
            return true;
        }
        self.roll(reason, 100) < u32::from(percent)
    }

    /// True on a 1-in-`n` draw.
    fn one_in(&mut self, reason: &str, n: u32) -> bool {
        self.roll(reason, n.max(1)) == 0
    }
}

/// Production random source backed by a seedable PRNG.
#[derive(Debug, Clone)]
pub struct TurnRng {
    rng: StdRng,
}

impl TurnRng {
    pub fn new_random() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Same seed, same battle.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for TurnRng {
    fn roll(&mut self, reason: &str, sides: u32) -> u32 {
        let outcome = self.rng.random_range(0..sides.max(1));
        tracing::trace!(reason, sides, outcome, "rng draw");
        outcome
    }
}

/// Replays a fixed list of outcomes, in order.
///
/// Each outcome is capped at `sides - 1`, so a large value always means
/// "the highest face": no critical hit, a full damage roll, no wake-up,
/// no thaw, side B on a speed tie.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    outcomes: VecDeque<u32>,
}

impl ScriptedRng {
    pub fn new_for_test(outcomes: Vec<u32>) -> Self {
        Self {
            outcomes: outcomes.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.len()
    }
}

impl RandomSource for ScriptedRng {
    fn roll(&mut self, reason: &str, sides: u32) -> u32 {
        let Some(outcome) = self.outcomes.pop_front() else {
            panic!(
                "ScriptedRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        };
        let outcome = outcome.min(sides.max(1) - 1);
        tracing::trace!(reason, sides, outcome, "scripted rng draw");
        outcome
    }
}
