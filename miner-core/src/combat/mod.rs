//! Swing resolution: crit rolls, barrier gating and health pools.
//!
//! Everything here reads player stats by shared reference. Rewards are
//! computed but never credited; crediting belongs to the economy.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::economy::PlayerStats;
use crate::generation::{BarrierRequirement, Cell};

/// Damage from a single swing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwingDamage {
    pub amount: i64,
    pub crit: bool,
}

/// Result of applying damage to one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitResult {
    /// Barrier requirements unmet; the cell is untouched
    Rejected,
    Survived { remaining: i64 },
    Broke,
}

/// Roll one swing with an explicit uniform sample in `[0, 1)`
pub fn resolve_swing_with_roll(stats: &PlayerStats, roll: f64) -> SwingDamage {
    let crit = roll < stats.crit_chance;
    let raw = if crit {
        stats.pickaxe_damage * stats.crit_mult
    } else {
        stats.pickaxe_damage
    };
    SwingDamage {
        amount: raw.floor() as i64,
        crit,
    }
}

/// Roll one swing from the caller's random source
pub fn resolve_swing<R: Rng + ?Sized>(stats: &PlayerStats, rng: &mut R) -> SwingDamage {
    resolve_swing_with_roll(stats, rng.gen::<f64>())
}

/// Whether the pickaxe meets a barrier's damage and level requirement
pub fn meets_requirement(stats: &PlayerStats, req: &BarrierRequirement) -> bool {
    stats.pickaxe_damage >= f64::from(req.req_damage) && stats.pickaxe_level >= req.req_level
}

/// Subtract damage from the cell's health pool
pub fn apply_damage(cell: &mut Cell, dealt: i64) -> HitResult {
    cell.health -= dealt;
    if cell.health <= 0 {
        HitResult::Broke
    } else {
        HitResult::Survived {
            remaining: cell.health,
        }
    }
}

/// Gate check, roll and damage for one swing at `cell`.
///
/// Barriers whose requirement is unmet reject the swing before any roll.
pub fn strike<R: Rng + ?Sized>(
    cell: &mut Cell,
    stats: &PlayerStats,
    rng: &mut R,
) -> (Option<SwingDamage>, HitResult) {
    strike_with(cell, stats, || rng.gen::<f64>())
}

/// Same as [`strike`] with the crit roll supplied by `roll`, called only
/// when the swing passes the barrier gate
pub fn strike_with<F: FnOnce() -> f64>(
    cell: &mut Cell,
    stats: &PlayerStats,
    roll: F,
) -> (Option<SwingDamage>, HitResult) {
    if let Some(req) = cell.barrier_requirement() {
        if !meets_requirement(stats, &req) {
            return (None, HitResult::Rejected);
        }
    }
    let damage = resolve_swing_with_roll(stats, roll());
    let result = apply_damage(cell, damage.amount);
    (Some(damage), result)
}

/// Unmodified sell value of a material broken at `row`
pub fn material_reward(base_value: f64, row: u32) -> f64 {
    base_value * (1.0 + f64::from(row) / SELL_DEPTH_DIVISOR)
}

/// Lump-sum reward for breaking a barrier at `row`
pub fn barrier_reward(row: u32) -> f64 {
    BARRIER_REWARD_BASE + f64::from(row) * BARRIER_REWARD_PER_ROW
}

/// Delay between held-down swings for a given speed
pub fn swing_interval_ms(pickaxe_speed: f64) -> f64 {
    if pickaxe_speed <= 0.0 {
        return SWING_BASE_INTERVAL_MS;
    }
    (SWING_BASE_INTERVAL_MS / pickaxe_speed).max(SWING_MIN_INTERVAL_MS)
}
