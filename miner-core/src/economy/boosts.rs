//! Timed boosts.
//!
//! Active boosts form an ordered list keyed by activation id. Sell value is
//! folded through the active sell multipliers in activation order; stat
//! boosts add to the base stat while active. Each activation expires on its
//! own, so reactivating a boost before expiry stacks a second instance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{EconomyError, PlayerStats};

/// Boost identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostId {
    DoubleDrops,
    #[serde(rename = "adren")]
    Adrenaline,
    Scanner,
}

impl BoostId {
    pub const ALL: [BoostId; 3] = [BoostId::DoubleDrops, BoostId::Adrenaline, BoostId::Scanner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DoubleDrops => "doubledrops",
            Self::Adrenaline => "adren",
            Self::Scanner => "scanner",
        }
    }

    pub fn def(&self) -> BoostDef {
        match self {
            Self::DoubleDrops => BoostDef {
                id: *self,
                title: "Double Sell (3 min)",
                description: "Temporarily doubles ore sell value.",
                price: 2500.0,
                duration_ms: 180_000,
                effect: BoostEffect::SellMultiplier(2.0),
            },
            Self::Adrenaline => BoostDef {
                id: *self,
                title: "Adrenaline (2 min)",
                description: "+50% swing speed temporarily.",
                price: 1800.0,
                duration_ms: 120_000,
                effect: BoostEffect::SpeedAdd(0.5),
            },
            Self::Scanner => BoostDef {
                id: *self,
                title: "Deep Scanner (5 min)",
                description: "+6% rare ore chance temporarily.",
                price: 2200.0,
                duration_ms: 300_000,
                effect: BoostEffect::RareChanceAdd(0.06),
            },
        }
    }
}

impl fmt::Display for BoostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoostId {
    type Err = EconomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doubledrops" => Ok(Self::DoubleDrops),
            "adren" => Ok(Self::Adrenaline),
            "scanner" => Ok(Self::Scanner),
            other => Err(EconomyError::UnknownId {
                kind: "boost",
                id: other.to_string(),
            }),
        }
    }
}

/// What a boost does while active
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoostEffect {
    /// Multiplies ore sell value
    SellMultiplier(f64),
    /// Added to pickaxe speed
    SpeedAdd(f64),
    /// Added to the rare-ore bonus
    RareChanceAdd(f64),
}

impl BoostEffect {
    /// Add this effect to a stat snapshot
    pub fn apply(&self, stats: &mut PlayerStats) {
        match *self {
            Self::SellMultiplier(_) => {}
            Self::SpeedAdd(v) => stats.pickaxe_speed += v,
            Self::RareChanceAdd(v) => stats.rare_chance_bonus += v,
        }
    }

    /// Pass a sell value through this effect
    pub fn modify_sell(&self, value: f64) -> f64 {
        match *self {
            Self::SellMultiplier(m) => value * m,
            _ => value,
        }
    }
}

/// Static boost definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostDef {
    pub id: BoostId,
    pub title: &'static str,
    pub description: &'static str,
    pub price: f64,
    pub duration_ms: u64,
    pub effect: BoostEffect,
}

/// One running activation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveBoost {
    pub activation_id: u64,
    pub boost: BoostId,
    pub effect: BoostEffect,
    pub activated_at_ms: u64,
    pub expires_at_ms: u64,
}

impl ActiveBoost {
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at_ms.saturating_sub(now_ms)
    }
}

/// Active boost list plus the clock that expires them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoostBook {
    active: Vec<ActiveBoost>,
    next_activation_id: u64,
    now_ms: u64,
}

impl BoostBook {
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn active(&self) -> &[ActiveBoost] {
        &self.active
    }

    pub fn active_count(&self, id: BoostId) -> usize {
        self.active.iter().filter(|b| b.boost == id).count()
    }

    /// Start a new activation; its expiry is scheduled at `now + duration`
    pub fn activate(&mut self, def: &BoostDef) -> ActiveBoost {
        self.next_activation_id += 1;
        let boost = ActiveBoost {
            activation_id: self.next_activation_id,
            boost: def.id,
            effect: def.effect,
            activated_at_ms: self.now_ms,
            expires_at_ms: self.now_ms + def.duration_ms.max(1),
        };
        self.active.push(boost);
        boost
    }

    /// Advance the clock and remove every activation whose deadline passed.
    ///
    /// Expired activations are returned in deadline order, ties in
    /// activation order.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<ActiveBoost> {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        let now = self.now_ms;
        let mut expired: Vec<ActiveBoost> = self
            .active
            .iter()
            .filter(|b| b.expires_at_ms <= now)
            .copied()
            .collect();
        self.active.retain(|b| b.expires_at_ms > now);
        expired.sort_by_key(|b| (b.expires_at_ms, b.activation_id));
        expired
    }

    /// Remove one activation by id
    pub fn revert(&mut self, activation_id: u64) -> Option<ActiveBoost> {
        let pos = self
            .active
            .iter()
            .position(|b| b.activation_id == activation_id)?;
        Some(self.active.remove(pos))
    }

    /// Base stats with every active stat boost added
    pub fn apply_to(&self, base: &PlayerStats) -> PlayerStats {
        let mut stats = base.clone();
        for boost in &self.active {
            boost.effect.apply(&mut stats);
        }
        stats
    }

    /// Fold a base sell value through active sell modifiers, in activation order
    pub fn sell_value(&self, base_value: f64) -> f64 {
        self.active
            .iter()
            .fold(base_value, |value, boost| boost.effect.modify_sell(value))
    }
}
