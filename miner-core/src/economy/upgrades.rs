//! Permanent upgrade tracks, pickaxe levels and the advanced unlock.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{EconomyError, PlayerStats};
use crate::constants::UPGRADES_PER_LEVEL;

/// Upgrade track identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeId {
    Damage,
    Speed,
    Radar,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 3] = [UpgradeId::Damage, UpgradeId::Speed, UpgradeId::Radar];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Damage => "damage",
            Self::Speed => "speed",
            Self::Radar => "radar",
        }
    }

    pub fn def(&self) -> UpgradeDef {
        match self {
            Self::Damage => UpgradeDef {
                id: *self,
                title: "Pickaxe Damage",
                description: "Increase base damage per swing.",
                base_price: 50.0,
                growth: 1.65,
            },
            Self::Speed => UpgradeDef {
                id: *self,
                title: "Pickaxe Speed",
                description: "Swing faster (lower delay).",
                base_price: 60.0,
                growth: 1.7,
            },
            Self::Radar => UpgradeDef {
                id: *self,
                title: "Ore Radar",
                description: "Slightly increases rare ore chance.",
                base_price: 120.0,
                growth: 1.6,
            },
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Damage => 0,
            Self::Speed => 1,
            Self::Radar => 2,
        }
    }
}

impl fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpgradeId {
    type Err = EconomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "damage" => Ok(Self::Damage),
            "speed" => Ok(Self::Speed),
            "radar" => Ok(Self::Radar),
            other => Err(EconomyError::UnknownId {
                kind: "upgrade",
                id: other.to_string(),
            }),
        }
    }
}

/// Static upgrade definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub title: &'static str,
    pub description: &'static str,
    pub base_price: f64,
    pub growth: f64,
}

impl UpgradeDef {
    /// base * growth^count
    pub fn price(&self, purchase_count: u32) -> f64 {
        self.base_price * self.growth.powi(purchase_count as i32)
    }

    /// Recompute the stat this track drives from its purchase count
    pub fn apply(&self, stats: &mut PlayerStats, purchase_count: u32) {
        let n = f64::from(purchase_count);
        let level_bonus = f64::from(stats.pickaxe_level.saturating_sub(1));
        match self.id {
            UpgradeId::Damage => {
                stats.pickaxe_damage = (5.0 + n * 2.0 + level_bonus * 5.0).floor();
            }
            UpgradeId::Speed => {
                stats.pickaxe_speed = 1.0 + n * 0.08 + level_bonus * 0.1;
            }
            UpgradeId::Radar => {
                stats.rare_chance_bonus = n * 0.03;
            }
        }
    }
}

/// Per-track cap at a pickaxe level
pub fn cap_for_level(pickaxe_level: u32) -> u32 {
    UPGRADES_PER_LEVEL * pickaxe_level
}

/// Level-up price: 2000 * 2.25^(level - 1)
pub fn level_up_price(pickaxe_level: u32) -> f64 {
    LEVEL_UP_BASE_PRICE * LEVEL_UP_GROWTH.powi(pickaxe_level.saturating_sub(1) as i32)
}

pub const LEVEL_UP_BASE_PRICE: f64 = 2000.0;
pub const LEVEL_UP_GROWTH: f64 = 2.25;
pub const LEVEL_UP_DAMAGE_BUMP: f64 = 3.0;
pub const LEVEL_UP_SPEED_BUMP: f64 = 0.05;

/// One-time bundle unlocked by a full progress bar
pub const ADVANCED_PRICE: f64 = 15_000.0;
pub const ADVANCED_CRIT_BONUS: f64 = 0.02;
pub const ADVANCED_CRIT_CAP: f64 = 0.8;
pub const ADVANCED_CRIT_MULT_BONUS: f64 = 0.25;
pub const ADVANCED_DAMAGE_MULT: f64 = 1.05;
pub const ADVANCED_SPEED_BONUS: f64 = 0.05;

/// Apply the advanced stat bundle
pub fn apply_advanced(stats: &mut PlayerStats) {
    stats.crit_chance = (stats.crit_chance + ADVANCED_CRIT_BONUS).min(ADVANCED_CRIT_CAP);
    stats.crit_mult += ADVANCED_CRIT_MULT_BONUS;
    stats.pickaxe_damage = (stats.pickaxe_damage * ADVANCED_DAMAGE_MULT).floor();
    stats.pickaxe_speed += ADVANCED_SPEED_BONUS;
}

/// Purchase counts for every track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeTracks {
    counts: [u32; 3],
}

impl UpgradeTracks {
    pub fn count(&self, id: UpgradeId) -> u32 {
        self.counts[id.index()]
    }

    pub fn increment(&mut self, id: UpgradeId) -> u32 {
        let slot = &mut self.counts[id.index()];
        *slot += 1;
        *slot
    }

    pub fn price(&self, id: UpgradeId) -> f64 {
        id.def().price(self.count(id))
    }

    /// Every track has reached `cap`
    pub fn all_maxed(&self, cap: u32) -> bool {
        self.counts.iter().all(|&c| c >= cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        assert_eq!("radar".parse::<UpgradeId>().unwrap(), UpgradeId::Radar);
        let err = "luck".parse::<UpgradeId>().unwrap_err();
        assert!(matches!(err, EconomyError::UnknownId { kind: "upgrade", .. }));
    }

    #[test]
    fn test_prices() {
        let dmg = UpgradeId::Damage.def();
        assert!((dmg.price(0) - 50.0).abs() < 1e-9);
        assert!((dmg.price(1) - 82.5).abs() < 1e-9);
        let radar = UpgradeId::Radar.def();
        assert!((radar.price(2) - 307.2).abs() < 1e-9);
    }

    #[test]
    fn test_price_strictly_increasing() {
        for id in UpgradeId::ALL {
            let def = id.def();
            for n in 0..60 {
                assert!(def.price(n + 1) > def.price(n), "{id} price fell at {n}");
            }
        }
    }

    #[test]
    fn test_damage_formula_includes_level() {
        let mut stats = PlayerStats {
            pickaxe_level: 3,
            ..PlayerStats::default()
        };
        UpgradeId::Damage.def().apply(&mut stats, 4);
        // 5 + 8 + 10
        assert!((stats.pickaxe_damage - 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_and_radar_formulas() {
        let mut stats = PlayerStats::default();
        UpgradeId::Speed.def().apply(&mut stats, 2);
        assert!((stats.pickaxe_speed - 1.16).abs() < 1e-9);
        UpgradeId::Radar.def().apply(&mut stats, 3);
        assert!((stats.rare_chance_bonus - 0.09).abs() < 1e-9);
    }

    #[test]
    fn test_level_up_price() {
        assert!((level_up_price(1) - 2000.0).abs() < 1e-9);
        assert!((level_up_price(2) - 4500.0).abs() < 1e-9);
        assert!((level_up_price(3) - 10_125.0).abs() < 1e-9);
    }

    #[test]
    fn test_caps() {
        assert_eq!(cap_for_level(1), 5);
        assert_eq!(cap_for_level(4), 20);
    }

    #[test]
    fn test_tracks_all_maxed() {
        let mut tracks = UpgradeTracks::default();
        for _ in 0..5 {
            tracks.increment(UpgradeId::Damage);
            tracks.increment(UpgradeId::Speed);
        }
        assert!(!tracks.all_maxed(5));
        for _ in 0..5 {
            tracks.increment(UpgradeId::Radar);
        }
        assert!(tracks.all_maxed(5));
        assert!(!tracks.all_maxed(10));
    }

    #[test]
    fn test_advanced_bundle() {
        let mut stats = PlayerStats {
            pickaxe_damage: 41.0,
            crit_chance: 0.79,
            ..PlayerStats::default()
        };
        apply_advanced(&mut stats);
        assert!((stats.crit_chance - 0.8).abs() < 1e-12);
        assert!((stats.crit_mult - 2.25).abs() < 1e-12);
        // floor(43.05)
        assert!((stats.pickaxe_damage - 43.0).abs() < 1e-12);
        assert!((stats.pickaxe_speed - 1.05).abs() < 1e-12);
    }
}
