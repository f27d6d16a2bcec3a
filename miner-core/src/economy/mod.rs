//! Currency, permanent upgrades, pickaxe levels and timed boosts.
//!
//! `Economy` owns the only mutable copy of the player's stats. Every purchase
//! goes through [`Economy::spend`]; a failed purchase never mutates state.
//! Readers get an effective snapshot with active boosts applied.

pub mod boosts;
pub mod upgrades;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::constants::*;
use boosts::{ActiveBoost, BoostBook, BoostId};
use upgrades::{UpgradeId, UpgradeTracks};

/// Player stats record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub currency: f64,
    pub pickaxe_level: u32,
    pub pickaxe_damage: f64,
    /// Swing frequency multiplier; higher = faster
    pub pickaxe_speed: f64,
    pub crit_chance: f64,
    pub crit_mult: f64,
    pub rare_chance_bonus: f64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            currency: 0.0,
            pickaxe_level: START_PICKAXE_LEVEL,
            pickaxe_damage: START_PICKAXE_DAMAGE,
            pickaxe_speed: START_PICKAXE_SPEED,
            crit_chance: START_CRIT_CHANCE,
            crit_mult: START_CRIT_MULT,
            rare_chance_bonus: 0.0,
        }
    }
}

/// Recoverable purchase failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EconomyError {
    #[error("Insufficient funds: have {have:.2}, need {need:.2}")]
    InsufficientFunds { have: f64, need: f64 },
    #[error("Upgrade {upgrade} is at its cap of {cap} for this pickaxe level")]
    CapReached { upgrade: UpgradeId, cap: u32 },
    #[error("Pickaxe level-up requires every upgrade at cap {cap}")]
    LevelUpLocked { cap: u32 },
    #[error("Advanced upgrade locked: progress {progress}/{required}")]
    AdvancedLocked { progress: u32, required: u32 },
    #[error("Advanced upgrade already purchased")]
    AlreadyUnlocked,
    #[error("Unknown {kind} id: {id}")]
    UnknownId { kind: &'static str, id: String },
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),
    #[error("Skin {0} is already owned")]
    SkinAlreadyOwned(String),
    #[error("Skin {0} is not owned")]
    SkinNotOwned(String),
}

/// Player economy state machine
#[derive(Debug, Clone, Default)]
pub struct Economy {
    base: PlayerStats,
    tracks: UpgradeTracks,
    total_upgrade_purchases: u32,
    advanced_unlocked: bool,
    boosts: BoostBook,
    blocks_mined: u64,
}

impl Economy {
    pub fn new(base: PlayerStats) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Stats without boosts
    pub fn base_stats(&self) -> &PlayerStats {
        &self.base
    }

    /// Stats with every active boost applied
    pub fn stats(&self) -> PlayerStats {
        self.boosts.apply_to(&self.base)
    }

    pub fn currency(&self) -> f64 {
        self.base.currency
    }

    pub fn tracks(&self) -> &UpgradeTracks {
        &self.tracks
    }

    pub fn boosts(&self) -> &BoostBook {
        &self.boosts
    }

    pub fn total_upgrade_purchases(&self) -> u32 {
        self.total_upgrade_purchases
    }

    pub fn advanced_unlocked(&self) -> bool {
        self.advanced_unlocked
    }

    /// The advanced card is offered once progress is full and it is unbought
    pub fn advanced_available(&self) -> bool {
        self.total_upgrade_purchases >= PROGRESS_SEGMENTS && !self.advanced_unlocked
    }

    pub fn blocks_mined(&self) -> u64 {
        self.blocks_mined
    }

    /// Per-track cap at the current pickaxe level
    pub fn upgrade_cap(&self) -> u32 {
        upgrades::cap_for_level(self.base.pickaxe_level)
    }

    pub fn upgrade_price(&self, id: UpgradeId) -> f64 {
        self.tracks.price(id)
    }

    pub fn level_up_price(&self) -> f64 {
        upgrades::level_up_price(self.base.pickaxe_level)
    }

    pub fn can_level_up(&self) -> bool {
        self.tracks.all_maxed(self.upgrade_cap())
    }

    /// Single gate for every purchase: deduct if affordable, else leave untouched
    ///
    /// Negative, NaN and infinite amounts are refused.
    pub fn spend(&mut self, amount: f64) -> bool {
        if !is_valid_amount(amount) || self.base.currency < amount {
            return false;
        }
        self.base.currency -= amount;
        true
    }

    pub(crate) fn try_spend(&mut self, amount: f64) -> Result<(), EconomyError> {
        if !is_valid_amount(amount) {
            return Err(EconomyError::InvalidAmount(amount));
        }
        if self.spend(amount) {
            Ok(())
        } else {
            Err(EconomyError::InsufficientFunds {
                have: self.base.currency,
                need: amount,
            })
        }
    }

    pub fn credit(&mut self, amount: f64) {
        self.base.currency += amount;
    }

    /// Sell value of a material after active sell modifiers
    pub fn sell_value(&self, base_value: f64) -> f64 {
        self.boosts.sell_value(base_value)
    }

    /// Credit a broken material block; returns the amount credited
    pub fn credit_material(&mut self, unmodified_value: f64) -> f64 {
        let value = self.sell_value(unmodified_value);
        self.credit(value);
        self.blocks_mined += 1;
        value
    }

    /// Credit a broken barrier; barrier rewards skip sell modifiers
    pub fn credit_barrier(&mut self, bonus: f64) -> f64 {
        self.credit(bonus);
        self.base.crit_chance = (self.base.crit_chance + BARRIER_CRIT_BONUS).min(BARRIER_CRIT_CAP);
        self.blocks_mined += 1;
        info!(
            bonus,
            crit_chance = self.base.crit_chance,
            "barrier broken"
        );
        bonus
    }

    /// Buy one level of an upgrade track
    pub fn buy_upgrade(&mut self, id: UpgradeId) -> Result<PlayerStats, EconomyError> {
        let cap = self.upgrade_cap();
        if self.tracks.count(id) >= cap {
            return Err(EconomyError::CapReached { upgrade: id, cap });
        }
        let price = self.tracks.price(id);
        self.try_spend(price)?;

        let count = self.tracks.increment(id);
        id.def().apply(&mut self.base, count);
        self.total_upgrade_purchases = (self.total_upgrade_purchases + 1).min(PROGRESS_SEGMENTS);
        info!(
            upgrade = %id,
            count,
            cap,
            price,
            progress = self.total_upgrade_purchases,
            "upgrade purchased"
        );
        Ok(self.stats())
    }

    /// Raise the pickaxe level once every track is at cap
    pub fn level_up(&mut self) -> Result<PlayerStats, EconomyError> {
        let cap = self.upgrade_cap();
        if !self.tracks.all_maxed(cap) {
            return Err(EconomyError::LevelUpLocked { cap });
        }
        let price = self.level_up_price();
        self.try_spend(price)?;

        self.base.pickaxe_level += 1;
        self.base.pickaxe_damage += upgrades::LEVEL_UP_DAMAGE_BUMP;
        self.base.pickaxe_speed += upgrades::LEVEL_UP_SPEED_BUMP;
        info!(level = self.base.pickaxe_level, price, "pickaxe level up");
        Ok(self.stats())
    }

    /// One-time advanced bundle, gated on a full progress bar
    pub fn buy_advanced(&mut self) -> Result<PlayerStats, EconomyError> {
        if self.advanced_unlocked {
            return Err(EconomyError::AlreadyUnlocked);
        }
        if self.total_upgrade_purchases < PROGRESS_SEGMENTS {
            return Err(EconomyError::AdvancedLocked {
                progress: self.total_upgrade_purchases,
                required: PROGRESS_SEGMENTS,
            });
        }
        self.try_spend(upgrades::ADVANCED_PRICE)?;

        self.advanced_unlocked = true;
        upgrades::apply_advanced(&mut self.base);
        info!("advanced upgrade purchased");
        Ok(self.stats())
    }

    /// Buy and start a boost
    pub fn activate_boost(&mut self, id: BoostId) -> Result<PlayerStats, EconomyError> {
        let def = id.def();
        self.try_spend(def.price)?;
        let active = self.boosts.activate(&def);
        info!(
            boost = %id,
            activation_id = active.activation_id,
            expires_at_ms = active.expires_at_ms,
            "boost active"
        );
        Ok(self.stats())
    }

    /// Advance the economy clock, expiring finished boosts
    pub fn advance_clock(&mut self, delta_ms: u64) -> Vec<ActiveBoost> {
        let expired = self.boosts.advance(delta_ms);
        for boost in &expired {
            info!(
                boost = %boost.boost,
                activation_id = boost.activation_id,
                "boost ended"
            );
        }
        if !expired.is_empty() {
            debug!(remaining = self.boosts.active().len(), "boosts expired");
        }
        expired
    }
}

fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0
}

/// Format currency for display: £ + floor with thousands separators
pub fn format_currency(amount: f64) -> String {
    let whole = amount.max(0.0).floor() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    out.push('£');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich() -> Economy {
        Economy::new(PlayerStats {
            currency: 1_000_000_000.0,
            ..PlayerStats::default()
        })
    }

    #[test]
    fn test_spend_gate() {
        let mut eco = Economy::new(PlayerStats {
            currency: 100.0,
            ..PlayerStats::default()
        });
        assert!(!eco.spend(100.5));
        assert!((eco.currency() - 100.0).abs() < 1e-12);
        assert!(eco.spend(100.0));
        assert!(eco.currency().abs() < 1e-12);
    }

    #[test]
    fn test_spend_refuses_negative_and_nan() {
        let mut eco = Economy::new(PlayerStats {
            currency: 100.0,
            ..PlayerStats::default()
        });
        assert!(!eco.spend(-50.0));
        assert!(!eco.spend(f64::NAN));
        assert!(!eco.spend(f64::INFINITY));
        assert!((eco.currency() - 100.0).abs() < 1e-12);
        assert_eq!(
            eco.try_spend(-1.0).unwrap_err(),
            EconomyError::InvalidAmount(-1.0)
        );
        assert!(eco.spend(0.0));
        assert!((eco.currency() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_upgrade_insufficient_funds_no_mutation() {
        let mut eco = Economy::default();
        let err = eco.buy_upgrade(UpgradeId::Damage).unwrap_err();
        assert!(matches!(err, EconomyError::InsufficientFunds { need, .. } if (need - 50.0).abs() < 1e-9));
        assert_eq!(eco.tracks().count(UpgradeId::Damage), 0);
        assert_eq!(eco.total_upgrade_purchases(), 0);
    }

    #[test]
    fn test_upgrade_applies_stat() {
        let mut eco = Economy::new(PlayerStats {
            currency: 50.0,
            ..PlayerStats::default()
        });
        let stats = eco.buy_upgrade(UpgradeId::Damage).unwrap();
        assert!((stats.pickaxe_damage - 7.0).abs() < 1e-12);
        assert!(eco.currency().abs() < 1e-12);
        assert_eq!(eco.total_upgrade_purchases(), 1);
    }

    #[test]
    fn test_cap_reached_regardless_of_currency() {
        let mut eco = rich();
        for _ in 0..5 {
            eco.buy_upgrade(UpgradeId::Speed).unwrap();
        }
        let before = eco.currency();
        let err = eco.buy_upgrade(UpgradeId::Speed).unwrap_err();
        assert_eq!(
            err,
            EconomyError::CapReached {
                upgrade: UpgradeId::Speed,
                cap: 5
            }
        );
        assert_eq!(eco.currency(), before);
    }

    #[test]
    fn test_level_up_locked_until_all_maxed() {
        let mut eco = rich();
        assert_eq!(eco.level_up().unwrap_err(), EconomyError::LevelUpLocked { cap: 5 });
        for id in UpgradeId::ALL {
            for _ in 0..5 {
                eco.buy_upgrade(id).unwrap();
            }
        }
        let before = eco.currency();
        let stats = eco.level_up().unwrap();
        assert_eq!(stats.pickaxe_level, 2);
        assert!((before - eco.currency() - 2000.0).abs() < 1e-6);
        // 5 + 10 + 0 from the last damage upgrade, then +3
        assert!((stats.pickaxe_damage - 18.0).abs() < 1e-12);
        assert_eq!(eco.upgrade_cap(), 10);
        assert!(eco.buy_upgrade(UpgradeId::Damage).is_ok());
    }

    #[test]
    fn test_progress_clamped_and_advanced_once() {
        let mut eco = rich();
        for id in UpgradeId::ALL {
            for _ in 0..5 {
                eco.buy_upgrade(id).unwrap();
            }
        }
        eco.level_up().unwrap();
        eco.buy_upgrade(UpgradeId::Radar).unwrap();
        assert_eq!(eco.total_upgrade_purchases(), 15);
        assert!(eco.advanced_available());

        let before = eco.currency();
        eco.buy_advanced().unwrap();
        assert!((before - eco.currency() - 15_000.0).abs() < 1e-6);
        assert!(!eco.advanced_available());

        let after = eco.currency();
        assert_eq!(eco.buy_advanced().unwrap_err(), EconomyError::AlreadyUnlocked);
        assert_eq!(eco.currency(), after);
    }

    #[test]
    fn test_advanced_locked_before_full_progress() {
        let mut eco = rich();
        eco.buy_upgrade(UpgradeId::Damage).unwrap();
        assert_eq!(
            eco.buy_advanced().unwrap_err(),
            EconomyError::AdvancedLocked {
                progress: 1,
                required: 15
            }
        );
    }

    #[test]
    fn test_boost_applies_and_expires() {
        let mut eco = rich();
        let stats = eco.activate_boost(BoostId::Scanner).unwrap();
        assert!((stats.rare_chance_bonus - 0.06).abs() < 1e-12);
        assert!(eco.base_stats().rare_chance_bonus.abs() < 1e-12);
        let expired = eco.advance_clock(300_000);
        assert_eq!(expired.len(), 1);
        assert!(eco.stats().rare_chance_bonus.abs() < 1e-12);
    }

    #[test]
    fn test_upgrade_during_boost_keeps_boost() {
        let mut eco = rich();
        eco.activate_boost(BoostId::Adrenaline).unwrap();
        let stats = eco.buy_upgrade(UpgradeId::Speed).unwrap();
        assert!((stats.pickaxe_speed - 1.58).abs() < 1e-12);
        eco.advance_clock(120_000);
        assert!((eco.stats().pickaxe_speed - 1.08).abs() < 1e-12);
    }

    #[test]
    fn test_sell_boost_and_barrier_channel() {
        let mut eco = Economy::default();
        eco.credit(2500.0);
        eco.activate_boost(BoostId::DoubleDrops).unwrap();
        assert!((eco.credit_material(10.0) - 20.0).abs() < 1e-12);
        // Barrier rewards are not doubled
        assert!((eco.credit_barrier(360.0) - 360.0).abs() < 1e-12);
        assert!((eco.currency() - 380.0).abs() < 1e-9);
        assert!((eco.base_stats().crit_chance - 0.055).abs() < 1e-12);
        assert_eq!(eco.blocks_mined(), 2);
    }

    #[test]
    fn test_barrier_crit_capped() {
        let mut eco = Economy::new(PlayerStats {
            crit_chance: 0.498,
            ..PlayerStats::default()
        });
        eco.credit_barrier(200.0);
        assert!((eco.base_stats().crit_chance - 0.5).abs() < 1e-12);
        eco.credit_barrier(200.0);
        assert!((eco.base_stats().crit_chance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "£0");
        assert_eq!(format_currency(999.99), "£999");
        assert_eq!(format_currency(1234.5), "£1,234");
        assert_eq!(format_currency(15_000_000.0), "£15,000,000");
        assert_eq!(format_currency(-3.0), "£0");
    }
}
