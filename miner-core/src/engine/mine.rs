use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::combat::{self, HitResult};
use crate::constants::PROGRESS_SEGMENTS;
use crate::cosmetics::Wardrobe;
use crate::economy::boosts::BoostId;
use crate::economy::upgrades::{self, UpgradeId};
use crate::economy::{format_currency, Economy, EconomyError, PlayerStats};
use crate::engine::config::{ConfigError, MineConfig};
use crate::engine::messages::{
    ActiveBoostMsg, BoostExpiredMsg, BoostListingMsg, CellMsg, LevelUpListingMsg,
    SkinListingMsg, StatsSnapshotMsg, SwingOutcomeMsg, UpgradeListingMsg, UpgradeShopMsg,
};
use crate::generation::{Cell, CellGenerator, CellKind};
use crate::logging::TimingSpan;
use crate::world::{Viewport, WorldWindow};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MineError {
    #[error("No cell at row {row}, col {col}")]
    NoCell { row: u32, col: u32 },
    #[error(transparent)]
    Economy(#[from] EconomyError),
}

/// The mining engine: owns the world window, the economy and the wardrobe.
/// Every page action goes through here.
pub struct MineEngine {
    config: MineConfig,
    generator: CellGenerator,
    window: WorldWindow,
    economy: Economy,
    wardrobe: Wardrobe,
    depth: u32,
}

impl MineEngine {
    pub fn new(config: MineConfig) -> Result<Self, ConfigError> {
        Self::with_stats(config, PlayerStats::default())
    }

    /// Start from a given stat record instead of the fresh-player defaults
    pub fn with_stats(config: MineConfig, stats: PlayerStats) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            generator: config.cell_generator(),
            window: WorldWindow::new(config.grid),
            economy: Economy::new(stats),
            wardrobe: Wardrobe::default(),
            depth: 0,
            config,
        })
    }

    pub fn config(&self) -> &MineConfig {
        &self.config
    }

    pub fn generator(&self) -> &CellGenerator {
        &self.generator
    }

    pub fn window(&self) -> &WorldWindow {
        &self.window
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn wardrobe(&self) -> &Wardrobe {
        &self.wardrobe
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Effective stats, boosts included
    pub fn stats(&self) -> PlayerStats {
        self.economy.stats()
    }

    // =====================================================
    // World
    // =====================================================

    /// Realize every missing row around the viewport; returns the new rows
    pub fn sync_viewport(&mut self, scroll_px: f64, height_px: f64) -> Vec<u32> {
        let _span = TimingSpan::new("sync_viewport");
        let viewport = Viewport {
            scroll_px,
            height_px,
        };
        self.depth = self.window.geometry().depth_at(scroll_px);
        let bonus = self.economy.stats().rare_chance_bonus;
        self.window.sync(viewport, &self.generator, bonus)
    }

    /// Realize one row; `false` when it already existed
    pub fn generate_row(&mut self, row: u32) -> bool {
        let bonus = self.economy.stats().rare_chance_bonus;
        self.window.ensure_row(row, &self.generator, bonus)
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<CellMsg> {
        self.window.cell(row, col).map(|cell| self.cell_msg(cell))
    }

    pub fn cells_in_row(&self, row: u32) -> Vec<CellMsg> {
        self.window
            .cells_in_row(row)
            .into_iter()
            .map(|cell| self.cell_msg(cell))
            .collect()
    }

    fn cell_msg(&self, cell: &Cell) -> CellMsg {
        match self.generator.material_of(cell) {
            Some(def) => CellMsg::material(cell, &def.id, &def.color),
            None => CellMsg::barrier(cell),
        }
    }

    // =====================================================
    // Mining
    // =====================================================

    /// One swing at a live cell, crit rolled from `rng`
    pub fn swing<R: Rng + ?Sized>(
        &mut self,
        row: u32,
        col: u32,
        rng: &mut R,
    ) -> Result<SwingOutcomeMsg, MineError> {
        self.swing_with(row, col, || rng.gen::<f64>())
    }

    /// One swing with a fixed crit roll in `[0, 1)`
    pub fn swing_with_roll(
        &mut self,
        row: u32,
        col: u32,
        roll: f64,
    ) -> Result<SwingOutcomeMsg, MineError> {
        self.swing_with(row, col, || roll)
    }

    fn swing_with<F: FnOnce() -> f64>(
        &mut self,
        row: u32,
        col: u32,
        roll: F,
    ) -> Result<SwingOutcomeMsg, MineError> {
        let stats = self.economy.stats();
        let cell = self
            .window
            .cell_mut(row, col)
            .ok_or(MineError::NoCell { row, col })?;
        let (damage, hit) = combat::strike_with(cell, &stats, roll);
        let kind = cell.kind.clone();
        let remaining_health = cell.display_health();

        let mut outcome = SwingOutcomeMsg {
            row,
            col,
            damage_dealt: damage.map_or(0, |d| d.amount),
            crit: damage.is_some_and(|d| d.crit),
            rejected: hit == HitResult::Rejected,
            broke: hit == HitResult::Broke,
            remaining_health,
            reward: None,
        };

        match hit {
            HitResult::Rejected => {
                debug!(row, col, "swing rejected by barrier");
            }
            HitResult::Survived { remaining } => {
                debug!(row, col, dealt = outcome.damage_dealt, remaining, "swing");
            }
            HitResult::Broke => {
                self.window.remove(row, col);
                let reward = match kind {
                    CellKind::Material { material_index } => {
                        let base = match self.generator.table.get(material_index) {
                            Some(def) => def.base_value,
                            None => {
                                warn!(material_index, "broken cell has no catalog entry");
                                0.0
                            }
                        };
                        self.economy
                            .credit_material(combat::material_reward(base, row))
                    }
                    CellKind::Barrier(_) => {
                        self.economy.credit_barrier(combat::barrier_reward(row))
                    }
                };
                debug!(row, col, reward, "cell broken");
                outcome.reward = Some(reward);
            }
        }
        Ok(outcome)
    }

    // =====================================================
    // Clock
    // =====================================================

    /// Advance the engine clock; returns boosts that ran out, in deadline order
    pub fn tick(&mut self, delta_ms: u64) -> Vec<BoostExpiredMsg> {
        self.economy
            .advance_clock(delta_ms)
            .iter()
            .map(BoostExpiredMsg::from)
            .collect()
    }

    pub fn now_ms(&self) -> u64 {
        self.economy.boosts().now_ms()
    }

    // =====================================================
    // Shop
    // =====================================================

    pub fn list_upgrades(&self) -> UpgradeShopMsg {
        let cap = self.economy.upgrade_cap();
        let currency = self.economy.currency();
        let upgrades = UpgradeId::ALL
            .iter()
            .map(|&id| {
                let def = id.def();
                let count = self.economy.tracks().count(id);
                let price = self.economy.upgrade_price(id);
                UpgradeListingMsg {
                    id: id.as_str().to_string(),
                    title: def.title.to_string(),
                    description: def.description.to_string(),
                    price,
                    count,
                    cap,
                    maxed: count >= cap,
                    affordable: currency >= price,
                }
            })
            .collect();
        let level_up_price = self.economy.level_up_price();
        UpgradeShopMsg {
            upgrades,
            level_up: LevelUpListingMsg {
                next_level: self.economy.base_stats().pickaxe_level + 1,
                price: level_up_price,
                unlocked: self.economy.can_level_up(),
                affordable: currency >= level_up_price,
            },
            advanced_available: self.economy.advanced_available(),
            advanced_price: upgrades::ADVANCED_PRICE,
        }
    }

    pub fn buy_upgrade(&mut self, id: UpgradeId) -> Result<StatsSnapshotMsg, EconomyError> {
        self.economy.buy_upgrade(id)?;
        Ok(self.snapshot())
    }

    pub fn level_up(&mut self) -> Result<StatsSnapshotMsg, EconomyError> {
        self.economy.level_up()?;
        Ok(self.snapshot())
    }

    pub fn buy_advanced(&mut self) -> Result<StatsSnapshotMsg, EconomyError> {
        self.economy.buy_advanced()?;
        Ok(self.snapshot())
    }

    pub fn list_boosts(&self) -> Vec<BoostListingMsg> {
        let currency = self.economy.currency();
        BoostId::ALL
            .iter()
            .map(|&id| {
                let def = id.def();
                BoostListingMsg {
                    id: id.as_str().to_string(),
                    title: def.title.to_string(),
                    description: def.description.to_string(),
                    price: def.price,
                    duration_ms: def.duration_ms,
                    active_count: self.economy.boosts().active_count(id),
                    affordable: currency >= def.price,
                }
            })
            .collect()
    }

    pub fn activate_boost(&mut self, id: BoostId) -> Result<StatsSnapshotMsg, EconomyError> {
        self.economy.activate_boost(id)?;
        Ok(self.snapshot())
    }

    pub fn list_skins(&self) -> Vec<SkinListingMsg> {
        self.wardrobe
            .catalog()
            .iter()
            .map(|skin| SkinListingMsg {
                id: skin.id.clone(),
                title: skin.title.clone(),
                price: skin.price,
                preview: skin.preview.clone(),
                owned: self.wardrobe.is_owned(&skin.id),
                equipped: self.wardrobe.equipped() == skin.id,
            })
            .collect()
    }

    pub fn buy_skin(&mut self, id: &str) -> Result<StatsSnapshotMsg, EconomyError> {
        self.wardrobe.buy(id, &mut self.economy)?;
        Ok(self.snapshot())
    }

    pub fn equip_skin(&mut self, id: &str) -> Result<StatsSnapshotMsg, EconomyError> {
        self.wardrobe.equip(id)?;
        Ok(self.snapshot())
    }

    /// HUD snapshot with boosts applied
    pub fn snapshot(&self) -> StatsSnapshotMsg {
        let stats = self.economy.stats();
        let now = self.now_ms();
        StatsSnapshotMsg {
            currency: stats.currency,
            currency_display: format_currency(stats.currency),
            pickaxe_level: stats.pickaxe_level,
            pickaxe_damage: stats.pickaxe_damage,
            pickaxe_speed: stats.pickaxe_speed,
            crit_chance: stats.crit_chance,
            crit_mult: stats.crit_mult,
            rare_chance_bonus: stats.rare_chance_bonus,
            swing_interval_ms: combat::swing_interval_ms(stats.pickaxe_speed),
            upgrade_progress: self.economy.total_upgrade_purchases(),
            progress_segments: PROGRESS_SEGMENTS,
            advanced_available: self.economy.advanced_available(),
            advanced_unlocked: self.economy.advanced_unlocked(),
            blocks_mined: self.economy.blocks_mined(),
            depth: self.depth,
            equipped_skin: self.wardrobe.equipped().to_string(),
            active_boosts: self
                .economy
                .boosts()
                .active()
                .iter()
                .map(|b| ActiveBoostMsg::from_active(b, now))
                .collect(),
        }
    }
}
