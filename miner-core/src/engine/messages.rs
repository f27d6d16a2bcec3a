use serde::{Deserialize, Serialize};

use crate::economy::boosts::ActiveBoost;
use crate::generation::Cell;

// =====================================================
// Snapshot types handed to the page layer
// =====================================================

/// Everything the HUD shows, in one read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshotMsg {
    pub currency: f64,
    pub currency_display: String,
    pub pickaxe_level: u32,
    pub pickaxe_damage: f64,
    pub pickaxe_speed: f64,
    pub crit_chance: f64,
    pub crit_mult: f64,
    pub rare_chance_bonus: f64,
    pub swing_interval_ms: f64,
    /// Filled segments of the upgrade progress bar
    pub upgrade_progress: u32,
    pub progress_segments: u32,
    pub advanced_available: bool,
    pub advanced_unlocked: bool,
    pub blocks_mined: u64,
    pub depth: u32,
    pub equipped_skin: String,
    pub active_boosts: Vec<ActiveBoostMsg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveBoostMsg {
    pub activation_id: u64,
    pub boost_id: String,
    pub remaining_ms: u64,
}

impl ActiveBoostMsg {
    pub fn from_active(boost: &ActiveBoost, now_ms: u64) -> Self {
        Self {
            activation_id: boost.activation_id,
            boost_id: boost.boost.as_str().to_string(),
            remaining_ms: boost.remaining_ms(now_ms),
        }
    }
}

/// Emitted once per activation when its timer runs out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostExpiredMsg {
    pub activation_id: u64,
    pub boost_id: String,
}

impl From<&ActiveBoost> for BoostExpiredMsg {
    fn from(boost: &ActiveBoost) -> Self {
        Self {
            activation_id: boost.activation_id,
            boost_id: boost.boost.as_str().to_string(),
        }
    }
}

// --- Shop listings ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeListingMsg {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub count: u32,
    pub cap: u32,
    pub maxed: bool,
    pub affordable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelUpListingMsg {
    pub next_level: u32,
    pub price: f64,
    pub unlocked: bool,
    pub affordable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeShopMsg {
    pub upgrades: Vec<UpgradeListingMsg>,
    pub level_up: LevelUpListingMsg,
    pub advanced_available: bool,
    pub advanced_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostListingMsg {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub duration_ms: u64,
    pub active_count: usize,
    pub affordable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinListingMsg {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub preview: String,
    pub owned: bool,
    pub equipped: bool,
}

// --- Mining ---

/// Result of one swing at a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingOutcomeMsg {
    pub row: u32,
    pub col: u32,
    pub damage_dealt: i64,
    pub crit: bool,
    /// Barrier requirement not met; nothing changed
    pub rejected: bool,
    pub broke: bool,
    pub remaining_health: i64,
    /// Amount credited when the cell broke
    pub reward: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellMsg {
    pub row: u32,
    pub col: u32,
    /// Material id, or "barrier"
    pub kind: String,
    pub color: Option<String>,
    pub health: i64,
    pub max_health: i64,
    pub req_damage: Option<u32>,
    pub req_level: Option<u32>,
}

impl CellMsg {
    pub fn barrier(cell: &Cell) -> Self {
        let req = cell.barrier_requirement();
        Self {
            row: cell.row,
            col: cell.col,
            kind: "barrier".to_string(),
            color: None,
            health: cell.display_health(),
            max_health: cell.max_health,
            req_damage: req.map(|r| r.req_damage),
            req_level: req.map(|r| r.req_level),
        }
    }

    pub fn material(cell: &Cell, id: &str, color: &str) -> Self {
        Self {
            row: cell.row,
            col: cell.col,
            kind: id.to_string(),
            color: Some(color.to_string()),
            health: cell.display_health(),
            max_health: cell.max_health,
            req_damage: None,
            req_level: None,
        }
    }

    pub fn is_barrier(&self) -> bool {
        self.req_damage.is_some()
    }
}
