//! Centralized tuning constants for the mining core.
//!
//! Values that the config layer can override (block size, columns, barrier
//! and health tuning) live here as defaults. Upgrade and boost catalogs keep
//! their prices next to their definitions in `economy`.

// =====================================================
// Viewport / World Window
// =====================================================

/// Block edge length in CSS pixels
pub const BLOCK_SIZE_PX: u32 = 56;

/// Number of columns in every row of the mine
pub const MINE_COLUMNS: u32 = 12;

/// Rows generated beyond each edge of the viewport
pub const VIEW_MARGIN_ROWS: u32 = 8;

// =====================================================
// Procedural Generation
// =====================================================

/// Default world seed, xor-ed into every cell hash
pub const DEFAULT_WORLD_SEED: u32 = 0x9e37_79b9;

/// Odd multiplier applied to the row before mixing
pub const ROW_HASH_PRIME: u32 = 73_856_093;

/// Odd multiplier applied to the column before mixing
pub const COL_HASH_PRIME: u32 = 19_349_663;

/// Avalanche multiplier for the xorshift rounds
pub const AVALANCHE_MULT: u32 = 0x045d_9f3b;

/// Rows within this many metres of the surface never hold barriers
pub const BARRIER_MIN_ROW: u32 = 15;

/// Smallest spacing between barrier rows; spacing grows as row / 4 deeper down
pub const BARRIER_MIN_SPACING: u32 = 20;

/// Barrier spacing divisor: spacing = max(BARRIER_MIN_SPACING, row / this)
pub const BARRIER_SPACING_DIVISOR: u32 = 4;

/// Damage requirement at row 0
pub const BARRIER_BASE_DAMAGE: u32 = 20;

/// Extra damage requirement per row
pub const BARRIER_DAMAGE_SLOPE: f64 = 1.5;

/// Rows per extra required pickaxe level
pub const BARRIER_LEVEL_ROW_DIVISOR: u32 = 60;

/// Barrier health = required damage * this
pub const BARRIER_HEALTH_MULT: u32 = 3;

/// Material block health at row 0, before the material factor
pub const BASE_BLOCK_HEALTH: f64 = 8.0;

/// Extra material block health per row
pub const BLOCK_HEALTH_SLOPE: f64 = 0.8;

/// Depth over which a material's weight bonus ramps from 0 to 100%
pub const DEPTH_BIAS_RAMP_ROWS: f64 = 100.0;

// =====================================================
// Rewards
// =====================================================

/// Sell value grows by base * row / this
pub const SELL_DEPTH_DIVISOR: f64 = 120.0;

/// Flat barrier reward
pub const BARRIER_REWARD_BASE: f64 = 200.0;

/// Barrier reward per row of depth
pub const BARRIER_REWARD_PER_ROW: f64 = 8.0;

/// Permanent crit chance granted by each broken barrier (+0.5%)
pub const BARRIER_CRIT_BONUS: f64 = 0.005;

/// Crit chance cap for barrier rewards
pub const BARRIER_CRIT_CAP: f64 = 0.5;

// =====================================================
// Player
// =====================================================

pub const START_PICKAXE_LEVEL: u32 = 1;
pub const START_PICKAXE_DAMAGE: f64 = 5.0;
pub const START_PICKAXE_SPEED: f64 = 1.0;

/// Base critical hit chance (5%)
pub const START_CRIT_CHANCE: f64 = 0.05;

/// Critical damage multiplier (2x)
pub const START_CRIT_MULT: f64 = 2.0;

/// Upgrade purchases allowed per track per pickaxe level
pub const UPGRADES_PER_LEVEL: u32 = 5;

/// Segments in the upgrade progress bar; filling it unlocks the advanced upgrade
pub const PROGRESS_SEGMENTS: u32 = 15;

/// Swing cadence: interval = max(SWING_MIN_INTERVAL_MS, SWING_BASE_INTERVAL_MS / speed)
pub const SWING_BASE_INTERVAL_MS: f64 = 140.0;
pub const SWING_MIN_INTERVAL_MS: f64 = 50.0;
