//! Headless auto-miner.
//!
//! Scrolls down the mine one row at a time, swings at every cell in the row,
//! spends earnings in the shop and prints the final HUD snapshot as JSON.
//!
//! Usage: `miner-sim [config.ron|config.json] [rows]`

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{info, warn};

use miner_core::combat::swing_interval_ms;
use miner_core::economy::boosts::BoostId;
use miner_core::economy::upgrades::UpgradeId;
use miner_core::engine::{MineConfig, MineEngine, MineError};
use miner_core::logging::init_tracing;

const DEFAULT_DEMO_ROWS: u32 = 120;
const VIEWPORT_HEIGHT_PX: f64 = 800.0;
const MAX_SWINGS_PER_CELL: u32 = 64;
const DEMO_RNG_SEED: u64 = 0x6d69_6e65;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            MineConfig::load(&path).with_context(|| format!("loading config from {path}"))?
        }
        None => MineConfig::default(),
    };
    let rows = match args.next() {
        Some(n) => n.parse::<u32>().context("row count must be a number")?,
        None => DEFAULT_DEMO_ROWS,
    };

    init_tracing(&config.tracing);
    let mut engine = MineEngine::new(config).context("building engine")?;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(DEMO_RNG_SEED);
    let block = f64::from(engine.config().grid.block_size_px);
    let columns = engine.config().grid.columns;

    info!(rows, columns, "auto-miner starting");

    for step in 0..rows {
        engine.sync_viewport(f64::from(step) * block, VIEWPORT_HEIGHT_PX);
        let row = engine.depth();
        for col in 0..columns {
            mine_cell(&mut engine, row, col, &mut rng)?;
        }
        go_shopping(&mut engine);
    }

    let snapshot = engine.snapshot();
    info!(
        depth = snapshot.depth,
        blocks = snapshot.blocks_mined,
        currency = %snapshot.currency_display,
        "auto-miner finished"
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Swing at one cell until it breaks, a barrier turns us away, or we give up
fn mine_cell(
    engine: &mut MineEngine,
    row: u32,
    col: u32,
    rng: &mut Xoshiro256PlusPlus,
) -> Result<()> {
    for _ in 0..MAX_SWINGS_PER_CELL {
        let outcome = match engine.swing(row, col, &mut *rng) {
            Ok(outcome) => outcome,
            Err(MineError::NoCell { .. }) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if outcome.rejected || outcome.broke {
            return Ok(());
        }
        let interval = swing_interval_ms(engine.stats().pickaxe_speed);
        for expired in engine.tick(interval.round() as u64) {
            info!(boost = %expired.boost_id, "boost wore off");
        }
    }
    Ok(())
}

/// Buy whatever is affordable, most impactful first
fn go_shopping(engine: &mut MineEngine) {
    if engine.level_up().is_ok() {
        info!(level = engine.stats().pickaxe_level, "levelled up");
    }
    if engine.buy_advanced().is_ok() {
        info!("advanced upgrade unlocked");
    }
    while UpgradeId::ALL
        .iter()
        .any(|&id| engine.buy_upgrade(id).is_ok())
    {}
    let drops = BoostId::DoubleDrops.def();
    if engine.economy().boosts().active_count(BoostId::DoubleDrops) == 0
        && engine.economy().currency() > drops.price * 4.0
    {
        if let Err(e) = engine.activate_boost(BoostId::DoubleDrops) {
            warn!(error = %e, "could not start double sell");
        }
    }
}
