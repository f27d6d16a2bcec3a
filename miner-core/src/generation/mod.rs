//! Deterministic cell generation.
//!
//! A cell is a pure function of (world seed, catalog, row, column, rare-chance
//! bonus at generation time). Barrier rows are decided by depth alone; every
//! other cell draws one seeded sample and picks a material from the catalog.

pub mod materials;
pub mod sampler;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::*;
pub use materials::{MaterialDef, MaterialTable};
pub use sampler::WorldSeed;

/// Barrier placement and toughness tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarrierTuning {
    pub min_row: u32,
    pub min_spacing: u32,
    pub spacing_divisor: u32,
    pub base_damage: u32,
    pub damage_slope: f64,
    pub level_row_divisor: u32,
    pub health_mult: u32,
}

impl Default for BarrierTuning {
    fn default() -> Self {
        Self {
            min_row: BARRIER_MIN_ROW,
            min_spacing: BARRIER_MIN_SPACING,
            spacing_divisor: BARRIER_SPACING_DIVISOR,
            base_damage: BARRIER_BASE_DAMAGE,
            damage_slope: BARRIER_DAMAGE_SLOPE,
            level_row_divisor: BARRIER_LEVEL_ROW_DIVISOR,
            health_mult: BARRIER_HEALTH_MULT,
        }
    }
}

impl BarrierTuning {
    /// Barrier rows get sparser with depth: spacing = max(min_spacing, row / divisor)
    pub fn is_barrier_row(&self, row: u32) -> bool {
        if row < self.min_row {
            return false;
        }
        let spacing = self
            .min_spacing
            .max(row / self.spacing_divisor.max(1))
            .max(1);
        row % spacing == 0
    }

    pub fn requirement(&self, row: u32) -> BarrierRequirement {
        // `as u32` saturates, so only the additions can overflow
        let req_damage = self
            .base_damage
            .saturating_add((f64::from(row) * self.damage_slope).floor() as u32);
        let req_level = (row / self.level_row_divisor.max(1)).saturating_add(1);
        BarrierRequirement {
            req_damage,
            req_level,
        }
    }
}

/// Material block health tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthTuning {
    pub base_health: f64,
    pub depth_slope: f64,
}

impl Default for HealthTuning {
    fn default() -> Self {
        Self {
            base_health: BASE_BLOCK_HEALTH,
            depth_slope: BLOCK_HEALTH_SLOPE,
        }
    }
}

impl HealthTuning {
    /// floor((base + row * slope) * (0.6 + 0.2 * (1 + catalog index)))
    pub fn material_health(&self, row: u32, catalog_index: usize) -> i64 {
        let base = self.base_health + f64::from(row) * self.depth_slope;
        let tier = (catalog_index + 1) as f64;
        (base * (0.6 + tier * 0.2)).floor() as i64
    }
}

/// Minimum pickaxe stats needed before a barrier takes damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrierRequirement {
    pub req_damage: u32,
    pub req_level: u32,
}

/// What a cell is made of
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellKind {
    Material { material_index: usize },
    Barrier(BarrierRequirement),
}

/// One mineable unit of the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub kind: CellKind,
    /// Stored health; may go negative on the breaking hit
    pub health: i64,
    pub max_health: i64,
}

impl Cell {
    /// Health as shown to the player
    pub fn display_health(&self) -> i64 {
        self.health.max(0)
    }

    pub fn is_broken(&self) -> bool {
        self.health <= 0
    }

    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, CellKind::Barrier(_))
    }

    pub fn barrier_requirement(&self) -> Option<BarrierRequirement> {
        match self.kind {
            CellKind::Barrier(req) => Some(req),
            CellKind::Material { .. } => None,
        }
    }

    /// Build a barrier cell for `row` directly from its requirement
    pub fn barrier(row: u32, col: u32, req: BarrierRequirement, health_mult: u32) -> Self {
        let health = i64::from(req.req_damage).saturating_mul(i64::from(health_mult));
        Self {
            row,
            col,
            kind: CellKind::Barrier(req),
            health,
            max_health: health,
        }
    }
}

/// Produces cells from coordinates
#[derive(Debug, Clone, Default)]
pub struct CellGenerator {
    pub seed: WorldSeed,
    pub table: MaterialTable,
    pub barrier: BarrierTuning,
    pub health: HealthTuning,
}

impl CellGenerator {
    pub fn new(
        seed: WorldSeed,
        table: MaterialTable,
        barrier: BarrierTuning,
        health: HealthTuning,
    ) -> Self {
        Self {
            seed,
            table,
            barrier,
            health,
        }
    }

    pub fn is_barrier_row(&self, row: u32) -> bool {
        self.barrier.is_barrier_row(row)
    }

    /// Generate a single cell. Pure for fixed seed, catalog and bonus.
    pub fn generate(&self, row: u32, col: u32, rare_chance_bonus: f64) -> Cell {
        if self.barrier.is_barrier_row(row) {
            let req = self.barrier.requirement(row);
            return Cell::barrier(row, col, req, self.barrier.health_mult);
        }

        let uniform = self.seed.sample(row, col);
        let material_index = self.table.pick(row, rare_chance_bonus, uniform);
        let health = self.health.material_health(row, material_index);
        trace!(row, col, material_index, health, "generated material cell");

        Cell {
            row,
            col,
            kind: CellKind::Material { material_index },
            health,
            max_health: health,
        }
    }

    /// Generate every column of a row
    pub fn generate_row(&self, row: u32, columns: u32, rare_chance_bonus: f64) -> Vec<Cell> {
        (0..columns)
            .map(|col| self.generate(row, col, rare_chance_bonus))
            .collect()
    }

    /// Resolve the material definition of a cell
    pub fn material_of(&self, cell: &Cell) -> Option<&MaterialDef> {
        match cell.kind {
            CellKind::Material { material_index } => self.table.get(material_index),
            CellKind::Barrier(_) => None,
        }
    }
}
