//! Lazy, windowed world generation.
//!
//! The window keeps every realized cell and the set of rows already
//! generated. Each viewport sync only touches rows inside the visible span
//! plus margin, and each row is generated at most once per session.

use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{BLOCK_SIZE_PX, MINE_COLUMNS, VIEW_MARGIN_ROWS};
use crate::generation::{Cell, CellGenerator};

/// Viewport geometry supplied by the host page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_px: f64,
    pub height_px: f64,
}

/// Grid geometry (block size, columns, margin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub block_size_px: u32,
    pub columns: u32,
    pub margin_rows: u32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            block_size_px: BLOCK_SIZE_PX,
            columns: MINE_COLUMNS,
            margin_rows: VIEW_MARGIN_ROWS,
        }
    }
}

impl GridGeometry {
    /// Rows covering the viewport plus margin on both ends, clamped at row 0
    pub fn row_span(&self, viewport: Viewport) -> RangeInclusive<u32> {
        let size = f64::from(self.block_size_px);
        let margin = i64::from(self.margin_rows);
        let top = (viewport.scroll_px.max(0.0) / size).floor() as i64 - margin;
        let bot = ((viewport.scroll_px.max(0.0) + viewport.height_px.max(0.0)) / size).floor()
            as i64
            + margin;
        let max_row = i64::from(u32::MAX);
        let top = top.clamp(0, max_row) as u32;
        let bot = bot.clamp(0, max_row) as u32;
        top..=bot
    }

    /// Depth in metres (rows) at a scroll offset
    pub fn depth_at(&self, scroll_px: f64) -> u32 {
        (scroll_px.max(0.0) / f64::from(self.block_size_px)).floor() as u32
    }
}

/// Key for a live cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub row: u32,
    pub col: u32,
}

impl CellKey {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Generated rows and the live cell set
#[derive(Debug, Clone, Default)]
pub struct WorldWindow {
    geometry: GridGeometry,
    generated_rows: HashSet<u32>,
    cells: HashMap<CellKey, Cell>,
}

impl WorldWindow {
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            generated_rows: HashSet::new(),
            cells: HashMap::new(),
        }
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// Generate every missing row in the viewport span.
    ///
    /// Returns the rows generated by this call, in ascending order.
    pub fn sync(
        &mut self,
        viewport: Viewport,
        generator: &CellGenerator,
        rare_chance_bonus: f64,
    ) -> Vec<u32> {
        let span = self.geometry.row_span(viewport);
        let mut fresh = Vec::new();
        for row in span {
            if self.ensure_row(row, generator, rare_chance_bonus) {
                fresh.push(row);
            }
        }
        if !fresh.is_empty() {
            debug!(
                first = fresh[0],
                count = fresh.len(),
                total_rows = self.generated_rows.len(),
                "generated rows"
            );
        }
        fresh
    }

    /// Generate a single row if it has not been generated yet.
    ///
    /// Returns `true` when the row was generated by this call.
    pub fn ensure_row(
        &mut self,
        row: u32,
        generator: &CellGenerator,
        rare_chance_bonus: f64,
    ) -> bool {
        if !self.generated_rows.insert(row) {
            return false;
        }
        for cell in generator.generate_row(row, self.geometry.columns, rare_chance_bonus) {
            self.cells.insert(CellKey::new(cell.row, cell.col), cell);
        }
        true
    }

    pub fn is_row_generated(&self, row: u32) -> bool {
        self.generated_rows.contains(&row)
    }

    pub fn generated_row_count(&self) -> usize {
        self.generated_rows.len()
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&CellKey::new(row, col))
    }

    pub fn cell_mut(&mut self, row: u32, col: u32) -> Option<&mut Cell> {
        self.cells.get_mut(&CellKey::new(row, col))
    }

    /// Remove a broken cell from the live set
    pub fn remove(&mut self, row: u32, col: u32) -> Option<Cell> {
        self.cells.remove(&CellKey::new(row, col))
    }

    /// Live cells of a row, ordered by column
    pub fn cells_in_row(&self, row: u32) -> Vec<&Cell> {
        (0..self.geometry.columns)
            .filter_map(|col| self.cell(row, col))
            .collect()
    }

    pub fn live_cell_count(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(scroll: f64, height: f64) -> Viewport {
        Viewport {
            scroll_px: scroll,
            height_px: height,
        }
    }

    #[test]
    fn test_row_span_at_surface() {
        let geo = GridGeometry::default();
        // 0..=floor(800/56)+8 = 14 + 8 = 22
        assert_eq!(geo.row_span(viewport(0.0, 800.0)), 0..=22);
    }

    #[test]
    fn test_row_span_scrolled() {
        let geo = GridGeometry::default();
        // top = 1120/56 - 8 = 12, bot = (1920/56 = 34) + 8 = 42
        assert_eq!(geo.row_span(viewport(1120.0, 800.0)), 12..=42);
    }

    #[test]
    fn test_row_span_clamped_at_last_row() {
        let geo = GridGeometry::default();
        let deep = 56.0 * 2f64.powi(32);
        let span = geo.row_span(viewport(deep, 800.0));
        assert_eq!(span, u32::MAX - 7..=u32::MAX);
        assert!(!span.is_empty());

        // Just inside the last rows: the bottom margin is clipped, never wrapped
        let near = 56.0 * f64::from(u32::MAX - 20);
        let span = geo.row_span(viewport(near, 800.0));
        assert_eq!(*span.start(), u32::MAX - 28);
        assert_eq!(*span.end(), u32::MAX);
    }

    #[test]
    fn test_depth_at() {
        let geo = GridGeometry::default();
        assert_eq!(geo.depth_at(0.0), 0);
        assert_eq!(geo.depth_at(55.9), 0);
        assert_eq!(geo.depth_at(56.0), 1);
        assert_eq!(geo.depth_at(-30.0), 0);
    }

    #[test]
    fn test_sync_generates_each_row_once() {
        let gen = CellGenerator::default();
        let mut window = WorldWindow::new(GridGeometry::default());
        let first = window.sync(viewport(0.0, 800.0), &gen, 0.0);
        assert_eq!(first.len(), 23);
        assert_eq!(window.live_cell_count(), 23 * 12);

        let second = window.sync(viewport(0.0, 800.0), &gen, 0.0);
        assert!(second.is_empty(), "re-sync must not regenerate rows");
        assert_eq!(window.generated_row_count(), 23);
    }

    #[test]
    fn test_sync_only_new_rows_after_scroll() {
        let gen = CellGenerator::default();
        let mut window = WorldWindow::new(GridGeometry::default());
        window.sync(viewport(0.0, 800.0), &gen, 0.0);
        let fresh = window.sync(viewport(56.0 * 5.0, 800.0), &gen, 0.0);
        assert_eq!(fresh, (23..=27).collect::<Vec<u32>>());
    }

    #[test]
    fn test_broken_cells_not_regenerated() {
        let gen = CellGenerator::default();
        let mut window = WorldWindow::new(GridGeometry::default());
        window.sync(viewport(0.0, 800.0), &gen, 0.0);
        assert!(window.remove(3, 4).is_some());
        window.sync(viewport(0.0, 800.0), &gen, 0.0);
        assert!(window.cell(3, 4).is_none(), "mined cells stay mined");
        assert_eq!(window.cells_in_row(3).len(), 11);
    }

    #[test]
    fn test_damaged_cell_survives_resync() {
        let gen = CellGenerator::default();
        let mut window = WorldWindow::new(GridGeometry::default());
        window.sync(viewport(0.0, 800.0), &gen, 0.0);
        let full = window.cell(5, 2).unwrap().max_health;
        window.cell_mut(5, 2).unwrap().health = 1;

        // Neither a re-sync nor a changed bonus may re-roll a realized row
        assert!(window.sync(viewport(0.0, 800.0), &gen, 0.5).is_empty());
        assert!(!window.ensure_row(5, &gen, 0.5));
        let cell = window.cell(5, 2).unwrap();
        assert_eq!(cell.health, 1);
        assert_eq!(cell.max_health, full);
    }
}
