//! Ore catalog and depth-biased weighted selection.
//!
//! Catalog order matters: it is the value tier used for block health and the
//! tie-break order for selection.

use serde::{Deserialize, Serialize};

use crate::constants::DEPTH_BIAS_RAMP_ROWS;

/// Static ore definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    pub id: String,
    pub display_name: String,
    pub color: String,
    pub base_value: f64,
    pub rarity_weight: f64,
    /// Row after which this ore starts gaining weight
    pub depth_bias: u32,
}

impl MaterialDef {
    pub fn new(
        id: &str,
        display_name: &str,
        color: &str,
        base_value: f64,
        rarity_weight: f64,
        depth_bias: u32,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            color: color.into(),
            base_value,
            rarity_weight,
            depth_bias,
        }
    }

    /// Effective weight at `row`: rarity * (1 + depth ramp) * (1 + rare bonus)
    pub fn weight_at(&self, row: u32, rare_chance_bonus: f64) -> f64 {
        let past_bias = (f64::from(row) - f64::from(self.depth_bias)) / DEPTH_BIAS_RAMP_ROWS;
        let bias = past_bias.clamp(0.0, 1.0);
        self.rarity_weight * (1.0 + bias) * (1.0 + rare_chance_bonus)
    }
}

/// Ordered ore catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTable {
    materials: Vec<MaterialDef>,
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self {
            materials: vec![
                MaterialDef::new("stone", "Stone", "#808b96", 1.0, 0.60, 0),
                MaterialDef::new("coal", "Coal", "#3a3a3a", 3.0, 0.18, 4),
                MaterialDef::new("iron", "Iron", "#b3b3b3", 6.0, 0.12, 12),
                MaterialDef::new("gold", "Gold", "#f5c542", 12.0, 0.06, 25),
                MaterialDef::new("emerald", "Emerald", "#2ecc71", 24.0, 0.025, 40),
                MaterialDef::new("diamond", "Diamond", "#74e4ff", 40.0, 0.010, 65),
                MaterialDef::new("ruby", "Ruby", "#ff4d6d", 55.0, 0.006, 85),
            ],
        }
    }
}

impl MaterialTable {
    /// Build a catalog from definitions. Validation happens in the config layer.
    pub fn new(materials: Vec<MaterialDef>) -> Self {
        Self { materials }
    }

    pub fn materials(&self) -> &[MaterialDef] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MaterialDef> {
        self.materials.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.id == id)
    }

    pub fn by_id(&self, id: &str) -> Option<&MaterialDef> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Weighted pick using one uniform sample in `[0, 1)`.
    ///
    /// Returns the catalog index. The sample is scaled by the total weight and
    /// each weight is subtracted in catalog order until the remainder drops to
    /// zero or below; a leftover remainder from float error falls back to the
    /// first entry.
    pub fn pick(&self, row: u32, rare_chance_bonus: f64, uniform: f64) -> usize {
        let weights: Vec<f64> = self
            .materials
            .iter()
            .map(|m| m.weight_at(row, rare_chance_bonus))
            .collect();
        let total: f64 = weights.iter().sum();

        let mut roll = uniform * total;
        for (i, w) in weights.iter().enumerate() {
            roll -= w;
            if roll <= 0.0 {
                return i;
            }
        }
        0
    }
}
