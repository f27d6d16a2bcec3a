use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_WORLD_SEED;
use crate::generation::{
    BarrierTuning, CellGenerator, HealthTuning, MaterialDef, MaterialTable, WorldSeed,
};
use crate::logging::TracingConfig;
use crate::world::GridGeometry;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid RON config: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MineConfig {
    pub world_seed: u32,
    pub grid: GridGeometry,
    pub barrier: BarrierTuning,
    pub health: HealthTuning,
    /// Replaces the built-in ore catalog when set
    pub materials: Option<Vec<MaterialDef>>,
    pub tracing: TracingConfig,
}

impl Default for MineConfig {
    fn default() -> Self {
        Self {
            world_seed: DEFAULT_WORLD_SEED,
            grid: GridGeometry::default(),
            barrier: BarrierTuning::default(),
            health: HealthTuning::default(),
            materials: None,
            tracing: TracingConfig::default(),
        }
    }
}

impl MineConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` or `.ron` file (anything not `.json` is read as RON)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_ron_str(&text),
        }
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn material_table(&self) -> MaterialTable {
        match &self.materials {
            Some(defs) => MaterialTable::new(defs.clone()),
            None => MaterialTable::default(),
        }
    }

    pub fn cell_generator(&self) -> CellGenerator {
        CellGenerator::new(
            WorldSeed::new(self.world_seed),
            self.material_table(),
            self.barrier,
            self.health,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.grid.block_size_px == 0 {
            return invalid("grid.block_size_px must be positive");
        }
        if self.grid.columns == 0 {
            return invalid("grid.columns must be at least 1");
        }
        if self.barrier.min_spacing == 0 || self.barrier.spacing_divisor == 0 {
            return invalid("barrier spacing values must be positive");
        }
        if self.barrier.level_row_divisor == 0 {
            return invalid("barrier.level_row_divisor must be positive");
        }
        if !(self.health.base_health > 0.0) || self.health.depth_slope < 0.0 {
            return invalid("health tuning must be positive");
        }

        if let Some(defs) = &self.materials {
            if defs.is_empty() {
                return invalid("materials must not be empty");
            }
            let mut seen = HashSet::new();
            for def in defs {
                if !(def.rarity_weight > 0.0) || !def.rarity_weight.is_finite() {
                    return Err(ConfigError::Invalid(format!(
                        "material {} needs a positive rarity weight",
                        def.id
                    )));
                }
                if def.base_value < 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "material {} has a negative base value",
                        def.id
                    )));
                }
                if !seen.insert(def.id.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "duplicate material id {}",
                        def.id
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.columns, 12);
        assert_eq!(config.grid.block_size_px, 56);
        assert_eq!(config.material_table().len(), 7);
    }

    #[test]
    fn test_ron_roundtrip() {
        let config = MineConfig {
            world_seed: 99,
            ..MineConfig::default()
        };
        let text = config.to_ron_string().unwrap();
        let restored = MineConfig::from_ron_str(&text).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = MineConfig::from_ron_str("(world_seed: 7)").unwrap();
        assert_eq!(config.world_seed, 7);
        assert_eq!(config.grid, GridGeometry::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MineConfig::from_json_str(r#"{"grid": {"block_size_px": 32, "columns": 8, "margin_rows": 4}}"#).unwrap();
        assert_eq!(config.grid.columns, 8);
        assert_eq!(config.world_seed, DEFAULT_WORLD_SEED);
    }

    #[test]
    fn test_rejects_zero_columns() {
        let err = MineConfig::from_json_str(r#"{"grid": {"block_size_px": 56, "columns": 0, "margin_rows": 8}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_materials() {
        let mut config = MineConfig {
            materials: Some(vec![]),
            ..MineConfig::default()
        };
        assert!(config.validate().is_err());

        config.materials = Some(vec![
            MaterialDef::new("stone", "Stone", "#888", 1.0, 0.5, 0),
            MaterialDef::new("stone", "Stone again", "#999", 2.0, 0.5, 0),
        ]);
        assert!(config.validate().is_err());

        config.materials = Some(vec![MaterialDef::new("void", "Void", "#000", 1.0, 0.0, 0)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_ron() {
        assert!(matches!(
            MineConfig::from_ron_str("(world_seed: \"nope\")"),
            Err(ConfigError::Ron(_))
        ));
    }
}
