//! Pickaxe skins.
//!
//! Skins are purely visual, no gameplay impact. Ownership lives in memory for
//! the session; persisting it is the host page's job.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::economy::{Economy, EconomyError};

/// A purchasable skin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skin {
    pub id: String,
    pub title: String,
    pub price: f64,
    /// CSS background used for the preview swatch
    pub preview: String,
}

impl Skin {
    fn new(id: &str, title: &str, price: f64, preview: &str) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            preview: preview.into(),
        }
    }
}

pub const DEFAULT_SKIN: &str = "default";

/// Built-in skin catalog
pub fn miner_skins() -> Vec<Skin> {
    vec![
        Skin::new(
            DEFAULT_SKIN,
            "Default",
            0.0,
            "linear-gradient(135deg,#6e7b8a,#3a4152)",
        ),
        Skin::new(
            "ember",
            "Ember",
            500.0,
            "linear-gradient(135deg,#ff9248,#992a14)",
        ),
        Skin::new(
            "glacier",
            "Glacier",
            500.0,
            "linear-gradient(135deg,#9be1ff,#3468a5)",
        ),
        Skin::new(
            "toxic",
            "Toxic",
            750.0,
            "linear-gradient(135deg,#b2ff59,#1f7a33)",
        ),
    ]
}

/// Owned and equipped skins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wardrobe {
    catalog: Vec<Skin>,
    owned: BTreeSet<String>,
    equipped: String,
}

impl Default for Wardrobe {
    fn default() -> Self {
        Self::new(miner_skins())
    }
}

impl Wardrobe {
    /// Free skins start owned; the first one is equipped
    pub fn new(catalog: Vec<Skin>) -> Self {
        let owned: BTreeSet<String> = catalog
            .iter()
            .filter(|s| s.price <= 0.0)
            .map(|s| s.id.clone())
            .collect();
        let equipped = owned
            .iter()
            .next()
            .cloned()
            .unwrap_or_else(|| DEFAULT_SKIN.to_string());
        Self {
            catalog,
            owned,
            equipped,
        }
    }

    pub fn catalog(&self) -> &[Skin] {
        &self.catalog
    }

    pub fn is_owned(&self, id: &str) -> bool {
        self.owned.contains(id)
    }

    pub fn equipped(&self) -> &str {
        &self.equipped
    }

    fn find(&self, id: &str) -> Result<&Skin, EconomyError> {
        self.catalog
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| EconomyError::UnknownId {
                kind: "skin",
                id: id.to_string(),
            })
    }

    /// Buy a skin through the economy's spend gate and equip it
    pub fn buy(&mut self, id: &str, economy: &mut Economy) -> Result<(), EconomyError> {
        let price = self.find(id)?.price;
        if self.is_owned(id) {
            return Err(EconomyError::SkinAlreadyOwned(id.to_string()));
        }
        economy.try_spend(price)?;
        self.owned.insert(id.to_string());
        self.equipped = id.to_string();
        info!(skin = id, price, "skin purchased");
        Ok(())
    }

    pub fn equip(&mut self, id: &str) -> Result<(), EconomyError> {
        self.find(id)?;
        if !self.is_owned(id) {
            return Err(EconomyError::SkinNotOwned(id.to_string()));
        }
        self.equipped = id.to_string();
        Ok(())
    }
}
