//! Pixel Miner - Core Library
//!
//! Deterministic game logic for an endless vertical mining game:
//! - Seeded procedural cell generation (materials and barrier rows)
//! - Lazy, windowed world realization driven by the viewport
//! - Swing resolution with crits and barrier gating
//! - Economy: upgrades, pickaxe levels, the advanced unlock, timed boosts
//! - Cosmetic pickaxe skins
//!
//! Rendering, input and persistence belong to the host page.

pub mod combat;
pub mod constants;
pub mod cosmetics;
pub mod economy;
pub mod engine;
pub mod generation;
pub mod logging;
pub mod world;
