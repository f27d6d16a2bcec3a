//! Engine facade for the page layer.
//!
//! `MineEngine` is the single owner of mutable game state. The host wires
//! scroll, click, tick and shop actions to it and renders the serializable
//! messages it returns.

pub mod config;
pub mod messages;
pub mod mine;

pub use config::{ConfigError, MineConfig};
pub use messages::*;
pub use mine::{MineEngine, MineError};
