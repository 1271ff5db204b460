//! Session layer: wires the simulation engine to persistence
//!
//! [`SessionContext`] is the single owner of the piece RNG, the save store and
//! the running [`replay_tetris_core::SimulationEngine`]. Configuration comes
//! from [`SessionConfig`], usually via [`SessionConfig::from_env`].

pub mod config;
pub mod session;

pub use config::SessionConfig;
pub use session::SessionContext;
