//! Persistence and catalog access

pub mod backend;
pub mod skins;
pub mod stats;

pub use backend::StatsBackend;
pub use stats::{match_rewards, PlayerStats, Rewards, StatsService, StatsStore};
