//! Player progression records and the stats service
//!
//! Progression writes are best-effort: the local JSON cache is the source
//! of truth the moment the backend misbehaves, and nothing in here may
//! block the tick loop. The service runs its own runtime on a background
//! thread; the game talks to it through fire-and-forget commands and polls
//! a shared slot for fetch results.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::game::constants::{
    COINS_PER_KILL, COINS_PER_WIN, LEVEL_XP_BASE, RANKS, XP_PER_KILL, XP_PER_WIN,
};

use super::backend::{BackendError, StatsBackend};

/// Persisted progression record for one player name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub xp: u32,
    pub level: u32,
    pub total_kills: u32,
    pub total_deaths: u32,
    pub rank: String,
    pub coins: u32,
    pub diamonds: u32,
    pub equipped_skin: String,
    pub owned_skins: Vec<String>,
    #[serde(default)]
    pub is_banned: bool,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            total_kills: 0,
            total_deaths: 0,
            rank: "Bronze".to_string(),
            coins: 0,
            diamonds: 0,
            equipped_skin: "default".to_string(),
            owned_skins: vec!["default".to_string()],
            is_banned: false,
        }
    }
}

/// Row shape on the backend, keyed by player name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub stats: PlayerStats,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
struct NewStatsRecord<'a> {
    id: Uuid,
    name: &'a str,
    #[serde(flatten)]
    stats: &'a PlayerStats,
}

/// End-of-match reward, a pure function of the local actor's outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rewards {
    pub xp: u32,
    pub coins: u32,
}

pub fn match_rewards(kills: u32, won: bool) -> Rewards {
    Rewards {
        xp: kills * XP_PER_KILL + if won { XP_PER_WIN } else { 0 },
        coins: kills * COINS_PER_KILL + if won { COINS_PER_WIN } else { 0 },
    }
}

pub fn rank_for_level(level: u32) -> &'static str {
    RANKS
        .iter()
        .rev()
        .find(|r| level >= r.min_level)
        .map(|r| r.name)
        .unwrap_or("Unranked")
}

/// Fold one match into a stats record, rolling XP over into levels.
///
/// XP in excess of `level * LEVEL_XP_BASE` rolls repeatedly, so the result
/// is the same whether a gain arrives in one call or split across several.
pub fn apply_match_results(stats: &mut PlayerStats, kills: u32, deaths: u32, rewards: Rewards) {
    stats.total_kills += kills;
    stats.total_deaths += deaths;
    stats.xp += rewards.xp;
    stats.coins += rewards.coins;
    while stats.xp >= stats.level * LEVEL_XP_BASE {
        stats.xp -= stats.level * LEVEL_XP_BASE;
        stats.level += 1;
    }
    stats.rank = rank_for_level(stats.level).to_string();
}

/// Cache-first store over the optional backend
pub struct StatsStore {
    backend: Option<StatsBackend>,
    cache_path: PathBuf,
}

impl StatsStore {
    pub fn new(backend: Option<StatsBackend>, cache_path: PathBuf) -> Self {
        Self { backend, cache_path }
    }

    fn load_cache(&self) -> PlayerStats {
        std::fs::read_to_string(&self.cache_path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn save_cache(&self, stats: &PlayerStats) {
        match serde_json::to_string_pretty(stats) {
            Ok(raw) => {
                if let Err(err) = std::fs::write(&self.cache_path, raw) {
                    warn!(%err, "failed to write stats cache");
                }
            }
            Err(err) => warn!(%err, "failed to serialize stats cache"),
        }
    }

    /// Fetch stats, creating a default record on first use. Any backend
    /// failure falls back to the cached copy.
    pub async fn get_stats(&self, name: &str) -> PlayerStats {
        let Some(backend) = &self.backend else {
            return self.load_cache();
        };

        match self.fetch_or_create(backend, name).await {
            Ok(stats) => {
                self.save_cache(&stats);
                stats
            }
            Err(err) => {
                warn!(%err, "stats fetch failed, using cached copy");
                self.load_cache()
            }
        }
    }

    async fn fetch_or_create(
        &self,
        backend: &StatsBackend,
        name: &str,
    ) -> Result<PlayerStats, BackendError> {
        let query = format!("name=eq.{name}");
        if let Some(record) = backend.get_one::<StatsRecord>("players", &query).await? {
            return Ok(record.stats);
        }
        let stats = PlayerStats::default();
        let created: StatsRecord = backend
            .insert(
                "players",
                &NewStatsRecord {
                    id: Uuid::new_v4(),
                    name,
                    stats: &stats,
                },
            )
            .await?;
        Ok(created.stats)
    }

    /// Apply match results locally, then mirror to the backend best-effort
    pub async fn update_after_match(
        &self,
        name: &str,
        kills: u32,
        deaths: u32,
        rewards: Rewards,
    ) -> PlayerStats {
        let mut stats = self.load_cache();
        apply_match_results(&mut stats, kills, deaths, rewards);
        self.save_cache(&stats);

        if let Some(backend) = &self.backend {
            let query = format!("name=eq.{name}");
            if let Err(err) = backend.update("players", &query, &stats).await {
                warn!(%err, "stats update failed, cache retains the result");
            }
        }
        stats
    }

    /// Mark the record banned: local cache immediately, backend best-effort
    pub async fn ban(&self, name: &str) {
        let mut stats = self.load_cache();
        stats.is_banned = true;
        self.save_cache(&stats);

        if let Some(backend) = &self.backend {
            #[derive(Serialize)]
            struct BanUpdate {
                is_banned: bool,
            }
            let query = format!("name=eq.{name}");
            if let Err(err) = backend
                .update("players", &query, &BanUpdate { is_banned: true })
                .await
            {
                warn!(%err, "ban sync failed, local ban stands");
            }
        }
    }
}

enum StatsCommand {
    Fetch { name: String },
    UpdateAfterMatch { name: String, kills: u32, deaths: u32, rewards: Rewards },
    Ban { name: String },
}

/// Handle to the background stats worker.
///
/// Commands never block; fetch results appear in the shared slot on some
/// later tick. Dropping the handle closes the channel and the worker winds
/// down on its own.
pub struct StatsService {
    tx: mpsc::UnboundedSender<StatsCommand>,
    latest: Arc<Mutex<Option<PlayerStats>>>,
}

impl StatsService {
    pub fn spawn(store: StatsStore) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<StatsCommand>();
        let latest: Arc<Mutex<Option<PlayerStats>>> = Arc::new(Mutex::new(None));
        let slot = latest.clone();

        thread::Builder::new()
            .name("stats-service".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(err) => {
                        warn!(%err, "stats runtime failed to start; progression is offline");
                        return;
                    }
                };
                runtime.block_on(async move {
                    while let Some(cmd) = rx.recv().await {
                        match cmd {
                            StatsCommand::Fetch { name } => {
                                let stats = store.get_stats(&name).await;
                                *slot.lock() = Some(stats);
                            }
                            StatsCommand::UpdateAfterMatch { name, kills, deaths, rewards } => {
                                let stats =
                                    store.update_after_match(&name, kills, deaths, rewards).await;
                                info!(
                                    name,
                                    level = stats.level,
                                    xp = stats.xp,
                                    "progression saved"
                                );
                                *slot.lock() = Some(stats);
                            }
                            StatsCommand::Ban { name } => {
                                store.ban(&name).await;
                                if let Some(stats) = slot.lock().as_mut() {
                                    stats.is_banned = true;
                                }
                            }
                        }
                    }
                });
            })
            .ok();

        Self { tx, latest }
    }

    pub fn request_stats(&self, name: &str) {
        let _ = self.tx.send(StatsCommand::Fetch { name: name.to_string() });
    }

    pub fn update_after_match(&self, name: &str, kills: u32, deaths: u32, rewards: Rewards) {
        let _ = self.tx.send(StatsCommand::UpdateAfterMatch {
            name: name.to_string(),
            kills,
            deaths,
            rewards,
        });
    }

    pub fn ban(&self, name: &str) {
        let _ = self.tx.send(StatsCommand::Ban { name: name.to_string() });
    }

    /// Latest fetched record, if any has arrived
    pub fn latest(&self) -> Option<PlayerStats> {
        self.latest.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewards_scale_with_kills_and_win() {
        assert_eq!(match_rewards(0, false), Rewards { xp: 0, coins: 0 });
        assert_eq!(match_rewards(4, false), Rewards { xp: 200, coins: 40 });
        assert_eq!(match_rewards(4, true), Rewards { xp: 700, coins: 140 });
    }

    #[test]
    fn xp_rolls_over_into_levels() {
        let mut stats = PlayerStats::default();
        apply_match_results(&mut stats, 2, 0, Rewards { xp: 1_100, coins: 0 });
        assert_eq!(stats.level, 2);
        assert_eq!(stats.xp, 100);
        assert_eq!(stats.total_kills, 2);
    }

    #[test]
    fn rollover_is_split_invariant() {
        // One big gain
        let mut once = PlayerStats::default();
        apply_match_results(&mut once, 0, 0, Rewards { xp: 7_300, coins: 0 });

        // Same gain split across many calls
        let mut split = PlayerStats::default();
        for _ in 0..73 {
            apply_match_results(&mut split, 0, 0, Rewards { xp: 100, coins: 0 });
        }

        assert_eq!(once.level, split.level);
        assert_eq!(once.xp, split.xp);
    }

    #[test]
    fn multi_level_gain_rolls_repeatedly() {
        let mut stats = PlayerStats::default();
        // 1000 clears level 1, 2000 clears level 2, 300 remains
        apply_match_results(&mut stats, 0, 0, Rewards { xp: 3_300, coins: 0 });
        assert_eq!(stats.level, 3);
        assert_eq!(stats.xp, 300);
    }

    #[test]
    fn ranks_follow_the_ladder() {
        assert_eq!(rank_for_level(1), "Bronze");
        assert_eq!(rank_for_level(5), "Silver");
        assert_eq!(rank_for_level(19), "Gold");
        assert_eq!(rank_for_level(20), "Platinum");
        assert_eq!(rank_for_level(40), "Diamond");
        assert_eq!(rank_for_level(250), "Elite");
    }

    #[test]
    fn rank_updates_with_level() {
        let mut stats = PlayerStats::default();
        apply_match_results(&mut stats, 0, 0, Rewards { xp: 15_000, coins: 0 });
        assert!(stats.level >= 5);
        assert_eq!(stats.rank, rank_for_level(stats.level));
    }

    #[test]
    fn offline_store_round_trips_through_the_cache() {
        let dir = std::env::temp_dir().join(format!("pixel_arena_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let store = StatsStore::new(None, dir.join("stats.json"));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let updated = runtime.block_on(store.update_after_match(
            "Tester",
            4,
            1,
            match_rewards(4, true),
        ));
        assert_eq!(updated.total_kills, 4);

        let fetched = runtime.block_on(store.get_stats("Tester"));
        assert_eq!(fetched.total_kills, 4);
        assert_eq!(fetched.xp, 700);

        runtime.block_on(store.ban("Tester"));
        let banned = runtime.block_on(store.get_stats("Tester"));
        assert!(banned.is_banned);

        std::fs::remove_dir_all(&dir).ok();
    }
}
