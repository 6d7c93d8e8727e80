//! Frame scheduling and screen states
//!
//! `ArenaApp` owns the single live arena, the input sampler and the stats
//! service handle. Each display refresh drives exactly one pass of
//! input -> simulation -> events -> paint; nothing mutates simulation state
//! from outside this loop. Quitting tears the loop down deterministically:
//! the service channel closes and any late backend result is a no-op.

use macroquad::prelude::{get_frame_time, is_key_pressed, next_frame, KeyCode};
use tracing::info;

use crate::config::Config;
use crate::game::{Arena, ArenaEvent, ArenaOptions};
use crate::input::InputSampler;
use crate::render::{self, Renderer};
use crate::store::{match_rewards, StatsBackend, StatsService, StatsStore};
use crate::util::time::unix_millis;

/// Seconds the boot screen takes to fill its bar
const LOADING_SECS: f32 = 0.6;
/// Seconds an announcement stays on screen
const ANNOUNCE_SECS: f32 = 1.2;

enum Screen {
    /// Warm-up: no simulation, just the progress bar and a tip
    Loading { progress: f32, tip: &'static str },
    Arena,
    /// Terminal denial state after an integrity ban
    Denied,
}

pub struct ArenaApp {
    arena: Arena,
    input: InputSampler,
    renderer: Renderer,
    stats: StatsService,
    screen: Screen,
    player_name: String,
    announcement: String,
    announce_left: f32,
    /// Queued follow-up announcement ("ENGAGE" after the round banner)
    pending_announcement: Option<String>,
}

impl ArenaApp {
    pub fn new(config: &Config) -> Self {
        let backend = match (&config.stats_api_url, &config.stats_api_key) {
            (Some(url), Some(key)) => Some(StatsBackend::new(url.clone(), key.clone())),
            _ => None,
        };
        let stats = StatsService::spawn(StatsStore::new(backend, config.stats_cache_path.clone()));
        // Kick off the fetch now; the result lands in the slot and is
        // consumed on a later tick (ban screening included)
        stats.request_stats(&config.player_name);

        let seed = unix_millis();
        let arena = Arena::new(ArenaOptions {
            mode: config.match_mode,
            player_name: config.player_name.clone(),
            class: config.player_class,
            skin_id: config.equipped_skin.clone(),
            roster: None,
            seed,
        });

        let tip_idx = (seed % crate::game::constants::TACTICAL_TIPS.len() as u64) as usize;

        Self {
            arena,
            input: InputSampler::new(config.match_mode),
            renderer: Renderer::new(),
            stats,
            screen: Screen::Loading {
                progress: 0.0,
                tip: crate::game::constants::TACTICAL_TIPS[tip_idx],
            },
            player_name: config.player_name.clone(),
            announcement: String::new(),
            announce_left: 0.0,
            pending_announcement: None,
        }
    }

    /// Run until the player quits. One iteration per display refresh.
    pub async fn run(mut self) {
        loop {
            if is_key_pressed(KeyCode::Escape) {
                info!("match torn down");
                break;
            }
            let dt = get_frame_time();
            self.frame(dt);
            next_frame().await;
        }
        // Dropping self closes the stats channel; the worker drains and
        // exits without touching anything of ours
    }

    fn frame(&mut self, dt: f32) {
        match &mut self.screen {
            Screen::Loading { progress, tip } => {
                *progress += dt / LOADING_SECS;
                let (p, t) = (*progress, *tip);
                if p >= 1.0 {
                    self.screen = Screen::Arena;
                    self.announce(format!("ROUND {}", self.arena.state().rounds.current));
                    self.pending_announcement = Some("ENGAGE".to_string());
                } else {
                    render::draw_loading(p, t);
                }
            }
            Screen::Denied => {
                render::draw_denied();
            }
            Screen::Arena => {
                // A banned record fetched from the backend blocks play too
                if self.stats.latest().is_some_and(|s| s.is_banned) {
                    self.screen = Screen::Denied;
                    return;
                }

                let intents = self.input.sample(self.arena.state());
                let events = self.arena.frame(dt, &intents);
                self.handle_events(events);

                if matches!(self.screen, Screen::Denied) {
                    render::draw_denied();
                    return;
                }

                self.tick_announcement(dt);
                self.renderer.draw(self.arena.state());
                render::draw_hud(self.arena.state(), &self.announcement);
            }
        }
    }

    fn handle_events(&mut self, events: Vec<ArenaEvent>) {
        for event in events {
            match event {
                ArenaEvent::RoundStarted { round } => {
                    self.announce(format!("ROUND {round}"));
                    self.pending_announcement = Some("ENGAGE".to_string());
                }
                ArenaEvent::RoundEnded { winner } => {
                    match winner {
                        Some(team) => self.announce(format!("TEAM {} VICTORY", team.callsign())),
                        None => self.announce("STALEMATE".to_string()),
                    }
                    self.pending_announcement = None;
                }
                ArenaEvent::MatchEnded { winner, local_kills, local_deaths, local_won } => {
                    self.announce(if local_won {
                        "MISSION ACCOMPLISHED".to_string()
                    } else {
                        format!("TEAM {} TAKES THE MATCH", winner.callsign())
                    });
                    self.pending_announcement = None;

                    // Payout fires exactly once, from the terminal transition
                    let rewards = match_rewards(local_kills, local_won);
                    self.stats.update_after_match(
                        &self.player_name,
                        local_kills,
                        local_deaths,
                        rewards,
                    );
                }
                ArenaEvent::PlayerBanned { name, reason } => {
                    info!(%name, ?reason, "enforcing ban");
                    self.stats.ban(&name);
                    self.screen = Screen::Denied;
                }
            }
        }
    }

    fn announce(&mut self, text: String) {
        self.announcement = text;
        self.announce_left = ANNOUNCE_SECS;
    }

    fn tick_announcement(&mut self, dt: f32) {
        if self.announce_left > 0.0 {
            self.announce_left -= dt;
            if self.announce_left <= 0.0 {
                self.announcement = match self.pending_announcement.take() {
                    Some(next) => {
                        self.announce_left = ANNOUNCE_SECS;
                        next
                    }
                    None => String::new(),
                };
            }
        }
    }
}
