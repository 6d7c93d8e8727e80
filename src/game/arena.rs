//! Arena state and the authoritative tick
//!
//! One `Arena` is one match. The frame scheduler owns it, feeds it sampled
//! intents once per display refresh and reads the resulting snapshot; nothing
//! else mutates simulation state.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::game::anticheat::{BanReason, SpeedMonitor, Verdict};
use crate::game::bot;
use crate::game::combat::{Bullet, CombatSystem, WeaponStats};
use crate::game::constants::{
    BOT_NAMES, FIRE_SHAKE, FLASH_TICKS, KILL_SHAKE, MAX_ROUNDS, RECOIL_DECAY, RECOIL_KICK,
    ROUND_DURATION_SECS, ROUND_END_HOLD_SECS, SHAKE_DECAY,
};
use crate::game::effects::Effects;
use crate::game::map::{layout_for_round, Wall};
use crate::game::physics::{nominal_speed, ClassStats, PhysicsSystem};
use crate::game::spawn::SpawnPlanner;
use crate::game::{AimInput, ArenaOptions, ControlIntent, PlayerClass, PlayerId, Team};

/// One actor, human- or bot-controlled
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
    pub class: PlayerClass,
    pub is_bot: bool,
    pub skin_id: Option<String>,

    pub x: f32,
    pub y: f32,
    /// Facing angle in radians
    pub angle: f32,

    pub health: f32,
    pub max_health: f32,
    pub kills: u32,
    pub deaths: u32,

    /// Drives the idle/walk bob animation
    pub walk_cycle: f32,
    /// Muzzle kick offset, decays each tick
    pub recoil: f32,
    /// Damage flash ticks remaining
    pub flash_ticks: u32,
    /// Bot reload cooldown in ticks; human reload lives in the input sampler
    pub reload_ticks: u32,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: String,
        team: Team,
        class: PlayerClass,
        is_bot: bool,
        skin_id: Option<String>,
    ) -> Self {
        let stats = ClassStats::for_class(class);
        Self {
            id,
            name,
            team,
            class,
            is_bot,
            skin_id,
            x: 0.0,
            y: 0.0,
            angle: 0.0,
            health: stats.max_health,
            max_health: stats.max_health,
            kills: 0,
            deaths: 0,
            walk_cycle: 0.0,
            recoil: 0.0,
            flash_ticks: 0,
            reload_ticks: 0,
        }
    }

    /// A dead actor is inert until the next round respawns it
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Round-win bookkeeping across the match
#[derive(Debug, Clone, Copy)]
pub struct RoundState {
    pub wins_a: u32,
    pub wins_b: u32,
    /// 1-based round number
    pub current: u32,
    pub max: u32,
}

impl RoundState {
    /// Round wins needed to take the match
    pub fn majority(&self) -> u32 {
        self.max.div_ceil(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Playing,
    RoundEnded,
    /// Terminal; a new match needs a fresh arena
    MatchEnded,
}

/// Live simulation parameters.
///
/// `move_speed` is nominally constant; the anti-cheat monitor compares it
/// against the value captured at match start to detect external tampering.
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    pub move_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: nominal_speed(),
        }
    }
}

/// The full snapshot handed to the renderer each tick
pub struct ArenaState {
    pub players: Vec<Player>,
    pub bullets: Vec<Bullet>,
    pub walls: &'static [Wall],
    pub effects: Effects,
    /// Kill tally for the current round, used as the draw tie-break
    pub score_a: u32,
    pub score_b: u32,
    pub rounds: RoundState,
    pub status: MatchStatus,
    /// Seconds left on the round clock
    pub time_left: u32,
    /// Camera shake magnitude, decays multiplicatively
    pub shake: f32,
    pub tick: u64,
    pub tuning: Tuning,
}

impl ArenaState {
    pub fn alive_count(&self, team: Team) -> usize {
        self.players
            .iter()
            .filter(|p| p.team == team && p.is_alive())
            .count()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }
}

/// Events surfaced to the embedding host once per frame
#[derive(Debug, Clone)]
pub enum ArenaEvent {
    RoundStarted {
        round: u32,
    },
    RoundEnded {
        winner: Option<Team>,
    },
    MatchEnded {
        winner: Team,
        local_kills: u32,
        local_deaths: u32,
        local_won: bool,
    },
    /// The anti-cheat monitor escalated; play must halt
    PlayerBanned {
        name: String,
        reason: BanReason,
    },
}

/// The authoritative match instance
pub struct Arena {
    state: ArenaState,
    rng: ChaCha8Rng,
    monitor: SpeedMonitor,
    next_bullet_id: u64,
    /// Accumulates wall time for the 1 Hz round countdown
    second_accum: f32,
    /// Hold time left on the round-ended screen
    transition_left: f32,
    events: Vec<ArenaEvent>,
}

impl Arena {
    pub fn new(options: ArenaOptions) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
        let players = build_players(&options, &mut rng);

        let state = ArenaState {
            players,
            bullets: Vec::new(),
            walls: layout_for_round(1),
            effects: Effects::new(),
            score_a: 0,
            score_b: 0,
            rounds: RoundState {
                wins_a: 0,
                wins_b: 0,
                current: 1,
                max: MAX_ROUNDS,
            },
            status: MatchStatus::Playing,
            time_left: ROUND_DURATION_SECS,
            shake: 0.0,
            tick: 0,
            tuning: Tuning::default(),
        };

        // Baseline captured exactly once per match
        let monitor = SpeedMonitor::new(state.tuning.move_speed, (0.0, 0.0));

        let mut arena = Self {
            state,
            rng,
            monitor,
            next_bullet_id: 0,
            second_accum: 0.0,
            transition_left: 0.0,
            events: Vec::new(),
        };
        arena.start_round(1);
        arena
    }

    pub fn state(&self) -> &ArenaState {
        &self.state
    }

    pub fn local_player(&self) -> Option<&Player> {
        self.state.player(PlayerId::LOCAL)
    }

    /// Advance one frame. `dt` is wall-clock seconds since the previous
    /// frame; `intents` carries the sampled input for the local actors.
    ///
    /// Returns the events produced this frame, drained.
    pub fn frame(&mut self, dt: f32, intents: &[(PlayerId, ControlIntent)]) -> Vec<ArenaEvent> {
        match self.state.status {
            MatchStatus::Playing => {
                // The countdown is its own 1 Hz cadence, run strictly before
                // the simulation tick on the same queue
                self.second_accum += dt;
                while self.second_accum >= 1.0 && self.state.status == MatchStatus::Playing {
                    self.second_accum -= 1.0;
                    self.countdown_second();
                }
                if self.state.status == MatchStatus::Playing {
                    self.run_tick(intents);
                }
            }
            MatchStatus::RoundEnded => {
                self.transition_left -= dt;
                if self.transition_left <= 0.0 {
                    let next = self.state.rounds.current + 1;
                    self.start_round(next);
                }
            }
            MatchStatus::MatchEnded => {}
        }

        std::mem::take(&mut self.events)
    }

    /// One second off the round clock; at zero the round ends as a draw,
    /// resolved by the current-round kill tally
    fn countdown_second(&mut self) {
        if self.state.time_left <= 1 {
            self.state.time_left = 0;
            let winner = if self.state.score_a > self.state.score_b {
                Some(Team::A)
            } else if self.state.score_b > self.state.score_a {
                Some(Team::B)
            } else {
                None
            };
            self.finish_round(winner);
        } else {
            self.state.time_left -= 1;
        }
    }

    fn run_tick(&mut self, intents: &[(PlayerId, ControlIntent)]) {
        self.state.tick += 1;
        self.state.shake *= SHAKE_DECAY;

        // Integrity check runs against the local actor before any of its
        // movement is applied
        self.observe_local();
        if self.state.status != MatchStatus::Playing {
            return;
        }

        for (id, intent) in intents {
            self.apply_intent(*id, intent);
        }

        self.resolve_player_overlap();
        self.update_players();
        self.update_bullets();
        self.state.effects.update();
        self.check_round_end();
    }

    fn observe_local(&mut self) {
        let Some(local) = self.state.player(PlayerId::LOCAL) else {
            return;
        };
        if !local.is_alive() {
            return;
        }
        let pos = (local.x, local.y);
        let mult = ClassStats::for_class(local.class).speed_mult;
        let name = local.name.clone();

        if let Verdict::Banned(reason) = self.monitor.observe(self.state.tuning.move_speed, mult, pos)
        {
            warn!(player = %name, ?reason, "integrity check failed, terminating match");
            self.state.status = MatchStatus::MatchEnded;
            self.events.push(ArenaEvent::PlayerBanned { name, reason });
        }
    }

    /// Apply one local actor's sampled intent: movement with wall sliding,
    /// aim, and a fire request already gated by the sampler's reload clock
    fn apply_intent(&mut self, id: PlayerId, intent: &ControlIntent) {
        let Some(idx) = self.state.players.iter().position(|p| p.id == id) else {
            return;
        };
        if !self.state.players[idx].is_alive() {
            return;
        }

        let speed = {
            let p = &self.state.players[idx];
            ClassStats::for_class(p.class).speed(self.state.tuning.move_speed)
        };

        let (dx, dy) = intent.move_dir;
        let moving = dx != 0.0 || dy != 0.0;
        {
            let p = &self.state.players[idx];
            let (nx, ny) =
                PhysicsSystem::move_with_sliding(p.x, p.y, dx * speed, dy * speed, self.state.walls);
            let p = &mut self.state.players[idx];
            p.x = nx;
            p.y = ny;
            if moving {
                p.walk_cycle += 0.35;
            } else {
                p.walk_cycle *= 0.7;
            }
            match intent.aim {
                AimInput::Absolute(a) => p.angle = a,
                AimInput::Turn(delta) => p.angle += delta,
            }
        }

        if intent.fire {
            self.fire_bullet(idx, false);
        }
    }

    /// Every unordered pair of living actors closer than two radii gets
    /// pushed apart; each half is vetoed if it would end inside a wall
    fn resolve_player_overlap(&mut self) {
        let positions: Vec<(usize, f32, f32)> = self
            .state
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive())
            .map(|(i, p)| (i, p.x, p.y))
            .collect();

        for a in 0..positions.len() {
            for b in (a + 1)..positions.len() {
                let (i, x1, y1) = positions[a];
                let (j, x2, y2) = positions[b];
                if !PhysicsSystem::actors_overlap(x1, y1, x2, y2) {
                    continue;
                }
                let ((nx1, ny1), (nx2, ny2)) = PhysicsSystem::push_apart(x1, y1, x2, y2);
                if !PhysicsSystem::hits_any_wall(nx1, ny1, self.state.walls) {
                    self.state.players[i].x = nx1;
                    self.state.players[i].y = ny1;
                }
                if !PhysicsSystem::hits_any_wall(nx2, ny2, self.state.walls) {
                    self.state.players[j].x = nx2;
                    self.state.players[j].y = ny2;
                }
            }
        }
    }

    /// Transient decay for everyone, then bot decisions
    fn update_players(&mut self) {
        for p in &mut self.state.players {
            p.recoil *= RECOIL_DECAY;
            p.flash_ticks = p.flash_ticks.saturating_sub(1);
            p.reload_ticks = p.reload_ticks.saturating_sub(1);
        }

        for idx in 0..self.state.players.len() {
            let p = &self.state.players[idx];
            if !p.is_bot || !p.is_alive() {
                continue;
            }
            let team = p.team;
            let enemies: Vec<(f32, f32)> = self
                .state
                .players
                .iter()
                .filter(|e| e.team != team && e.is_alive())
                .map(|e| (e.x, e.y))
                .collect();

            let decision = bot::drive(
                &self.state.players[idx],
                &enemies,
                self.state.walls,
                &mut self.rng,
            );

            let p = &mut self.state.players[idx];
            p.x = decision.x;
            p.y = decision.y;
            p.angle = decision.angle;
            p.walk_cycle += decision.walk_delta;

            // Bots only fire at someone, and only once reloaded
            if decision.fire && !enemies.is_empty() && self.state.players[idx].reload_ticks == 0 {
                self.fire_bullet(idx, true);
            }
        }
    }

    fn fire_bullet(&mut self, shooter_idx: usize, role_scaled: bool) {
        let (id, team, x, y, angle, class) = {
            let p = &self.state.players[shooter_idx];
            (p.id, p.team, p.x, p.y, p.angle, p.class)
        };
        let weapon = WeaponStats::for_class(class);
        let damage = if role_scaled { weapon.bot_damage } else { weapon.damage };

        self.next_bullet_id += 1;
        let bullet = Bullet::fired(
            self.next_bullet_id,
            id,
            team,
            x,
            y,
            angle,
            damage,
            weapon.bullet_speed,
        );
        let (mx, my) = (bullet.x, bullet.y);
        self.state.bullets.push(bullet);

        let p = &mut self.state.players[shooter_idx];
        p.recoil = RECOIL_KICK;
        if role_scaled {
            p.reload_ticks = weapon.reload_ticks();
        }

        self.state.effects.emit_shell(&mut self.rng, x, y, angle);
        if !role_scaled {
            // Humans get the full muzzle treatment
            self.state.effects.emit_sparks(&mut self.rng, mx, my, 18);
            self.state.shake = FIRE_SHAKE;
        }
    }

    /// Advance all bullets and resolve removals in a fixed order: wall
    /// impact, then enemy hit, then world bounds. Exactly one cause per
    /// bullet per tick.
    fn update_bullets(&mut self) {
        struct Hit {
            victim: usize,
            shooter: PlayerId,
            damage: f32,
            x: f32,
            y: f32,
            vx: f32,
            vy: f32,
        }

        let mut expired: Vec<usize> = Vec::new();
        let mut hits: Vec<Hit> = Vec::new();

        for idx in 0..self.state.bullets.len() {
            self.state.bullets[idx].advance();
            let b = &self.state.bullets[idx];

            if b.inside_wall(self.state.walls) {
                let (x, y) = (b.x, b.y);
                expired.push(idx);
                self.state.effects.emit_sparks(&mut self.rng, x, y, 15);
                self.state.effects.add_bullet_hole(&mut self.rng, x, y);
                continue;
            }

            let victim = self
                .state
                .players
                .iter()
                .position(|p| p.team != b.team && p.is_alive() && b.strikes(p.x, p.y));
            if let Some(victim) = victim {
                hits.push(Hit {
                    victim,
                    shooter: b.owner,
                    damage: b.damage,
                    x: b.x,
                    y: b.y,
                    vx: b.vx,
                    vy: b.vy,
                });
                expired.push(idx);
                continue;
            }

            if !b.in_bounds() {
                expired.push(idx);
            }
        }

        for hit in hits {
            let (new_health, killed) = {
                let victim = &mut self.state.players[hit.victim];
                let (h, k) = CombatSystem::apply_damage(victim.health, hit.damage);
                victim.health = h;
                victim.flash_ticks = FLASH_TICKS;
                (h, k)
            };
            debug_assert!(new_health >= 0.0);

            self.state
                .effects
                .emit_blood(&mut self.rng, hit.x, hit.y, hit.vx * 0.3, hit.vy * 0.3, 30);
            let pool = 30.0 + self.rng.gen::<f32>() * 40.0;
            self.state
                .effects
                .add_blood_pool(&mut self.rng, hit.x, hit.y, pool);

            if killed {
                let (vx, vy, victim_team) = {
                    let victim = &mut self.state.players[hit.victim];
                    victim.deaths += 1;
                    (victim.x, victim.y, victim.team)
                };
                match victim_team.opponent() {
                    Team::A => self.state.score_a += 1,
                    Team::B => self.state.score_b += 1,
                }
                if let Some(shooter) = self.state.players.iter_mut().find(|p| p.id == hit.shooter)
                {
                    shooter.kills += 1;
                }
                self.state.shake = KILL_SHAKE;
                for _ in 0..10 {
                    let ox = (self.rng.gen::<f32>() - 0.5) * 50.0;
                    let oy = (self.rng.gen::<f32>() - 0.5) * 50.0;
                    self.state
                        .effects
                        .add_blood_pool(&mut self.rng, vx + ox, vy + oy, 50.0);
                }
            }
        }

        expired.sort_unstable();
        expired.dedup();
        for idx in expired.into_iter().rev() {
            self.state.bullets.remove(idx);
        }
    }

    /// A team wiped out while the round is live ends the round for the
    /// opposing team
    fn check_round_end(&mut self) {
        if self.state.status != MatchStatus::Playing {
            return;
        }
        if self.state.alive_count(Team::A) == 0 {
            self.finish_round(Some(Team::B));
        } else if self.state.alive_count(Team::B) == 0 {
            self.finish_round(Some(Team::A));
        }
    }

    fn finish_round(&mut self, winner: Option<Team>) {
        if self.state.status != MatchStatus::Playing {
            return;
        }

        match winner {
            Some(Team::A) => self.state.rounds.wins_a += 1,
            Some(Team::B) => self.state.rounds.wins_b += 1,
            None => {}
        }

        info!(
            round = self.state.rounds.current,
            winner = ?winner,
            wins_a = self.state.rounds.wins_a,
            wins_b = self.state.rounds.wins_b,
            "round over"
        );
        self.events.push(ArenaEvent::RoundEnded { winner });

        let rounds = self.state.rounds;
        let majority = rounds.majority();
        let match_over = rounds.wins_a >= majority
            || rounds.wins_b >= majority
            || rounds.current >= rounds.max;

        if match_over {
            self.state.status = MatchStatus::MatchEnded;
            let match_winner = if rounds.wins_a > rounds.wins_b {
                Team::A
            } else {
                Team::B
            };
            let (local_kills, local_deaths, local_team) = self
                .local_player()
                .map(|p| (p.kills, p.deaths, p.team))
                .unwrap_or((0, 0, Team::A));
            info!(winner = ?match_winner, "match over");
            self.events.push(ArenaEvent::MatchEnded {
                winner: match_winner,
                local_kills,
                local_deaths,
                local_won: local_team == match_winner,
            });
        } else {
            self.state.status = MatchStatus::RoundEnded;
            self.transition_left = ROUND_END_HOLD_SECS;
        }
    }

    /// Reset the arena for a new round: rotate the layout, respawn everyone
    /// at full health, keep cumulative kills and deaths
    fn start_round(&mut self, round: u32) {
        self.state.rounds.current = round;
        self.state.walls = layout_for_round(round);
        self.state.bullets.clear();
        self.state.effects.clear();
        self.state.score_a = 0;
        self.state.score_b = 0;
        self.state.time_left = ROUND_DURATION_SECS;
        self.state.shake = 0.0;
        self.second_accum = 0.0;

        for idx in 0..self.state.players.len() {
            let team = self.state.players[idx].team;
            let (x, y) = SpawnPlanner::find_spawn(&mut self.rng, team, self.state.walls);
            let p = &mut self.state.players[idx];
            p.x = x;
            p.y = y;
            p.angle = match team {
                Team::A => 0.0,
                Team::B => std::f32::consts::PI,
            };
            p.health = p.max_health;
            p.recoil = 0.0;
            p.flash_ticks = 0;
            p.walk_cycle = 0.0;
            p.reload_ticks = 0;
        }

        if let Some(local) = self.state.player(PlayerId::LOCAL) {
            self.monitor.reset_position((local.x, local.y));
        }

        self.state.status = MatchStatus::Playing;
        info!(round, layout = ((round - 1) as usize % crate::game::map::LAYOUT_COUNT), "round start");
        self.events.push(ArenaEvent::RoundStarted { round });
    }
}

/// Build the initial player list from a roster snapshot or the match mode
fn build_players(options: &ArenaOptions, rng: &mut ChaCha8Rng) -> Vec<Player> {
    let mut players = Vec::new();
    let mut bot_names: Vec<&str> = BOT_NAMES.to_vec();
    bot_names.shuffle(rng);
    let mut next_bot_id = 2u32;
    let mut next_name = |fallback: String| -> String {
        bot_names
            .pop()
            .map(str::to_string)
            .unwrap_or(fallback)
    };

    if let Some(roster) = &options.roster {
        // Private match: the roster is authoritative; everyone who is not
        // the local human plays as a bot
        for entry in roster {
            let is_local = entry.name == options.player_name;
            if is_local {
                players.push(Player::new(
                    PlayerId::LOCAL,
                    entry.name.clone(),
                    entry.team,
                    options.class,
                    false,
                    options.skin_id.clone(),
                ));
            } else {
                let id = PlayerId(next_bot_id);
                next_bot_id += 1;
                players.push(Player::new(
                    id,
                    entry.name.clone(),
                    entry.team,
                    PlayerClass::Assault,
                    true,
                    None,
                ));
            }
        }
        return players;
    }

    let (allies, enemies) = options.mode.team_sizes();

    players.push(Player::new(
        PlayerId::LOCAL,
        options.player_name.clone(),
        Team::A,
        options.class,
        false,
        options.skin_id.clone(),
    ));

    if options.mode.is_local_duel() {
        players.push(Player::new(
            PlayerId::LOCAL_SECOND,
            "Player 2".to_string(),
            Team::B,
            PlayerClass::Assault,
            false,
            None,
        ));
        return players;
    }

    for i in 1..allies {
        let id = PlayerId(next_bot_id);
        next_bot_id += 1;
        let name = next_name(format!("Unit_A{i}"));
        players.push(Player::new(id, name, Team::A, PlayerClass::Assault, true, None));
    }
    for i in 0..enemies {
        let id = PlayerId(next_bot_id);
        next_bot_id += 1;
        let name = next_name(format!("Unit_B{i}"));
        players.push(Player::new(id, name, Team::B, PlayerClass::Assault, true, None));
    }

    players
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MatchMode;

    const DT: f32 = 1.0 / 60.0;

    fn duel_arena() -> Arena {
        Arena::new(ArenaOptions {
            mode: MatchMode::LocalDuel,
            player_name: "Tester".to_string(),
            class: PlayerClass::Assault,
            skin_id: None,
            roster: None,
            seed: 42,
        })
    }

    /// Place both duelists on ground that is open in every catalog layout,
    /// far enough apart that push-apart never interferes
    fn stage_duel(arena: &mut Arena) {
        let walls_free = |x: f32, y: f32, a: &Arena| {
            !PhysicsSystem::hits_any_wall(x, y, a.state.walls)
        };
        assert!(walls_free(100.0, 300.0, arena));
        assert!(walls_free(1100.0, 300.0, arena));
        arena.state.players[0].x = 100.0;
        arena.state.players[0].y = 300.0;
        arena.state.players[0].angle = 0.0;
        arena.state.players[1].x = 1100.0;
        arena.state.players[1].y = 300.0;
        arena.monitor.reset_position((100.0, 300.0));
    }

    fn tick(arena: &mut Arena) -> Vec<ArenaEvent> {
        arena.frame(DT, &[])
    }

    #[test]
    fn four_hits_win_the_round_for_the_attacker() {
        let mut arena = duel_arena();
        stage_duel(&mut arena);

        let mut events = Vec::new();
        for volley in 0..4 {
            // Aimed point-blank so the bullet lands next tick
            let (vx, vy) = (arena.state.players[1].x, arena.state.players[1].y);
            arena.state.bullets.push(Bullet {
                id: 1000 + volley,
                owner: PlayerId::LOCAL,
                team: Team::A,
                x: vx - 20.0,
                y: vy,
                vx: 10.0,
                vy: 0.0,
                damage: 25.0,
                age: 0,
            });
            events.extend(tick(&mut arena));
        }

        let attacker = arena.state.player(PlayerId::LOCAL).unwrap();
        let defender = arena.state.player(PlayerId::LOCAL_SECOND).unwrap();
        assert_eq!(defender.health, 0.0);
        assert_eq!(defender.deaths, 1);
        assert_eq!(attacker.kills, 1);
        assert_eq!(arena.state.rounds.wins_a, 1);
        assert_eq!(arena.state.rounds.wins_b, 0);
        assert!(events
            .iter()
            .any(|e| matches!(e, ArenaEvent::RoundEnded { winner: Some(Team::A) })));
        assert_eq!(arena.state.status, MatchStatus::RoundEnded);
    }

    #[test]
    fn dead_players_are_inert_and_untargetable() {
        let mut arena = duel_arena();
        stage_duel(&mut arena);
        arena.state.players[1].health = 0.0;
        arena.state.players[1].deaths = 1;

        // A bullet flying straight through the corpse keeps going
        arena.state.bullets.push(Bullet {
            id: 1,
            owner: PlayerId::LOCAL,
            team: Team::A,
            x: arena.state.players[1].x - 20.0,
            y: arena.state.players[1].y,
            vx: 10.0,
            vy: 0.0,
            damage: 25.0,
            age: 0,
        });
        arena.update_bullets();
        assert_eq!(arena.state.bullets.len(), 1, "corpse must not absorb bullets");
        assert_eq!(arena.state.players[1].deaths, 1);
        assert_eq!(arena.state.alive_count(Team::B), 0);
    }

    #[test]
    fn bullet_removal_has_exactly_one_cause() {
        let mut arena = duel_arena();
        stage_duel(&mut arena);

        // Defender pressed against a wall edge: bullet enters the wall on
        // the same tick it would reach the hit radius. Wall wins.
        let wall = arena.state.walls[0];
        arena.state.players[1].x = wall.x - 10.0;
        arena.state.players[1].y = wall.y + wall.h / 2.0;
        arena.state.bullets.push(Bullet {
            id: 1,
            owner: PlayerId::LOCAL,
            team: Team::A,
            x: wall.x - 4.0,
            y: wall.y + wall.h / 2.0,
            vx: 10.0,
            vy: 0.0,
            damage: 25.0,
            age: 0,
        });

        let health_before = arena.state.players[1].health;
        arena.update_bullets();
        assert!(arena.state.bullets.is_empty());
        assert_eq!(arena.state.players[1].health, health_before);
        assert_eq!(arena.state.players[1].deaths, 0);
    }

    #[test]
    fn timeout_draw_resolves_by_round_score() {
        let mut arena = duel_arena();
        stage_duel(&mut arena);
        arena.state.score_a = 2;
        arena.state.score_b = 3;
        arena.state.time_left = 1;

        let events = arena.frame(1.0, &[]);
        assert_eq!(arena.state.time_left, 0);
        assert!(events
            .iter()
            .any(|e| matches!(e, ArenaEvent::RoundEnded { winner: Some(Team::B) })));
        assert_eq!(arena.state.rounds.wins_b, 1);
        assert_eq!(arena.state.rounds.wins_a, 0);
    }

    #[test]
    fn true_draw_credits_nobody() {
        let mut arena = duel_arena();
        stage_duel(&mut arena);
        arena.state.time_left = 1;

        let events = arena.frame(1.0, &[]);
        assert!(events
            .iter()
            .any(|e| matches!(e, ArenaEvent::RoundEnded { winner: None })));
        assert_eq!(arena.state.rounds.wins_a, 0);
        assert_eq!(arena.state.rounds.wins_b, 0);
        assert_eq!(arena.state.status, MatchStatus::RoundEnded);
    }

    #[test]
    fn round_transition_respawns_and_rotates_layout() {
        let mut arena = duel_arena();
        stage_duel(&mut arena);
        arena.state.players[0].kills = 3;
        arena.state.players[1].health = 0.0;
        arena.state.players[1].deaths = 1;
        tick(&mut arena);
        assert_eq!(arena.state.status, MatchStatus::RoundEnded);
        let first_walls = arena.state.walls;

        // Hold expires, next round begins
        let events = arena.frame(ROUND_END_HOLD_SECS + 0.1, &[]);
        assert!(events
            .iter()
            .any(|e| matches!(e, ArenaEvent::RoundStarted { round: 2 })));
        assert_eq!(arena.state.status, MatchStatus::Playing);
        assert_ne!(arena.state.walls, first_walls);
        assert_eq!(arena.state.time_left, ROUND_DURATION_SECS);

        // Health and transients reset, cumulative counters survive
        let p0 = &arena.state.players[0];
        let p1 = &arena.state.players[1];
        assert_eq!(p0.kills, 3);
        assert_eq!(p1.deaths, 1);
        assert_eq!(p1.health, p1.max_health);
        assert_eq!(arena.state.score_a, 0);
    }

    #[test]
    fn match_ends_at_majority_and_pays_out_once() {
        let mut arena = duel_arena();
        let mut match_ends = 0;
        for round in 0..4 {
            stage_duel(&mut arena);
            arena.state.players[0].kills += 1;
            arena.state.players[1].health = 0.0;
            let events = tick(&mut arena);
            for e in &events {
                if let ArenaEvent::MatchEnded { winner, local_won, .. } = e {
                    match_ends += 1;
                    assert_eq!(*winner, Team::A);
                    assert!(*local_won);
                    assert_eq!(round, 3, "match must end exactly at 4 round wins");
                }
            }
            if arena.state.status == MatchStatus::RoundEnded {
                arena.frame(ROUND_END_HOLD_SECS + 0.1, &[]);
            }
        }
        assert_eq!(match_ends, 1);
        assert_eq!(arena.state.rounds.wins_a, 4);
        assert_eq!(arena.state.status, MatchStatus::MatchEnded);

        // Terminal: further frames do nothing
        let events = arena.frame(1.0, &[]);
        assert!(events.is_empty());
    }

    #[test]
    fn all_draw_match_still_ends_by_max_rounds() {
        let mut arena = duel_arena();
        let mut ended = false;
        for _ in 0..MAX_ROUNDS {
            stage_duel(&mut arena);
            arena.state.time_left = 1;
            let events = arena.frame(1.0, &[]);
            if events
                .iter()
                .any(|e| matches!(e, ArenaEvent::MatchEnded { .. }))
            {
                ended = true;
                break;
            }
            arena.frame(ROUND_END_HOLD_SECS + 0.1, &[]);
        }
        assert!(ended, "an all-draw match must terminate at max rounds");
        assert_eq!(arena.state.rounds.current, MAX_ROUNDS);
        assert_eq!(arena.state.rounds.wins_a, 0);
        assert_eq!(arena.state.rounds.wins_b, 0);
    }

    #[test]
    fn wiping_team_a_credits_team_b_only() {
        let mut arena = duel_arena();
        stage_duel(&mut arena);
        let wins_a_before = arena.state.rounds.wins_a;
        arena.state.players[0].health = 0.0;
        let events = tick(&mut arena);
        assert!(events
            .iter()
            .any(|e| matches!(e, ArenaEvent::RoundEnded { winner: Some(Team::B) })));
        assert_eq!(arena.state.rounds.wins_b, 1);
        assert_eq!(arena.state.rounds.wins_a, wins_a_before);
    }

    #[test]
    fn push_apart_separates_overlapping_players() {
        let mut arena = duel_arena();
        stage_duel(&mut arena);
        arena.state.players[1].x = arena.state.players[0].x + 10.0;
        arena.state.players[1].y = arena.state.players[0].y;
        arena.resolve_player_overlap();
        let p0 = &arena.state.players[0];
        let p1 = &arena.state.players[1];
        assert!(!PhysicsSystem::actors_overlap(p0.x, p0.y, p1.x, p1.y));
    }

    #[test]
    fn speed_hack_on_local_actor_terminates_the_match() {
        let mut arena = duel_arena();
        stage_duel(&mut arena);
        // Burn through the warm-up window first
        for _ in 0..crate::game::constants::ANTICHEAT_WARMUP_TICKS {
            tick(&mut arena);
        }
        let mut banned = 0;
        for _ in 0..10 {
            let p = &mut arena.state.players[0];
            p.x += 400.0;
            p.x = p.x.min(1100.0);
            p.y += 300.0;
            p.y = p.y.rem_euclid(750.0).max(40.0);
            for e in tick(&mut arena) {
                if matches!(e, ArenaEvent::PlayerBanned { .. }) {
                    banned += 1;
                }
            }
            if arena.state.status == MatchStatus::MatchEnded {
                break;
            }
        }
        assert_eq!(banned, 1, "ban must fire exactly once");
        assert_eq!(arena.state.status, MatchStatus::MatchEnded);
    }

    #[test]
    fn tampered_speed_constant_bans_without_warmup() {
        let mut arena = duel_arena();
        stage_duel(&mut arena);
        arena.state.tuning.move_speed *= 2.0;
        let events = tick(&mut arena);
        assert!(events.iter().any(|e| matches!(
            e,
            ArenaEvent::PlayerBanned { reason: BanReason::Tampering, .. }
        )));
        assert_eq!(arena.state.status, MatchStatus::MatchEnded);
    }

    #[test]
    fn local_duel_builds_two_humans_on_opposite_teams() {
        let arena = duel_arena();
        let p0 = arena.state.player(PlayerId::LOCAL).unwrap();
        let p1 = arena.state.player(PlayerId::LOCAL_SECOND).unwrap();
        assert!(!p0.is_bot && !p1.is_bot);
        assert_eq!(p0.team, Team::A);
        assert_eq!(p1.team, Team::B);
    }

    #[test]
    fn skirmish_fills_teams_with_bots() {
        let arena = Arena::new(ArenaOptions {
            mode: MatchMode::Skirmish { allies: 1, enemies: 5 },
            player_name: "Tester".to_string(),
            class: PlayerClass::Sniper,
            skin_id: None,
            roster: None,
            seed: 7,
        });
        assert_eq!(arena.state.players.len(), 6);
        assert_eq!(arena.state.alive_count(Team::A), 1);
        assert_eq!(arena.state.alive_count(Team::B), 5);
        assert!(arena.state.players.iter().skip(1).all(|p| p.is_bot));
        // Bot names come from the fixed pool, no duplicates
        let mut names: Vec<&str> = arena.state.players[1..]
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn roster_snapshot_seeds_a_private_match() {
        use uuid::Uuid;
        let roster = vec![
            crate::game::RosterPlayer {
                id: Uuid::new_v4(),
                name: "Tester".to_string(),
                team: Team::B,
            },
            crate::game::RosterPlayer {
                id: Uuid::new_v4(),
                name: "Rival".to_string(),
                team: Team::A,
            },
        ];
        let arena = Arena::new(ArenaOptions {
            mode: MatchMode::Skirmish { allies: 1, enemies: 1 },
            player_name: "Tester".to_string(),
            class: PlayerClass::Tank,
            skin_id: Some("phantom".to_string()),
            roster: Some(roster),
            seed: 7,
        });
        let local = arena.state.player(PlayerId::LOCAL).unwrap();
        assert_eq!(local.team, Team::B);
        assert_eq!(local.class, PlayerClass::Tank);
        assert!(!local.is_bot);
        let other = arena.state.players.iter().find(|p| p.name == "Rival").unwrap();
        assert!(other.is_bot);
        assert_eq!(other.team, Team::A);
    }

    #[test]
    fn spawns_are_collision_free_every_round() {
        let mut arena = Arena::new(ArenaOptions {
            mode: MatchMode::Skirmish { allies: 5, enemies: 5 },
            player_name: "Tester".to_string(),
            class: PlayerClass::Assault,
            skin_id: None,
            roster: None,
            seed: 11,
        });
        for round in 1..=5 {
            arena.start_round(round);
            for p in &arena.state.players {
                assert!(
                    !PhysicsSystem::hits_any_wall(p.x, p.y, arena.state.walls),
                    "{} spawned inside a wall on round {round}",
                    p.name
                );
            }
        }
    }

    #[test]
    fn human_intent_moves_and_fires() {
        let mut arena = duel_arena();
        stage_duel(&mut arena);
        let before = (arena.state.players[0].x, arena.state.players[0].y);
        let intent = ControlIntent {
            move_dir: (1.0, 0.0),
            aim: AimInput::Absolute(0.0),
            fire: true,
        };
        arena.frame(DT, &[(PlayerId::LOCAL, intent)]);
        let p = arena.state.player(PlayerId::LOCAL).unwrap();
        assert!(p.x > before.0);
        assert_eq!(p.y, before.1);
        assert!(p.recoil > 0.0);
        assert_eq!(arena.state.bullets.len(), 1);
        assert_eq!(arena.state.bullets[0].team, Team::A);
    }
}
