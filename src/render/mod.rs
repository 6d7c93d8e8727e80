//! Snapshot painter
//!
//! A pure read of the arena state into draw calls, in a fixed order: shake
//! offset, background grid, decals, particles, walls, bullet trails, living
//! actors, then the scanline/vignette overlay. Every entity list is walked
//! defensively; a dead actor is never painted.

use macroquad::prelude::*;
use macroquad::rand::gen_range;

use crate::game::combat::Bullet;
use crate::game::constants::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::game::effects::{DecalKind, ParticleKind};
use crate::game::map::Wall;
use crate::game::{ArenaState, MatchStatus, Player, PlayerId, Team};
use crate::store::skins::skin_by_id;

const COLOR_TEAM_A: Color = Color::new(1.0, 0.192, 0.192, 1.0); // #ff3131
const COLOR_TEAM_B: Color = Color::new(0.0, 0.824, 1.0, 1.0); // #00d2ff
const COLOR_BACKGROUND: Color = Color::new(0.004, 0.016, 0.035, 1.0); // #010409
const COLOR_BLOOD: Color = Color::new(0.624, 0.071, 0.224, 1.0); // #9f1239

fn rgb(hex: u32) -> Color {
    Color::from_rgba((hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255)
}

fn with_alpha(color: Color, a: f32) -> Color {
    Color::new(color.r, color.g, color.b, a)
}

fn team_color(team: Team) -> Color {
    match team {
        Team::A => COLOR_TEAM_A,
        Team::B => COLOR_TEAM_B,
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Paint one frame of the arena snapshot
    pub fn draw(&self, state: &ArenaState) {
        // Shake translates the whole scene by a decaying random jitter
        let (ox, oy) = if state.shake > 0.5 {
            (
                (gen_range(0.0f32, 1.0) - 0.5) * state.shake,
                (gen_range(0.0f32, 1.0) - 0.5) * state.shake,
            )
        } else {
            (0.0, 0.0)
        };

        clear_background(COLOR_BACKGROUND);
        self.draw_grid(ox, oy);

        for decal in &state.effects.decals {
            draw_decal(decal.x + ox, decal.y + oy, decal);
        }
        for particle in &state.effects.particles {
            draw_particle(particle.x + ox, particle.y + oy, particle);
        }
        for wall in state.walls {
            draw_wall(ox, oy, wall);
        }
        for bullet in &state.bullets {
            draw_bullet(ox, oy, bullet);
        }
        for player in &state.players {
            if player.is_alive() {
                draw_player(ox, oy, player);
            }
        }

        self.draw_overlay();
    }

    fn draw_grid(&self, ox: f32, oy: f32) {
        let grid = Color::new(0.059, 0.09, 0.165, 1.0);
        let mut x = 0.0;
        while x <= WORLD_WIDTH {
            draw_line(x + ox, oy, x + ox, WORLD_HEIGHT + oy, 1.5, grid);
            x += 100.0;
        }
        let mut y = 0.0;
        while y <= WORLD_HEIGHT {
            draw_line(ox, y + oy, WORLD_WIDTH + ox, y + oy, 1.5, grid);
            y += 100.0;
        }
    }

    /// Scanlines plus an approximated vignette
    fn draw_overlay(&self) {
        let scan = Color::new(1.0, 1.0, 1.0, 0.04);
        let mut y = 0.0;
        while y < WORLD_HEIGHT {
            draw_rectangle(0.0, y, WORLD_WIDTH, 2.0, scan);
            y += 8.0;
        }

        let edge = Color::new(0.02, 0.04, 0.12, 1.0);
        for i in 0..6 {
            let a = 0.05 * (6 - i) as f32;
            let inset = i as f32 * 14.0;
            let c = with_alpha(edge, a);
            draw_rectangle(0.0, inset, WORLD_WIDTH, 14.0, c);
            draw_rectangle(0.0, WORLD_HEIGHT - inset - 14.0, WORLD_WIDTH, 14.0, c);
            draw_rectangle(inset, 0.0, 14.0, WORLD_HEIGHT, c);
            draw_rectangle(WORLD_WIDTH - inset - 14.0, 0.0, 14.0, WORLD_HEIGHT, c);
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_wall(ox: f32, oy: f32, wall: &Wall) {
    let x = wall.x + ox;
    let y = wall.y + oy;

    // Drop shadow
    draw_rectangle(x + 12.0, y + 12.0, wall.w, wall.h, Color::new(0.0, 0.0, 0.0, 0.7));

    // Vertical gradient approximated in slices
    let top = rgb(0x475569);
    let bottom = rgb(0x0f172a);
    let slices = 6;
    for i in 0..slices {
        let t0 = i as f32 / slices as f32;
        let c = Color::new(
            top.r + (bottom.r - top.r) * t0,
            top.g + (bottom.g - top.g) * t0,
            top.b + (bottom.b - top.b) * t0,
            1.0,
        );
        draw_rectangle(x, y + wall.h * t0, wall.w, wall.h / slices as f32 + 1.0, c);
    }

    draw_rectangle_lines(x, y, wall.w, wall.h, 4.0, rgb(0x94a3b8));
}

fn draw_bullet(ox: f32, oy: f32, bullet: &Bullet) {
    let x = bullet.x + ox;
    let y = bullet.y + oy;
    let speed = (bullet.vx * bullet.vx + bullet.vy * bullet.vy).sqrt().max(0.001);
    let (dx, dy) = (bullet.vx / speed, bullet.vy / speed);
    let color = team_color(bullet.team);

    // Fading directional trail in three segments
    const TRAIL: f32 = 70.0;
    for (seg, alpha) in [(0.0f32, 0.9f32), (0.33, 0.5), (0.66, 0.18)] {
        let x0 = x - dx * TRAIL * seg;
        let y0 = y - dy * TRAIL * seg;
        let x1 = x - dx * TRAIL * (seg + 0.34);
        let y1 = y - dy * TRAIL * (seg + 0.34);
        draw_line(x0, y0, x1, y1, 10.0, with_alpha(color, alpha));
    }

    // Glow halo and white core
    draw_circle(x, y, 14.0, with_alpha(color, 0.25));
    draw_circle(x, y, 8.0, WHITE);
}

fn draw_particle(x: f32, y: f32, particle: &crate::game::effects::Particle) {
    let alpha = 1.0 - particle.life as f32 / particle.max_life as f32;
    let color = with_alpha(rgb(particle.color), alpha.clamp(0.0, 1.0));
    if particle.kind == ParticleKind::Shell {
        draw_rectangle_ex(
            x,
            y,
            8.0,
            4.0,
            DrawRectangleParams {
                offset: vec2(0.5, 0.5),
                rotation: particle.life as f32 * 0.4,
                color,
            },
        );
    } else {
        draw_rectangle(x, y, particle.size, particle.size, color);
    }
}

fn draw_decal(x: f32, y: f32, decal: &crate::game::effects::Decal) {
    match decal.kind {
        DecalKind::Blood => {
            draw_circle(x, y, decal.size / 2.0, with_alpha(COLOR_BLOOD, 0.53));
            draw_circle(x + 6.0, y + 6.0, decal.size / 2.2, Color::new(0.0, 0.0, 0.0, 0.3));
        }
        DecalKind::BulletHole => {
            draw_rectangle_ex(
                x,
                y,
                decal.size,
                decal.size,
                DrawRectangleParams {
                    offset: vec2(0.5, 0.5),
                    rotation: decal.angle,
                    color: Color::new(0.0, 0.0, 0.0, 0.8),
                },
            );
        }
    }
}

/// Rotated soldier sprite: backpack, armor plate, helmet with team visor,
/// weapon, plus the walk bob and recoil kick
fn draw_player(ox: f32, oy: f32, player: &Player) {
    let bob = (player.walk_cycle).sin() * 5.2;
    let cx = player.x + ox - player.angle.cos() * player.recoil;
    let cy = player.y + oy - player.angle.sin() * player.recoil + bob;
    let rot = player.angle;
    let px = 4.0;

    let flash = player.flash_ticks > 0;
    let lighten = |c: Color| -> Color {
        if flash {
            Color::new(1.0, 1.0, 1.0, 1.0)
        } else {
            c
        }
    };

    // Positions in the soldier's local frame, rotated into world space
    let local = |lx: f32, ly: f32| -> (f32, f32) {
        (
            cx + lx * rot.cos() - ly * rot.sin(),
            cy + lx * rot.sin() + ly * rot.cos(),
        )
    };
    let part = |lx: f32, ly: f32, w: f32, h: f32, color: Color| {
        let (wx, wy) = local(lx, ly);
        draw_rectangle_ex(
            wx,
            wy,
            w,
            h,
            DrawRectangleParams {
                offset: vec2(0.5, 0.5),
                rotation: rot,
                color,
            },
        );
    };

    let (base, dark, visor) = match player.team {
        Team::A => (rgb(0x991b1b), rgb(0x450a0a), rgb(0xfbbf24)),
        Team::B => (rgb(0x1e40af), rgb(0x1e3a8a), rgb(0x22d3ee)),
    };
    // Local skin overrides the armor tint
    let base = player
        .skin_id
        .as_deref()
        .filter(|_| player.id.is_local())
        .and_then(skin_by_id)
        .map(|s| rgb(s.color))
        .unwrap_or(base);

    // Backpack
    part(-px * 6.5, 0.0, px * 5.0, px * 8.0, lighten(rgb(0x0f172a)));
    // Armor plates
    part(0.0, 0.0, px * 13.0, px * 13.0, lighten(dark));
    part(0.0, 0.0, px * 11.0, px * 11.0, lighten(base));
    // Helmet and visor
    let (hx, hy) = local(-px * 4.0, 0.0);
    draw_circle(hx, hy, px * 4.8, lighten(rgb(0x020617)));
    part(-px * 3.1, 0.0, px * 1.8, px * 6.0, with_alpha(lighten(visor), 0.9));
    // Weapon and barrel
    part(px * 13.0, 0.0, px * 20.0, px * 5.6, lighten(rgb(0x020617)));
    part(px * 22.5, 0.0, px * 9.0, px * 2.8, lighten(rgb(0x1e293b)));
    // Team-tinted plate outline
    let outline = with_alpha(team_color(player.team), 0.4);
    let (tlx, tly) = local(0.0, 0.0);
    draw_circle_lines(tlx, tly, px * 7.5, 2.5, outline);

    // Health bar above the head, unrotated
    const BAR_W: f32 = 70.0;
    let bx = player.x + ox - BAR_W / 2.0;
    let by = player.y + oy - 80.0;
    draw_rectangle(bx, by, BAR_W, 14.0, Color::new(0.0, 0.0, 0.0, 0.95));
    let frac = (player.health / player.max_health).clamp(0.0, 1.0);
    draw_rectangle(bx, by, BAR_W * frac, 14.0, team_color(player.team));

    // Faint presence ring
    draw_circle_lines(
        player.x + ox,
        player.y + oy,
        60.0,
        1.0,
        with_alpha(team_color(player.team), 0.08),
    );
}

/// The single parameterized HUD: round clock, score, announcement, local
/// vitals. Drawn after the arena pass, never mutating state.
pub fn draw_hud(state: &ArenaState, announcement: &str) {
    let center = WORLD_WIDTH / 2.0;

    // Round clock
    let minutes = state.time_left / 60;
    let seconds = state.time_left % 60;
    let clock = format!("{minutes:02}:{seconds:02}");
    draw_text(&clock, center - 34.0, 44.0, 42.0, WHITE);

    // Round wins either side of the clock
    draw_text(
        &format!("{}", state.rounds.wins_a),
        center - 90.0,
        44.0,
        42.0,
        COLOR_TEAM_A,
    );
    draw_text(
        &format!("{}", state.rounds.wins_b),
        center + 70.0,
        44.0,
        42.0,
        COLOR_TEAM_B,
    );
    draw_text(
        &format!("ROUND {} / {}", state.rounds.current, state.rounds.max),
        center - 64.0,
        68.0,
        20.0,
        GRAY,
    );
    draw_text(
        &format!("{} - {}", state.score_a, state.score_b),
        center - 20.0,
        90.0,
        20.0,
        LIGHTGRAY,
    );

    if !announcement.is_empty() {
        let size = 56.0;
        let dims = measure_text(announcement, None, size as u16, 1.0);
        draw_text(
            announcement,
            center - dims.width / 2.0,
            WORLD_HEIGHT / 2.0 - 120.0,
            size,
            Color::new(1.0, 1.0, 1.0, 0.92),
        );
    }

    // Local vitals bottom-left
    if let Some(local) = state.player(PlayerId::LOCAL) {
        let y = WORLD_HEIGHT - 36.0;
        draw_text(&local.name, 24.0, y - 18.0, 22.0, LIGHTGRAY);
        draw_rectangle(24.0, y - 10.0, 220.0, 16.0, Color::new(0.0, 0.0, 0.0, 0.8));
        let frac = (local.health / local.max_health).clamp(0.0, 1.0);
        let hp_color = if frac > 0.5 {
            GREEN
        } else if frac > 0.25 {
            YELLOW
        } else {
            RED
        };
        draw_rectangle(24.0, y - 10.0, 220.0 * frac, 16.0, hp_color);
        draw_text(
            &format!("K {}  D {}", local.kills, local.deaths),
            24.0,
            y + 26.0,
            20.0,
            GRAY,
        );
    }

    if state.status == MatchStatus::MatchEnded {
        let msg = "MATCH COMPLETE - ESC TO EXIT";
        let dims = measure_text(msg, None, 28, 1.0);
        draw_text(msg, center - dims.width / 2.0, WORLD_HEIGHT / 2.0 + 60.0, 28.0, GRAY);
    }
}

/// Boot screen with the progress bar and a tactical tip
pub fn draw_loading(progress: f32, tip: &str) {
    clear_background(Color::new(0.008, 0.024, 0.09, 1.0));
    let center = WORLD_WIDTH / 2.0;

    let title = "PIXEL SHOTS";
    let dims = measure_text(title, None, 72, 1.0);
    draw_text(title, center - dims.width / 2.0, 260.0, 72.0, rgb(0x60a5fa));

    // Segmented loading bar
    let bar_w = 520.0;
    let bar_x = center - bar_w / 2.0;
    draw_rectangle(bar_x, 340.0, bar_w, 30.0, Color::new(0.0, 0.0, 0.0, 0.8));
    draw_rectangle(
        bar_x + 3.0,
        343.0,
        (bar_w - 6.0) * progress.clamp(0.0, 1.0),
        24.0,
        rgb(0xfbbf24),
    );
    draw_rectangle_lines(bar_x, 340.0, bar_w, 30.0, 2.0, rgb(0x334155));
    draw_text(
        &format!("CALIBRATING OPTICS... {:.0}%", progress.clamp(0.0, 1.0) * 100.0),
        bar_x,
        330.0,
        18.0,
        rgb(0xeab308),
    );

    let quoted = format!("\"{tip}\"");
    let dims = measure_text(&quoted, None, 24, 1.0);
    draw_text(&quoted, center - dims.width / 2.0, 440.0, 24.0, LIGHTGRAY);
}

/// Full-screen denial state shown after an integrity ban
pub fn draw_denied() {
    clear_background(Color::new(0.04, 0.0, 0.0, 1.0));
    let center = WORLD_WIDTH / 2.0;

    let title = "ACCESS DENIED";
    let dims = measure_text(title, None, 84, 1.0);
    draw_text(title, center - dims.width / 2.0, 340.0, 84.0, RED);

    for (i, line) in [
        "This account has been permanently restricted for a",
        "violation of arena integrity policy.",
    ]
    .iter()
    .enumerate()
    {
        let dims = measure_text(line, None, 26, 1.0);
        draw_text(line, center - dims.width / 2.0, 410.0 + i as f32 * 34.0, 26.0, LIGHTGRAY);
    }
}
