//! Input sampling for locally-controlled actors
//!
//! The window layer holds the raw key/button edge state; the sampler turns
//! it into one `ControlIntent` per local actor per tick. Reload deadlines
//! live here and are scoped to one match, so a fresh sampler comes with a
//! fresh match.

use macroquad::input::{is_key_down, is_mouse_button_down, mouse_position, KeyCode, MouseButton};

use crate::game::combat::WeaponStats;
use crate::game::constants::KEY_ROTATE_SPEED;
use crate::game::{AimInput, ArenaState, ControlIntent, ControlScheme, MatchMode, PlayerId};
use crate::util::time::unix_millis;

/// One steerable local actor
struct LocalActor {
    id: PlayerId,
    scheme: ControlScheme,
    /// Wall-clock deadline before the next shot is allowed
    reload_until_ms: u64,
}

pub struct InputSampler {
    actors: Vec<LocalActor>,
}

impl InputSampler {
    pub fn new(mode: MatchMode) -> Self {
        let mut actors = vec![LocalActor {
            id: PlayerId::LOCAL,
            scheme: ControlScheme::FreeAim,
            reload_until_ms: 0,
        }];
        if mode.is_local_duel() {
            actors.push(LocalActor {
                id: PlayerId::LOCAL_SECOND,
                scheme: ControlScheme::KeyRotate,
                reload_until_ms: 0,
            });
        }
        Self { actors }
    }

    /// Sample every live local actor for this tick
    pub fn sample(&mut self, state: &ArenaState) -> Vec<(PlayerId, ControlIntent)> {
        let now = unix_millis();
        let mut intents = Vec::with_capacity(self.actors.len());

        for actor in &mut self.actors {
            let Some(player) = state.player(actor.id) else {
                continue;
            };
            if !player.is_alive() {
                continue;
            }

            let mut intent = match actor.scheme {
                ControlScheme::FreeAim => free_aim_intent(player.x, player.y),
                ControlScheme::KeyRotate => key_rotate_intent(),
            };

            if intent.fire {
                if now < actor.reload_until_ms {
                    intent.fire = false;
                } else {
                    let weapon = WeaponStats::for_class(player.class);
                    actor.reload_until_ms = now + weapon.reload_ms;
                }
            }

            intents.push((actor.id, intent));
        }

        intents
    }
}

/// WASD movement, pointer aim, Space or left click to fire
fn free_aim_intent(px: f32, py: f32) -> ControlIntent {
    let mut dx = 0.0f32;
    let mut dy = 0.0f32;
    if is_key_down(KeyCode::W) {
        dy -= 1.0;
    }
    if is_key_down(KeyCode::S) {
        dy += 1.0;
    }
    if is_key_down(KeyCode::A) {
        dx -= 1.0;
    }
    if is_key_down(KeyCode::D) {
        dx += 1.0;
    }

    let (mx, my) = mouse_position();
    ControlIntent {
        move_dir: normalize_move(dx, dy),
        aim: AimInput::Absolute((my - py).atan2(mx - px)),
        fire: is_key_down(KeyCode::Space) || is_mouse_button_down(MouseButton::Left),
    }
}

/// Arrow-key movement, Comma/Period rotation, Enter or right Shift to fire
fn key_rotate_intent() -> ControlIntent {
    let mut dx = 0.0f32;
    let mut dy = 0.0f32;
    if is_key_down(KeyCode::Up) {
        dy -= 1.0;
    }
    if is_key_down(KeyCode::Down) {
        dy += 1.0;
    }
    if is_key_down(KeyCode::Left) {
        dx -= 1.0;
    }
    if is_key_down(KeyCode::Right) {
        dx += 1.0;
    }

    let mut turn = 0.0f32;
    if is_key_down(KeyCode::Comma) {
        turn -= KEY_ROTATE_SPEED;
    }
    if is_key_down(KeyCode::Period) {
        turn += KEY_ROTATE_SPEED;
    }

    ControlIntent {
        move_dir: normalize_move(dx, dy),
        aim: AimInput::Turn(turn),
        fire: is_key_down(KeyCode::Enter) || is_key_down(KeyCode::RightShift),
    }
}

/// Normalize a key-derived direction so diagonals are not faster
fn normalize_move(dx: f32, dy: f32) -> (f32, f32) {
    if dx == 0.0 && dy == 0.0 {
        return (0.0, 0.0);
    }
    let len = (dx * dx + dy * dy).sqrt();
    (dx / len, dy / len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonals_normalize_to_unit_length() {
        let (dx, dy) = normalize_move(1.0, 1.0);
        let len = (dx * dx + dy * dy).sqrt();
        assert!((len - 1.0).abs() < 1e-6);

        let (dx, dy) = normalize_move(-1.0, 0.0);
        assert_eq!((dx, dy), (-1.0, 0.0));

        assert_eq!(normalize_move(0.0, 0.0), (0.0, 0.0));
    }
}
