//! Reactive bot behavior
//!
//! A stateless per-tick decision function: no pathfinding, no memory beyond
//! the bot's current position and facing. Readable combat comes from three
//! distance bands and a side-step fallback that keeps bots off walls.

use std::f32::consts::PI;

use rand::Rng;

use crate::game::arena::Player;
use crate::game::constants::{
    BOT_ADVANCE_SPEED, BOT_FAR_RANGE, BOT_FIRE_CHANCE, BOT_NEAR_RANGE, BOT_STRAFE_SPEED,
    BOT_TURN_CHANCE, BOT_WANDER_SPEED,
};
use crate::game::map::Wall;
use crate::game::physics::PhysicsSystem;

/// What a bot wants to do this tick; the arena applies it
#[derive(Debug, Clone, Copy)]
pub struct BotDecision {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    /// Walk-cycle advance for the animation accumulator
    pub walk_delta: f32,
    pub fire: bool,
}

/// Decide one tick of movement and fire intent for a living bot.
///
/// `enemies` holds the positions of living opponents in iteration order;
/// the nearest is targeted, first encountered winning ties.
pub fn drive<R: Rng>(
    bot: &Player,
    enemies: &[(f32, f32)],
    walls: &[Wall],
    rng: &mut R,
) -> BotDecision {
    let mut out = BotDecision {
        x: bot.x,
        y: bot.y,
        angle: bot.angle,
        walk_delta: 0.0,
        fire: false,
    };

    let Some((target, dist)) = nearest(bot.x, bot.y, enemies) else {
        wander(bot, walls, rng, &mut out);
        return out;
    };

    // Instant turn toward the target, no rate limit
    out.angle = (target.1 - bot.y).atan2(target.0 - bot.x);

    if dist > BOT_FAR_RANGE {
        let mx = out.angle.cos() * BOT_ADVANCE_SPEED;
        let my = out.angle.sin() * BOT_ADVANCE_SPEED;
        if !PhysicsSystem::hits_any_wall(bot.x + mx, bot.y + my, walls) {
            out.x += mx;
            out.y += my;
            out.walk_delta = 0.3;
        } else {
            // Blocked: try a single perpendicular side-step
            let side = out.angle + PI / 2.0;
            let sx = side.cos() * BOT_ADVANCE_SPEED;
            let sy = side.sin() * BOT_ADVANCE_SPEED;
            if !PhysicsSystem::hits_any_wall(bot.x + sx, bot.y + sy, walls) {
                out.x += sx;
                out.y += sy;
            }
        }
    } else if dist < BOT_NEAR_RANGE {
        // Too close: circle the target
        let strafe = out.angle + PI / 2.0;
        let sx = strafe.cos() * BOT_STRAFE_SPEED;
        let sy = strafe.sin() * BOT_STRAFE_SPEED;
        if !PhysicsSystem::hits_any_wall(bot.x + sx, bot.y + sy, walls) {
            out.x += sx;
            out.y += sy;
            out.walk_delta = 0.2;
        }
    }
    // Middle band: hold position, keep facing

    out.fire = rng.gen_bool(BOT_FIRE_CHANCE);
    out
}

fn nearest(x: f32, y: f32, enemies: &[(f32, f32)]) -> Option<((f32, f32), f32)> {
    let mut best: Option<((f32, f32), f32)> = None;
    for &e in enemies {
        let d = ((e.0 - x).powi(2) + (e.1 - y).powi(2)).sqrt();
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((e, d)),
        }
    }
    best
}

fn wander<R: Rng>(bot: &Player, walls: &[Wall], rng: &mut R, out: &mut BotDecision) {
    let mx = bot.angle.cos() * BOT_WANDER_SPEED;
    let my = bot.angle.sin() * BOT_WANDER_SPEED;

    if !PhysicsSystem::hits_any_wall(bot.x + mx, bot.y + my, walls) {
        out.x += mx;
        out.y += my;
        out.walk_delta = 0.15;
    } else {
        // Turn roughly 90 degrees, jittered, away from the wall
        out.angle = bot.angle + PI / 2.0 + (rng.gen::<f32>() - 0.5) * PI;
    }

    if rng.gen_bool(BOT_TURN_CHANCE) {
        out.angle += (rng.gen::<f32>() - 0.5) * PI;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::game::{PlayerClass, PlayerId, Team};

    fn bot_at(x: f32, y: f32) -> Player {
        let mut p = Player::new(
            PlayerId(2),
            "Viper".to_string(),
            Team::B,
            PlayerClass::Assault,
            true,
            None,
        );
        p.x = x;
        p.y = y;
        p.angle = 0.0;
        p
    }

    #[test]
    fn nearest_enemy_wins_and_first_breaks_ties() {
        let enemies = [(100.0, 0.0), (50.0, 0.0), (50.0, 0.0), (200.0, 0.0)];
        let ((ex, _), d) = nearest(0.0, 0.0, &enemies).unwrap();
        assert_eq!(ex, 50.0);
        assert_eq!(d, 50.0);
        // Equal distances keep the earlier entry
        let first = nearest(0.0, 0.0, &[(60.0, 0.0), (0.0, 60.0)]).unwrap();
        assert_eq!(first.0, (60.0, 0.0));
    }

    #[test]
    fn far_band_advances_toward_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let bot = bot_at(100.0, 400.0);
        let d = drive(&bot, &[(900.0, 400.0)], &[], &mut rng);
        assert!(d.x > bot.x);
        assert_eq!(d.y, bot.y);
        assert_eq!(d.angle, 0.0);
        assert!(d.walk_delta > 0.0);
    }

    #[test]
    fn near_band_strafes_instead_of_closing() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let bot = bot_at(100.0, 400.0);
        let d = drive(&bot, &[(160.0, 400.0)], &[], &mut rng);
        // Perpendicular motion: no progress along the facing axis
        assert!((d.x - bot.x).abs() < 1e-3);
        assert!((d.y - bot.y).abs() > 1.0);
    }

    #[test]
    fn middle_band_holds_position() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let bot = bot_at(100.0, 400.0);
        let d = drive(&bot, &[(300.0, 400.0)], &[], &mut rng);
        assert_eq!((d.x, d.y), (bot.x, bot.y));
        assert_eq!(d.angle, 0.0);
    }

    #[test]
    fn blocked_advance_side_steps() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let bot = bot_at(100.0, 400.0);
        // Wall immediately in front, open to the sides
        let walls = [Wall {
            x: 125.0,
            y: 300.0,
            w: 40.0,
            h: 200.0,
            color: 0,
        }];
        let d = drive(&bot, &[(900.0, 400.0)], &walls, &mut rng);
        assert!((d.x - bot.x).abs() < 1e-3);
        assert!(d.y > bot.y + 1.0, "expected a downward side-step");
    }

    #[test]
    fn no_enemies_means_wander() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let bot = bot_at(100.0, 400.0);
        let d = drive(&bot, &[], &[], &mut rng);
        // Advances along current facing and never fires
        assert!(d.x > bot.x);
        assert!(!d.fire);
    }
}
