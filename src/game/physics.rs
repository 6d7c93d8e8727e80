//! Movement constraints and collision resolution

use crate::game::constants::{PLAYER_RADIUS, PLAYER_SPEED};
use crate::game::map::Wall;
use crate::game::PlayerClass;

/// Mobility and durability per class
#[derive(Debug, Clone, Copy)]
pub struct ClassStats {
    pub max_health: f32,
    /// Multiplier applied to the live base movement speed
    pub speed_mult: f32,
}

impl ClassStats {
    pub fn for_class(class: PlayerClass) -> Self {
        match class {
            PlayerClass::Assault => Self {
                max_health: 100.0,
                speed_mult: 1.0,
            },
            PlayerClass::Sniper => Self {
                max_health: 80.0,
                speed_mult: 1.0,
            },
            PlayerClass::Tank => Self {
                max_health: 140.0,
                speed_mult: 0.85,
            },
        }
    }

    pub fn speed(&self, base_speed: f32) -> f32 {
        base_speed * self.speed_mult
    }
}

impl Default for ClassStats {
    fn default() -> Self {
        Self::for_class(PlayerClass::Assault)
    }
}

/// Physics system for actor movement and overlap resolution
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Actor bounding-box overlap against a wall rectangle.
    ///
    /// The actor circle is approximated by a square of half-width
    /// `PLAYER_RADIUS`, matching the hit feel of the original tuning.
    pub fn overlaps_wall(x: f32, y: f32, wall: &Wall) -> bool {
        x + PLAYER_RADIUS > wall.x
            && x - PLAYER_RADIUS < wall.x + wall.w
            && y + PLAYER_RADIUS > wall.y
            && y - PLAYER_RADIUS < wall.y + wall.h
    }

    pub fn hits_any_wall(x: f32, y: f32, walls: &[Wall]) -> bool {
        walls.iter().any(|w| Self::overlaps_wall(x, y, w))
    }

    /// Resolve a requested displacement against the wall set.
    ///
    /// The X and Y components are tested independently so diagonal movement
    /// into a wall slides along its surface instead of stopping dead.
    pub fn move_with_sliding(x: f32, y: f32, dx: f32, dy: f32, walls: &[Wall]) -> (f32, f32) {
        let mut nx = x;
        let mut ny = y;
        if !Self::hits_any_wall(nx + dx, ny, walls) {
            nx += dx;
        }
        if !Self::hits_any_wall(nx, ny + dy, walls) {
            ny += dy;
        }
        (nx, ny)
    }

    /// Do two actors overlap?
    pub fn actors_overlap(x1: f32, y1: f32, x2: f32, y2: f32) -> bool {
        let dx = x2 - x1;
        let dy = y2 - y1;
        let combined = PLAYER_RADIUS * 2.0;
        dx * dx + dy * dy < combined * combined
    }

    /// Push-apart displacement for a pair of overlapping actors.
    ///
    /// Returns the candidate position for each actor; callers veto each half
    /// independently if it would drive that actor into a wall.
    pub fn push_apart(x1: f32, y1: f32, x2: f32, y2: f32) -> ((f32, f32), (f32, f32)) {
        let dx = x2 - x1;
        let dy = y2 - y1;
        let dist = (dx * dx + dy * dy).sqrt();

        if dist < 0.001 {
            // Same position, separate along X arbitrarily
            return ((x1 - PLAYER_RADIUS, y1), (x2 + PLAYER_RADIUS, y2));
        }

        let overlap = PLAYER_RADIUS * 2.0 - dist;
        if overlap <= 0.0 {
            return ((x1, y1), (x2, y2));
        }

        let nx = dx / dist;
        let ny = dy / dist;
        let push = overlap / 2.0 + 0.1;

        ((x1 - nx * push, y1 - ny * push), (x2 + nx * push, y2 + ny * push))
    }
}

/// Default base speed for a fresh match; lives in arena tuning so the
/// anti-cheat baseline has something to compare against
pub fn nominal_speed() -> f32 {
    PLAYER_SPEED
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::game::constants::{WORLD_HEIGHT, WORLD_WIDTH};
    use crate::game::map::layout_for_round;

    #[test]
    fn sliding_never_ends_inside_a_wall() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for round in 1..=5 {
            let walls = layout_for_round(round);
            let mut placed = 0;
            while placed < 100 {
                let x = rng.gen_range(0.0..WORLD_WIDTH);
                let y = rng.gen_range(0.0..WORLD_HEIGHT);
                if PhysicsSystem::hits_any_wall(x, y, walls) {
                    continue;
                }
                placed += 1;
                let dx = rng.gen_range(-PLAYER_SPEED..PLAYER_SPEED);
                let dy = rng.gen_range(-PLAYER_SPEED..PLAYER_SPEED);
                let (nx, ny) = PhysicsSystem::move_with_sliding(x, y, dx, dy, walls);
                assert!(
                    !PhysicsSystem::hits_any_wall(nx, ny, walls),
                    "ended overlapping a wall at ({nx}, {ny}) on layout {round}"
                );
            }
        }
    }

    #[test]
    fn sliding_keeps_the_free_axis() {
        // Wall directly to the right; diagonal up-right should slide up
        let walls = [Wall {
            x: 120.0,
            y: 0.0,
            w: 40.0,
            h: 400.0,
            color: 0,
        }];
        let (nx, ny) = PhysicsSystem::move_with_sliding(95.0, 200.0, 4.0, -4.0, &walls);
        assert_eq!(nx, 95.0);
        assert_eq!(ny, 196.0);
    }

    #[test]
    fn push_apart_separates_pairs() {
        let ((x1, y1), (x2, y2)) = PhysicsSystem::push_apart(100.0, 100.0, 130.0, 100.0);
        assert!(!PhysicsSystem::actors_overlap(x1, y1, x2, y2));
        // Separation is along the line between centers
        assert_eq!(y1, 100.0);
        assert_eq!(y2, 100.0);
        assert!(x1 < 100.0 && x2 > 130.0);
    }

    #[test]
    fn push_apart_handles_coincident_actors() {
        let ((x1, _), (x2, _)) = PhysicsSystem::push_apart(50.0, 50.0, 50.0, 50.0);
        assert!(x1 < x2);
    }

    #[test]
    fn class_stats_scale_speed() {
        let tank = ClassStats::for_class(PlayerClass::Tank);
        assert!(tank.speed(PLAYER_SPEED) < PLAYER_SPEED);
        let assault = ClassStats::for_class(PlayerClass::Assault);
        assert_eq!(assault.speed(PLAYER_SPEED), PLAYER_SPEED);
    }
}
