//! Spawn planning
//!
//! Picks collision-free spawn points inside a team-biased horizontal band.
//! Same-team spawns are not checked against each other; the bands keep the
//! teams apart and friendly overlap resolves on the first tick.

use rand::Rng;

use crate::game::constants::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::game::map::Wall;
use crate::game::physics::PhysicsSystem;
use crate::game::Team;

const MAX_ATTEMPTS: u32 = 100;

pub struct SpawnPlanner;

impl SpawnPlanner {
    /// Find a wall-free spawn point for one actor.
    ///
    /// Falls back to a fixed per-team position if sampling is exhausted.
    pub fn find_spawn<R: Rng>(rng: &mut R, team: Team, walls: &[Wall]) -> (f32, f32) {
        for _ in 0..MAX_ATTEMPTS {
            let x = match team {
                Team::A => 50.0 + rng.gen::<f32>() * 250.0,
                Team::B => WORLD_WIDTH - 300.0 + rng.gen::<f32>() * 250.0,
            };
            let y = 50.0 + rng.gen::<f32>() * (WORLD_HEIGHT - 100.0);
            if !PhysicsSystem::hits_any_wall(x, y, walls) {
                return (x, y);
            }
        }
        Self::fallback(team)
    }

    /// Deterministic safe default, used only when sampling fails
    pub fn fallback(team: Team) -> (f32, f32) {
        match team {
            Team::A => (100.0, WORLD_HEIGHT / 2.0),
            Team::B => (WORLD_WIDTH - 100.0, WORLD_HEIGHT / 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::game::map::{layout_for_round, LAYOUT_COUNT};

    #[test]
    fn spawns_avoid_walls_on_every_layout() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for round in 1..=LAYOUT_COUNT as u32 {
            let walls = layout_for_round(round);
            for team in [Team::A, Team::B] {
                for _ in 0..20 {
                    let (x, y) = SpawnPlanner::find_spawn(&mut rng, team, walls);
                    assert!(
                        !PhysicsSystem::hits_any_wall(x, y, walls),
                        "spawn ({x}, {y}) overlaps a wall on layout {round}"
                    );
                }
            }
        }
    }

    #[test]
    fn spawns_stay_in_team_bands() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let walls = layout_for_round(1);
        for _ in 0..50 {
            let (ax, _) = SpawnPlanner::find_spawn(&mut rng, Team::A, walls);
            let (bx, _) = SpawnPlanner::find_spawn(&mut rng, Team::B, walls);
            assert!(ax < 300.0);
            assert!(bx > WORLD_WIDTH - 300.0);
        }
    }

    #[test]
    fn exhausted_sampling_degrades_to_fallback() {
        // A wall covering the whole world defeats every candidate
        let everything = [Wall {
            x: 0.0,
            y: 0.0,
            w: WORLD_WIDTH,
            h: WORLD_HEIGHT,
            color: 0,
        }];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let spawn = SpawnPlanner::find_spawn(&mut rng, Team::A, &everything);
        assert_eq!(spawn, SpawnPlanner::fallback(Team::A));
    }
}
