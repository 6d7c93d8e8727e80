//! Weapons, bullets and damage

use crate::game::constants::{
    BULLET_HIT_RADIUS, BULLET_SPEED, MUZZLE_OFFSET, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::game::map::Wall;
use crate::game::{PlayerClass, PlayerId, Team};

/// Weapon stats per class
#[derive(Debug, Clone, Copy)]
pub struct WeaponStats {
    /// Damage per hit when fired by a human
    pub damage: f32,
    /// Role-scaled damage when fired by a bot
    pub bot_damage: f32,
    /// Cooldown between shots in milliseconds
    pub reload_ms: u64,
    /// Bullet travel per tick
    pub bullet_speed: f32,
}

impl WeaponStats {
    pub fn for_class(class: PlayerClass) -> Self {
        match class {
            PlayerClass::Assault => Self {
                damage: 25.0,
                bot_damage: 15.0,
                reload_ms: 120,
                bullet_speed: BULLET_SPEED,
            },
            PlayerClass::Sniper => Self {
                damage: 60.0,
                bot_damage: 35.0,
                reload_ms: 650,
                bullet_speed: 32.0,
            },
            PlayerClass::Tank => Self {
                damage: 18.0,
                bot_damage: 12.0,
                reload_ms: 200,
                bullet_speed: 22.0,
            },
        }
    }

    /// Cooldown expressed in simulation ticks, for actors whose reload is
    /// tracked by the arena rather than the input sampler
    pub fn reload_ticks(&self) -> u32 {
        (self.reload_ms as f32 / crate::util::time::TICK_DURATION_MS).ceil() as u32
    }
}

/// Live projectile
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: u64,
    pub owner: PlayerId,
    /// Inherited from the owner; same-team actors are never hit
    pub team: Team,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub damage: f32,
    pub age: u32,
}

impl Bullet {
    /// Spawn at the shooter's muzzle, travelling along the firing angle
    pub fn fired(id: u64, owner: PlayerId, team: Team, x: f32, y: f32, angle: f32, damage: f32, speed: f32) -> Self {
        Self {
            id,
            owner,
            team,
            x: x + angle.cos() * MUZZLE_OFFSET,
            y: y + angle.sin() * MUZZLE_OFFSET,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            damage,
            age: 0,
        }
    }

    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.age += 1;
    }

    pub fn inside_wall(&self, walls: &[Wall]) -> bool {
        walls.iter().any(|w| w.contains(self.x, self.y))
    }

    pub fn in_bounds(&self) -> bool {
        self.x > 0.0 && self.x < WORLD_WIDTH && self.y > 0.0 && self.y < WORLD_HEIGHT
    }

    /// Hit test against an actor position
    pub fn strikes(&self, px: f32, py: f32) -> bool {
        let dx = px - self.x;
        let dy = py - self.y;
        dx * dx + dy * dy < BULLET_HIT_RADIUS * BULLET_HIT_RADIUS
    }
}

/// Combat helpers shared by the tick and the tests
pub struct CombatSystem;

impl CombatSystem {
    /// Apply damage to health, clamping at zero. Returns (new_health, killed).
    pub fn apply_damage(current_health: f32, damage: f32) -> (f32, bool) {
        let new_health = (current_health - damage).max(0.0);
        (new_health, new_health <= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero() {
        let (health, killed) = CombatSystem::apply_damage(20.0, 25.0);
        assert_eq!(health, 0.0);
        assert!(killed);

        let (health, killed) = CombatSystem::apply_damage(100.0, 25.0);
        assert_eq!(health, 75.0);
        assert!(!killed);
    }

    #[test]
    fn exact_lethal_damage_kills() {
        let (health, killed) = CombatSystem::apply_damage(25.0, 25.0);
        assert_eq!(health, 0.0);
        assert!(killed);
    }

    #[test]
    fn bullet_spawns_at_muzzle_with_fixed_speed() {
        let b = Bullet::fired(1, PlayerId::LOCAL, Team::A, 100.0, 100.0, 0.0, 25.0, BULLET_SPEED);
        assert_eq!(b.x, 100.0 + MUZZLE_OFFSET);
        assert_eq!(b.vx, BULLET_SPEED);
        assert_eq!(b.vy, 0.0);
    }

    #[test]
    fn bullet_leaves_bounds() {
        let mut b = Bullet::fired(1, PlayerId::LOCAL, Team::A, WORLD_WIDTH - 50.0, 400.0, 0.0, 25.0, BULLET_SPEED);
        assert!(b.in_bounds());
        b.advance();
        assert!(!b.in_bounds());
    }

    #[test]
    fn sniper_outranges_assault_per_tick() {
        let sniper = WeaponStats::for_class(PlayerClass::Sniper);
        let assault = WeaponStats::for_class(PlayerClass::Assault);
        assert!(sniper.bullet_speed > assault.bullet_speed);
        assert!(sniper.reload_ms > assault.reload_ms);
    }
}
