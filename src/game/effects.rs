//! Cosmetic transient entities: particles and decals
//!
//! Purely visual. Nothing in here may influence simulation outcomes, so the
//! update path has no collision or damage hooks and hard caps keep long
//! rounds from accumulating unbounded state.

use std::f32::consts::TAU;

use rand::Rng;

const PARTICLE_CAP: usize = 1_024;
const DECAL_CAP: usize = 256;

/// Particle drag per tick
const DRAG: f32 = 0.93;
/// Shells start dropping after this many ticks
const SHELL_HANG_TICKS: u32 = 22;
const SHELL_GRAVITY: f32 = 0.45;

pub const COLOR_MUZZLE: u32 = 0xfbbf24;
pub const COLOR_SPARK: u32 = 0xfef08a;
pub const COLOR_SHELL: u32 = 0xeab308;
pub const COLOR_BLOOD: u32 = 0x9f1239;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Spark,
    Shell,
    Blood,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
    pub color: u32,
    pub kind: ParticleKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecalKind {
    BulletHole,
    Blood,
}

#[derive(Debug, Clone)]
pub struct Decal {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub angle: f32,
    pub kind: DecalKind,
}

/// All transient cosmetics for one round
#[derive(Debug, Default)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub decals: Vec<Decal>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.decals.clear();
    }

    /// Advance and cull particles; decals are permanent within the round
    pub fn update(&mut self) {
        self.particles.retain_mut(|p| {
            p.x += p.vx;
            p.y += p.vy;
            p.vx *= DRAG;
            p.vy *= DRAG;
            p.life += 1;
            if p.kind == ParticleKind::Shell && p.life > SHELL_HANG_TICKS {
                p.vy += SHELL_GRAVITY;
            }
            p.life < p.max_life
        });
    }

    pub fn emit_sparks<R: Rng>(&mut self, rng: &mut R, x: f32, y: f32, count: usize) {
        for _ in 0..count {
            self.push_particle(Particle {
                x,
                y,
                vx: (rng.gen::<f32>() - 0.5) * 14.0,
                vy: (rng.gen::<f32>() - 0.5) * 14.0,
                life: 0,
                max_life: 45,
                size: 3.0,
                color: COLOR_SPARK,
                kind: ParticleKind::Spark,
            });
        }
    }

    /// One ejected casing, thrown sideways off the firing angle
    pub fn emit_shell<R: Rng>(&mut self, rng: &mut R, x: f32, y: f32, fire_angle: f32) {
        let eject = fire_angle - std::f32::consts::FRAC_PI_2 + (rng.gen::<f32>() - 0.5) * 0.8;
        self.push_particle(Particle {
            x,
            y,
            vx: eject.cos() * 7.0 + (rng.gen::<f32>() - 0.5) * 8.0,
            vy: eject.sin() * 7.0 + (rng.gen::<f32>() - 0.5) * 8.0,
            life: 0,
            max_life: 220,
            size: 3.5,
            color: COLOR_SHELL,
            kind: ParticleKind::Shell,
        });
    }

    pub fn emit_blood<R: Rng>(&mut self, rng: &mut R, x: f32, y: f32, vx: f32, vy: f32, count: usize) {
        for _ in 0..count {
            self.push_particle(Particle {
                x,
                y,
                vx: vx + (rng.gen::<f32>() - 0.5) * 14.0,
                vy: vy + (rng.gen::<f32>() - 0.5) * 14.0,
                life: 0,
                max_life: 180,
                size: rng.gen::<f32>() * 5.0 + 2.0,
                color: COLOR_BLOOD,
                kind: ParticleKind::Blood,
            });
        }
    }

    pub fn add_bullet_hole<R: Rng>(&mut self, rng: &mut R, x: f32, y: f32) {
        self.push_decal(Decal {
            x,
            y,
            size: 8.0,
            angle: rng.gen::<f32>() * TAU,
            kind: DecalKind::BulletHole,
        });
    }

    pub fn add_blood_pool<R: Rng>(&mut self, rng: &mut R, x: f32, y: f32, size: f32) {
        self.push_decal(Decal {
            x,
            y,
            size,
            angle: rng.gen::<f32>() * TAU,
            kind: DecalKind::Blood,
        });
    }

    fn push_particle(&mut self, p: Particle) {
        if self.particles.len() >= PARTICLE_CAP {
            self.particles.remove(0);
        }
        self.particles.push(p);
    }

    fn push_decal(&mut self, d: Decal) {
        if self.decals.len() >= DECAL_CAP {
            self.decals.remove(0);
        }
        self.decals.push(d);
    }
}
