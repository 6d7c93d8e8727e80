//! World and gameplay tuning values

/// World dimensions in world units (1:1 with the raster surface)
pub const WORLD_WIDTH: f32 = 1200.0;
pub const WORLD_HEIGHT: f32 = 800.0;

/// Actor collision half-width, used for wall and actor-actor overlap tests
pub const PLAYER_RADIUS: f32 = 22.0;
/// Distance at which a bullet registers a hit on an actor
pub const BULLET_HIT_RADIUS: f32 = 32.0;

/// Base movement speed, world units per tick
pub const PLAYER_SPEED: f32 = 4.2;
/// Bullet travel per tick for the baseline weapon
pub const BULLET_SPEED: f32 = 24.0;
/// Bullets spawn this far in front of the shooter
pub const MUZZLE_OFFSET: f32 = 45.0;

pub const ROUND_DURATION_SECS: u32 = 90;
pub const MAX_ROUNDS: u32 = 7;
/// Seconds the round-ended screen holds before the next round starts
pub const ROUND_END_HOLD_SECS: f32 = 2.5;

pub const XP_PER_KILL: u32 = 50;
pub const XP_PER_WIN: u32 = 500;
pub const COINS_PER_KILL: u32 = 10;
pub const COINS_PER_WIN: u32 = 100;
/// XP needed to clear level N is N * LEVEL_XP_BASE
pub const LEVEL_XP_BASE: u32 = 1_000;

// Bot behavior bands (distances in world units, speeds per tick)
pub const BOT_FAR_RANGE: f32 = 300.0;
pub const BOT_NEAR_RANGE: f32 = 150.0;
pub const BOT_ADVANCE_SPEED: f32 = 3.2;
pub const BOT_STRAFE_SPEED: f32 = 2.5;
pub const BOT_WANDER_SPEED: f32 = 2.0;
/// Per-tick fire probability while an enemy is alive
pub const BOT_FIRE_CHANCE: f64 = 0.04;
/// Per-tick probability of a spontaneous wander turn
pub const BOT_TURN_CHANCE: f64 = 0.01;

// Transient decay rates, applied once per tick
pub const SHAKE_DECAY: f32 = 0.85;
pub const RECOIL_DECAY: f32 = 0.65;
pub const RECOIL_KICK: f32 = 20.0;
pub const FIRE_SHAKE: f32 = 18.0;
pub const KILL_SHAKE: f32 = 25.0;
pub const FLASH_TICKS: u32 = 8;

// Anti-cheat thresholds
pub const LAG_TOLERANCE: f32 = 3.0;
pub const SUSPICION_BAN_THRESHOLD: f32 = 5.0;
pub const SUSPICION_DECAY: f32 = 0.05;
/// Ticks after match start during which the speed check stays quiet
pub const ANTICHEAT_WARMUP_TICKS: u32 = 90;

/// Rotation rate for the key-steered local actor, radians per tick
pub const KEY_ROTATE_SPEED: f32 = 0.057;

pub const BOT_NAMES: [&str; 15] = [
    "Viper", "Ghost", "Phantom", "Iron", "Titan", "Hunter", "Rex", "Shadow", "Ace", "Specter",
    "Blade", "Wolf", "Hawk", "Neon", "Zero",
];

pub const TACTICAL_TIPS: [&str; 7] = [
    "Stay moving! A stationary target is an easy target.",
    "Use walls for cover. The tactical environment is your best friend.",
    "Coordinate with your squad. Alpha and Bravo units are stronger together.",
    "Watch your health sync. Abort and regroup if vital signs are low.",
    "Sniper units deal massive damage but are vulnerable at close range.",
    "Tank units can absorb significant fire. Lead the charge.",
    "Muzzle flashes reveal your position. Fire in controlled bursts.",
];

/// Rank ladder thresholds by level
pub struct Rank {
    pub name: &'static str,
    pub min_level: u32,
}

pub const RANKS: [Rank; 6] = [
    Rank { name: "Bronze", min_level: 0 },
    Rank { name: "Silver", min_level: 5 },
    Rank { name: "Gold", min_level: 10 },
    Rank { name: "Platinum", min_level: 20 },
    Rank { name: "Diamond", min_level: 40 },
    Rank { name: "Elite", min_level: 100 },
];
