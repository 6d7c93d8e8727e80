//! Client-side integrity heuristics
//!
//! This protects game integrity against casual tampering only; it is not a
//! security boundary. Detections are terminal: the caller bans and resets,
//! there is no retry path.

use crate::game::constants::{
    ANTICHEAT_WARMUP_TICKS, LAG_TOLERANCE, SUSPICION_BAN_THRESHOLD, SUSPICION_DECAY,
};
use crate::util::time::{Timer, TICK_DURATION_MS};

/// Why the monitor escalated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanReason {
    /// The live movement-speed constant no longer matches the value
    /// captured at match start
    Tampering,
    /// Displacement repeatedly exceeded the plausible maximum
    SpeedHack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Clear,
    Banned(BanReason),
}

/// Per-match monitor for the locally-controlled actor.
///
/// Runs once per tick before the actor's movement is applied. A fresh match
/// needs a fresh monitor: the baseline is captured exactly once.
#[derive(Debug)]
pub struct SpeedMonitor {
    baseline_speed: f32,
    last_pos: (f32, f32),
    clock: Timer,
    suspicion: f32,
    warmup_ticks: u32,
    banned: bool,
}

impl SpeedMonitor {
    pub fn new(baseline_speed: f32, spawn: (f32, f32)) -> Self {
        Self {
            baseline_speed,
            last_pos: spawn,
            clock: Timer::new(),
            suspicion: 0.0,
            warmup_ticks: ANTICHEAT_WARMUP_TICKS,
            banned: false,
        }
    }

    /// Forget the last recorded position, e.g. after a respawn teleport
    pub fn reset_position(&mut self, pos: (f32, f32)) {
        self.last_pos = pos;
        self.clock.reset();
    }

    pub fn suspicion(&self) -> f32 {
        self.suspicion
    }

    /// Observe one tick using the wall clock since the previous observation
    pub fn observe(&mut self, live_speed: f32, speed_mult: f32, pos: (f32, f32)) -> Verdict {
        let elapsed_ms = self.clock.elapsed_ms() as f32;
        self.clock.reset();
        self.check(live_speed, speed_mult, pos, elapsed_ms)
    }

    /// Core check with an explicit elapsed time, so hosts (and tests) that
    /// manage their own clock can drive it directly.
    pub fn check(
        &mut self,
        live_speed: f32,
        speed_mult: f32,
        pos: (f32, f32),
        elapsed_ms: f32,
    ) -> Verdict {
        if self.banned {
            // The ban already fired; stay quiet
            return Verdict::Clear;
        }

        if (live_speed - self.baseline_speed).abs() > f32::EPSILON {
            self.banned = true;
            return Verdict::Banned(BanReason::Tampering);
        }

        let dist = {
            let dx = pos.0 - self.last_pos.0;
            let dy = pos.1 - self.last_pos.1;
            (dx * dx + dy * dy).sqrt()
        };
        self.last_pos = pos;

        if self.warmup_ticks > 0 {
            // Frame pacing is still settling; skip the plausibility check
            self.warmup_ticks -= 1;
            return Verdict::Clear;
        }

        let elapsed_ticks = (elapsed_ms / TICK_DURATION_MS).max(1.0);
        let allowed = self.baseline_speed * speed_mult * elapsed_ticks * LAG_TOLERANCE;

        if dist > allowed {
            self.suspicion += 1.0;
        } else {
            self.suspicion = (self.suspicion - SUSPICION_DECAY).max(0.0);
        }

        if self.suspicion > SUSPICION_BAN_THRESHOLD {
            self.banned = true;
            return Verdict::Banned(BanReason::SpeedHack);
        }

        Verdict::Clear
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::PLAYER_SPEED;

    fn warmed_monitor() -> SpeedMonitor {
        let mut m = SpeedMonitor::new(PLAYER_SPEED, (0.0, 0.0));
        for _ in 0..ANTICHEAT_WARMUP_TICKS {
            assert_eq!(m.check(PLAYER_SPEED, 1.0, (0.0, 0.0), 16.0), Verdict::Clear);
        }
        m
    }

    #[test]
    fn plausible_movement_stays_clear() {
        let mut m = warmed_monitor();
        let mut x = 0.0;
        for _ in 0..200 {
            x += PLAYER_SPEED;
            assert_eq!(m.check(PLAYER_SPEED, 1.0, (x, 0.0), 16.0), Verdict::Clear);
        }
        assert_eq!(m.suspicion(), 0.0);
    }

    #[test]
    fn sixth_violation_bans_exactly_once() {
        let mut m = warmed_monitor();
        let mut x = 0.0;
        let mut bans = 0;
        for tick in 1..=10 {
            x += 100.0; // far beyond the allowed envelope
            match m.check(PLAYER_SPEED, 1.0, (x, 0.0), 16.0) {
                Verdict::Banned(BanReason::SpeedHack) => {
                    bans += 1;
                    assert_eq!(tick, 6, "ban must fire on the sixth violation");
                }
                Verdict::Banned(_) => panic!("wrong ban reason"),
                Verdict::Clear => {}
            }
        }
        assert_eq!(bans, 1);
    }

    #[test]
    fn suspicion_decays_on_clean_ticks() {
        let mut m = warmed_monitor();
        m.check(PLAYER_SPEED, 1.0, (100.0, 0.0), 16.0);
        assert_eq!(m.suspicion(), 1.0);
        m.check(PLAYER_SPEED, 1.0, (100.0, 0.0), 16.0);
        assert!(m.suspicion() < 1.0);
        for _ in 0..100 {
            m.check(PLAYER_SPEED, 1.0, (100.0, 0.0), 16.0);
        }
        assert_eq!(m.suspicion(), 0.0);
    }

    #[test]
    fn tampered_speed_constant_bans_immediately() {
        let mut m = SpeedMonitor::new(PLAYER_SPEED, (0.0, 0.0));
        assert_eq!(
            m.check(PLAYER_SPEED * 2.0, 1.0, (0.0, 0.0), 16.0),
            Verdict::Banned(BanReason::Tampering)
        );
        // And never again
        assert_eq!(m.check(PLAYER_SPEED * 2.0, 1.0, (0.0, 0.0), 16.0), Verdict::Clear);
    }

    #[test]
    fn warmup_suppresses_the_speed_check() {
        let mut m = SpeedMonitor::new(PLAYER_SPEED, (0.0, 0.0));
        // Huge jumps during warm-up are ignored
        for i in 0..ANTICHEAT_WARMUP_TICKS {
            let x = (i as f32 + 1.0) * 500.0;
            assert_eq!(m.check(PLAYER_SPEED, 1.0, (x, 0.0), 16.0), Verdict::Clear);
        }
        assert_eq!(m.suspicion(), 0.0);
    }

    #[test]
    fn respawn_reset_avoids_a_false_positive() {
        let mut m = warmed_monitor();
        m.reset_position((1000.0, 700.0));
        assert_eq!(m.check(PLAYER_SPEED, 1.0, (1000.0, 700.0), 16.0), Verdict::Clear);
        assert_eq!(m.suspicion(), 0.0);
    }

    #[test]
    fn lag_spikes_widen_the_envelope() {
        let mut m = warmed_monitor();
        // 10 ticks worth of wall time allows 10 ticks worth of travel
        let dist = PLAYER_SPEED * 10.0 * 2.0; // well under 10 * tolerance
        assert_eq!(m.check(PLAYER_SPEED, 1.0, (dist, 0.0), 160.0), Verdict::Clear);
        assert_eq!(m.suspicion(), 0.0);
    }
}
