//! Free drift movement used while an aerial boss waits between attacks.
//!
//! The drift centre chases a point that blends between a resting hover spot
//! and a spot above the player. A Lissajous figure is layered on top of it,
//! shrinking as the boss closes in, and the result is pushed out to a
//! minimum separation from the player before being clamped to the arena.

use glam::Vec2;
use rand::Rng;
use reverie_core::Arena;

use crate::{
    difficulty::DifficultySignal,
    sampling::{clamp_soft, uniform, uniform_pair},
    tuning::DriftTuning,
};

const SEPARATION_EPSILON: f32 = 1e-3;

/// How a body is held vertically when confined to the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Footing {
    /// Kept between the top margin and the drift depth limit.
    Flying,
    /// Snapped onto the ground.
    Standing,
    /// A grounded body in mid-air; free to rise but never sinks below the ground.
    Leaping,
}

/// Drives the boss along its drift path.
#[derive(Clone, Debug, PartialEq)]
pub struct PositioningController {
    tuning: DriftTuning,
    center: Vec2,
    entry: Vec2,
    time: f32,
    omega: f32,
    phase_offset: f32,
    amplitude: Vec2,
    blend_elapsed: f32,
    last_min_separation: f32,
}

impl PositioningController {
    /// Creates a controller that has not yet been entered.
    #[must_use]
    pub fn new(tuning: DriftTuning) -> Self {
        let amplitude = Vec2::new(tuning.amplitude_x, tuning.amplitude_y);
        let omega = tuning.omega;
        let last_min_separation = tuning.min_separation_base;
        Self {
            tuning,
            center: Vec2::ZERO,
            entry: Vec2::ZERO,
            time: 0.0,
            omega,
            phase_offset: 0.0,
            amplitude,
            blend_elapsed: 0.0,
            last_min_separation,
        }
    }

    /// Restarts drifting from `boss_center` with freshly randomised path parameters.
    pub fn enter<R: Rng + ?Sized>(&mut self, rng: &mut R, boss_center: Vec2) {
        let tuning = &self.tuning;
        self.time = uniform(rng, 0.0, tuning.time_offset_max);
        self.omega = tuning.omega + uniform_pair(rng, tuning.omega_jitter);
        self.phase_offset = uniform_pair(rng, tuning.phase_offset);
        self.amplitude = Vec2::new(
            tuning.amplitude_x + uniform_pair(rng, tuning.amplitude_x_jitter),
            tuning.amplitude_y + uniform_pair(rng, tuning.amplitude_y_jitter),
        );
        self.center = boss_center;
        self.entry = boss_center;
        self.blend_elapsed = 0.0;
    }

    /// Advances the drift and returns the boss's new top-left corner.
    ///
    /// Consumes this frame's share of any checkpoint drop impulse. The
    /// returned position keeps the boss centre at least
    /// [`last_min_separation`](Self::last_min_separation) from
    /// `player_center` unless the arena clamp forbids it.
    pub fn update(
        &mut self,
        dt: f32,
        player_center: Vec2,
        size: Vec2,
        signal: &mut DifficultySignal,
        arena: &Arena,
    ) -> Vec2 {
        let tuning = &self.tuning;
        self.time += dt;

        let approach = self.approach(signal);
        let rest = Vec2::new(arena.width() * 0.5, tuning.base_center_y);
        let above_player = Vec2::new(player_center.x, player_center.y - tuning.player_offset_y);
        let desired = rest.lerp(above_player, approach);
        let chase = (tuning.chase_rate * dt).clamp(0.0, 1.0);
        self.center += (desired - self.center) * chase;

        let shrink = (1.0 - tuning.amplitude_shrink * approach).max(0.0);
        let angle = self.omega * self.time;
        let wobble = Vec2::new(
            self.amplitude.x * shrink * angle.sin(),
            self.amplitude.y * shrink * (2.0 * angle + self.phase_offset).sin(),
        );
        let on_path = self.center + wobble;

        let mut candidate = if self.blend_elapsed < tuning.blend_time {
            self.blend_elapsed += dt;
            let weight = (self.blend_elapsed / tuning.blend_time).min(1.0);
            self.entry.lerp(on_path, weight)
        } else {
            on_path
        };
        candidate.y += signal.take_drop(dt);

        let min_separation = self.min_separation(signal);
        self.last_min_separation = min_separation;
        let offset = candidate - player_center;
        let distance = offset.length();
        if distance < min_separation {
            candidate = if distance > SEPARATION_EPSILON {
                player_center + offset * (min_separation / distance)
            } else {
                player_center - Vec2::Y * min_separation
            };
        }

        self.confine(candidate - size * 0.5, size, signal, arena, Footing::Flying)
    }

    /// Clamps a top-left corner into the region the boss may occupy.
    ///
    /// Standing bodies are snapped onto the ground; flying bodies keep to the
    /// edge margins and may sink no deeper than [`y_max`](Self::y_max).
    #[must_use]
    pub fn confine(
        &self,
        position: Vec2,
        size: Vec2,
        signal: &DifficultySignal,
        arena: &Arena,
        footing: Footing,
    ) -> Vec2 {
        let margin = self.tuning.edge_margin;
        let floor = arena.ground_top() - size.y;
        let x = clamp_soft(position.x, margin, arena.width() - size.x - margin);
        let y = match footing {
            Footing::Flying => clamp_soft(position.y, margin, self.y_max(signal, arena)),
            Footing::Standing => floor,
            Footing::Leaping => clamp_soft(position.y, margin, floor),
        };
        Vec2::new(x, y)
    }

    /// Minimum centre distance kept from the player for the current signal.
    #[must_use]
    pub fn min_separation(&self, signal: &DifficultySignal) -> f32 {
        let tuning = &self.tuning;
        let separation = tuning.min_separation_base
            - tuning.min_separation_phase * signal.phase_progress()
            - tuning.min_separation_deadline * signal.urgency()
            - tuning.min_separation_stress * signal.stress_ratio();
        clamp_soft(
            separation,
            tuning.min_separation_floor,
            tuning.min_separation_ceiling,
        )
    }

    /// Deepest top edge the boss may drift to.
    #[must_use]
    pub fn y_max(&self, signal: &DifficultySignal, arena: &Arena) -> f32 {
        let tuning = &self.tuning;
        let depth = tuning.y_max_base
            + tuning.y_max_deadline * signal.urgency()
            + tuning.y_max_phase * signal.phase_progress();
        depth.min(arena.height() - tuning.y_max_margin)
    }

    /// Separation enforced by the most recent [`update`](Self::update).
    #[must_use]
    pub const fn last_min_separation(&self) -> f32 {
        self.last_min_separation
    }

    fn approach(&self, signal: &DifficultySignal) -> f32 {
        let tuning = &self.tuning;
        let approach = tuning.approach_base
            + tuning.approach_phase * signal.phase_progress()
            + tuning.approach_deadline * signal.urgency()
            + tuning.approach_stress * signal.stress_ratio();
        clamp_soft(approach, tuning.approach_min, tuning.approach_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::BossTuning;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn signal(tuning: &BossTuning) -> DifficultySignal {
        DifficultySignal::new(&tuning.vitals, &tuning.backlog, &tuning.checkpoints)
    }

    #[test]
    fn separation_shrinks_with_urgency_and_respects_floor() {
        let tuning = BossTuning::procrastinator();
        let controller = PositioningController::new(tuning.drift.clone());
        let mut signal = signal(&tuning);
        let fresh = controller.min_separation(&signal);

        signal.tick_deadline(60.0);
        let halfway = controller.min_separation(&signal);
        assert!(halfway < fresh);

        signal.add_stress(1_000.0);
        signal.tick_deadline(1_000.0);
        let _ = signal.advance_phase(0.0);
        assert_eq!(
            controller.min_separation(&signal),
            tuning.drift.min_separation_floor
        );
    }

    #[test]
    fn boss_sitting_on_player_is_pushed_straight_up() {
        let tuning = BossTuning::procrastinator();
        let arena = Arena::default();
        let mut controller = PositioningController::new(DriftTuning {
            amplitude_x: 0.0,
            amplitude_y: 0.0,
            amplitude_x_jitter: [0.0, 0.0],
            amplitude_y_jitter: [0.0, 0.0],
            blend_time: 0.0,
            ..tuning.drift.clone()
        });
        let mut signal = signal(&tuning);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let player = Vec2::new(640.0, 500.0);
        controller.enter(&mut rng, player);

        let size = Vec2::splat(48.0);
        let top_left = controller.update(0.0, player, size, &mut signal, &arena);
        let center = top_left + size * 0.5;
        assert!((center.x - player.x).abs() < 1e-3);
        assert!(center.y < player.y);
        assert!(center.distance(player) >= controller.last_min_separation() - 1e-3);
    }

    #[test]
    fn grounded_bodies_snap_to_the_ground() {
        let tuning = BossTuning::sloth();
        let arena = Arena::default();
        let controller = PositioningController::new(tuning.drift.clone());
        let signal = signal(&tuning);
        let size = Vec2::new(120.0, 90.0);
        let confined =
            controller.confine(Vec2::new(-50.0, 12.0), size, &signal, &arena, Footing::Standing);
        assert_eq!(confined.y, arena.ground_top() - size.y);
        assert_eq!(confined.x, tuning.drift.edge_margin);

        let lifted = Vec2::new(300.0, 200.0);
        let leaping = controller.confine(lifted, size, &signal, &arena, Footing::Leaping);
        assert_eq!(leaping, lifted);
        let sunk = Vec2::new(300.0, 700.0);
        let landed = controller.confine(sunk, size, &signal, &arena, Footing::Leaping);
        assert_eq!(landed.y, arena.ground_top() - size.y);
    }

    #[test]
    fn player_against_the_wall_pushes_the_boss_up_and_inward() {
        let tuning = BossTuning::procrastinator();
        let arena = Arena::default();
        let mut controller = PositioningController::new(DriftTuning {
            amplitude_x: 0.0,
            amplitude_y: 0.0,
            amplitude_x_jitter: [0.0, 0.0],
            amplitude_y_jitter: [0.0, 0.0],
            blend_time: 0.0,
            ..tuning.drift.clone()
        });
        let mut signal = signal(&tuning);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let size = Vec2::splat(48.0);
        let margin = tuning.drift.edge_margin;

        for player in [
            Vec2::new(10.0, arena.ground_top() - 15.0),
            Vec2::new(arena.width() - 10.0, arena.ground_top() - 15.0),
        ] {
            controller.enter(&mut rng, player);
            let top_left = controller.update(0.0, player, size, &mut signal, &arena);
            let center = top_left + size * 0.5;
            assert!(top_left.x >= margin - 1e-3);
            assert!(top_left.x + size.x <= arena.width() - margin + 1e-3);
            assert!(center.y < player.y);
            assert!((center.x - player.x).abs() < arena.width() * 0.5);
            assert!(center.distance(player) >= controller.last_min_separation() - 1e-3);
        }
    }
}
