//! Difficulty scalars derived every tick: stress, deadline, phase and backlog.

use log::debug;
use reverie_core::Phase;

use crate::tuning::{BacklogTuning, CheckpointTuning, VitalsTuning};

/// Temporary multiplier unlocked by a streak of faked attacks.
///
/// Cashing in only refreshes an expired boost; an active boost never stacks
/// and the streak is kept until the boost runs out.
#[derive(Clone, Debug, PartialEq)]
pub struct Backlog {
    multiplier: f32,
    duration: f32,
    streak_to_cash_in: u32,
    timer: f32,
    fake_streak: u32,
}

impl Backlog {
    fn new(tuning: &BacklogTuning) -> Self {
        Self {
            multiplier: tuning.multiplier.max(1.0),
            duration: tuning.duration.max(0.0),
            streak_to_cash_in: tuning.streak_to_cash_in,
            timer: 0.0,
            fake_streak: 0,
        }
    }

    /// Multiplier applied to boosted generators; one while inactive.
    #[must_use]
    pub fn boost(&self) -> f32 {
        if self.is_active() {
            self.multiplier
        } else {
            1.0
        }
    }

    /// Reports whether the boost is currently running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }

    /// Seconds of boost remaining.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.timer
    }

    /// Consecutive faked attacks since the last cash-in.
    #[must_use]
    pub const fn fake_streak(&self) -> u32 {
        self.fake_streak
    }

    /// Records a faked attack.
    pub fn record_fake(&mut self) {
        self.fake_streak = self.fake_streak.saturating_add(1);
    }

    /// Starts the boost if the streak is long enough and no boost is running.
    pub fn try_cash_in(&mut self) -> bool {
        if self.fake_streak < self.streak_to_cash_in || self.is_active() {
            return false;
        }
        self.timer = self.duration;
        self.fake_streak = 0;
        true
    }

    fn tick(&mut self, dt: f32) {
        self.timer = (self.timer - dt).max(0.0);
    }
}

/// Per-boss difficulty scalars recomputed every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultySignal {
    stress: f32,
    max_stress: f32,
    stress_growth_rate: f32,
    deadline_left: f32,
    deadline_total: f32,
    phase: Phase,
    max_phase: Phase,
    thresholds: Vec<f32>,
    backlog: Backlog,
    checkpoint_ratios: Vec<f32>,
    checkpoint_stage: usize,
    checkpoint_base: f32,
    checkpoint_step: f32,
    drop_decay: f32,
    descent_scale: f32,
    drop_impulse: f32,
}

impl DifficultySignal {
    /// Creates the opening signal for a boss.
    #[must_use]
    pub fn new(
        vitals: &VitalsTuning,
        backlog: &BacklogTuning,
        checkpoints: &CheckpointTuning,
    ) -> Self {
        let max_stress = vitals.max_stress.max(0.0);
        let deadline_total = vitals.deadline_seconds.max(0.0);
        let phase_count = vitals.phase_thresholds.len().saturating_add(1);
        let max_phase = Phase::new(u8::try_from(phase_count).unwrap_or(u8::MAX));

        Self {
            stress: vitals.initial_stress.clamp(0.0, max_stress),
            max_stress,
            stress_growth_rate: vitals.stress_growth_rate,
            deadline_left: deadline_total,
            deadline_total,
            phase: Phase::FIRST,
            max_phase,
            thresholds: vitals.phase_thresholds.clone(),
            backlog: Backlog::new(backlog),
            checkpoint_ratios: checkpoints.deadline_ratios.clone(),
            checkpoint_stage: 0,
            checkpoint_base: checkpoints.impulse_base,
            checkpoint_step: checkpoints.impulse_step,
            drop_decay: checkpoints.decay.max(0.0),
            descent_scale: checkpoints.descent_scale,
            drop_impulse: 0.0,
        }
    }

    /// Counts the deadline down and fires any checkpoint it crosses.
    pub fn tick_deadline(&mut self, dt: f32) {
        self.deadline_left = (self.deadline_left - dt).clamp(0.0, self.deadline_total);
        self.backlog.tick(dt);

        let ratio = self.deadline_ratio();
        let stage = self
            .checkpoint_ratios
            .iter()
            .take_while(|threshold| ratio <= **threshold)
            .count();
        if stage > self.checkpoint_stage {
            let impulse = self.checkpoint_base + self.checkpoint_step * stage as f32;
            self.drop_impulse = self.drop_impulse.max(impulse);
            self.checkpoint_stage = stage;
            debug!("deadline checkpoint {stage} reached, drop impulse {impulse}");
        }
    }

    /// Advances the phase from the boss's health fraction.
    ///
    /// Returns the new phase when it advanced; phases never regress.
    pub fn advance_phase(&mut self, health_fraction: f32) -> Option<Phase> {
        let crossed = self
            .thresholds
            .iter()
            .filter(|threshold| health_fraction <= **threshold)
            .count();
        let candidate = Phase::new(u8::try_from(crossed + 1).unwrap_or(u8::MAX));
        if candidate > self.phase {
            self.phase = candidate;
            return Some(candidate);
        }
        None
    }

    /// Applies passive stress growth.
    pub fn grow_stress(&mut self, dt: f32) {
        self.add_stress(self.stress_growth_rate * dt);
    }

    /// Adds `delta` to stress, clamping to `[0, max_stress]`.
    pub fn add_stress(&mut self, delta: f32) {
        self.stress = (self.stress + delta).clamp(0.0, self.max_stress);
    }

    /// Consumes the drop impulse for one frame and returns the downward displacement.
    pub fn take_drop(&mut self, dt: f32) -> f32 {
        if self.drop_impulse <= 0.0 {
            return 0.0;
        }
        let displacement = self.drop_impulse * self.descent_scale * dt;
        self.drop_impulse = (self.drop_impulse - self.drop_decay * dt).max(0.0);
        displacement
    }

    /// Current stress.
    #[must_use]
    pub const fn stress(&self) -> f32 {
        self.stress
    }

    /// Upper clamp of stress.
    #[must_use]
    pub const fn max_stress(&self) -> f32 {
        self.max_stress
    }

    /// Stress normalised to `[0, 1]`.
    #[must_use]
    pub fn stress_ratio(&self) -> f32 {
        self.stress / self.max_stress.max(1.0)
    }

    /// Seconds left on the deadline.
    #[must_use]
    pub const fn deadline_left(&self) -> f32 {
        self.deadline_left
    }

    /// Full length of the deadline.
    #[must_use]
    pub const fn deadline_total(&self) -> f32 {
        self.deadline_total
    }

    /// Remaining fraction of the deadline; one when the deadline is disabled.
    #[must_use]
    pub fn deadline_ratio(&self) -> f32 {
        if self.deadline_total <= 0.0 {
            return 1.0;
        }
        (self.deadline_left / self.deadline_total).clamp(0.0, 1.0)
    }

    /// Urgency in `[0, 1]`, the complement of the deadline ratio.
    #[must_use]
    pub fn urgency(&self) -> f32 {
        1.0 - self.deadline_ratio()
    }

    /// Active phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Final phase this boss can reach.
    #[must_use]
    pub const fn max_phase(&self) -> Phase {
        self.max_phase
    }

    /// Phase progress normalised to `[0, 1]`.
    #[must_use]
    pub fn phase_progress(&self) -> f32 {
        self.phase.progress(self.max_phase)
    }

    /// Reports whether the boss sits in its final phase of a multi-phase fight.
    #[must_use]
    pub fn is_final_phase(&self) -> bool {
        self.max_phase > Phase::FIRST && self.phase >= self.max_phase
    }

    /// Remaining checkpoint drop impulse.
    #[must_use]
    pub const fn drop_impulse(&self) -> f32 {
        self.drop_impulse
    }

    /// Backlog boost state.
    #[must_use]
    pub const fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    /// Mutable backlog boost state.
    pub fn backlog_mut(&mut self) -> &mut Backlog {
        &mut self.backlog
    }
}
