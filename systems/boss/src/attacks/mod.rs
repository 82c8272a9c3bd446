//! Closed set of behaviour states a boss can occupy.
//!
//! Each state owns its own timers. The controller hands every state a
//! [`StateCtx`] borrowing the boss's shared data for the duration of one call;
//! states request a transition by returning the next [`StateId`] from
//! `update` rather than touching the controller directly.

mod aerial;
mod barrage;
mod drift;
mod field;
mod ground;
mod spiral;

use glam::Vec2;
use reverie_core::{
    Arena, BossKind, Owner, Phase, PlayerSnapshot, ProjectileKind, ProjectileSink, Rect, StateId,
};

use crate::{
    difficulty::DifficultySignal,
    trail::Trail,
    tuning::{per_phase, BossTuning},
    BattleRng,
};

use self::{
    aerial::{HomingBarrage, LaserSweep, PredictiveShot, SpreadShot},
    barrage::PredictiveBarrage,
    drift::Drift,
    field::{DistractionField, RainBarrage},
    ground::{Crawl, Crush, Dash, Eruption, Fading, SlimeLob, SporeLob},
    spiral::LogSpiralBurst,
};

const PERFECTIONIST_ROSTER: [StateId; 5] = [
    StateId::Drift,
    StateId::SpreadShot,
    StateId::PredictiveShot,
    StateId::HomingBarrage,
    StateId::LaserSweep,
];

const PROCRASTINATOR_ROSTER: [StateId; 5] = [
    StateId::Drift,
    StateId::DistractionField,
    StateId::PredictiveBarrage,
    StateId::LogSpiralBurst,
    StateId::RainBarrage,
];

const SLOTH_ROSTER: [StateId; 7] = [
    StateId::Crawl,
    StateId::SlimeAttack,
    StateId::SporeAttack,
    StateId::Dash,
    StateId::Eruption,
    StateId::Crush,
    StateId::Fading,
];

/// States registered for a boss archetype; the first entry is its hub.
pub(crate) fn roster(kind: BossKind) -> &'static [StateId] {
    match kind {
        BossKind::Perfectionist => &PERFECTIONIST_ROSTER,
        BossKind::Procrastinator | BossKind::Hollow => &PROCRASTINATOR_ROSTER,
        BossKind::Sloth => &SLOTH_ROSTER,
    }
}

/// Borrowed view of the boss handed to a state for one call.
pub(crate) struct StateCtx<'a> {
    pub(crate) player: PlayerSnapshot,
    pub(crate) position: &'a mut Vec2,
    pub(crate) size: Vec2,
    pub(crate) signal: &'a mut DifficultySignal,
    pub(crate) tuning: &'a BossTuning,
    pub(crate) arena: &'a Arena,
    pub(crate) rng: &'a mut BattleRng,
    pub(crate) trail: &'a mut Trail,
    pub(crate) telegraph: &'a mut f32,
    pub(crate) contact_damage: &'a mut f32,
    pub(crate) burst_damage: &'a mut f32,
    pub(crate) fully_defeated: &'a mut bool,
    pub(crate) roster: &'a [StateId],
    pub(crate) hub: StateId,
}

impl StateCtx<'_> {
    pub(crate) fn center(&self) -> Vec2 {
        *self.position + self.size * 0.5
    }

    pub(crate) fn bounds(&self) -> Rect {
        Rect::new(*self.position, self.size)
    }

    pub(crate) fn phase(&self) -> Phase {
        self.signal.phase()
    }

    pub(crate) fn can_enter(&self, state: StateId) -> bool {
        self.roster.contains(&state)
    }

    /// Angle from the boss centre to the player centre, or `fallback` when they coincide.
    pub(crate) fn bearing_or(&self, fallback: f32) -> f32 {
        let delta = self.player.center() - self.center();
        if delta == Vec2::ZERO {
            fallback
        } else {
            delta.y.atan2(delta.x)
        }
    }

    /// Telegraph length shortened by stress.
    pub(crate) fn telegraph_time(&self) -> f32 {
        let cadence = &self.tuning.cadence;
        (cadence.telegraph_base * (1.0 - cadence.telegraph_stress_slope * self.signal.stress()))
            .max(cadence.telegraph_floor)
    }

    /// Hub dwell time before the next attack.
    pub(crate) fn cooldown(&self) -> f32 {
        let cadence = &self.tuning.cadence;
        let base = per_phase(&cadence.cooldowns, self.phase(), cadence.cooldown_floor);
        (base * (1.0 - cadence.cooldown_stress_slope * self.signal.stress()))
            .max(cadence.cooldown_floor)
    }

    /// Launch speed of homing shots, raised by stress.
    pub(crate) fn homing_speed(&self) -> f32 {
        let cadence = &self.tuning.cadence;
        cadence.homing_speed_base * (1.0 + cadence.homing_speed_stress_slope * self.signal.stress())
    }

    /// Publishes a telegraph of `seconds` and returns it for the state's own countdown.
    pub(crate) fn show_telegraph(&mut self, seconds: f32) -> f32 {
        *self.telegraph = seconds;
        seconds
    }

    pub(crate) fn fire(
        &self,
        sink: &mut dyn ProjectileSink,
        position: Vec2,
        velocity: Vec2,
        kind: ProjectileKind,
    ) {
        sink.spawn(position, velocity, kind, Owner::Boss);
    }
}

/// Counts a telegraph down; true while it is still running.
fn telegraphing(remaining: &mut f32, dt: f32) -> bool {
    if *remaining > 0.0 {
        *remaining -= dt;
    }
    *remaining > 0.0
}

fn from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Behaviour state with its private timers.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AttackState {
    Drift(Drift),
    SpreadShot(SpreadShot),
    PredictiveShot(PredictiveShot),
    HomingBarrage(HomingBarrage),
    LaserSweep(LaserSweep),
    PredictiveBarrage(PredictiveBarrage),
    LogSpiralBurst(LogSpiralBurst),
    DistractionField(DistractionField),
    RainBarrage(RainBarrage),
    Crawl(Crawl),
    SlimeAttack(SlimeLob),
    SporeAttack(SporeLob),
    Dash(Dash),
    Eruption(Eruption),
    Crush(Crush),
    Fading(Fading),
}

impl AttackState {
    pub(crate) fn new(id: StateId) -> Self {
        match id {
            StateId::Drift => Self::Drift(Drift::default()),
            StateId::SpreadShot => Self::SpreadShot(SpreadShot::default()),
            StateId::PredictiveShot => Self::PredictiveShot(PredictiveShot::default()),
            StateId::HomingBarrage => Self::HomingBarrage(HomingBarrage::default()),
            StateId::LaserSweep => Self::LaserSweep(LaserSweep::default()),
            StateId::PredictiveBarrage => Self::PredictiveBarrage(PredictiveBarrage::default()),
            StateId::LogSpiralBurst => Self::LogSpiralBurst(LogSpiralBurst::default()),
            StateId::DistractionField => Self::DistractionField(DistractionField::default()),
            StateId::RainBarrage => Self::RainBarrage(RainBarrage::default()),
            StateId::Crawl => Self::Crawl(Crawl::default()),
            StateId::SlimeAttack => Self::SlimeAttack(SlimeLob::default()),
            StateId::SporeAttack => Self::SporeAttack(SporeLob::default()),
            StateId::Dash => Self::Dash(Dash::default()),
            StateId::Eruption => Self::Eruption(Eruption),
            StateId::Crush => Self::Crush(Crush::default()),
            StateId::Fading => Self::Fading(Fading::default()),
        }
    }

    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        match self {
            Self::Drift(state) => state.enter(),
            Self::SpreadShot(state) => state.enter(ctx),
            Self::PredictiveShot(state) => state.enter(ctx),
            Self::HomingBarrage(state) => state.enter(ctx),
            Self::LaserSweep(state) => state.enter(ctx),
            Self::PredictiveBarrage(state) => state.enter(ctx),
            Self::LogSpiralBurst(state) => state.enter(ctx),
            Self::DistractionField(state) => state.enter(ctx),
            Self::RainBarrage(state) => state.enter(ctx),
            Self::Crawl(state) => state.enter(ctx),
            Self::SlimeAttack(state) => state.enter(ctx),
            Self::SporeAttack(state) => state.enter(ctx),
            Self::Dash(state) => state.enter(ctx),
            Self::Eruption(_) => {}
            Self::Crush(state) => state.enter(ctx),
            Self::Fading(state) => state.enter(),
        }
    }

    /// Leaving any state withdraws a telegraph it may still be showing.
    pub(crate) fn exit(&mut self, ctx: &mut StateCtx<'_>) {
        *ctx.telegraph = 0.0;
    }

    pub(crate) fn update(
        &mut self,
        dt: f32,
        ctx: &mut StateCtx<'_>,
        sink: &mut dyn ProjectileSink,
    ) -> Option<StateId> {
        match self {
            Self::Drift(state) => state.update(dt, ctx),
            Self::SpreadShot(state) => state.update(dt, ctx, sink),
            Self::PredictiveShot(state) => state.update(dt, ctx, sink),
            Self::HomingBarrage(state) => state.update(dt, ctx, sink),
            Self::LaserSweep(state) => state.update(dt, ctx, sink),
            Self::PredictiveBarrage(state) => state.update(dt, ctx, sink),
            Self::LogSpiralBurst(state) => state.update(dt, ctx, sink),
            Self::DistractionField(state) => state.update(dt, ctx, sink),
            Self::RainBarrage(state) => state.update(dt, ctx, sink),
            Self::Crawl(state) => state.update(dt, ctx),
            Self::SlimeAttack(state) => state.update(dt, ctx, sink),
            Self::SporeAttack(state) => state.update(dt, ctx, sink),
            Self::Dash(state) => state.update(dt, ctx),
            Self::Eruption(state) => state.update(ctx),
            Self::Crush(state) => state.update(dt, ctx),
            Self::Fading(state) => state.update(dt, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::SeedableRng;
    use reverie_core::{Arena, BossKind, PlayerSnapshot, StateId};

    use super::{roster, StateCtx};
    use crate::{
        controller::spawn_position, difficulty::DifficultySignal, trail::Trail,
        tuning::BossTuning, BattleRng,
    };

    /// Owns everything a [`StateCtx`] borrows so states can be driven in isolation.
    pub(crate) struct Harness {
        pub(crate) tuning: BossTuning,
        pub(crate) signal: DifficultySignal,
        position: Vec2,
        size: Vec2,
        arena: Arena,
        rng: BattleRng,
        trail: Trail,
        telegraph: f32,
        contact_damage: f32,
        burst_damage: f32,
        fully_defeated: bool,
        roster: &'static [StateId],
        player: PlayerSnapshot,
    }

    impl Harness {
        pub(crate) fn new(kind: BossKind) -> Self {
            let tuning = BossTuning::for_kind(kind);
            let arena = Arena::default();
            let signal =
                DifficultySignal::new(&tuning.vitals, &tuning.backlog, &tuning.checkpoints);
            Self {
                position: spawn_position(&tuning, &arena),
                size: Vec2::new(tuning.body.width, tuning.body.height),
                signal,
                tuning,
                arena,
                rng: BattleRng::seed_from_u64(7),
                trail: Trail::default(),
                telegraph: 0.0,
                contact_damage: 0.0,
                burst_damage: 0.0,
                fully_defeated: false,
                roster: roster(kind),
                player: PlayerSnapshot::new(
                    Vec2::new(630.0, 585.0),
                    Vec2::new(20.0, 30.0),
                    Vec2::ZERO,
                ),
            }
        }

        pub(crate) fn ctx(&mut self) -> StateCtx<'_> {
            StateCtx {
                player: self.player,
                position: &mut self.position,
                size: self.size,
                signal: &mut self.signal,
                tuning: &self.tuning,
                arena: &self.arena,
                rng: &mut self.rng,
                trail: &mut self.trail,
                telegraph: &mut self.telegraph,
                contact_damage: &mut self.contact_damage,
                burst_damage: &mut self.burst_damage,
                fully_defeated: &mut self.fully_defeated,
                roster: self.roster,
                hub: self.roster[0],
            }
        }
    }
}
