//! Precision patterns fired from a hovering body.

use glam::Vec2;
use reverie_core::{ProjectileKind, ProjectileSink, RateAccumulator, StateId};

use super::{from_angle, telegraphing, StateCtx};
use crate::tuning::per_phase;

/// Fan of bullets centred on the player.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SpreadShot {
    telegraph: f32,
}

impl SpreadShot {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        self.telegraph = ctx.show_telegraph(ctx.telegraph_time());
    }

    pub(crate) fn update(
        &mut self,
        dt: f32,
        ctx: &mut StateCtx<'_>,
        sink: &mut dyn ProjectileSink,
    ) -> Option<StateId> {
        if telegraphing(&mut self.telegraph, dt) {
            return None;
        }

        let tuning = &ctx.tuning.spread;
        let count = per_phase(&tuning.counts, ctx.phase(), 1);
        let bearing = ctx.bearing_or(std::f32::consts::FRAC_PI_2);
        let origin = ctx.center();
        for index in 0..count {
            let offset = if count > 1 {
                -tuning.spread * 0.5 + tuning.spread * index as f32 / (count - 1) as f32
            } else {
                0.0
            };
            let velocity = from_angle(bearing + offset) * tuning.kind.speed();
            ctx.fire(sink, origin, velocity, tuning.kind);
        }
        Some(ctx.hub)
    }
}

/// Shots aimed at where the player will be if it keeps its current velocity.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct PredictiveShot {
    telegraph: f32,
}

impl PredictiveShot {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        self.telegraph = ctx.show_telegraph(ctx.telegraph_time());
    }

    pub(crate) fn update(
        &mut self,
        dt: f32,
        ctx: &mut StateCtx<'_>,
        sink: &mut dyn ProjectileSink,
    ) -> Option<StateId> {
        if telegraphing(&mut self.telegraph, dt) {
            return None;
        }

        let tuning = &ctx.tuning.predictive_shot;
        let shots = per_phase(&tuning.shots, ctx.phase(), 1);
        let predicted = ctx.player.center() + ctx.player.velocity * tuning.prediction_time;
        let origin = ctx.center();
        let middle = shots.saturating_sub(1) as f32 * 0.5;
        for index in 0..shots {
            let aim = predicted + Vec2::X * ((index as f32 - middle) * tuning.offset_step);
            let direction = (aim - origin).try_normalize().unwrap_or(Vec2::Y);
            ctx.fire(sink, origin, direction * tuning.kind.speed(), tuning.kind);
        }
        Some(ctx.hub)
    }
}

/// Steady stream of homing missiles aimed straight at the player.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct HomingBarrage {
    telegraph: f32,
    fired: u32,
    reload: f32,
}

impl HomingBarrage {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        self.telegraph = ctx.show_telegraph(ctx.telegraph_time());
        self.fired = 0;
        self.reload = 0.0;
    }

    pub(crate) fn update(
        &mut self,
        dt: f32,
        ctx: &mut StateCtx<'_>,
        sink: &mut dyn ProjectileSink,
    ) -> Option<StateId> {
        if telegraphing(&mut self.telegraph, dt) {
            return None;
        }

        let tuning = &ctx.tuning.homing_barrage;
        self.reload -= dt;
        if self.reload <= 0.0 && self.fired < tuning.shots {
            let origin = ctx.center();
            let direction = (ctx.player.center() - origin)
                .try_normalize()
                .unwrap_or(Vec2::Y);
            ctx.fire(
                sink,
                origin,
                direction * ctx.homing_speed(),
                ProjectileKind::Homing,
            );
            self.fired += 1;
            self.reload = tuning.interval;
        }

        (self.fired >= tuning.shots).then_some(ctx.hub)
    }
}

/// Bolts emitted at a fixed rate from a rotating muzzle.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct LaserSweep {
    telegraph: f32,
    elapsed: f32,
    angle: f32,
    emitter: RateAccumulator,
}

impl LaserSweep {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        self.telegraph = ctx.show_telegraph(ctx.telegraph_time());
        self.elapsed = 0.0;
        let half_sweep = ctx.tuning.laser_sweep.sweep * 0.5;
        self.angle = ctx.bearing_or(std::f32::consts::FRAC_PI_2) - half_sweep;
        self.emitter.reset();
    }

    pub(crate) fn update(
        &mut self,
        dt: f32,
        ctx: &mut StateCtx<'_>,
        sink: &mut dyn ProjectileSink,
    ) -> Option<StateId> {
        if telegraphing(&mut self.telegraph, dt) {
            return None;
        }

        let tuning = &ctx.tuning.laser_sweep;
        let origin = ctx.center();
        for _ in 0..self.emitter.advance(tuning.rate, dt) {
            let velocity = from_angle(self.angle) * tuning.kind.speed();
            ctx.fire(sink, origin, velocity, tuning.kind);
        }
        self.elapsed += dt;
        if tuning.duration > 0.0 {
            self.angle += tuning.sweep / tuning.duration * dt;
        }

        (self.elapsed >= tuning.duration).then_some(ctx.hub)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::Harness;
    use super::*;
    use reverie_core::BossKind;

    #[test]
    fn spread_fans_symmetrically_around_the_player() {
        let mut harness = Harness::new(BossKind::Perfectionist);
        let mut state = SpreadShot::default();
        let mut ctx = harness.ctx();
        state.enter(&mut ctx);
        let mut shots = Vec::new();
        assert_eq!(state.update(0.5, &mut ctx, &mut shots), None);
        assert!(shots.is_empty(), "fired during telegraph");

        assert_eq!(state.update(0.5, &mut ctx, &mut shots), Some(StateId::Drift));
        assert_eq!(shots.len(), 7);
        let bearing = (ctx.player.center() - ctx.center()).normalize();
        let middle = shots[3].velocity.normalize();
        assert!(middle.dot(bearing) > 0.999);
        let left = shots[0].velocity.normalize().angle_between(bearing);
        let right = shots[6].velocity.normalize().angle_between(bearing);
        assert!((left + right).abs() < 1e-4);
    }

    #[test]
    fn laser_sweep_emits_ten_bolts_per_second() {
        let mut harness = Harness::new(BossKind::Perfectionist);
        let mut state = LaserSweep::default();
        let mut ctx = harness.ctx();
        state.enter(&mut ctx);
        let mut shots = Vec::new();
        let mut exit = None;
        for _ in 0..240 {
            exit = state.update(1.0 / 60.0, &mut ctx, &mut shots);
            if exit.is_some() {
                break;
            }
        }
        assert_eq!(exit, Some(StateId::Drift));
        assert!((19..=21).contains(&shots.len()), "got {}", shots.len());
        assert!(shots.iter().all(|shot| shot.kind == ProjectileKind::Laser));
    }

    #[test]
    fn homing_barrage_spaces_out_its_missiles() {
        let mut harness = Harness::new(BossKind::Perfectionist);
        let mut state = HomingBarrage::default();
        let mut ctx = harness.ctx();
        state.enter(&mut ctx);
        let mut shots = Vec::new();
        let mut frames = 0;
        while state.update(0.05, &mut ctx, &mut shots).is_none() {
            frames += 1;
            assert!(frames < 200, "barrage never finished");
        }
        assert_eq!(shots.len(), 5);
        assert!(shots.iter().all(|shot| shot.kind == ProjectileKind::Homing));
        assert!(frames >= 16 + 4 * 6 - 1);
    }
}
