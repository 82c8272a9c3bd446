//! Rate-driven patterns whose emissions follow a Poisson-style accumulator.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use reverie_core::{ProjectileSink, RateAccumulator, StateId};

use super::{from_angle, telegraphing, StateCtx};
use crate::sampling::{clamp_soft, uniform, uniform_pair};

/// Slow bullets spawned on a ring around the player and drifting outward.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct DistractionField {
    telegraph: f32,
    elapsed: f32,
    spawner: RateAccumulator,
}

impl DistractionField {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        let telegraph = ctx
            .telegraph_time()
            .min(ctx.tuning.distraction.telegraph_cap);
        self.telegraph = ctx.show_telegraph(telegraph);
        self.elapsed = 0.0;
        self.spawner.reset();
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

        let tuning = &ctx.tuning.distraction;
        self.elapsed += dt;
        let rate = tuning.lambda0
            * (1.0 + ctx.signal.stress_ratio())
            * (1.0 + tuning.deadline_gain * ctx.signal.urgency())
            * (1.0 + tuning.boost_gain * (ctx.signal.backlog().boost() - 1.0));

        let anchor = ctx.player.center();
        for _ in 0..self.spawner.advance(rate, dt) {
            let direction = from_angle(uniform(&mut *ctx.rng, 0.0, TAU));
            let radius = uniform_pair(&mut *ctx.rng, tuning.ring_radius);
            let speed = tuning.kind.speed() * uniform_pair(&mut *ctx.rng, tuning.speed_scale);
            ctx.fire(sink, anchor + direction * radius, direction * speed, tuning.kind);
        }

        if self.elapsed < tuning.duration {
            return None;
        }
        ctx.signal.add_stress(-tuning.stress_relief);
        Some(ctx.hub)
    }
}

/// Bullets falling from the top edge, biased toward the player's column.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct RainBarrage {
    telegraph: f32,
    elapsed: f32,
    spawner: RateAccumulator,
}

impl RainBarrage {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        let tuning = &ctx.tuning.rain;
        let telegraph = (ctx.telegraph_time() * tuning.telegraph_scale).max(tuning.telegraph_floor);
        self.telegraph = ctx.show_telegraph(telegraph);
        self.elapsed = 0.0;
        self.spawner.reset();
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

        let tuning = &ctx.tuning.rain;
        self.elapsed += dt;
        let stress = ctx.signal.stress_ratio();
        let urgency = ctx.signal.urgency();
        let rate = tuning.lambda0
            * (1.0 + tuning.deadline_gain * urgency)
            * (1.0 + tuning.stress_gain * stress)
            * (1.0 + tuning.boost_gain * (ctx.signal.backlog().boost() - 1.0));

        let low = tuning.edge_margin;
        let high = ctx.arena.width() - tuning.edge_margin;
        let near_player = Normal::new(ctx.player.center().x, tuning.player_sigma).ok();
        let fall_speed = tuning.kind.speed() * (tuning.vy_base + tuning.vy_deadline * urgency);

        for _ in 0..self.spawner.advance(rate, dt) {
            let biased = ctx.rng.gen::<f32>() < tuning.player_mix;
            let x = match (&near_player, biased) {
                (Some(normal), true) => clamp_soft(normal.sample(&mut *ctx.rng), low, high),
                _ => uniform(&mut *ctx.rng, low, high),
            };
            let vx = uniform(&mut *ctx.rng, -tuning.vx_jitter, tuning.vx_jitter);
            ctx.fire(
                sink,
                Vec2::new(x, tuning.spawn_y),
                Vec2::new(vx, fall_speed),
                tuning.kind,
            );
        }

        let duration = tuning.duration_base + tuning.duration_stress * stress;
        (self.elapsed >= duration).then_some(ctx.hub)
    }
}
