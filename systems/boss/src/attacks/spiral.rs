use std::f32::consts::{FRAC_PI_4, TAU};

use reverie_core::{ProjectileSink, StateId};

use super::{from_angle, telegraphing, StateCtx};
use crate::tuning::MIN_SPAWN_INTERVAL;

/// Launch speed of a spiral bullet fired at `theta`.
///
/// Grows exponentially with the angle wrapped into `[0, 2π)`, so the bullets
/// of one revolution trace a logarithmic spiral.
pub(super) fn spiral_speed(base: f32, k: f32, theta: f32) -> f32 {
    base * (k * theta.rem_euclid(TAU)).exp()
}

/// Rotating emitter whose bullet speeds grow with the emission angle.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct LogSpiralBurst {
    telegraph: f32,
    elapsed: f32,
    theta: f32,
    spawn_timer: f32,
}

impl LogSpiralBurst {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        let tuning = &ctx.tuning.spiral;
        let telegraph = (ctx.telegraph_time() * tuning.telegraph_scale).max(tuning.telegraph_floor);
        self.telegraph = ctx.show_telegraph(telegraph);
        self.elapsed = 0.0;
        self.spawn_timer = 0.0;
        self.theta = ctx.bearing_or(-FRAC_PI_4);
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

        let tuning = &ctx.tuning.spiral;
        self.elapsed += dt;
        self.spawn_timer += dt;

        let boost = ctx.signal.backlog().boost() - 1.0;
        let omega = (tuning.omega_base + tuning.omega_deadline * ctx.signal.urgency())
            * (1.0 + tuning.omega_boost * boost);
        let k = (tuning.k_base + tuning.k_stress * ctx.signal.stress_ratio())
            * (1.0 + tuning.k_boost * boost);
        let base = tuning.speed_reference.speed() * tuning.base_speed_scale;
        let interval = tuning.spawn_interval.max(MIN_SPAWN_INTERVAL);

        let origin = ctx.center();
        while self.spawn_timer >= interval {
            self.spawn_timer -= interval;
            let speed = spiral_speed(base, k, self.theta);
            ctx.fire(sink, origin, from_angle(self.theta) * speed, tuning.kind);
            self.theta += omega * interval;
        }

        if self.elapsed < tuning.duration {
            return None;
        }
        if ctx.phase().get() >= tuning.chain_phase && ctx.can_enter(StateId::RainBarrage) {
            Some(StateId::RainBarrage)
        } else {
            Some(ctx.hub)
        }
    }
}
