//! States of the grounded crawler: patrol hub, lobbed volleys, dash, eruption,
//! crush and fade-out.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use rand::seq::SliceRandom;
use reverie_core::{ProjectileKind, ProjectileSink, StateId};

use super::{from_angle, telegraphing, StateCtx};
use crate::{
    sampling::{clamp_soft, uniform, uniform_pair},
    tuning::per_phase,
};

/// Patrol hub: walks toward the player's led position and counts down the attack timers.
///
/// The slime timer restarts on every entry while the other timers keep
/// running across visits, so the rarer attacks are not starved by the
/// frequent one. Expired timers are served as crush, dash, spore, eruption
/// and finally slime.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Crawl {
    target_x: Option<f32>,
    retarget: f32,
    slime_timer: f32,
    dash_timer: f32,
    spore_timer: f32,
    crush_timer: f32,
    eruption_timer: f32,
    armed: bool,
}

impl Crawl {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        let tuning = &ctx.tuning.crawl;
        let phase = ctx.phase();
        self.slime_timer = per_phase(&tuning.slime_cooldowns, phase, 0.0);
        if !self.armed {
            self.dash_timer = per_phase(&tuning.dash_cooldowns, phase, 0.0);
            self.spore_timer = per_phase(&tuning.spore_cooldowns, phase, 0.0);
            self.crush_timer = per_phase(&tuning.crush_cooldowns, phase, 0.0);
            self.eruption_timer = per_phase(&tuning.eruption_intervals, phase, 0.0);
            self.armed = true;
        }
        self.retarget = 0.0;
    }

    pub(crate) fn update(&mut self, dt: f32, ctx: &mut StateCtx<'_>) -> Option<StateId> {
        let tuning = &ctx.tuning.crawl;
        let phase = ctx.phase();
        let width = ctx.arena.width();
        let low = tuning.edge_padding;
        let high = width - tuning.edge_padding;

        self.retarget -= dt;
        if self.retarget <= 0.0 {
            let led = ctx.player.center().x + ctx.player.velocity.x * tuning.lead_time;
            self.target_x = Some(clamp_soft(led, low, high));
            self.retarget = per_phase(&tuning.retarget_intervals, phase, 0.5);
        }

        let center_x = ctx.center().x;
        let dx = self.target_x.unwrap_or(center_x) - center_x;
        if dx.abs() <= tuning.arrive_distance {
            if let Some(point) = tuning.patrol_points.choose(&mut *ctx.rng) {
                self.target_x = Some(clamp_soft(point * width, low, high));
            }
        } else {
            let speed = tuning.move_speed * per_phase(&tuning.phase_speed, phase, 1.0);
            ctx.position.x += dx.signum() * (speed * dt).min(dx.abs());
        }
        let bounds = ctx.bounds();
        ctx.trail.track(bounds, &ctx.tuning.trail);

        self.slime_timer -= dt;
        self.dash_timer -= dt;
        self.spore_timer -= dt;
        self.crush_timer -= dt;
        self.eruption_timer -= dt;
        if self.crush_timer <= 0.0 && ctx.can_enter(StateId::Crush) {
            self.crush_timer = per_phase(&tuning.crush_cooldowns, phase, 0.0);
            return Some(StateId::Crush);
        }
        if self.dash_timer <= 0.0 && ctx.can_enter(StateId::Dash) {
            self.dash_timer = per_phase(&tuning.dash_cooldowns, phase, 0.0);
            return Some(StateId::Dash);
        }
        if self.spore_timer <= 0.0 && ctx.can_enter(StateId::SporeAttack) {
            self.spore_timer = per_phase(&tuning.spore_cooldowns, phase, 0.0);
            return Some(StateId::SporeAttack);
        }
        if self.eruption_timer <= 0.0 && ctx.can_enter(StateId::Eruption) {
            self.eruption_timer = per_phase(&tuning.eruption_intervals, phase, 0.0);
            return Some(StateId::Eruption);
        }
        if self.slime_timer <= 0.0 && ctx.can_enter(StateId::SlimeAttack) {
            return Some(StateId::SlimeAttack);
        }
        None
    }
}

/// Fan of arcing slime globs aimed at the player's led position.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SlimeLob {
    telegraph: f32,
}

impl SlimeLob {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        self.telegraph = ctx.show_telegraph(ctx.tuning.slime.telegraph);
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

        let tuning = &ctx.tuning.slime;
        let phase = ctx.phase();
        let bounds = ctx.bounds();
        let origin = Vec2::new(
            bounds.center().x,
            bounds.origin().y + bounds.size().y * tuning.origin_height,
        );
        let target = ctx.player.center() + ctx.player.velocity * tuning.lead_time;
        let aim = target - origin;
        let bearing = if aim == Vec2::ZERO {
            -FRAC_PI_2
        } else {
            aim.y.atan2(aim.x)
        };

        let count = per_phase(&tuning.volleys, phase, 1);
        let span = per_phase(&tuning.spreads, phase, 0.0) * tuning.span_scale;
        let base_speed = per_phase(&tuning.speeds, phase, ProjectileKind::Slime.speed());
        for index in 0..count {
            let ratio = if count > 1 {
                index as f32 / (count - 1) as f32
            } else {
                0.5
            };
            let eased = ((ratio - 0.5) * PI).sin() + (ratio - 0.5) * 0.2;
            let angle = bearing - span * 0.5 + span * ratio + eased * 0.02;
            let speed = base_speed + uniform_pair(&mut *ctx.rng, tuning.speed_jitter);
            ctx.fire(sink, origin, from_angle(angle) * speed, ProjectileKind::Slime);
        }
        Some(ctx.hub)
    }
}

/// Spores tossed upward so that they drift down around the player.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SporeLob {
    telegraph: f32,
}

impl SporeLob {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        self.telegraph = ctx.show_telegraph(ctx.tuning.spore.telegraph);
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

        let tuning = &ctx.tuning.spore;
        let phase = ctx.phase();
        let bounds = ctx.bounds();
        let origin = Vec2::new(bounds.center().x, bounds.origin().y);
        let float_time = tuning.float_time.max(0.2);
        let target_x = ctx.player.center().x + ctx.player.velocity.x * tuning.float_time * 0.5;
        let base_vx = (target_x - origin.x) / float_time;
        let jitter = per_phase(&tuning.spreads, phase, 0.0) * 0.25;

        for _ in 0..per_phase(&tuning.counts, phase, 1) {
            let vx = base_vx + uniform(&mut *ctx.rng, -jitter, jitter);
            let vy = uniform_pair(&mut *ctx.rng, tuning.vertical_speed);
            ctx.fire(sink, origin, Vec2::new(vx, vy), ProjectileKind::Spore);
        }
        Some(ctx.hub)
    }
}

/// Horizontal charge that hurts the player once on body contact.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Dash {
    elapsed: f32,
    direction: f32,
    connected: bool,
}

impl Dash {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        self.elapsed = 0.0;
        self.connected = false;
        self.direction = if ctx.player.center().x < ctx.center().x {
            -1.0
        } else {
            1.0
        };
    }

    pub(crate) fn update(&mut self, dt: f32, ctx: &mut StateCtx<'_>) -> Option<StateId> {
        let tuning = &ctx.tuning.dash;
        self.elapsed += dt;
        let speed = per_phase(&tuning.speeds, ctx.phase(), 0.0);
        ctx.position.x += self.direction * speed * dt;

        let bounds = ctx.bounds();
        ctx.trail.track(bounds, &ctx.tuning.trail);
        if !self.connected && bounds.intersects(&ctx.player.bounds()) {
            *ctx.contact_damage += tuning.contact_damage;
            self.connected = true;
        }

        (self.elapsed >= tuning.duration).then_some(ctx.hub)
    }
}

/// Bursts the freshest trail segments, hurting a player standing on them.
///
/// Erupting segments age faster and vanish sooner afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Eruption;

impl Eruption {
    pub(crate) fn update(&self, ctx: &mut StateCtx<'_>) -> Option<StateId> {
        let tuning = &ctx.tuning.eruption;
        let touched = ctx
            .trail
            .erupt(ctx.player.bounds(), tuning.segments, tuning.age_added);
        *ctx.burst_damage += tuning.burst_damage * touched as f32;
        Some(ctx.hub)
    }
}

/// Rises over the player while the warning shows, then slams into the ground.
///
/// The impact hurts in proportion to the player's maximum health and leaves
/// a pool behind.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Crush {
    telegraph: f32,
    lift: f32,
    lift_time: f32,
    start_y: f32,
    descending: bool,
}

impl Crush {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        let tuning = &ctx.tuning.crush;
        self.telegraph = ctx.show_telegraph(tuning.telegraph);
        self.lift = 0.0;
        self.lift_time = (tuning.telegraph * tuning.lift_share).max(tuning.lift_min);
        self.start_y = ctx.position.y;
        self.descending = false;
    }

    pub(crate) fn update(&mut self, dt: f32, ctx: &mut StateCtx<'_>) -> Option<StateId> {
        let tuning = &ctx.tuning.crush;
        let floor = ctx.arena.ground_top() - ctx.size.y;

        if !self.descending {
            let width = ctx.arena.width();
            let led = ctx.player.center().x + ctx.player.velocity.x * tuning.lead_time;
            let target_x = clamp_soft(led, tuning.edge_padding, width - tuning.edge_padding);
            ctx.position.x = target_x - ctx.size.x * 0.5;

            if self.lift < 1.0 && self.lift_time > 0.0 {
                self.lift = (self.lift + dt / self.lift_time).min(1.0);
                let peak = floor - tuning.lift_height;
                ctx.position.y = self.start_y + (peak - self.start_y) * self.lift * self.lift;
            }
            self.descending = !telegraphing(&mut self.telegraph, dt);
            return None;
        }

        ctx.position.y += tuning.drop_speed * dt;
        if ctx.position.y < floor {
            return None;
        }
        ctx.position.y = floor;
        if ctx.center().distance(ctx.player.center()) <= tuning.impact_radius {
            *ctx.contact_damage += ctx.player.max_health * tuning.impact_ratio;
        }
        let bounds = ctx.bounds();
        ctx.trail.pool(bounds, &ctx.tuning.trail);
        Some(ctx.hub)
    }
}

/// Terminal state entered at zero health; reports full defeat once the fade completes.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Fading {
    elapsed: f32,
}

impl Fading {
    pub(crate) fn enter(&mut self) {
        self.elapsed = 0.0;
    }

    pub(crate) fn update(&mut self, dt: f32, ctx: &mut StateCtx<'_>) -> Option<StateId> {
        self.elapsed += dt;
        if self.elapsed >= ctx.tuning.fading.duration {
            *ctx.fully_defeated = true;
        }
        None
    }
}
