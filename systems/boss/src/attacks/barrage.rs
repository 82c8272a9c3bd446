use log::debug;
use rand::Rng;
use reverie_core::{ProjectileKind, ProjectileSink, StateId};

use super::{telegraphing, StateCtx};
use crate::intercept::aim_direction;

/// Homing shots launched along the interception lead.
///
/// A calm boss may fake the barrage: it telegraphs, then walks away with a
/// little extra stress. Enough fakes in a row arm the backlog boost, which a
/// completed barrage cashes in.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct PredictiveBarrage {
    telegraph: f32,
    fake: bool,
    fired: u32,
    reload: f32,
}

impl PredictiveBarrage {
    pub(crate) fn enter(&mut self, ctx: &mut StateCtx<'_>) {
        self.telegraph = ctx.show_telegraph(ctx.telegraph_time());
        self.fired = 0;
        self.reload = 0.0;

        let backlog = &ctx.tuning.backlog;
        self.fake = ctx.signal.stress_ratio() < backlog.fake_stress_ratio
            && ctx.rng.gen::<f32>() < backlog.fake_probability;
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

        if self.fake {
            ctx.signal.add_stress(ctx.tuning.backlog.fake_stress_gain);
            ctx.signal.backlog_mut().record_fake();
            debug!(
                "barrage faked, streak {}",
                ctx.signal.backlog().fake_streak()
            );
            return Some(ctx.hub);
        }

        let tuning = &ctx.tuning.predictive_barrage;
        let boosted = ctx.signal.backlog().is_active();
        let interval = if boosted {
            tuning.boosted_interval
        } else {
            tuning.interval
        };
        let extra = if tuning.stress_per_extra_shot > 0.0 {
            let earned = (ctx.signal.stress() / tuning.stress_per_extra_shot) as u32;
            earned.min(tuning.max_extra_shots)
        } else {
            tuning.max_extra_shots
        };
        let bonus = if boosted {
            tuning.boosted_extra_shots
        } else {
            0
        };
        let to_fire = tuning.base_shots + extra + bonus;

        self.reload += dt;
        if self.reload >= interval && self.fired < to_fire {
            self.reload = 0.0;
            self.fired += 1;
            let origin = ctx.center();
            let speed = ctx.homing_speed();
            let direction = aim_direction(ctx.player.center() - origin, ctx.player.velocity, speed);
            ctx.fire(sink, origin, direction * speed, ProjectileKind::Homing);
        }

        if self.fired < to_fire {
            return None;
        }

        ctx.signal.add_stress(-tuning.stress_relief);
        if ctx.signal.backlog_mut().try_cash_in() {
            debug!("backlog boost cashed in");
        }
        if ctx.phase().get() >= tuning.chain_phase && ctx.can_enter(StateId::LogSpiralBurst) {
            Some(StateId::LogSpiralBurst)
        } else {
            Some(ctx.hub)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::Harness;
    use super::*;
    use reverie_core::BossKind;

    fn run(state: &mut PredictiveBarrage, harness: &mut Harness) -> (Option<StateId>, usize) {
        let mut ctx = harness.ctx();
        state.enter(&mut ctx);
        let mut shots = Vec::new();
        for _ in 0..600 {
            if let Some(next) = state.update(1.0 / 60.0, &mut ctx, &mut shots) {
                return (Some(next), shots.len());
            }
        }
        (None, shots.len())
    }

    #[test]
    fn calm_barrage_fires_base_shots_and_relieves_stress() {
        let mut harness = Harness::new(BossKind::Procrastinator);
        harness.tuning.backlog.fake_probability = 0.0;
        harness.signal.add_stress(30.0);
        let before = harness.signal.stress();

        let mut state = PredictiveBarrage::default();
        let (next, shots) = run(&mut state, &mut harness);
        assert_eq!(next, Some(StateId::Drift));
        assert_eq!(shots, 2 + 2);
        assert_eq!(harness.signal.stress(), before - 4.0);
    }

    #[test]
    fn fakes_arm_the_backlog_and_phase_two_chains_into_the_spiral() {
        let mut harness = Harness::new(BossKind::Procrastinator);
        harness.tuning.backlog.fake_probability = 1.0;
        let mut state = PredictiveBarrage::default();
        for _ in 0..2 {
            let (next, shots) = run(&mut state, &mut harness);
            assert_eq!(next, Some(StateId::Drift));
            assert_eq!(shots, 0, "faked barrage fired");
        }
        assert_eq!(harness.signal.backlog().fake_streak(), 2);

        harness.tuning.backlog.fake_probability = 0.0;
        let _ = harness.signal.advance_phase(0.6);
        let (next, shots) = run(&mut state, &mut harness);
        assert_eq!(next, Some(StateId::LogSpiralBurst));
        assert_eq!(shots, 2);
        assert!(harness.signal.backlog().is_active());
        assert_eq!(harness.signal.backlog().fake_streak(), 0);
    }
}
