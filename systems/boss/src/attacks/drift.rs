use log::{trace, warn};
use rand::distributions::{Distribution, WeightedIndex};
use reverie_core::StateId;

use super::StateCtx;
use crate::{difficulty::DifficultySignal, tuning::SelectionWeight};

/// Free-drift hub; the positioning controller moves the body while this state
/// waits out the cooldown and then rolls the next attack.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Drift {
    waited: f32,
}

impl Drift {
    pub(crate) fn enter(&mut self) {
        self.waited = 0.0;
    }

    pub(crate) fn update(&mut self, dt: f32, ctx: &mut StateCtx<'_>) -> Option<StateId> {
        self.waited += dt;
        if self.waited < ctx.cooldown() {
            return None;
        }
        self.waited = 0.0;
        select(ctx)
    }
}

fn select(ctx: &mut StateCtx<'_>) -> Option<StateId> {
    let rows: Vec<&SelectionWeight> = ctx
        .tuning
        .selection
        .iter()
        .filter(|row| ctx.can_enter(row.state))
        .collect();
    let weights: Vec<f32> = rows
        .iter()
        .map(|row| selection_weight(row, ctx.signal))
        .collect();

    match WeightedIndex::new(&weights) {
        Ok(distribution) => {
            let chosen = rows[distribution.sample(&mut *ctx.rng)].state;
            trace!("attack roll {weights:?} chose {chosen}");
            Some(chosen)
        }
        Err(error) => {
            warn!("no attack could be selected from {weights:?}: {error}");
            None
        }
    }
}

/// Weight of a selection row under the current signal; zero before its phase.
pub(super) fn selection_weight(row: &SelectionWeight, signal: &DifficultySignal) -> f32 {
    if signal.phase().get() < row.min_phase {
        return 0.0;
    }
    let weight = (row.base + row.stress * signal.stress_ratio() + row.urgency * signal.urgency())
        * (1.0 + row.phase_bonus * signal.phase_progress());
    if weight.is_finite() {
        weight.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::BossTuning;

    #[test]
    fn rows_stay_dormant_until_their_phase() {
        let tuning = BossTuning::procrastinator();
        let mut signal =
            DifficultySignal::new(&tuning.vitals, &tuning.backlog, &tuning.checkpoints);
        let rain = tuning
            .selection
            .iter()
            .find(|row| row.state == StateId::RainBarrage)
            .expect("rain row");
        assert_eq!(selection_weight(rain, &signal), 0.0);

        let _ = signal.advance_phase(0.2);
        assert!(selection_weight(rain, &signal) > 0.0);
    }

    #[test]
    fn urgency_and_phase_raise_the_spiral_weight() {
        let tuning = BossTuning::procrastinator();
        let mut signal =
            DifficultySignal::new(&tuning.vitals, &tuning.backlog, &tuning.checkpoints);
        let spiral = tuning
            .selection
            .iter()
            .find(|row| row.state == StateId::LogSpiralBurst)
            .expect("spiral row");
        let calm = selection_weight(spiral, &signal);
        signal.tick_deadline(90.0);
        let _ = signal.advance_phase(0.2);
        let urgent = selection_weight(spiral, &signal);
        assert!((calm - 0.4).abs() < 1e-6);
        assert!((urgent - (0.4 + 1.4 * 0.75) * 1.4).abs() < 1e-4);
    }
}
