//! Per-boss orchestrator tying the difficulty signal, movement and attack states together.

use std::collections::BTreeMap;

use glam::Vec2;
use log::{debug, info, trace};
use rand::SeedableRng;
use reverie_core::{
    Arena, BossKind, Damageable, Event, Phase, PlayerSnapshot, ProjectileSink, Rect, StateId,
};

use crate::{
    attacks::{roster, AttackState, StateCtx},
    difficulty::DifficultySignal,
    positioning::{Footing, PositioningController},
    trail::{Trail, TrailSegment},
    tuning::BossTuning,
    BattleRng,
};

/// Damage and slowdown the boss inflicted on the player outside of projectiles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HazardReport {
    /// Damage dealt by standing in the ground trail or by an eruption this frame.
    pub trail_damage: f32,
    /// Damage dealt by a dash or crush connecting with the player.
    pub contact_damage: f32,
    /// Horizontal velocity multiplier the player should suffer, if any.
    pub slow: Option<f32>,
}

/// Top-left corner at which a boss enters the arena.
pub(crate) fn spawn_position(tuning: &BossTuning, arena: &Arena) -> Vec2 {
    let body = &tuning.body;
    let x = body.spawn[0] * arena.width() - body.width * 0.5;
    let y = if body.grounded {
        arena.ground_top() - body.height
    } else {
        body.spawn[1]
    };
    Vec2::new(x, y)
}

/// Drives a single boss through its behaviour states.
///
/// Each [`update`](Self::update) runs, in order: the deadline tick, phase
/// advancement, passive stress growth, drift positioning while in the hub,
/// the telegraph countdown and finally the active state, whose requested
/// transition is applied before the body is confined to the arena.
#[derive(Clone, Debug)]
pub struct BossController {
    kind: BossKind,
    tuning: BossTuning,
    arena: Arena,
    position: Vec2,
    size: Vec2,
    health: f32,
    max_health: f32,
    signal: DifficultySignal,
    positioning: PositioningController,
    states: BTreeMap<StateId, AttackState>,
    roster: &'static [StateId],
    hub: StateId,
    current: StateId,
    telegraph_timer: f32,
    pending_contact: f32,
    pending_burst: f32,
    trail: Trail,
    last_player: PlayerSnapshot,
    rng: BattleRng,
    fully_defeated: bool,
    events: Vec<Event>,
}

impl BossController {
    /// Creates a boss whose randomness is derived from `seed`.
    #[must_use]
    pub fn new(kind: BossKind, tuning: BossTuning, arena: Arena, seed: u64) -> Self {
        Self::with_rng(kind, tuning, arena, BattleRng::seed_from_u64(seed))
    }

    /// Creates a boss drawing from an explicitly provided random stream.
    #[must_use]
    pub fn with_rng(kind: BossKind, tuning: BossTuning, arena: Arena, rng: BattleRng) -> Self {
        let roster = roster(kind);
        let hub = roster.first().copied().unwrap_or(StateId::Drift);
        let states = roster
            .iter()
            .map(|id| (*id, AttackState::new(*id)))
            .collect();
        let max_health = tuning.vitals.max_health.max(0.0);
        let signal = DifficultySignal::new(&tuning.vitals, &tuning.backlog, &tuning.checkpoints);
        let positioning = PositioningController::new(tuning.drift.clone());
        let position = spawn_position(&tuning, &arena);
        let size = Vec2::new(tuning.body.width, tuning.body.height);
        let last_player = PlayerSnapshot::new(
            Vec2::new(arena.width() * 0.5, arena.ground_top()),
            Vec2::ZERO,
            Vec2::ZERO,
        );

        let mut controller = Self {
            kind,
            tuning,
            arena,
            position,
            size,
            health: max_health,
            max_health,
            signal,
            positioning,
            states,
            roster,
            hub,
            current: hub,
            telegraph_timer: 0.0,
            pending_contact: 0.0,
            pending_burst: 0.0,
            trail: Trail::default(),
            last_player,
            rng,
            fully_defeated: false,
            events: Vec::new(),
        };
        controller.enter_current();
        info!("{kind} enters the arena in {hub}");
        controller
    }

    /// Advances the boss by `dt` seconds, spawning projectiles into `sink`.
    pub fn update(&mut self, dt: f32, player: &PlayerSnapshot, sink: &mut dyn ProjectileSink) {
        if self.is_fully_defeated() {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.last_player = *player;

        self.signal.tick_deadline(dt);
        let health_fraction = self.health_fraction();
        if let Some(phase) = self.signal.advance_phase(health_fraction) {
            self.on_phase_advanced(phase);
        }
        self.signal.grow_stress(dt);
        if self.health <= 0.0 && self.current != StateId::Fading && self.has_state(StateId::Fading)
        {
            let _ = self.change_state(StateId::Fading);
        }

        if self.current == StateId::Drift {
            self.position = self.positioning.update(
                dt,
                player.center(),
                self.size,
                &mut self.signal,
                &self.arena,
            );
        }
        self.telegraph_timer = (self.telegraph_timer - dt).max(0.0);
        self.trail.age(dt, &self.tuning.trail);

        let current = self.current;
        let requested = {
            let (states, mut ctx) = self.split();
            states
                .get_mut(&current)
                .and_then(|state| state.update(dt, &mut ctx, sink))
        };
        if let Some(next) = requested {
            let _ = self.change_state(next);
        }

        self.position = self.positioning.confine(
            self.position,
            self.size,
            &self.signal,
            &self.arena,
            self.footing(),
        );
    }

    /// Switches to `next`, running the exit and entry hooks.
    ///
    /// Returns `false` and leaves the boss untouched when `next` is not
    /// registered for this boss or the boss is already fading out.
    pub fn change_state(&mut self, next: StateId) -> bool {
        if !self.has_state(next) {
            debug!("{} has no {next} state, staying in {}", self.kind, self.current);
            return false;
        }
        if self.current == StateId::Fading {
            return false;
        }

        let previous = self.current;
        {
            let (states, mut ctx) = self.split();
            if let Some(state) = states.get_mut(&previous) {
                state.exit(&mut ctx);
            }
        }
        self.current = next;
        self.enter_current();

        debug!("{} {previous} -> {next}", self.kind);
        self.events.push(Event::BossStateChanged {
            from: previous,
            to: next,
        });
        true
    }

    /// Removes health and relieves a capped share of stress.
    pub fn take_damage(&mut self, amount: f32) {
        if amount.is_nan() || amount <= 0.0 {
            return;
        }
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        let vitals = &self.tuning.vitals;
        let relief = (amount * vitals.damage_stress_ratio).min(vitals.damage_stress_cap);
        self.signal.add_stress(-relief);
        trace!("{} took {amount} damage, {} left", self.kind, self.health);
    }

    /// Applies contact, eruption and trail damage to the player.
    ///
    /// The trail is inert while the boss fades out.
    pub fn resolve_hazards(
        &mut self,
        dt: f32,
        player: &mut impl Damageable,
        player_velocity: Vec2,
    ) -> HazardReport {
        let mut report = HazardReport::default();
        if self.pending_contact > 0.0 {
            player.take_damage(self.pending_contact);
            report.contact_damage = self.pending_contact;
            self.pending_contact = 0.0;
        }
        if self.pending_burst > 0.0 {
            player.take_damage(self.pending_burst);
            report.trail_damage = self.pending_burst;
            self.pending_burst = 0.0;
        }
        if self.current == StateId::Fading {
            return report;
        }

        if let Some(contact) = self.trail.contact(
            dt,
            player.bounds(),
            player_velocity,
            self.signal.is_final_phase(),
            &self.tuning.trail,
        ) {
            player.take_damage(contact.damage);
            report.trail_damage += contact.damage;
            report.slow = Some(contact.slow);
        }
        report
    }

    /// Moves every event recorded since the last drain into `out`.
    pub fn drain_events(&mut self, out: &mut Vec<Event>) {
        out.append(&mut self.events);
    }

    /// Boss archetype.
    #[must_use]
    pub const fn kind(&self) -> BossKind {
        self.kind
    }

    /// Tuning the boss was built from.
    #[must_use]
    pub const fn tuning(&self) -> &BossTuning {
        &self.tuning
    }

    /// Active behaviour state.
    #[must_use]
    pub const fn current_state(&self) -> StateId {
        self.current
    }

    /// States registered for this boss.
    #[must_use]
    pub const fn roster(&self) -> &'static [StateId] {
        self.roster
    }

    /// Reports whether `state` is registered for this boss.
    #[must_use]
    pub fn has_state(&self, state: StateId) -> bool {
        self.roster.contains(&state)
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Health at battle start.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Remaining health as a fraction of the maximum.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    /// Active phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.signal.phase()
    }

    /// Stress, deadline and backlog scalars.
    #[must_use]
    pub const fn signal(&self) -> &DifficultySignal {
        &self.signal
    }

    /// Top-left corner of the body.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Width and height of the body.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Centre of the body.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Collision box of the body.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    /// Seconds left on the visible attack warning.
    #[must_use]
    pub const fn telegraph_timer(&self) -> f32 {
        self.telegraph_timer
    }

    /// Separation from the player enforced by the latest drift step.
    #[must_use]
    pub const fn min_separation(&self) -> f32 {
        self.positioning.last_min_separation()
    }

    /// Live trail segments; empty for aerial bosses.
    #[must_use]
    pub fn trail_segments(&self) -> &[TrailSegment] {
        self.trail.segments()
    }

    /// Reports whether health has been depleted.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    /// Reports whether the boss has finished dying and may be removed.
    ///
    /// Bosses with a fade-out state finish once it completes; all others
    /// finish as soon as their health is depleted.
    #[must_use]
    pub fn is_fully_defeated(&self) -> bool {
        if self.has_state(StateId::Fading) {
            self.fully_defeated
        } else {
            self.is_defeated()
        }
    }

    fn on_phase_advanced(&mut self, phase: Phase) {
        info!("{} advanced to phase {phase}", self.kind);
        self.events.push(Event::PhaseAdvanced { phase });
        if self.tuning.vitals.interrupt_on_phase_advance
            && self.current != self.hub
            && self.current != StateId::Fading
        {
            let _ = self.change_state(self.hub);
        }
    }

    fn footing(&self) -> Footing {
        match (self.tuning.body.grounded, self.current) {
            (false, _) => Footing::Flying,
            (true, StateId::Crush) => Footing::Leaping,
            (true, _) => Footing::Standing,
        }
    }

    fn enter_current(&mut self) {
        let current = self.current;
        {
            let (states, mut ctx) = self.split();
            if let Some(state) = states.get_mut(&current) {
                state.enter(&mut ctx);
            }
        }
        if current == StateId::Drift {
            let center = self.center();
            self.positioning.enter(&mut self.rng, center);
        }
    }

    fn split(&mut self) -> (&mut BTreeMap<StateId, AttackState>, StateCtx<'_>) {
        let ctx = StateCtx {
            player: self.last_player,
            position: &mut self.position,
            size: self.size,
            signal: &mut self.signal,
            tuning: &self.tuning,
            arena: &self.arena,
            rng: &mut self.rng,
            trail: &mut self.trail,
            telegraph: &mut self.telegraph_timer,
            contact_damage: &mut self.pending_contact,
            burst_damage: &mut self.pending_burst,
            fully_defeated: &mut self.fully_defeated,
            roster: self.roster,
            hub: self.hub,
        };
        (&mut self.states, ctx)
    }
}

impl Damageable for BossController {
    fn bounds(&self) -> Rect {
        BossController::bounds(self)
    }

    fn take_damage(&mut self, amount: f32) {
        BossController::take_damage(self, amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverie_core::ProjectileSpawn;

    fn player() -> PlayerSnapshot {
        PlayerSnapshot::new(Vec2::new(630.0, 585.0), Vec2::new(20.0, 30.0), Vec2::ZERO)
    }

    #[test]
    fn damage_is_clamped_and_relieves_capped_stress() {
        let mut boss = BossController::new(
            BossKind::Procrastinator,
            BossTuning::procrastinator(),
            Arena::default(),
            1,
        );
        let stress = boss.signal().stress();
        boss.take_damage(5.0);
        assert_eq!(boss.health(), 515.0);
        assert_eq!(boss.signal().stress(), stress - 3.0);

        boss.take_damage(100.0);
        assert_eq!(boss.signal().stress(), stress - 9.0);

        boss.take_damage(-50.0);
        boss.take_damage(f32::NAN);
        assert_eq!(boss.health(), 415.0);

        boss.take_damage(10_000.0);
        assert_eq!(boss.health(), 0.0);
        assert!(boss.is_fully_defeated());
    }

    #[test]
    fn perfectionist_phase_advance_interrupts_the_attack() {
        let mut boss = BossController::new(
            BossKind::Perfectionist,
            BossTuning::perfectionist(),
            Arena::default(),
            5,
        );
        assert!(boss.change_state(StateId::LaserSweep));
        assert!(boss.telegraph_timer() > 0.0);

        boss.take_damage(260.0);
        let mut shots: Vec<ProjectileSpawn> = Vec::new();
        boss.update(1.0 / 60.0, &player(), &mut shots);

        assert_eq!(boss.phase(), Phase::new(2));
        assert_eq!(boss.current_state(), StateId::Drift);
        let mut events = Vec::new();
        boss.drain_events(&mut events);
        assert!(events.contains(&Event::PhaseAdvanced {
            phase: Phase::new(2)
        }));
        assert!(events.contains(&Event::BossStateChanged {
            from: StateId::LaserSweep,
            to: StateId::Drift,
        }));
    }

    #[test]
    fn fading_is_terminal() {
        let mut boss =
            BossController::new(BossKind::Sloth, BossTuning::sloth(), Arena::default(), 2);
        boss.take_damage(1_000.0);
        let mut shots: Vec<ProjectileSpawn> = Vec::new();
        boss.update(0.1, &player(), &mut shots);
        assert_eq!(boss.current_state(), StateId::Fading);
        assert!(!boss.change_state(StateId::Crawl));
        assert!(!boss.is_fully_defeated());
    }
}
