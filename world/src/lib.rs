#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state for Reverie.
//!
//! The [`World`] owns one boss and the shared projectile set. Adapters
//! mutate it only through [`apply`] and read it through [`query`]; the
//! player avatar stays outside and is lent to every command as an
//! [`Avatar`].

use log::{debug, info};
use reverie_core::{
    Arena, BossKind, Command, DamageSource, Damageable, Event, Owner, PlayerSnapshot,
    WELCOME_BANNER,
};
use reverie_system_boss::{BossController, BossTuning};
use reverie_system_projectiles::{Hit, HitTarget, ProjectileSet, ProjectileTuning};

/// Player-controlled combatant lent to the world for the duration of a command.
pub trait Avatar: Damageable {
    /// Current position, size and velocity of the avatar.
    fn snapshot(&self) -> PlayerSnapshot;

    /// Applies a horizontal velocity multiplier for the current frame.
    fn slow(&mut self, _factor: f32) {}
}

/// Represents the authoritative state of one boss battle.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    kind: BossKind,
    tuning: BossTuning,
    projectile_tuning: ProjectileTuning,
    arena: Arena,
    seed: u64,
    boss: BossController,
    projectiles: ProjectileSet,
    hits: Vec<Hit>,
    tick_index: u64,
    defeat_announced: bool,
}

impl World {
    /// Creates a battle against `kind` whose randomness derives from `seed`.
    #[must_use]
    pub fn new(kind: BossKind, tuning: BossTuning, arena: Arena, seed: u64) -> Self {
        Self::with_projectile_tuning(kind, tuning, ProjectileTuning::default(), arena, seed)
    }

    /// Creates a battle with explicit projectile physics.
    #[must_use]
    pub fn with_projectile_tuning(
        kind: BossKind,
        tuning: BossTuning,
        projectile_tuning: ProjectileTuning,
        arena: Arena,
        seed: u64,
    ) -> Self {
        let boss = BossController::new(kind, tuning.clone(), arena, seed);
        let projectiles = ProjectileSet::new(arena, projectile_tuning.clone());
        Self {
            banner: WELCOME_BANNER,
            kind,
            tuning,
            projectile_tuning,
            arena,
            seed,
            boss,
            projectiles,
            hits: Vec::new(),
            tick_index: 0,
            defeat_announced: false,
        }
    }

    fn reset(&mut self) {
        self.boss = BossController::new(self.kind, self.tuning.clone(), self.arena, self.seed);
        self.projectiles = ProjectileSet::new(self.arena, self.projectile_tuning.clone());
        self.hits.clear();
        self.tick_index = 0;
        self.defeat_announced = false;
        info!("battle against {} reset with seed {}", self.kind, self.seed);
    }

    fn tick(&mut self, dt: f32, player: &mut impl Avatar, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        let snapshot = player.snapshot();
        self.boss.update(dt, &snapshot, &mut self.projectiles);
        self.boss.drain_events(out_events);

        self.projectiles.update(dt, snapshot.center());
        self.hits.clear();
        self.projectiles
            .check_collisions(dt, &mut *player, &mut self.boss, &mut self.hits);
        for hit in &self.hits {
            out_events.push(match hit.target {
                HitTarget::Player => Event::PlayerHit {
                    damage: hit.damage,
                    source: DamageSource::Projectile(hit.kind),
                },
                HitTarget::Boss => Event::BossHit { damage: hit.damage },
            });
        }

        let report = self.boss.resolve_hazards(dt, &mut *player, snapshot.velocity);
        if report.contact_damage > 0.0 {
            out_events.push(Event::PlayerHit {
                damage: report.contact_damage,
                source: DamageSource::Contact,
            });
        }
        if report.trail_damage > 0.0 {
            out_events.push(Event::PlayerHit {
                damage: report.trail_damage,
                source: DamageSource::Trail,
            });
        }
        if let Some(factor) = report.slow {
            player.slow(factor);
            out_events.push(Event::PlayerSlowed { factor });
        }

        if self.boss.is_fully_defeated() && !self.defeat_announced {
            self.defeat_announced = true;
            debug!("{} defeated on tick {}", self.kind, self.tick_index);
            out_events.push(Event::BossDefeated);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(
    world: &mut World,
    command: Command,
    player: &mut impl Avatar,
    out_events: &mut Vec<Event>,
) {
    match command {
        Command::Tick { dt } => world.tick(dt, player, out_events),
        Command::FirePlayerProjectile {
            origin,
            velocity,
            kind,
        } => {
            let _ = world.projectiles.spawn(origin, velocity, kind, Owner::Player);
        }
        Command::Reset => world.reset(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use reverie_core::{BossKind, Phase, StateId};
    use reverie_system_boss::TrailSegment;
    use reverie_system_projectiles::Projectile;

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Archetype of the boss being fought.
    #[must_use]
    pub fn boss_kind(world: &World) -> BossKind {
        world.kind
    }

    /// Seed the battle was created and is reset with.
    #[must_use]
    pub fn seed(world: &World) -> u64 {
        world.seed
    }

    /// Number of ticks processed since creation or the last reset.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the boss's externally visible state.
    #[must_use]
    pub fn boss_view(world: &World) -> BossView {
        let boss = &world.boss;
        BossView {
            health: boss.health(),
            max_health: boss.max_health(),
            phase: boss.phase(),
            position: boss.position(),
            size: boss.size(),
            telegraph_timer: boss.telegraph_timer(),
            state: boss.current_state(),
            stress: boss.signal().stress(),
            deadline_ratio: boss.signal().deadline_ratio(),
            defeated: boss.is_fully_defeated(),
        }
    }

    /// Live projectiles in spawn order.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        world.projectiles.as_slice()
    }

    /// Live ground trail segments.
    #[must_use]
    pub fn trail_segments(world: &World) -> &[TrailSegment] {
        world.boss.trail_segments()
    }

    /// Immutable representation of the boss used by renderers and tests.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct BossView {
        /// Remaining health.
        pub health: f32,
        /// Health the boss started with.
        pub max_health: f32,
        /// Current phase.
        pub phase: Phase,
        /// Top-left corner of the boss body.
        pub position: Vec2,
        /// Width and height of the boss body.
        pub size: Vec2,
        /// Seconds left on the visible attack warning.
        pub telegraph_timer: f32,
        /// Active behaviour state.
        pub state: StateId,
        /// Current stress level.
        pub stress: f32,
        /// Fraction of the deadline still remaining.
        pub deadline_ratio: f32,
        /// Whether the boss has finished dying.
        pub defeated: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use reverie_core::{ProjectileKind, Rect};

    struct Dummy {
        position: Vec2,
        health: f32,
        slowed: Option<f32>,
    }

    impl Damageable for Dummy {
        fn bounds(&self) -> Rect {
            Rect::new(self.position, Vec2::new(20.0, 30.0))
        }

        fn take_damage(&mut self, amount: f32) {
            self.health -= amount;
        }
    }

    impl Avatar for Dummy {
        fn snapshot(&self) -> PlayerSnapshot {
            PlayerSnapshot::new(self.position, Vec2::new(20.0, 30.0), Vec2::ZERO)
        }

        fn slow(&mut self, factor: f32) {
            self.slowed = Some(factor);
        }
    }

    fn dummy() -> Dummy {
        Dummy {
            position: Vec2::new(630.0, 612.0),
            health: 100.0,
            slowed: None,
        }
    }

    fn world(kind: BossKind) -> World {
        World::new(kind, BossTuning::for_kind(kind), Arena::default(), 17)
    }

    #[test]
    fn tick_advances_the_clock() {
        let mut world = world(BossKind::Procrastinator);
        let mut player = dummy();
        let mut events = Vec::new();

        apply(&mut world, Command::Tick { dt: 0.25 }, &mut player, &mut events);

        assert_eq!(query::tick_index(&world), 1);
        assert_eq!(events.first(), Some(&Event::TimeAdvanced { dt: 0.25 }));
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn player_projectiles_damage_the_boss() {
        let mut world = world(BossKind::Perfectionist);
        let mut player = dummy();
        let mut events = Vec::new();
        let target = query::boss_view(&world);
        let centre = target.position + target.size * 0.5;

        apply(
            &mut world,
            Command::FirePlayerProjectile {
                origin: centre,
                velocity: Vec2::ZERO,
                kind: ProjectileKind::Player,
            },
            &mut player,
            &mut events,
        );
        assert_eq!(query::projectiles(&world).len(), 1);
        apply(&mut world, Command::Tick { dt: 1.0 / 60.0 }, &mut player, &mut events);

        let damage = ProjectileKind::Player.damage();
        assert!(events.contains(&Event::BossHit { damage }));
        let view = query::boss_view(&world);
        assert_eq!(view.health, view.max_health - damage);
        assert!(query::projectiles(&world)
            .iter()
            .all(|shot| shot.owner() != Owner::Player));
    }

    #[test]
    fn reset_restores_the_seeded_battle() {
        let mut world = world(BossKind::Hollow);
        let mut player = dummy();
        let mut events = Vec::new();
        let fresh = query::boss_view(&world);

        for _ in 0..240 {
            apply(&mut world, Command::Tick { dt: 1.0 / 60.0 }, &mut player, &mut events);
        }
        apply(&mut world, Command::Reset, &mut player, &mut events);

        assert_eq!(query::boss_view(&world), fresh);
        assert_eq!(query::tick_index(&world), 0);
        assert!(query::projectiles(&world).is_empty());
        assert_eq!(query::seed(&world), 17);
        assert_eq!(query::boss_kind(&world), BossKind::Hollow);
    }

    #[test]
    fn trail_contact_reports_damage_and_slow() {
        let mut world = world(BossKind::Sloth);
        let mut player = Dummy {
            position: Vec2::new(100.0, 612.0),
            ..dummy()
        };
        let mut events = Vec::new();
        for _ in 0..120 {
            apply(&mut world, Command::Tick { dt: 1.0 / 60.0 }, &mut player, &mut events);
        }
        let patch = query::trail_segments(&world)
            .first()
            .map(|segment| segment.bounds())
            .expect("the sloth lays a trail while crawling");

        player.position = patch.center() - Vec2::new(10.0, 15.0);
        events.clear();
        apply(&mut world, Command::Tick { dt: 1.0 / 60.0 }, &mut player, &mut events);

        assert!(events.iter().any(|event| matches!(
            event,
            Event::PlayerHit {
                source: DamageSource::Trail,
                ..
            }
        )));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::PlayerSlowed { .. })));
        assert!(player.slowed.is_some());
        assert!(player.health < 100.0);
    }
}
