#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Reverie boss combat engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative battle world, and the pure combat systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened during the frame. Systems never reach into each
//! other directly: bosses emit projectiles through a [`ProjectileSink`] and
//! collision resolution reaches combatants through [`Damageable`].

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Reverie.";

const DEFAULT_ARENA_WIDTH: f32 = 1280.0;
const DEFAULT_ARENA_HEIGHT: f32 = 720.0;
const DEFAULT_GROUND_HEIGHT: f32 = 78.0;
const DEFAULT_DESPAWN_MARGIN: f32 = 50.0;
const DEFAULT_PLAYER_MAX_HEALTH: f32 = 100.0;

/// Commands that express all permissible battle mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the battle clock by the provided delta time.
    Tick {
        /// Simulated seconds that elapsed since the previous tick.
        dt: f32,
    },
    /// Adds a player-owned projectile into the shared projectile set.
    FirePlayerProjectile {
        /// Spawn position of the projectile's centre.
        origin: Vec2,
        /// Initial velocity in world units per second.
        velocity: Vec2,
        /// Type of projectile being fired.
        kind: ProjectileKind,
    },
    /// Discards the current boss and projectiles and rebuilds them from scratch.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the battle clock advanced.
    TimeAdvanced {
        /// Simulated seconds that elapsed in the tick.
        dt: f32,
    },
    /// Announces that the boss swapped its active attack state.
    BossStateChanged {
        /// State that was active before the transition.
        from: StateId,
        /// State that became active.
        to: StateId,
    },
    /// Announces that the boss advanced to a harder phase.
    PhaseAdvanced {
        /// Phase that became active.
        phase: Phase,
    },
    /// Reports damage dealt to the player avatar.
    PlayerHit {
        /// Amount of health removed from the player.
        damage: f32,
        /// Origin of the damage.
        source: DamageSource,
    },
    /// Reports damage dealt to the boss.
    BossHit {
        /// Amount of health removed from the boss.
        damage: f32,
    },
    /// Reports that a ground hazard slowed the player's horizontal motion.
    PlayerSlowed {
        /// Multiplier the adapter should apply to the player's horizontal velocity.
        factor: f32,
    },
    /// Announces that the boss has been defeated. Emitted once per battle.
    BossDefeated,
}

/// Describes what dealt damage to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageSource {
    /// A projectile impact or a lingering pool tick.
    Projectile(ProjectileKind),
    /// A decaying ground trail segment left by a grounded boss.
    Trail,
    /// Direct body contact with the boss.
    Contact,
}

/// Immutable description of the play field shared by every subsystem.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    width: f32,
    height: f32,
    ground_height: f32,
    despawn_margin: f32,
}

impl Arena {
    /// Creates an arena with the provided screen dimensions and default ground.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ground_height: DEFAULT_GROUND_HEIGHT,
            despawn_margin: DEFAULT_DESPAWN_MARGIN,
        }
    }

    /// Overrides the height of the ground strip at the bottom of the arena.
    #[must_use]
    pub const fn with_ground_height(mut self, ground_height: f32) -> Self {
        self.ground_height = ground_height;
        self
    }

    /// Overrides the margin beyond the screen edges where projectiles still live.
    #[must_use]
    pub const fn with_despawn_margin(mut self, despawn_margin: f32) -> Self {
        self.despawn_margin = despawn_margin;
        self
    }

    /// Width of the play field in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the play field in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Height of the ground strip.
    #[must_use]
    pub const fn ground_height(&self) -> f32 {
        self.ground_height
    }

    /// Margin beyond the screen edges where projectiles are still simulated.
    #[must_use]
    pub const fn despawn_margin(&self) -> f32 {
        self.despawn_margin
    }

    /// Y coordinate of the walkable ground surface.
    #[must_use]
    pub fn ground_top(&self) -> f32 {
        self.height - self.ground_height
    }

    /// Reports whether the point lies inside the screen expanded by the despawn margin.
    #[must_use]
    pub fn contains_with_margin(&self, point: Vec2) -> bool {
        let margin = self.despawn_margin;
        point.x >= -margin
            && point.x <= self.width + margin
            && point.y >= -margin
            && point.y <= self.height + margin
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    origin: Vec2,
    size: Vec2,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Creates a rectangle of the provided size centred on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, size)
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Bottom-right corner of the rectangle.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Centre point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Reports whether the two rectangles overlap with positive area.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.origin.x < b_max.x
            && other.origin.x < a_max.x
            && self.origin.y < b_max.y
            && other.origin.y < a_max.y
    }
}

/// Read-only view of the player avatar supplied to the engine every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Top-left corner of the avatar's bounding box.
    pub position: Vec2,
    /// Width and height of the avatar's bounding box.
    pub size: Vec2,
    /// Current velocity of the avatar in world units per second.
    pub velocity: Vec2,
    /// Health the avatar started the battle with; scales proportional hits.
    pub max_health: f32,
}

impl PlayerSnapshot {
    /// Creates a snapshot from the avatar's position, size and velocity.
    #[must_use]
    pub const fn new(position: Vec2, size: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            size,
            velocity,
            max_health: DEFAULT_PLAYER_MAX_HEALTH,
        }
    }

    /// Replaces the default maximum health of one hundred.
    #[must_use]
    pub const fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health;
        self
    }

    /// Centre of the avatar's bounding box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Bounding box of the avatar.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

/// Anything that occupies a bounding box and can absorb damage.
pub trait Damageable {
    /// Collision box used when resolving hits.
    fn bounds(&self) -> Rect;

    /// Removes the provided amount of health.
    fn take_damage(&mut self, amount: f32);
}

/// Destination for projectiles emitted by attack generators or the player.
pub trait ProjectileSink {
    /// Requests a new projectile centred at `position`.
    fn spawn(&mut self, position: Vec2, velocity: Vec2, kind: ProjectileKind, owner: Owner);
}

/// Buffered projectile request recorded by the `Vec` sink implementation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSpawn {
    /// Spawn position of the projectile's centre.
    pub position: Vec2,
    /// Initial velocity in world units per second.
    pub velocity: Vec2,
    /// Type of projectile requested.
    pub kind: ProjectileKind,
    /// Combatant that owns the projectile.
    pub owner: Owner,
}

impl ProjectileSink for Vec<ProjectileSpawn> {
    fn spawn(&mut self, position: Vec2, velocity: Vec2, kind: ProjectileKind, owner: Owner) {
        self.push(ProjectileSpawn {
            position,
            velocity,
            kind,
            owner,
        });
    }
}

/// Combatant that fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    /// Projectile fired by the boss; it damages the player.
    Boss,
    /// Projectile fired by the player; it damages the boss.
    Player,
}

/// Enumerates the projectile archetypes understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Plain straight-moving bullet.
    Normal,
    /// Bullet that re-steers toward the player every frame.
    Homing,
    /// Fast straight-moving bolt.
    Laser,
    /// Arcing glob that falls under gravity and pools on the ground.
    Slime,
    /// Floating spore that rises, then drops and pools on the ground.
    Spore,
    /// Falling shard used by void rain barrages.
    VoidShard,
    /// Fast ember used by void-themed flourishes.
    Voidfire,
    /// Bullet fired by the player avatar.
    Player,
}

impl ProjectileKind {
    /// Health removed by a single impact.
    #[must_use]
    pub const fn damage(self) -> f32 {
        match self {
            Self::Normal => 15.0,
            Self::Homing => 18.0,
            Self::Laser => 20.0,
            Self::Slime => 10.0,
            Self::Spore => 8.0,
            Self::VoidShard => 16.0,
            Self::Voidfire => 14.0,
            Self::Player => 12.0,
        }
    }

    /// Nominal launch speed; homing projectiles never exceed it.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Normal => 250.0,
            Self::Homing => 180.0,
            Self::Laser => 350.0,
            Self::Slime => 190.0,
            Self::Spore => 60.0,
            Self::VoidShard => 300.0,
            Self::Voidfire => 420.0,
            Self::Player => 450.0,
        }
    }

    /// Edge length of the square collision box.
    #[must_use]
    pub const fn size(self) -> f32 {
        match self {
            Self::Laser => 6.0,
            Self::VoidShard => 7.0,
            Self::Voidfire => 5.0,
            Self::Slime => 12.0,
            Self::Spore => 10.0,
            Self::Normal | Self::Homing | Self::Player => 4.0,
        }
    }

    /// Seconds the projectile lives before expiring.
    #[must_use]
    pub const fn lifetime(self) -> f32 {
        match self {
            Self::Slime => 6.0,
            Self::Spore => 7.3,
            _ => 5.0,
        }
    }

    /// Reports whether the projectile turns into a lingering pool on landing.
    #[must_use]
    pub const fn pools(self) -> bool {
        matches!(self, Self::Slime | Self::Spore)
    }
}

/// Identifies a boss archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossKind {
    /// Precise aerial boss with spread, predictive, homing and sweep attacks.
    Perfectionist,
    /// Stress and deadline driven aerial boss.
    Procrastinator,
    /// Void-themed variant of the procrastinator pattern set.
    Hollow,
    /// Grounded crawler that leaves slime trails and lobs globs.
    Sloth,
}

impl BossKind {
    /// Every boss archetype in roster order.
    pub const ALL: [BossKind; 4] = [
        BossKind::Perfectionist,
        BossKind::Procrastinator,
        BossKind::Hollow,
        BossKind::Sloth,
    ];

    /// Stable lowercase name used in configuration tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Perfectionist => "perfectionist",
            Self::Procrastinator => "procrastinator",
            Self::Hollow => "hollow",
            Self::Sloth => "sloth",
        }
    }

    /// Resolves a configuration name into a boss archetype.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for BossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names every attack or movement state a boss may register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateId {
    /// Free drift hub for aerial bosses.
    Drift,
    /// Fan of bullets centred on the player bearing.
    SpreadShot,
    /// Straight shots aimed at a linearly predicted position.
    PredictiveShot,
    /// Homing salvo aimed at the interception lead point.
    PredictiveBarrage,
    /// Homing salvo aimed directly at the player.
    HomingBarrage,
    /// Rotating stream of laser bolts.
    LaserSweep,
    /// Logarithmic spiral burst.
    LogSpiralBurst,
    /// Poisson field of slow bullets around the player.
    DistractionField,
    /// Mixture-distributed rain from the top edge.
    RainBarrage,
    /// Ground patrol hub for grounded bosses.
    Crawl,
    /// Fan of arcing slime globs.
    SlimeAttack,
    /// Floating spores that pool after landing.
    SporeAttack,
    /// Horizontal charge with a single contact hit.
    Dash,
    /// Burst along the freshest trail segments.
    Eruption,
    /// Lift over the player and slam down, leaving a pool.
    Crush,
    /// Terminal defeat state.
    Fading,
}

impl StateId {
    /// Stable lowercase name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drift => "drift",
            Self::SpreadShot => "spread_shot",
            Self::PredictiveShot => "predictive_shot",
            Self::PredictiveBarrage => "predictive_barrage",
            Self::HomingBarrage => "homing_barrage",
            Self::LaserSweep => "laser_sweep",
            Self::LogSpiralBurst => "log_spiral_burst",
            Self::DistractionField => "distraction_field",
            Self::RainBarrage => "rain_barrage",
            Self::Crawl => "crawl",
            Self::SlimeAttack => "slime_attack",
            Self::SporeAttack => "spore_attack",
            Self::Dash => "dash",
            Self::Eruption => "eruption",
            Self::Crush => "crush",
            Self::Fading => "fading",
        }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete difficulty tier of a boss, starting at one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Phase(u8);

impl Phase {
    /// Opening phase every boss starts in.
    pub const FIRST: Phase = Phase(1);

    /// Creates a phase from its one-based index, saturating at one.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value == 0 {
            Self::FIRST
        } else {
            Self(value)
        }
    }

    /// One-based phase index.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Normalised progress in `[0, 1]` given the boss's final phase.
    #[must_use]
    pub fn progress(self, max_phase: Phase) -> f32 {
        if max_phase.0 <= 1 {
            return 0.0;
        }
        let span = f32::from(max_phase.0 - 1);
        (f32::from(self.0.saturating_sub(1)) / span).clamp(0.0, 1.0)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discretises a continuous event rate into whole emissions with a fractional carry.
///
/// Each call adds `rate * dt` to the carried remainder, emits the integer part
/// and keeps the fraction for the next frame, so variable frame times never
/// bias the long-run count.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RateAccumulator {
    carry: f64,
}

impl RateAccumulator {
    /// Creates an accumulator with no carried remainder.
    #[must_use]
    pub const fn new() -> Self {
        Self { carry: 0.0 }
    }

    /// Advances the process and returns how many events fire this frame.
    pub fn advance(&mut self, rate_per_second: f32, dt: f32) -> u32 {
        let step = f64::from(rate_per_second.max(0.0)) * f64::from(dt.max(0.0));
        let expected = self.carry + step;
        let whole = expected.floor();
        self.carry = expected - whole;
        whole as u32
    }

    /// Clears the carried remainder.
    pub fn reset(&mut self) {
        self.carry = 0.0;
    }

    /// Fraction of an event carried into the next frame.
    #[must_use]
    pub const fn carry(&self) -> f64 {
        self.carry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_accumulator_carries_fractional_events() {
        let mut accumulator = RateAccumulator::new();
        let mut total = 0;
        for _ in 0..600 {
            total += accumulator.advance(10.0, 1.0 / 60.0);
        }
        assert!(
            (99..=100).contains(&total),
            "expected about 100 events, got {total}"
        );
        assert!(accumulator.carry() < 1.0);
    }

    #[test]
    fn rate_accumulator_ignores_negative_inputs() {
        let mut accumulator = RateAccumulator::new();
        assert_eq!(accumulator.advance(-5.0, 1.0), 0);
        assert_eq!(accumulator.advance(5.0, -1.0), 0);
        assert_eq!(accumulator.carry(), 0.0);
    }

    #[test]
    fn rect_intersection_requires_positive_overlap() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Rect::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let overlapping = Rect::new(Vec2::new(9.0, 9.0), Vec2::splat(10.0));
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
    }

    #[test]
    fn phase_progress_spans_unit_interval() {
        let max = Phase::new(3);
        assert_eq!(Phase::FIRST.progress(max), 0.0);
        assert_eq!(Phase::new(2).progress(max), 0.5);
        assert_eq!(Phase::new(3).progress(max), 1.0);
        assert_eq!(Phase::new(2).progress(Phase::FIRST), 0.0);
        assert_eq!(Phase::new(0), Phase::FIRST);
    }

    #[test]
    fn arena_margin_bounds_are_inclusive() {
        let arena = Arena::default();
        assert!(arena.contains_with_margin(Vec2::new(-50.0, 770.0)));
        assert!(!arena.contains_with_margin(Vec2::new(-50.1, 0.0)));
        assert_eq!(arena.ground_top(), 642.0);
    }

    #[test]
    fn boss_names_round_trip() {
        for kind in BossKind::ALL {
            assert_eq!(BossKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(BossKind::from_name("dragon"), None);
    }
}
