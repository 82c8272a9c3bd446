#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared projectile simulation for boss battles.
//!
//! A single [`ProjectileSet`] owns every live projectile regardless of which
//! combatant fired it. Each frame the set advances projectiles, re-steers boss
//! homing shots toward the player, prunes expired ones and finally resolves
//! collisions against both combatants.

use glam::Vec2;
use log::trace;
use reverie_core::{Arena, Damageable, Owner, ProjectileKind, ProjectileSink, Rect};

/// Unique identifier assigned to every projectile spawned by a set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectileId(u64);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Tunable physics shared by every projectile in a set.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileTuning {
    /// Acceleration applied toward the target by boss homing shots.
    pub homing_strength: f32,
    /// Downward acceleration applied to slime globs in flight.
    pub slime_gravity: f32,
    /// Upward acceleration applied to spores while rising.
    pub spore_lift: f32,
    /// Fraction of horizontal spore velocity lost per second while rising.
    pub spore_drag: f32,
    /// Seconds a spore rises before it starts to fall.
    pub spore_float_time: f32,
    /// Downward speed a spore starts falling with.
    pub spore_drop_speed: f32,
    /// Downward acceleration applied to falling spores.
    pub spore_gravity: f32,
    /// Seconds between damage ticks of a slime pool.
    pub slime_pool_tick_interval: f32,
    /// Damage dealt by each slime pool tick.
    pub slime_pool_tick_damage: f32,
    /// Seconds between damage ticks of a spore pool.
    pub spore_pool_tick_interval: f32,
    /// Damage dealt by each spore pool tick.
    pub spore_pool_tick_damage: f32,
    /// Collision size of a spore once it has pooled.
    pub spore_pool_size: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            homing_strength: 200.0,
            slime_gravity: 250.0,
            spore_lift: 90.0,
            spore_drag: 1.2,
            spore_float_time: 1.3,
            spore_drop_speed: 240.0,
            spore_gravity: 220.0,
            slime_pool_tick_interval: 0.5,
            slime_pool_tick_damage: 6.0,
            spore_pool_tick_interval: 0.55,
            spore_pool_tick_damage: 20.0,
            spore_pool_size: 16.0,
        }
    }
}

/// Flight stage of a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stage {
    /// Moving under its own velocity, possibly affected by gravity or homing.
    Flying,
    /// Spore drifting upward before its drop.
    Rising {
        /// Seconds left before the spore starts to fall.
        remaining: f32,
    },
    /// Spore falling toward the ground.
    Falling,
    /// Stationary hazard left on the ground.
    Pooled {
        /// Seconds of contact accumulated toward the next damage tick.
        tick_timer: f32,
    },
}

/// Single moving hazard owned by a [`ProjectileSet`].
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    id: ProjectileId,
    kind: ProjectileKind,
    owner: Owner,
    position: Vec2,
    velocity: Vec2,
    damage: f32,
    lifetime: f32,
    size: f32,
    stage: Stage,
}

impl Projectile {
    /// Identifier assigned when the projectile was spawned.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Archetype of the projectile.
    #[must_use]
    pub const fn kind(&self) -> ProjectileKind {
        self.kind
    }

    /// Combatant that fired the projectile.
    #[must_use]
    pub const fn owner(&self) -> Owner {
        self.owner
    }

    /// Centre of the projectile.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity in world units per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Damage dealt by an impact.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Seconds left before the projectile expires.
    #[must_use]
    pub const fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Current flight stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Reports whether the projectile has turned into a lingering pool.
    #[must_use]
    pub const fn is_pooled(&self) -> bool {
        matches!(self.stage, Stage::Pooled { .. })
    }

    /// Square collision box centred on the projectile.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, Vec2::splat(self.size))
    }

    fn steer_toward(&mut self, target: Vec2, strength: f32, dt: f32) {
        let Some(direction) = (target - self.position).try_normalize() else {
            return;
        };
        self.velocity += direction * strength * dt;
        self.velocity = self.velocity.clamp_length_max(self.kind.speed());
    }

    fn advance(&mut self, dt: f32, target: Vec2, ground_top: f32, tuning: &ProjectileTuning) {
        self.lifetime -= dt;

        match self.stage {
            Stage::Pooled { .. } => return,
            Stage::Rising { remaining } => {
                self.velocity.y -= tuning.spore_lift * dt;
                self.velocity.x *= (1.0 - tuning.spore_drag * dt).max(0.0);
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.velocity.y = tuning.spore_drop_speed;
                    self.stage = Stage::Falling;
                } else {
                    self.stage = Stage::Rising { remaining };
                }
            }
            Stage::Falling => self.velocity.y += tuning.spore_gravity * dt,
            Stage::Flying => match self.kind {
                ProjectileKind::Homing if self.owner == Owner::Boss => {
                    self.steer_toward(target, tuning.homing_strength, dt);
                }
                ProjectileKind::Slime => self.velocity.y += tuning.slime_gravity * dt,
                _ => {}
            },
        }

        self.position += self.velocity * dt;

        let landed = self.velocity.y > 0.0 && self.position.y >= ground_top - self.size * 0.4;
        let may_pool = match self.stage {
            Stage::Flying => self.kind == ProjectileKind::Slime,
            Stage::Falling => true,
            Stage::Rising { .. } | Stage::Pooled { .. } => false,
        };
        if may_pool && landed {
            self.velocity = Vec2::ZERO;
            if self.kind == ProjectileKind::Spore {
                self.size = tuning.spore_pool_size;
            }
            self.stage = Stage::Pooled { tick_timer: 0.0 };
        }
    }
}

/// Target struck by a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// The player avatar.
    Player,
    /// The boss.
    Boss,
}

/// Record of a single damage application performed during collision resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Projectile that dealt the damage.
    pub projectile: ProjectileId,
    /// Archetype of the projectile.
    pub kind: ProjectileKind,
    /// Combatant that received the damage.
    pub target: HitTarget,
    /// Amount of damage applied.
    pub damage: f32,
    /// Whether the hit came from a lingering pool that stays alive.
    pub lingering: bool,
}

/// Owning collection of every live projectile in a battle.
#[derive(Debug)]
pub struct ProjectileSet {
    arena: Arena,
    tuning: ProjectileTuning,
    projectiles: Vec<Projectile>,
    next_id: u64,
}

impl ProjectileSet {
    /// Creates an empty set bound to the provided arena.
    #[must_use]
    pub fn new(arena: Arena, tuning: ProjectileTuning) -> Self {
        Self {
            arena,
            tuning,
            projectiles: Vec::new(),
            next_id: 0,
        }
    }

    /// Appends a new projectile centred at `position` and returns its identifier.
    pub fn spawn(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        kind: ProjectileKind,
        owner: Owner,
    ) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let stage = if kind == ProjectileKind::Spore {
            Stage::Rising {
                remaining: self.tuning.spore_float_time,
            }
        } else {
            Stage::Flying
        };
        self.projectiles.push(Projectile {
            id,
            kind,
            owner,
            position,
            velocity,
            damage: kind.damage(),
            lifetime: kind.lifetime(),
            size: kind.size(),
            stage,
        });
        id
    }

    /// Advances every projectile by `dt` seconds and prunes expired ones.
    ///
    /// Boss-owned homing projectiles re-steer toward `homing_target`.
    pub fn update(&mut self, dt: f32, homing_target: Vec2) {
        let ground_top = self.arena.ground_top();
        for projectile in &mut self.projectiles {
            projectile.advance(dt, homing_target, ground_top, &self.tuning);
        }

        let before = self.projectiles.len();
        let arena = self.arena;
        self.projectiles.retain(|projectile| {
            projectile.lifetime > 0.0
                && (projectile.is_pooled() || arena.contains_with_margin(projectile.position))
        });
        let removed = before - self.projectiles.len();
        if removed > 0 {
            trace!("pruned {removed} expired projectiles");
        }
    }

    /// Resolves collisions against both combatants and records every hit.
    ///
    /// Impact projectiles are removed together with their first hit. Pools
    /// stay alive and deal damage once per tick interval of contact.
    pub fn check_collisions(
        &mut self,
        dt: f32,
        player: &mut impl Damageable,
        boss: &mut impl Damageable,
        out: &mut Vec<Hit>,
    ) {
        let player_bounds = player.bounds();
        let boss_bounds = boss.bounds();
        let tuning = &self.tuning;

        self.projectiles.retain_mut(|projectile| {
            let bounds = projectile.bounds();
            match projectile.owner {
                Owner::Boss => {
                    if !bounds.intersects(&player_bounds) {
                        return true;
                    }
                    if let Stage::Pooled { tick_timer } = projectile.stage {
                        let (interval, damage) = match projectile.kind {
                            ProjectileKind::Spore => (
                                tuning.spore_pool_tick_interval,
                                tuning.spore_pool_tick_damage,
                            ),
                            _ => (
                                tuning.slime_pool_tick_interval,
                                tuning.slime_pool_tick_damage,
                            ),
                        };
                        let elapsed = tick_timer + dt;
                        if elapsed >= interval {
                            player.take_damage(damage);
                            out.push(Hit {
                                projectile: projectile.id,
                                kind: projectile.kind,
                                target: HitTarget::Player,
                                damage,
                                lingering: true,
                            });
                            projectile.stage = Stage::Pooled { tick_timer: 0.0 };
                        } else {
                            projectile.stage = Stage::Pooled {
                                tick_timer: elapsed,
                            };
                        }
                        return true;
                    }
                    player.take_damage(projectile.damage);
                    out.push(Hit {
                        projectile: projectile.id,
                        kind: projectile.kind,
                        target: HitTarget::Player,
                        damage: projectile.damage,
                        lingering: false,
                    });
                    false
                }
                Owner::Player => {
                    if !bounds.intersects(&boss_bounds) {
                        return true;
                    }
                    boss.take_damage(projectile.damage);
                    out.push(Hit {
                        projectile: projectile.id,
                        kind: projectile.kind,
                        target: HitTarget::Boss,
                        damage: projectile.damage,
                        lingering: false,
                    });
                    false
                }
            }
        });
    }

    /// Live projectiles in spawn order.
    #[must_use]
    pub fn as_slice(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Iterates over live projectiles in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Looks up a live projectile by identifier.
    #[must_use]
    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.iter().find(|projectile| projectile.id == id)
    }

    /// Number of live projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Reports whether no projectiles are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Removes every projectile.
    pub fn clear(&mut self) {
        self.projectiles.clear();
    }
}

impl ProjectileSink for ProjectileSet {
    fn spawn(&mut self, position: Vec2, velocity: Vec2, kind: ProjectileKind, owner: Owner) {
        let _ = ProjectileSet::spawn(self, position, velocity, kind, owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spores_rise_then_fall() {
        let tuning = ProjectileTuning::default();
        let mut set = ProjectileSet::new(Arena::default(), tuning.clone());
        let id = set.spawn(
            Vec2::new(400.0, 500.0),
            Vec2::new(0.0, -40.0),
            ProjectileKind::Spore,
            Owner::Boss,
        );

        let steps = (tuning.spore_float_time / 0.05).ceil() as usize + 1;
        for _ in 0..steps {
            set.update(0.05, Vec2::ZERO);
        }

        let spore = set.get(id).expect("spore should still be alive");
        assert_eq!(spore.stage(), Stage::Falling);
        assert!(spore.velocity().y > 0.0, "spore should be falling");
    }

    #[test]
    fn player_homing_projectiles_fly_straight() {
        let mut set = ProjectileSet::new(Arena::default(), ProjectileTuning::default());
        let id = set.spawn(
            Vec2::new(100.0, 100.0),
            Vec2::new(100.0, 0.0),
            ProjectileKind::Homing,
            Owner::Player,
        );
        set.update(0.1, Vec2::new(100.0, 600.0));
        let projectile = set.get(id).expect("projectile alive");
        assert_eq!(projectile.velocity(), Vec2::new(100.0, 0.0));
    }
}
