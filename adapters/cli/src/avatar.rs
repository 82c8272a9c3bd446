//! Scripted stand-in for the player used by headless runs.

use glam::Vec2;
use reverie_core::{Arena, Command, Damageable, PlayerSnapshot, ProjectileKind, Rect};
use reverie_world::{query::BossView, Avatar};

const SIZE: Vec2 = Vec2::new(20.0, 30.0);
const STRAFE_SPEED: f32 = 160.0;
const FIRE_INTERVAL: f32 = 0.2;
const EDGE_PADDING: f32 = 40.0;
const STARTING_HEALTH: f32 = 100.0;

/// Avatar that strafes along the ground and shoots at the boss on a fixed cadence.
#[derive(Clone, Debug)]
pub(crate) struct ScriptedAvatar {
    position: Vec2,
    velocity: Vec2,
    health: f32,
    slow: f32,
    reload: f32,
}

impl ScriptedAvatar {
    pub(crate) fn new(arena: &Arena) -> Self {
        Self {
            position: Vec2::new(arena.width() * 0.25, arena.ground_top() - SIZE.y),
            velocity: Vec2::new(STRAFE_SPEED, 0.0),
            health: STARTING_HEALTH,
            slow: 1.0,
            reload: 0.0,
        }
    }

    /// Moves along the ground, turning around at the arena edges.
    pub(crate) fn stride(&mut self, dt: f32, arena: &Arena) {
        self.position.x += self.velocity.x * self.slow * dt;
        let max_x = arena.width() - SIZE.x - EDGE_PADDING;
        if self.position.x <= EDGE_PADDING || self.position.x >= max_x {
            self.position.x = self.position.x.clamp(EDGE_PADDING, max_x);
            self.velocity.x = -self.velocity.x;
        }
        self.slow = 1.0;
    }

    /// Returns a shot aimed at the boss whenever the reload has elapsed.
    pub(crate) fn trigger(&mut self, dt: f32, boss: &BossView) -> Option<Command> {
        self.reload -= dt;
        if self.reload > 0.0 || boss.defeated {
            return None;
        }
        self.reload += FIRE_INTERVAL;
        let origin = self.position + SIZE * 0.5;
        let target = boss.position + boss.size * 0.5;
        let direction = (target - origin).try_normalize()?;
        Some(Command::FirePlayerProjectile {
            origin,
            velocity: direction * ProjectileKind::Player.speed(),
            kind: ProjectileKind::Player,
        })
    }

    pub(crate) fn health(&self) -> f32 {
        self.health
    }

    pub(crate) fn is_down(&self) -> bool {
        self.health <= 0.0
    }
}

impl Damageable for ScriptedAvatar {
    fn bounds(&self) -> Rect {
        Rect::new(self.position, SIZE)
    }

    fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }
}

impl Avatar for ScriptedAvatar {
    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot::new(self.position, SIZE, self.velocity * self.slow)
            .with_max_health(STARTING_HEALTH)
    }

    fn slow(&mut self, factor: f32) {
        self.slow = self.slow.min(factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverie_core::{Phase, StateId};

    fn view(position: Vec2) -> BossView {
        BossView {
            health: 100.0,
            max_health: 100.0,
            phase: Phase::FIRST,
            position,
            size: Vec2::new(60.0, 60.0),
            telegraph_timer: 0.0,
            state: StateId::Drift,
            stress: 0.0,
            deadline_ratio: 1.0,
            defeated: false,
        }
    }

    #[test]
    fn strafing_turns_around_at_the_edges() {
        let arena = Arena::default();
        let mut avatar = ScriptedAvatar::new(&arena);
        for _ in 0..600 {
            avatar.stride(1.0 / 60.0, &arena);
            let x = avatar.bounds().origin().x;
            assert!(x >= EDGE_PADDING && x + SIZE.x <= arena.width() - EDGE_PADDING);
        }
        assert!(avatar.snapshot().velocity.x < 0.0);
    }

    #[test]
    fn slow_applies_for_a_single_stride() {
        let arena = Arena::default();
        let mut avatar = ScriptedAvatar::new(&arena);
        avatar.slow(0.5);
        assert_eq!(avatar.snapshot().velocity.x, STRAFE_SPEED * 0.5);
        let start = avatar.bounds().origin().x;
        avatar.stride(1.0, &arena);
        assert_eq!(avatar.bounds().origin().x - start, STRAFE_SPEED * 0.5);
        assert_eq!(avatar.snapshot().velocity.x, STRAFE_SPEED);
    }

    #[test]
    fn trigger_respects_the_fire_interval() {
        let arena = Arena::default();
        let mut avatar = ScriptedAvatar::new(&arena);
        let boss = view(Vec2::new(600.0, 100.0));
        let shots = (0..60)
            .filter_map(|_| avatar.trigger(1.0 / 60.0, &boss))
            .count();
        assert_eq!(shots, 5);

        let mut defeated = boss;
        defeated.defeated = true;
        assert!((0..60).all(|_| avatar.trigger(1.0 / 60.0, &defeated).is_none()));
    }

    #[test]
    fn damage_floors_at_zero() {
        let mut avatar = ScriptedAvatar::new(&Arena::default());
        avatar.take_damage(250.0);
        assert_eq!(avatar.health(), 0.0);
        assert!(avatar.is_down());
    }
}
