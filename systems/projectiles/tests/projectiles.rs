use std::collections::HashSet;

use glam::Vec2;
use reverie_core::{Arena, Damageable, Owner, ProjectileKind, Rect};
use reverie_system_projectiles::{HitTarget, ProjectileSet, ProjectileTuning};

#[test]
fn homing_projectile_turns_toward_stationary_target() {
    let mut set = projectile_set();
    let origin = Vec2::new(200.0, 200.0);
    let target = Vec2::new(200.0, 400.0);
    let id = set.spawn(
        origin,
        Vec2::new(100.0, 0.0),
        ProjectileKind::Homing,
        Owner::Boss,
    );

    let to_target = target - origin;
    let initial_angle = Vec2::new(100.0, 0.0).angle_between(to_target).abs();

    set.update(1.0 / 60.0, target);

    let projectile = set.get(id).expect("homing projectile alive");
    let to_target = target - projectile.position();
    let steered_angle = projectile.velocity().angle_between(to_target).abs();
    assert!(
        steered_angle < initial_angle,
        "homing did not close the angle: {steered_angle} >= {initial_angle}"
    );
}

#[test]
fn homing_speed_is_clamped_to_kind_maximum() {
    let mut set = projectile_set();
    let id = set.spawn(
        Vec2::new(640.0, 100.0),
        Vec2::new(0.0, 400.0),
        ProjectileKind::Homing,
        Owner::Boss,
    );

    set.update(1.0 / 60.0, Vec2::new(640.0, 600.0));

    let speed = set.get(id).expect("alive").velocity().length();
    assert!(
        speed <= ProjectileKind::Homing.speed() + 1e-3,
        "speed {speed} exceeds homing maximum"
    );
}

#[test]
fn expired_and_out_of_bounds_projectiles_are_pruned() {
    let mut set = projectile_set();
    let escaping = set.spawn(
        Vec2::new(1320.0, 300.0),
        Vec2::new(400.0, 0.0),
        ProjectileKind::Normal,
        Owner::Boss,
    );
    let lingering = set.spawn(
        Vec2::new(640.0, 300.0),
        Vec2::ZERO,
        ProjectileKind::Normal,
        Owner::Boss,
    );

    set.update(0.1, Vec2::ZERO);
    assert!(set.get(escaping).is_none(), "escaping projectile survived");
    assert!(set.get(lingering).is_some());

    for _ in 0..60 {
        set.update(0.1, Vec2::ZERO);
    }
    assert!(set.is_empty(), "stationary projectile outlived its lifetime");
}

#[test]
fn collisions_never_count_a_projectile_twice() {
    let mut set = projectile_set();
    let mut player = Dummy::new(Vec2::new(600.0, 600.0), Vec2::new(20.0, 30.0));
    let mut boss = Dummy::new(Vec2::new(600.0, 100.0), Vec2::new(48.0, 48.0));

    for offset in 0..5 {
        let _ = set.spawn(
            Vec2::new(605.0 + offset as f32, 610.0),
            Vec2::ZERO,
            ProjectileKind::Normal,
            Owner::Boss,
        );
    }
    let _ = set.spawn(
        Vec2::new(620.0, 120.0),
        Vec2::ZERO,
        ProjectileKind::Player,
        Owner::Player,
    );

    let mut hits = Vec::new();
    for _ in 0..3 {
        set.check_collisions(1.0 / 60.0, &mut player, &mut boss, &mut hits);
    }

    let unique: HashSet<_> = hits.iter().map(|hit| hit.projectile).collect();
    assert_eq!(unique.len(), hits.len(), "a projectile was reported twice");
    assert_eq!(hits.len(), 6);
    assert_eq!(player.damage_taken, 5.0 * ProjectileKind::Normal.damage());
    assert_eq!(boss.damage_taken, ProjectileKind::Player.damage());
    assert!(set.is_empty());
    assert_eq!(
        hits.iter()
            .filter(|hit| hit.target == HitTarget::Boss)
            .count(),
        1
    );
}

#[test]
fn owners_do_not_hit_themselves() {
    let mut set = projectile_set();
    let mut player = Dummy::new(Vec2::new(600.0, 600.0), Vec2::new(20.0, 30.0));
    let mut boss = Dummy::new(Vec2::new(600.0, 100.0), Vec2::new(48.0, 48.0));
    let _ = set.spawn(
        Vec2::new(610.0, 610.0),
        Vec2::ZERO,
        ProjectileKind::Player,
        Owner::Player,
    );
    let _ = set.spawn(
        Vec2::new(620.0, 120.0),
        Vec2::ZERO,
        ProjectileKind::Laser,
        Owner::Boss,
    );

    let mut hits = Vec::new();
    set.check_collisions(1.0 / 60.0, &mut player, &mut boss, &mut hits);

    assert!(hits.is_empty());
    assert_eq!(set.len(), 2);
}

#[test]
fn slime_lands_as_a_lingering_pool() {
    let arena = Arena::default();
    let tuning = ProjectileTuning::default();
    let mut set = ProjectileSet::new(arena, tuning.clone());
    let id = set.spawn(
        Vec2::new(400.0, 560.0),
        Vec2::new(30.0, -60.0),
        ProjectileKind::Slime,
        Owner::Boss,
    );

    for _ in 0..120 {
        set.update(1.0 / 60.0, Vec2::ZERO);
    }

    let pool = set.get(id).expect("slime pool alive");
    assert!(pool.is_pooled(), "slime never pooled");
    assert_eq!(pool.velocity(), Vec2::ZERO);

    let pool_center = pool.position();
    let mut player = Dummy::new(pool_center - Vec2::new(10.0, 15.0), Vec2::new(20.0, 30.0));
    let mut boss = Dummy::new(Vec2::new(600.0, 100.0), Vec2::new(48.0, 48.0));
    let mut hits = Vec::new();
    let dt = 1.0 / 60.0;
    for _ in 0..70 {
        set.check_collisions(dt, &mut player, &mut boss, &mut hits);
    }

    assert_eq!(hits.len(), 2, "expected one tick per half second of contact");
    assert!(hits.iter().all(|hit| hit.lingering));
    assert_eq!(player.damage_taken, 2.0 * tuning.slime_pool_tick_damage);
    assert!(set.get(id).is_some(), "pool was removed on contact");
}

fn projectile_set() -> ProjectileSet {
    ProjectileSet::new(Arena::default(), ProjectileTuning::default())
}

struct Dummy {
    bounds: Rect,
    damage_taken: f32,
}

impl Dummy {
    fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            bounds: Rect::new(origin, size),
            damage_taken: 0.0,
        }
    }
}

impl Damageable for Dummy {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn take_damage(&mut self, amount: f32) {
        self.damage_taken += amount;
    }
}
