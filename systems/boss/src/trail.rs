//! Slime trail and crush pools left behind by grounded bosses.

use glam::Vec2;
use reverie_core::Rect;

use crate::tuning::TrailTuning;

/// What left a patch on the ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    /// Dropped by a walking or dashing body.
    Slime,
    /// Left by a crush impact.
    Pool,
}

/// One hazardous patch of the trail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSegment {
    bounds: Rect,
    age: f32,
    kind: SegmentKind,
}

impl TrailSegment {
    /// Source of the patch.
    #[must_use]
    pub const fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// Area that damages the player.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Seconds since the segment was dropped.
    #[must_use]
    pub const fn age(&self) -> f32 {
        self.age
    }
}

/// Contact between the player and the trail during one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TrailContact {
    pub(crate) damage: f32,
    pub(crate) slow: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Trail {
    segments: Vec<TrailSegment>,
    last_drop_x: Option<f32>,
}

impl Trail {
    pub(crate) fn segments(&self) -> &[TrailSegment] {
        &self.segments
    }

    /// Drops a segment under `body` once it has moved far enough since the last drop.
    pub(crate) fn track(&mut self, body: Rect, tuning: &TrailTuning) {
        let x = body.center().x;
        let Some(last) = self.last_drop_x else {
            self.last_drop_x = Some(x);
            return;
        };
        if (x - last).abs() < tuning.drop_distance {
            return;
        }

        let size = Vec2::from(tuning.segment_size);
        let origin = Vec2::new(x - size.x * 0.5, body.max().y - size.y + tuning.embed);
        self.segments.push(TrailSegment {
            bounds: Rect::new(origin, size),
            age: 0.0,
            kind: SegmentKind::Slime,
        });
        self.last_drop_x = Some(x);
    }

    /// Leaves a crush pool centred under `body`.
    pub(crate) fn pool(&mut self, body: Rect, tuning: &TrailTuning) {
        let size = Vec2::from(tuning.pool_size);
        let origin = Vec2::new(
            body.center().x - size.x * 0.5,
            body.max().y - size.y + tuning.pool_embed,
        );
        self.segments.push(TrailSegment {
            bounds: Rect::new(origin, size),
            age: 0.0,
            kind: SegmentKind::Pool,
        });
    }

    pub(crate) fn age(&mut self, dt: f32, tuning: &TrailTuning) {
        for segment in &mut self.segments {
            segment.age += dt;
        }
        self.segments
            .retain(|segment| segment.age <= lifetime(segment.kind, tuning));
    }

    /// Erupts the `count` freshest segments, returning how many overlap `player`.
    ///
    /// Every erupting segment ages by `age_added` whether or not it was touched.
    pub(crate) fn erupt(&mut self, player: Rect, count: usize, age_added: f32) -> usize {
        let start = self.segments.len().saturating_sub(count);
        let mut touched = 0;
        for segment in &mut self.segments[start..] {
            if segment.bounds.intersects(&player) {
                touched += 1;
            }
            segment.age += age_added;
        }
        touched
    }

    /// Damage owed by a player standing in the trail, summed over touched segments.
    pub(crate) fn contact(
        &self,
        dt: f32,
        player: Rect,
        player_velocity: Vec2,
        enraged: bool,
        tuning: &TrailTuning,
    ) -> Option<TrailContact> {
        let idle = player_velocity.x.abs() <= tuning.idle_speed;
        let mut touching = false;
        let mut dps = 0.0;
        for segment in &self.segments {
            if !segment.bounds.intersects(&player) {
                continue;
            }
            touching = true;
            dps += match (segment.kind, idle) {
                (SegmentKind::Slime, false) => tuning.dps,
                (SegmentKind::Slime, true) => tuning.dps * tuning.idle_multiplier,
                (SegmentKind::Pool, false) => tuning.pool_dps,
                (SegmentKind::Pool, true) => tuning.pool_dps * tuning.pool_idle_multiplier,
            };
        }
        if !touching {
            return None;
        }

        if enraged {
            dps *= tuning.enrage_multiplier;
        }
        Some(TrailContact {
            damage: dps * dt,
            slow: tuning.slow,
        })
    }
}

fn lifetime(kind: SegmentKind, tuning: &TrailTuning) -> f32 {
    match kind {
        SegmentKind::Slime => tuning.lifetime,
        SegmentKind::Pool => tuning.pool_lifetime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f32) -> Rect {
        Rect::new(Vec2::new(x, 552.0), Vec2::new(120.0, 90.0))
    }

    #[test]
    fn segments_drop_every_drop_distance() {
        let tuning = TrailTuning::default();
        let mut trail = Trail::default();
        for step in 0..=100 {
            trail.track(body_at(100.0 + step as f32), &tuning);
        }
        assert_eq!(trail.segments().len(), 2);
        let first = trail.segments()[0].bounds();
        assert_eq!(first.size(), Vec2::new(48.0, 14.0));
        assert_eq!(first.max().y, 642.0 + tuning.embed);
    }

    #[test]
    fn idle_players_take_extra_damage_and_segments_expire() {
        let tuning = TrailTuning::default();
        let mut trail = Trail::default();
        trail.track(body_at(100.0), &tuning);
        trail.track(body_at(140.0), &tuning);
        let patch = trail.segments()[0].bounds();
        let player = Rect::new(patch.center() - Vec2::new(10.0, 29.0), Vec2::new(20.0, 30.0));

        let moving = trail
            .contact(1.0, player, Vec2::new(200.0, 0.0), false, &tuning)
            .expect("standing in trail");
        let idle = trail
            .contact(1.0, player, Vec2::ZERO, true, &tuning)
            .expect("standing in trail");
        assert_eq!(moving.damage, tuning.dps);
        assert_eq!(
            idle.damage,
            tuning.dps * tuning.idle_multiplier * tuning.enrage_multiplier
        );
        assert_eq!(idle.slow, tuning.slow);

        trail.age(tuning.lifetime + 0.1, &tuning);
        assert!(trail.segments().is_empty());
        assert!(trail.contact(1.0, player, Vec2::ZERO, false, &tuning).is_none());
    }

    #[test]
    fn idle_threshold_is_inclusive() {
        let tuning = TrailTuning::default();
        let mut trail = Trail::default();
        trail.track(body_at(100.0), &tuning);
        trail.track(body_at(140.0), &tuning);
        let player = Rect::from_center(trail.segments()[0].bounds().center(), Vec2::splat(10.0));

        let at_threshold = Vec2::new(-tuning.idle_speed, 0.0);
        let creeping = trail
            .contact(1.0, player, at_threshold, false, &tuning)
            .expect("standing in trail");
        assert_eq!(creeping.damage, tuning.dps * tuning.idle_multiplier);

        let walking = Vec2::new(tuning.idle_speed + 0.5, 0.0);
        let moving = trail
            .contact(1.0, player, walking, false, &tuning)
            .expect("standing in trail");
        assert_eq!(moving.damage, tuning.dps);
    }

    #[test]
    fn pools_outlive_slime_and_hurt_harder() {
        let tuning = TrailTuning::default();
        let mut trail = Trail::default();
        trail.pool(body_at(400.0), &tuning);
        let pool = trail.segments()[0];
        assert_eq!(pool.kind(), SegmentKind::Pool);
        assert_eq!(pool.bounds().size(), Vec2::new(170.0, 38.0));
        assert_eq!(pool.bounds().center().x, 460.0);

        let player = Rect::from_center(pool.bounds().center(), Vec2::splat(10.0));
        let idle = trail
            .contact(1.0, player, Vec2::ZERO, false, &tuning)
            .expect("standing in pool");
        assert_eq!(idle.damage, tuning.pool_dps * tuning.pool_idle_multiplier);

        trail.age(tuning.lifetime + 0.1, &tuning);
        assert_eq!(trail.segments().len(), 1, "pool expired with the slime");
        trail.age(tuning.pool_lifetime, &tuning);
        assert!(trail.segments().is_empty());
    }

    #[test]
    fn eruption_ages_only_the_freshest_segments() {
        let tuning = TrailTuning::default();
        let mut trail = Trail::default();
        for step in 0..=8 {
            trail.track(body_at(100.0 + step as f32 * 40.0), &tuning);
        }
        assert_eq!(trail.segments().len(), 8);
        let newest = trail.segments()[7].bounds();
        let player = Rect::from_center(newest.center(), Vec2::splat(10.0));

        assert_eq!(trail.erupt(player, 6, 0.6), 1);
        let ages: Vec<f32> = trail.segments().iter().map(TrailSegment::age).collect();
        assert_eq!(ages[..2], [0.0, 0.0]);
        assert!(ages[2..].iter().all(|age| *age == 0.6));
    }
}
