//! Closing-time solver used to lead moving targets.

use glam::Vec2;

const EPSILON: f32 = 1e-5;

/// Smallest non-negative time at which a shot of `speed` meets the target.
///
/// `relative` is the target position minus the muzzle position and
/// `target_velocity` is the target's constant velocity. Solves
/// `(|v|² − s²)t² + 2(r·v)t + |r|² = 0` and returns `None` when no real
/// non-negative root exists.
#[must_use]
pub fn intercept_time(relative: Vec2, target_velocity: Vec2, speed: f32) -> Option<f32> {
    let a = target_velocity.length_squared() - speed * speed;
    let b = 2.0 * relative.dot(target_velocity);
    let c = relative.length_squared();

    if a.abs() < EPSILON {
        if b.abs() > EPSILON {
            return Some((-c / b).max(0.0));
        }
        return None;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let first = (-b + root) / (2.0 * a);
    let second = (-b - root) / (2.0 * a);
    [first, second]
        .into_iter()
        .filter(|t| *t >= 0.0)
        .min_by(f32::total_cmp)
}

/// Lead point relative to the muzzle, or `relative` itself when no intercept exists.
#[must_use]
pub fn lead_point(relative: Vec2, target_velocity: Vec2, speed: f32) -> Vec2 {
    match intercept_time(relative, target_velocity, speed) {
        Some(t) => relative + target_velocity * t,
        None => relative,
    }
}

/// Unit firing direction toward the lead point.
///
/// Falls back to aiming along +x when the lead point coincides with the muzzle.
#[must_use]
pub fn aim_direction(relative: Vec2, target_velocity: Vec2, speed: f32) -> Vec2 {
    lead_point(relative, target_velocity, speed)
        .try_normalize()
        .unwrap_or(Vec2::X)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_target_is_aimed_at_directly() {
        let relative = Vec2::new(-240.0, 310.0);
        assert_eq!(lead_point(relative, Vec2::ZERO, 200.0), relative);
        let t = intercept_time(relative, Vec2::ZERO, 200.0).expect("root exists");
        assert!((t - relative.length() / 200.0).abs() < 1e-4);
    }

    #[test]
    fn fast_crossing_target_is_led_between_bearing_and_heading() {
        let relative = Vec2::new(200.0, 0.0);
        let velocity = Vec2::new(-150.0, 150.0);
        assert!(velocity.length() >= 200.0);

        let t = intercept_time(relative, velocity, 200.0).expect("root exists");
        assert!(t >= 0.0);

        let lead = lead_point(relative, velocity, 200.0);
        assert!(relative.perp_dot(lead) > 0.0, "lead fell behind the bearing");
        assert!(lead.perp_dot(velocity) > 0.0, "lead overshot the heading");
        assert!(lead.dot(relative) > 0.0, "lead faces away from the target");
    }

    #[test]
    fn equal_speed_uses_linear_solution() {
        let relative = Vec2::new(200.0, 0.0);
        let velocity = Vec2::new(-200.0, 0.0);
        let t = intercept_time(relative, velocity, 200.0).expect("root exists");
        assert!((t - 0.5).abs() < 1e-6);
        assert_eq!(aim_direction(relative, velocity, 200.0), Vec2::X);
    }

    #[test]
    fn fleeing_target_falls_back_to_direct_aim() {
        let relative = Vec2::new(100.0, 0.0);
        let velocity = Vec2::new(300.0, 0.0);
        assert_eq!(intercept_time(relative, velocity, 200.0), None);
        assert_eq!(lead_point(relative, velocity, 200.0), relative);
    }

    #[test]
    fn degenerate_geometry_never_produces_nan() {
        let direction = aim_direction(Vec2::ZERO, Vec2::ZERO, 0.0);
        assert_eq!(direction, Vec2::X);
    }
}
