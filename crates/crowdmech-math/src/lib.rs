//! 2D vector algebra for the crowdmech engine.
//!
//! All quantities are SI: meters, seconds, kilograms, radians.
//! Angles are counterclockwise positive.

/// 2D vector alias.
pub type Vec2 = nalgebra::Vector2<f64>;
/// 2D rotation alias.
pub type Rot2 = nalgebra::Rotation2<f64>;

/// Scalar 2D cross product: `a.x * b.y - a.y * b.x`.
#[inline]
pub fn cross(a: &Vec2, b: &Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Counterclockwise perpendicular: `(-v.y, v.x)`.
#[inline]
pub fn perp(v: &Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Rotate `v` by `theta` radians counterclockwise.
#[inline]
pub fn rotate(v: &Vec2, theta: f64) -> Vec2 {
    Rot2::new(theta) * v
}

/// Unit vector along `v`, or `fallback` when `v` has zero length.
///
/// The fallback keeps degenerate contact geometry (coincident centers)
/// reproducible instead of producing NaN.
#[inline]
pub fn normalize_or(v: &Vec2, fallback: Vec2) -> Vec2 {
    let n = v.norm();
    if n > 0.0 {
        v / n
    } else {
        fallback
    }
}

/// Velocity of world point `p` on a rigid body with center `x`, center
/// velocity `v` and angular velocity `omega`. The 2D angular term is
/// `omega * perp(p - x)`.
#[inline]
pub fn point_velocity(x: &Vec2, v: &Vec2, omega: f64, p: &Vec2) -> Vec2 {
    v + perp(&(p - x)) * omega
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cross_is_antisymmetric() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(-3.0, 0.5);
        assert_relative_eq!(cross(&a, &b), -cross(&b, &a));
        assert_relative_eq!(cross(&Vec2::x(), &Vec2::y()), 1.0);
    }

    #[test]
    fn perp_rotates_ccw() {
        let v = perp(&Vec2::x());
        assert_relative_eq!(v.x, 0.0);
        assert_relative_eq!(v.y, 1.0);
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate(&Vec2::x(), std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn normalize_zero_falls_back() {
        let n = normalize_or(&Vec2::zeros(), Vec2::x());
        assert_eq!(n, Vec2::x());
        let n = normalize_or(&Vec2::new(0.0, 3.0), Vec2::x());
        assert_relative_eq!(n.y, 1.0);
    }

    #[test]
    fn point_velocity_combines_translation_and_spin() {
        // Body spinning at 1 rad/s about (1, 1), point one meter to the right.
        let u = point_velocity(
            &Vec2::new(1.0, 1.0),
            &Vec2::new(0.5, 0.0),
            1.0,
            &Vec2::new(2.0, 1.0),
        );
        assert_relative_eq!(u.x, 0.5);
        assert_relative_eq!(u.y, 1.0);
    }
}
