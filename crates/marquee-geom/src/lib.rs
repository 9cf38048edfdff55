//! Minimal geometry types for the orb crates (no Raylib dependency).
#![forbid(unsafe_code)]

use core::f32::consts::PI;
use core::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Latitude of a point on the unit sphere, in `[-PI/2, PI/2]`.
///
/// The input is treated as a direction; `y` is clamped so that slightly
/// denormalized vectors near the poles stay inside `asin`'s domain.
#[inline]
pub fn latitude(unit: Vec3) -> f32 {
    unit.y.clamp(-1.0, 1.0).asin()
}

/// Longitude of a point on the unit sphere, in `[-PI, PI]`.
///
/// `atan2` resolves the degenerate pole case (x = z = 0) by convention,
/// returning 0 rather than dividing by zero.
#[inline]
pub fn longitude(unit: Vec3) -> f32 {
    unit.z.atan2(unit.x)
}

/// Longitude remapped to the `[0, 1)` parametric range.
#[inline]
pub fn normalized_longitude(unit: Vec3) -> f32 {
    wrap01((longitude(unit) + PI) / (2.0 * PI))
}

/// Wrap a value into `[0, 1)` (Euclidean remainder, so negatives fold up).
#[inline]
pub fn wrap01(v: f32) -> f32 {
    let w = v.rem_euclid(1.0);
    // rem_euclid can return exactly 1.0 when v is a tiny negative number.
    if w >= 1.0 { 0.0 } else { w }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn poles_have_extreme_latitude() {
        assert_eq!(latitude(Vec3::UP), core::f32::consts::FRAC_PI_2);
        assert_eq!(latitude(Vec3::new(0.0, -1.0, 0.0)), -core::f32::consts::FRAC_PI_2);
        // atan2(0, 0) = 0 by convention; no panic at the poles
        assert_eq!(longitude(Vec3::UP), 0.0);
    }

    #[test]
    fn equator_latitude_is_zero() {
        assert_eq!(latitude(Vec3::new(1.0, 0.0, 0.0)), 0.0);
        assert_eq!(latitude(Vec3::new(0.0, 0.0, -1.0)), 0.0);
    }

    #[test]
    fn normalized_longitude_reference_points() {
        // +X is longitude 0 -> normalized 0.5; -X is +-PI -> 0 (wrapped)
        let px = normalized_longitude(Vec3::new(1.0, 0.0, 0.0));
        assert!((px - 0.5).abs() < 1e-6);
        let pz = normalized_longitude(Vec3::new(0.0, 0.0, 1.0));
        assert!((pz - 0.75).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn wrap01_stays_in_range(v in -1000.0f32..1000.0) {
            let w = wrap01(v);
            prop_assert!((0.0..1.0).contains(&w));
        }

        #[test]
        fn latitude_in_range(v in prop::array::uniform3(-10.0f32..10.0)) {
            let u = Vec3::new(v[0], v[1], v[2]).normalized();
            let lat = latitude(u);
            prop_assert!((-core::f32::consts::FRAC_PI_2..=core::f32::consts::FRAC_PI_2).contains(&lat));
        }

        #[test]
        fn longitude_in_range(v in prop::array::uniform3(-10.0f32..10.0)) {
            let u = Vec3::new(v[0], v[1], v[2]).normalized();
            let lon = longitude(u);
            prop_assert!((-core::f32::consts::PI..=core::f32::consts::PI).contains(&lon));
        }
    }
}
