use crate::{Error, Result, Scalar, Vec3};
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Four-component vector.
///
/// Doubles as homogeneous coordinates (w = 1 for points, 0 for directions)
/// and as the packed per-vertex "tangent + bitangent sign" attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec4<S> {
    pub x: S,
    pub y: S,
    pub z: S,
    pub w: S,
}

impl<S: Scalar> Vec4<S> {
    #[inline]
    pub fn new(x: S, y: S, z: S, w: S) -> Self { Self { x, y, z, w } }

    #[inline]
    pub fn zero() -> Self { Self::splat(S::ZERO) }

    #[inline]
    pub fn splat(v: S) -> Self { Self::new(v, v, v, v) }

    #[inline]
    pub fn dot(self, rhs: Self) -> S {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    #[inline]
    pub fn length_sq(self) -> S { self.dot(self) }

    #[inline]
    pub fn length(self) -> S { self.length_sq().sqrt() }

    /// Largest absolute component (the max norm).
    #[inline]
    pub fn max_abs(self) -> S {
        self.x.abs().max(self.y.abs()).max(self.z.abs()).max(self.w.abs())
    }

    /// Fails with [`Error::DegenerateVector`] on zero or non-finite length.
    /// Scales by [`max_abs`](Self::max_abs) before squaring, like
    /// [`Vec3::normalize`].
    pub fn normalize(self) -> Result<Self> {
        let m = self.max_abs();
        if !(m > S::ZERO && m.is_finite()) {
            return Err(Error::DegenerateVector);
        }
        let v = self / m;
        let n = v.length();
        if n.is_finite() {
            Ok(v / n)
        } else {
            Err(Error::DegenerateVector)
        }
    }

    /// Truncate to Vec3 (drop w)
    #[inline]
    pub fn truncate(self) -> Vec3<S> {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Perspective divide: xyz / w
    #[inline]
    pub fn project(self) -> Vec3<S> {
        let inv_w = self.w.recip();
        Vec3::new(self.x * inv_w, self.y * inv_w, self.z * inv_w)
    }

    #[inline]
    pub fn lerp(self, other: Self, t: S) -> Self {
        self * (S::ONE - t) + other * t
    }

    #[inline]
    pub fn to_array(self) -> [S; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl<S: Scalar> Default for Vec4<S> {
    fn default() -> Self { Self::zero() }
}

impl<S: Scalar> From<[S; 4]> for Vec4<S> {
    fn from(a: [S; 4]) -> Self { Self::new(a[0], a[1], a[2], a[3]) }
}

impl<S: Scalar> From<Vec4<S>> for [S; 4] {
    fn from(v: Vec4<S>) -> Self { v.to_array() }
}

impl<S: Scalar> Add for Vec4<S> {
    type Output = Self;
    #[inline] fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl<S: Scalar> Sub for Vec4<S> {
    type Output = Self;
    #[inline] fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl<S: Scalar> Neg for Vec4<S> {
    type Output = Self;
    #[inline] fn neg(self) -> Self { Self::new(-self.x, -self.y, -self.z, -self.w) }
}

impl<S: Scalar> Mul<S> for Vec4<S> {
    type Output = Self;
    #[inline] fn mul(self, rhs: S) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl<S: Scalar> Div<S> for Vec4<S> {
    type Output = Self;
    #[inline] fn div(self, rhs: S) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs, self.w / rhs)
    }
}

impl<S: Scalar> AddAssign for Vec4<S> {
    #[inline] fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x; self.y += rhs.y; self.z += rhs.z; self.w += rhs.w;
    }
}

impl<S: Scalar> SubAssign for Vec4<S> {
    #[inline] fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x; self.y -= rhs.y; self.z -= rhs.z; self.w -= rhs.w;
    }
}

impl<S: Scalar> MulAssign<S> for Vec4<S> {
    #[inline] fn mul_assign(&mut self, rhs: S) {
        self.x *= rhs; self.y *= rhs; self.z *= rhs; self.w *= rhs;
    }
}

impl<S: Scalar> core::fmt::Display for Vec4<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_product() {
        let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let b = Vec4::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(a.dot(b), 70.0); // 5+12+21+32
    }

    #[test]
    fn normalize() {
        let v = Vec4::new(1.0, 2.0, 2.0, 0.0);
        let n = v.normalize().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-10);
        assert_eq!(Vec4::<f64>::zero().normalize(), Err(Error::DegenerateVector));
    }

    #[test]
    fn normalize_extreme_magnitudes() {
        let n = Vec4::new(0.0, 0.0, 0.0, 1e300_f64).normalize().unwrap();
        assert_eq!(n, Vec4::new(0.0, 0.0, 0.0, 1.0));
        let n = Vec4::new(1e-25_f32, 1e-25, 1e-25, 1e-25).normalize().unwrap();
        assert!((n.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn truncate_and_extend() {
        let v4 = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let v3 = v4.truncate();
        assert_eq!(v3, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v3.extend(4.0), v4);
    }

    #[test]
    fn perspective_divide() {
        let v = Vec4::new(2.0, 4.0, 6.0, 2.0);
        assert_eq!(v.project(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn add_assign() {
        let mut a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        a += Vec4::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(a, Vec4::new(11.0, 22.0, 33.0, 44.0));
    }
}
