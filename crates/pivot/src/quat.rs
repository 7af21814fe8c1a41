use crate::{Error, Layout, Mat3, Result, Scalar, Vec3};
use core::ops::{Mul, Neg};

/// Quaternion `xi + yj + zk + w`.
///
/// Stored as vector part `(x, y, z)` followed by scalar part `w`, the same
/// order glTF and GPU buffers use. Represents a rotation when unit length.
/// `q` and `-q` are the same rotation; nothing here treats them as different
/// rotations, and nothing silently renormalizes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quat<S> {
    pub x: S,
    pub y: S,
    pub z: S,
    pub w: S,
}

impl<S: Scalar> Quat<S> {
    #[inline]
    pub fn new(x: S, y: S, z: S, w: S) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new(S::ZERO, S::ZERO, S::ZERO, S::ONE)
    }

    #[inline]
    pub fn from_parts(v: Vec3<S>, w: S) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Rotation of `angle` radians about `axis` (counter-clockwise looking
    /// down the axis toward the origin).
    ///
    /// `axis` must already be unit length. It is not normalized here: a
    /// non-unit axis produces a non-unit quaternion, which rotates incorrectly.
    pub fn from_axis_angle(axis: Vec3<S>, angle: S) -> Self {
        let (s, c) = (angle * S::HALF).sin_cos();
        Self::from_parts(axis * s, c)
    }

    /// Vector part `(x, y, z)`.
    #[inline]
    pub fn vector(&self) -> Vec3<S> {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> S {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn length_sq(&self) -> S { self.dot(self) }

    #[inline]
    pub fn length(&self) -> S { self.length_sq().sqrt() }

    /// Unit quaternion in the same direction.
    ///
    /// Fails with [`Error::DegenerateRotation`] on zero or non-finite norm.
    /// Components are divided by the largest one before squaring, so a
    /// finite quaternion far from unit length still normalizes.
    pub fn normalize(&self) -> Result<Self> {
        let (q, _) = self.rescaled()?;
        let n = q.length();
        if n.is_finite() {
            Ok(q * n.recip())
        } else {
            Err(Error::DegenerateRotation)
        }
    }

    // `self / m` with `m` the largest absolute component, plus `m`.
    fn rescaled(&self) -> Result<(Self, S)> {
        let m = self.x.abs().max(self.y.abs()).max(self.z.abs()).max(self.w.abs());
        if !(m > S::ZERO && m.is_finite()) {
            return Err(Error::DegenerateRotation);
        }
        Ok((Self::new(self.x / m, self.y / m, self.z / m, self.w / m), m))
    }

    /// Conjugate (inverse for unit quaternions)
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Multiplicative inverse `q* / |q|²`; equals the conjugate for unit `q`.
    pub fn inverse(&self) -> Result<Self> {
        let (u, m) = self.rescaled()?;
        let n2 = u.length_sq();
        if !n2.is_finite() {
            return Err(Error::DegenerateRotation);
        }
        let c = u.conjugate() * n2.recip();
        Ok(Self::new(c.x / m, c.y / m, c.z / m, c.w / m))
    }

    /// Representative with `w >= 0`; the same rotation.
    #[inline]
    pub fn canonical(&self) -> Self {
        if self.w < S::ZERO { -*self } else { *self }
    }

    /// Rotate a vector by this (unit) quaternion.
    ///
    /// Evaluates `q v q*` without forming quaternion products:
    /// `t = 2 (u × v)`, `v' = v + w t + u × t`.
    #[inline]
    pub fn rotate(&self, v: Vec3<S>) -> Vec3<S> {
        let u = self.vector();
        let t = u.cross(v) * S::TWO;
        v + t * self.w + u.cross(t)
    }

    /// Rotate via the full sandwich product `q (v, 0) q*`.
    ///
    /// Slower reference form of [`rotate`](Self::rotate).
    pub fn rotate_sandwich(&self, v: Vec3<S>) -> Vec3<S> {
        (*self * Self::from_parts(v, S::ZERO) * self.conjugate()).vector()
    }

    /// Convert to a column-major 3x3 rotation matrix.
    pub fn to_mat3(&self) -> Mat3<S> {
        let two = S::TWO;
        let Self { x, y, z, w } = *self;

        Mat3::new(
            S::ONE - two * (y * y + z * z), two * (x * y - w * z),          two * (x * z + w * y),
            two * (x * y + w * z),          S::ONE - two * (x * x + z * z), two * (y * z - w * x),
            two * (x * z - w * y),          two * (y * z + w * x),          S::ONE - two * (x * x + y * y),
        )
    }

    /// Convert from a rotation matrix (Shepperd's method for numerical stability).
    ///
    /// `m` must be a proper rotation (orthonormal, determinant +1); this is
    /// not checked. Any other matrix yields a meaningless quaternion. The
    /// result is canonical (`w >= 0`).
    pub fn from_mat3(m: &Mat3<S>) -> Self {
        let trace = m.trace();
        let quarter = S::HALF * S::HALF;

        let q = if trace > S::ZERO {
            let s = (trace + S::ONE).sqrt() * S::TWO;
            let inv_s = s.recip();
            Quat::new(
                (m.get(2, 1) - m.get(1, 2)) * inv_s,
                (m.get(0, 2) - m.get(2, 0)) * inv_s,
                (m.get(1, 0) - m.get(0, 1)) * inv_s,
                s * quarter,
            )
        } else if m.get(0, 0) > m.get(1, 1) && m.get(0, 0) > m.get(2, 2) {
            let s = (S::ONE + m.get(0, 0) - m.get(1, 1) - m.get(2, 2)).sqrt() * S::TWO;
            let inv_s = s.recip();
            Quat::new(
                s * quarter,
                (m.get(0, 1) + m.get(1, 0)) * inv_s,
                (m.get(0, 2) + m.get(2, 0)) * inv_s,
                (m.get(2, 1) - m.get(1, 2)) * inv_s,
            )
        } else if m.get(1, 1) > m.get(2, 2) {
            let s = (S::ONE + m.get(1, 1) - m.get(0, 0) - m.get(2, 2)).sqrt() * S::TWO;
            let inv_s = s.recip();
            Quat::new(
                (m.get(0, 1) + m.get(1, 0)) * inv_s,
                s * quarter,
                (m.get(1, 2) + m.get(2, 1)) * inv_s,
                (m.get(0, 2) - m.get(2, 0)) * inv_s,
            )
        } else {
            let s = (S::ONE + m.get(2, 2) - m.get(0, 0) - m.get(1, 1)).sqrt() * S::TWO;
            let inv_s = s.recip();
            Quat::new(
                (m.get(0, 2) + m.get(2, 0)) * inv_s,
                (m.get(1, 2) + m.get(2, 1)) * inv_s,
                s * quarter,
                (m.get(1, 0) - m.get(0, 1)) * inv_s,
            )
        };
        q.canonical()
    }

    /// Convert from a flat 3x3 rotation in the given element order.
    ///
    /// A row-major array is the transpose of the column-major one; reading
    /// it as columns would invert the rotation. Both layouts of the same
    /// rotation produce the same quaternion.
    pub fn from_mat3_array(m: [S; 9], layout: Layout) -> Self {
        Self::from_mat3(&Mat3::from_array(m, layout))
    }

    /// Flatten the rotation matrix in the given element order.
    pub fn to_mat3_array(&self, layout: Layout) -> [S; 9] {
        self.to_mat3().to_array(layout)
    }

    /// Axis and angle in `[0, 2π]`. The identity yields (+X, 0).
    pub fn to_axis_angle(&self) -> (Vec3<S>, S) {
        let v = self.vector();
        let sin_half = v.length();
        if sin_half <= S::EPSILON {
            return (Vec3::x(), S::ZERO);
        }
        (v / sin_half, S::TWO * sin_half.atan2(self.w))
    }

    /// Whether both quaternions describe the same rotation, accounting for
    /// the double cover (`q` and `-q` match).
    pub fn same_rotation(&self, other: &Self, eps: S) -> bool {
        self.dot(other).abs() >= S::ONE - eps
    }

    /// Smallest angle (radians, in `[0, π]`) rotating one orientation onto
    /// the other. Sign-agnostic under the double cover.
    pub fn angle_between(&self, other: &Self) -> S {
        let d = self.dot(other).abs().min(S::ONE);
        S::TWO * d.acos()
    }

    /// Normalized linear interpolation along the shortest path.
    pub fn nlerp(&self, other: &Self, t: S) -> Result<Self> {
        let other = if self.dot(other) < S::ZERO { -*other } else { *other };
        (*self * (S::ONE - t) + other * t).normalize()
    }

    /// Spherical linear interpolation along the shortest path.
    pub fn slerp(&self, other: &Self, t: S) -> Self {
        let mut dot = self.dot(other);
        let mut other = *other;

        // Ensure shortest path
        if dot < S::ZERO {
            other = -other;
            dot = -dot;
        }

        // Nearly parallel: the sine weights lose precision, lerp is exact enough.
        if dot > S::ONE - S::from_f64(1e-6) {
            let q = *self * (S::ONE - t) + other * t;
            return q * q.length().recip();
        }

        let theta = dot.acos();
        let sin_theta = theta.sin();
        let a = ((S::ONE - t) * theta).sin() / sin_theta;
        let b = (t * theta).sin() / sin_theta;
        *self * a + other * b
    }

    /// Shortest rotation taking unit vector `from` onto unit vector `to`.
    ///
    /// Opposite vectors rotate by π about an arbitrary perpendicular axis.
    pub fn from_rotation_arc(from: Vec3<S>, to: Vec3<S>) -> Self {
        let d = from.dot(to);
        if d < S::from_f64(1e-6) - S::ONE {
            return Self::from_parts(from.any_orthogonal(), S::ZERO);
        }
        // Half-way quaternion: (from × to, 1 + from·to), normalized.
        let q = Self::from_parts(from.cross(to), S::ONE + d);
        q * q.length().recip()
    }

    /// Orientation whose local -Z looks along `forward` with local +Y as
    /// close to `up` as possible (Y-up, right-handed camera convention).
    ///
    /// Fails with [`Error::DegenerateVector`] when `forward` is zero or
    /// parallel to `up`.
    pub fn look_rotation(forward: Vec3<S>, up: Vec3<S>) -> Result<Self> {
        let back = (-forward).normalize()?;
        let right = up.cross(back).normalize()?;
        let up = back.cross(right);
        Ok(Self::from_mat3(&Mat3::from_cols(right, up, back)))
    }
}

impl<S: Scalar> Default for Quat<S> {
    fn default() -> Self { Self::identity() }
}

/// Hamilton product.
///
/// `q2 * q1` is the rotation that applies `q1` first, then `q2`, matching
/// matrix composition order.
impl<S: Scalar> Mul for Quat<S> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self.vector(), rhs.vector());
        Self::from_parts(
            b * self.w + a * rhs.w + a.cross(b),
            self.w * rhs.w - a.dot(b),
        )
    }
}

// Quat * Vec3 rotates.
impl<S: Scalar> Mul<Vec3<S>> for Quat<S> {
    type Output = Vec3<S>;
    #[inline]
    fn mul(self, rhs: Vec3<S>) -> Vec3<S> {
        self.rotate(rhs)
    }
}

impl<S: Scalar> Mul<S> for Quat<S> {
    type Output = Self;
    #[inline]
    fn mul(self, s: S) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl<S: Scalar> core::ops::Add for Quat<S> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl<S: Scalar> Neg for Quat<S> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}
