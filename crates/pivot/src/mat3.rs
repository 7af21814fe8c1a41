use crate::{Error, Quat, Result, Scalar, Vec3};
use core::ops::{Add, Index, Mul, Neg, Sub};

/// Element order of a flat matrix array coming from (or going to) an
/// external source.
///
/// pivot always stores matrices column-major; this only describes foreign
/// data so that conversions can compensate for it in one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// Consecutive elements walk down a column (glTF, OpenGL, pivot itself).
    ColumnMajor,
    /// Consecutive elements walk along a row (Direct3D/HLSL-style tooling).
    RowMajor,
}

/// 3x3 matrix, column-major storage.
///
/// Used for rotations, the linear part of affine transforms, and tangent
/// frames. Stored as three column vectors for natural column access.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mat3<S> {
    /// Column 0
    pub c0: Vec3<S>,
    /// Column 1
    pub c1: Vec3<S>,
    /// Column 2
    pub c2: Vec3<S>,
}

impl<S: Scalar> Mat3<S> {
    /// Construct from individual elements (row-major argument order for readability).
    /// ```text
    /// | m00 m01 m02 |
    /// | m10 m11 m12 |
    /// | m20 m21 m22 |
    /// ```
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub fn new(m00: S, m01: S, m02: S, m10: S, m11: S, m12: S, m20: S, m21: S, m22: S) -> Self {
        Self {
            c0: Vec3::new(m00, m10, m20),
            c1: Vec3::new(m01, m11, m21),
            c2: Vec3::new(m02, m12, m22),
        }
    }

    /// Construct from column vectors
    #[inline]
    pub fn from_cols(c0: Vec3<S>, c1: Vec3<S>, c2: Vec3<S>) -> Self {
        Self { c0, c1, c2 }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::from_cols(Vec3::zero(), Vec3::zero(), Vec3::zero())
    }

    #[inline]
    pub fn identity() -> Self {
        Self::diagonal(Vec3::one())
    }

    #[inline]
    pub fn diagonal(d: Vec3<S>) -> Self {
        Self::new(
            d.x, S::ZERO, S::ZERO,
            S::ZERO, d.y, S::ZERO,
            S::ZERO, S::ZERO, d.z,
        )
    }

    /// Build from a flat array in the given element order.
    pub fn from_array(m: [S; 9], layout: Layout) -> Self {
        let cols = Self::from_cols(
            Vec3::new(m[0], m[1], m[2]),
            Vec3::new(m[3], m[4], m[5]),
            Vec3::new(m[6], m[7], m[8]),
        );
        match layout {
            Layout::ColumnMajor => cols,
            // Reading row-major data as columns yields the transpose.
            Layout::RowMajor => cols.transpose(),
        }
    }

    /// Flatten into the given element order.
    pub fn to_array(&self, layout: Layout) -> [S; 9] {
        let m = match layout {
            Layout::ColumnMajor => *self,
            Layout::RowMajor => self.transpose(),
        };
        [
            m.c0.x, m.c0.y, m.c0.z,
            m.c1.x, m.c1.y, m.c1.z,
            m.c2.x, m.c2.y, m.c2.z,
        ]
    }

    /// Element access (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> S {
        self[(row, col)]
    }

    /// Column access
    #[inline]
    pub fn col(&self, i: usize) -> Vec3<S> {
        match i {
            0 => self.c0,
            1 => self.c1,
            _ => self.c2,
        }
    }

    /// Row access
    #[inline]
    pub fn row(&self, i: usize) -> Vec3<S> {
        Vec3::new(self.get(i, 0), self.get(i, 1), self.get(i, 2))
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.row(0), self.row(1), self.row(2))
    }

    #[inline]
    pub fn determinant(&self) -> S {
        self.c0.dot(self.c1.cross(self.c2))
    }

    #[inline]
    pub fn trace(&self) -> S {
        self.c0.x + self.c1.y + self.c2.z
    }

    /// Cofactor matrix, `det · (M⁻¹)ᵀ`. Defined for singular matrices too.
    #[inline]
    pub fn cofactor(&self) -> Self {
        Self::from_cols(
            self.c1.cross(self.c2),
            self.c2.cross(self.c0),
            self.c0.cross(self.c1),
        )
    }

    /// General inverse via the adjugate.
    ///
    /// Fails with [`Error::SingularMatrix`] when the determinant is tiny
    /// relative to the product of the column lengths (its Hadamard bound),
    /// so uniformly scaled matrices invert at any scale.
    pub fn try_inverse(&self) -> Result<Self> {
        let det = self.determinant();
        let bound = self.c0.length() * self.c1.length() * self.c2.length();
        if !(det.abs() > S::EPSILON * bound) || !det.is_finite() {
            return Err(Error::SingularMatrix);
        }
        Ok(self.cofactor().transpose() * det.recip())
    }

    /// Matrix-vector product
    #[inline]
    pub fn mul_vec(&self, v: Vec3<S>) -> Vec3<S> {
        self.c0 * v.x + self.c1 * v.y + self.c2 * v.z
    }

    /// Matrix-matrix product
    #[inline]
    pub fn mul_mat(&self, rhs: &Mat3<S>) -> Mat3<S> {
        Mat3::from_cols(
            self.mul_vec(rhs.c0),
            self.mul_vec(rhs.c1),
            self.mul_vec(rhs.c2),
        )
    }

    /// Whether the columns are orthonormal and the determinant is +1
    /// (a proper rotation, no reflection).
    pub fn is_rotation(&self, eps: S) -> bool {
        let near = |a: S, b: S| (a - b).abs() <= eps;
        near(self.c0.length_sq(), S::ONE)
            && near(self.c1.length_sq(), S::ONE)
            && near(self.c2.length_sq(), S::ONE)
            && near(self.c0.dot(self.c1), S::ZERO)
            && near(self.c1.dot(self.c2), S::ZERO)
            && near(self.c2.dot(self.c0), S::ZERO)
            && near(self.determinant(), S::ONE)
    }

    /// Rotation matrix about X axis
    pub fn rotation_x(angle: S) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(S::ONE, S::ZERO, S::ZERO, S::ZERO, c, -s, S::ZERO, s, c)
    }

    /// Rotation matrix about Y axis
    pub fn rotation_y(angle: S) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c, S::ZERO, s, S::ZERO, S::ONE, S::ZERO, -s, S::ZERO, c)
    }

    /// Rotation matrix about Z axis
    pub fn rotation_z(angle: S) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c, -s, S::ZERO, s, c, S::ZERO, S::ZERO, S::ZERO, S::ONE)
    }

    /// Rotation about a unit axis (Rodrigues' formula). The axis is not normalized.
    pub fn rotation_axis(axis: Vec3<S>, angle: S) -> Self {
        let (s, c) = angle.sin_cos();
        let t = S::ONE - c;
        let Vec3 { x, y, z } = axis;
        Self::new(
            t * x * x + c,     t * x * y - s * z, t * x * z + s * y,
            t * x * y + s * z, t * y * y + c,     t * y * z - s * x,
            t * x * z - s * y, t * y * z + s * x, t * z * z + c,
        )
    }

    /// Rotation matrix of a unit quaternion. See [`Quat::to_mat3`].
    #[inline]
    pub fn from_quat(q: &Quat<S>) -> Self {
        q.to_mat3()
    }

    /// Right-handed orthonormal basis whose first column is the unit vector `x`.
    pub fn basis_from_x(x: Vec3<S>) -> Self {
        let y = x.any_orthogonal();
        Self::from_cols(x, y, x.cross(y))
    }

    /// Right-handed orthonormal basis whose second column is the unit vector `y`.
    pub fn basis_from_y(y: Vec3<S>) -> Self {
        let z = y.any_orthogonal();
        Self::from_cols(y.cross(z), y, z)
    }

    /// Right-handed orthonormal basis whose third column is the unit vector `z`.
    ///
    /// The orientation of the other two columns around `z` is unspecified,
    /// as for the other `basis_from_*` constructors.
    pub fn basis_from_z(z: Vec3<S>) -> Self {
        let x = z.any_orthogonal();
        let y = z.cross(x);
        Self::from_cols(x, y, z)
    }
}

impl<S: Scalar> Index<(usize, usize)> for Mat3<S> {
    type Output = S;
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &S {
        let c = match col {
            0 => &self.c0,
            1 => &self.c1,
            _ => &self.c2,
        };
        match row {
            0 => &c.x,
            1 => &c.y,
            _ => &c.z,
        }
    }
}

impl<S: Scalar> Default for Mat3<S> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<S: Scalar> Add for Mat3<S> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_cols(self.c0 + rhs.c0, self.c1 + rhs.c1, self.c2 + rhs.c2)
    }
}

impl<S: Scalar> Sub for Mat3<S> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_cols(self.c0 - rhs.c0, self.c1 - rhs.c1, self.c2 - rhs.c2)
    }
}

impl<S: Scalar> Neg for Mat3<S> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::from_cols(-self.c0, -self.c1, -self.c2)
    }
}

impl<S: Scalar> Mul<S> for Mat3<S> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: S) -> Self {
        Self::from_cols(self.c0 * rhs, self.c1 * rhs, self.c2 * rhs)
    }
}

// Mat3 * Vec3
impl<S: Scalar> Mul<Vec3<S>> for Mat3<S> {
    type Output = Vec3<S>;
    #[inline]
    fn mul(self, rhs: Vec3<S>) -> Vec3<S> {
        self.mul_vec(rhs)
    }
}

// Mat3 * Mat3
impl<S: Scalar> Mul for Mat3<S> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat_near(a: &Mat3<f64>, b: &Mat3<f64>) {
        for r in 0..3 {
            for c in 0..3 {
                assert!((a.get(r, c) - b.get(r, c)).abs() < 1e-10,
                    "mismatch at ({}, {}): {} vs {}", r, c, a.get(r, c), b.get(r, c));
            }
        }
    }

    #[test]
    fn identity() {
        let m = Mat3::<f64>::identity();
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(m * v, v);
    }

    #[test]
    fn new_is_row_major_storage_is_column_major() {
        let m = Mat3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        assert_eq!(m.c0, Vec3::new(1.0, 4.0, 7.0));
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.to_array(Layout::ColumnMajor), [1.0, 4.0, 7.0, 2.0, 5.0, 8.0, 3.0, 6.0, 9.0]);
        assert_eq!(m.to_array(Layout::RowMajor), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn array_layouts_agree() {
        let m = Mat3::rotation_axis(Vec3::new(0.0, 0.6, 0.8), 0.9);
        let from_cols = Mat3::from_array(m.to_array(Layout::ColumnMajor), Layout::ColumnMajor);
        let from_rows = Mat3::from_array(m.to_array(Layout::RowMajor), Layout::RowMajor);
        assert_eq!(from_cols, m);
        assert_mat_near(&from_rows, &m);
    }

    #[test]
    fn transpose() {
        let m = Mat3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        let mt = m.transpose();
        assert_eq!(mt.get(0, 1), 4.0);
        assert_eq!(mt.get(1, 0), 2.0);
        assert_eq!(mt.transpose(), m);
    }

    #[test]
    fn inverse() {
        let m = Mat3::new(1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0);
        let mi = m.try_inverse().unwrap();
        assert_mat_near(&(m * mi), &Mat3::identity());
        assert_mat_near(&(mi * m), &Mat3::identity());
    }

    #[test]
    fn singular_inverse_is_rejected() {
        let m = Mat3::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 0.0, 1.0);
        assert_eq!(m.try_inverse(), Err(Error::SingularMatrix));
    }

    #[test]
    fn rotation_z_quarter_turn() {
        let r = Mat3::rotation_z(core::f64::consts::FRAC_PI_2);
        let rotated = r * Vec3::new(1.0, 0.0, 0.0);
        assert!(rotated.x.abs() < 1e-10);
        assert!((rotated.y - 1.0).abs() < 1e-10);
    }

    #[test]
    fn rodrigues_matches_principal_axes() {
        let a = 0.7;
        assert_mat_near(&Mat3::rotation_axis(Vec3::x(), a), &Mat3::rotation_x(a));
        assert_mat_near(&Mat3::rotation_axis(Vec3::y(), a), &Mat3::rotation_y(a));
        assert_mat_near(&Mat3::rotation_axis(Vec3::z(), a), &Mat3::rotation_z(a));
    }

    #[test]
    fn determinant_and_rotation_check() {
        let id = Mat3::<f64>::identity();
        assert!((id.determinant() - 1.0).abs() < 1e-10);
        assert!(Mat3::rotation_y(2.0).is_rotation(1e-10));
        // A reflection is orthonormal but not a proper rotation.
        assert!(!Mat3::diagonal(Vec3::new(1.0, 1.0, -1.0)).is_rotation(1e-10));
        assert!(!Mat3::diagonal(Vec3::new(2.0, 1.0, 1.0)).is_rotation(1e-10));
    }

    #[test]
    fn basis_from_z_is_proper_rotation() {
        let z = Vec3::new(1.0, 2.0, -2.0).normalize().unwrap();
        let b = Mat3::basis_from_z(z);
        assert_eq!(b.c2, z);
        assert!(b.is_rotation(1e-12));
    }

    #[test]
    fn basis_from_x_and_y_are_proper_rotations() {
        let v = Vec3::new(1.0, 2.0, -2.0).normalize().unwrap();
        let bx = Mat3::basis_from_x(v);
        assert_eq!(bx.c0, v);
        assert!(bx.is_rotation(1e-12));
        let by = Mat3::basis_from_y(v);
        assert_eq!(by.c1, v);
        assert!(by.is_rotation(1e-12));
        let up = Mat3::basis_from_y(Vec3::<f64>::y());
        assert!(up.is_rotation(1e-12));
    }

    #[test]
    fn small_uniform_scale_inverts() {
        // Millimetre-unit asset: det = 1e-9, well below f32 epsilon.
        let m = Mat3::<f32>::diagonal(Vec3::splat(0.001));
        let mi = m.try_inverse().unwrap();
        assert!((mi.get(0, 0) - 1000.0).abs() < 1e-2);
        assert!((mi.get(2, 2) - 1000.0).abs() < 1e-2);
        assert!(mi.get(0, 1).abs() < 1e-6);
    }

    #[test]
    fn nearly_dependent_columns_are_singular() {
        let m = Mat3::<f64>::from_cols(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1e-17, 0.0),
            Vec3::z(),
        );
        assert_eq!(m.try_inverse(), Err(Error::SingularMatrix));
    }
}
