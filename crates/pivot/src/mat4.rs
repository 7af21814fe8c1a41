use crate::{Error, Layout, Mat3, Quat, Result, Scalar, Vec3, Vec4};
use core::ops::{Add, Mul, Neg, Sub};

/// 4x4 matrix, column-major storage.
///
/// Homogeneous transforms act on column vectors from the left: `v' = M v`.
/// To apply `A` then `B`, multiply once by `B * A`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mat4<S> {
    pub c0: Vec4<S>,
    pub c1: Vec4<S>,
    pub c2: Vec4<S>,
    pub c3: Vec4<S>,
}

impl<S: Scalar> Mat4<S> {
    /// Construct from elements in row-major argument order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        m00: S, m01: S, m02: S, m03: S,
        m10: S, m11: S, m12: S, m13: S,
        m20: S, m21: S, m22: S, m23: S,
        m30: S, m31: S, m32: S, m33: S,
    ) -> Self {
        Self {
            c0: Vec4::new(m00, m10, m20, m30),
            c1: Vec4::new(m01, m11, m21, m31),
            c2: Vec4::new(m02, m12, m22, m32),
            c3: Vec4::new(m03, m13, m23, m33),
        }
    }

    #[inline]
    pub fn from_cols(c0: Vec4<S>, c1: Vec4<S>, c2: Vec4<S>, c3: Vec4<S>) -> Self {
        Self { c0, c1, c2, c3 }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::from_cols(Vec4::zero(), Vec4::zero(), Vec4::zero(), Vec4::zero())
    }

    #[inline]
    pub fn identity() -> Self {
        Self::from_linear_translation(Mat3::identity(), Vec3::zero())
    }

    /// Build from a flat array in the given element order.
    pub fn from_array(m: [S; 16], layout: Layout) -> Self {
        let col = |i: usize| Vec4::new(m[i * 4], m[i * 4 + 1], m[i * 4 + 2], m[i * 4 + 3]);
        let cols = Self::from_cols(col(0), col(1), col(2), col(3));
        match layout {
            Layout::ColumnMajor => cols,
            Layout::RowMajor => cols.transpose(),
        }
    }

    /// Flatten into the given element order (column-major is what GPU
    /// uniform buffers and glTF expect).
    pub fn to_array(&self, layout: Layout) -> [S; 16] {
        let m = match layout {
            Layout::ColumnMajor => *self,
            Layout::RowMajor => self.transpose(),
        };
        let mut out = [S::ZERO; 16];
        for (i, c) in [m.c0, m.c1, m.c2, m.c3].iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&c.to_array());
        }
        out
    }

    /// Affine matrix from a linear 3x3 block and a translation column.
    pub fn from_linear_translation(linear: Mat3<S>, trans: Vec3<S>) -> Self {
        Self::from_cols(
            linear.c0.extend(S::ZERO),
            linear.c1.extend(S::ZERO),
            linear.c2.extend(S::ZERO),
            trans.extend(S::ONE),
        )
    }

    /// Translation matrix
    #[inline]
    pub fn translation(t: Vec3<S>) -> Self {
        Self::from_linear_translation(Mat3::identity(), t)
    }

    /// Non-uniform scale matrix
    #[inline]
    pub fn scale(s: Vec3<S>) -> Self {
        Self::from_linear_translation(Mat3::diagonal(s), Vec3::zero())
    }

    /// Rotation matrix of a unit quaternion.
    #[inline]
    pub fn from_quat(q: &Quat<S>) -> Self {
        Self::from_linear_translation(q.to_mat3(), Vec3::zero())
    }

    /// `T · R · S`: scale in object space, then rotate, then translate.
    pub fn from_trs(translation: Vec3<S>, rotation: &Quat<S>, scale: Vec3<S>) -> Self {
        let r = rotation.to_mat3();
        let linear = Mat3::from_cols(r.c0 * scale.x, r.c1 * scale.y, r.c2 * scale.z);
        Self::from_linear_translation(linear, translation)
    }

    /// Element access (row, col)
    pub fn get(&self, row: usize, col: usize) -> S {
        let c = self.col(col);
        match row { 0 => c.x, 1 => c.y, 2 => c.z, _ => c.w }
    }

    #[inline]
    pub fn col(&self, i: usize) -> Vec4<S> {
        match i { 0 => self.c0, 1 => self.c1, 2 => self.c2, _ => self.c3 }
    }

    #[inline]
    pub fn row(&self, i: usize) -> Vec4<S> {
        Vec4::new(self.get(i, 0), self.get(i, 1), self.get(i, 2), self.get(i, 3))
    }

    /// Replace one row; used by the clip-space remaps.
    pub(crate) fn with_row(&self, i: usize, r: Vec4<S>) -> Self {
        let mut cols = [self.c0, self.c1, self.c2, self.c3];
        let vals = r.to_array();
        for (c, v) in cols.iter_mut().zip(vals) {
            match i { 0 => c.x = v, 1 => c.y = v, 2 => c.z = v, _ => c.w = v }
        }
        Self::from_cols(cols[0], cols[1], cols[2], cols[3])
    }

    /// Upper-left 3x3 block (the linear part of an affine transform).
    #[inline]
    pub fn upper_left_3x3(&self) -> Mat3<S> {
        Mat3::from_cols(self.c0.truncate(), self.c1.truncate(), self.c2.truncate())
    }

    /// Translation column
    #[inline]
    pub fn translation_vec(&self) -> Vec3<S> {
        self.c3.truncate()
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.row(0), self.row(1), self.row(2), self.row(3))
    }

    pub fn determinant(&self) -> S {
        let (s, c) = self.minors();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    // 2x2 minors of the top two rows (s) and the bottom two rows (c).
    fn minors(&self) -> ([S; 6], [S; 6]) {
        let m = |r, c| self.get(r, c);
        let s = [
            m(0, 0) * m(1, 1) - m(1, 0) * m(0, 1),
            m(0, 0) * m(1, 2) - m(1, 0) * m(0, 2),
            m(0, 0) * m(1, 3) - m(1, 0) * m(0, 3),
            m(0, 1) * m(1, 2) - m(1, 1) * m(0, 2),
            m(0, 1) * m(1, 3) - m(1, 1) * m(0, 3),
            m(0, 2) * m(1, 3) - m(1, 2) * m(0, 3),
        ];
        let c = [
            m(2, 0) * m(3, 1) - m(3, 0) * m(2, 1),
            m(2, 0) * m(3, 2) - m(3, 0) * m(2, 2),
            m(2, 0) * m(3, 3) - m(3, 0) * m(2, 3),
            m(2, 1) * m(3, 2) - m(3, 1) * m(2, 2),
            m(2, 1) * m(3, 3) - m(3, 1) * m(2, 3),
            m(2, 2) * m(3, 3) - m(3, 2) * m(2, 3),
        ];
        (s, c)
    }

    /// General 4x4 inverse via cofactor expansion.
    ///
    /// Singular means the determinant is below `EPSILON` times the product
    /// of the column lengths, which keeps the test independent of scale.
    /// Prefer [`try_inverse_affine`](Self::try_inverse_affine) or
    /// [`Trs::inverse_mat4`](crate::Trs::inverse_mat4) for scene transforms.
    pub fn try_inverse(&self) -> Result<Self> {
        let m = |r, c| self.get(r, c);
        let (s, c) = self.minors();

        let det = self.determinant();
        let bound = self.c0.length() * self.c1.length() * self.c2.length() * self.c3.length();
        if !(det.abs() > S::EPSILON * bound) || !det.is_finite() {
            return Err(Error::SingularMatrix);
        }

        let inv_det = det.recip();
        Ok(Self::new(
            ( m(1,1) * c[5] - m(1,2) * c[4] + m(1,3) * c[3]) * inv_det,
            (-m(0,1) * c[5] + m(0,2) * c[4] - m(0,3) * c[3]) * inv_det,
            ( m(3,1) * s[5] - m(3,2) * s[4] + m(3,3) * s[3]) * inv_det,
            (-m(2,1) * s[5] + m(2,2) * s[4] - m(2,3) * s[3]) * inv_det,
            (-m(1,0) * c[5] + m(1,2) * c[2] - m(1,3) * c[1]) * inv_det,
            ( m(0,0) * c[5] - m(0,2) * c[2] + m(0,3) * c[1]) * inv_det,
            (-m(3,0) * s[5] + m(3,2) * s[2] - m(3,3) * s[1]) * inv_det,
            ( m(2,0) * s[5] - m(2,2) * s[2] + m(2,3) * s[1]) * inv_det,
            ( m(1,0) * c[4] - m(1,1) * c[2] + m(1,3) * c[0]) * inv_det,
            (-m(0,0) * c[4] + m(0,1) * c[2] - m(0,3) * c[0]) * inv_det,
            ( m(3,0) * s[4] - m(3,1) * s[2] + m(3,3) * s[0]) * inv_det,
            (-m(2,0) * s[4] + m(2,1) * s[2] - m(2,3) * s[0]) * inv_det,
            (-m(1,0) * c[3] + m(1,1) * c[1] - m(1,2) * c[0]) * inv_det,
            ( m(0,0) * c[3] - m(0,1) * c[1] + m(0,2) * c[0]) * inv_det,
            (-m(3,0) * s[3] + m(3,1) * s[1] - m(3,2) * s[0]) * inv_det,
            ( m(2,0) * s[3] - m(2,1) * s[1] + m(2,2) * s[0]) * inv_det,
        ))
    }

    /// Exact inverse of an affine `T · R · S` matrix (no shear).
    ///
    /// With `A = R S`, row `i` of `A⁻¹ = S⁻¹ Rᵀ` is column `i` of `A`
    /// divided by its squared length, and the translation is `-A⁻¹ t`.
    /// Fails with [`Error::SingularMatrix`] when a column (scale axis) is zero.
    /// Matrices with shear or a projective row violate the precondition and
    /// produce a wrong result.
    pub fn try_inverse_affine(&self) -> Result<Self> {
        let a = self.upper_left_3x3();
        let row = |c: Vec3<S>| {
            let n2 = c.length_sq();
            if n2 > S::ZERO && n2.is_finite() {
                Ok(c / n2)
            } else {
                Err(Error::SingularMatrix)
            }
        };
        let inv = Mat3::from_cols(row(a.c0)?, row(a.c1)?, row(a.c2)?).transpose();
        Ok(Self::from_linear_translation(inv, -inv.mul_vec(self.translation_vec())))
    }

    /// Matrix-Vec4 product
    #[inline]
    pub fn mul_vec4(&self, v: Vec4<S>) -> Vec4<S> {
        self.c0 * v.x + self.c1 * v.y + self.c2 * v.z + self.c3 * v.w
    }

    /// Transform a point (w=1, includes translation)
    #[inline]
    pub fn transform_point(&self, p: Vec3<S>) -> Vec3<S> {
        self.mul_vec4(p.extend(S::ONE)).truncate()
    }

    /// Transform a direction (w=0, ignores translation)
    #[inline]
    pub fn transform_vector(&self, v: Vec3<S>) -> Vec3<S> {
        self.mul_vec4(v.extend(S::ZERO)).truncate()
    }

    /// Transform a surface normal with the inverse transpose of the linear
    /// block. The result is not renormalized.
    ///
    /// Computed as `cofactor · n / det`, so only an exactly zero (or
    /// non-finite) determinant fails with [`Error::SingularMatrix`].
    pub fn transform_normal(&self, n: Vec3<S>) -> Result<Vec3<S>> {
        let a = self.upper_left_3x3();
        let det = a.determinant();
        if det == S::ZERO || !det.is_finite() {
            return Err(Error::SingularMatrix);
        }
        Ok(a.cofactor().mul_vec(n) / det)
    }

    /// Matrix-matrix product
    pub fn mul_mat(&self, rhs: &Mat4<S>) -> Mat4<S> {
        Mat4::from_cols(
            self.mul_vec4(rhs.c0),
            self.mul_vec4(rhs.c1),
            self.mul_vec4(rhs.c2),
            self.mul_vec4(rhs.c3),
        )
    }

    /// Right-handed perspective projection targeting the canonical NDC:
    /// the camera looks down -Z, near maps to depth 0, far to depth 1.
    ///
    /// `fov_y` is the full vertical field of view in radians. Requires
    /// `0 < near < far` and `aspect > 0`.
    pub fn perspective_rh(fov_y: S, aspect: S, near: S, far: S) -> Self {
        let f = (fov_y * S::HALF).tan().recip();
        let range = (near - far).recip();
        Self::new(
            f / aspect, S::ZERO, S::ZERO,     S::ZERO,
            S::ZERO,    f,       S::ZERO,     S::ZERO,
            S::ZERO,    S::ZERO, far * range, near * far * range,
            S::ZERO,    S::ZERO, -S::ONE,     S::ZERO,
        )
    }

    /// Right-handed orthographic projection targeting the canonical NDC
    /// (depth 0 at `near`, 1 at `far`).
    pub fn orthographic_rh(left: S, right: S, bottom: S, top: S, near: S, far: S) -> Self {
        let rw = (right - left).recip();
        let rh = (top - bottom).recip();
        let rd = (near - far).recip();
        Self::new(
            S::TWO * rw, S::ZERO,     S::ZERO, -(right + left) * rw,
            S::ZERO,     S::TWO * rh, S::ZERO, -(top + bottom) * rh,
            S::ZERO,     S::ZERO,     rd,      near * rd,
            S::ZERO,     S::ZERO,     S::ZERO, S::ONE,
        )
    }

    /// Right-handed view matrix: world to camera space, camera at `eye`
    /// looking at `target`, `up` roughly +Y.
    ///
    /// Fails with [`Error::DegenerateVector`] when `eye == target` or the
    /// view direction is parallel to `up`.
    pub fn look_at_rh(eye: Vec3<S>, target: Vec3<S>, up: Vec3<S>) -> Result<Self> {
        let f = (target - eye).normalize()?;
        let s = f.cross(up).normalize()?;
        let u = s.cross(f);
        Ok(Self::new(
            s.x,     s.y,     s.z,     -s.dot(eye),
            u.x,     u.y,     u.z,     -u.dot(eye),
            -f.x,    -f.y,    -f.z,    f.dot(eye),
            S::ZERO, S::ZERO, S::ZERO, S::ONE,
        ))
    }
}

impl<S: Scalar> Default for Mat4<S> {
    fn default() -> Self { Self::identity() }
}

impl<S: Scalar> Add for Mat4<S> {
    type Output = Self;
    #[inline] fn add(self, rhs: Self) -> Self {
        Self::from_cols(self.c0 + rhs.c0, self.c1 + rhs.c1, self.c2 + rhs.c2, self.c3 + rhs.c3)
    }
}

impl<S: Scalar> Sub for Mat4<S> {
    type Output = Self;
    #[inline] fn sub(self, rhs: Self) -> Self {
        Self::from_cols(self.c0 - rhs.c0, self.c1 - rhs.c1, self.c2 - rhs.c2, self.c3 - rhs.c3)
    }
}

impl<S: Scalar> Neg for Mat4<S> {
    type Output = Self;
    #[inline] fn neg(self) -> Self {
        Self::from_cols(-self.c0, -self.c1, -self.c2, -self.c3)
    }
}

impl<S: Scalar> Mul<S> for Mat4<S> {
    type Output = Self;
    #[inline] fn mul(self, rhs: S) -> Self {
        Self::from_cols(self.c0 * rhs, self.c1 * rhs, self.c2 * rhs, self.c3 * rhs)
    }
}

// Mat4 * Vec4
impl<S: Scalar> Mul<Vec4<S>> for Mat4<S> {
    type Output = Vec4<S>;
    #[inline] fn mul(self, rhs: Vec4<S>) -> Vec4<S> { self.mul_vec4(rhs) }
}

// Mat4 * Mat4
impl<S: Scalar> Mul for Mat4<S> {
    type Output = Self;
    #[inline] fn mul(self, rhs: Self) -> Self { self.mul_mat(&rhs) }
}
