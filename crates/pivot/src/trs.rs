use crate::{Error, Mat3, Mat4, Quat, Result, Scalar, Vec3};

/// Translation, rotation and non-uniform scale.
///
/// The matrix form is `T · R · S`: a point is scaled in object space, then
/// rotated, then translated. Composing two `Trs` with non-uniform scale and
/// rotation generally produces shear, which this form cannot hold; compose
/// through [`Mat4`] when that matters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trs<S> {
    pub translation: Vec3<S>,
    /// Unit quaternion
    pub rotation: Quat<S>,
    pub scale: Vec3<S>,
}

impl<S: Scalar> Trs<S> {
    #[inline]
    pub fn new(translation: Vec3<S>, rotation: Quat<S>, scale: Vec3<S>) -> Self {
        Self { translation, rotation, scale }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new(Vec3::zero(), Quat::identity(), Vec3::one())
    }

    #[inline]
    pub fn from_translation(translation: Vec3<S>) -> Self {
        Self { translation, ..Self::identity() }
    }

    #[inline]
    pub fn from_rotation(rotation: Quat<S>) -> Self {
        Self { rotation, ..Self::identity() }
    }

    #[inline]
    pub fn from_scale(scale: Vec3<S>) -> Self {
        Self { scale, ..Self::identity() }
    }

    /// `T · R · S` as a homogeneous matrix.
    #[inline]
    pub fn to_mat4(&self) -> Mat4<S> {
        Mat4::from_trs(self.translation, &self.rotation, self.scale)
    }

    /// Exact inverse `S⁻¹ · R⁻¹ · T⁻¹`, built from the components rather
    /// than by general matrix inversion.
    ///
    /// Fails with [`Error::SingularMatrix`] when any scale component is zero.
    pub fn inverse_mat4(&self) -> Result<Mat4<S>> {
        let s = self.scale;
        if s.x == S::ZERO || s.y == S::ZERO || s.z == S::ZERO || !s.is_finite() {
            return Err(Error::SingularMatrix);
        }
        let inv_scale = Vec3::new(s.x.recip(), s.y.recip(), s.z.recip());
        let linear = Mat3::diagonal(inv_scale) * self.rotation.conjugate().to_mat3();
        Ok(Mat4::from_linear_translation(linear, -(linear * self.translation)))
    }

    /// Apply to a point (scale, rotate, translate).
    #[inline]
    pub fn transform_point(&self, p: Vec3<S>) -> Vec3<S> {
        self.rotation.rotate(p.hadamard(self.scale)) + self.translation
    }

    /// Apply to a direction; translation is ignored.
    #[inline]
    pub fn transform_vector(&self, v: Vec3<S>) -> Vec3<S> {
        self.rotation.rotate(v.hadamard(self.scale))
    }

    /// `self` applied after `child`, approximated in TRS form.
    ///
    /// Exact when `self.scale` is uniform; otherwise the shear the true
    /// product would carry is dropped and the result differs from
    /// `self.to_mat4() * child.to_mat4()`.
    pub fn mul_trs(&self, child: &Self) -> Self {
        Self {
            translation: self.transform_point(child.translation),
            rotation: self.rotation * child.rotation,
            scale: self.scale.hadamard(child.scale),
        }
    }

    /// Decompose an affine matrix built as `T · R · S`.
    ///
    /// Scale comes from column lengths; a negative determinant is folded
    /// into the X scale. Fails with [`Error::SingularMatrix`] when a column
    /// is zero. Shear in the input is not detected and ends up distorting
    /// the rotation.
    pub fn try_from_mat4(m: &Mat4<S>) -> Result<Self> {
        let linear = m.upper_left_3x3();
        let mut scale = Vec3::new(linear.c0.length(), linear.c1.length(), linear.c2.length());
        if scale.min_element() <= S::ZERO || !scale.is_finite() {
            return Err(Error::SingularMatrix);
        }
        if linear.determinant() < S::ZERO {
            scale.x = -scale.x;
        }
        let r = Mat3::from_cols(linear.c0 / scale.x, linear.c1 / scale.y, linear.c2 / scale.z);
        Ok(Self::new(m.translation_vec(), Quat::from_mat3(&r), scale))
    }
}

impl<S: Scalar> Default for Trs<S> {
    fn default() -> Self { Self::identity() }
}

impl<S: Scalar> From<Trs<S>> for Mat4<S> {
    fn from(t: Trs<S>) -> Self { t.to_mat4() }
}
