//! Per-vertex tangent frames.
//!
//! Meshes store a unit normal `N` and a four-component tangent `T` whose
//! `w` is `+1` or `-1`. The bitangent is not stored; it is rebuilt as
//! `B = (N × T.xyz) · T.w`. A `w` of `-1` marks mirrored UVs.

use crate::{Mat3, Scalar, Vec3, Vec4};

/// Rebuild the bitangent from a normal and a packed tangent.
///
/// Pure formula: inputs are neither renormalized nor re-orthogonalized, so
/// a non-unit or skewed input gives a correspondingly skewed bitangent.
#[inline]
pub fn bitangent<S: Scalar>(normal: Vec3<S>, tangent: Vec4<S>) -> Vec3<S> {
    normal.cross(tangent.truncate()) * tangent.w
}

/// Sign to pack into `T.w` so that [`bitangent`] reproduces `b`.
#[inline]
pub fn tangent_sign<S: Scalar>(normal: Vec3<S>, tangent: Vec3<S>, bitangent: Vec3<S>) -> S {
    if normal.cross(tangent).dot(bitangent) < S::ZERO { -S::ONE } else { S::ONE }
}

/// Tangent, bitangent and normal of one vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TangentFrame<S> {
    pub tangent: Vec3<S>,
    pub bitangent: Vec3<S>,
    pub normal: Vec3<S>,
}

impl<S: Scalar> TangentFrame<S> {
    /// Frame from a normal and a packed tangent.
    pub fn new(normal: Vec3<S>, tangent: Vec4<S>) -> Self {
        Self {
            tangent: tangent.truncate(),
            bitangent: bitangent(normal, tangent),
            normal,
        }
    }

    /// Pack back into `(normal, tangent)` vertex attributes.
    pub fn to_attributes(&self) -> (Vec3<S>, Vec4<S>) {
        let w = tangent_sign(self.normal, self.tangent, self.bitangent);
        (self.normal, self.tangent.extend(w))
    }

    /// TBN matrix with columns `(T, B, N)`: maps tangent-space vectors
    /// (e.g. normal-map samples) into the space `N` and `T` are given in.
    pub fn to_mat3(&self) -> Mat3<S> {
        Mat3::from_cols(self.tangent, self.bitangent, self.normal)
    }

    /// Whether the frame is mirrored (left-handed).
    pub fn is_mirrored(&self) -> bool {
        tangent_sign(self.normal, self.tangent, self.bitangent) < S::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitangent_follows_sign() {
        let n = Vec3::<f64>::z();
        assert_eq!(bitangent(n, Vec4::new(1.0, 0.0, 0.0, 1.0)), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(bitangent(n, Vec4::new(1.0, 0.0, 0.0, -1.0)), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn no_renormalization() {
        let n = Vec3::new(0.0, 0.0, 2.0);
        let b = bitangent(n, Vec4::new(3.0, 0.0, 0.0, 1.0));
        assert_eq!(b, Vec3::new(0.0, 6.0, 0.0));
    }

    #[test]
    fn frame_roundtrips_attributes() {
        let n = Vec3::<f64>::y();
        for w in [1.0, -1.0] {
            let t = Vec4::new(1.0, 0.0, 0.0, w);
            let frame = TangentFrame::new(n, t);
            assert_eq!(frame.to_attributes(), (n, t));
            assert_eq!(frame.is_mirrored(), w < 0.0);
        }
    }

    #[test]
    fn tbn_maps_tangent_space_up_to_normal() {
        let frame = TangentFrame::new(Vec3::<f64>::x(), Vec4::new(0.0, 1.0, 0.0, 1.0));
        let m = frame.to_mat3();
        assert_eq!(m * Vec3::z(), Vec3::x());
        assert_eq!(m * Vec3::x(), Vec3::y());
        assert!((m.determinant() - 1.0).abs() < 1e-12);
    }
}
