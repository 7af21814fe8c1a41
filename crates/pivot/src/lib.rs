//! pivot: transform math and scene hierarchy for real-time rendering
//!
//! One coordinate convention, enforced everywhere, so importers, the scene
//! graph and the renderer agree on what a matrix means.
//!
//! # Conventions
//! - Right-handed, +X right, +Y up, +Z toward the viewer; `X × Y = Z`.
//! - Column vectors, left multiplication: `v' = M v`. Applying `A` then
//!   `B` is `B * A`. Matrices are stored column-major.
//! - Quaternions are `(x, y, z, w)`; `q2 * q1` rotates by `q1` first.
//!   `q` and `-q` are the same rotation.
//! - Node local transform is `T · R · S`; world is `parent_world · local`.
//! - Projections target canonical NDC (depth `[0, 1]`, +Y up) and are
//!   adapted per backend through [`ClipConvention`].
//!
//! Degenerate inputs are reported through [`Error`], never patched with
//! a default. Cheap-to-violate preconditions (unit axis, orthonormal
//! rotation block) are documented on the function and not checked.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod scalar;
mod error;
mod vec3;
mod vec4;
mod quat;
mod mat3;
mod mat4;
mod trs;
pub mod scene;
pub mod tangent;
pub mod clip;

#[cfg(feature = "approx")]
mod approx_impls;

pub use scalar::Scalar;
pub use error::{Error, Result};
pub use vec3::Vec3;
pub use vec4::Vec4;
pub use quat::Quat;
pub use mat3::{Layout, Mat3};
pub use mat4::Mat4;
pub use trs::Trs;
pub use scene::{Node, NodeId, SceneGraph};
pub use tangent::{bitangent, tangent_sign, TangentFrame};
pub use clip::{adapt_projection, clip_remap, clip_unmap, ClipConvention, DepthRange, Projection, YAxis};

// Bytemuck impls for concrete f32/f64 types (generic structs can't derive Pod)
#[cfg(feature = "bytemuck")]
mod bytemuck_impls {
    use super::*;

    macro_rules! impl_pod {
        ($($t:ident),*) => {
            $(
                // SAFETY: All fields are the same float type, #[repr(C)], no padding
                unsafe impl bytemuck::Zeroable for $t<f32> {}
                unsafe impl bytemuck::Pod for $t<f32> {}
                unsafe impl bytemuck::Zeroable for $t<f64> {}
                unsafe impl bytemuck::Pod for $t<f64> {}
            )*
        };
    }

    impl_pod!(Vec3, Vec4, Quat, Mat3, Mat4, Trs, TangentFrame);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mat4_add_sub_neg_scale() {
        let a = Mat4::<f64>::identity();
        let sum = a + a;
        assert!((sum.get(0, 0) - 2.0).abs() < 1e-10);
        assert!((a - a).get(3, 3).abs() < 1e-10);
        assert!(((-a).get(1, 1) + 1.0).abs() < 1e-10);
        assert!(((a * 3.0).get(2, 2) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn mat4_rotation_block_matches_quat() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 0.6, 0.8), 0.9);
        let m = Mat4::from_quat(&q);
        let v = Vec3::new(1.0, -2.0, 0.5);
        assert!((m.transform_vector(v) - q.rotate(v)).length() < 1e-12);
        assert_eq!(m.upper_left_3x3(), Mat3::from_quat(&q));
    }

    #[test]
    fn error_messages() {
        use alloc::string::ToString;
        let mut g = SceneGraph::<f32>::new();
        let a = g.insert("a", Trs::identity());
        let b = g.insert_child(a, "b", Trs::identity()).unwrap();
        let err = g.attach(a, b).unwrap_err();
        assert_eq!(err.to_string(), "attaching node#0v0 under node#1v0 would create a cycle");
        assert_eq!(Error::SingularMatrix.to_string(), "singular matrix: transform is not invertible");
    }

    #[cfg(feature = "bytemuck")]
    #[test]
    fn pod_layout() {
        let t = Trs::<f32>::identity();
        let floats: &[f32] = bytemuck::cast_slice(core::slice::from_ref(&t));
        assert_eq!(floats, &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        let m = Mat4::<f32>::translation(Vec3::new(1.0, 2.0, 3.0));
        let floats: &[f32] = bytemuck::cast_slice(core::slice::from_ref(&m));
        assert_eq!(&floats[12..], &[1.0, 2.0, 3.0, 1.0]);
    }
}
