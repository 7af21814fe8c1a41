// Component-wise `approx` comparisons. Quaternions compare as stored, so
// `q` and `-q` are NOT approximately equal here; use `Quat::same_rotation`
// to compare rotations.

use approx::{AbsDiffEq, RelativeEq};

use crate::{Mat3, Mat4, Quat, Scalar, Trs, Vec3, Vec4};

macro_rules! impl_approx {
    ($t:ident { $($field:ident),* }) => {
        impl<S: Scalar + AbsDiffEq<Epsilon = S>> AbsDiffEq for $t<S> {
            type Epsilon = S;

            fn default_epsilon() -> S {
                S::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: S) -> bool {
                $(self.$field.abs_diff_eq(&other.$field, epsilon))&&*
            }
        }

        impl<S: Scalar + RelativeEq<Epsilon = S>> RelativeEq for $t<S> {
            fn default_max_relative() -> S {
                S::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: S, max_relative: S) -> bool {
                $(self.$field.relative_eq(&other.$field, epsilon, max_relative))&&*
            }
        }
    };
}

impl_approx!(Vec3 { x, y, z });
impl_approx!(Vec4 { x, y, z, w });
impl_approx!(Quat { x, y, z, w });
impl_approx!(Mat3 { c0, c1, c2 });
impl_approx!(Mat4 { c0, c1, c2, c3 });
impl_approx!(Trs { translation, rotation, scale });

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq, assert_relative_ne};

    #[test]
    fn vectors_compare_componentwise() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(a, Vec3::new(1.0, 2.0, 3.0 + 1e-14), epsilon = 1e-12);
        assert_relative_ne!(a, Vec3::new(1.0, 2.0, 3.0 + 1e-14));
        assert_relative_ne!(a, Vec3::new(1.0, 2.0, 3.1));
    }

    #[test]
    fn quat_sign_matters() {
        let q = Quat::from_axis_angle(Vec3::<f64>::y(), 0.5);
        assert_relative_ne!(q, -q);
        assert!(q.same_rotation(&-q, 1e-12));
    }

    #[test]
    fn matrices_with_epsilon() {
        let m = Mat4::<f64>::translation(Vec3::new(1.0, 0.0, 0.0));
        let n = m * Mat4::identity();
        assert_abs_diff_eq!(m, n, epsilon = 1e-12);
        assert_relative_eq!(Mat3::<f64>::identity(), Mat3::identity().transpose());
    }
}
