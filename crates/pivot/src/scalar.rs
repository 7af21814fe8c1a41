use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Real number type every pivot value type is generic over.
///
/// Implemented for `f32` and `f64`. Renderers typically use `f32`; tooling
/// and tests that need tight tolerances use `f64`.
pub trait Scalar:
    Copy
    + Clone
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + PartialOrd
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + 'static
{
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;
    const HALF: Self;
    const PI: Self;
    const FRAC_PI_2: Self;
    const EPSILON: Self;

    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Self;
    fn acos(self) -> Self;
    fn atan2(self, other: Self) -> Self;
    fn sin_cos(self) -> (Self, Self);
    fn copysign(self, sign: Self) -> Self;
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
    fn clamp(self, lo: Self, hi: Self) -> Self;
    fn recip(self) -> Self;
    fn is_finite(self) -> bool;

    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
}

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("pivot needs either the `std` or the `libm` feature for float intrinsics");

// Each entry: name, arity, std method, libm f32 fn, libm f64 fn.
macro_rules! float_ops {
    ($( $name:ident ( $($arg:ident),* ) => $method:ident, $libm32:ident, $libm64:ident; )*) => {
        #[cfg(feature = "std")]
        mod float_ops {
            paste::paste! {
                $(
                    #[inline(always)]
                    pub fn [<$name _f32>](x: f32 $(, $arg: f32)*) -> f32 { x.$method($($arg),*) }
                    #[inline(always)]
                    pub fn [<$name _f64>](x: f64 $(, $arg: f64)*) -> f64 { x.$method($($arg),*) }
                )*
            }
        }

        #[cfg(all(not(feature = "std"), feature = "libm"))]
        mod float_ops {
            paste::paste! {
                $(
                    #[inline(always)]
                    pub fn [<$name _f32>](x: f32 $(, $arg: f32)*) -> f32 { libm::$libm32(x $(, $arg)*) }
                    #[inline(always)]
                    pub fn [<$name _f64>](x: f64 $(, $arg: f64)*) -> f64 { libm::$libm64(x $(, $arg)*) }
                )*
            }
        }
    };
}

float_ops! {
    sqrt() => sqrt, sqrtf, sqrt;
    abs() => abs, fabsf, fabs;
    sin() => sin, sinf, sin;
    cos() => cos, cosf, cos;
    tan() => tan, tanf, tan;
    acos() => acos, acosf, acos;
    atan2(other) => atan2, atan2f, atan2;
    copysign(sign) => copysign, copysignf, copysign;
}

macro_rules! impl_scalar_float {
    ($t:ty, $suffix:ident, $consts:ident) => {
        paste::paste! {
        impl Scalar for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const TWO: Self = 2.0;
            const HALF: Self = 0.5;
            const PI: Self = core::$suffix::consts::PI;
            const FRAC_PI_2: Self = core::$suffix::consts::FRAC_PI_2;
            const EPSILON: Self = $consts::EPSILON;

            #[inline] fn sqrt(self) -> Self { float_ops::[<sqrt_ $suffix>](self) }
            #[inline] fn abs(self) -> Self { float_ops::[<abs_ $suffix>](self) }
            #[inline] fn sin(self) -> Self { float_ops::[<sin_ $suffix>](self) }
            #[inline] fn cos(self) -> Self { float_ops::[<cos_ $suffix>](self) }
            #[inline] fn tan(self) -> Self { float_ops::[<tan_ $suffix>](self) }
            #[inline] fn acos(self) -> Self { float_ops::[<acos_ $suffix>](self) }
            #[inline] fn atan2(self, other: Self) -> Self { float_ops::[<atan2_ $suffix>](self, other) }
            #[inline] fn copysign(self, sign: Self) -> Self { float_ops::[<copysign_ $suffix>](self, sign) }
            #[inline] fn sin_cos(self) -> (Self, Self) { (self.sin(), self.cos()) }

            #[inline] fn min(self, other: Self) -> Self { if self < other { self } else { other } }
            #[inline] fn max(self, other: Self) -> Self { if self > other { self } else { other } }
            #[inline] fn clamp(self, lo: Self, hi: Self) -> Self {
                if self < lo { lo } else if self > hi { hi } else { self }
            }
            #[inline] fn recip(self) -> Self { 1.0 / self }
            #[inline] fn is_finite(self) -> bool { <$t>::is_finite(self) }

            #[inline] fn from_f64(v: f64) -> Self { v as $t }
            #[inline] fn to_f64(self) -> f64 { self as f64 }
        }
        }
    };
}

impl_scalar_float!(f32, f32, f32);
impl_scalar_float!(f64, f64, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_basics() {
        assert_eq!(f64::ZERO, 0.0);
        assert_eq!(f64::ONE, 1.0);
        assert!((f64::PI - core::f64::consts::PI).abs() < f64::EPSILON);
        assert_eq!(Scalar::sqrt(4.0_f64), 2.0);
        assert_eq!(Scalar::abs(-3.0_f64), 3.0);
    }

    #[test]
    fn f32_basics() {
        assert_eq!(f32::ZERO, 0.0);
        assert!((f32::PI - core::f32::consts::PI).abs() < f32::EPSILON);
    }

    #[test]
    fn finiteness() {
        assert!(Scalar::is_finite(1.0_f64));
        assert!(!Scalar::is_finite(f64::NAN));
        assert!(!Scalar::is_finite(f32::INFINITY));
    }
}
