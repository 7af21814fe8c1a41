//! Clip-space conventions.
//!
//! Projections in this crate target one canonical NDC: X and Y in
//! `[-1, 1]`, +Y up, depth in `[0, 1]` with near at 0. Graphics APIs
//! disagree on the last three, so a projection is adapted to the backend's
//! [`ClipConvention`] by a remap matrix applied on the left:
//! `P_target = clip_remap(target) · P_canonical`.
//!
//! The convention is always passed in explicitly; nothing here guesses
//! the backend.

use crate::{Mat4, Scalar, Vec4};

/// NDC depth interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DepthRange {
    /// `[0, 1]` (Direct3D, Vulkan, Metal, WebGPU)
    #[default]
    ZeroToOne,
    /// `[-1, 1]` (OpenGL)
    NegativeOneToOne,
}

/// Direction of +Y in NDC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum YAxis {
    #[default]
    Up,
    /// Vulkan
    Down,
}

/// Target clip-space convention for a rendering backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipConvention {
    pub depth_range: DepthRange,
    pub y_axis: YAxis,
    /// Near plane at the far end of the depth range.
    pub reversed_depth: bool,
}

impl ClipConvention {
    pub const CANONICAL: Self = Self {
        depth_range: DepthRange::ZeroToOne,
        y_axis: YAxis::Up,
        reversed_depth: false,
    };
    pub const OPENGL: Self = Self {
        depth_range: DepthRange::NegativeOneToOne,
        ..Self::CANONICAL
    };
    pub const VULKAN: Self = Self {
        y_axis: YAxis::Down,
        ..Self::CANONICAL
    };
    pub const DIRECT3D: Self = Self::CANONICAL;
    pub const METAL: Self = Self::CANONICAL;
    pub const WEBGPU: Self = Self::CANONICAL;
    /// Canonical axes with reversed depth (near = 1, far = 0).
    pub const REVERSED_Z: Self = Self {
        reversed_depth: true,
        ..Self::CANONICAL
    };

    pub fn is_canonical(&self) -> bool {
        *self == Self::CANONICAL
    }
}

/// Matrix taking canonical clip coordinates to `target` clip coordinates.
///
/// Acts on homogeneous clip space (before the perspective divide), so it
/// is exact for perspective and orthographic projections alike. Identity
/// for [`ClipConvention::CANONICAL`].
pub fn clip_remap<S: Scalar>(target: ClipConvention) -> Mat4<S> {
    let (z, w) = depth_coefficients::<S>(target);
    let y = match target.y_axis {
        YAxis::Up => S::ONE,
        YAxis::Down => -S::ONE,
    };
    Mat4::identity()
        .with_row(1, Vec4::new(S::ZERO, y, S::ZERO, S::ZERO))
        .with_row(2, Vec4::new(S::ZERO, S::ZERO, z, w))
}

/// Inverse of [`clip_remap`]: target clip coordinates back to canonical.
pub fn clip_unmap<S: Scalar>(target: ClipConvention) -> Mat4<S> {
    let (z, w) = depth_coefficients::<S>(target);
    let y = match target.y_axis {
        YAxis::Up => S::ONE,
        YAxis::Down => -S::ONE,
    };
    // z' = a z + b w  =>  z = (z' - b w) / a, with a = ±1 or ±2.
    let inv = z.recip();
    Mat4::identity()
        .with_row(1, Vec4::new(S::ZERO, y, S::ZERO, S::ZERO))
        .with_row(2, Vec4::new(S::ZERO, S::ZERO, inv, -w * inv))
}

// Target clip z as `a * z + b * w` of canonical clip (z, w).
fn depth_coefficients<S: Scalar>(target: ClipConvention) -> (S, S) {
    let (mut a, mut b) = (S::ONE, S::ZERO);
    if target.reversed_depth {
        // z' = 1 - z in NDC
        (a, b) = (-a, S::ONE - b);
    }
    if target.depth_range == DepthRange::NegativeOneToOne {
        // z' = 2 z - 1 in NDC
        (a, b) = (S::TWO * a, S::TWO * b - S::ONE);
    }
    (a, b)
}

/// Adapt a canonical-NDC projection to `target`.
///
/// `canonical` must be a canonical projection; feeding an already adapted
/// matrix remaps it a second time. Use [`Projection`] to keep track.
#[inline]
pub fn adapt_projection<S: Scalar>(canonical: &Mat4<S>, target: ClipConvention) -> Mat4<S> {
    clip_remap(target) * *canonical
}

/// A projection matrix together with the convention it currently targets.
///
/// Adaptation always starts from the canonical form, so adapting to the
/// same target twice gives the same matrix as adapting once.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection<S> {
    canonical: Mat4<S>,
    convention: ClipConvention,
}

impl<S: Scalar> Projection<S> {
    /// Wrap a projection built for canonical NDC, e.g. from
    /// [`Mat4::perspective_rh`].
    pub fn canonical(matrix: Mat4<S>) -> Self {
        Self { canonical: matrix, convention: ClipConvention::CANONICAL }
    }

    /// Wrap a matrix already targeting `convention`.
    pub fn from_target(matrix: Mat4<S>, convention: ClipConvention) -> Self {
        Self { canonical: clip_unmap(convention) * matrix, convention }
    }

    pub fn convention(&self) -> ClipConvention { self.convention }

    /// The same projection targeting `target`.
    pub fn adapt(&self, target: ClipConvention) -> Self {
        Self { canonical: self.canonical, convention: target }
    }

    /// Matrix for the current convention.
    pub fn matrix(&self) -> Mat4<S> {
        adapt_projection(&self.canonical, self.convention)
    }

    /// Matrix for canonical NDC.
    pub fn canonical_matrix(&self) -> Mat4<S> { self.canonical }
}
