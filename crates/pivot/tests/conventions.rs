//! Cross-module convention checks: the properties importers, the scene
//! graph and the renderer all rely on.

use approx::assert_relative_eq;
use core::f64::consts::{FRAC_PI_2, PI};
use pivot::{
    adapt_projection, bitangent, clip_remap, ClipConvention, Error, Layout, Mat3, Mat4,
    Projection, Quat, SceneGraph, Trs, Vec3, Vec4,
};

fn assert_vec3_eq(a: Vec3<f64>, b: Vec3<f64>) {
    assert_relative_eq!(a.x, b.x, epsilon = 1e-10);
    assert_relative_eq!(a.y, b.y, epsilon = 1e-10);
    assert_relative_eq!(a.z, b.z, epsilon = 1e-10);
}

fn assert_mat4_eq(a: &Mat4<f64>, b: &Mat4<f64>) {
    for (x, y) in a.to_array(Layout::ColumnMajor).iter().zip(b.to_array(Layout::ColumnMajor)) {
        assert_relative_eq!(*x, y, epsilon = 1e-10);
    }
}

fn sample_vectors() -> Vec<Vec3<f64>> {
    vec![
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.3, -1.7, 2.2),
        Vec3::new(-5.0, 0.25, 0.125),
        Vec3::new(1e3, 1e-3, -7.5),
    ]
}

fn sample_rotations() -> Vec<Quat<f64>> {
    let axes = [
        Vec3::x(),
        Vec3::y(),
        Vec3::new(0.0, 0.6, 0.8),
        Vec3::new(1.0, 1.0, 1.0).normalize().unwrap(),
        Vec3::new(-2.0, 0.5, 3.0).normalize().unwrap(),
    ];
    let angles = [0.0, 0.1, FRAC_PI_2, 2.5, PI - 1e-4, PI];
    axes.iter()
        .flat_map(|&a| angles.iter().map(move |&t| Quat::from_axis_angle(a, t)))
        .collect()
}

#[test]
fn cross_product_is_right_handed_and_anticommutative() {
    assert_eq!(Vec3::<f64>::x().cross(Vec3::y()), Vec3::z());
    for a in sample_vectors() {
        for b in sample_vectors() {
            assert_vec3_eq(a.cross(b), -b.cross(a));
        }
        assert_vec3_eq(a.cross(a), Vec3::zero());
    }
}

#[test]
fn rotation_then_inverse_is_identity() {
    for q in sample_rotations() {
        let inv = q.inverse().unwrap();
        for v in sample_vectors() {
            let back = inv.rotate(q.rotate(v));
            assert_relative_eq!(back.x, v.x, epsilon = 1e-9, max_relative = 1e-12);
            assert_relative_eq!(back.y, v.y, epsilon = 1e-9, max_relative = 1e-12);
            assert_relative_eq!(back.z, v.z, epsilon = 1e-9, max_relative = 1e-12);
        }
    }
}

#[test]
fn negated_quaternion_rotates_identically() {
    for q in sample_rotations() {
        for v in sample_vectors() {
            let (a, b) = (q.rotate(v), (-q).rotate(v));
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
            assert_relative_eq!(a.z, b.z, epsilon = 1e-9);
        }
    }
}

#[test]
fn optimized_rotation_matches_sandwich_product() {
    for q in sample_rotations() {
        for v in sample_vectors() {
            let (a, b) = (q.rotate(v), q.rotate_sandwich(v));
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
            assert_relative_eq!(a.z, b.z, epsilon = 1e-9);
        }
    }
}

#[test]
fn matrix_quaternion_roundtrip() {
    for q in sample_rotations() {
        let r = q.to_mat3();
        assert!(r.is_rotation(1e-10));
        let r2 = Quat::from_mat3(&r).to_mat3();
        for (x, y) in r.to_array(Layout::ColumnMajor).iter().zip(r2.to_array(Layout::ColumnMajor)) {
            assert_relative_eq!(*x, y, epsilon = 1e-10);
        }
        assert!(Quat::from_mat3(&r).same_rotation(&q, 1e-10));
    }
}

#[test]
fn row_major_arrays_yield_same_quaternion() {
    let axis = Vec3::new(0.0, 0.6, 0.8);
    let q = Quat::from_axis_angle(axis, 1.2);
    let r = Mat3::rotation_axis(axis, 1.2);
    let from_cols = Quat::from_mat3_array(r.to_array(Layout::ColumnMajor), Layout::ColumnMajor);
    let from_rows = Quat::from_mat3_array(r.to_array(Layout::RowMajor), Layout::RowMajor);
    assert!(from_cols.same_rotation(&q, 1e-10));
    assert!(from_rows.same_rotation(&q, 1e-10));
    assert_relative_eq!(from_cols.w, from_rows.w, epsilon = 1e-12);
}

#[test]
fn trs_scales_then_translates() {
    let t = Trs::new(Vec3::new(1.0, 2.0, 3.0), Quat::identity(), Vec3::splat(2.0));
    assert_vec3_eq(t.to_mat4().transform_point(Vec3::x()), Vec3::new(3.0, 2.0, 3.0));
    assert_mat4_eq(&(t.to_mat4() * t.inverse_mat4().unwrap()), &Mat4::identity());
}

#[test]
fn grandchild_inherits_both_translations() {
    let mut g = SceneGraph::new();
    let root = g.insert("root", Trs::identity());
    let child = g.insert_child(root, "child", Trs::from_translation(Vec3::x())).unwrap();
    let grandchild = g.insert_child(child, "grandchild", Trs::from_translation(Vec3::x())).unwrap();
    assert_vec3_eq(g.world_position(grandchild).unwrap(), Vec3::new(2.0, 0.0, 0.0));
    assert_mat4_eq(
        &g.world_matrix(grandchild).unwrap(),
        &g.world_matrix_uncached(grandchild).unwrap(),
    );
}

#[test]
fn cache_tracks_every_mutation() {
    let mut g = SceneGraph::new();
    let root = g.insert("root", Trs::from_scale(Vec3::new(2.0, 1.0, 1.0)));
    let arm = g.insert_child(root, "arm", Trs::from_translation(Vec3::new(1.0, 0.0, 0.0))).unwrap();
    let hand = g.insert_child(arm, "hand", Trs::from_translation(Vec3::new(0.0, 1.0, 0.0))).unwrap();
    let other = g.insert("other", Trs::from_translation(Vec3::new(0.0, 0.0, -4.0)));

    let steps: Vec<Box<dyn Fn(&mut SceneGraph<f64>)>> = vec![
        Box::new(move |g: &mut SceneGraph<f64>| g.set_trs(arm, Trs::from_rotation(Quat::from_axis_angle(Vec3::z(), 0.3))).unwrap()),
        Box::new(move |g: &mut SceneGraph<f64>| g.attach(hand, other).unwrap()),
        Box::new(move |g: &mut SceneGraph<f64>| g.update_trs(root, |t| t.translation.y += 5.0).unwrap()),
        Box::new(move |g: &mut SceneGraph<f64>| g.detach(arm).unwrap()),
        Box::new(move |g: &mut SceneGraph<f64>| g.attach(other, arm).unwrap()),
    ];
    for step in steps {
        step(&mut g);
        for id in [root, arm, hand, other] {
            let cached = g.world_matrix(id).unwrap();
            assert_mat4_eq(&cached, &g.world_matrix_uncached(id).unwrap());
        }
    }
    // hand -> other -> arm
    assert_eq!(g.ancestors(hand).unwrap(), vec![other, arm]);
}

#[test]
fn detached_node_leaves_no_trace_in_parent() {
    let mut g = SceneGraph::<f64>::new();
    let parent = g.insert("parent", Trs::identity());
    let a = g.insert_child(parent, "a", Trs::identity()).unwrap();
    let b = g.insert_child(parent, "b", Trs::identity()).unwrap();
    g.detach(a).unwrap();
    assert_eq!(g.children(parent).unwrap(), &[b]);
    assert_eq!(g.parent(a).unwrap(), None);
    assert!(g.roots().any(|r| r == a));
}

#[test]
fn cycles_are_rejected() {
    let mut g = SceneGraph::<f64>::new();
    let a = g.insert("a", Trs::identity());
    let b = g.insert_child(a, "b", Trs::identity()).unwrap();
    let c = g.insert_child(b, "c", Trs::identity()).unwrap();
    assert_eq!(g.attach(a, c), Err(Error::Cycle { child: a, parent: c }));
    assert_eq!(g.descendants(a).unwrap(), vec![b, c]);
}

#[test]
fn bitangent_sign_convention() {
    let n = Vec3::new(0.0, 0.0, 1.0);
    assert_vec3_eq(bitangent(n, Vec4::new(1.0, 0.0, 0.0, 1.0)), Vec3::new(0.0, 1.0, 0.0));
    assert_vec3_eq(bitangent(n, Vec4::new(1.0, 0.0, 0.0, -1.0)), Vec3::new(0.0, -1.0, 0.0));
}

#[test]
fn clip_adapter_identity_and_idempotence() {
    let p = Mat4::perspective_rh(1.0, 1.25, 0.1, 500.0);
    assert_mat4_eq(&adapt_projection(&p, ClipConvention::CANONICAL), &p);
    assert_mat4_eq(&clip_remap(ClipConvention::METAL), &Mat4::identity());

    for target in [ClipConvention::OPENGL, ClipConvention::VULKAN, ClipConvention::REVERSED_Z] {
        let once = Projection::canonical(p).adapt(target);
        let twice = once.adapt(target);
        assert_mat4_eq(&once.matrix(), &twice.matrix());
        assert_mat4_eq(&once.matrix(), &adapt_projection(&p, target));
    }
}

#[test]
fn camera_pipeline_lands_target_at_screen_center() {
    let view = Mat4::look_at_rh(Vec3::new(3.0, 3.0, 3.0), Vec3::zero(), Vec3::y()).unwrap();
    let proj = adapt_projection(&Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0), ClipConvention::OPENGL);
    let ndc = (proj * view * Vec4::new(0.0, 0.0, 0.0, 1.0)).project();
    assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-10);
    assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-10);
    assert!(ndc.z > -1.0 && ndc.z < 1.0);
}
