//! Shared helpers for pivot benchmarks: seeded RNG, input generators.

use pivot::{Quat, SceneGraph, Trs, Vec3};

/// Simple xoshiro256** PRNG for reproducible benchmarks (no rand dependency in lib).
pub struct Rng {
    s: [u64; 4],
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        // SplitMix64 to expand seed into state
        let mut z = seed;
        let mut s = [0u64; 4];
        for slot in &mut s {
            z = z.wrapping_add(0x9e3779b97f4a7c15);
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
            *slot = z ^ (z >> 31);
        }
        Self { s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.s[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.s[1] << 17;
        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];
        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);
        result
    }

    /// Uniform f64 in [-1, 1]
    pub fn f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64) * 2.0 - 1.0
    }

    /// Uniform f32 in [-1, 1]
    pub fn f32(&mut self) -> f32 {
        self.f64() as f32
    }

    /// Index in `0..n`
    pub fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    pub fn vec3(&mut self) -> Vec3<f32> {
        Vec3::new(self.f32(), self.f32(), self.f32())
    }

    /// Unit quaternion; rejection-samples the axis away from zero.
    pub fn rotation(&mut self) -> Quat<f32> {
        loop {
            if let Ok(axis) = self.vec3().normalize() {
                return Quat::from_axis_angle(axis, self.f32() * core::f32::consts::PI);
            }
        }
    }

    pub fn trs(&mut self) -> Trs<f32> {
        let scale = Vec3::new(self.f32(), self.f32(), self.f32()) * 0.5 + Vec3::splat(1.0);
        Trs::new(self.vec3() * 10.0, self.rotation(), scale)
    }
}

pub fn make_rng() -> Rng {
    Rng::new(0xDEAD_BEEF_CAFE_BABE)
}

pub fn random_vec3s(n: usize) -> Vec<Vec3<f32>> {
    let mut rng = make_rng();
    (0..n).map(|_| rng.vec3()).collect()
}

pub fn random_rotations(n: usize) -> Vec<Quat<f32>> {
    let mut rng = make_rng();
    (0..n).map(|_| rng.rotation()).collect()
}

pub fn random_trs(n: usize) -> Vec<Trs<f32>> {
    let mut rng = make_rng();
    (0..n).map(|_| rng.trs()).collect()
}

/// Random forest of `n` nodes: each node picks a random earlier node as
/// parent, or becomes a root with probability 1/16.
pub fn random_scene(n: usize) -> SceneGraph<f32> {
    let mut rng = make_rng();
    let mut g = SceneGraph::with_capacity(n);
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let trs = rng.trs();
        let id = if i == 0 || rng.below(16) == 0 {
            g.insert("node", trs)
        } else {
            let parent = ids[rng.below(ids.len())];
            match g.insert_child(parent, "node", trs) {
                Ok(id) => id,
                Err(_) => g.insert("node", trs),
            }
        };
        ids.push(id);
    }
    g
}

/// Same quaternion as glam's (x, y, z, w) layout.
pub fn to_glam_quat(q: &Quat<f32>) -> [f32; 4] {
    [q.x, q.y, q.z, q.w]
}
