//! Random sampling helpers.
//!
//! Every function takes the caller's random stream explicitly so each render
//! worker can own its generator.

use rand::{Rng, RngCore};
use std::f32::consts::PI;
use umbra_math::Vec3;

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform float in [min, max).
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Uniform point strictly inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform point inside the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Cosine-weighted direction on the +Z hemisphere.
///
/// Disk-to-hemisphere mapping; the result has unit length and density
/// `z / PI`.
pub fn random_cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let z = (1.0 - r2).sqrt();
    let phi = 2.0 * PI * r1;
    // Unit-disk radius. Scaling it by 2 would break the `z / PI` density.
    let r = r2.sqrt();
    Vec3::new(phi.cos() * r, phi.sin() * r, z)
}

/// Direction uniformly distributed inside the cone subtended by a sphere of
/// `radius` seen from `distance_squared` away, in a frame where the sphere
/// centre lies on +Z.
pub fn random_to_sphere(rng: &mut dyn RngCore, radius: f32, distance_squared: f32) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let cos_theta_max = (1.0 - radius * radius / distance_squared).max(0.0).sqrt();
    let z = 1.0 + r2 * (cos_theta_max - 1.0);
    let phi = 2.0 * PI * r1;
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, z)
}
