//! Sphere primitives for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::random_to_sphere,
    Material, Ray,
};
use rand::RngCore;
use std::f32::consts::PI;
use umbra_math::{Aabb, Interval, Onb, Vec3};

/// Nearest root of the ray/sphere quadratic strictly inside `ray_t`.
///
/// Shared by the static and moving sphere.
fn hit_sphere(center: Vec3, radius: f32, ray: &Ray, ray_t: Interval) -> Option<f32> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let root = (h - sqrtd) / a;
    if ray_t.surrounds(root) {
        return Some(root);
    }
    let root = (h + sqrtd) / a;
    ray_t.surrounds(root).then_some(root)
}

/// UV coordinates for a point on the unit sphere.
fn sphere_uv(p: Vec3) -> (f32, f32) {
    // theta: angle down from +Y
    // phi: angle around Y axis from -X
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;
    (phi / (2.0 * PI), theta / PI)
}

/// A sphere primitive.
///
/// A negative radius keeps the geometry but flips the normal inward, which
/// is how hollow glass is modelled.
pub struct Sphere<M: Material> {
    center: Vec3,
    radius: f32,
    material: M,
}

impl<M: Material> Sphere<M> {
    pub fn new(center: Vec3, radius: f32, material: M) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl<M: Material> Hittable for Sphere<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let t = hit_sphere(self.center, self.radius, ray, ray_t)?;
        let p = ray.at(t);
        let normal = (p - self.center) / self.radius;
        let (u, v) = sphere_uv(normal);

        Some(HitRecord {
            p,
            normal,
            material: &self.material,
            u,
            v,
            t,
        })
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius.abs());
        Some(Aabb::from_points(self.center - rvec, self.center + rvec))
    }

    /// Uniform density over the cone the sphere subtends from `origin`.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let probe = Ray::new_simple(origin, direction);
        if self.hit(&probe, Interval::new(0.001, f32::INFINITY)).is_none() {
            return 0.0;
        }
        let distance_squared = (self.center - origin).length_squared();
        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared)
            .max(0.0)
            .sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        1.0 / solid_angle
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        let uvw = Onb::from_w(direction);
        uvw.local(random_to_sphere(rng, self.radius, distance_squared))
    }
}

/// A sphere whose centre moves linearly between two keyframes.
pub struct MovingSphere<M: Material> {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: M,
}

impl<M: Material> MovingSphere<M> {
    /// `center0` at `time0`, `center1` at `time1`.
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: M,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        }
    }

    /// Centre at `time`, extrapolated outside the keyframe interval.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }
}

impl<M: Material> Hittable for MovingSphere<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let center = self.center(ray.time());
        let t = hit_sphere(center, self.radius, ray, ray_t)?;
        let p = ray.at(t);
        let normal = (p - center) / self.radius;
        let (u, v) = sphere_uv(normal);

        Some(HitRecord {
            p,
            normal,
            material: &self.material,
            u,
            v,
            t,
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius.abs());
        let c0 = self.center(time0);
        let c1 = self.center(time1);
        let box0 = Aabb::from_points(c0 - rvec, c0 + rvec);
        let box1 = Aabb::from_points(c1 - rvec, c1 + rvec);
        Some(Aabb::surrounding(&box0, &box1))
    }
}
