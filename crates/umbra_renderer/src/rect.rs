//! Axis-aligned rectangles.
//!
//! One type covers all three plane orientations; the plane decides which
//! coordinate is fixed at `k` and which two span the rectangle.

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::gen_f32,
    Material, Ray,
};
use rand::RngCore;
use umbra_math::{Aabb, Interval, Vec3};

/// Half-thickness added along the plane normal so the box is never flat.
const PLANE_PAD: f32 = 0.0001;

/// Orientation of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Spans X and Y at constant Z; normal +Z.
    Xy,
    /// Spans X and Z at constant Y; normal +Y.
    Xz,
    /// Spans Y and Z at constant X; normal +X.
    Yz,
}

impl Plane {
    /// Axis indices `(a, b, k)`: the two spanned axes and the fixed one.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }

    fn normal(self) -> Vec3 {
        match self {
            Plane::Xy => Vec3::Z,
            Plane::Xz => Vec3::Y,
            Plane::Yz => Vec3::X,
        }
    }
}

/// Rectangle `[a0, a1] x [b0, b1]` on the plane where the fixed axis equals `k`.
pub struct AxisRect<M: Material> {
    plane: Plane,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    material: M,
}

impl<M: Material> AxisRect<M> {
    pub fn new(plane: Plane, a0: f32, a1: f32, b0: f32, b1: f32, k: f32, material: M) -> Self {
        Self {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material,
        }
    }

    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: M) -> Self {
        Self::new(Plane::Xy, x0, x1, y0, y1, k, material)
    }

    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: M) -> Self {
        Self::new(Plane::Xz, x0, x1, z0, z1, k, material)
    }

    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: M) -> Self {
        Self::new(Plane::Yz, y0, y1, z0, z1, k, material)
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn area(&self) -> f32 {
        (self.a1 - self.a0) * (self.b1 - self.b0)
    }

    fn point(&self, a: f32, b: f32) -> Vec3 {
        let (ia, ib, ik) = self.plane.axes();
        let mut p = Vec3::ZERO;
        p[ia] = a;
        p[ib] = b;
        p[ik] = self.k;
        p
    }
}

impl<M: Material> Hittable for AxisRect<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (ia, ib, ik) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        // A ray parallel to the plane yields an infinite or NaN t and is
        // rejected by the range checks below.
        let t = (self.k - origin[ik]) / direction[ik];
        if !ray_t.contains(t) {
            return None;
        }

        let a = origin[ia] + t * direction[ia];
        let b = origin[ib] + t * direction[ib];
        let inside_a = Interval::new(self.a0, self.a1).contains(a);
        let inside_b = Interval::new(self.b0, self.b1).contains(b);
        if !inside_a || !inside_b {
            return None;
        }

        Some(HitRecord {
            p: ray.at(t),
            normal: self.plane.normal(),
            material: &self.material,
            u: (a - self.a0) / (self.a1 - self.a0),
            v: (b - self.b0) / (self.b1 - self.b0),
            t,
        })
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let pad = Vec3::splat(PLANE_PAD) * self.plane.normal();
        let lo = self.point(self.a0, self.b0) - pad;
        let hi = self.point(self.a1, self.b1) + pad;
        Some(Aabb::from_points(lo, hi))
    }

    /// Solid-angle density of hitting this rectangle along `direction`.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let probe = Ray::new_simple(origin, direction);
        match self.hit(&probe, Interval::new(0.001, f32::INFINITY)) {
            Some(rec) => {
                let distance_squared = rec.t * rec.t * direction.length_squared();
                let cosine = (direction.dot(rec.normal) / direction.length()).abs();
                distance_squared / (cosine * self.area())
            }
            None => 0.0,
        }
    }

    /// Vector from `origin` to a uniformly chosen point on the rectangle.
    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let a = self.a0 + gen_f32(rng) * (self.a1 - self.a0);
        let b = self.b0 + gen_f32(rng) * (self.b1 - self.b0);
        self.point(a, b) - origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Lambertian {
        Lambertian::from_color(Vec3::splat(0.5))
    }

    #[test]
    fn test_xy_rect_hit_and_uv() {
        let rect = AxisRect::xy(0.0, 2.0, 0.0, 4.0, -3.0, gray());
        let ray = Ray::new_simple(Vec3::new(0.5, 1.0, 0.0), -Vec3::Z);

        let rec = rect
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("inside the rectangle");
        assert!((rec.t - 3.0).abs() < 1e-6);
        assert_eq!(rec.normal, Vec3::Z);
        assert!((rec.u - 0.25).abs() < 1e-6);
        assert!((rec.v - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_rect_normals_per_plane() {
        let mat = gray();
        assert_eq!(AxisRect::xz(0.0, 1.0, 0.0, 1.0, 0.0, mat.clone()).plane().normal(), Vec3::Y);
        assert_eq!(AxisRect::yz(0.0, 1.0, 0.0, 1.0, 0.0, mat).plane().normal(), Vec3::X);
    }

    #[test]
    fn test_yz_rect_uv_axes() {
        let rect = AxisRect::yz(0.0, 10.0, 0.0, 20.0, 5.0, gray());
        let ray = Ray::new_simple(Vec3::new(0.0, 2.0, 15.0), Vec3::X);

        let rec = rect
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("hits the plane inside bounds");
        assert!((rec.u - 0.2).abs() < 1e-6);
        assert!((rec.v - 0.75).abs() < 1e-6);
        assert_eq!(rec.p, Vec3::new(5.0, 2.0, 15.0));
    }

    #[test]
    fn test_rect_rejects_outside_bounds() {
        let rect = AxisRect::xz(0.0, 1.0, 0.0, 1.0, 2.0, gray());
        let ray = Ray::new_simple(Vec3::new(3.0, 0.0, 0.5), Vec3::Y);
        assert!(rect.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_rect_parallel_ray_misses() {
        let rect = AxisRect::xz(-1.0, 1.0, -1.0, 1.0, 0.0, gray());
        let interval = Interval::new(0.001, f32::INFINITY);

        // Parallel above the plane: t is infinite.
        let above = Ray::new_simple(Vec3::new(-5.0, 1.0, 0.0), Vec3::X);
        assert!(rect.hit(&above, interval).is_none());

        // Parallel inside the plane: t is NaN.
        let within = Ray::new_simple(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(rect.hit(&within, interval).is_none());
    }

    #[test]
    fn test_rect_box_is_padded() {
        let rect = AxisRect::xz(213.0, 343.0, 227.0, 332.0, 554.0, gray());
        let bbox = rect.bounding_box(0.0, 1.0).expect("rectangles are finite");

        assert!(bbox.y.min < 554.0 && bbox.y.max > 554.0);
        assert_eq!(bbox.x, Interval::new(213.0, 343.0));
        assert_eq!(bbox.z, Interval::new(227.0, 332.0));
    }

    #[test]
    fn test_xz_light_pdf_matches_solid_angle_formula() {
        let (x0, x1, z0, z1, k) = (213.0, 343.0, 227.0, 332.0, 554.0);
        let light = AxisRect::xz(x0, x1, z0, z1, k, gray());
        let area = (x1 - x0) * (z1 - z0);
        let origin = Vec3::new(278.0, 100.0, 250.0);
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..100 {
            let direction = light.random(origin, &mut rng);
            let rec = light
                .hit(&Ray::new_simple(origin, direction), Interval::new(0.001, f32::INFINITY))
                .expect("sampled toward the light");
            let cosine = (direction.dot(rec.normal) / direction.length()).abs();
            let expected = rec.t * rec.t * direction.length_squared() / (cosine * area);

            assert_eq!(light.pdf_value(origin, direction), expected);
        }
    }

    #[test]
    fn test_xz_light_pdf_zero_on_miss() {
        let light = AxisRect::xz(213.0, 343.0, 227.0, 332.0, 554.0, gray());
        let origin = Vec3::new(278.0, 100.0, 250.0);

        assert_eq!(light.pdf_value(origin, -Vec3::Y), 0.0);
        assert_eq!(light.pdf_value(origin, Vec3::new(1.0, 0.1, 0.0)), 0.0);
    }

    #[test]
    fn test_rect_random_lands_on_rect() {
        let light = AxisRect::xz(-1.0, 1.0, 2.0, 3.0, 4.0, gray());
        let origin = Vec3::new(0.5, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let q = origin + light.random(origin, &mut rng);
            assert!((q.y - 4.0).abs() < 1e-5);
            assert!((-1.0..=1.0).contains(&q.x));
            assert!((2.0..=3.0).contains(&q.z));
        }
    }
}
