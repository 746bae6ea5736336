//! Instancing wrappers: translation, rotation about Y and normal flipping.
//!
//! Each wrapper owns its child and moves the incoming ray into the child's
//! local frame rather than transforming the geometry.

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use rand::RngCore;
use umbra_math::{Aabb, Interval, Vec3};

/// Child shifted by a fixed offset.
pub struct Translate<H: Hittable> {
    object: H,
    offset: Vec3,
}

impl<H: Hittable> Translate<H> {
    pub fn new(object: H, offset: Vec3) -> Self {
        Self { object, offset }
    }
}

impl<H: Hittable> Hittable for Translate<H> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let moved = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());
        let mut rec = self.object.hit(&moved, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin - self.offset, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin - self.offset, rng)
    }
}

/// Child rotated about the world Y axis.
pub struct RotateY<H: Hittable> {
    object: H,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Option<Aabb>,
}

impl<H: Hittable> RotateY<H> {
    /// Rotate `object` by `degrees` (counter-clockwise looking down -Y).
    ///
    /// The box is computed here from the child's box over `[0, 1]`.
    pub fn new(object: H, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        let bbox = object.bounding_box(0.0, 1.0).map(|child| {
            let mut min = Vec3::splat(f32::INFINITY);
            let mut max = Vec3::splat(f32::NEG_INFINITY);
            for corner in child.corners() {
                let rotated = Vec3::new(
                    cos_theta * corner.x + sin_theta * corner.z,
                    corner.y,
                    -sin_theta * corner.x + cos_theta * corner.z,
                );
                min = min.min(rotated);
                max = max.max(rotated);
            }
            Aabb::from_points(min, max)
        });

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox,
        }
    }

    /// World to local.
    #[inline]
    fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// Local to world.
    #[inline]
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl<H: Hittable> Hittable for RotateY<H> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let local = Ray::new(
            self.to_local(ray.origin()),
            self.to_local(ray.direction()),
            ray.time(),
        );
        let mut rec = self.object.hit(&local, ray_t)?;
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        self.bbox
    }
}

/// Child with its reported normal reversed.
///
/// Used to make one-sided emitters and the inner faces of boxes face the
/// other way.
pub struct FlipNormals<H: Hittable> {
    object: H,
}

impl<H: Hittable> FlipNormals<H> {
    pub fn new(object: H) -> Self {
        Self { object }
    }
}

impl<H: Hittable> Hittable for FlipNormals<H> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut rec = self.object.hit(ray, ray_t)?;
        rec.normal = -rec.normal;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object.bounding_box(time0, time1)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AxisRect, Lambertian, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Lambertian {
        Lambertian::from_color(Vec3::splat(0.5))
    }

    fn interval() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_translate_moves_hit_point() {
        let offset = Vec3::new(10.0, 0.0, 0.0);
        let sphere = Translate::new(Sphere::new(Vec3::ZERO, 1.0, gray()), offset);
        let ray = Ray::new_simple(Vec3::new(10.0, 0.0, 5.0), -Vec3::Z);

        let rec = sphere.hit(&ray, interval()).expect("translated sphere is hit");
        assert!((rec.p - Vec3::new(10.0, 0.0, 1.0)).length() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);

        let through_origin = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        assert!(sphere.hit(&through_origin, interval()).is_none());
    }

    #[test]
    fn test_translate_samples_light_from_shifted_origin() {
        let offset = Vec3::new(10.0, 0.0, -3.0);
        let rect = AxisRect::xz(0.0, 2.0, 0.0, 2.0, 5.0, gray());
        let moved = Translate::new(AxisRect::xz(0.0, 2.0, 0.0, 2.0, 5.0, gray()), offset);
        let origin = Vec3::new(11.0, 0.0, -2.0);
        let up = Vec3::Y;

        let expected = rect.pdf_value(origin - offset, up);
        assert!(expected > 0.0);
        assert_eq!(moved.pdf_value(origin, up), expected);
        // The untranslated rect is nowhere near this origin.
        assert_eq!(rect.pdf_value(origin, up), 0.0);

        let mut a = StdRng::seed_from_u64(21);
        let mut b = StdRng::seed_from_u64(21);
        for _ in 0..20 {
            let direction = moved.random(origin, &mut a);
            assert_eq!(direction, rect.random(origin - offset, &mut b));
            let target = origin + direction;
            assert!((target.y - 5.0).abs() < 1e-4);
            assert!((9.999..=12.001).contains(&target.x));
            assert!((-3.001..=-0.999).contains(&target.z));
        }
    }

    #[test]
    fn test_translate_box() {
        let offset = Vec3::new(1.0, 2.0, 3.0);
        let sphere = Translate::new(Sphere::new(Vec3::ZERO, 1.0, gray()), offset);
        let bbox = sphere.bounding_box(0.0, 1.0).expect("finite");
        assert_eq!(bbox.min(), Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(bbox.max(), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // Rect facing +Z at z = -2 ends up facing +X at x = -2.
        let rect = AxisRect::xy(-1.0, 1.0, -1.0, 1.0, -2.0, gray());
        let rotated = RotateY::new(rect, 90.0);
        let ray = Ray::new_simple(Vec3::new(5.0, 0.0, 0.0), -Vec3::X);

        let rec = rotated.hit(&ray, interval()).expect("rotated rect faces the ray");
        assert!((rec.t - 7.0).abs() < 1e-4);
        assert!((rec.p - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-4);
        assert!((rec.normal - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_rotate_y_box_contains_rotated_geometry() {
        let sphere = Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0, gray());
        let rotated = RotateY::new(sphere, 45.0);
        let bbox = rotated.bounding_box(0.0, 1.0).expect("child has a box");

        let center = rotated.to_world(Vec3::new(3.0, 0.0, 0.0));
        let tight = Aabb::from_points(center - Vec3::splat(0.99), center + Vec3::splat(0.99));
        assert!(bbox.contains_box(&tight));
    }

    #[test]
    fn test_rotate_y_round_trips_points() {
        let rect = AxisRect::xy(0.0, 1.0, 0.0, 1.0, 0.0, gray());
        let rotated = RotateY::new(rect, 30.0);
        let p = Vec3::new(1.5, -2.0, 0.25);
        assert!((rotated.to_world(rotated.to_local(p)) - p).length() < 1e-5);
    }

    #[test]
    fn test_flip_normals_negates_normal() {
        let rect = AxisRect::xz(-1.0, 1.0, -1.0, 1.0, 2.0, gray());
        let flipped = FlipNormals::new(AxisRect::xz(-1.0, 1.0, -1.0, 1.0, 2.0, gray()));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);

        let plain = rect.hit(&ray, interval()).expect("hit");
        let rec = flipped.hit(&ray, interval()).expect("hit");
        assert_eq!(rec.normal, -plain.normal);
        assert_eq!(rec.t, plain.t);
        assert_eq!(flipped.pdf_value(Vec3::ZERO, Vec3::Y), rect.pdf_value(Vec3::ZERO, Vec3::Y));
    }
}
