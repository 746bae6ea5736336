//! Hittable trait and HitRecord for ray-object intersection.

use crate::{sampling::gen_f32, Material, Ray};
use rand::RngCore;
use std::sync::Arc;
use umbra_math::{Aabb, Interval, Vec3};

/// Record of a ray-object intersection.
///
/// Produced fresh by every successful hit test and returned by value.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal as reported by the primitive (outward unless flipped)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Closest intersection of `ray` with this object inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Box enclosing the object for every time in [time0, time1].
    ///
    /// `None` means the object has no finite extent.
    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb>;

    /// Solid-angle density of sampling `direction` from `origin` toward this
    /// object. Objects that are never light targets keep the default.
    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    /// Random direction from `origin` toward this object.
    fn random(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }
}

impl<T: Hittable + ?Sized> Hittable for Arc<T> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        (**self).hit(ray, ray_t)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        (**self).bounding_box(time0, time1)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        (**self).pdf_value(origin, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        (**self).random(origin, rng)
    }
}

/// A flat, ordered list of hittable objects.
///
/// Brute-force traversal; also the input to BVH construction and the usual
/// container for light-sampling targets.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add a shared object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Add an owned object to the list.
    pub fn push<H: Hittable + 'static>(&mut self, object: H) {
        self.objects.push(Arc::new(object));
    }

    pub fn into_objects(self) -> Vec<Arc<dyn Hittable>> {
        self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl From<Vec<Arc<dyn Hittable>>> for HittableList {
    fn from(objects: Vec<Arc<dyn Hittable>>) -> Self {
        Self { objects }
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            let t_max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, ray_t.with_max(t_max)) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let (first, rest) = self.objects.split_first()?;
        let mut bbox = first.bounding_box(time0, time1)?;
        for object in rest {
            bbox = Aabb::surrounding(&bbox, &object.bounding_box(time0, time1)?);
        }
        Some(bbox)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let weight = 1.0 / self.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.is_empty() {
            return Vec3::X;
        }
        let n = self.len();
        let index = ((gen_f32(rng) * n as f32) as usize).min(n - 1);
        self.objects[index].random(origin, rng)
    }
}
