//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared primitives, built once before rendering and
//! read-only afterwards. Each node caches the union of its children's boxes.

use crate::{
    error::BuildError,
    hittable::{HitRecord, Hittable, HittableList},
    Ray,
};
use rand::{Rng, RngCore};
use std::sync::Arc;
use umbra_math::{Aabb, Interval};

/// Interior node of the hierarchy.
///
/// A node built over a single primitive holds that same `Arc` in both
/// children.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

/// A primitive paired with its box over the build time range.
type Entry = (Arc<dyn Hittable>, Aabb);

impl BvhNode {
    /// Build a hierarchy over `objects` for the shutter interval `[time0, time1]`.
    ///
    /// Every object must report a bounding box over that interval.
    pub fn new(
        objects: Vec<Arc<dyn Hittable>>,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BuildError> {
        if objects.is_empty() {
            return Err(BuildError::EmptyList);
        }

        let count = objects.len();
        let entries = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| -> Result<Entry, BuildError> {
                let bbox = object
                    .bounding_box(time0, time1)
                    .ok_or(BuildError::MissingBoundingBox { index, time0, time1 })?;
                Ok((object, bbox))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let node = Self::build(entries, rng);
        log::debug!(
            "Built BVH over {} primitives, bounds {:?}..{:?}",
            count,
            node.bbox.min(),
            node.bbox.max()
        );
        Ok(node)
    }

    /// Build a hierarchy over the members of a list.
    pub fn from_list(
        list: HittableList,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BuildError> {
        Self::new(list.into_objects(), time0, time1, rng)
    }

    /// Recursive construction.
    ///
    /// Sorts along a random axis by box minimum and splits at the midpoint.
    fn build(mut entries: Vec<Entry>, rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3usize);
        entries.sort_unstable_by(|(_, a), (_, b)| {
            a.axis_interval(axis)
                .min
                .total_cmp(&b.axis_interval(axis).min)
        });

        let ((left, left_box), (right, right_box)) = match entries.len() {
            1 => {
                let (object, bbox) = entries.swap_remove(0);
                ((Arc::clone(&object), bbox), (object, bbox))
            }
            2 => {
                let second = entries.swap_remove(1);
                let first = entries.swap_remove(0);
                (first, second)
            }
            n => {
                let upper = entries.split_off(n / 2);
                let left = Self::build(entries, rng);
                let right = Self::build(upper, rng);
                let (left_box, right_box) = (left.bbox, right.bbox);
                (
                    (Arc::new(left) as Arc<dyn Hittable>, left_box),
                    (Arc::new(right) as Arc<dyn Hittable>, right_box),
                )
            }
        };

        BvhNode {
            left,
            right,
            bbox: Aabb::surrounding(&left_box, &right_box),
        }
    }

    pub fn bbox(&self) -> Aabb {
        self.bbox
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let left = self.left.hit(ray, ray_t);
        let right = self.right.hit(ray, ray_t);

        match (left, right) {
            (Some(l), Some(r)) => Some(if l.t < r.t { l } else { r }),
            (l, r) => l.or(r),
        }
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }
}
