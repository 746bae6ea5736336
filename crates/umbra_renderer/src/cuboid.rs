//! Axis-aligned box built from six rectangles.

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    rect::AxisRect,
    transform::FlipNormals,
    Material, Ray,
};
use umbra_math::{Aabb, Interval, Vec3};

/// Closed box between two corners, all faces sharing one material.
///
/// Faces on the minimum side of each axis are flipped so every normal
/// points out of the box.
pub struct Cuboid {
    sides: HittableList,
}

impl Cuboid {
    pub fn new<M: Material + Clone + 'static>(p0: Vec3, p1: Vec3, material: M) -> Self {
        let pmin = p0.min(p1);
        let pmax = p0.max(p1);

        let mut sides = HittableList::new();
        sides.push(AxisRect::xy(pmin.x, pmax.x, pmin.y, pmax.y, pmax.z, material.clone()));
        sides.push(FlipNormals::new(AxisRect::xy(
            pmin.x,
            pmax.x,
            pmin.y,
            pmax.y,
            pmin.z,
            material.clone(),
        )));
        sides.push(AxisRect::xz(pmin.x, pmax.x, pmin.z, pmax.z, pmax.y, material.clone()));
        sides.push(FlipNormals::new(AxisRect::xz(
            pmin.x,
            pmax.x,
            pmin.z,
            pmax.z,
            pmin.y,
            material.clone(),
        )));
        sides.push(AxisRect::yz(pmin.y, pmax.y, pmin.z, pmax.z, pmax.x, material.clone()));
        sides.push(FlipNormals::new(AxisRect::yz(
            pmin.y, pmax.y, pmin.z, pmax.z, pmin.x, material,
        )));

        Self { sides }
    }
}

impl Hittable for Cuboid {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.sides.hit(ray, ray_t)
    }

    /// Union of the face boxes, so edges carry the same padding as the faces.
    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.sides.bounding_box(time0, time1)
    }
}
