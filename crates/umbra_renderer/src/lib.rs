//! Umbra renderer - CPU Monte Carlo path tracing
//!
//! A path tracer with importance sampling toward designated lights. Scenes
//! are built from shared, immutable primitives behind a bounding volume
//! hierarchy and rendered in parallel buckets.

mod bucket;
mod bvh;
mod camera;
mod cuboid;
mod error;
mod hittable;
mod material;
mod pdf;
mod rect;
mod renderer;
pub mod sampling;
mod scene;
mod sphere;
mod texture;
mod transform;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use cuboid::Cuboid;
pub use error::{BuildError, RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    reflect, refract, schlick, Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material,
    Metal, ScatterRecord,
};
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf};
pub use rect::{AxisRect, Plane};
pub use renderer::{
    color_to_rgb, de_nan, linear_to_gamma, ray_color, render, render_pixel, ImageBuffer,
    RenderConfig,
};
pub use scene::Scene;
pub use sphere::{MovingSphere, Sphere};
pub use texture::{Checker, SolidColor, Texture};
pub use transform::{FlipNormals, RotateY, Translate};

/// Re-export Vec3 and common math types from umbra_math
pub use umbra_math::{Aabb, Interval, Onb, Ray, Vec3};
