//! Renderable scene: geometry, light-sampling targets and camera.

use crate::{Camera, Hittable};
use std::sync::Arc;

/// Everything the integrator needs for one image.
///
/// `lights` holds the objects that diffuse bounces sample directly. It is
/// usually a [`crate::HittableList`] of the emitters plus any glass that
/// benefits from explicit sampling. When absent, bounces follow the
/// material distribution alone.
#[derive(Clone)]
pub struct Scene {
    pub world: Arc<dyn Hittable>,
    pub lights: Option<Arc<dyn Hittable>>,
    pub camera: Camera,
}

impl Scene {
    pub fn new(world: Arc<dyn Hittable>, camera: Camera) -> Self {
        Self {
            world,
            lights: None,
            camera,
        }
    }

    pub fn with_lights(mut self, lights: Arc<dyn Hittable>) -> Self {
        self.lights = Some(lights);
        self
    }

    pub fn lights(&self) -> Option<&dyn Hittable> {
        self.lights.as_deref()
    }
}
