//! Sampling distributions used for importance sampling.
//!
//! Each variant can both draw a direction and report the density of any
//! direction, which is what the integrator needs to weight its estimate.

use crate::{
    hittable::Hittable,
    sampling::{gen_f32, random_cosine_direction},
};
use rand::RngCore;
use std::f32::consts::PI;
use umbra_math::{Onb, Vec3};

/// Cosine-weighted hemisphere about a surface normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(normal: Vec3) -> Self {
        Self {
            uvw: Onb::from_w(normal),
        }
    }

    pub fn value(&self, direction: Vec3) -> f32 {
        let cosine = direction.normalize().dot(self.uvw.w());
        if cosine > 0.0 {
            cosine / PI
        } else {
            0.0
        }
    }

    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local(random_cosine_direction(rng))
    }
}

/// Directions from a fixed origin toward a target object.
#[derive(Clone, Copy)]
pub struct HittablePdf<'a> {
    origin: Vec3,
    target: &'a dyn Hittable,
}

impl<'a> HittablePdf<'a> {
    pub fn new(target: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { origin, target }
    }

    pub fn value(&self, direction: Vec3) -> f32 {
        self.target.pdf_value(self.origin, direction)
    }

    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.target.random(self.origin, rng)
    }
}

/// Equal-weight mixture of two distributions.
pub struct MixturePdf<'a> {
    first: Box<Pdf<'a>>,
    second: Box<Pdf<'a>>,
}

impl<'a> MixturePdf<'a> {
    pub fn new(first: Pdf<'a>, second: Pdf<'a>) -> Self {
        Self {
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    pub fn value(&self, direction: Vec3) -> f32 {
        0.5 * self.first.value(direction) + 0.5 * self.second.value(direction)
    }

    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < 0.5 {
            self.first.generate(rng)
        } else {
            self.second.generate(rng)
        }
    }
}

/// Closed set of sampling strategies.
pub enum Pdf<'a> {
    Cosine(CosinePdf),
    Hittable(HittablePdf<'a>),
    Mixture(MixturePdf<'a>),
    /// Placeholder for specular scattering, where no density applies.
    None,
}

impl<'a> Pdf<'a> {
    pub fn cosine(normal: Vec3) -> Self {
        Pdf::Cosine(CosinePdf::new(normal))
    }

    pub fn toward(target: &'a dyn Hittable, origin: Vec3) -> Self {
        Pdf::Hittable(HittablePdf::new(target, origin))
    }

    pub fn mixture(first: Pdf<'a>, second: Pdf<'a>) -> Self {
        Pdf::Mixture(MixturePdf::new(first, second))
    }

    /// Density of `direction` under this distribution.
    pub fn value(&self, direction: Vec3) -> f32 {
        match self {
            Pdf::Cosine(pdf) => pdf.value(direction),
            Pdf::Hittable(pdf) => pdf.value(direction),
            Pdf::Mixture(pdf) => pdf.value(direction),
            Pdf::None => 0.0,
        }
    }

    /// Draw a direction from this distribution.
    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            Pdf::Cosine(pdf) => pdf.generate(rng),
            Pdf::Hittable(pdf) => pdf.generate(rng),
            Pdf::Mixture(pdf) => pdf.generate(rng),
            Pdf::None => Vec3::ZERO,
        }
    }
}
