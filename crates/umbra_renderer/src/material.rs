//! Material trait for surface scattering.

use crate::{
    hittable::HitRecord,
    pdf::Pdf,
    sampling::{gen_f32, random_in_unit_sphere},
    texture::{SolidColor, Texture},
    Ray,
};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;
use umbra_math::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Result of a successful scatter.
///
/// Specular records carry the single outgoing ray and no density; diffuse
/// records carry the distribution the integrator samples and weights by.
pub struct ScatterRecord {
    pub attenuation: Color,
    pub pdf: Pdf<'static>,
    pub specular_ray: Option<Ray>,
}

impl ScatterRecord {
    pub fn specular(ray: Ray, attenuation: Color) -> Self {
        Self {
            attenuation,
            pdf: Pdf::None,
            specular_ray: Some(ray),
        }
    }

    pub fn diffuse(attenuation: Color, pdf: Pdf<'static>) -> Self {
        Self {
            attenuation,
            pdf,
            specular_ray: None,
        }
    }

    #[inline]
    pub fn is_specular(&self) -> bool {
        self.specular_ray.is_some()
    }
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray, or `None` if the ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord>;

    /// Light emitted toward `ray_in` at the hit. Most materials emit nothing.
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }

    /// Density of scattering into `scattered`. Only meaningful for
    /// non-specular materials.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }
}

impl<M: Material + ?Sized> Material for Arc<M> {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        (**self).scatter(ray_in, rec, rng)
    }

    fn emitted(&self, ray_in: &Ray, rec: &HitRecord, u: f32, v: f32, p: Vec3) -> Color {
        (**self).emitted(ray_in, rec, u, v, p)
    }

    fn scattering_pdf(&self, ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        (**self).scattering_pdf(ray_in, rec, scattered)
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    /// Lambertian with a constant albedo.
    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let attenuation = self.albedo.value(rec.u, rec.v, rec.p);
        Some(ScatterRecord::diffuse(attenuation, Pdf::cosine(rec.normal)))
    }

    /// Must match `CosinePdf::value` for the same normal.
    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cosine = rec.normal.dot(scattered.direction().normalize());
        cosine.max(0.0) / PI
    }
}

/// Metal (specular) material.
#[derive(Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = if self.fuzz > 0.0 {
            reflected + self.fuzz * random_in_unit_sphere(rng)
        } else {
            reflected
        };
        let scattered = Ray::new(rec.p, direction, ray_in.time());
        Some(ScatterRecord::specular(scattered, self.albedo))
    }
}

/// Dielectric (glass) material.
#[derive(Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let direction = ray_in.direction();
        let d_dot_n = direction.dot(rec.normal);

        // Leaving the medium when travelling along the outward normal.
        let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
            (-rec.normal, self.ior, self.ior * d_dot_n / direction.length())
        } else {
            (rec.normal, 1.0 / self.ior, -d_dot_n / direction.length())
        };

        let out = match refract(direction, outward_normal, ni_over_nt) {
            Some(refracted) if gen_f32(rng) >= schlick(cosine, self.ior) => refracted,
            _ => reflect(direction, rec.normal),
        };

        let scattered = Ray::new(rec.p, out, ray_in.time());
        Some(ScatterRecord::specular(scattered, Color::ONE))
    }
}

/// Diffuse light emitter. Emits only from the side its normal faces.
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }

    pub fn from_color(emit: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(emit)))
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    fn emitted(&self, ray_in: &Ray, rec: &HitRecord, u: f32, v: f32, p: Vec3) -> Color {
        if rec.normal.dot(ray_in.direction()) < 0.0 {
            self.emit.value(u, v, p)
        } else {
            Color::ZERO
        }
    }
}

/// Isotropic phase function for participating media.
///
/// The outgoing direction is drawn exactly from the phase function, so the
/// record is specular in the sense that no density weighting is needed.
#[derive(Clone)]
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let scattered = Ray::new(rec.p, random_in_unit_sphere(rng), ray_in.time());
        let attenuation = self.albedo.value(rec.u, rec.v, rec.p);
        Some(ScatterRecord::specular(scattered, attenuation))
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract `v` through a surface with normal `n` (facing the incoming side).
///
/// Returns `None` on total internal reflection, i.e. when Snell's law has no
/// real solution.
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for reflectance
pub fn schlick(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(material: &'a dyn Material, normal: Vec3) -> HitRecord<'a> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            material,
            u: 0.25,
            v: 0.75,
            t: 1.0,
        }
    }

    #[test]
    fn test_lambertian_scatter_uses_texture_and_cosine_pdf() {
        let mat = Lambertian::from_color(Color::new(0.2, 0.4, 0.6));
        let rec = record(&mat, Vec3::Y);
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(1);

        let srec = mat.scatter(&ray, &rec, &mut rng).expect("lambertian scatters");
        assert!(!srec.is_specular());
        assert_eq!(srec.attenuation, Color::new(0.2, 0.4, 0.6));
        assert!(matches!(srec.pdf, Pdf::Cosine(_)));
    }

    #[test]
    fn test_lambertian_scattering_pdf_matches_cosine_pdf() {
        let mat = Lambertian::from_color(Color::ONE);
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let rec = record(&mat, normal);
        let ray = Ray::new_simple(Vec3::ONE, -Vec3::ONE);
        let pdf = Pdf::cosine(normal);
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..100 {
            let direction = pdf.generate(&mut rng);
            let scattered = Ray::new_simple(rec.p, direction);
            let a = mat.scattering_pdf(&ray, &rec, &scattered);
            let b = pdf.value(direction);
            assert!((a - b).abs() < 1e-5);
        }

        let below = Ray::new_simple(rec.p, -normal);
        assert_eq!(mat.scattering_pdf(&ray, &rec, &below), 0.0);
    }

    #[test]
    fn test_metal_without_fuzz_is_a_mirror() {
        let mat = Metal::new(Color::new(0.8, 0.8, 0.8), 0.0);
        let rec = record(&mat, Vec3::Y);
        let ray = Ray::new_simple(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(0);

        let srec = mat.scatter(&ray, &rec, &mut rng).expect("metal scatters");
        let out = srec.specular_ray.expect("metal is specular");
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((out.direction() - expected).length() < 1e-5);
        assert_eq!(srec.attenuation, Color::new(0.8, 0.8, 0.8));
        assert!(matches!(srec.pdf, Pdf::None));
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let mat = Metal::new(Color::ONE, 3.0);
        assert_eq!(mat.fuzz, 1.0);
    }

    #[test]
    fn test_refract_fails_beyond_critical_angle() {
        // Inside glass heading out at ~72 degrees from the normal.
        let d = Vec3::new(0.95, 0.3, 0.0);
        let toward_incoming = -Vec3::Y;
        assert!(refract(d, toward_incoming, 1.5).is_none());

        // Head-on refracts without bending.
        let straight = refract(Vec3::Y, -Vec3::Y, 1.5).expect("normal incidence refracts");
        assert!((straight.normalize() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_dielectric_total_internal_reflection_reflects() {
        let mat = Dielectric::new(1.5);
        // Outward normal is +Y; the ray travels along it, so it is inside.
        let rec = record(&mat, Vec3::Y);
        let d = Vec3::new(0.95, 0.3, 0.0);
        let ray = Ray::new_simple(Vec3::new(-0.95, -0.3, 0.0), d);
        let mut rng = StdRng::seed_from_u64(6);

        for _ in 0..50 {
            let srec = mat.scatter(&ray, &rec, &mut rng).expect("glass scatters");
            let out = srec.specular_ray.expect("glass is specular");
            assert!((out.direction() - reflect(d, Vec3::Y)).length() < 1e-5);
            assert_eq!(srec.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_dielectric_head_on_mostly_refracts() {
        let mat = Dielectric::new(1.5);
        let rec = record(&mat, Vec3::Y);
        let ray = Ray::new_simple(Vec3::Y, -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(8);

        let refracted = (0..1000)
            .filter_map(|_| mat.scatter(&ray, &rec, &mut rng))
            .filter_map(|srec| srec.specular_ray)
            .filter(|out| out.direction().y < 0.0)
            .count();
        // Schlick reflectance at normal incidence for glass is 4%.
        assert!(refracted > 900, "refracted {}", refracted);
    }

    #[test]
    fn test_schlick_bounds() {
        assert!((schlick(1.0, 1.5) - 0.04).abs() < 1e-6);
        assert!((schlick(0.0, 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_diffuse_light_is_one_sided() {
        let mat = DiffuseLight::from_color(Color::splat(4.0));
        let rec = record(&mat, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(0);

        let from_front = Ray::new_simple(Vec3::Y, -Vec3::Y);
        let from_back = Ray::new_simple(-Vec3::Y, Vec3::Y);
        assert_eq!(mat.emitted(&from_front, &rec, 0.0, 0.0, rec.p), Color::splat(4.0));
        assert_eq!(mat.emitted(&from_back, &rec, 0.0, 0.0, rec.p), Color::ZERO);
        assert!(mat.scatter(&from_front, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_isotropic_scatters_inside_unit_sphere() {
        let mat = Isotropic::from_color(Color::new(0.5, 0.5, 0.5));
        let rec = record(&mat, Vec3::Y);
        let ray = Ray::new(Vec3::Y, -Vec3::Y, 0.25);
        let mut rng = StdRng::seed_from_u64(12);

        let srec = mat.scatter(&ray, &rec, &mut rng).expect("isotropic scatters");
        let out = srec.specular_ray.expect("direction is sampled exactly");
        assert!(out.direction().length_squared() < 1.0);
        assert_eq!(out.time(), 0.25);
        assert_eq!(srec.attenuation, Color::splat(0.5));
    }
}
