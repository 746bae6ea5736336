//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation with a bounded depth
//! - Importance sampling toward designated lights
//! - Per-sample NaN and negative-value suppression
//! - Gamma correction

use crate::{
    bucket::{generate_buckets, render_bucket, BucketResult},
    error::{RenderError, RenderResult},
    pdf::Pdf,
    sampling::gen_f32,
    Color, Hittable, Ray, Scene,
};
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use umbra_math::Interval;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed; each bucket derives its own stream from it
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
            bucket_size: 32,
        }
    }
}

impl RenderConfig {
    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidConfig(
                "bucket_size must be non-zero".to_string(),
            ));
        }
        if self.samples_per_pixel == 0 {
            log::warn!("samples_per_pixel is 0; every pixel will be black");
        }
        if self.max_depth == 0 {
            log::warn!("max_depth is 0; only directly visible emission will be rendered");
        }
        Ok(())
    }
}

/// Compute the radiance carried back along a ray.
///
/// `depth` counts bounces taken so far. At `config.max_depth` only the
/// emission of the surface hit is returned. Diffuse bounces sample an equal
/// mixture of `lights` and the material's own distribution, or the material
/// distribution alone when `lights` is `None`.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(rec) = world.hit(ray, Interval::new(0.001, f32::INFINITY)) else {
        return Color::ZERO;
    };

    let emitted = rec.material.emitted(ray, &rec, rec.u, rec.v, rec.p);
    if depth >= config.max_depth {
        return emitted;
    }

    let Some(srec) = rec.material.scatter(ray, &rec, rng) else {
        return emitted;
    };

    if let Some(specular) = srec.specular_ray {
        return srec.attenuation * ray_color(&specular, world, lights, depth + 1, config, rng);
    }

    let pdf = match lights {
        Some(target) => Pdf::mixture(Pdf::toward(target, rec.p), srec.pdf),
        None => srec.pdf,
    };
    let scattered = Ray::new(rec.p, pdf.generate(rng), ray.time());
    let pdf_value = pdf.value(scattered.direction());
    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);

    let incoming = ray_color(&scattered, world, lights, depth + 1, config, rng);
    (emitted + srec.attenuation * scattering_pdf * incoming) / pdf_value
}

/// Zero out any channel that is negative or not finite.
#[inline]
pub fn de_nan(color: Color) -> Color {
    let clean = |c: f32| if c.is_finite() && c >= 0.0 { c } else { 0.0 };
    Color::new(clean(color.x), clean(color.y), clean(color.z))
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (255.99 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// `(x, y)` are image coordinates with row 0 at the top. Returns the mean
/// linear color of `config.samples_per_pixel` sanitised samples.
pub fn render_pixel(
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if config.samples_per_pixel == 0 {
        return Color::ZERO;
    }

    let row_from_bottom = (config.height - 1 - y) as f32;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / config.width as f32;
        let t = (row_from_bottom + gen_f32(rng)) / config.height as f32;
        let ray = scene.camera.get_ray(s, t, rng);
        pixel_color += de_nan(ray_color(
            &ray,
            scene.world.as_ref(),
            scene.lights(),
            0,
            config,
            rng,
        ));
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Linear-color image, row 0 at the top.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Gamma-corrected RGB bytes, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb(*c)).collect()
    }

    /// Write as plain-text PPM (P3).
    pub fn write_ppm<W: Write>(&self, mut out: W) -> RenderResult<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;
        for color in &self.pixels {
            let [r, g, b] = color_to_rgb(*color);
            writeln!(out, "{} {} {}", r, g, b)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Save to `path`, choosing the encoding from the extension (`png` or `ppm`).
    pub fn save(&self, path: &Path) -> RenderResult<()> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "png" => {
                image::save_buffer_with_format(
                    path,
                    &self.to_rgb8(),
                    self.width,
                    self.height,
                    image::ColorType::Rgb8,
                    image::ImageFormat::Png,
                )?;
            }
            "ppm" => {
                let file = File::create(path)?;
                self.write_ppm(BufWriter::new(file))?;
            }
            other => return Err(RenderError::UnsupportedFormat(other.to_string())),
        }

        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Render the entire scene to an image buffer.
///
/// Buckets are rendered in parallel; each one seeds its own generator from
/// `config.seed` and its position, so the result does not depend on the
/// number of worker threads.
pub fn render(scene: &Scene, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    config.validate()?;

    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    let total = buckets.len();
    log::info!(
        "Rendering {}x{} at {} spp, max depth {}, {} buckets",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        total
    );

    let start = Instant::now();
    let completed = AtomicUsize::new(0);

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, scene, config);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!(
                "Bucket {} at ({}, {}) done [{}/{}]",
                bucket.index,
                bucket.x,
                bucket.y,
                done,
                total
            );
            result
        })
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Camera, DiffuseLight, HittableList, Lambertian, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 8,
            height: 6,
            samples_per_pixel: 4,
            max_depth: 5,
            seed: 3,
            bucket_size: 4,
        }
    }

    fn lit_scene(config: &RenderConfig) -> Scene {
        let mut world = HittableList::new();
        world.push(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Lambertian::from_color(Vec3::splat(0.5)),
        ));
        let light = Arc::new(Sphere::new(
            Vec3::new(0.0, 2.0, -1.0),
            0.5,
            DiffuseLight::from_color(Vec3::splat(4.0)),
        ));
        world.add(light.clone());

        let mut camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_aspect(config.aspect());
        camera.initialize();

        Scene::new(Arc::new(world), camera).with_lights(light)
    }

    #[test]
    fn test_config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.width, 400);
        assert_eq!(config.height, 400);
        assert_eq!(config.samples_per_pixel, 100);
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.bucket_size, 32);
    }

    #[test]
    fn test_config_validation() {
        let mut config = RenderConfig::default();
        assert!(config.validate().is_ok());

        config.width = 0;
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));

        config.width = 10;
        config.bucket_size = 0;
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_de_nan() {
        let cleaned = de_nan(Color::new(f32::NAN, -1.0, f32::INFINITY));
        assert_eq!(cleaned, Color::ZERO);
        assert_eq!(de_nan(Color::new(0.5, 2.0, 0.0)), Color::new(0.5, 2.0, 0.0));
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::splat(7.0)), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(0.25, 0.0, 0.0)), [127, 0, 0]);
    }

    #[test]
    fn test_render_pixel_averages_direct_emission() {
        let config = small_config();
        let emitter = Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            2.5,
            DiffuseLight::from_color(Vec3::splat(4.0)),
        );
        let mut camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_aspect(config.aspect());
        camera.initialize();
        let scene = Scene::new(Arc::new(emitter), camera);
        let mut rng = StdRng::seed_from_u64(42);

        let color = render_pixel(&scene, 4, 3, &config, &mut rng);
        assert_eq!(color, Vec3::splat(4.0));
    }

    #[test]
    fn test_render_pixel_zero_samples_is_black() {
        let config = RenderConfig {
            samples_per_pixel: 0,
            ..small_config()
        };
        let scene = lit_scene(&config);
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(render_pixel(&scene, 0, 0, &config, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_render_is_deterministic_for_a_seed() {
        let config = small_config();
        let scene = lit_scene(&config);

        let first = render(&scene, &config).expect("valid config");
        let second = render(&scene, &config).expect("valid config");
        assert_eq!(first.pixels, second.pixels);
        assert_eq!(first.pixels.len(), 48);
    }

    #[test]
    fn test_write_ppm_header_and_rows() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(1, 0, Color::ONE);

        let mut out = Vec::new();
        image.write_ppm(&mut out).expect("writing to memory");
        let text = String::from_utf8(out).expect("ascii output");
        assert_eq!(text, "P3\n2 1\n255\n0 0 0\n255 255 255\n");
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let image = ImageBuffer::new(1, 1);
        let result = image.save(Path::new("out.bmp"));
        assert!(matches!(result, Err(RenderError::UnsupportedFormat(ext)) if ext == "bmp"));
    }
}
