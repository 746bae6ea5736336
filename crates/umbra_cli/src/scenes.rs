//! Built-in scenes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use umbra_renderer::{
    AxisRect, BuildError, BvhNode, Camera, Checker, Color, Cuboid, Dielectric, DiffuseLight,
    FlipNormals, Hittable, HittableList, Lambertian, Metal, MovingSphere, RenderConfig, RotateY,
    Scene, Sphere, Translate, Vec3,
};

use crate::cli::SceneKind;

const SHUTTER: (f32, f32) = (0.0, 1.0);

/// Build the selected scene for `config`.
pub fn build(kind: SceneKind, config: &RenderConfig) -> Result<Scene, BuildError> {
    // Scene layout draws from its own stream so it does not shift with sampling.
    let mut rng = StdRng::seed_from_u64(config.seed);
    match kind {
        SceneKind::Cornell => cornell(config, &mut rng),
        SceneKind::Motion => motion(config, &mut rng),
    }
}

/// The classic box: coloured side walls, an overhead light, a glass sphere
/// and a tall block turned 15 degrees.
pub fn cornell(config: &RenderConfig, rng: &mut StdRng) -> Result<Scene, BuildError> {
    let red = Lambertian::from_color(Color::new(0.65, 0.05, 0.05));
    let white = Lambertian::from_color(Color::splat(0.73));
    let green = Lambertian::from_color(Color::new(0.12, 0.45, 0.15));
    let light = DiffuseLight::from_color(Color::splat(15.0));
    let glass = Dielectric::new(1.5);

    let mut objects = HittableList::new();
    objects.push(FlipNormals::new(AxisRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green)));
    objects.push(AxisRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red));
    objects.push(FlipNormals::new(AxisRect::xz(
        213.0,
        343.0,
        227.0,
        332.0,
        554.0,
        light.clone(),
    )));
    objects.push(FlipNormals::new(AxisRect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white.clone())));
    objects.push(AxisRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone()));
    objects.push(FlipNormals::new(AxisRect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white.clone())));
    objects.push(Sphere::new(Vec3::new(190.0, 90.0, 190.0), 90.0, glass.clone()));
    objects.push(Translate::new(
        RotateY::new(Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white), 15.0),
        Vec3::new(265.0, 0.0, 295.0),
    ));

    let mut lights = HittableList::new();
    lights.push(AxisRect::xz(213.0, 343.0, 227.0, 332.0, 554.0, light));
    lights.push(Sphere::new(Vec3::new(190.0, 90.0, 190.0), 90.0, glass));

    let mut camera = Camera::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_aspect(config.aspect())
        .with_shutter(SHUTTER.0, SHUTTER.1);
    camera.initialize();

    let (time0, time1) = camera.shutter();
    let world = BvhNode::from_list(objects, time0, time1, rng)?;
    Ok(Scene::new(Arc::new(world), camera).with_lights(Arc::new(lights)))
}

/// Spheres on a checkered plane, some moving during the shutter interval,
/// lit by one bright sphere.
pub fn motion(config: &RenderConfig, rng: &mut StdRng) -> Result<Scene, BuildError> {
    let mut objects = HittableList::new();

    let checker = Checker::from_colors(Color::new(0.2, 0.3, 0.1), Color::splat(0.9));
    objects.push(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(Arc::new(checker)),
    ));

    for a in -6..6 {
        for b in -6..6 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choice = rng.gen::<f32>();
            if choice < 0.7 {
                let albedo = Color::new(rng.gen(), rng.gen(), rng.gen())
                    * Color::new(rng.gen(), rng.gen(), rng.gen());
                let lift = Vec3::new(0.0, 0.5 * rng.gen::<f32>(), 0.0);
                objects.push(MovingSphere::new(
                    center,
                    center + lift,
                    SHUTTER.0,
                    SHUTTER.1,
                    0.2,
                    Lambertian::from_color(albedo),
                ));
            } else if choice < 0.9 {
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                objects.push(Sphere::new(
                    center,
                    0.2,
                    Metal::new(albedo, rng.gen_range(0.0..0.5)),
                ));
            } else {
                objects.push(Sphere::new(center, 0.2, Dielectric::new(1.5)));
            }
        }
    }

    // Hollow glass: a negative inner radius flips the inner surface's normal.
    objects.push(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Dielectric::new(1.5)));
    objects.push(Sphere::new(Vec3::new(0.0, 1.0, 0.0), -0.9, Dielectric::new(1.5)));
    objects.push(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::from_color(Color::new(0.4, 0.2, 0.1)),
    ));
    objects.push(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    ));

    let lamp: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(0.0, 7.0, 0.0),
        2.0,
        DiffuseLight::from_color(Color::splat(4.0)),
    ));
    objects.add(Arc::clone(&lamp));

    let mut camera = Camera::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0)
        .with_aspect(config.aspect())
        .with_shutter(SHUTTER.0, SHUTTER.1);
    camera.initialize();

    let (time0, time1) = camera.shutter();
    let world = BvhNode::from_list(objects, time0, time1, rng)?;
    Ok(Scene::new(Arc::new(world), camera).with_lights(lamp))
}
