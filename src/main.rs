use log::*;

use csp_rays::types::*;
use csp_rays::{
    ensquared_energy, histogram_image, plane_intersect, trace_scene_parallel, FlatMirror,
    LightSourceSun, MirrorAssembly, RayTraceable, Resolution, Scene, TraceOptions,
};

fn main() -> Result<(), failure::Error> {
    simple_logger::init_with_level(Level::Info)?;
    info!("starting");

    // a 3 x 3 array of facets, tilted slightly toward a receiver above the middle
    let target = Point3f::new(0.0, 0.0, 20.0);
    let sun_direction = Vector3f::new(0.0, 0.3, -1.0).normalize();
    let mut facets: Vec<Box<dyn RayTraceable>> = Vec::new();
    for i in -1..=1 {
        for j in -1..=1 {
            let center = Point3f::new(f64::from(i) * 1.2, f64::from(j) * 1.2, 0.0);
            let to_target = (target - center).normalize();
            let normal = to_target - sun_direction;
            facets.push(Box::new(FlatMirror::new(center, normal, 1.0, 1.0)));
        }
    }

    let mut scene = Scene::new();
    scene
        .add_light_source(LightSourceSun::with_spread(sun_direction, 0.004_65, 16, 0))
        .add_object(MirrorAssembly::new(facets));

    let opts = TraceOptions { verbose: true, ..Default::default() };
    let trace = trace_scene_parallel(&scene, Resolution::PixelX(20), 8, &opts)?;
    info!("traced {} rays", trace.ray_count());

    let points = plane_intersect(&trace, target, -Vector3f::unit_z(), 1e-6);
    let flux = histogram_image(0.05, 4.0, &points)?;
    let (fracs, widths) = ensquared_energy(&points, 2.0, 21);
    for (f, w) in fracs.iter().zip(widths.iter()) {
        info!("half-width {:.2}: {:.1}% ensquared", w, f * 100.0);
    }

    flux.to_image().save("flux.png")?;
    info!("done");
    Ok(())
}
