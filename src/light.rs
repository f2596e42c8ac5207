use crate::geom::*;
use crate::types::*;
use crate::util;

/// Anything that illuminates the scene.
///
/// The tracers only ever ask one question: which rays arrive at this point? Each returned path
/// carries the incoming direction as its current direction and has no steps yet.
pub trait LightSource: Sync + Send {
    fn get_incident_rays(&self, point: Point3f) -> Vec<LightPath>;
}

/// Collimated light, optionally spread over a small cone to stand in for the solar disk.
#[derive(Clone, Debug)]
pub struct LightSourceSun {
    rays: Vec<Unit3f>,
}

impl LightSourceSun {
    /// Every point receives exactly one ray travelling along `direction`.
    pub fn collimated(direction: Vector3f) -> LightSourceSun {
        LightSourceSun { rays: vec![Unit3f::new(direction)] }
    }

    /// A bundle of `count` directions filling a cone of `half_angle` radians around `direction`.
    ///
    /// The bundle is fixed at construction from `seed`, so every surface point sees the same
    /// directions.
    pub fn with_spread(
        direction: Vector3f, half_angle: Float, count: usize, seed: u64,
    ) -> LightSourceSun {
        let axis = Unit3f::new(direction);
        if count <= 1 || half_angle <= 0.0 {
            return LightSourceSun { rays: vec![axis] };
        }
        let frame = Frame::from_normal(axis);
        let radius = half_angle.tan();
        let rays = util::stratified_samples_in_disk(&mut util::new_rng(seed), count)
            .into_iter()
            .map(|p| Unit3f::new(*axis + frame.u * (p.x * radius) + frame.v * (p.y * radius)))
            .collect();
        LightSourceSun { rays }
    }

    pub fn directions(&self) -> &[Unit3f] {
        &self.rays
    }
}

impl LightSource for LightSourceSun {
    fn get_incident_rays(&self, _point: Point3f) -> Vec<LightPath> {
        self.rays.iter().map(|d| LightPath::new(*d)).collect()
    }
}

/// Isotropic point emitter.
#[derive(Copy, Clone, Debug)]
pub struct LightSourcePoint {
    pub location: Point3f,
}

impl LightSourcePoint {
    pub fn new(location: Point3f) -> Self {
        LightSourcePoint { location }
    }
}

impl LightSource for LightSourcePoint {
    fn get_incident_rays(&self, point: Point3f) -> Vec<LightPath> {
        // a surface point sitting on the emitter has no incoming direction
        Unit3f::try_new(point - self.location).map(LightPath::new).into_iter().collect()
    }
}
