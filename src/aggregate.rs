use crate::prims::*;
use crate::types::*;

/// A composite optic, e.g. a heliostat made of several facets.
pub struct MirrorAssembly {
    pub parts: Vec<Box<dyn RayTraceable>>,
}

impl MirrorAssembly {
    pub fn new(parts: Vec<Box<dyn RayTraceable>>) -> Self {
        MirrorAssembly { parts }
    }
}

impl RayTraceable for MirrorAssembly {
    fn survey_of_points(&self, resolution: Resolution) -> Vec<(Point3f, Unit3f)> {
        self.parts.iter().flat_map(|p| p.survey_of_points(resolution)).collect()
    }

    fn most_basic_ray_tracable_objects(&self) -> Vec<&dyn RayTraceable> {
        self.parts.iter().flat_map(|p| p.most_basic_ray_tracable_objects()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::FlatMirror;

    fn facet(x: Float) -> Box<dyn RayTraceable> {
        Box::new(FlatMirror::new(Point3f::new(x, 0.0, 0.0), Vector3f::unit_z(), 1.0, 1.0))
    }

    #[test]
    fn nested_assemblies_decompose_into_leaves() {
        let inner = MirrorAssembly::new(vec![facet(0.0), facet(1.0)]);
        let inner: Box<dyn RayTraceable> = Box::new(inner);
        let outer = MirrorAssembly::new(vec![inner, facet(2.0)]);
        assert_eq!(outer.most_basic_ray_tracable_objects().len(), 3);
        assert_eq!(outer.survey_of_points(Resolution::PixelX(2)).len(), 12);
    }
}
