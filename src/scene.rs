use crate::light::*;
use crate::prims::*;

/// Light sources and optics to trace. The scene owns its members; tracers only read them.
#[derive(Default)]
pub struct Scene {
    pub light_sources: Vec<Box<dyn LightSource>>,
    pub objects: Vec<Box<dyn RayTraceable>>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn add_light_source<L: LightSource + 'static>(&mut self, light: L) -> &mut Self {
        self.light_sources.push(Box::new(light));
        self
    }

    pub fn add_object<O: RayTraceable + 'static>(&mut self, object: O) -> &mut Self {
        self.objects.push(Box::new(object));
        self
    }

    pub fn light_source_refs(&self) -> Vec<&dyn LightSource> {
        self.light_sources.iter().map(|l| &**l).collect()
    }

    pub fn object_refs(&self) -> Vec<&dyn RayTraceable> {
        self.objects.iter().map(|o| &**o).collect()
    }
}
