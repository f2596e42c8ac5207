use std::ops::Add;
use std::path::PathBuf;

use crate::ensemble::*;
use crate::error::*;
use crate::geom::*;
use crate::light::*;
use crate::prims::*;
use crate::scene::*;
use crate::store::*;

/// The result of tracing a scene: the light sources and optics that were traced, and the paths
/// that came off them.
pub struct RayTrace<'s> {
    pub light_sources: Vec<&'s dyn LightSource>,
    pub objects: Vec<&'s dyn RayTraceable>,
    pub light_paths_ensemble: LightPathEnsemble,
    /// Store the trace was persisted to, if any.
    pub save_file_location: Option<PathBuf>,
}

impl<'s> RayTrace<'s> {
    pub fn new(scene: &'s Scene) -> Self {
        RayTrace {
            light_sources: scene.light_source_refs(),
            objects: scene.object_refs(),
            light_paths_ensemble: LightPathEnsemble::new(),
            save_file_location: None,
        }
    }

    /// A trace with no scene attached.
    pub fn empty() -> Self {
        RayTrace {
            light_sources: Vec::new(),
            objects: Vec::new(),
            light_paths_ensemble: LightPathEnsemble::new(),
            save_file_location: None,
        }
    }

    /// Reloads every batch of `trace_name` from `store`.
    pub fn from_store(store: &TraceStore, trace_name: &str) -> Result<Self> {
        let mut trace = RayTrace::empty();
        trace.light_paths_ensemble = store.load(trace_name)?;
        trace.save_file_location = Some(store.root().to_path_buf());
        Ok(trace)
    }

    pub fn ray_count(&self) -> usize {
        self.light_paths_ensemble.len()
    }

    pub fn light_paths(&self) -> Vec<LightPath> {
        self.light_paths_ensemble.to_light_paths()
    }

    pub fn add_many_light_paths(&mut self, paths: Vec<LightPath>) -> Result<()> {
        self.light_paths_ensemble.concatenate_in_place(LightPathEnsemble::from_paths(paths)?)
    }
}

/// Union of two traces. Light sources and objects of both are kept, duplicates included.
/// Fails when the two traces record a different number of steps per path.
impl<'s> Add for RayTrace<'s> {
    type Output = Result<RayTrace<'s>>;
    fn add(mut self, other: RayTrace<'s>) -> Result<RayTrace<'s>> {
        self.light_paths_ensemble.concatenate_in_place(other.light_paths_ensemble)?;
        self.light_sources.extend(other.light_sources);
        self.objects.extend(other.objects);
        self.save_file_location = None;
        Ok(self)
    }
}
