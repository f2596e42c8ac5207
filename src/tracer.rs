//! Sequential and parallel tracing of a scene.
//!
//! Both tracers do the same thing per surface sample: collect every incident ray from every
//! light source into one ensemble, reflect the whole ensemble off the sample's normal in one
//! batch, and append the sample point as a new step. The sequential tracer can flush its
//! running ensemble to a store whenever memory use passes a ceiling; the parallel tracer splits
//! the scene into basic objects and traces each on a worker.

use log::*;
use rayon::prelude::*;
use std::thread;
use std::time::{Duration, Instant};

use crate::ensemble::*;
use crate::error::*;
use crate::geom::*;
use crate::light::*;
use crate::memory::*;
use crate::metrics::*;
use crate::options::*;
use crate::prims::*;
use crate::scene::*;
use crate::store::*;
use crate::trace::*;
use crate::types::*;

/// Reflects every ray arriving at `point` off `normal` and records `point` as their next step.
pub fn reflect_at_point(
    point: Point3f, normal: Unit3f, light_sources: &[&dyn LightSource],
) -> Result<LightPathEnsemble> {
    let incoming: Vec<LightPath> =
        light_sources.iter().flat_map(|ls| ls.get_incident_rays(point)).collect();
    let mut lpe = LightPathEnsemble::from_paths(incoming)?;
    let reflected = calc_reflected_ray(normal, lpe.current_directions());
    let points = vec![point; lpe.len()];
    lpe.add_steps(&points, &reflected)?;
    Ok(lpe)
}

/// Percent complete when sample `i` of `n` is a 10% checkpoint.
fn checkpoint(i: usize, n: usize) -> Option<usize> {
    let step = max!((n + 9) / 10, 1);
    iff!(i > 0 && i % step == 0, Some(i * 100 / n), None)
}

/// Numbers the batches one sequential trace writes. The counter lives here, owned by the
/// running trace, and only moves when a batch is actually written.
struct BatchWriter<'a> {
    store: TraceStore,
    trace_name: &'a str,
    next: usize,
}

impl<'a> BatchWriter<'a> {
    fn new(store: TraceStore, trace_name: &'a str) -> Self {
        BatchWriter { store, trace_name, next: 0 }
    }

    fn write(&mut self, ensemble: &LightPathEnsemble) -> Result<String> {
        let key = format!("Batch{:08}", self.next);
        self.store.write_batch(self.trace_name, &key, ensemble)?;
        self.next += 1;
        Ok(key)
    }
}

/// Traces every object of `scene` on the calling thread, probing system memory.
pub fn trace_scene<'s>(
    scene: &'s Scene, resolution: Resolution, opts: &TraceOptions,
) -> Result<RayTrace<'s>> {
    trace_scene_with_probe(scene, resolution, opts, &mut SystemMemory::new())
}

/// `trace_scene` with an explicit memory probe.
///
/// With persistence on, the running ensemble is written out as a new batch and cleared
/// whenever `probe` reports more memory in use than `opts.max_ram_in_use_percent`. The check
/// happens between sample points. Whatever is left at the end is written as a final batch and,
/// with `store_in_ram`, returned in the trace.
pub fn trace_scene_with_probe<'s>(
    scene: &'s Scene, resolution: Resolution, opts: &TraceOptions, probe: &mut dyn MemoryProbe,
) -> Result<RayTrace<'s>> {
    let store = opts.validate(probe)?;
    progress!(opts.verbose, "setting up ray trace of {} objects", scene.objects.len());

    let light_sources = scene.light_source_refs();
    let mut ray_trace = RayTrace::new(scene);
    let mut batches = store.map(|s| BatchWriter::new(s, &opts.trace_name));
    let mut stats = TraceStats::new()?;
    let mut total = LightPathEnsemble::new();

    for (index, obj) in scene.objects.iter().enumerate() {
        let start = Instant::now();
        let survey = obj.survey_of_points(resolution);
        progress!(opts.verbose, "object {}: tracing {} sample points", index, survey.len());

        let mut rays = 0;
        for (i, (p, n)) in survey.iter().enumerate() {
            if let Some(writer) = batches.as_mut() {
                let in_use = probe.used_percent();
                if in_use > opts.max_ram_in_use_percent && !total.is_empty() {
                    let key = writer.write(&total)?;
                    progress!(
                        opts.verbose,
                        "memory at {:.1}%: flushed {} paths as {}",
                        in_use,
                        total.len(),
                        key
                    );
                    total = LightPathEnsemble::new();
                }
            }
            let lpe = reflect_at_point(*p, *n, &light_sources)?;
            rays += lpe.len();
            total.concatenate_in_place(lpe)?;
            if let Some(pct) = checkpoint(i, survey.len()) {
                progress!(opts.verbose, "object {}: {}% through tracing", index, pct);
            }
        }
        stats.record_unit(survey.len(), rays, start.elapsed());
    }

    if let Some(writer) = batches.as_mut() {
        if !total.is_empty() {
            let key = writer.write(&total)?;
            progress!(opts.verbose, "saved final batch {} ({} paths)", key, total.len());
        }
        ray_trace.save_file_location = opts.save_name.clone();
    }
    if opts.store_in_ram {
        ray_trace.light_paths_ensemble = total;
    }
    progress!(opts.verbose, "trace finished\n{}", stats.report(&opts.trace_name));
    Ok(ray_trace)
}

/// One unit of parallel work: a basic object and everything needed to trace it. Nothing in a
/// task is mutated while it runs.
pub struct TraceTask<'s> {
    pub id: usize,
    pub object: &'s dyn RayTraceable,
    pub light_sources: &'s [&'s dyn LightSource],
    pub resolution: Resolution,
    pub verbose: bool,
}

/// What a worker hands back for one task.
pub struct TraceOutcome {
    pub id: usize,
    pub ensemble: LightPathEnsemble,
    pub points: usize,
    pub elapsed: Duration,
}

/// Traces a single basic object.
pub fn trace_object(task: &TraceTask) -> Result<TraceOutcome> {
    let start = Instant::now();
    let survey = task.object.survey_of_points(task.resolution);
    progress!(task.verbose, "unit {:03}: tracing {} sample points", task.id, survey.len());

    let mut ensemble = LightPathEnsemble::new();
    for (p, n) in survey.iter() {
        ensemble.concatenate_in_place(reflect_at_point(*p, *n, task.light_sources)?)?;
    }
    progress!(task.verbose, "unit {:03}: finished with {} paths", task.id, ensemble.len());
    Ok(TraceOutcome { id: task.id, ensemble, points: survey.len(), elapsed: start.elapsed() })
}

/// Requested worker count limited to the processing units this machine has.
pub fn clamp_workers(requested: usize) -> usize {
    let available = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    if requested > available {
        warn!(
            "{} workers were requested but only {} processing units are available; using {}",
            requested, available, available
        );
    } else if requested == 0 {
        warn!("0 workers were requested; using 1");
    }
    max!(min!(requested, available), 1)
}

/// Traces `scene` on a pool of `worker_count` workers (clamped to the available processing
/// units), probing system memory for the up-front ceiling check.
pub fn trace_scene_parallel<'s>(
    scene: &'s Scene, resolution: Resolution, worker_count: usize, opts: &TraceOptions,
) -> Result<RayTrace<'s>> {
    let mut probe = SystemMemory::new();
    trace_scene_parallel_with_probe(scene, resolution, worker_count, opts, &mut probe)
}

/// `trace_scene_parallel` with an explicit memory probe.
///
/// Every object is split into its basic objects and each becomes one task. The call blocks until
/// all tasks finish. With persistence on, each task's ensemble is written as batch
/// `Batch_<task>_000`. Memory is only checked before the trace starts.
pub fn trace_scene_parallel_with_probe<'s>(
    scene: &'s Scene, resolution: Resolution, worker_count: usize, opts: &TraceOptions,
    probe: &mut dyn MemoryProbe,
) -> Result<RayTrace<'s>> {
    let store = opts.validate(probe)?;
    let workers = clamp_workers(worker_count);
    progress!(opts.verbose, "setting up parallel ray trace on {} workers", workers);

    let light_sources = scene.light_source_refs();
    let basic: Vec<&dyn RayTraceable> =
        scene.objects.iter().flat_map(|o| o.most_basic_ray_tracable_objects()).collect();
    progress!(opts.verbose, "found {} basic objects", basic.len());

    let tasks: Vec<TraceTask> = basic
        .iter()
        .enumerate()
        .map(|(id, object)| TraceTask {
            id,
            object: *object,
            light_sources: &light_sources,
            resolution,
            verbose: opts.verbose,
        })
        .collect();

    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
    let outcomes = pool.install(|| tasks.par_iter().map(trace_object).collect::<Result<Vec<_>>>())?;

    let mut ray_trace = RayTrace::new(scene);
    let mut stats = TraceStats::new()?;
    let mut final_lpe = LightPathEnsemble::new();
    for outcome in outcomes {
        stats.record_unit(outcome.points, outcome.ensemble.len(), outcome.elapsed);
        if let Some(store) = store.as_ref() {
            if !outcome.ensemble.is_empty() {
                let key = format!("Batch_{:03}_{:03}", outcome.id, 0);
                store.write_batch(&opts.trace_name, &key, &outcome.ensemble)?;
                progress!(opts.verbose, "unit {:03}: saved as {}", outcome.id, key);
            }
        }
        if opts.store_in_ram {
            final_lpe.concatenate_in_place(outcome.ensemble)?;
        }
    }
    if store.is_some() {
        ray_trace.save_file_location = opts.save_name.clone();
    }
    ray_trace.light_paths_ensemble = final_lpe;
    progress!(opts.verbose, "parallel trace finished\n{}", stats.report(&opts.trace_name));
    Ok(ray_trace)
}
