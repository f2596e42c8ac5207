//! On-disk batches of traced light paths.
//!
//! A store is a directory. Each batch of a trace lives in its own group and holds three
//! datasets, each an N x 3 array saved as JSON:
//!
//! ```text
//! <root>/RayTrace/<trace name>/Batches/<batch key>/InitialDirections.json
//! <root>/RayTrace/<trace name>/Batches/<batch key>/Points.json
//! <root>/RayTrace/<trace name>/Batches/<batch key>/CurrentDirections.json
//! ```
//!
//! Only the most recent position of each path is kept, so a loaded path has a single step.

use log::*;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::ensemble::*;
use crate::error::*;
use crate::types::*;

const NAMESPACE: &str = "RayTrace";
const INITIAL_DIRECTIONS: &str = "InitialDirections";
const POINTS: &str = "Points";
const CURRENT_DIRECTIONS: &str = "CurrentDirections";

type Dataset = Vec<[Float; 3]>;

#[derive(Clone, Debug)]
pub struct TraceStore {
    root: PathBuf,
}

impl TraceStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        TraceStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn batches_dir(&self, trace_name: &str) -> PathBuf {
        self.root.join(NAMESPACE).join(trace_name).join("Batches")
    }

    /// Removes every batch of `trace_name` left by an earlier run. Returns how many were removed.
    pub fn clear_trace(&self, trace_name: &str) -> Result<usize> {
        let dir = self.batches_dir(trace_name);
        if !dir.exists() {
            return Ok(0);
        }
        let stale = self.batch_keys(trace_name)?.len();
        fs::remove_dir_all(&dir)?;
        Ok(stale)
    }

    /// Writes `ensemble` as batch `key` of `trace_name`, replacing a batch with the same key.
    pub fn write_batch(
        &self, trace_name: &str, key: &str, ensemble: &LightPathEnsemble,
    ) -> Result<()> {
        let mut points: Dataset = Vec::with_capacity(ensemble.len());
        for (index, p) in ensemble.last_points().into_iter().enumerate() {
            points.push(p.ok_or(TraceError::EmptyPath { index })?.into());
        }
        let dir = self.batches_dir(trace_name).join(key);
        fs::create_dir_all(&dir)?;
        write_dataset(&dir, INITIAL_DIRECTIONS, &to_dataset(ensemble.init_directions()))?;
        write_dataset(&dir, POINTS, &points)?;
        write_dataset(&dir, CURRENT_DIRECTIONS, &to_dataset(ensemble.current_directions()))?;
        debug!("wrote {} paths to {}", ensemble.len(), dir.display());
        Ok(())
    }

    /// Batch keys of `trace_name`, sorted.
    pub fn batch_keys(&self, trace_name: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(self.batches_dir(trace_name))? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                keys.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }

    pub fn read_batch(&self, trace_name: &str, key: &str) -> Result<LightPathEnsemble> {
        let dir = self.batches_dir(trace_name).join(key);
        let init = read_dataset(&dir, INITIAL_DIRECTIONS)?;
        let points = read_dataset(&dir, POINTS)?;
        let current = read_dataset(&dir, CURRENT_DIRECTIONS)?;
        LightPathEnsemble::from_parts(
            init.into_iter().map(to_unit).collect(),
            points.into_iter().map(|p| vec![Point3f::from(p)]).collect(),
            current.into_iter().map(to_unit).collect(),
        )
    }

    /// Every batch of `trace_name` concatenated into one ensemble.
    pub fn load(&self, trace_name: &str) -> Result<LightPathEnsemble> {
        let mut total = LightPathEnsemble::new();
        for key in self.batch_keys(trace_name)? {
            total.concatenate_in_place(self.read_batch(trace_name, &key)?)?;
        }
        Ok(total)
    }
}

fn to_dataset(dirs: &[Unit3f]) -> Dataset {
    dirs.iter().map(|d| d.to_array()).collect()
}

fn to_unit(v: [Float; 3]) -> Unit3f {
    Unit3f::new(Vector3f::from(v))
}

fn write_dataset(dir: &Path, name: &str, data: &Dataset) -> Result<()> {
    let file = fs::File::create(dir.join(name).with_extension("json"))?;
    serde_json::to_writer(BufWriter::new(file), data)?;
    Ok(())
}

fn read_dataset(dir: &Path, name: &str) -> Result<Dataset> {
    let file = fs::File::open(dir.join(name).with_extension("json"))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
