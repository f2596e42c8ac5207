use log::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::*;
use crate::memory::*;
use crate::store::*;
use crate::types::*;

/// What a trace keeps, where it persists batches, and how much memory it may use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    /// Keep the traced paths in the returned `RayTrace`.
    pub store_in_ram: bool,
    /// Write batches to the store at `save_name`.
    pub save_in_file: bool,
    pub save_name: Option<PathBuf>,
    /// Trace name inside the store.
    pub trace_name: String,
    /// Flush to the store once system memory use passes this percentage.
    pub max_ram_in_use_percent: Float,
    /// Log progress at info level instead of debug.
    pub verbose: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        TraceOptions {
            store_in_ram: true,
            save_in_file: false,
            save_name: None,
            trace_name: "Default".to_string(),
            max_ram_in_use_percent: 99.0,
            verbose: false,
        }
    }
}

impl TraceOptions {
    /// Options that persist every batch under `root` as well as keeping them in memory.
    pub fn saving_to<P: Into<PathBuf>>(root: P) -> Self {
        TraceOptions { save_in_file: true, save_name: Some(root.into()), ..Default::default() }
    }

    /// Checks the options before any tracing starts and opens the store if persistence is on.
    ///
    /// A save target without `save_in_file` is ignored with a warning. Persistence without a
    /// target, or with memory use already above the ceiling, is an error. Batches an earlier run
    /// left under the same trace name are removed so a reload sees only this trace.
    pub fn validate(&self, probe: &mut dyn MemoryProbe) -> Result<Option<TraceStore>> {
        if !self.save_in_file {
            if let Some(name) = &self.save_name {
                warn!(
                    "save target {} was given but save_in_file is off; the trace will not be saved",
                    name.display()
                );
            }
            return Ok(None);
        }
        let target = self.save_name.as_ref().ok_or(TraceError::MissingSaveTarget)?;
        let in_use = probe.used_percent();
        if in_use > self.max_ram_in_use_percent {
            return Err(TraceError::MemoryCeiling { in_use, limit: self.max_ram_in_use_percent });
        }
        let store = TraceStore::new(target.clone());
        let stale = store.clear_trace(&self.trace_name)?;
        if stale > 0 {
            warn!(
                "replacing trace {} in {}: removed {} old batches",
                self.trace_name,
                target.display(),
                stale
            );
        }
        Ok(Some(store))
    }
}
