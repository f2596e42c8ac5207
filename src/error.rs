use failure::Fail;
use std::io;

use crate::types::*;

#[derive(Debug, Fail)]
pub enum TraceError {
    #[fail(display = "save_in_file was set but no save target was given")]
    MissingSaveTarget,

    #[fail(
        display = "memory in use ({:.1}%) is already above the {:.1}% ceiling",
        in_use, limit
    )]
    MemoryCeiling { in_use: Float, limit: Float },

    #[fail(display = "shape mismatch in {}: expected {} entries, got {}", what, expected, got)]
    Shape { what: &'static str, expected: usize, got: usize },

    #[fail(display = "light path {} has no recorded steps", index)]
    EmptyPath { index: usize },

    #[fail(display = "could not build the worker pool: {}", _0)]
    WorkerPool(#[cause] rayon::ThreadPoolBuildError),

    #[fail(display = "trace storage: {}", _0)]
    Io(#[cause] io::Error),

    #[fail(display = "malformed dataset: {}", _0)]
    Dataset(#[cause] serde_json::Error),

    #[fail(display = "a flux map of {0} x {0} bins is too large", bins)]
    FluxGrid { bins: usize },

    #[fail(display = "could not allocate trace histogram: {}", reason)]
    Metrics { reason: String },
}

impl From<io::Error> for TraceError {
    fn from(e: io::Error) -> Self {
        TraceError::Io(e)
    }
}

impl From<serde_json::Error> for TraceError {
    fn from(e: serde_json::Error) -> Self {
        TraceError::Dataset(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for TraceError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        TraceError::WorkerPool(e)
    }
}

pub type Result<T> = std::result::Result<T, TraceError>;
