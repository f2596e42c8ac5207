//! Batch specular ray tracing of optical scenes.
//!
//! A [`Scene`] of light sources and mirrors is traced into a [`RayTrace`], whose light paths
//! are stored column-wise in a [`LightPathEnsemble`]. Traces can be intersected with a plane
//! and binned into flux maps.

#[macro_use]
pub mod macros;

pub mod aggregate;
pub mod ensemble;
pub mod error;
pub mod flux;
pub mod geom;
pub mod intersect;
pub mod light;
pub mod memory;
pub mod metrics;
pub mod options;
pub mod prims;
pub mod scene;
pub mod shape;
pub mod store;
pub mod trace;
pub mod tracer;
pub mod types;
pub mod util;

pub use self::aggregate::*;
pub use self::ensemble::*;
pub use self::error::*;
pub use self::flux::*;
pub use self::geom::*;
pub use self::intersect::*;
pub use self::light::*;
pub use self::memory::*;
pub use self::options::*;
pub use self::prims::*;
pub use self::scene::*;
pub use self::shape::*;
pub use self::store::*;
pub use self::trace::*;
pub use self::tracer::*;
pub use self::types::*;
