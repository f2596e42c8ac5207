use serde::{Deserialize, Serialize};

use crate::types::*;

/// How densely an optic is sampled.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// This many samples across the width of each facet; rows follow the aspect ratio.
    PixelX(usize),
    /// Samples spaced this far apart, in scene units.
    Separation(Float),
}

impl Resolution {
    /// Sample counts (columns, rows) for a `width` by `height` rectangle. Never zero.
    pub fn grid(self, width: Float, height: Float) -> (usize, usize) {
        let (cols, rows) = match self {
            Resolution::PixelX(n) => {
                let rows = iff!(width > 0.0, (n as Float * height / width).round(), 1.0);
                (n as Float, rows)
            }
            Resolution::Separation(d) if d > 0.0 => ((width / d).floor(), (height / d).floor()),
            Resolution::Separation(_) => (1.0, 1.0),
        };
        (max!(cols as usize, 1), max!(rows as usize, 1))
    }
}

/// A reflective surface the tracers can sample.
pub trait RayTraceable: Sync + Send {
    /// Surface points paired with their unit normals.
    fn survey_of_points(&self, resolution: Resolution) -> Vec<(Point3f, Unit3f)>;

    /// The leaves this object is built from. Each leaf is traced as one unit of parallel work,
    /// so a composite optic should return its facets; a leaf returns itself.
    fn most_basic_ray_tracable_objects(&self) -> Vec<&dyn RayTraceable>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_x_keeps_the_aspect_ratio() {
        assert_eq!(Resolution::PixelX(10).grid(2.0, 1.0), (10, 5));
        assert_eq!(Resolution::PixelX(1).grid(1.0, 1.0), (1, 1));
        assert_eq!(Resolution::PixelX(0).grid(1.0, 1.0), (1, 1));
    }

    #[test]
    fn separation_counts_whole_cells() {
        assert_eq!(Resolution::Separation(0.25).grid(1.0, 0.6), (4, 2));
        assert_eq!(Resolution::Separation(5.0).grid(1.0, 1.0), (1, 1));
        assert_eq!(Resolution::Separation(0.0).grid(1.0, 1.0), (1, 1));
    }
}
