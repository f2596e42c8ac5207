//! Flux maps and ensquared energy of plane intersection points.

use crate::error::*;
use crate::types::*;
use crate::util;

/// Counts of intersection points on a square grid centred at the origin.
///
/// Rows run from +y at the top to -y at the bottom so the grid reads like an image; columns
/// run from -x to +x.
#[derive(Clone, Debug, PartialEq)]
pub struct FluxMap {
    pub bins: usize,
    counts: Vec<u64>,
    /// Bin edges along x, `bins + 1` values from -extent/2 to +extent/2.
    pub x_edges: Vec<Float>,
    /// Bin edges along y, `bins + 1` values from -extent/2 to +extent/2.
    pub y_edges: Vec<Float>,
}

impl FluxMap {
    pub fn get(&self, row: usize, col: usize) -> Option<u64> {
        if row >= self.bins || col >= self.bins {
            return None;
        }
        self.counts.get(row * self.bins + col).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.counts.chunks(max!(self.bins, 1))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn peak(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Grayscale rendering, scaled so the fullest bin is white.
    pub fn to_image(&self) -> image::GrayImage {
        let peak = self.peak();
        let mut img = image::GrayImage::new(self.bins as u32, self.bins as u32);
        for (px, c) in img.pixels_mut().zip(self.counts.iter()) {
            let v = iff!(peak == 0, 0, (*c as Float * 255.0 / peak as Float).round() as u8);
            *px = image::Luma([v]);
        }
        img
    }
}

/// Bins `points` into a grid of `bin_res` sized cells covering a square of side `extent`
/// centred at the origin.
///
/// The side is rounded down to a whole number of bins. Points outside the square are dropped;
/// a point on the upper edge falls into the last bin. A grid too large to index is an error.
pub fn histogram_image(bin_res: Float, extent: Float, points: &[Point2f]) -> Result<FluxMap> {
    let bins = iff!(bin_res > 0.0, (extent / bin_res) as usize, 0);
    let cells = bins.checked_mul(bins).ok_or(TraceError::FluxGrid { bins })?;
    let half = bin_res * bins as Float / 2.0;
    let edges = util::linspace(-half, half, iff!(bins > 0, bins + 1, 0));
    let mut counts = vec![0u64; cells];
    for p in points {
        let col = bin_of(p.x, half, bin_res, bins);
        let row_from_bottom = bin_of(p.y, half, bin_res, bins);
        if let (Some(col), Some(row)) = (col, row_from_bottom) {
            counts[(bins - 1 - row) * bins + col] += 1;
        }
    }
    Ok(FluxMap { bins, counts, x_edges: edges.clone(), y_edges: edges })
}

fn bin_of(v: Float, half: Float, bin_res: Float, bins: usize) -> Option<usize> {
    if bins == 0 || !(v >= -half && v <= half) {
        return None;
    }
    Some(min!(((v + half) / bin_res) as usize, bins - 1))
}

/// Fraction of `points` strictly inside the square [-w, w] x [-w, w], for `res` half-widths w
/// evenly spaced from 0 to `semi_width_max`.
///
/// Returns the fractions and the half-widths. With no points every fraction is 0.
pub fn ensquared_energy(
    points: &[Point2f], semi_width_max: Float, res: usize,
) -> (Vec<Float>, Vec<Float>) {
    let widths = util::linspace(0.0, semi_width_max, res);
    // a point is inside every square wider than its largest absolute coordinate
    let reach: Vec<Float> = points.iter().map(|p| max!(p.x.abs(), p.y.abs())).collect();
    let fracs = widths
        .iter()
        .map(|w| {
            let inside = reach.iter().filter(|r| *r < w).count();
            iff!(reach.is_empty(), 0.0, inside as Float / reach.len() as Float)
        })
        .collect();
    (fracs, widths)
}
