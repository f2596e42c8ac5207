use rand::*;
use seq::SliceRandom;

use crate::types::*;

pub type SampleRng = rngs::SmallRng;

pub fn new_rng(seed: u64) -> SampleRng {
    SampleRng::seed_from_u64(seed)
}

pub fn stratified_samples(rng: &mut SampleRng, samples: usize) -> Vec<Point2f> {
    let interval = 1.0 / samples as Float;
    let mut ys = Vec::with_capacity(samples);
    for i in 0..samples {
        ys.push((rng.gen::<Float>() + i as Float) * interval);
    }
    ys.shuffle(rng);
    ys.iter()
        .enumerate()
        .map(|(i, y)| Point2f::new((i as Float + rng.gen::<Float>()) * interval, *y))
        .collect()
}

/// Stratified samples mapped onto the unit disk.
pub fn stratified_samples_in_disk(rng: &mut SampleRng, samples: usize) -> Vec<Point2f> {
    stratified_samples(rng, samples)
        .iter()
        .map(|v| {
            let phi = v.x * PI * 2.0;
            let r = v.y.sqrt();
            Point2f::new(r * Float::cos(phi), r * Float::sin(phi))
        })
        .collect()
}

/// `count` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: Float, end: Float, count: usize) -> Vec<Float> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as Float;
            (0..count).map(|i| iff!(i == count - 1, end, start + step * i as Float)).collect()
        }
    }
}
