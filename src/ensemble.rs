//! Columnar storage for many light paths.
//!
//! A `LightPathEnsemble` keeps the initial directions, current directions and step histories
//! of N paths in parallel vectors so a bounce can be applied to all of them at once.
//! Paths inside one ensemble advance in lockstep: each `add_steps` call appends exactly one
//! position to every path.

use std::ops::Add;

use crate::error::*;
use crate::geom::*;
use crate::types::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightPathEnsemble {
    init_directions: Vec<Unit3f>,
    current_directions: Vec<Unit3f>,
    points_lists: Vec<Vec<Point3f>>,
}

impl LightPathEnsemble {
    pub fn new() -> Self {
        LightPathEnsemble::default()
    }

    /// Builds an ensemble from its three columns. All columns must have the same length and all
    /// step histories the same number of steps.
    pub fn from_parts(
        init_directions: Vec<Unit3f>, points_lists: Vec<Vec<Point3f>>,
        current_directions: Vec<Unit3f>,
    ) -> Result<Self> {
        let n = init_directions.len();
        check_len("current directions", n, current_directions.len())?;
        check_len("step histories", n, points_lists.len())?;
        if let Some(first) = points_lists.first() {
            for steps in points_lists.iter() {
                check_len("steps per path", first.len(), steps.len())?;
            }
        }
        Ok(LightPathEnsemble { init_directions, current_directions, points_lists })
    }

    pub fn from_paths(paths: Vec<LightPath>) -> Result<Self> {
        let n = paths.len();
        let mut init_directions = Vec::with_capacity(n);
        let mut current_directions = Vec::with_capacity(n);
        let mut points_lists = Vec::with_capacity(n);
        for lp in paths {
            init_directions.push(lp.init_direction);
            current_directions.push(lp.current_direction);
            points_lists.push(lp.points);
        }
        LightPathEnsemble::from_parts(init_directions, points_lists, current_directions)
    }

    pub fn len(&self) -> usize {
        self.init_directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.init_directions.is_empty()
    }

    pub fn init_directions(&self) -> &[Unit3f] {
        &self.init_directions
    }

    pub fn current_directions(&self) -> &[Unit3f] {
        &self.current_directions
    }

    pub fn points_lists(&self) -> &[Vec<Point3f>] {
        &self.points_lists
    }

    /// The most recent position of every path; `None` for a path without steps.
    pub fn last_points(&self) -> Vec<Option<Point3f>> {
        self.points_lists.iter().map(|steps| steps.last().copied()).collect()
    }

    /// Steps recorded per path, or `None` for an ensemble with no paths.
    pub fn step_count(&self) -> Option<usize> {
        self.points_lists.first().map(|steps| steps.len())
    }

    /// Appends one step to every path: `points[i]` becomes the newest position of path i and
    /// `directions[i]` its current direction.
    pub fn add_steps(&mut self, points: &[Point3f], directions: &[Unit3f]) -> Result<()> {
        check_len("step positions", self.len(), points.len())?;
        check_len("step directions", self.len(), directions.len())?;
        for (steps, p) in self.points_lists.iter_mut().zip(points) {
            steps.push(*p);
        }
        self.current_directions.copy_from_slice(directions);
        Ok(())
    }

    /// Disjoint union of `self` and `other`. Paths of `self` come first, but callers must not
    /// rely on storage order. Both sides must have the same number of steps per path unless one
    /// of them is empty.
    pub fn concatenate(&self, other: &LightPathEnsemble) -> Result<LightPathEnsemble> {
        let mut out = self.clone();
        out.concatenate_in_place(other.clone())?;
        Ok(out)
    }

    /// `concatenate` into `self`. On a step count mismatch `self` is left unchanged.
    pub fn concatenate_in_place(&mut self, other: LightPathEnsemble) -> Result<()> {
        if other.is_empty() {
            return Ok(());
        }
        if self.is_empty() {
            *self = other;
            return Ok(());
        }
        if let (Some(mine), Some(theirs)) = (self.step_count(), other.step_count()) {
            check_len("steps per path", mine, theirs)?;
        }
        self.init_directions.extend(other.init_directions);
        self.current_directions.extend(other.current_directions);
        self.points_lists.extend(other.points_lists);
        Ok(())
    }

    pub fn light_path(&self, i: usize) -> Option<LightPath> {
        Some(LightPath {
            points: self.points_lists.get(i)?.clone(),
            init_direction: self.init_directions[i],
            current_direction: self.current_directions[i],
        })
    }

    pub fn to_light_paths(&self) -> Vec<LightPath> {
        (0..self.len()).filter_map(|i| self.light_path(i)).collect()
    }

    pub fn into_light_paths(self) -> Vec<LightPath> {
        self.init_directions
            .into_iter()
            .zip(self.current_directions)
            .zip(self.points_lists)
            .map(|((init_direction, current_direction), points)| LightPath {
                points,
                init_direction,
                current_direction,
            })
            .collect()
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<()> {
    iff!(expected == got, Ok(()), Err(TraceError::Shape { what, expected, got }))
}

impl Add for LightPathEnsemble {
    type Output = Result<LightPathEnsemble>;
    fn add(mut self, other: LightPathEnsemble) -> Result<LightPathEnsemble> {
        self.concatenate_in_place(other)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(x: Float, y: Float, z: Float) -> Unit3f {
        Unit3f::new(Vector3f::new(x, y, z))
    }

    fn traced(dirs: &[Unit3f], at: Point3f) -> LightPathEnsemble {
        let mut e = LightPathEnsemble::from_paths(dirs.iter().map(|d| LightPath::new(*d)).collect())
            .unwrap();
        let points = vec![at; dirs.len()];
        let reflected: Vec<Unit3f> = dirs.iter().map(|d| -*d).collect();
        e.add_steps(&points, &reflected).unwrap();
        e
    }

    fn sorted_keys(e: &LightPathEnsemble) -> Vec<[Float; 9]> {
        let mut keys: Vec<[Float; 9]> = e
            .to_light_paths()
            .iter()
            .map(|lp| {
                let (i, c, p) = (lp.init_direction, lp.current_direction, lp.points[0]);
                [i.x, i.y, i.z, c.x, c.y, c.z, p.x, p.y, p.z]
            })
            .collect();
        keys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        keys
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let err = LightPathEnsemble::from_parts(
            vec![dir(0.0, 0.0, 1.0); 3],
            vec![Vec::new(); 3],
            vec![dir(0.0, 0.0, 1.0); 2],
        )
        .unwrap_err();
        match err {
            TraceError::Shape { expected: 3, got: 2, .. } => {}
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn uneven_step_histories_are_rejected() {
        let mut a = LightPath::new(dir(0.0, 0.0, -1.0));
        a.add_step(Point3f::new(0.0, 0.0, 0.0), dir(0.0, 0.0, 1.0));
        let b = LightPath::new(dir(0.0, 0.0, -1.0));
        assert!(LightPathEnsemble::from_paths(vec![a, b]).is_err());
    }

    #[test]
    fn add_steps_requires_one_entry_per_path() {
        let origin = Point3f::new(0.0, 0.0, 0.0);
        let mut e = traced(&[dir(0.0, 0.0, -1.0), dir(1.0, 0.0, -1.0)], origin);
        let before = e.clone();
        assert!(e.add_steps(&[Point3f::new(1.0, 1.0, 1.0)], &[dir(0.0, 0.0, 1.0)]).is_err());
        assert_eq!(e, before);
    }

    #[test]
    fn add_steps_appends_in_lockstep() {
        let origin = Point3f::new(0.0, 0.0, 0.0);
        let mut e = traced(&[dir(0.0, 0.0, -1.0), dir(1.0, 0.0, -1.0)], origin);
        let p = Point3f::new(0.0, 0.0, 5.0);
        e.add_steps(&[p, p], &[dir(1.0, 0.0, 0.0), dir(0.0, 1.0, 0.0)]).unwrap();
        assert!(e.points_lists().iter().all(|steps| steps.len() == 2));
        assert_eq!(e.last_points(), vec![Some(p), Some(p)]);
        assert_eq!(e.current_directions()[1], dir(0.0, 1.0, 0.0));
        assert_eq!(e.init_directions()[1], dir(1.0, 0.0, -1.0));
    }

    #[test]
    fn concatenation_is_commutative_as_a_set() {
        let a = traced(&[dir(0.0, 0.0, -1.0), dir(0.1, 0.0, -1.0)], Point3f::new(1.0, 0.0, 0.0));
        let b = traced(&[dir(0.0, 0.3, -1.0)], Point3f::new(0.0, 2.0, 0.0));
        let ab = a.concatenate(&b).unwrap();
        let ba = b.concatenate(&a).unwrap();
        assert_eq!(ab.len(), 3);
        assert_eq!(sorted_keys(&ab), sorted_keys(&ba));
    }

    #[test]
    fn light_path_conversion_round_trips() {
        let e = traced(&[dir(0.0, 0.0, -1.0), dir(0.2, 0.1, -1.0)], Point3f::new(3.0, 4.0, 0.0));
        let back = LightPathEnsemble::from_paths(e.clone().into_light_paths()).unwrap();
        assert_eq!(back, e);
        assert_eq!(e.to_light_paths().len(), 2);
    }

    #[test]
    fn empty_ensembles_concatenate_to_the_other_side() {
        let a = traced(&[dir(0.0, 0.0, -1.0)], Point3f::new(0.0, 0.0, 0.0));
        assert_eq!((LightPathEnsemble::new() + a.clone()).unwrap(), a);
        let mut b = a.clone();
        b.concatenate_in_place(LightPathEnsemble::new()).unwrap();
        assert_eq!(b, a);
    }

    #[test]
    fn concatenation_keeps_step_counts_equal() {
        let origin = Point3f::new(0.0, 0.0, 0.0);
        let one_step = traced(&[dir(0.0, 0.0, -1.0)], origin);
        let mut two_steps = traced(&[dir(0.0, 0.0, -1.0)], origin);
        two_steps.add_steps(&[Point3f::new(0.0, 0.0, 5.0)], &[dir(0.0, 0.0, -1.0)]).unwrap();

        let mut e = one_step.clone();
        match e.concatenate_in_place(two_steps.clone()) {
            Err(TraceError::Shape { what: "steps per path", expected: 1, got: 2 }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(e, one_step);
        assert!((two_steps + one_step).is_err());
    }
}
