//! Fruchterman-Reingold spring simulation over plain coordinate vectors.
//!
//! Nodes are addressed by their store index. Every round computes the net
//! displacement of each node from the positions at the start of the round
//! and applies all of them together, so the result does not depend on the
//! order nodes are visited in.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Closest two points may get before the pair is treated as coincident.
const MIN_DISTANCE: f64 = 1e-9;

/// Initial temperature as a fraction of the starting box width.
const START_TEMPERATURE: f64 = 0.1;

/// A spring between two nodes. `strength` multiplies the attraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Spring {
    pub a: usize,
    pub b: usize,
    pub strength: f64,
}

/// Seeded uniform placement in `[-1, 1)²`, drawn in node order.
pub(crate) fn initial_positions(n: usize, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| [rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)])
        .collect()
}

#[derive(Debug, Clone)]
pub(crate) struct Simulation {
    positions: Vec<[f64; 2]>,
    springs: Vec<Spring>,
    k: f64,
    temperature: f64,
    cooling: f64,
    round: usize,
    iterations: usize,
    tolerance: Option<f64>,
    converged: bool,
}

impl Simulation {
    pub(crate) fn new(
        positions: Vec<[f64; 2]>,
        springs: Vec<Spring>,
        k: f64,
        iterations: usize,
        tolerance: Option<f64>,
    ) -> Self {
        let temperature = START_TEMPERATURE * span(&positions).max(1.0);
        Self {
            positions,
            springs,
            k,
            temperature,
            cooling: temperature / (iterations as f64 + 1.0),
            round: 0,
            iterations,
            tolerance,
            converged: false,
        }
    }

    /// Rounds completed so far.
    pub(crate) const fn round(&self) -> usize {
        self.round
    }

    pub(crate) const fn is_done(&self) -> bool {
        self.converged || self.round >= self.iterations
    }

    /// Run one round. Returns the largest distance any node moved.
    pub(crate) fn step(&mut self) -> f64 {
        let n = self.positions.len();
        let k2 = self.k * self.k;
        let mut disp = vec![[0.0_f64; 2]; n];

        // Repulsion between every pair.
        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy, d) = separation(&self.positions, i, j, n);
                let force = k2 / d;
                let fx = dx / d * force;
                let fy = dy / d * force;
                disp[i][0] += fx;
                disp[i][1] += fy;
                disp[j][0] -= fx;
                disp[j][1] -= fy;
            }
        }

        // Attraction along every edge record.
        for s in &self.springs {
            let (dx, dy, d) = separation(&self.positions, s.a, s.b, n);
            let force = s.strength * d * d / self.k;
            let fx = dx / d * force;
            let fy = dy / d * force;
            disp[s.a][0] -= fx;
            disp[s.a][1] -= fy;
            disp[s.b][0] += fx;
            disp[s.b][1] += fy;
        }

        let mut max_move = 0.0_f64;
        for (p, d) in self.positions.iter_mut().zip(&disp) {
            let len = d[0].hypot(d[1]);
            if len <= 0.0 || !len.is_finite() {
                continue;
            }
            let capped = len.min(self.temperature);
            p[0] += d[0] / len * capped;
            p[1] += d[1] / len * capped;
            max_move = max_move.max(capped);
        }

        self.temperature = (self.temperature - self.cooling).max(0.0);
        self.round += 1;
        if self.tolerance.is_some_and(|tol| max_move < tol) {
            self.converged = true;
        }
        max_move
    }

    /// Final coordinates, centered and scaled into `[-1, 1]`.
    pub(crate) fn into_positions(self) -> Vec<[f64; 2]> {
        rescale(self.positions)
    }
}

/// Vector from `j` to `i` and its length, never shorter than `MIN_DISTANCE`.
///
/// Coincident points are pushed apart along a direction fixed by the pair's
/// indices, so the outcome stays reproducible.
fn separation(positions: &[[f64; 2]], i: usize, j: usize, n: usize) -> (f64, f64, f64) {
    let dx = positions[i][0] - positions[j][0];
    let dy = positions[i][1] - positions[j][1];
    let d = dx.hypot(dy);
    if d >= MIN_DISTANCE {
        return (dx, dy, d);
    }
    let angle = (i * n + j) as f64;
    (
        MIN_DISTANCE * angle.cos(),
        MIN_DISTANCE * angle.sin(),
        MIN_DISTANCE,
    )
}

/// Width of the bounding box along its wider axis.
fn span(positions: &[[f64; 2]]) -> f64 {
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for p in positions {
        for axis in 0..2 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    if positions.is_empty() {
        return 0.0;
    }
    (max[0] - min[0]).max(max[1] - min[1])
}

/// Center on the mean, then divide by the largest absolute coordinate.
pub(crate) fn rescale(mut positions: Vec<[f64; 2]>) -> Vec<[f64; 2]> {
    if positions.is_empty() {
        return positions;
    }
    let n = positions.len() as f64;
    let mean_x = positions.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = positions.iter().map(|p| p[1]).sum::<f64>() / n;

    let mut lim = 0.0_f64;
    for p in &mut positions {
        p[0] -= mean_x;
        p[1] -= mean_y;
        lim = lim.max(p[0].abs()).max(p[1].abs());
    }

    if lim > 0.0 {
        for p in &mut positions {
            p[0] /= lim;
            p[1] /= lim;
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(a: [f64; 2], b: [f64; 2]) -> f64 {
        (a[0] - b[0]).hypot(a[1] - b[1])
    }

    #[test]
    fn initial_positions_are_seeded_and_bounded() {
        let a = initial_positions(20, 7);
        let b = initial_positions(20, 7);
        let c = initial_positions(20, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        for p in &a {
            assert!((-1.0..1.0).contains(&p[0]));
            assert!((-1.0..1.0).contains(&p[1]));
        }
    }

    #[test]
    fn unlinked_pair_is_pushed_apart() {
        let start = vec![[0.0, 0.0], [0.1, 0.0]];
        let mut sim = Simulation::new(start.clone(), Vec::new(), 1.0, 1, None);
        sim.step();
        let after = sim.positions.clone();
        assert!(dist(after[0], after[1]) > dist(start[0], start[1]));
    }

    #[test]
    fn spring_pulls_distant_pair_together() {
        let start = vec![[-1.0, 0.0], [1.0, 0.0]];
        let springs = vec![Spring {
            a: 0,
            b: 1,
            strength: 5.0,
        }];
        let mut sim = Simulation::new(start.clone(), springs, 0.1, 1, None);
        sim.step();
        assert!(dist(sim.positions[0], sim.positions[1]) < dist(start[0], start[1]));
    }

    #[test]
    fn coincident_points_separate_without_nan() {
        let mut sim = Simulation::new(vec![[0.5, 0.5]; 3], Vec::new(), 1.0, 5, None);
        while !sim.is_done() {
            sim.step();
        }
        let out = sim.into_positions();
        for p in &out {
            assert!(p[0].is_finite() && p[1].is_finite());
        }
        assert!(dist(out[0], out[1]) > 0.0);
    }

    #[test]
    fn displacement_is_capped_by_temperature() {
        let start = vec![[0.0, 0.0], [1e-6, 0.0]];
        let mut sim = Simulation::new(start, Vec::new(), 1.0, 10, None);
        let cap = sim.temperature;
        let moved = sim.step();
        assert!(moved <= cap + 1e-15);
    }

    #[test]
    fn tolerance_stops_early() {
        let start = initial_positions(4, 1);
        let mut sim = Simulation::new(start, Vec::new(), 0.5, 1000, Some(f64::INFINITY));
        sim.step();
        assert!(sim.is_done());
        assert_eq!(sim.round(), 1);
    }

    #[test]
    fn rescale_centers_and_bounds() {
        let out = rescale(vec![[2.0, 2.0], [4.0, 2.0], [3.0, 5.0]]);
        let mean_x: f64 = out.iter().map(|p| p[0]).sum::<f64>() / 3.0;
        let mean_y: f64 = out.iter().map(|p| p[1]).sum::<f64>() / 3.0;
        assert!(mean_x.abs() < 1e-12 && mean_y.abs() < 1e-12);
        let lim = out
            .iter()
            .flat_map(|p| [p[0].abs(), p[1].abs()])
            .fold(0.0_f64, f64::max);
        assert!((lim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rescale_single_point_is_origin() {
        assert_eq!(rescale(vec![[0.3, -0.7]]), vec![[0.0, 0.0]]);
    }
}
