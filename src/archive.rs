//! Pareto dominance and the non-dominated archive.
//!
//! # Algorithms
//!
//! - [`dominates`]: pairwise Pareto dominance under a configured direction
//! - [`ParetoArchive`]: antichain maintenance with duplicate rejection and
//!   crowding-distance bookkeeping
//! - [`non_dominated_sort`]: fast non-dominated sorting (Deb et al., 2002),
//!   used by rank-based acceptance policies
//!
//! # Precision
//!
//! Dominance comparisons narrow both operands to `f32` before comparing.
//! The original engine stored evaluations as doubles but compared them at
//! single precision, which coarsens equality on near-tied objectives; that
//! behavior is load-bearing for boundary cases and is preserved here.
//!
//! # References
//!
//! Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm:
//! NSGA-II", IEEE Transactions on Evolutionary Computation 6(2), 182-197.

use crate::state::{Direction, State};

/// `true` iff `a` Pareto-dominates `b` under `direction`: at least as good
/// in every objective and strictly better in at least one.
///
/// Comparison happens at `f32` precision (see module docs). Mismatched or
/// empty vectors never dominate.
pub fn dominates(a: &[f64], b: &[f64], direction: Direction) -> bool {
    if a.is_empty() || a.len() != b.len() {
        return false;
    }

    let mut strictly_better = false;
    for (&va, &vb) in a.iter().zip(b.iter()) {
        let (va, vb) = (va as f32, vb as f32);
        let (better, worse) = match direction {
            Direction::Maximize => (va > vb, va < vb),
            Direction::Minimize => (va < vb, va > vb),
        };
        if worse {
            return false;
        }
        if better {
            strictly_better = true;
        }
    }
    strictly_better
}

/// The non-dominated set of solutions discovered so far.
///
/// Invariant across all operations: the members form an antichain under
/// [`dominates`] and contain no duplicate decision vectors. Crowding
/// distances are recomputed after every structural change so that
/// distance-based generators can read them directly.
#[derive(Debug, Clone)]
pub struct ParetoArchive {
    direction: Direction,
    members: Vec<State>,
    crowding: Vec<f64>,
}

impl ParetoArchive {
    /// Creates an empty archive.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            members: Vec::new(),
            crowding: Vec::new(),
        }
    }

    /// Seeds an empty archive with a copy of the current reference state.
    /// No-op when the archive already has members.
    pub fn bootstrap(&mut self, reference: &State) {
        if self.members.is_empty() {
            self.members.push(reference.clone());
            self.recompute_crowding();
        }
    }

    /// Offers a candidate to the archive.
    ///
    /// Archive members dominated by `x` are removed. If any member dominates
    /// `x` the scan stops and `x` is discarded. A candidate whose decision
    /// vector equals a remaining member by value is discarded as a
    /// duplicate. Otherwise a copy of `x` is inserted.
    ///
    /// Returns `true` iff `x` was inserted.
    pub fn insert(&mut self, x: &State) -> bool {
        let mut removed = false;
        let mut dominated = false;

        let mut i = 0;
        while i < self.members.len() {
            if dominates(x.evaluation(), self.members[i].evaluation(), self.direction) {
                self.members.swap_remove(i);
                removed = true;
            } else if dominates(self.members[i].evaluation(), x.evaluation(), self.direction) {
                dominated = true;
                break;
            } else {
                i += 1;
            }
        }

        if dominated {
            if removed {
                self.recompute_crowding();
            }
            return false;
        }

        if self.members.iter().any(|m| m.code() == x.code()) {
            if removed {
                self.recompute_crowding();
            }
            return false;
        }

        self.members.push(x.clone());
        self.recompute_crowding();
        true
    }

    /// The archived states. Order carries no meaning.
    pub fn members(&self) -> &[State] {
        &self.members
    }

    /// Crowding distance per member, aligned with [`members`](Self::members).
    pub fn crowding(&self) -> &[f64] {
        &self.crowding
    }

    /// The configured direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drops all members.
    pub fn clear(&mut self) {
        self.members.clear();
        self.crowding.clear();
    }

    fn recompute_crowding(&mut self) {
        let objectives: Vec<&[f64]> = self.members.iter().map(|m| m.evaluation()).collect();
        self.crowding = crowding_distance(&objectives);
    }
}

/// Result of non-dominated sorting.
///
/// `ranks[i]` is the Pareto rank of solution `i`; rank 0 is the front.
/// `fronts[k]` lists the indices at rank `k`.
#[derive(Debug, Clone)]
pub struct NondominatedSort {
    pub ranks: Vec<usize>,
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting under a configured direction.
///
/// O(m * n²) for m objectives and n solutions.
///
/// # Panics
///
/// Panics if `objectives` is empty.
pub fn non_dominated_sort(objectives: &[&[f64]], direction: Direction) -> NondominatedSort {
    let n = objectives.len();
    assert!(n > 0, "objectives must not be empty");

    if n == 1 {
        return NondominatedSort {
            ranks: vec![0],
            fronts: vec![vec![0]],
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];
    let mut front_0 = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            if dominates(objectives[i], objectives[j], direction) {
                dominated_by[i].push(j);
                domination_count[j] += 1;
            } else if dominates(objectives[j], objectives[i], direction) {
                dominated_by[j].push(i);
                domination_count[i] += 1;
            }
        }

        if domination_count[i] == 0 {
            ranks[i] = 0;
            front_0.push(i);
        }
    }

    let mut fronts = vec![front_0];
    loop {
        let current = fronts
            .last()
            .expect("fronts is initialized with front_0; never empty");
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
    }

    NondominatedSort { ranks, fronts }
}

/// Crowding distance assignment (Deb et al., 2002).
///
/// Boundary solutions receive `f64::INFINITY`; interior solutions accumulate
/// the normalized gap between their neighbors per objective. Direction does
/// not matter: crowding measures spread, not quality.
pub fn crowding_distance(objectives: &[&[f64]]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];

    for obj_idx in 0..m {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| {
            objectives[a][obj_idx]
                .partial_cmp(&objectives[b][obj_idx])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let min_val = objectives[indices[0]][obj_idx];
        let max_val = objectives[indices[n - 1]][obj_idx];
        let range = max_val - min_val;

        if range > 0.0 {
            for i in 1..(n - 1) {
                let prev = objectives[indices[i - 1]][obj_idx];
                let next = objectives[indices[i + 1]][obj_idx];
                distances[indices[i]] += (next - prev) / range;
            }
        }
    }

    distances
}
