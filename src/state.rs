//! Solution value object and optimization direction.
//!
//! A [`State`] couples a decision vector (`code`) with its objective values
//! (`evaluation`), a provenance tag naming the generator family that produced
//! it, and the iteration index at creation. The decision vector length is
//! fixed per run by the codification; the evaluation vector is written only
//! by the `Problem` collaborator through `evaluate`.

use crate::generators::GeneratorKind;

/// Whether larger or smaller objective values are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Greater objective values are better.
    Maximize,
    /// Smaller objective values are better.
    Minimize,
}

impl Direction {
    /// `true` iff `a` is strictly better than `b` under this direction.
    pub fn better(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Maximize => a > b,
            Direction::Minimize => a < b,
        }
    }

    /// `true` iff `a` is at least as good as `b` under this direction.
    pub fn better_or_equal(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Maximize => a >= b,
            Direction::Minimize => a <= b,
        }
    }
}

/// A candidate solution.
///
/// Created by a generator (fresh, or copy-mutate of another state),
/// evaluated exactly once per creation by the problem, possibly copied into
/// the Pareto archive, and dropped once no list references it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    code: Vec<f64>,
    evaluation: Vec<f64>,
    origin: GeneratorKind,
    sequence: u64,
}

impl State {
    /// Creates an unevaluated state from a decision vector.
    pub fn new(code: Vec<f64>) -> Self {
        Self {
            code,
            evaluation: Vec::new(),
            origin: GeneratorKind::RandomSearch,
            sequence: 0,
        }
    }

    /// The decision vector.
    pub fn code(&self) -> &[f64] {
        &self.code
    }

    /// The objective values, empty until the problem evaluates this state.
    pub fn evaluation(&self) -> &[f64] {
        &self.evaluation
    }

    /// Installs the objective values. Called by `Problem::evaluate` only.
    pub fn set_evaluation(&mut self, values: Vec<f64>) {
        self.evaluation = values;
    }

    /// The generator family that produced this state.
    pub fn origin(&self) -> GeneratorKind {
        self.origin
    }

    /// Tags the producing generator family.
    pub fn set_origin(&mut self, origin: GeneratorKind) {
        self.origin = origin;
    }

    /// The iteration index at creation.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Stamps the iteration index at creation.
    pub fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    /// The last objective value — the scalar the engine compares when
    /// updating its best state. `NaN` while unevaluated.
    pub fn last_objective(&self) -> f64 {
        self.evaluation.last().copied().unwrap_or(f64::NAN)
    }

    /// The first objective value — the scalar accumulated into the
    /// offline-performance running sum. `NaN` while unevaluated.
    ///
    /// The engine deliberately sums a different objective than it compares;
    /// both are named here so the asymmetry is visible at call sites.
    pub fn first_objective(&self) -> f64 {
        self.evaluation.first().copied().unwrap_or(f64::NAN)
    }
}
