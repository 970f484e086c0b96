//! Toy problems and operators shared by the unit tests.

use rand::{Rng, RngCore};

use crate::problem::{Codification, Problem, SearchOperator};
use crate::state::{Direction, State};

/// Builds a state with its evaluation already filled in.
pub fn evaluated(code: Vec<f64>, evaluation: Vec<f64>) -> State {
    let mut state = State::new(code);
    state.set_evaluation(evaluation);
    state
}

/// Minimize the sum of squares. Optimum at the origin with objective 0.
pub struct SphereProblem {
    pub dim: usize,
}

impl Problem for SphereProblem {
    fn evaluate(&self, state: &mut State) {
        let value: f64 = state.code().iter().map(|x| x * x).sum();
        state.set_evaluation(vec![value]);
    }

    fn direction(&self) -> Direction {
        Direction::Minimize
    }

    fn objective_count(&self) -> usize {
        1
    }
}

/// Box-bounded continuous codification.
pub struct BoxCodification {
    dim: usize,
    lo: f64,
    hi: f64,
}

impl BoxCodification {
    pub fn new(dim: usize, lo: f64, hi: f64) -> Self {
        Self { dim, lo, hi }
    }
}

impl Codification for BoxCodification {
    fn variable_count(&self) -> usize {
        self.dim
    }

    fn random_value(&self, _index: usize, rng: &mut dyn RngCore) -> f64 {
        rng.random_range(self.lo..self.hi)
    }

    fn random_key(&self, rng: &mut dyn RngCore) -> f64 {
        rng.random_range(0.0..1.0)
    }

    fn is_valid(&self, state: &State) -> bool {
        state.code().len() == self.dim
            && state.code().iter().all(|&v| v >= self.lo && v <= self.hi)
    }
}

/// Gaussian-free perturbation operator: each neighbor shifts every
/// coordinate by a uniform step and clamps to the box.
pub struct PerturbOperator {
    dim: usize,
    lo: f64,
    hi: f64,
    step: f64,
}

impl PerturbOperator {
    pub fn new(dim: usize, lo: f64, hi: f64, step: f64) -> Self {
        Self { dim, lo, hi, step }
    }
}

impl SearchOperator for PerturbOperator {
    fn neighbors(&self, state: &State, count: usize, rng: &mut dyn RngCore) -> Vec<State> {
        (0..count)
            .map(|_| {
                let code: Vec<f64> = state
                    .code()
                    .iter()
                    .map(|&v| {
                        let shifted = v + rng.random_range(-self.step..self.step);
                        shifted.clamp(self.lo, self.hi)
                    })
                    .collect();
                State::new(code)
            })
            .collect()
    }

    fn random(&self, count: usize, rng: &mut dyn RngCore) -> Vec<State> {
        (0..count)
            .map(|_| {
                let code: Vec<f64> = (0..self.dim)
                    .map(|_| rng.random_range(self.lo..self.hi))
                    .collect();
                State::new(code)
            })
            .collect()
    }
}

/// Two-objective toy: f1 = x0, f2 = 1 - x0, both in [0, 1].
pub struct BiObjectiveProblem;

impl Problem for BiObjectiveProblem {
    fn evaluate(&self, state: &mut State) {
        let x = state.code().first().copied().unwrap_or(0.0).clamp(0.0, 1.0);
        state.set_evaluation(vec![x, 1.0 - x]);
    }

    fn direction(&self) -> Direction {
        Direction::Minimize
    }

    fn objective_count(&self) -> usize {
        2
    }
}
