//! Collaborator contracts supplied by the caller.
//!
//! The engine consumes three external contracts: the [`Problem`] scores
//! states, the [`Codification`] supplies domain-specific random values and
//! validity checks, and the [`SearchOperator`] produces neighborhoods and
//! fresh random candidates. Implementations are domain code and live outside
//! this crate; the test modules supply toy implementations.

use rand::RngCore;

use crate::state::{Direction, State};

/// Scores candidate solutions.
///
/// `evaluate` fills `state.evaluation` from `state.code`; the evaluation
/// vector length must equal [`objective_count`](Problem::objective_count)
/// and stay fixed for the whole run. For dynamic problems the scoring may
/// drift between calls — the engine re-evaluates all stored references at
/// every period boundary to track the drift.
pub trait Problem {
    /// Fills `state.evaluation` given `state.code`.
    fn evaluate(&self, state: &mut State);

    /// Whether objectives are maximized or minimized.
    fn direction(&self) -> Direction;

    /// Number of objective values per evaluation.
    fn objective_count(&self) -> usize;
}

/// Supplies domain-specific random values and validity checks.
pub trait Codification {
    /// Length of the decision vector.
    fn variable_count(&self) -> usize;

    /// A random legal value for the variable at `index`.
    fn random_value(&self, index: usize, rng: &mut dyn RngCore) -> f64;

    /// A random key in `[0, 1)`. Used for key-based representations and as
    /// the key stream behind the population generator's rate decisions.
    fn random_key(&self, rng: &mut dyn RngCore) -> f64;

    /// Whether the state's decision vector is legal for this domain.
    /// The population generator discards mutations that fail this check.
    fn is_valid(&self, state: &State) -> bool;
}

/// Produces neighborhoods and fresh random candidates.
pub trait SearchOperator {
    /// Up to `count` neighbors of `state`. The returned states are
    /// unevaluated copies; `state` itself is never mutated.
    fn neighbors(&self, state: &State, count: usize, rng: &mut dyn RngCore) -> Vec<State>;

    /// `count` fresh random unevaluated states.
    fn random(&self, count: usize, rng: &mut dyn RngCore) -> Vec<State>;
}
