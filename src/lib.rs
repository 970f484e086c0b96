//! Pluggable metaheuristic optimization engine for static and dynamic
//! problems.
//!
//! The crate separates four concerns:
//!
//! - **Generators** produce candidate solutions and consume evaluated
//!   feedback. Three families implement one contract: trajectory (random
//!   search, hill climbing, simulated annealing, threshold accepting, tabu
//!   search), population (selection → variation → replacement with
//!   pluggable roles), and ensemble (a hyper-heuristic that picks the
//!   active sub-generator per iteration by weight-proportional roulette
//!   with periodic credit reset).
//! - **Acceptance policies** decide whether a trajectory moves to a
//!   candidate, from accept-anything up to Pareto-rank acceptance for
//!   multi-objective runs.
//! - The **Pareto archive** keeps the non-dominated set discovered so far,
//!   with crowding distances for diversity-aware consumers.
//! - The **engine** drives the loop over a fixed iteration budget, samples
//!   offline performance per period, re-evaluates references so drifting
//!   objectives propagate into the search, and applies scheduled strategy
//!   hand-offs.
//!
//! Problems plug in through three traits ([`problem::Problem`],
//! [`problem::Codification`], [`problem::SearchOperator`]); the crate
//! contains no domain-specific concepts.
//!
//! # Example
//!
//! ```ignore
//! use hyperheur::engine::{Engine, EngineConfig};
//! use hyperheur::generators::GeneratorKind;
//!
//! let config = EngineConfig::default()
//!     .with_max_iterations(10_000)
//!     .with_period_length(500)
//!     .with_initial_generator(GeneratorKind::Ensemble)
//!     .with_seed(42);
//! let mut engine = Engine::new(config)?;
//! let report = engine.run(&problem, &codification, &operator)?;
//! println!("best: {:?}", report.best_objective);
//! ```

pub mod acceptance;
pub mod archive;
pub mod engine;
pub mod error;
pub mod generators;
pub mod problem;
pub mod state;

#[cfg(test)]
mod testutil;
