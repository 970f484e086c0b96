//! Candidate generators: trajectory, population, and ensemble strategies.
//!
//! A [`Generator`] produces candidate states, consumes evaluated feedback,
//! and exposes its internal reference(s). Three families implement the
//! contract:
//!
//! - **Trajectory** ([`TrajectoryGenerator`], [`TabuGenerator`]): one
//!   reference state, perturbed per iteration, replaced when the acceptance
//!   policy (or tabu discipline) says so.
//! - **Population** ([`PopulationGenerator`]): a fixed-size reference list
//!   evolved by selection, variation, and replacement.
//! - **Ensemble** ([`EnsembleGenerator`]): a hyper-heuristic holding a fixed
//!   list of sub-generators, selecting the active one per iteration by
//!   weight-proportional roulette with periodic credit reset.
//!
//! Generators are built through [`build_generator`], a registry keyed by
//! [`GeneratorKind`] that fails with a configuration error on invalid
//! compositions instead of returning a silent null.

mod ensemble;
mod operators;
mod population;
mod tabu;
mod trajectory;

pub use ensemble::{EnsembleGenerator, PERIOD_BUCKETS, SUCCESS_CREDIT, WEIGHT_BASELINE};
pub use operators::{
    CrossoverKind, CrossoverOp, MutationKind, MutationOp, ReplacementKind, ReplacementOp,
    SelectionKind, SelectionOp,
};
pub use population::PopulationGenerator;
pub use tabu::{TabuGenerator, TABU_REGENERATION_LIMIT};
pub use trajectory::TrajectoryGenerator;

use std::fmt;

use rand::RngCore;

use crate::acceptance::AcceptanceKind;
use crate::error::EngineError;
use crate::problem::{Codification, Problem, SearchOperator};
use crate::state::{Direction, State};

/// Generator family tags for the registry and for state provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeneratorKind {
    RandomSearch,
    HillClimbing,
    SimulatedAnnealing,
    ThresholdAccepting,
    TabuSearch,
    Genetic,
    Ensemble,
}

/// Produces and consumes candidate states for one search strategy.
pub trait Generator {
    /// The family tag of this generator.
    fn kind(&self) -> GeneratorKind;

    /// Installs the initial reference(s). Population variants top up their
    /// reference list with evaluated random states; the list size is then
    /// invariant for the rest of the run.
    fn initialize(
        &mut self,
        initial: &State,
        codification: &dyn Codification,
        ops: &dyn SearchOperator,
        problem: &dyn Problem,
        rng: &mut dyn RngCore,
    ) -> Result<(), EngineError>;

    /// Hook called by the engine at the top of every iteration. The ensemble
    /// re-draws its active sub-generator here; other families ignore it.
    fn begin_iteration(&mut self, _rng: &mut dyn RngCore) {}

    /// Hook called by the engine at every sub-period boundary
    /// (`period_length / 10` iterations). The ensemble flushes its counters
    /// and resets selection weights here; other families ignore it.
    fn on_subperiod(&mut self, _rng: &mut dyn RngCore) {}

    /// Produces one unevaluated candidate. Never mutates the reference(s)
    /// in place and never yields nothing for a seeded generator — an absent
    /// candidate is an invariant violation surfaced as an error.
    fn generate(
        &mut self,
        neighborhood_size: usize,
        codification: &dyn Codification,
        ops: &dyn SearchOperator,
        rng: &mut dyn RngCore,
    ) -> Result<State, EngineError>;

    /// Consumes an evaluated candidate: trajectory variants replace the
    /// reference when accepted, population variants apply their replacement
    /// scheme, the ensemble delegates and updates its credit counters.
    fn update_reference(&mut self, candidate: &State, iteration: u64, rng: &mut dyn RngCore);

    /// The current single reference. `None` only before initialization.
    fn reference(&self) -> Option<&State>;

    /// The current reference list (length 1 for trajectory variants).
    fn reference_list(&self) -> &[State];

    /// Re-evaluates every stored reference against the current objective.
    /// Supports dynamic problems whose landscape drifts mid-run.
    fn reevaluate(&mut self, problem: &dyn Problem);

    /// Clears references and accumulated bookkeeping for a fresh run.
    fn reset(&mut self);
}

impl fmt::Debug for dyn Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

/// Construction parameters consumed by [`build_generator`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorParams {
    /// Reference-list size for population variants.
    pub population_size: usize,
    /// Tabu tenure (number of recent moves kept forbidden).
    pub tabu_tenure: usize,
    /// Initial temperature for annealed acceptance.
    pub sa_temperature: f64,
    /// Geometric cooling factor for annealed acceptance.
    pub sa_cooling: f64,
    /// Worsening threshold for threshold accepting.
    pub threshold: f64,
    /// Crossover probability for population variants.
    pub crossover_rate: f64,
    /// Mutation probability for population variants.
    pub mutation_rate: f64,
    /// Selection role for population variants.
    pub selection: SelectionKind,
    /// Crossover role for population variants.
    pub crossover: CrossoverKind,
    /// Mutation role for population variants.
    pub mutation: MutationKind,
    /// Replacement role for population variants.
    pub replacement: ReplacementKind,
    /// Sub-generator roster for the ensemble. Must be non-empty and must
    /// not contain `Ensemble` itself.
    pub ensemble_members: Vec<GeneratorKind>,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            population_size: 30,
            tabu_tenure: 7,
            sa_temperature: 100.0,
            sa_cooling: 0.95,
            threshold: 0.1,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            selection: SelectionKind::Tournament(3),
            crossover: CrossoverKind::Uniform,
            mutation: MutationKind::RandomReset(0.1),
            replacement: ReplacementKind::ReplaceWorstIfBetter,
            ensemble_members: vec![
                GeneratorKind::HillClimbing,
                GeneratorKind::SimulatedAnnealing,
                GeneratorKind::RandomSearch,
            ],
        }
    }
}

/// Builds a generator for the given family tag.
///
/// An ensemble roster containing another ensemble, or an empty roster, is a
/// configuration error.
pub fn build_generator(
    kind: GeneratorKind,
    direction: Direction,
    params: &GeneratorParams,
) -> Result<Box<dyn Generator>, EngineError> {
    let generator: Box<dyn Generator> = match kind {
        GeneratorKind::RandomSearch => Box::new(TrajectoryGenerator::random_search(direction)),
        GeneratorKind::HillClimbing => Box::new(TrajectoryGenerator::new(
            GeneratorKind::HillClimbing,
            AcceptanceKind::Best.build(direction),
        )),
        GeneratorKind::SimulatedAnnealing => Box::new(TrajectoryGenerator::new(
            GeneratorKind::SimulatedAnnealing,
            Box::new(crate::acceptance::AcceptNotBadT::new(
                direction,
                params.sa_temperature,
                params.sa_cooling,
            )),
        )),
        GeneratorKind::ThresholdAccepting => Box::new(TrajectoryGenerator::new(
            GeneratorKind::ThresholdAccepting,
            Box::new(crate::acceptance::AcceptNotBadU::new(
                direction,
                params.threshold,
            )),
        )),
        GeneratorKind::TabuSearch => {
            if params.tabu_tenure == 0 {
                return Err(EngineError::Configuration(
                    "tabu_tenure must be at least 1".into(),
                ));
            }
            Box::new(TabuGenerator::new(direction, params.tabu_tenure))
        }
        GeneratorKind::Genetic => {
            if params.population_size < 2 {
                return Err(EngineError::Configuration(
                    "population_size must be at least 2".into(),
                ));
            }
            Box::new(PopulationGenerator::new(direction, params))
        }
        GeneratorKind::Ensemble => {
            if params.ensemble_members.is_empty() {
                return Err(EngineError::Configuration(
                    "ensemble roster must not be empty".into(),
                ));
            }
            if params.ensemble_members.contains(&GeneratorKind::Ensemble) {
                return Err(EngineError::Configuration(
                    "an ensemble may not contain another ensemble".into(),
                ));
            }
            let mut children = Vec::with_capacity(params.ensemble_members.len());
            for &member in &params.ensemble_members {
                children.push(build_generator(member, direction, params)?);
            }
            Box::new(EnsembleGenerator::new(direction, children)?)
        }
    };
    Ok(generator)
}
