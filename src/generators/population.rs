//! Population generator.
//!
//! Maintains a fixed-size reference list and performs one reproduction step
//! per call: selection → variation (crossover, mutation) → replacement. The
//! concrete roles are pluggable (see [`operators`](super::operators)); this
//! body only wires them together, so genetic algorithms, evolution
//! strategies, and similar families differ purely in role choice.

use rand::RngCore;

use super::operators::{CrossoverOp, MutationOp, ReplacementOp, SelectionOp};
use super::{Generator, GeneratorKind, GeneratorParams};
use crate::error::EngineError;
use crate::problem::{Codification, Problem, SearchOperator};
use crate::state::{Direction, State};

/// Population-based search with pluggable reproduction roles.
pub struct PopulationGenerator {
    direction: Direction,
    size: usize,
    population: Vec<State>,
    selection: Box<dyn SelectionOp>,
    crossover: Box<dyn CrossoverOp>,
    mutation: Box<dyn MutationOp>,
    replacement: Box<dyn ReplacementOp>,
    crossover_rate: f64,
    mutation_rate: f64,
}

impl PopulationGenerator {
    pub fn new(direction: Direction, params: &GeneratorParams) -> Self {
        Self {
            direction,
            size: params.population_size,
            population: Vec::new(),
            selection: params.selection.build(),
            crossover: params.crossover.build(),
            mutation: params.mutation.build(),
            replacement: params.replacement.build(),
            crossover_rate: params.crossover_rate,
            mutation_rate: params.mutation_rate,
        }
    }

    fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, member) in self.population.iter().enumerate() {
            match best {
                None => best = Some(i),
                Some(b) => {
                    if self
                        .direction
                        .better(member.last_objective(), self.population[b].last_objective())
                    {
                        best = Some(i);
                    }
                }
            }
        }
        best
    }
}

impl Generator for PopulationGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Genetic
    }

    fn initialize(
        &mut self,
        initial: &State,
        _codification: &dyn Codification,
        ops: &dyn SearchOperator,
        problem: &dyn Problem,
        rng: &mut dyn RngCore,
    ) -> Result<(), EngineError> {
        self.population.clear();
        self.population.push(initial.clone());

        // Top up to the invariant size with evaluated random states.
        let missing = self.size.saturating_sub(1);
        let mut fill = ops.random(missing, rng);
        if fill.len() < missing {
            return Err(EngineError::InvariantViolation(format!(
                "search operator produced {} of {} requested random states",
                fill.len(),
                missing
            )));
        }
        for member in &mut fill {
            member.set_origin(GeneratorKind::Genetic);
            problem.evaluate(member);
        }
        self.population.append(&mut fill);
        Ok(())
    }

    fn generate(
        &mut self,
        _neighborhood_size: usize,
        codification: &dyn Codification,
        _ops: &dyn SearchOperator,
        rng: &mut dyn RngCore,
    ) -> Result<State, EngineError> {
        if self.population.is_empty() {
            return Err(EngineError::InvariantViolation(
                "generate called before initialize".into(),
            ));
        }

        let p1 = self.selection.pick(&self.population, self.direction, rng);
        let p2 = self.selection.pick(&self.population, self.direction, rng);

        // Rate draws come from the codification's key stream.
        let mut code = if codification.random_key(rng) < self.crossover_rate {
            self.crossover
                .recombine(&self.population[p1], &self.population[p2], rng)
        } else {
            self.population[p1].code().to_vec()
        };

        let mut premutation = None;
        if codification.random_key(rng) < self.mutation_rate {
            premutation = Some(code.clone());
            self.mutation.mutate(&mut code, codification, rng);
        }

        let mut offspring = State::new(code);
        // A mutation that leaves the domain is discarded, not repaired.
        if let Some(backup) = premutation {
            if !codification.is_valid(&offspring) {
                offspring = State::new(backup);
            }
        }
        offspring.set_origin(GeneratorKind::Genetic);
        Ok(offspring)
    }

    fn update_reference(&mut self, candidate: &State, _iteration: u64, _rng: &mut dyn RngCore) {
        self.replacement
            .replace(&mut self.population, candidate, self.direction);
    }

    fn reference(&self) -> Option<&State> {
        self.best_index().map(|i| &self.population[i])
    }

    fn reference_list(&self) -> &[State] {
        &self.population
    }

    fn reevaluate(&mut self, problem: &dyn Problem) {
        for member in &mut self.population {
            problem.evaluate(member);
        }
    }

    fn reset(&mut self) {
        self.population.clear();
    }
}
