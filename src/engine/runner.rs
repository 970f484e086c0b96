//! Orchestration loop.
//!
//! Drives the search from one evaluated random state to the iteration
//! budget: per iteration the active generator produces a candidate, the
//! problem evaluates it, the generator consumes it, and the engine updates
//! the running best. Period boundaries (`period_length`) sample offline
//! performance and re-evaluate stored references so drifting objectives
//! propagate into the search; mid-period iterations feed multi-objective
//! candidates into the dominance archive and apply scheduled strategy
//! hand-offs.

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::EngineConfig;
use crate::archive::ParetoArchive;
use crate::error::EngineError;
use crate::generators::{build_generator, GeneratorKind, PERIOD_BUCKETS};
use crate::problem::{Codification, Problem, SearchOperator};
use crate::state::State;

/// Sub-period flushes fire every `stride` iterations and always at period
/// boundaries — the truncated stride misses the boundary itself when the
/// period length is not a multiple of the bucket count.
fn is_flush_point(current: u64, period_length: u64, stride: u64) -> bool {
    current > 0 && (current % period_length == 0 || current % stride == 0)
}

/// Engine lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Initialized,
    Running,
    Terminated,
}

/// Outcome of one engine run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Best state found, by the last objective under the problem direction.
    pub best: State,
    /// The best state's last objective value.
    pub best_objective: f64,
    /// Iterations executed.
    pub iterations: u64,
    /// One offline-performance sample per elapsed period, plus a final
    /// sample for the trailing partial period.
    pub offline_performance: Vec<f64>,
    /// Non-dominated set gathered during the run (multi-objective runs).
    pub archive: ParetoArchive,
    /// Per-iteration best snapshots, when history tracking is on.
    pub best_history: Vec<State>,
    /// Per-iteration candidate states, when history tracking is on.
    pub state_history: Vec<State>,
}

/// Strategy orchestrator.
///
/// One engine instance drives one run at a time; after a run terminates it
/// must be [`reset`](Engine::reset) before being reused.
pub struct Engine {
    config: EngineConfig,
    phase: Phase,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Idle,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the engine to [`Phase::Idle`] so it can run again.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Executes the full search loop.
    pub fn run(
        &mut self,
        problem: &dyn Problem,
        codification: &dyn Codification,
        ops: &dyn SearchOperator,
    ) -> Result<RunReport, EngineError> {
        if self.phase == Phase::Terminated {
            return Err(EngineError::Configuration(
                "engine already terminated; call reset() before running again".into(),
            ));
        }
        self.config.validate()?;

        let direction = problem.direction();
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        // One evaluated random state seeds both the running best and the
        // generator reference.
        let mut initial = ops.random(1, &mut rng).pop().ok_or_else(|| {
            EngineError::InvariantViolation("search operator produced no initial state".into())
        })?;
        initial.set_origin(GeneratorKind::RandomSearch);
        if initial.code().len() != codification.variable_count() {
            return Err(EngineError::InvariantViolation(format!(
                "search operator produced a state of {} variables, codification expects {}",
                initial.code().len(),
                codification.variable_count()
            )));
        }
        problem.evaluate(&mut initial);

        let mut generator =
            build_generator(self.config.initial_generator, direction, &self.config.params)?;
        generator.initialize(&initial, codification, ops, problem, &mut rng)?;
        self.phase = Phase::Initialized;

        debug!(
            "run start: {:?} generator, {} iterations, period {}",
            self.config.initial_generator, self.config.max_iterations, self.config.period_length
        );

        let mut best = initial;
        let mut archive = ParetoArchive::new(direction);
        let multi_objective = problem.objective_count() > 1;
        let subperiod = (self.config.period_length / PERIOD_BUCKETS as u64).max(1);

        let mut running_best_sum = 0.0;
        let mut offline_performance = Vec::new();
        let mut best_history = Vec::new();
        let mut state_history = Vec::new();
        let mut pending_handoffs = self.config.handoffs.iter();
        let mut next_handoff = pending_handoffs.next();
        let mut sequence = 0u64;

        self.phase = Phase::Running;
        for current in 0..self.config.max_iterations {
            if is_flush_point(current, self.config.period_length, subperiod) {
                generator.on_subperiod(&mut rng);
            }
            generator.begin_iteration(&mut rng);

            let boundary = current > 0 && current % self.config.period_length == 0;
            if boundary {
                offline_performance.push(running_best_sum / self.config.period_length as f64);
                running_best_sum = 0.0;
                // The objective may have drifted since the last period.
                generator.reevaluate(problem);
                trace!("period boundary at iteration {current}");
            }

            let mut candidate =
                generator.generate(self.config.neighborhood_size, codification, ops, &mut rng)?;
            problem.evaluate(&mut candidate);
            sequence += 1;
            candidate.set_sequence(sequence);

            if !boundary && multi_objective && self.config.track_archive {
                archive.bootstrap(&best);
                archive.insert(&candidate);
            }

            generator.update_reference(&candidate, current, &mut rng);

            if !boundary {
                if let Some(handoff) = next_handoff {
                    if current == handoff.at_iteration - 1 {
                        debug!(
                            "hand-off to {:?} at iteration {current}",
                            handoff.kind
                        );
                        generator =
                            build_generator(handoff.kind, direction, &self.config.params)?;
                        generator.initialize(&best, codification, ops, problem, &mut rng)?;
                        next_handoff = pending_handoffs.next();
                    }
                }
            }

            if direction.better(candidate.last_objective(), best.last_objective()) {
                best = candidate.clone();
            }
            running_best_sum += best.first_objective();

            if self.config.track_history {
                best_history.push(best.clone());
                state_history.push(candidate);
            }
        }

        offline_performance.push(running_best_sum / self.config.period_length as f64);
        self.phase = Phase::Terminated;

        debug!("run done: best objective {}", best.last_objective());

        Ok(RunReport {
            best_objective: best.last_objective(),
            best,
            iterations: self.config.max_iterations,
            offline_performance,
            archive,
            best_history,
            state_history,
        })
    }
}
