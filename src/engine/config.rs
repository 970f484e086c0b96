//! Engine run configuration.

use crate::error::EngineError;
use crate::generators::{GeneratorKind, GeneratorParams};

/// Scheduled strategy hand-off: the active generator is swapped to `kind`
/// one iteration before `at_iteration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Handoff {
    pub at_iteration: u64,
    pub kind: GeneratorKind,
}

/// Configuration for an [`Engine`](super::Engine) run.
///
/// # Example
///
/// ```ignore
/// let config = EngineConfig::default()
///     .with_max_iterations(10_000)
///     .with_period_length(500)
///     .with_initial_generator(GeneratorKind::Ensemble)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Total iteration budget. Must be positive.
    pub max_iterations: u64,
    /// Iterations per offline-performance period. Must be positive.
    pub period_length: u64,
    /// Neighborhood size requested from the search operator per iteration.
    pub neighborhood_size: usize,
    /// Family of the generator active at iteration zero.
    pub initial_generator: GeneratorKind,
    /// Scheduled strategy hand-offs, strictly increasing by iteration.
    pub handoffs: Vec<Handoff>,
    /// Feed mid-period candidates of multi-objective problems into the
    /// dominance archive.
    pub track_archive: bool,
    /// Record per-iteration best/state histories in the run report.
    pub track_history: bool,
    /// RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Generator construction parameters.
    pub params: GeneratorParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            period_length: 100,
            neighborhood_size: 10,
            initial_generator: GeneratorKind::HillClimbing,
            handoffs: Vec::new(),
            track_archive: true,
            track_history: false,
            seed: None,
            params: GeneratorParams::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_period_length(mut self, n: u64) -> Self {
        self.period_length = n;
        self
    }

    pub fn with_neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }

    pub fn with_initial_generator(mut self, kind: GeneratorKind) -> Self {
        self.initial_generator = kind;
        self
    }

    pub fn with_handoff(mut self, at_iteration: u64, kind: GeneratorKind) -> Self {
        self.handoffs.push(Handoff { at_iteration, kind });
        self
    }

    pub fn with_track_archive(mut self, on: bool) -> Self {
        self.track_archive = on;
        self
    }

    pub fn with_track_history(mut self, on: bool) -> Self {
        self.track_history = on;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_params(mut self, params: GeneratorParams) -> Self {
        self.params = params;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_iterations == 0 {
            return Err(EngineError::Configuration(
                "max_iterations must be positive".into(),
            ));
        }
        if self.period_length == 0 {
            return Err(EngineError::Configuration(
                "period_length must be positive".into(),
            ));
        }
        if self.neighborhood_size == 0 {
            return Err(EngineError::Configuration(
                "neighborhood_size must be positive".into(),
            ));
        }
        if self.params.ensemble_members.contains(&GeneratorKind::Ensemble) {
            return Err(EngineError::Configuration(
                "an ensemble may not contain another ensemble".into(),
            ));
        }

        let mut previous = 0u64;
        for handoff in &self.handoffs {
            if handoff.at_iteration == 0 {
                return Err(EngineError::Configuration(
                    "handoff at_iteration must be positive".into(),
                ));
            }
            if handoff.at_iteration <= previous {
                return Err(EngineError::Configuration(
                    "handoffs must be strictly increasing by iteration".into(),
                ));
            }
            // Hand-offs fire in the mid-period branch only; a trigger
            // landing on a period boundary would never fire and would block
            // every later hand-off.
            let trigger = handoff.at_iteration - 1;
            if trigger > 0 && trigger % self.period_length == 0 {
                return Err(EngineError::Configuration(format!(
                    "handoff at iteration {} triggers on a period boundary",
                    handoff.at_iteration
                )));
            }
            previous = handoff.at_iteration;
        }
        Ok(())
    }
}
