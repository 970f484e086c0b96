//! Error taxonomy for the search engine.
//!
//! Two fatal kinds propagate out of [`Engine::run`](crate::engine::Engine::run):
//!
//! - [`EngineError::Configuration`]: unknown variant tags, invalid
//!   parameters, missing wiring. Not retried.
//! - [`EngineError::InvariantViolation`]: a programming defect — a generator
//!   produced no candidate, an ensemble has no active sub-generator, a
//!   problem returned an empty evaluation vector.
//!
//! One recoverable condition, [`NeighborhoodExhausted`], is raised when every
//! candidate neighbor is disallowed (all tabu). It is handled internally by
//! bounded neighborhood regeneration and only surfaces — escalated to
//! [`EngineError::Configuration`] — when the retry bound is exceeded.

use thiserror::Error;

/// Fatal errors aborting a run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unknown or invalid configuration: unregistered variant names,
    /// out-of-range parameters, missing collaborators, or a recoverable
    /// condition whose retry bound was exceeded.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A broken internal invariant, signalling a programming defect rather
    /// than a bad input.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// All candidate neighbors are currently disallowed (e.g. every neighbor is
/// tabu). Recoverable: the caller regenerates a fresh neighborhood from the
/// current reference and retries, bounded to avoid infinite recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("all candidate neighbors are disallowed")]
pub struct NeighborhoodExhausted;
