//! Single-reference trajectory generator.
//!
//! One generator body covers the whole trajectory family: the search
//! character comes from the acceptance policy (hill climbing accepts only
//! non-worsening candidates, simulated annealing anneals, threshold
//! accepting tolerates a bounded worsening, random walk accepts anything).
//! Random search is the degenerate case that draws fresh random candidates
//! instead of perturbing the reference.

use rand::{Rng, RngCore};

use super::{Generator, GeneratorKind};
use crate::acceptance::{AcceptAnyone, AcceptancePolicy};
use crate::error::EngineError;
use crate::problem::{Codification, Problem, SearchOperator};
use crate::state::{Direction, State};

/// Trajectory search: one reference state plus an acceptance policy.
pub struct TrajectoryGenerator {
    kind: GeneratorKind,
    acceptance: Box<dyn AcceptancePolicy>,
    reference: Option<State>,
    fresh_random: bool,
}

impl TrajectoryGenerator {
    /// A trajectory generator that perturbs its reference through the
    /// neighborhood operator and consults `acceptance` on every candidate.
    pub fn new(kind: GeneratorKind, acceptance: Box<dyn AcceptancePolicy>) -> Self {
        Self {
            kind,
            acceptance,
            reference: None,
            fresh_random: false,
        }
    }

    /// Random search: fresh random candidates, every candidate accepted.
    pub fn random_search(_direction: Direction) -> Self {
        Self {
            kind: GeneratorKind::RandomSearch,
            acceptance: Box::new(AcceptAnyone),
            reference: None,
            fresh_random: true,
        }
    }
}

impl Generator for TrajectoryGenerator {
    fn kind(&self) -> GeneratorKind {
        self.kind
    }

    fn initialize(
        &mut self,
        initial: &State,
        _codification: &dyn Codification,
        _ops: &dyn SearchOperator,
        _problem: &dyn Problem,
        _rng: &mut dyn RngCore,
    ) -> Result<(), EngineError> {
        self.reference = Some(initial.clone());
        self.acceptance.reset();
        Ok(())
    }

    fn generate(
        &mut self,
        neighborhood_size: usize,
        _codification: &dyn Codification,
        ops: &dyn SearchOperator,
        rng: &mut dyn RngCore,
    ) -> Result<State, EngineError> {
        if self.fresh_random {
            let mut candidate = ops.random(1, rng).pop().ok_or_else(|| {
                EngineError::InvariantViolation(
                    "search operator produced no random state".into(),
                )
            })?;
            candidate.set_origin(self.kind);
            return Ok(candidate);
        }

        let reference = self.reference.as_ref().ok_or_else(|| {
            EngineError::InvariantViolation("generate called before initialize".into())
        })?;

        let mut neighbors = ops.neighbors(reference, neighborhood_size.max(1), rng);
        if neighbors.is_empty() {
            return Err(EngineError::InvariantViolation(
                "search operator produced an empty neighborhood".into(),
            ));
        }

        let idx = rng.random_range(0..neighbors.len());
        let mut candidate = neighbors.swap_remove(idx);
        candidate.set_origin(self.kind);
        Ok(candidate)
    }

    fn update_reference(&mut self, candidate: &State, _iteration: u64, rng: &mut dyn RngCore) {
        match &self.reference {
            None => self.reference = Some(candidate.clone()),
            Some(current) => {
                if self.acceptance.accept(current, candidate, rng) {
                    self.reference = Some(candidate.clone());
                }
            }
        }
    }

    fn reference(&self) -> Option<&State> {
        self.reference.as_ref()
    }

    fn reference_list(&self) -> &[State] {
        match &self.reference {
            Some(reference) => std::slice::from_ref(reference),
            None => &[],
        }
    }

    fn reevaluate(&mut self, problem: &dyn Problem) {
        if let Some(reference) = &mut self.reference {
            problem.evaluate(reference);
        }
    }

    fn reset(&mut self) {
        self.reference = None;
        self.acceptance.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acceptance::AcceptanceKind;
    use crate::testutil::{evaluated, BoxCodification, PerturbOperator, SphereProblem};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn harness() -> (SphereProblem, BoxCodification, PerturbOperator, StdRng) {
        (
            SphereProblem { dim: 3 },
            BoxCodification::new(3, -5.0, 5.0),
            PerturbOperator::new(3, -5.0, 5.0, 0.5),
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_hill_climbing_reference_never_worsens() {
        let (problem, codification, ops, mut rng) = harness();
        let direction = Direction::Minimize;
        let mut generator = TrajectoryGenerator::new(
            GeneratorKind::HillClimbing,
            AcceptanceKind::Best.build(direction),
        );

        let mut initial = ops.random(1, &mut rng).pop().unwrap();
        problem.evaluate(&mut initial);
        generator
            .initialize(&initial, &codification, &ops, &problem, &mut rng)
            .unwrap();

        let mut previous = generator.reference().unwrap().last_objective();
        for i in 0..200 {
            let mut candidate = generator
                .generate(5, &codification, &ops, &mut rng)
                .unwrap();
            problem.evaluate(&mut candidate);
            generator.update_reference(&candidate, i, &mut rng);

            let now = generator.reference().unwrap().last_objective();
            assert!(now <= previous, "hill climbing worsened: {previous} -> {now}");
            previous = now;
        }
    }

    #[test]
    fn test_candidate_is_tagged_with_family() {
        let (problem, codification, ops, mut rng) = harness();
        let mut generator = TrajectoryGenerator::new(
            GeneratorKind::SimulatedAnnealing,
            AcceptanceKind::NotBadT.build(Direction::Minimize),
        );
        let mut initial = ops.random(1, &mut rng).pop().unwrap();
        problem.evaluate(&mut initial);
        generator
            .initialize(&initial, &codification, &ops, &problem, &mut rng)
            .unwrap();

        let candidate = generator
            .generate(5, &codification, &ops, &mut rng)
            .unwrap();
        assert_eq!(candidate.origin(), GeneratorKind::SimulatedAnnealing);
    }

    #[test]
    fn test_generate_does_not_mutate_reference() {
        let (problem, codification, ops, mut rng) = harness();
        let mut generator = TrajectoryGenerator::new(
            GeneratorKind::HillClimbing,
            AcceptanceKind::Best.build(Direction::Minimize),
        );
        let mut initial = ops.random(1, &mut rng).pop().unwrap();
        problem.evaluate(&mut initial);
        generator
            .initialize(&initial, &codification, &ops, &problem, &mut rng)
            .unwrap();

        let before = generator.reference().unwrap().clone();
        let _ = generator.generate(5, &codification, &ops, &mut rng).unwrap();
        assert_eq!(generator.reference().unwrap(), &before);
    }

    #[test]
    fn test_generate_before_initialize_is_invariant_violation() {
        let (_, codification, ops, mut rng) = harness();
        let mut generator = TrajectoryGenerator::new(
            GeneratorKind::HillClimbing,
            AcceptanceKind::Best.build(Direction::Minimize),
        );
        let err = generator
            .generate(5, &codification, &ops, &mut rng)
            .expect_err("unseeded trajectory must fail");
        assert!(matches!(err, EngineError::InvariantViolation(_)));
    }

    #[test]
    fn test_random_search_ignores_reference() {
        let (problem, codification, ops, mut rng) = harness();
        let mut generator = TrajectoryGenerator::random_search(Direction::Minimize);
        generator
            .initialize(
                &evaluated(vec![0.0, 0.0, 0.0], vec![0.0]),
                &codification,
                &ops,
                &problem,
                &mut rng,
            )
            .unwrap();

        let candidate = generator
            .generate(5, &codification, &ops, &mut rng)
            .unwrap();
        assert_eq!(candidate.origin(), GeneratorKind::RandomSearch);
        assert_ne!(candidate.code(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reevaluate_refreshes_reference() {
        let (problem, codification, ops, mut rng) = harness();
        let mut generator = TrajectoryGenerator::new(
            GeneratorKind::HillClimbing,
            AcceptanceKind::Best.build(Direction::Minimize),
        );
        let mut stale = evaluated(vec![1.0, 1.0, 1.0], vec![999.0]);
        stale.set_evaluation(vec![999.0]);
        generator
            .initialize(&stale, &codification, &ops, &problem, &mut rng)
            .unwrap();

        generator.reevaluate(&problem);
        assert!((generator.reference().unwrap().last_objective() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_reference() {
        let (problem, codification, ops, mut rng) = harness();
        let mut generator = TrajectoryGenerator::random_search(Direction::Minimize);
        generator
            .initialize(
                &evaluated(vec![0.0, 0.0, 0.0], vec![0.0]),
                &codification,
                &ops,
                &problem,
                &mut rng,
            )
            .unwrap();
        generator.reset();
        assert!(generator.reference().is_none());
        assert!(generator.reference_list().is_empty());
    }
}
