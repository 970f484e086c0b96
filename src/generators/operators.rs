//! Reproduction roles for population generators.
//!
//! Selection, crossover, mutation, and replacement are separate capability
//! traits with kind-tag registries, so callers can plug domain-specific
//! variants without touching the population loop. The built-in variants are
//! deliberately generic over numeric decision vectors.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::{Rng, RngCore};

use crate::problem::Codification;
use crate::state::{Direction, State};

/// Chooses a parent index from the reference list.
pub trait SelectionOp {
    fn pick(&self, population: &[State], direction: Direction, rng: &mut dyn RngCore) -> usize;
}

/// Recombines two parents into one child decision vector.
pub trait CrossoverOp {
    fn recombine(&self, a: &State, b: &State, rng: &mut dyn RngCore) -> Vec<f64>;
}

/// Perturbs a decision vector in place.
pub trait MutationOp {
    fn mutate(&self, code: &mut [f64], codification: &dyn Codification, rng: &mut dyn RngCore);
}

/// Folds one evaluated offspring back into the reference list, keeping its
/// size invariant.
pub trait ReplacementOp {
    fn replace(&self, population: &mut [State], offspring: &State, direction: Direction);
}

/// Selection variant tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionKind {
    /// Pick `k` at random, keep the best. Higher `k` = stronger pressure.
    Tournament(usize),
    /// Quality-proportionate roulette over the last objective.
    Roulette,
}

impl SelectionKind {
    pub fn build(self) -> Box<dyn SelectionOp> {
        match self {
            SelectionKind::Tournament(k) => Box::new(TournamentSelection { k }),
            SelectionKind::Roulette => Box::new(RouletteSelection),
        }
    }
}

/// Crossover variant tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossoverKind {
    /// Each gene copied from either parent with equal probability.
    Uniform,
    /// Convex blend `alpha * a + (1 - alpha) * b` with random `alpha`.
    Arithmetic,
}

impl CrossoverKind {
    pub fn build(self) -> Box<dyn CrossoverOp> {
        match self {
            CrossoverKind::Uniform => Box::new(UniformCrossover),
            CrossoverKind::Arithmetic => Box::new(ArithmeticCrossover),
        }
    }
}

/// Mutation variant tags.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationKind {
    /// Each gene redrawn from the codification with the given probability.
    RandomReset(f64),
}

impl MutationKind {
    pub fn build(self) -> Box<dyn MutationOp> {
        match self {
            MutationKind::RandomReset(rate) => Box::new(RandomResetMutation { rate }),
        }
    }
}

/// Replacement variant tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReplacementKind {
    /// Unconditionally overwrite the worst member.
    ReplaceWorst,
    /// Overwrite the worst member only when the offspring beats it.
    ReplaceWorstIfBetter,
}

impl ReplacementKind {
    pub fn build(self) -> Box<dyn ReplacementOp> {
        match self {
            ReplacementKind::ReplaceWorst => Box::new(ReplaceWorst { only_if_better: false }),
            ReplacementKind::ReplaceWorstIfBetter => {
                Box::new(ReplaceWorst { only_if_better: true })
            }
        }
    }
}

struct TournamentSelection {
    k: usize,
}

impl SelectionOp for TournamentSelection {
    fn pick(&self, population: &[State], direction: Direction, rng: &mut dyn RngCore) -> usize {
        let n = population.len();
        let mut best = rng.random_range(0..n);
        for _ in 1..self.k.max(1) {
            let idx = rng.random_range(0..n);
            if direction.better(
                population[idx].last_objective(),
                population[best].last_objective(),
            ) {
                best = idx;
            }
        }
        best
    }
}

struct RouletteSelection;

impl SelectionOp for RouletteSelection {
    fn pick(&self, population: &[State], direction: Direction, rng: &mut dyn RngCore) -> usize {
        let n = population.len();
        if n == 1 {
            return 0;
        }

        let objectives: Vec<f64> = population.iter().map(|s| s.last_objective()).collect();

        // Shift so the worst member still gets a sliver of probability.
        let epsilon = 1e-10;
        let weights: Vec<f64> = match direction {
            Direction::Maximize => {
                let min = objectives.iter().cloned().fold(f64::INFINITY, f64::min);
                objectives.iter().map(|&f| (f - min + epsilon).max(epsilon)).collect()
            }
            Direction::Minimize => {
                let max = objectives.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                objectives.iter().map(|&f| (max - f + epsilon).max(epsilon)).collect()
            }
        };

        let total: f64 = weights.iter().sum();
        if !(total > 0.0) {
            // Degenerate weights: fall back to a uniform draw.
            return rng.random_range(0..n);
        }

        let threshold = rng.random_range(0.0..total);
        let mut cumulative = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            cumulative += w;
            if cumulative > threshold {
                return i;
            }
        }
        n - 1 // floating-point fallthrough
    }
}

struct UniformCrossover;

impl CrossoverOp for UniformCrossover {
    fn recombine(&self, a: &State, b: &State, rng: &mut dyn RngCore) -> Vec<f64> {
        a.code()
            .iter()
            .zip(b.code().iter())
            .map(|(&x, &y)| if rng.random_bool(0.5) { x } else { y })
            .collect()
    }
}

struct ArithmeticCrossover;

impl CrossoverOp for ArithmeticCrossover {
    fn recombine(&self, a: &State, b: &State, rng: &mut dyn RngCore) -> Vec<f64> {
        let alpha = rng.random_range(0.0..1.0);
        a.code()
            .iter()
            .zip(b.code().iter())
            .map(|(&x, &y)| alpha * x + (1.0 - alpha) * y)
            .collect()
    }
}

struct RandomResetMutation {
    rate: f64,
}

impl MutationOp for RandomResetMutation {
    fn mutate(&self, code: &mut [f64], codification: &dyn Codification, rng: &mut dyn RngCore) {
        for (index, gene) in code.iter_mut().enumerate() {
            if rng.random_range(0.0..1.0) < self.rate {
                *gene = codification.random_value(index, rng);
            }
        }
    }
}

struct ReplaceWorst {
    only_if_better: bool,
}

impl ReplacementOp for ReplaceWorst {
    fn replace(&self, population: &mut [State], offspring: &State, direction: Direction) {
        if population.is_empty() {
            return;
        }

        let mut worst = 0;
        for i in 1..population.len() {
            if direction.better(
                population[worst].last_objective(),
                population[i].last_objective(),
            ) {
                worst = i;
            }
        }

        if !self.only_if_better
            || direction.better(
                offspring.last_objective(),
                population[worst].last_objective(),
            )
        {
            population[worst] = offspring.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{evaluated, BoxCodification};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population() -> Vec<State> {
        vec![
            evaluated(vec![0.0], vec![1.0]),
            evaluated(vec![1.0], vec![5.0]),
            evaluated(vec![2.0], vec![3.0]),
        ]
    }

    #[test]
    fn test_tournament_prefers_better_members() {
        let pop = population();
        let selection = SelectionKind::Tournament(3).build();
        let mut rng = StdRng::seed_from_u64(1);

        let mut hits = vec![0usize; pop.len()];
        for _ in 0..500 {
            hits[selection.pick(&pop, Direction::Maximize, &mut rng)] += 1;
        }
        // Index 1 holds 5.0, the best under Maximize.
        assert!(hits[1] > hits[0]);
        assert!(hits[1] > hits[2]);
    }

    #[test]
    fn test_roulette_degenerate_weights_fall_back_to_uniform() {
        let pop = vec![
            evaluated(vec![0.0], vec![2.0]),
            evaluated(vec![1.0], vec![2.0]),
        ];
        let selection = SelectionKind::Roulette.build();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let idx = selection.pick(&pop, Direction::Minimize, &mut rng);
            assert!(idx < 2);
        }
    }

    #[test]
    fn test_uniform_crossover_draws_genes_from_parents() {
        let a = evaluated(vec![1.0, 1.0, 1.0, 1.0], vec![0.0]);
        let b = evaluated(vec![2.0, 2.0, 2.0, 2.0], vec![0.0]);
        let crossover = CrossoverKind::Uniform.build();
        let mut rng = StdRng::seed_from_u64(3);

        let child = crossover.recombine(&a, &b, &mut rng);
        assert_eq!(child.len(), 4);
        assert!(child.iter().all(|&g| g == 1.0 || g == 2.0));
    }

    #[test]
    fn test_arithmetic_crossover_stays_in_hull() {
        let a = evaluated(vec![0.0, 10.0], vec![0.0]);
        let b = evaluated(vec![10.0, 0.0], vec![0.0]);
        let crossover = CrossoverKind::Arithmetic.build();
        let mut rng = StdRng::seed_from_u64(4);

        let child = crossover.recombine(&a, &b, &mut rng);
        assert!(child.iter().all(|&g| (0.0..=10.0).contains(&g)));
    }

    #[test]
    fn test_random_reset_mutation_respects_bounds() {
        let codification = BoxCodification::new(5, -1.0, 1.0);
        let mutation = MutationKind::RandomReset(1.0).build();
        let mut rng = StdRng::seed_from_u64(5);

        let mut code = vec![100.0; 5];
        mutation.mutate(&mut code, &codification, &mut rng);
        assert!(code.iter().all(|&g| (-1.0..1.0).contains(&g)));
    }

    #[test]
    fn test_replace_worst_unconditional() {
        let mut pop = population();
        let replacement = ReplacementKind::ReplaceWorst.build();
        let offspring = evaluated(vec![9.0], vec![100.0]);

        // Under Minimize, the worst member holds 5.0 (index 1); it is
        // replaced even though the offspring is worse still.
        replacement.replace(&mut pop, &offspring, Direction::Minimize);
        assert_eq!(pop[1].evaluation(), [100.0]);
    }

    #[test]
    fn test_replace_worst_if_better_keeps_worse_offspring_out() {
        let mut pop = population();
        let replacement = ReplacementKind::ReplaceWorstIfBetter.build();

        replacement.replace(&mut pop, &evaluated(vec![9.0], vec![100.0]), Direction::Minimize);
        assert!(pop.iter().all(|s| s.evaluation() != [100.0]));

        replacement.replace(&mut pop, &evaluated(vec![9.0], vec![2.0]), Direction::Minimize);
        assert!(pop.iter().any(|s| s.evaluation() == [2.0]));
    }
}
