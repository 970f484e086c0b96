//! Acceptance policies for trajectory-style searches.
//!
//! An [`AcceptancePolicy`] decides whether a newly generated candidate
//! replaces the current reference solution. Policies take `&mut self`
//! because the annealed variants advance a temperature schedule per call and
//! the dominance-based variants maintain an internal reference archive.
//!
//! Scalar comparisons use the last objective value, matching the engine's
//! best-state bookkeeping.
//!
//! # References
//!
//! Kirkpatrick et al. (1983), "Optimization by Simulated Annealing",
//! *Science* 220(4598), 671-680 — the Metropolis criterion behind
//! [`AcceptNotBadT`].

use rand::{Rng, RngCore};

use crate::archive::{non_dominated_sort, ParetoArchive};
use crate::state::{Direction, State};

/// Variant tags for the acceptance-policy registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AcceptanceKind {
    /// Accept every candidate.
    Anyone,
    /// Accept iff at least as good as the current reference.
    Best,
    /// Alias of `Best` in decision rule; kept as a distinct tag for
    /// provenance and configuration compatibility.
    NotBad,
    /// Metropolis acceptance with a geometric temperature schedule.
    NotBadT,
    /// Accept iff the signed worsening stays within a threshold.
    NotBadU,
    /// Accept iff not dominated by the internal reference archive.
    NotDominated,
    /// Rank-based annealed acceptance against the reference archive.
    Multicase,
}

impl AcceptanceKind {
    /// Builds a policy instance with default parameters.
    pub fn build(self, direction: Direction) -> Box<dyn AcceptancePolicy> {
        match self {
            AcceptanceKind::Anyone => Box::new(AcceptAnyone),
            AcceptanceKind::Best => Box::new(AcceptNotBad::new(direction, AcceptanceKind::Best)),
            AcceptanceKind::NotBad => {
                Box::new(AcceptNotBad::new(direction, AcceptanceKind::NotBad))
            }
            AcceptanceKind::NotBadT => Box::new(AcceptNotBadT::new(direction, 100.0, 0.95)),
            AcceptanceKind::NotBadU => Box::new(AcceptNotBadU::new(direction, 0.1)),
            AcceptanceKind::NotDominated => Box::new(AcceptNotDominated::new(direction)),
            AcceptanceKind::Multicase => Box::new(AcceptMulticase::new(direction, 100.0, 0.95)),
        }
    }
}

/// Decides whether a candidate replaces the current reference.
pub trait AcceptancePolicy {
    /// The variant tag of this policy.
    fn kind(&self) -> AcceptanceKind;

    /// `true` iff `candidate` should replace `current`.
    fn accept(&mut self, current: &State, candidate: &State, rng: &mut dyn RngCore) -> bool;

    /// Clears accumulated state (temperature schedules, reference archives)
    /// for a fresh run.
    fn reset(&mut self) {}
}

/// Always accepts — random-walk behavior.
#[derive(Debug, Clone, Copy)]
pub struct AcceptAnyone;

impl AcceptancePolicy for AcceptAnyone {
    fn kind(&self) -> AcceptanceKind {
        AcceptanceKind::Anyone
    }

    fn accept(&mut self, _current: &State, _candidate: &State, _rng: &mut dyn RngCore) -> bool {
        true
    }
}

/// Accepts candidates at least as good as the current reference.
///
/// Backs both the `Best` and `NotBad` tags, which share this decision rule.
#[derive(Debug, Clone, Copy)]
pub struct AcceptNotBad {
    direction: Direction,
    kind: AcceptanceKind,
}

impl AcceptNotBad {
    pub fn new(direction: Direction, kind: AcceptanceKind) -> Self {
        Self { direction, kind }
    }
}

impl AcceptancePolicy for AcceptNotBad {
    fn kind(&self) -> AcceptanceKind {
        self.kind
    }

    fn accept(&mut self, current: &State, candidate: &State, _rng: &mut dyn RngCore) -> bool {
        self.direction
            .better_or_equal(candidate.last_objective(), current.last_objective())
    }
}

/// Simulated-annealing acceptance: at least as good, or with probability
/// `exp(gap / T)` where `gap` is the signed improvement (negative for a
/// worsening). Temperature cools geometrically after every decision.
#[derive(Debug, Clone, Copy)]
pub struct AcceptNotBadT {
    direction: Direction,
    initial_temperature: f64,
    temperature: f64,
    cooling: f64,
}

impl AcceptNotBadT {
    pub fn new(direction: Direction, temperature: f64, cooling: f64) -> Self {
        Self {
            direction,
            initial_temperature: temperature,
            temperature,
            cooling,
        }
    }

    /// Current temperature of the schedule.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

impl AcceptancePolicy for AcceptNotBadT {
    fn kind(&self) -> AcceptanceKind {
        AcceptanceKind::NotBadT
    }

    fn accept(&mut self, current: &State, candidate: &State, rng: &mut dyn RngCore) -> bool {
        let gap = match self.direction {
            Direction::Maximize => candidate.last_objective() - current.last_objective(),
            Direction::Minimize => current.last_objective() - candidate.last_objective(),
        };

        let accepted = if gap >= 0.0 {
            true
        } else if self.temperature > 0.0 {
            let probability = (gap / self.temperature).exp();
            rng.random_range(0.0..1.0) < probability
        } else {
            false
        };

        self.temperature *= self.cooling;
        accepted
    }

    fn reset(&mut self) {
        self.temperature = self.initial_temperature;
    }
}

/// Threshold accepting: the signed worsening of the candidate relative to
/// the current reference must stay within `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct AcceptNotBadU {
    direction: Direction,
    threshold: f64,
}

impl AcceptNotBadU {
    pub fn new(direction: Direction, threshold: f64) -> Self {
        Self { direction, threshold }
    }
}

impl AcceptancePolicy for AcceptNotBadU {
    fn kind(&self) -> AcceptanceKind {
        AcceptanceKind::NotBadU
    }

    fn accept(&mut self, current: &State, candidate: &State, _rng: &mut dyn RngCore) -> bool {
        let worsening = match self.direction {
            Direction::Maximize => current.last_objective() - candidate.last_objective(),
            Direction::Minimize => candidate.last_objective() - current.last_objective(),
        };
        worsening <= self.threshold
    }
}

/// Accepts candidates the internal reference archive does not dominate.
///
/// Delegates to the archive insertion procedure: a dominated or duplicate
/// candidate is rejected, an inserted one is accepted. The archive is
/// bootstrapped from `current` on first use.
#[derive(Debug, Clone)]
pub struct AcceptNotDominated {
    archive: ParetoArchive,
}

impl AcceptNotDominated {
    pub fn new(direction: Direction) -> Self {
        Self {
            archive: ParetoArchive::new(direction),
        }
    }

    /// The reference archive accumulated by this policy.
    pub fn archive(&self) -> &ParetoArchive {
        &self.archive
    }
}

impl AcceptancePolicy for AcceptNotDominated {
    fn kind(&self) -> AcceptanceKind {
        AcceptanceKind::NotDominated
    }

    fn accept(&mut self, current: &State, candidate: &State, _rng: &mut dyn RngCore) -> bool {
        self.archive.bootstrap(current);
        self.archive.insert(candidate)
    }

    fn reset(&mut self) {
        self.archive.clear();
    }
}

/// Rank-based annealed acceptance.
///
/// The candidate's dominance rank and domination count are computed against
/// the reference archive plus the current state. Acceptance probability is 1
/// when the candidate dominates any archive member or achieves a rank no
/// worse than the current state's; otherwise a Boltzmann probability
/// `exp(-delta / T)` over the mean normalized per-objective worsening, with
/// a geometric temperature schedule. Accepted candidates are offered to the
/// reference archive.
#[derive(Debug, Clone)]
pub struct AcceptMulticase {
    direction: Direction,
    archive: ParetoArchive,
    initial_temperature: f64,
    temperature: f64,
    cooling: f64,
}

impl AcceptMulticase {
    pub fn new(direction: Direction, temperature: f64, cooling: f64) -> Self {
        Self {
            direction,
            archive: ParetoArchive::new(direction),
            initial_temperature: temperature,
            temperature,
            cooling,
        }
    }

    /// The reference archive accumulated by this policy.
    pub fn archive(&self) -> &ParetoArchive {
        &self.archive
    }

    /// Mean normalized per-objective worsening of `candidate` vs `current`;
    /// improvements contribute zero.
    fn normalized_worsening(&self, current: &State, candidate: &State) -> f64 {
        let cur = current.evaluation();
        let cand = candidate.evaluation();
        if cur.is_empty() || cur.len() != cand.len() {
            return 0.0;
        }

        let mut total = 0.0;
        for (&c, &x) in cur.iter().zip(cand.iter()) {
            let worsening = match self.direction {
                Direction::Maximize => c - x,
                Direction::Minimize => x - c,
            };
            let denom = c.abs().max(1e-12);
            total += (worsening / denom).max(0.0);
        }
        total / cur.len() as f64
    }
}

impl AcceptancePolicy for AcceptMulticase {
    fn kind(&self) -> AcceptanceKind {
        AcceptanceKind::Multicase
    }

    fn accept(&mut self, current: &State, candidate: &State, rng: &mut dyn RngCore) -> bool {
        self.archive.bootstrap(current);

        let domination_count = self
            .archive
            .members()
            .iter()
            .filter(|m| {
                crate::archive::dominates(candidate.evaluation(), m.evaluation(), self.direction)
            })
            .count();

        // Rank the archive, the current state, and the candidate together.
        let mut objectives: Vec<&[f64]> = self
            .archive
            .members()
            .iter()
            .map(|m| m.evaluation())
            .collect();
        let current_idx = objectives.len();
        objectives.push(current.evaluation());
        let candidate_idx = objectives.len();
        objectives.push(candidate.evaluation());

        let sorted = non_dominated_sort(&objectives, self.direction);
        let candidate_rank = sorted.ranks[candidate_idx];
        let current_rank = sorted.ranks[current_idx];

        let probability = if domination_count > 0 || candidate_rank <= current_rank {
            1.0
        } else if self.temperature > 0.0 {
            let delta = self.normalized_worsening(current, candidate);
            (-delta / self.temperature).exp()
        } else {
            0.0
        };

        self.temperature *= self.cooling;

        let accepted = probability >= 1.0 || rng.random_range(0.0..1.0) < probability;
        if accepted {
            self.archive.insert(candidate);
        }
        accepted
    }

    fn reset(&mut self) {
        self.archive.clear();
        self.temperature = self.initial_temperature;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn evaluated(code: Vec<f64>, evaluation: Vec<f64>) -> State {
        let mut s = State::new(code);
        s.set_evaluation(evaluation);
        s
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_accept_anyone() {
        let mut policy = AcceptAnyone;
        let current = evaluated(vec![0.0], vec![10.0]);
        let worse = evaluated(vec![1.0], vec![-10.0]);
        assert!(policy.accept(&current, &worse, &mut rng()));
    }

    #[test]
    fn test_accept_not_bad_maximize() {
        let mut policy = AcceptNotBad::new(Direction::Maximize, AcceptanceKind::NotBad);
        let current = evaluated(vec![0.0], vec![5.0]);
        assert!(policy.accept(&current, &evaluated(vec![1.0], vec![5.0]), &mut rng()));
        assert!(policy.accept(&current, &evaluated(vec![1.0], vec![6.0]), &mut rng()));
        assert!(!policy.accept(&current, &evaluated(vec![1.0], vec![4.0]), &mut rng()));
    }

    #[test]
    fn test_accept_not_bad_minimize() {
        let mut policy = AcceptNotBad::new(Direction::Minimize, AcceptanceKind::Best);
        let current = evaluated(vec![0.0], vec![5.0]);
        assert!(policy.accept(&current, &evaluated(vec![1.0], vec![4.0]), &mut rng()));
        assert!(!policy.accept(&current, &evaluated(vec![1.0], vec![6.0]), &mut rng()));
    }

    #[test]
    fn test_not_bad_t_always_accepts_improvements() {
        let mut policy = AcceptNotBadT::new(Direction::Minimize, 1.0, 0.9);
        let current = evaluated(vec![0.0], vec![5.0]);
        let better = evaluated(vec![1.0], vec![4.0]);
        for _ in 0..50 {
            assert!(policy.accept(&current, &better, &mut rng()));
        }
    }

    #[test]
    fn test_not_bad_t_cools() {
        let mut policy = AcceptNotBadT::new(Direction::Minimize, 100.0, 0.5);
        let current = evaluated(vec![0.0], vec![5.0]);
        let candidate = evaluated(vec![1.0], vec![5.0]);
        let mut r = rng();
        policy.accept(&current, &candidate, &mut r);
        policy.accept(&current, &candidate, &mut r);
        assert!((policy.temperature() - 25.0).abs() < 1e-12);

        policy.reset();
        assert!((policy.temperature() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_not_bad_t_rejects_large_worsening_at_cold_temperature() {
        let mut policy = AcceptNotBadT::new(Direction::Minimize, 1e-9, 0.9);
        let current = evaluated(vec![0.0], vec![5.0]);
        let much_worse = evaluated(vec![1.0], vec![500.0]);
        let mut r = rng();
        let accepted = (0..100).filter(|_| policy.accept(&current, &much_worse, &mut r)).count();
        assert_eq!(accepted, 0);
    }

    #[test]
    fn test_not_bad_u_threshold() {
        let mut policy = AcceptNotBadU::new(Direction::Minimize, 1.0);
        let current = evaluated(vec![0.0], vec![5.0]);
        assert!(policy.accept(&current, &evaluated(vec![1.0], vec![5.5]), &mut rng()));
        assert!(policy.accept(&current, &evaluated(vec![1.0], vec![6.0]), &mut rng()));
        assert!(!policy.accept(&current, &evaluated(vec![1.0], vec![6.5]), &mut rng()));
    }

    #[test]
    fn test_not_dominated_bootstraps_and_filters() {
        let mut policy = AcceptNotDominated::new(Direction::Maximize);
        let current = evaluated(vec![0.0], vec![3.0, 3.0]);

        // Dominated by the bootstrapped current state.
        assert!(!policy.accept(&current, &evaluated(vec![1.0], vec![2.0, 2.0]), &mut rng()));
        // Incomparable: accepted and archived.
        assert!(policy.accept(&current, &evaluated(vec![2.0], vec![4.0, 2.0]), &mut rng()));
        assert_eq!(policy.archive().len(), 2);

        policy.reset();
        assert!(policy.archive().is_empty());
    }

    #[test]
    fn test_multicase_accepts_dominating_candidate() {
        let mut policy = AcceptMulticase::new(Direction::Maximize, 1e-9, 0.9);
        let current = evaluated(vec![0.0], vec![3.0, 3.0]);
        let dominating = evaluated(vec![1.0], vec![4.0, 4.0]);
        assert!(policy.accept(&current, &dominating, &mut rng()));
        assert!(policy
            .archive()
            .members()
            .iter()
            .any(|m| m.evaluation() == [4.0, 4.0]));
    }

    #[test]
    fn test_multicase_accepts_equal_rank() {
        let mut policy = AcceptMulticase::new(Direction::Maximize, 1e-9, 0.9);
        let current = evaluated(vec![0.0], vec![3.0, 3.0]);
        let incomparable = evaluated(vec![1.0], vec![4.0, 2.0]);
        assert!(policy.accept(&current, &incomparable, &mut rng()));
    }

    #[test]
    fn test_multicase_rejects_worse_rank_when_cold() {
        let mut policy = AcceptMulticase::new(Direction::Maximize, 1e-9, 0.9);
        let current = evaluated(vec![0.0], vec![3.0, 3.0]);
        let dominated = evaluated(vec![1.0], vec![1.0, 1.0]);
        let mut r = rng();
        let accepted = (0..100).filter(|_| policy.accept(&current, &dominated, &mut r)).count();
        assert_eq!(accepted, 0);
    }

    #[test]
    fn test_registry_builds_every_kind() {
        for kind in [
            AcceptanceKind::Anyone,
            AcceptanceKind::Best,
            AcceptanceKind::NotBad,
            AcceptanceKind::NotBadT,
            AcceptanceKind::NotBadU,
            AcceptanceKind::NotDominated,
            AcceptanceKind::Multicase,
        ] {
            let policy = kind.build(Direction::Minimize);
            assert_eq!(policy.kind(), kind);
        }
    }
}
