use criterion::{criterion_group, criterion_main, Criterion};
use rand::{Rng, RngCore};

use hyperheur::engine::{Engine, EngineConfig};
use hyperheur::generators::GeneratorKind;
use hyperheur::problem::{Codification, Problem, SearchOperator};
use hyperheur::state::{Direction, State};

struct Sphere {
    dim: usize,
}

impl Problem for Sphere {
    fn evaluate(&self, state: &mut State) {
        let value: f64 = state.code().iter().map(|x| x * x).sum();
        state.set_evaluation(vec![value]);
    }

    fn direction(&self) -> Direction {
        Direction::Minimize
    }

    fn objective_count(&self) -> usize {
        1
    }
}

struct BoxBounds {
    dim: usize,
    lo: f64,
    hi: f64,
}

impl Codification for BoxBounds {
    fn variable_count(&self) -> usize {
        self.dim
    }

    fn random_value(&self, _index: usize, rng: &mut dyn RngCore) -> f64 {
        rng.random_range(self.lo..self.hi)
    }

    fn random_key(&self, rng: &mut dyn RngCore) -> f64 {
        rng.random_range(0.0..1.0)
    }

    fn is_valid(&self, state: &State) -> bool {
        state.code().iter().all(|&v| v >= self.lo && v <= self.hi)
    }
}

struct Perturb {
    dim: usize,
    lo: f64,
    hi: f64,
    step: f64,
}

impl SearchOperator for Perturb {
    fn neighbors(&self, state: &State, count: usize, rng: &mut dyn RngCore) -> Vec<State> {
        (0..count)
            .map(|_| {
                let code = state
                    .code()
                    .iter()
                    .map(|&v| (v + rng.random_range(-self.step..self.step)).clamp(self.lo, self.hi))
                    .collect();
                State::new(code)
            })
            .collect()
    }

    fn random(&self, count: usize, rng: &mut dyn RngCore) -> Vec<State> {
        (0..count)
            .map(|_| {
                let code = (0..self.dim)
                    .map(|_| rng.random_range(self.lo..self.hi))
                    .collect();
                State::new(code)
            })
            .collect()
    }
}

fn bench_engine(c: &mut Criterion) {
    let dim = 10;
    let problem = Sphere { dim };
    let codification = BoxBounds { dim, lo: -5.0, hi: 5.0 };
    let ops = Perturb { dim, lo: -5.0, hi: 5.0, step: 0.5 };

    let mut group = c.benchmark_group("engine");

    for kind in [
        GeneratorKind::HillClimbing,
        GeneratorKind::SimulatedAnnealing,
        GeneratorKind::Genetic,
        GeneratorKind::Ensemble,
    ] {
        group.bench_function(format!("{kind:?}_2000_iters"), |b| {
            b.iter(|| {
                let config = EngineConfig::default()
                    .with_max_iterations(2000)
                    .with_period_length(200)
                    .with_initial_generator(kind)
                    .with_seed(42);
                let mut engine = Engine::new(config).unwrap();
                engine.run(&problem, &codification, &ops).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
