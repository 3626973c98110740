//! Generational GA engine.
//!
//! Fitness-proportionate (roulette) selection, pairwise crossover for a
//! fixed share of each generation, selection-copied survivors for the
//! rest, then gene-level mutation across the new population. The best
//! individual ever seen is tracked separately from the current
//! population, since generations are not monotone.
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization, and
//! Machine Learning", Ch. 3

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};

use super::GaConfig;

/// An evaluable member of a population. Higher fitness is better.
pub trait Individual: Clone {
    fn fitness(&self) -> f64;
    fn set_fitness(&mut self, fitness: f64);
}

/// Problem definition plugged into [`GaRunner`].
pub trait GaProblem {
    type Individual: Individual;

    /// Creates a random individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Computes fitness (higher = better).
    fn evaluate(&self, individual: &Self::Individual) -> f64;

    /// Produces two offspring from two parents.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        rng: &mut R,
    ) -> (Self::Individual, Self::Individual);

    /// Genes per individual.
    fn gene_count(&self) -> usize;

    /// Re-randomizes one gene.
    fn mutate_gene<R: Rng>(&self, individual: &mut Self::Individual, gene: usize, rng: &mut R);
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// `max_generations` exhausted.
    GenerationBudget,
    /// Best fitness stalled for `convergence_window` generations.
    Converged,
    /// Best fitness reached `fitness_threshold`.
    ThresholdReached,
}

/// Per-generation summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    /// Best fitness in this generation.
    pub best_fitness: f64,
    pub mean_fitness: f64,
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I> {
    /// Best individual seen in any generation.
    pub best: I,
    pub best_fitness: f64,
    /// Generations evolved after the initial population.
    pub generations: usize,
    pub termination: Termination,
    /// Stats for the initial population and every evolved generation.
    pub history: Vec<GenerationStats>,
}

/// A generation of individuals with its selection distribution.
#[derive(Debug, Clone)]
pub struct Population<I> {
    individuals: Vec<I>,
    /// Cumulative selection weights, parallel to `individuals`.
    cumulative: Vec<f64>,
    selection_cap: f64,
    generation: usize,
}

impl<I: Individual> Population<I> {
    /// Creates and evaluates a random population.
    pub fn random<P, R>(problem: &P, config: &GaConfig, rng: &mut R) -> Self
    where
        P: GaProblem<Individual = I>,
        R: Rng,
    {
        let individuals = (0..config.population_size)
            .map(|_| problem.create_individual(rng))
            .collect();
        let mut population = Self {
            individuals,
            cumulative: Vec::new(),
            selection_cap: config.selection_cap,
            generation: 0,
        };
        population.evaluate(problem);
        population
    }

    /// Current members.
    pub fn individuals(&self) -> &[I] {
        &self.individuals
    }

    /// Generations evolved so far (0 for the initial population).
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Fittest individual of this generation.
    pub fn best(&self) -> Option<&I> {
        self.individuals
            .iter()
            .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
    }

    /// Mean fitness of the current members.
    pub fn mean_fitness(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }
        self.individuals.iter().map(|i| i.fitness()).sum::<f64>() / self.individuals.len() as f64
    }

    /// Summary of this generation.
    pub fn stats(&self) -> GenerationStats {
        GenerationStats {
            generation: self.generation,
            best_fitness: self.best().map(|b| b.fitness()).unwrap_or(0.0),
            mean_fitness: self.mean_fitness(),
        }
    }

    /// Scores every individual and rebuilds the selection distribution.
    pub fn evaluate<P>(&mut self, problem: &P)
    where
        P: GaProblem<Individual = I>,
    {
        for individual in &mut self.individuals {
            let fitness = problem.evaluate(individual);
            individual.set_fitness(fitness);
        }
        self.rebuild_distribution();
    }

    /// Roulette selection of `k` individuals (with replacement).
    pub fn select<R: Rng>(&self, k: usize, rng: &mut R) -> Vec<I> {
        let Some(&total) = self.cumulative.last() else {
            return Vec::new();
        };
        let last = self.individuals.len() - 1;
        (0..k)
            .map(|_| {
                let r = rng.random::<f64>() * total;
                let idx = self.cumulative.partition_point(|&c| c <= r).min(last);
                self.individuals[idx].clone()
            })
            .collect()
    }

    /// Replaces this population with the next generation.
    pub fn evolve<P, R>(&mut self, problem: &P, config: &GaConfig, rng: &mut R)
    where
        P: GaProblem<Individual = I>,
        R: Rng,
    {
        let size = self.individuals.len();
        let offspring = config.offspring_count().min(size) & !1;

        let mut next = self.select(size - offspring, rng);
        let mothers = self.select(offspring / 2, rng);
        let fathers = self.select(offspring / 2, rng);
        for (mother, father) in mothers.iter().zip(&fathers) {
            let (c1, c2) = problem.crossover(mother, father, rng);
            next.push(c1);
            next.push(c2);
        }

        let genes = problem.gene_count();
        if genes > 0 && !next.is_empty() {
            let mutations = (config.mutation_rate * (next.len() * genes) as f64).floor() as usize;
            for _ in 0..mutations {
                let who = rng.random_range(0..next.len());
                let gene = rng.random_range(0..genes);
                problem.mutate_gene(&mut next[who], gene, rng);
            }
        }

        self.individuals = next;
        self.generation += 1;
        self.evaluate(problem);
    }

    /// Builds cumulative weights from fitness, capping outliers at
    /// `selection_cap * mean` so one lucky individual cannot take over.
    fn rebuild_distribution(&mut self) {
        let usable = |f: f64| f.is_finite() && f > 0.0;
        let (sum, count) = self
            .individuals
            .iter()
            .map(|i| i.fitness())
            .filter(|&f| usable(f))
            .fold((0.0, 0usize), |(s, n), f| (s + f, n + 1));

        let cap = if self.selection_cap > 0.0 && count > 0 {
            self.selection_cap * sum / self.individuals.len() as f64
        } else {
            f64::INFINITY
        };

        let mut running = 0.0;
        self.cumulative = self
            .individuals
            .iter()
            .map(|i| {
                let f = i.fitness();
                if usable(f) {
                    running += f.min(cap);
                }
                running
            })
            .collect();

        if !(running.is_finite() && running > 0.0) {
            if !self.individuals.is_empty() {
                warn!(
                    generation = self.generation,
                    "no positive fitness, selecting uniformly"
                );
            }
            self.cumulative = (1..=self.individuals.len()).map(|n| n as f64).collect();
        }
    }
}

/// Drives a [`GaProblem`] to termination.
pub struct GaRunner;

impl GaRunner {
    /// Runs with a generator seeded from `config.seed`, or from OS entropy.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> GaResult<P::Individual> {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self::run_with_rng(problem, config, &mut rng)
    }

    /// Runs with a caller-supplied generator. Deterministic for a
    /// deterministic `rng`.
    pub fn run_with_rng<P, R>(problem: &P, config: &GaConfig, rng: &mut R) -> GaResult<P::Individual>
    where
        P: GaProblem,
        R: Rng,
    {
        let mut population = Population::random(problem, config, rng);
        let mut history = vec![population.stats()];
        let mut best = match population.best() {
            Some(b) => b.clone(),
            None => problem.create_individual(rng),
        };

        let mut termination = Termination::GenerationBudget;
        let mut stalled = 0usize;

        if best.fitness() >= config.fitness_threshold {
            termination = Termination::ThresholdReached;
        } else {
            for _ in 0..config.max_generations {
                population.evolve(problem, config, rng);
                let stats = population.stats();
                trace!(
                    generation = stats.generation,
                    best = stats.best_fitness,
                    mean = stats.mean_fitness,
                    "generation evaluated"
                );
                history.push(stats);

                let previous = best.fitness();
                if let Some(current) = population.best() {
                    if current.fitness() > previous {
                        best = current.clone();
                    }
                }

                let gain = (best.fitness() - previous) / previous.abs().max(f64::MIN_POSITIVE);
                if gain <= config.convergence_tolerance {
                    stalled += 1;
                } else {
                    stalled = 0;
                }

                if best.fitness() >= config.fitness_threshold {
                    termination = Termination::ThresholdReached;
                    break;
                }
                if config.convergence_window > 0 && stalled >= config.convergence_window {
                    termination = Termination::Converged;
                    break;
                }
            }
        }

        let generations = population.generation();
        info!(
            ?termination,
            generations,
            best_fitness = best.fitness(),
            "search finished"
        );

        GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            termination,
            history,
        }
    }
}
