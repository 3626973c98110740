//! GA-based assignment search.
//!
//! A generational genetic algorithm over integer-vector chromosomes:
//! gene `i` is the slot assigned to dose `i`, or the unmatched sentinel.
//!
//! # Submodules
//!
//! - [`GaConfig`]: population, budget, rates, termination.
//! - [`GaRunner`] / [`Population`]: problem-agnostic engine.
//! - [`AssignmentChromosome`]: encoding plus crossover and mutation.
//! - [`MatchingProblem`]: binds the engine to the cost model.
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"
//! - Holland (1975), "Adaptation in Natural and Artificial Systems"

mod chromosome;
mod config;
mod problem;
mod runner;

pub use chromosome::{AssignmentChromosome, reset_mutation, single_point_crossover};
pub use config::GaConfig;
pub use problem::MatchingProblem;
pub use runner::{
    GaProblem, GaResult, GaRunner, GenerationStats, Individual, Population, Termination,
};
