//! Dose-matching GA problem definition.
//!
//! Implements [`GaProblem`] over [`AssignmentChromosome`]s, scoring them
//! with a [`CostEvaluator`].

use rand::Rng;

use super::chromosome::{AssignmentChromosome, reset_mutation, single_point_crossover};
use super::GaProblem;
use crate::cost::CostEvaluator;

/// GA problem: assign each sorted dose to a slot or to "unmatched".
///
/// # Example
/// ```no_run
/// use u_dose_match::ga::{GaConfig, GaRunner, MatchingProblem};
/// # fn evaluator() -> u_dose_match::cost::CostEvaluator { unimplemented!() }
///
/// let problem = MatchingProblem::new(evaluator());
/// let result = GaRunner::run(&problem, &GaConfig::default().with_seed(1));
/// println!("best genes: {:?}", result.best.genes);
/// ```
#[derive(Debug, Clone)]
pub struct MatchingProblem {
    evaluator: CostEvaluator,
}

impl MatchingProblem {
    /// Wraps a fully built evaluator.
    pub fn new(evaluator: CostEvaluator) -> Self {
        Self { evaluator }
    }

    /// The cost model behind [`GaProblem::evaluate`].
    pub fn evaluator(&self) -> &CostEvaluator {
        &self.evaluator
    }

    /// Largest legal gene value (the unmatched sentinel).
    pub fn upper(&self) -> usize {
        self.evaluator.slots().unmatched()
    }
}

impl GaProblem for MatchingProblem {
    type Individual = AssignmentChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> AssignmentChromosome {
        AssignmentChromosome::random(self.evaluator.dose_count(), self.upper(), rng)
    }

    fn evaluate(&self, individual: &AssignmentChromosome) -> f64 {
        self.evaluator.fitness(&individual.genes)
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &AssignmentChromosome,
        parent2: &AssignmentChromosome,
        rng: &mut R,
    ) -> (AssignmentChromosome, AssignmentChromosome) {
        single_point_crossover(parent1, parent2, rng)
    }

    fn gene_count(&self) -> usize {
        self.evaluator.dose_count()
    }

    fn mutate_gene<R: Rng>(&self, individual: &mut AssignmentChromosome, gene: usize, rng: &mut R) {
        reset_mutation(individual, gene, self.upper(), rng);
    }
}
