//! Integer-vector assignment chromosome.
//!
//! # Encoding
//!
//! Position `i` holds the slot id assigned to the `i`-th dose (in
//! timestamp order), or the sentinel `upper` meaning "unmatched". Genes are
//! whole integers in `[0, upper]`; crossover and mutation operate on whole
//! genes, so every offspring stays inside the legal range.

use rand::Rng;

use super::Individual;

/// Candidate assignment of doses to slots.
///
/// Higher fitness = better assignment (maximization convention).
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentChromosome {
    /// Slot id (or sentinel) per dose.
    pub genes: Vec<usize>,
    /// Fitness value (higher = better).
    pub fitness: f64,
}

impl Individual for AssignmentChromosome {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl AssignmentChromosome {
    /// Wraps explicit genes. Fitness starts at zero (unevaluated).
    pub fn new(genes: Vec<usize>) -> Self {
        Self {
            genes,
            fitness: 0.0,
        }
    }

    /// Creates a chromosome with every gene uniform in `[0, upper]`.
    pub fn random<R: Rng>(len: usize, upper: usize, rng: &mut R) -> Self {
        Self::new((0..len).map(|_| rng.random_range(0..=upper)).collect())
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Whether every gene lies in `[0, upper]`.
    pub fn is_valid(&self, upper: usize) -> bool {
        self.genes.iter().all(|&g| g <= upper)
    }
}

// ======================== Crossover ========================

/// Single-point crossover.
///
/// Picks a cut in `[1, len - 1]`. Child 1 takes `p1` below the cut and
/// `p2` from it; child 2 takes the complement. Parents shorter than two
/// genes are copied unchanged.
pub fn single_point_crossover<R: Rng>(
    p1: &AssignmentChromosome,
    p2: &AssignmentChromosome,
    rng: &mut R,
) -> (AssignmentChromosome, AssignmentChromosome) {
    let len = p1.len().min(p2.len());
    if len < 2 {
        return (
            AssignmentChromosome::new(p1.genes.clone()),
            AssignmentChromosome::new(p2.genes.clone()),
        );
    }
    let cut = rng.random_range(1..len);
    (splice(p1, p2, cut), splice(p2, p1, cut))
}

fn splice(head: &AssignmentChromosome, tail: &AssignmentChromosome, cut: usize) -> AssignmentChromosome {
    let mut genes = Vec::with_capacity(head.len());
    genes.extend_from_slice(&head.genes[..cut]);
    genes.extend_from_slice(&tail.genes[cut..]);
    AssignmentChromosome::new(genes)
}

// ======================== Mutation ========================

/// Reset mutation: replaces gene `index` with a uniform value in `[0, upper]`.
pub fn reset_mutation<R: Rng>(
    chromosome: &mut AssignmentChromosome,
    index: usize,
    upper: usize,
    rng: &mut R,
) {
    if let Some(gene) = chromosome.genes.get_mut(index) {
        *gene = rng.random_range(0..=upper);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_random_chromosome() {
        let mut rng = SmallRng::seed_from_u64(42);
        let ch = AssignmentChromosome::random(50, 6, &mut rng);
        assert_eq!(ch.len(), 50);
        assert!(ch.is_valid(6));
        // The sentinel is reachable
        let mut rng = SmallRng::seed_from_u64(42);
        let hits = (0..200)
            .map(|_| AssignmentChromosome::random(10, 2, &mut rng))
            .flat_map(|c| c.genes)
            .filter(|&g| g == 2)
            .count();
        assert!(hits > 0);
    }

    #[test]
    fn test_single_point_crossover() {
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = AssignmentChromosome::new(vec![0, 0, 0, 0, 0]);
        let p2 = AssignmentChromosome::new(vec![9, 9, 9, 9, 9]);
        for _ in 0..20 {
            let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);
            let cut = c1.genes.iter().position(|&g| g == 9).unwrap();
            assert!((1..5).contains(&cut));
            assert!(c1.genes[..cut].iter().all(|&g| g == 0));
            assert!(c1.genes[cut..].iter().all(|&g| g == 9));
            assert!(c2.genes[..cut].iter().all(|&g| g == 9));
            assert!(c2.genes[cut..].iter().all(|&g| g == 0));
            assert_eq!(c1.fitness, 0.0);
        }
    }

    #[test]
    fn test_crossover_short_parents() {
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = AssignmentChromosome::new(vec![1]);
        let p2 = AssignmentChromosome::new(vec![2]);
        let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);
        assert_eq!(c1.genes, vec![1]);
        assert_eq!(c2.genes, vec![2]);
    }

    #[test]
    fn test_reset_mutation_stays_legal() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = AssignmentChromosome::new(vec![3; 8]);
        for i in 0..200 {
            reset_mutation(&mut ch, i % 8, 3, &mut rng);
        }
        assert!(ch.is_valid(3));
        // Out-of-range index is ignored
        reset_mutation(&mut ch, 99, 3, &mut rng);
        assert_eq!(ch.len(), 8);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use rand::Rng;

        proptest! {
            #[test]
            fn operators_keep_genes_legal(
                len in 1usize..40,
                upper in 0usize..50,
                seed in any::<u64>(),
                rounds in 1usize..20,
            ) {
                let mut rng = SmallRng::seed_from_u64(seed);
                let mut a = AssignmentChromosome::random(len, upper, &mut rng);
                let mut b = AssignmentChromosome::random(len, upper, &mut rng);
                for _ in 0..rounds {
                    let (c1, c2) = single_point_crossover(&a, &b, &mut rng);
                    a = c1;
                    b = c2;
                    let idx = rng.random_range(0..len);
                    reset_mutation(&mut a, idx, upper, &mut rng);
                    prop_assert_eq!(a.len(), len);
                    prop_assert_eq!(b.len(), len);
                    prop_assert!(a.is_valid(upper) && b.is_valid(upper));
                }
            }
        }
    }
}
