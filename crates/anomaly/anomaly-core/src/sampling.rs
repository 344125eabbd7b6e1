//! Subsampling without replacement.

use rand::seq::index;
use rand::Rng;

/// Draw `amount` distinct positions from `0..population`, uniformly at random.
///
/// When more than half of the population is requested, the complement of a
/// random `population - amount` subset is returned instead, which keeps the
/// number of random draws at most `population / 2`. Either way every subset of
/// size `amount` is equally likely.
///
/// # Panics
///
/// Panics if `amount > population`.
pub(crate) fn sample_indices<R: Rng + ?Sized>(rng: &mut R, population: usize, amount: usize) -> Vec<usize> {
    assert!(
        amount <= population,
        "cannot sample {} items from a population of {}",
        amount,
        population
    );

    if amount > population / 2 {
        let mut excluded = vec![false; population];
        for i in index::sample(rng, population, population - amount).iter() {
            excluded[i] = true;
        }
        (0..population).filter(|&i| !excluded[i]).collect()
    } else {
        index::sample(rng, population, amount).into_vec()
    }
}
