//! Injectable randomness for the local generators.
//!
//! Generators never touch a global RNG. Each request builds its own
//! [`StdRng`] with [`study_rng`] and the generators take any [`Rng`], so
//! tests can pin every decision with a fixed-output generator.

use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};

/// A generator seeded from `seed`, or from OS entropy when there is none.
/// The same seed always yields the same sequence.
pub fn study_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Up to `k` distinct elements of `items`, in sampled order.
pub fn sample<T: Clone, R: Rng + ?Sized>(rng: &mut R, items: &[T], k: usize) -> Vec<T> {
    items.choose_multiple(rng, k).cloned().collect()
}

/// Up to `k` distinct positions in `0..len`, in sampled order.
pub fn sample_positions<R: Rng + ?Sized>(rng: &mut R, len: usize, k: usize) -> Vec<usize> {
    index::sample(rng, len, k.min(len)).into_vec()
}

/// A generator that always yields zero, so every choice lands on the
/// lowest option and every slice keeps its first element.
#[cfg(test)]
pub(crate) fn pinned() -> rand::rngs::mock::StepRng {
    rand::rngs::mock::StepRng::new(0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_distinct_and_bounded() {
        let mut rng = study_rng(Some(7));
        let items: Vec<u32> = (0..20).collect();
        let mut picked = sample(&mut rng, &items, 5);
        assert_eq!(picked.len(), 5);
        picked.sort();
        picked.dedup();
        assert_eq!(picked.len(), 5);

        assert_eq!(sample(&mut rng, &items[..3], 10).len(), 3);
        assert!(sample::<u32, _>(&mut rng, &[], 4).is_empty());
    }

    #[test]
    fn test_sample_positions_clamps_to_length() {
        let mut rng = study_rng(Some(11));
        let mut positions = sample_positions(&mut rng, 4, 9);
        positions.sort();
        assert_eq!(positions, vec![0, 1, 2, 3]);
        assert!(sample_positions(&mut rng, 0, 3).is_empty());
    }

    #[test]
    fn test_pinned_generator_picks_lowest() {
        let mut rng = pinned();
        assert_eq!(["x", "y", "z"].choose(&mut rng), Some(&"x"));
        assert_eq!(rng.gen_range(0..5usize), 0);
        assert_eq!(sample(&mut rng, &["only"], 1), vec!["only"]);
    }

    #[test]
    fn test_seeded_generators_agree() {
        let mut a = study_rng(Some(42));
        let mut b = study_rng(Some(42));
        let items: Vec<usize> = (0..50).collect();
        assert_eq!(sample(&mut a, &items, 10), sample(&mut b, &items, 10));

        let mut left = items.clone();
        let mut right = items.clone();
        left.shuffle(&mut a);
        right.shuffle(&mut b);
        assert_eq!(left, right);
    }
}
