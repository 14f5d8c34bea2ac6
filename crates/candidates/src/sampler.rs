//! Candidate Sampler - test items plus sampled negatives
//!
//! For each user and pool size the ranker sees every hidden test item
//! mixed with stalls the user never interacted with. Negatives come from
//! the item universe minus the user's train and test items, drawn
//! uniformly without replacement.
//!
//! The negative pool is built once per user and reused across pool sizes;
//! only the draw depends on the pool size.

use data_loader::StallId;
use rand::Rng;
use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// Stalls eligible as negatives for one user, in universe order
#[derive(Debug, Clone, Default)]
pub struct NegativePool {
    negatives: Vec<StallId>,
}

impl NegativePool {
    /// Universe minus train items minus test items
    pub fn new(universe: &[StallId], train_items: &[StallId], test_items: &[StallId]) -> Self {
        let seen: HashSet<&str> = train_items
            .iter()
            .chain(test_items.iter())
            .map(String::as_str)
            .collect();

        let negatives = universe
            .iter()
            .filter(|stall_id| !seen.contains(stall_id.as_str()))
            .cloned()
            .collect();

        Self { negatives }
    }

    pub fn len(&self) -> usize {
        self.negatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.negatives.is_empty()
    }

    pub fn as_slice(&self) -> &[StallId] {
        &self.negatives
    }

    /// Build the candidate list for one pool size.
    ///
    /// All test items come first, even when `pool_size` is smaller than
    /// the test set, followed by sampled negatives. When the pool cannot
    /// supply enough negatives the candidate list is simply shorter.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        pool_size: usize,
        test_items: &[StallId],
        rng: &mut R,
    ) -> Vec<StallId> {
        let needed = negatives_needed(pool_size, test_items.len(), self.negatives.len());

        let mut candidates = Vec::with_capacity(test_items.len() + needed);
        candidates.extend_from_slice(test_items);
        candidates.extend(
            index::sample(rng, self.negatives.len(), needed)
                .into_iter()
                .map(|i| self.negatives[i].clone()),
        );
        candidates
    }
}

/// max(0, pool_size - test_count), capped at what the pool holds
pub fn negatives_needed(pool_size: usize, test_count: usize, available: usize) -> usize {
    pool_size.saturating_sub(test_count).min(available)
}

/// Independent random stream for one user.
///
/// Every user gets the run seed with its own ChaCha stream, so draws do
/// not depend on which thread evaluates which user, or in what order.
pub fn user_rng(seed: u64, user_index: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(user_index);
    rng
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(prefix: &str, n: usize) -> Vec<StallId> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[test]
    fn test_pool_excludes_seen_items() {
        let universe = ids("s", 6);
        let train = vec!["s0".to_string(), "s1".to_string()];
        let test = vec!["s4".to_string()];

        let pool = NegativePool::new(&universe, &train, &test);
        assert_eq!(pool.as_slice(), &["s2", "s3", "s5"]);
    }

    #[test]
    fn test_shortfall_shrinks_pool() {
        // pool_size 50, 10 negatives, 2 test items -> 12 candidates
        let mut universe = ids("n", 10);
        universe.extend(ids("t", 2));
        let test = ids("t", 2);

        let pool = NegativePool::new(&universe, &[], &test);
        let candidates = pool.draw(50, &test, &mut user_rng(42, 0));

        assert_eq!(candidates.len(), 12);
        assert_eq!(&candidates[..2], test.as_slice());
    }

    #[test]
    fn test_small_pool_keeps_all_test_items() {
        let universe = ids("s", 20);
        let test = ids("s", 3);
        let pool = NegativePool::new(&universe, &[], &test);

        let candidates = pool.draw(1, &test, &mut user_rng(42, 0));
        assert_eq!(candidates, test);
    }

    #[test]
    fn test_draw_without_replacement() {
        let universe = ids("s", 100);
        let test = vec!["s0".to_string()];
        let pool = NegativePool::new(&universe, &[], &test);

        let candidates = pool.draw(50, &test, &mut user_rng(7, 3));
        assert_eq!(candidates.len(), 50);

        let distinct: HashSet<&StallId> = candidates.iter().collect();
        assert_eq!(distinct.len(), 50);
        assert!(candidates[1..].iter().all(|c| c != "s0"));
    }

    #[test]
    fn test_user_streams_reproducible_and_independent() {
        let universe = ids("s", 500);
        let pool = NegativePool::new(&universe, &[], &[]);

        let a = pool.draw(20, &[], &mut user_rng(42, 1));
        let b = pool.draw(20, &[], &mut user_rng(42, 1));
        let c = pool.draw(20, &[], &mut user_rng(42, 2));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_negatives_needed() {
        assert_eq!(negatives_needed(50, 2, 10), 10);
        assert_eq!(negatives_needed(50, 2, 100), 48);
        assert_eq!(negatives_needed(1, 3, 100), 0);
    }
}
