//! Seeded random number generation and distinct-index sampling.
//!
//! Every stochastic operation in this crate takes an explicit `&mut impl Rng`;
//! there is no global generator.
//!
//! # Reproducibility
//!
//! Use [`create_rng`] with a fixed seed. The underlying algorithm (SmallRng)
//! is deterministic for a given seed on the same platform, so re-creating the
//! generator replays the same stream of draws.

use rand::Rng;

/// Creates a fast, seeded random number generator.
///
/// # Examples
/// ```
/// use u_simpler::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Draws `k` distinct indices from `[0, n)` in draw order.
///
/// Runs the first `k` steps of a forward Fisher-Yates (Durstenfeld)
/// shuffle, so the result is a uniformly random `k`-permutation.
///
/// Reference: Knuth (1997), *TAOCP* Vol. 2, §3.4.2, Algorithm P.
///
/// # Complexity
/// Time: O(n), Space: O(n)
///
/// # Returns
/// - `None` if `k > n`.
///
/// # Examples
/// ```
/// use u_simpler::random::{create_rng, sample_distinct};
/// let mut rng = create_rng(7);
/// let idx = sample_distinct(10, 3, &mut rng).unwrap();
/// assert_eq!(idx.len(), 3);
/// assert!(idx[0] != idx[1] && idx[1] != idx[2] && idx[0] != idx[2]);
/// ```
pub fn sample_distinct<R: Rng>(n: usize, k: usize, rng: &mut R) -> Option<Vec<usize>> {
    if k > n {
        return None;
    }
    let mut pool: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.random_range(i..n);
        pool.swap(i, j);
    }
    pool.truncate(k);
    Some(pool)
}

// ============================================================================
// Tests
// ============================================================================
