//! Candidate pool sizes.
//!
//! Metrics are reported for an escalating series of pool sizes, ending
//! with the full universe, so the harness shows how ranking quality decays
//! as the haystack grows.

/// Fixed pool sizes evaluated before the full universe
pub const DEFAULT_POOL_SIZES: [usize; 6] = [50, 100, 200, 500, 1000, 2000];

/// The fixed sizes followed by `universe_size`, first occurrence kept.
///
/// ```ignore
/// assert_eq!(pool_sizes(&[50, 100], 100), vec![50, 100]);
/// ```
pub fn pool_sizes(fixed: &[usize], universe_size: usize) -> Vec<usize> {
    let mut sizes: Vec<usize> = Vec::with_capacity(fixed.len() + 1);
    for &size in fixed.iter().chain(std::iter::once(&universe_size)) {
        if !sizes.contains(&size) {
            sizes.push(size);
        }
    }
    sizes
}
