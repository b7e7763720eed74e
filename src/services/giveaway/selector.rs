use rand::Rng;

/// Draw up to `count` distinct winners from `entrants`.
///
/// Partial Fisher-Yates shuffle: the first `min(count, len)` slots of a
/// uniformly random permutation. Every subset of that size is equally likely
/// and the result is deterministic for a seeded `rng`.
pub fn select<T, R>(entrants: &[T], count: usize, rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let take = count.min(entrants.len());
    let mut pool = entrants.to_vec();

    for i in 0..take {
        let j = rng.gen_range(i..pool.len());
        pool.swap(i, j);
    }

    pool.truncate(take);
    pool
}
