//! Uniform shuffling and question selection.

use rand::Rng;

/// Shuffle `items` in place with the Fisher–Yates (Knuth) algorithm.
///
/// Walks from the last position down to the second, swapping each element
/// with one drawn uniformly from `0..=i`. Empty and single-element slices are
/// left untouched.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Pick `count` elements of `bank` uniformly at random.
///
/// The returned order is the presentation order. When `count` exceeds the
/// bank size the whole bank is returned, shuffled.
pub fn select<T: Clone, R: Rng + ?Sized>(bank: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut pool = bank.to_vec();
    shuffle(&mut pool, rng);
    pool.truncate(count);
    pool
}
