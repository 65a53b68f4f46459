//! Deterministic random sampling for cutting large pair collections down to a
//! reviewable size.
//!
//! Error analysis over a full treebank can produce thousands of mismatching
//! adjective–noun pairs; a reviewer only wants a few dozen. This library
//! reduces a collection to approximately a target count using pseudo-random
//! sampling seeded from each item's content, so the same pairs are kept across
//! runs and across machines.
//!
//! # Example
//!
//! ```
//! use pair_sampler::sample_to_target;
//!
//! let pairs = vec!["kitAb jadiyd", "madiynap kabiyrap", "rajul Tawiyl"];
//! let sampled = sample_to_target(pairs, 2, |p| p.to_string());
//! assert!(sampled.len() <= 3);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Sample a collection down to approximately `target_count` items.
///
/// If the input has no more items than the target, all items are returned
/// unchanged. Otherwise each item is kept with probability
/// `target_count / len`, decided by an RNG seeded from the item's key, so the
/// decision for a given pair never depends on what else is in the collection.
///
/// # Arguments
///
/// * `items` - The collection to sample from
/// * `target_count` - The desired approximate number of items in the output
/// * `key_fn` - Extracts a hashable key from each item; for adjective–noun
///   pairs this is typically `(sentence index, adjective id)`
pub fn sample_to_target<T, K, F>(items: Vec<T>, target_count: usize, key_fn: F) -> Vec<T>
where
    K: Hash,
    F: Fn(&T) -> K,
{
    sample_to_target_with_stats(items, target_count, key_fn).0
}

/// Like [`sample_to_target`], but also reports what the sampling did.
///
/// Useful when the caller wants to tell the reviewer how many mismatches were
/// dropped to produce the sample.
pub fn sample_to_target_with_stats<T, K, F>(
    items: Vec<T>,
    target_count: usize,
    key_fn: F,
) -> (Vec<T>, SamplingStats)
where
    K: Hash,
    F: Fn(&T) -> K,
{
    let input_count = items.len();

    if input_count <= target_count {
        return (
            items,
            SamplingStats {
                input_count,
                target_count,
                kept_count: input_count,
                was_sampled: false,
            },
        );
    }

    let keep_probability = target_count as f64 / input_count as f64;

    let sampled: Vec<T> = items
        .into_iter()
        .filter(|item| {
            let mut hasher = DefaultHasher::new();
            key_fn(item).hash(&mut hasher);
            let mut rng = ChaCha8Rng::seed_from_u64(hasher.finish());
            rng.gen::<f64>() < keep_probability
        })
        .collect();

    let kept_count = sampled.len();

    (
        sampled,
        SamplingStats {
            input_count,
            target_count,
            kept_count,
            was_sampled: true,
        },
    )
}

/// What sampling did to the collection, for the caller's report.
#[derive(Debug, Clone, Copy)]
pub struct SamplingStats {
    /// How many pairs went in.
    pub input_count: usize,
    /// The count the caller asked for.
    pub target_count: usize,
    /// How many pairs survived.
    pub kept_count: usize,
    /// False when the input was already at or under target and came back whole.
    pub was_sampled: bool,
}
