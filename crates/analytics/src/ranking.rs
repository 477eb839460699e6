use std::collections::HashMap;
use std::hash::Hash;

/// Returns the most frequent item of a sequence.
///
/// Ties are resolved in favour of the item that reached the winning count
/// first while scanning in sequence order. For `A, B, B, A` that is `B`.
pub fn most_frequent<T, I>(items: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut best: Option<(T, usize)> = None;

    for item in items {
        let count = counts.entry(item.clone()).or_insert(0);
        *count += 1;
        let count = *count;

        // Only a strictly higher count takes the lead.
        let leads = best.as_ref().is_none_or(|(_, best_count)| count > *best_count);
        if leads {
            best = Some((item, count));
        }
    }

    best.map(|(item, _)| item)
}
