//! Wrap-around search over the shared handle pool.

/// Finds the first element matching `predicate`, scanning forward from
/// `starting_at` and wrapping around to the front.
///
/// The scan is two linear passes: `starting_at..len`, then `0..starting_at`.
/// A `starting_at` at or past the end of the slice makes the forward pass
/// empty, so the wrap pass covers the whole slice from index 0. Cursors are
/// stored un-wrapped (`found index + 1`), and this degenerate case is what
/// brings them back to the front on the next call.
///
/// Returns the matching element and its index, or `None` if nothing matches.
/// O(n) worst case, no allocation.
pub(crate) fn find_from<T>(
    items: &[T],
    starting_at: usize,
    predicate: impl Fn(&T) -> bool,
) -> Option<(usize, &T)> {
    for (index, item) in items.iter().enumerate().skip(starting_at) {
        if predicate(item) {
            return Some((index, item));
        }
    }
    for (index, item) in items.iter().enumerate().take(starting_at.min(items.len())) {
        if predicate(item) {
            return Some((index, item));
        }
    }
    None
}
