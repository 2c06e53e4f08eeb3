//! Bounded point sets for plotting.

/// Maximum number of significant points retained.
pub const SIG_LIMIT: usize = 3000;

/// Maximum number of points retained overall.
pub const TOTAL_LIMIT: usize = 5000;

/// Reduce a point set to at most [`TOTAL_LIMIT`] items.
///
/// Significant items come first. When there are more than [`SIG_LIMIT`],
/// the strongest (by `strength`, descending, ties kept in input order) are
/// retained. Remaining capacity is filled from `background` by uniform
/// stride sampling in input order.
pub fn downsample<T, F>(significant: Vec<T>, background: Vec<T>, strength: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    let mut kept = significant;
    if kept.len() > SIG_LIMIT {
        // sort_by is stable
        kept.sort_by(|a, b| strength(b).total_cmp(&strength(a)));
        kept.truncate(SIG_LIMIT);
    }

    let remaining = TOTAL_LIMIT.saturating_sub(kept.len());
    if remaining == 0 || background.is_empty() {
        return kept;
    }

    let stride = (background.len() / remaining).max(1);
    kept.extend(background.into_iter().step_by(stride).take(remaining));
    kept
}
