use serde::Serialize;
use turnscope_types::BinTable;

/// Bins that met the support threshold, plus how many did not
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredBins<K> {
    pub kept: BinTable<K>,
    pub dropped: usize,
}

/// Drop bins with fewer than `min_support` sessions.
///
/// Retained bins are passed through untouched; dropped bins are discarded,
/// never merged into a neighbour.
pub fn filter_sparse_bins<K>(bins: BinTable<K>, min_support: usize) -> FilteredBins<K> {
    let total = bins.len();
    let kept: BinTable<K> = bins
        .into_iter()
        .filter(|bin| bin.session_count >= min_support)
        .collect();
    FilteredBins {
        dropped: total - kept.len(),
        kept,
    }
}
