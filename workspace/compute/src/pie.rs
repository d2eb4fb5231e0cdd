use common::{PieSlice, EXPLODE_SHARE, OTHER_LABEL};
use tracing::{debug, instrument};

/// Merges every entry below `threshold_pct` percent of the total into a
/// trailing [`OTHER_LABEL`] slice and flags large slices as exploded.
///
/// Entry order is preserved. An empty input or a zero total yields no slices.
#[instrument(skip(entries), fields(num_entries = entries.len()))]
pub fn group_small_slices(entries: &[(String, f64)], threshold_pct: f64) -> Vec<PieSlice> {
    let total: f64 = entries.iter().map(|(_, value)| value).sum();
    if total <= 0.0 {
        debug!("Nothing to chart, total is {}", total);
        return Vec::new();
    }

    let mut kept: Vec<(String, f64)> = Vec::with_capacity(entries.len() + 1);
    let mut other = 0.0;
    for (label, value) in entries {
        if value / total * 100.0 < threshold_pct {
            other += value;
        } else {
            kept.push((label.clone(), *value));
        }
    }

    if other > 0.0 {
        debug!("Merged {} into {}", other, OTHER_LABEL);
        kept.push((OTHER_LABEL.to_string(), other));
    }

    let kept_total: f64 = kept.iter().map(|(_, value)| value).sum();
    kept.into_iter()
        .map(|(label, value)| PieSlice {
            label,
            value,
            percentage: value / total * 100.0,
            exploded: value > kept_total * EXPLODE_SHARE,
        })
        .collect()
}

/// One slice per entry with its percentage; nothing merged or exploded.
pub fn plain_slices(entries: &[(String, f64)]) -> Vec<PieSlice> {
    let total: f64 = entries.iter().map(|(_, value)| value).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    entries
        .iter()
        .map(|(label, value)| PieSlice {
            label: label.clone(),
            value: *value,
            percentage: value / total * 100.0,
            exploded: false,
        })
        .collect()
}
