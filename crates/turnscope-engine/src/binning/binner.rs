use std::collections::BTreeMap;

use turnscope_types::{
    BinTable, DiurnalVariation, HOURS_PER_DAY, HourOfDay, MetricSelector, Session, TimeBin,
};

use super::keys::KeyScheme;
use crate::session::aggregate_sessions;
use crate::stats::sample_std;

/// Group sessions by the key of their start time and aggregate each group.
///
/// Bins exist only for observed keys and come back in ascending key order.
pub fn bin_sessions<S: KeyScheme>(
    sessions: &[Session],
    scheme: &S,
    fraction_thresholds: &[u32],
) -> BinTable<S::Key> {
    let mut groups: BTreeMap<S::Key, Vec<&Session>> = BTreeMap::new();
    for session in sessions {
        groups
            .entry(scheme.key_for(session.start_time))
            .or_default()
            .push(session);
    }

    groups
        .into_iter()
        .map(|(key, members)| TimeBin::new(key, aggregate_sessions(members, fraction_thresholds)))
        .collect()
}

/// Dense 0..23 view of an hour-of-day table; `None` marks an hour with no sessions
pub fn dense_hours(bins: &[TimeBin<HourOfDay>]) -> [Option<&TimeBin<HourOfDay>>; HOURS_PER_DAY] {
    let mut slots = [None; HOURS_PER_DAY];
    for bin in bins {
        slots[bin.key.index()] = Some(bin);
    }
    slots
}

/// Does the selected statistic move with the hour of day?
pub fn diurnal_variation(
    by_hour: &[TimeBin<HourOfDay>],
    selector: MetricSelector,
    threshold: f64,
) -> DiurnalVariation {
    let values: Vec<f64> = by_hour.iter().filter_map(|bin| bin.value(selector)).collect();
    let std_across_hours = sample_std(&values);
    DiurnalVariation {
        std_across_hours,
        varies_by_hour: std_across_hours.map(|std| std > threshold),
    }
}
