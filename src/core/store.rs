//! Record store: the full, unfiltered indexes built once from source rows.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::error::CoreError;
use super::types::{DayStat, Occurrence};

/// date -> words occurring that day, in source order, within-day duplicates
/// preserved (repeats feed the occurrence counts).
pub type DateIndex = BTreeMap<NaiveDate, Vec<String>>;

/// word -> dates it occurs on, ordered.
pub type NodeIndex = BTreeMap<String, Vec<NaiveDate>>;

/// Immutable lookup structures over the loaded rows. Built once at startup
/// and never mutated; filtered views are derived from it on demand.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    occurrences: Vec<Occurrence>,
    date_index: DateIndex,
    node_index: NodeIndex,
    day_stats: BTreeMap<NaiveDate, DayStat>,
}

impl RecordStore {
    /// Build the store from parsed rows. A DayStat date appearing twice is
    /// rejected rather than silently overwritten.
    pub fn load(occurrences: Vec<Occurrence>, day_stats: Vec<DayStat>) -> Result<Self, CoreError> {
        let mut date_index = DateIndex::new();
        let mut node_index = NodeIndex::new();

        for row in &occurrences {
            date_index
                .entry(row.date)
                .or_default()
                .push(row.word.clone());
            node_index
                .entry(row.word.clone())
                .or_default()
                .push(row.date);
        }

        let mut stats = BTreeMap::new();
        for stat in day_stats {
            if stats.insert(stat.date, stat.clone()).is_some() {
                return Err(CoreError::DuplicateDate(stat.date));
            }
        }

        Ok(Self {
            occurrences,
            date_index,
            node_index,
            day_stats: stats,
        })
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn date_index(&self) -> &DateIndex {
        &self.date_index
    }

    pub fn node_index(&self) -> &NodeIndex {
        &self.node_index
    }

    pub fn day_stats(&self) -> &BTreeMap<NaiveDate, DayStat> {
        &self.day_stats
    }

    /// Earliest and latest date known to either table, for seeding the
    /// range selector.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self
            .date_index
            .keys()
            .chain(self.day_stats.keys())
            .copied();
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some((min, max))
    }

    /// Sorted union of all dates known to either table.
    pub fn known_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .date_index
            .keys()
            .chain(self.day_stats.keys())
            .copied()
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MindState;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).expect("valid test date")
    }

    fn stat(d: u32, state: MindState) -> DayStat {
        DayStat {
            date: day(d),
            mind_state: state,
            sleep_hours: 7.5,
        }
    }

    #[test]
    fn indexes_preserve_source_order_and_duplicates() {
        let rows = vec![
            Occurrence::new(day(1), "rain"),
            Occurrence::new(day(1), "coffee"),
            Occurrence::new(day(1), "rain"),
            Occurrence::new(day(2), "coffee"),
        ];
        let store = RecordStore::load(rows, vec![]).unwrap();

        assert_eq!(store.date_index()[&day(1)], vec!["rain", "coffee", "rain"]);
        assert_eq!(store.node_index()["rain"], vec![day(1), day(1)]);
        assert_eq!(store.node_index()["coffee"], vec![day(1), day(2)]);
    }

    #[test]
    fn duplicate_day_stat_date_is_rejected() {
        let stats = vec![stat(1, MindState::Good), stat(1, MindState::Bad)];
        let err = RecordStore::load(vec![], stats).unwrap_err();
        assert_eq!(err, CoreError::DuplicateDate(day(1)));
    }

    #[test]
    fn date_bounds_span_both_tables() {
        let rows = vec![Occurrence::new(day(5), "walk")];
        let stats = vec![stat(2, MindState::Neutral), stat(9, MindState::Good)];
        let store = RecordStore::load(rows, stats).unwrap();
        assert_eq!(store.date_bounds(), Some((day(2), day(9))));
        assert_eq!(store.known_dates(), vec![day(2), day(5), day(9)]);
    }

    #[test]
    fn empty_store_has_no_bounds() {
        let store = RecordStore::load(vec![], vec![]).unwrap();
        assert_eq!(store.date_bounds(), None);
    }
}
