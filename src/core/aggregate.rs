//! Mind-state aggregation over a word's days or a whole range.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::error::CoreError;
use super::range::DateRange;
use super::store::NodeIndex;
use super::types::{DayStat, MindState, MindStateDistribution};

/// Most frequent mind state over every date associated with `word`.
///
/// Ties go to the first state in enumeration order reaching the maximum,
/// never to recency. A word with zero tallied days (no dates, or none of its
/// dates carries a DayStat) is an error rather than a meaningless default.
pub fn dominant_mind_state(
    word: &str,
    node_index: &NodeIndex,
    day_stats: &BTreeMap<NaiveDate, DayStat>,
) -> Result<MindState, CoreError> {
    let dates = node_index
        .get(word)
        .ok_or_else(|| CoreError::NoData(word.to_string()))?;

    let mut dist = MindStateDistribution::default();
    for date in dates {
        if let Some(stat) = day_stats.get(date) {
            dist.add(stat.mind_state);
        }
    }

    dist.mode().ok_or_else(|| CoreError::NoData(word.to_string()))
}

/// Distribution of mind states over a range.
///
/// With a word, only dates associated with that word count, re-filtered to
/// the range in case the caller passed an unfiltered index. Without one,
/// every day in the range that has a DayStat counts; days without data are
/// skipped. An empty distribution is a valid result.
pub fn mind_state_distribution(
    range: DateRange,
    node_index: &NodeIndex,
    day_stats: &BTreeMap<NaiveDate, DayStat>,
    word: Option<&str>,
) -> MindStateDistribution {
    let mut dist = MindStateDistribution::default();

    match word {
        Some(word) => {
            if let Some(dates) = node_index.get(word) {
                for date in dates.iter().filter(|d| range.contains(**d)) {
                    if let Some(stat) = day_stats.get(date) {
                        dist.add(stat.mind_state);
                    }
                }
            }
        }
        None => {
            for stat in day_stats.range(range.start()..=range.end()).map(|(_, s)| s) {
                dist.add(stat.mind_state);
            }
        }
    }

    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::RecordStore;
    use crate::core::types::Occurrence;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).expect("valid test date")
    }

    fn stat(d: u32, state: MindState) -> DayStat {
        DayStat {
            date: day(d),
            mind_state: state,
            sleep_hours: 7.0,
        }
    }

    fn store() -> RecordStore {
        let rows = vec![
            Occurrence::new(day(1), "rain"),
            Occurrence::new(day(2), "rain"),
            Occurrence::new(day(3), "rain"),
            Occurrence::new(day(2), "coffee"),
            Occurrence::new(day(9), "ghost"), // no DayStat for day 9
        ];
        let stats = vec![
            stat(1, MindState::Low),
            stat(2, MindState::Good),
            stat(3, MindState::Low),
            stat(4, MindState::Great),
        ];
        RecordStore::load(rows, stats).unwrap()
    }

    #[test]
    fn dominant_picks_the_most_frequent_state() {
        let s = store();
        let dominant = dominant_mind_state("rain", s.node_index(), s.day_stats()).unwrap();
        assert_eq!(dominant, MindState::Low); // Low on d1 and d3, Good on d2
    }

    #[test]
    fn dominant_tie_breaks_by_enumeration_order() {
        let rows = vec![
            Occurrence::new(day(1), "walk"),
            Occurrence::new(day(2), "walk"),
        ];
        let stats = vec![stat(1, MindState::Great), stat(2, MindState::Bad)];
        let s = RecordStore::load(rows, stats).unwrap();
        let dominant = dominant_mind_state("walk", s.node_index(), s.day_stats()).unwrap();
        assert_eq!(dominant, MindState::Bad);
    }

    #[test]
    fn dominant_fails_without_data() {
        let s = store();
        // Unknown word.
        assert_eq!(
            dominant_mind_state("missing", s.node_index(), s.day_stats()),
            Err(CoreError::NoData("missing".into()))
        );
        // Known word whose only date has no DayStat: counts all zero.
        assert_eq!(
            dominant_mind_state("ghost", s.node_index(), s.day_stats()),
            Err(CoreError::NoData("ghost".into()))
        );
    }

    #[test]
    fn range_distribution_skips_days_without_stats() {
        let s = store();
        let range = DateRange::new(day(1), day(9)).unwrap();
        let dist = mind_state_distribution(range, s.node_index(), s.day_stats(), None);
        assert_eq!(dist.total(), 4);
        assert_eq!(dist.get(MindState::Low), 2);
        assert_eq!(dist.get(MindState::Good), 1);
        assert_eq!(dist.get(MindState::Great), 1);
    }

    #[test]
    fn empty_range_distribution_is_empty_not_an_error() {
        let s = store();
        let range = DateRange::new(day(20), day(25)).unwrap();
        let dist = mind_state_distribution(range, s.node_index(), s.day_stats(), None);
        assert!(dist.is_empty());
    }

    #[test]
    fn word_distribution_refilters_to_the_range() {
        let s = store();
        // Unfiltered node index on purpose; range keeps only d2 and d3.
        let range = DateRange::new(day(2), day(3)).unwrap();
        let dist = mind_state_distribution(range, s.node_index(), s.day_stats(), Some("rain"));
        assert_eq!(dist.get(MindState::Good), 1);
        assert_eq!(dist.get(MindState::Low), 1);
        assert_eq!(dist.total(), 2);
    }
}
