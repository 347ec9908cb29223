//! Inclusive date range and the filtered view it induces.

use chrono::NaiveDate;

use super::error::CoreError;
use super::store::{DateIndex, NodeIndex};

/// [start, end] calendar-day boundary, inclusive at both ends.
/// `start <= end` always holds; construction enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Single-day range.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The DateIndex restricted to a range, plus the inverse word index derived
/// only from the retained dates. Pure function of (DateIndex, DateRange);
/// rebuilt whole on every range change.
#[derive(Debug, Clone, Default)]
pub struct FilteredIndex {
    date_index: DateIndex,
    node_index: NodeIndex,
}

impl FilteredIndex {
    pub fn build(full: &DateIndex, range: DateRange) -> Self {
        let mut date_index = DateIndex::new();
        let mut node_index = NodeIndex::new();

        for (&date, words) in full.range(range.start()..=range.end()) {
            date_index.insert(date, words.clone());
            for word in words {
                node_index.entry(word.clone()).or_default().push(date);
            }
        }

        Self {
            date_index,
            node_index,
        }
    }

    pub fn date_index(&self) -> &DateIndex {
        &self.date_index
    }

    pub fn node_index(&self) -> &NodeIndex {
        &self.node_index
    }

    pub fn dates_for(&self, word: &str) -> Option<&[NaiveDate]> {
        self.node_index.get(word).map(Vec::as_slice)
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.node_index.contains_key(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::RecordStore;
    use crate::core::types::Occurrence;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).expect("valid test date")
    }

    fn sample_index() -> DateIndex {
        let rows = vec![
            Occurrence::new(day(1), "rain"),
            Occurrence::new(day(2), "coffee"),
            Occurrence::new(day(3), "rain"),
            Occurrence::new(day(3), "walk"),
            Occurrence::new(day(7), "coffee"),
        ];
        RecordStore::load(rows, vec![]).unwrap().date_index().clone()
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = DateRange::new(day(5), day(2)).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidRange {
                start: day(5),
                end: day(2)
            }
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let full = sample_index();
        let filtered = FilteredIndex::build(&full, DateRange::new(day(2), day(3)).unwrap());
        assert!(filtered.date_index().contains_key(&day(2)));
        assert!(filtered.date_index().contains_key(&day(3)));
        assert!(!filtered.date_index().contains_key(&day(1)));
        assert!(!filtered.date_index().contains_key(&day(7)));
        // A word absent from every retained date is absent from the index.
        assert!(!filtered.contains_word("nothing"));
        assert_eq!(filtered.dates_for("rain"), Some(&[day(3)][..]));
    }

    #[test]
    fn filter_is_idempotent() {
        let full = sample_index();
        let range = DateRange::new(day(1), day(3)).unwrap();
        let once = FilteredIndex::build(&full, range);
        let twice = FilteredIndex::build(once.date_index(), range);
        assert_eq!(once.date_index(), twice.date_index());
        assert_eq!(once.node_index(), twice.node_index());
    }

    #[test]
    fn widening_is_monotone_on_words() {
        let full = sample_index();
        let narrow = FilteredIndex::build(&full, DateRange::new(day(2), day(3)).unwrap());
        let wide = FilteredIndex::build(&full, DateRange::new(day(1), day(7)).unwrap());
        for word in narrow.node_index().keys() {
            assert!(wide.contains_word(word), "lost {word} when widening");
        }
    }
}
