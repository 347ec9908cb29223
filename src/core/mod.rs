//! Data pipeline: record store -> range filter -> co-occurrence graph ->
//! aggregates, with single-word selection on top.
//!
//! One `DashboardCore` owns the immutable store and every derived structure.
//! Derived state is rebuilt whole on each range change; there is no
//! incremental update path, which keeps rebuilds total and interleaving-free.

pub mod aggregate;
pub mod error;
pub mod graph;
pub mod range;
pub mod selection;
pub mod store;
pub mod types;

use chrono::NaiveDate;

pub use aggregate::{dominant_mind_state, mind_state_distribution};
pub use error::CoreError;
pub use graph::{CooccurrenceGraph, WordNode};
pub use range::{DateRange, FilteredIndex};
pub use selection::{Selection, SelectionChange};
pub use store::RecordStore;
pub use types::{DayStat, MindState, MindStateDistribution, Occurrence};

/// Everything the presentation layer reads about one word.
#[derive(Debug, Clone)]
pub struct WordSummary {
    pub word: String,
    pub count: usize,
    pub dominant: Option<MindState>,
    pub distribution: MindStateDistribution,
    pub dates: Vec<NaiveDate>,
}

/// Owns the loaded store, the active range, and the derived filtered index,
/// graph and selection.
#[derive(Debug, Clone)]
pub struct DashboardCore {
    store: RecordStore,
    range: DateRange,
    filtered: FilteredIndex,
    graph: CooccurrenceGraph,
    selection: Selection,
}

impl DashboardCore {
    /// Start with the range spanning every known date.
    pub fn new(store: RecordStore) -> Self {
        let range = match store.date_bounds() {
            Some((start, end)) => DateRange::new(start, end).expect("bounds are ordered"),
            None => DateRange::single(NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date")),
        };

        let mut core = Self {
            store,
            range,
            filtered: FilteredIndex::default(),
            graph: CooccurrenceGraph::default(),
            selection: Selection::default(),
        };
        core.rebuild();
        core
    }

    fn rebuild(&mut self) {
        self.filtered = FilteredIndex::build(self.store.date_index(), self.range);
        self.graph = CooccurrenceGraph::build(&self.filtered);
        self.selection.prune(&self.graph);
        tracing::debug!(
            start = %self.range.start(),
            end = %self.range.end(),
            words = self.graph.node_count(),
            links = self.graph.edge_count(),
            "rebuilt filtered graph"
        );
    }

    /// Move the range boundary. An inverted boundary is rejected and the
    /// prior range stays in effect.
    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), CoreError> {
        let range = DateRange::new(start, end)?;
        if range != self.range {
            self.range = range;
            self.rebuild();
        }
        Ok(())
    }

    pub fn select_word(&mut self, word: &str) -> SelectionChange {
        self.selection.select(word)
    }

    pub fn clear_selection(&mut self) -> SelectionChange {
        self.selection.clear()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.current()
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn filtered(&self) -> &FilteredIndex {
        &self.filtered
    }

    pub fn graph(&self) -> &CooccurrenceGraph {
        &self.graph
    }

    /// Mind-state distribution for the selected word if any, otherwise for
    /// every stat-carrying day in the active range.
    pub fn active_distribution(&self) -> MindStateDistribution {
        mind_state_distribution(
            self.range,
            self.filtered.node_index(),
            self.store.day_stats(),
            self.selection.current(),
        )
    }

    pub fn dominant_mind_state(&self, word: &str) -> Result<MindState, CoreError> {
        dominant_mind_state(word, self.filtered.node_index(), self.store.day_stats())
    }

    /// Day stats within the active range, date-ordered (histogram input).
    pub fn day_stats_in_range(&self) -> Vec<&DayStat> {
        self.store
            .day_stats()
            .range(self.range.start()..=self.range.end())
            .map(|(_, s)| s)
            .collect()
    }

    pub fn word_summary(&self, word: &str) -> Option<WordSummary> {
        let count = self.graph.count(word)?;
        let dates = self.filtered.dates_for(word).unwrap_or(&[]).to_vec();
        let distribution = mind_state_distribution(
            self.range,
            self.filtered.node_index(),
            self.store.day_stats(),
            Some(word),
        );
        Some(WordSummary {
            word: word.to_string(),
            count,
            dominant: self.dominant_mind_state(word).ok(),
            distribution,
            dates,
        })
    }
}
