//! Single-word selection with toggle semantics.

use super::graph::CooccurrenceGraph;

/// Result of a selection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<String>,
    pub current: Option<String>,
}

/// At most one selected word. Re-selecting the current word clears it; a
/// rebuild that drops the word from the graph clears it too (via [`prune`]).
///
/// [`prune`]: Selection::prune
#[derive(Debug, Clone, Default)]
pub struct Selection {
    current: Option<String>,
}

impl Selection {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_selected(&self, word: &str) -> bool {
        self.current.as_deref() == Some(word)
    }

    pub fn select(&mut self, word: &str) -> SelectionChange {
        let previous = self.current.take();
        if previous.as_deref() != Some(word) {
            self.current = Some(word.to_string());
        }
        SelectionChange {
            previous,
            current: self.current.clone(),
        }
    }

    pub fn clear(&mut self) -> SelectionChange {
        SelectionChange {
            previous: self.current.take(),
            current: None,
        }
    }

    /// Drop a selection the filtered graph no longer contains.
    pub fn prune(&mut self, graph: &CooccurrenceGraph) {
        if let Some(word) = &self.current {
            if !graph.contains(word) {
                self.current = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::range::{DateRange, FilteredIndex};
    use crate::core::store::RecordStore;
    use crate::core::types::Occurrence;
    use chrono::NaiveDate;

    #[test]
    fn selecting_twice_toggles_off() {
        let mut sel = Selection::default();

        let change = sel.select("A");
        assert_eq!(
            change,
            SelectionChange {
                previous: None,
                current: Some("A".into())
            }
        );

        let change = sel.select("A");
        assert_eq!(
            change,
            SelectionChange {
                previous: Some("A".into()),
                current: None
            }
        );
        assert_eq!(sel.current(), None);
    }

    #[test]
    fn selecting_another_word_replaces() {
        let mut sel = Selection::default();
        sel.select("A");
        let change = sel.select("B");
        assert_eq!(change.previous.as_deref(), Some("A"));
        assert_eq!(change.current.as_deref(), Some("B"));
        assert!(sel.is_selected("B"));
        assert!(!sel.is_selected("A"));
    }

    #[test]
    fn prune_clears_words_missing_from_graph() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let store = RecordStore::load(vec![Occurrence::new(date, "A")], vec![]).unwrap();
        let filtered = FilteredIndex::build(store.date_index(), DateRange::single(date));
        let graph = crate::core::graph::CooccurrenceGraph::build(&filtered);

        let mut sel = Selection::default();
        sel.select("A");
        sel.prune(&graph);
        assert_eq!(sel.current(), Some("A"));

        sel.select("B");
        sel.prune(&graph);
        assert_eq!(sel.current(), None);
    }
}
