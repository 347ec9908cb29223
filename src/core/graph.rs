//! Co-occurrence graph builder.
//!
//! Two words are linked iff they appear on the same day at least once. The
//! result is a simple undirected graph: no duplicate edges across days, no
//! self-loops, plus a per-word occurrence count over the active range.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex as GraphIx, UnGraph};

use super::range::FilteredIndex;

/// Node payload: the word and its total occurrence count within the range
/// (within-day repeats included, so this is occurrences, not distinct days).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordNode {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct CooccurrenceGraph {
    graph: UnGraph<WordNode, ()>,
    indices: HashMap<String, GraphIx>,
}

impl Default for CooccurrenceGraph {
    fn default() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            indices: HashMap::new(),
        }
    }
}

impl CooccurrenceGraph {
    /// Build from a filtered date index.
    ///
    /// Nested within-day pair scan, O(sum of k_d^2) for k_d words on day d.
    /// Fine at tens of words per day; `find_edge` on the undirected graph
    /// handles the unordered-pair dedup.
    pub fn build(filtered: &FilteredIndex) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut indices: HashMap<String, GraphIx> = HashMap::new();

        for words in filtered.date_index().values() {
            for word in words {
                let ix = *indices.entry(word.clone()).or_insert_with(|| {
                    graph.add_node(WordNode {
                        word: word.clone(),
                        count: 0,
                    })
                });
                graph[ix].count += 1;
            }

            for (i, a) in words.iter().enumerate() {
                for b in &words[i + 1..] {
                    let (ia, ib) = (indices[a.as_str()], indices[b.as_str()]);
                    if ia == ib {
                        continue; // same word repeated within the day
                    }
                    if graph.find_edge(ia, ib).is_none() {
                        graph.add_edge(ia, ib, ());
                    }
                }
            }
        }

        Self { graph, indices }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.indices.contains_key(word)
    }

    pub fn count(&self, word: &str) -> Option<usize> {
        self.indices.get(word).map(|&ix| self.graph[ix].count)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Sum of all occurrence counts (equals the total row count in range).
    pub fn total_count(&self) -> usize {
        self.graph.node_weights().map(|n| n.count).sum()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &WordNode> {
        self.graph.node_weights()
    }

    /// Edge endpoints as word pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_indices().map(|e| {
            let (a, b) = self
                .graph
                .edge_endpoints(e)
                .expect("edge index from this graph");
            (self.graph[a].word.as_str(), self.graph[b].word.as_str())
        })
    }

    pub fn neighbors(&self, word: &str) -> Vec<&str> {
        match self.indices.get(word) {
            Some(&ix) => self
                .graph
                .neighbors(ix)
                .map(|n| self.graph[n].word.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.indices.get(a), self.indices.get(b)) {
            (Some(&ia), Some(&ib)) => self.graph.find_edge(ia, ib).is_some(),
            _ => false,
        }
    }

    /// Largest occurrence count over all words (0 when empty). Used to scale
    /// node radii.
    pub fn max_count(&self) -> usize {
        self.graph.node_weights().map(|n| n.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::range::{DateRange, FilteredIndex};
    use crate::core::store::RecordStore;
    use crate::core::types::Occurrence;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).expect("valid test date")
    }

    fn graph_for(rows: Vec<(u32, &str)>, start: u32, end: u32) -> CooccurrenceGraph {
        let occurrences = rows
            .into_iter()
            .map(|(d, w)| Occurrence::new(day(d), w))
            .collect();
        let store = RecordStore::load(occurrences, vec![]).unwrap();
        let filtered = FilteredIndex::build(
            store.date_index(),
            DateRange::new(day(start), day(end)).unwrap(),
        );
        CooccurrenceGraph::build(&filtered)
    }

    #[test]
    fn counts_and_single_edge() {
        // Scenario from the data contract: [(d1,A),(d1,B),(d2,A)], range [d1,d2].
        let g = graph_for(vec![(1, "A"), (1, "B"), (2, "A")], 1, 2);
        assert_eq!(g.count("A"), Some(2));
        assert_eq!(g.count("B"), Some(1));
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge("A", "B"));
    }

    #[test]
    fn repeated_cooccurrence_yields_one_edge() {
        let g = graph_for(vec![(1, "A"), (1, "B"), (2, "A"), (2, "B")], 1, 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge("A", "B"));
        assert!(g.has_edge("B", "A"));
    }

    #[test]
    fn within_day_repeats_count_but_never_self_loop() {
        let g = graph_for(vec![(1, "A"), (1, "A"), (1, "A")], 1, 1);
        assert_eq!(g.count("A"), Some(3));
        assert_eq!(g.edge_count(), 0);
        assert!(!g.has_edge("A", "A"));
    }

    #[test]
    fn no_duplicate_unordered_pairs() {
        let g = graph_for(
            vec![(1, "A"), (1, "B"), (1, "C"), (2, "C"), (2, "B"), (3, "A"), (3, "C")],
            1,
            3,
        );
        let mut seen = HashSet::new();
        for (a, b) in g.edges() {
            let key = if a < b { (a, b) } else { (b, a) };
            assert!(seen.insert(key), "duplicate edge {a}-{b}");
            assert_ne!(a, b, "self-loop on {a}");
        }
        assert_eq!(g.edge_count(), 3); // A-B, A-C, B-C
    }

    #[test]
    fn count_conservation() {
        let rows = vec![(1, "A"), (1, "B"), (1, "A"), (2, "C"), (3, "B")];
        let total_rows = rows.len();
        let g = graph_for(rows, 1, 3);
        assert_eq!(g.total_count(), total_rows);
    }

    #[test]
    fn lone_word_on_a_day_counts_without_edges() {
        let g = graph_for(vec![(1, "solo")], 1, 1);
        assert_eq!(g.count("solo"), Some(1));
        assert_eq!(g.edge_count(), 0);
        assert!(g.neighbors("solo").is_empty());
    }

    #[test]
    fn empty_range_builds_empty_graph() {
        let g = graph_for(vec![(1, "A")], 5, 9);
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.max_count(), 0);
    }
}
