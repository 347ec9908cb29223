//! Force-directed layout for the co-occurrence canvas.
//!
//! Repulsion between all nodes, spring attraction along edges, a centering
//! pull toward the origin, and damping to settle. Forces are computed with a
//! direct pairwise scan: the graph holds tens of words, so no spatial index
//! is needed.

use std::collections::HashMap;

use egui::{Pos2, Vec2};
use rand::Rng;

use crate::core::CooccurrenceGraph;

/// Layout parameters.
pub struct ForceLayout {
    /// Repulsion strength between nodes
    pub repulsion: f32,
    /// Attraction strength along edges
    pub attraction: f32,
    /// Centering force strength
    pub centering: f32,
    /// Damping factor (0.0 - 1.0)
    pub damping: f32,
    /// Minimum distance to prevent division by zero
    pub min_distance: f32,
    /// Maximum velocity
    pub max_velocity: f32,
    /// Ideal edge length
    pub ideal_length: f32,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            repulsion: 9000.0,
            attraction: 0.06,
            centering: 0.002,
            damping: 0.85,
            min_distance: 25.0,
            max_velocity: 40.0,
            ideal_length: 130.0,
        }
    }
}

/// Per-word positions and velocities, in graph space centered on the origin.
#[derive(Default)]
pub struct LayoutState {
    positions: HashMap<String, Pos2>,
    velocities: HashMap<String, Vec2>,
    /// Word currently held by a drag; the simulation leaves it in place.
    pinned: Option<String>,
}

impl LayoutState {
    /// Reconcile with a rebuilt graph: words that survived keep their
    /// positions, new words seed randomly, departed words are dropped.
    pub fn sync(&mut self, graph: &CooccurrenceGraph) {
        self.positions.retain(|word, _| graph.contains(word));
        self.velocities.retain(|word, _| graph.contains(word));
        if self.pinned.as_deref().is_some_and(|w| !graph.contains(w)) {
            self.pinned = None;
        }

        let mut rng = rand::thread_rng();
        for node in graph.nodes() {
            if !self.positions.contains_key(&node.word) {
                let pos = Pos2::new(rng.gen_range(-250.0..250.0), rng.gen_range(-250.0..250.0));
                self.positions.insert(node.word.clone(), pos);
                self.velocities.insert(node.word.clone(), Vec2::ZERO);
            }
        }
    }

    pub fn get_pos(&self, word: &str) -> Option<Pos2> {
        self.positions.get(word).copied()
    }

    /// Place a word directly (drag), killing its velocity.
    pub fn set_pos(&mut self, word: &str, pos: Pos2) {
        self.positions.insert(word.to_string(), pos);
        self.velocities.insert(word.to_string(), Vec2::ZERO);
    }

    pub fn pin(&mut self, word: &str) {
        self.pinned = Some(word.to_string());
    }

    pub fn unpin(&mut self) {
        self.pinned = None;
    }
}

impl ForceLayout {
    /// Run one iteration of the simulation.
    pub fn step(&self, state: &mut LayoutState, graph: &CooccurrenceGraph) {
        let words: Vec<&str> = graph.nodes().map(|n| n.word.as_str()).collect();
        if words.is_empty() {
            return;
        }

        let mut forces: HashMap<&str, Vec2> = words.iter().map(|&w| (w, Vec2::ZERO)).collect();

        // Pairwise repulsion.
        for (i, &a) in words.iter().enumerate() {
            for &b in &words[i + 1..] {
                let (Some(pa), Some(pb)) = (state.get_pos(a), state.get_pos(b)) else {
                    continue;
                };
                let delta = pa - pb;
                let dist = delta.length().max(self.min_distance);
                let push = delta / dist * (self.repulsion / (dist * dist));
                *forces.get_mut(a).expect("word registered above") += push;
                *forces.get_mut(b).expect("word registered above") -= push;
            }
        }

        // Spring attraction along edges toward the ideal length.
        for (a, b) in graph.edges() {
            let (Some(pa), Some(pb)) = (state.get_pos(a), state.get_pos(b)) else {
                continue;
            };
            let delta = pb - pa;
            let dist = delta.length().max(self.min_distance);
            let pull = delta / dist * ((dist - self.ideal_length) * self.attraction);
            *forces.get_mut(a).expect("edge endpoint is a node") += pull;
            *forces.get_mut(b).expect("edge endpoint is a node") -= pull;
        }

        // Centering toward the origin.
        for &word in &words {
            if let Some(pos) = state.get_pos(word) {
                *forces.get_mut(word).expect("word registered above") +=
                    -pos.to_vec2() * self.centering;
            }
        }

        // Integrate with damping and a velocity clamp; skip the pinned node.
        for &word in &words {
            if state.pinned.as_deref() == Some(word) {
                continue;
            }
            let force = forces[word];
            let velocity = state.velocities.entry(word.to_string()).or_insert(Vec2::ZERO);
            *velocity = (*velocity + force) * self.damping;
            if velocity.length() > self.max_velocity {
                *velocity = velocity.normalized() * self.max_velocity;
            }
            let delta = *velocity;
            if let Some(pos) = state.positions.get_mut(word) {
                *pos += delta;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DateRange, FilteredIndex, Occurrence, RecordStore};
    use chrono::NaiveDate;

    fn graph(rows: &[(&str, u32)]) -> CooccurrenceGraph {
        let occurrences = rows
            .iter()
            .map(|&(w, d)| Occurrence::new(NaiveDate::from_ymd_opt(2026, 3, d).unwrap(), w))
            .collect();
        let store = RecordStore::load(occurrences, vec![]).unwrap();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 28).unwrap(),
        )
        .unwrap();
        CooccurrenceGraph::build(&FilteredIndex::build(store.date_index(), range))
    }

    #[test]
    fn sync_seeds_new_words_and_drops_departed() {
        let mut state = LayoutState::default();
        state.sync(&graph(&[("A", 1), ("B", 1)]));
        assert!(state.get_pos("A").is_some());
        assert!(state.get_pos("B").is_some());

        let kept = state.get_pos("A").unwrap();
        state.sync(&graph(&[("A", 1)]));
        assert_eq!(state.get_pos("A"), Some(kept));
        assert!(state.get_pos("B").is_none());
    }

    #[test]
    fn springs_pull_distant_linked_words_together() {
        let g = graph(&[("A", 1), ("B", 1)]);
        let mut state = LayoutState::default();
        state.sync(&g);
        state.set_pos("A", Pos2::new(-400.0, 0.0));
        state.set_pos("B", Pos2::new(400.0, 0.0));

        let layout = ForceLayout::default();
        let before = (state.get_pos("A").unwrap() - state.get_pos("B").unwrap()).length();
        for _ in 0..10 {
            layout.step(&mut state, &g);
        }
        let after = (state.get_pos("A").unwrap() - state.get_pos("B").unwrap()).length();
        assert!(after < before, "spring did not contract: {before} -> {after}");
    }

    #[test]
    fn pinned_word_stays_put() {
        let g = graph(&[("A", 1), ("B", 1)]);
        let mut state = LayoutState::default();
        state.sync(&g);
        state.set_pos("A", Pos2::new(-300.0, 0.0));
        state.set_pos("B", Pos2::new(300.0, 0.0));
        state.pin("A");

        let layout = ForceLayout::default();
        for _ in 0..5 {
            layout.step(&mut state, &g);
        }
        assert_eq!(state.get_pos("A"), Some(Pos2::new(-300.0, 0.0)));
        assert_ne!(state.get_pos("B"), Some(Pos2::new(300.0, 0.0)));
    }
}
