//! Source rows and the mind-state category type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One recorded appearance of a word on a date, optionally tagged with an
/// explicit mind state from the source row. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub word: String,
    #[serde(default)]
    pub tag: Option<MindState>,
}

impl Occurrence {
    pub fn new(date: NaiveDate, word: impl Into<String>) -> Self {
        Self {
            date,
            word: word.into(),
            tag: None,
        }
    }
}

/// Day-level stats. One per distinct date, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStat {
    pub date: NaiveDate,
    pub mind_state: MindState,
    /// Hours slept the night before, >= 0 (validated at load).
    pub sleep_hours: f32,
}

/// The day's mind state on a seven-step scale, score -3 (worst) to +3 (best).
///
/// Variant order is the fixed enumeration order: aggregate tie-breaks pick
/// the first variant in this order that reaches the maximum count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MindState {
    Awful,
    Bad,
    Low,
    Neutral,
    Good,
    Great,
    Radiant,
}

impl MindState {
    /// All variants in enumeration (tie-break) order.
    pub const ALL: [MindState; 7] = [
        MindState::Awful,
        MindState::Bad,
        MindState::Low,
        MindState::Neutral,
        MindState::Good,
        MindState::Great,
        MindState::Radiant,
    ];

    /// Map a source score in [-3, 3] to a variant.
    pub fn from_score(score: i8) -> Option<Self> {
        match score {
            -3 => Some(MindState::Awful),
            -2 => Some(MindState::Bad),
            -1 => Some(MindState::Low),
            0 => Some(MindState::Neutral),
            1 => Some(MindState::Good),
            2 => Some(MindState::Great),
            3 => Some(MindState::Radiant),
            _ => None,
        }
    }

    pub fn score(&self) -> i8 {
        match self {
            MindState::Awful => -3,
            MindState::Bad => -2,
            MindState::Low => -1,
            MindState::Neutral => 0,
            MindState::Good => 1,
            MindState::Great => 2,
            MindState::Radiant => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MindState::Awful => "Awful",
            MindState::Bad => "Bad",
            MindState::Low => "Low",
            MindState::Neutral => "Neutral",
            MindState::Good => "Good",
            MindState::Great => "Great",
            MindState::Radiant => "Radiant",
        }
    }

    /// Index into [`MindState::ALL`].
    pub fn index(&self) -> usize {
        (self.score() + 3) as usize
    }
}

/// Count of days per mind state. Empty (all zero) is a valid result and
/// distinct from an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MindStateDistribution {
    counts: [usize; 7],
}

impl MindStateDistribution {
    pub fn add(&mut self, state: MindState) {
        self.counts[state.index()] += 1;
    }

    pub fn get(&self, state: MindState) -> usize {
        self.counts[state.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// (state, count) pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (MindState, usize)> + '_ {
        MindState::ALL.iter().map(|&s| (s, self.counts[s.index()]))
    }

    /// First state in enumeration order reaching the maximum count, if any
    /// count is nonzero.
    pub fn mode(&self) -> Option<MindState> {
        let max = *self.counts.iter().max()?;
        if max == 0 {
            return None;
        }
        MindState::ALL.iter().copied().find(|s| self.counts[s.index()] == max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_roundtrip() {
        for state in MindState::ALL {
            assert_eq!(MindState::from_score(state.score()), Some(state));
        }
        assert_eq!(MindState::from_score(4), None);
        assert_eq!(MindState::from_score(-4), None);
    }

    #[test]
    fn mode_breaks_ties_by_enumeration_order() {
        let mut dist = MindStateDistribution::default();
        dist.add(MindState::Great);
        dist.add(MindState::Bad);
        // Bad precedes Great in enumeration order, both at count 1.
        assert_eq!(dist.mode(), Some(MindState::Bad));
    }

    #[test]
    fn empty_distribution_has_no_mode() {
        let dist = MindStateDistribution::default();
        assert!(dist.is_empty());
        assert_eq!(dist.mode(), None);
    }
}
