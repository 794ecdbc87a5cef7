//! Input data model: neighbor maps and time indexes.
//!
//! A [`NeighborMap`] records, for every sample, how strongly each candidate
//! was selected as one of its nearest neighbors (a score in `[0, 1]`). A
//! [`TimeIndex`] assigns every sample a UTC timestamp. Both are read-only
//! inputs; nothing in the workspace mutates them after construction.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

const SECONDS_PER_DAY: i64 = 86_400;

// ---------------------------------------------------------------------------
// NeighborMap
// ---------------------------------------------------------------------------

/// Sample id → (candidate id → similarity score).
///
/// Iteration order is lexicographic by sample id, then by candidate id, so
/// graphs built from the same map always get the same node numbering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeighborMap {
    choices: BTreeMap<String, BTreeMap<String, f64>>,
}

impl NeighborMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `score` for candidate `neighbor` of sample `target`.
    ///
    /// The target is registered even when it has no candidates yet.
    pub fn insert(&mut self, target: impl Into<String>, neighbor: impl Into<String>, score: f64) {
        self.choices
            .entry(target.into())
            .or_default()
            .insert(neighbor.into(), score);
    }

    /// Register a sample without any candidates.
    pub fn add_sample(&mut self, target: impl Into<String>) {
        self.choices.entry(target.into()).or_default();
    }

    /// Candidates of one sample.
    #[must_use]
    pub fn candidates(&self, target: &str) -> Option<&BTreeMap<String, f64>> {
        self.choices.get(target)
    }

    /// Iterate over `(sample, candidates)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, f64>)> {
        self.choices.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over `(sample, neighbor, score)` for every candidate whose
    /// score reaches `sigma`.
    pub fn selected(&self, sigma: f64) -> impl Iterator<Item = (&str, &str, f64)> {
        self.choices.iter().flat_map(move |(target, candidates)| {
            candidates
                .iter()
                .filter(move |&(_, &score)| score >= sigma)
                .map(move |(neighbor, &score)| (target.as_str(), neighbor.as_str(), score))
        })
    }

    /// Number of samples that have an entry (with or without candidates).
    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

impl<T, N> FromIterator<(T, N, f64)> for NeighborMap
where
    T: Into<String>,
    N: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (T, N, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (target, neighbor, score) in iter {
            map.insert(target, neighbor, score);
        }
        map
    }
}

impl From<BTreeMap<String, BTreeMap<String, f64>>> for NeighborMap {
    fn from(choices: BTreeMap<String, BTreeMap<String, f64>>) -> Self {
        Self { choices }
    }
}

// ---------------------------------------------------------------------------
// TimeIndex
// ---------------------------------------------------------------------------

/// Sample id → timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeIndex {
    stamps: BTreeMap<String, DateTime<Utc>>,
}

impl TimeIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sample: impl Into<String>, at: DateTime<Utc>) {
        self.stamps.insert(sample.into(), at);
    }

    #[must_use]
    pub fn get(&self, sample: &str) -> Option<DateTime<Utc>> {
        self.stamps.get(sample).copied()
    }

    /// Timestamp of `sample`, or [`GraphError::MissingTimestamp`].
    ///
    /// # Errors
    ///
    /// Returns an error if `sample` is not in the index.
    pub fn require(&self, sample: &str) -> Result<DateTime<Utc>, GraphError> {
        self.get(sample)
            .ok_or_else(|| GraphError::MissingTimestamp(sample.to_string()))
    }

    /// Earliest timestamp, `None` for an empty index.
    #[must_use]
    pub fn min(&self) -> Option<DateTime<Utc>> {
        self.stamps.values().min().copied()
    }

    /// Latest timestamp, `None` for an empty index.
    #[must_use]
    pub fn max(&self) -> Option<DateTime<Utc>> {
        self.stamps.values().max().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DateTime<Utc>)> {
        self.stamps.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, DateTime<Utc>)> for TimeIndex {
    fn from_iter<I: IntoIterator<Item = (S, DateTime<Utc>)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (sample, at) in iter {
            index.insert(sample, at);
        }
        index
    }
}

/// Whole days from `earlier` to `later`, rounded toward negative infinity.
///
/// Twelve hours backwards is `-1`, not `0`.
#[must_use]
pub fn days_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    (later - earlier).num_seconds().div_euclid(SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, d, 0, 0, 0).single().expect("valid date")
    }

    #[test]
    fn insert_registers_target_and_candidate_score() {
        let mut map = NeighborMap::new();
        map.insert("a", "b", 0.9);
        map.add_sample("b");
        assert_eq!(map.len(), 2);
        assert_eq!(map.candidates("a").map(|c| c["b"]), Some(0.9));
        assert!(map.candidates("b").is_some_and(BTreeMap::is_empty));
    }

    #[test]
    fn selected_applies_inclusive_threshold() {
        let map: NeighborMap = [("a", "b", 0.5), ("a", "c", 0.49), ("b", "c", 1.0)]
            .into_iter()
            .collect();
        let picked: Vec<_> = map.selected(0.5).collect();
        assert_eq!(picked, vec![("a", "b", 0.5), ("b", "c", 1.0)]);
    }

    #[test]
    fn neighbor_map_deserializes_from_nested_json() {
        let map: NeighborMap =
            serde_json::from_str(r#"{"a": {"b": 0.9}, "b": {}}"#).expect("valid json");
        assert_eq!(map.len(), 2);
        assert_eq!(map.selected(0.5).count(), 1);
    }

    #[test]
    fn time_index_bounds() {
        let index: TimeIndex = [("x", day(3)), ("y", day(1)), ("z", day(9))]
            .into_iter()
            .collect();
        assert_eq!(index.min(), Some(day(1)));
        assert_eq!(index.max(), Some(day(9)));
        assert!(TimeIndex::new().min().is_none());
    }

    #[test]
    fn require_reports_missing_sample() {
        let index = TimeIndex::new();
        assert_eq!(
            index.require("ghost"),
            Err(GraphError::MissingTimestamp("ghost".to_string()))
        );
    }

    #[test]
    fn days_between_floors_partial_days() {
        assert_eq!(days_between(day(5), day(1)), 4);
        assert_eq!(days_between(day(1), day(5)), -4);
        assert_eq!(days_between(day(1) + Duration::hours(30), day(1)), 1);
        assert_eq!(days_between(day(1), day(1) + Duration::hours(12)), -1);
    }
}
