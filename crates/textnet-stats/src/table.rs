//! Ordered tables of per-snapshot statistics.
//!
//! A [`StatisticsTable`] is what the sweep functions return: one row per
//! time bucket or sigma value, each holding a [`GraphStatistics`] record and
//! any extra named columns (the sigma sweep adds `la`). Rows keep insertion
//! order. Serialized, the table is a JSON array of flat objects with the
//! label stored under the index name:
//!
//! ```text
//! [{"sigma": 0.01, "n": 120, "m": 431, "D": 7.0, ..., "la": 0.12}, ...]
//! ```

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::graph_stats::GraphStatistics;

/// One labeled row of a [`StatisticsTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsRow<L> {
    pub label: L,
    pub stats: GraphStatistics,
    pub extra: BTreeMap<String, f64>,
}

/// Statistics records indexed by a label (time bucket, sigma, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsTable<L> {
    index_name: &'static str,
    rows: Vec<StatisticsRow<L>>,
}

impl<L> StatisticsTable<L> {
    /// Create an empty table whose labels are called `index_name`.
    #[must_use]
    pub const fn new(index_name: &'static str) -> Self {
        Self {
            index_name,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, label: L, stats: GraphStatistics) {
        self.push_with(label, stats, std::iter::empty::<(String, f64)>());
    }

    /// Append a row with extra named columns.
    pub fn push_with<K, I>(&mut self, label: L, stats: GraphStatistics, extra: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        self.rows.push(StatisticsRow {
            label,
            stats,
            extra: extra.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        });
    }

    #[must_use]
    pub const fn index_name(&self) -> &'static str {
        self.index_name
    }

    #[must_use]
    pub fn rows(&self) -> &[StatisticsRow<L>] {
        &self.rows
    }

    pub fn labels(&self) -> impl Iterator<Item = &L> {
        self.rows.iter().map(|row| &row.label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, metric or extra, in row order.
    ///
    /// Returns `None` if some row has no column called `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| row.stats.get(name).or_else(|| row.extra.get(name).copied()))
            .collect()
    }
}

impl<L: Serialize> StatisticsTable<L> {
    /// Serialize the table as a JSON array of row objects.
    ///
    /// # Errors
    ///
    /// Returns an error if a label fails to serialize.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl<L: Serialize> Serialize for StatisticsTable<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowView {
                index_name: self.index_name,
                row,
            })?;
        }
        seq.end()
    }
}

struct RowView<'a, L> {
    index_name: &'static str,
    row: &'a StatisticsRow<L>,
}

impl<L: Serialize> Serialize for RowView<'_, L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let stats = &self.row.stats;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(self.index_name, &self.row.label)?;
        for (key, value) in stats.iter() {
            match key {
                "n" => map.serialize_entry(key, &stats.n)?,
                "m" => map.serialize_entry(key, &stats.m)?,
                "ED" => map.serialize_entry(key, &stats.effective_diameter)?,
                _ => map.serialize_entry(key, &value)?,
            }
        }
        for (key, value) in &self.row.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
