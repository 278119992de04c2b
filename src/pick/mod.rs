//! Weighted random selection.
//!
//! One shared weighted-choice table replaces the per-script reimplementations
//! this crate was distilled from: an ordered list of cumulative weights plus
//! a total, drawn from with a single uniform integer.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One pool entry: `value` drawn with probability `weight / total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weighted<T> {
    pub weight: u32,
    pub value: T,
}

impl<T> Weighted<T> {
    pub fn new(weight: u32, value: T) -> Self {
        Self { weight, value }
    }
}

/// Pool construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// The pool has no entries.
    Empty,
    /// Every entry has zero weight.
    ZeroWeight,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::Empty => write!(f, "weight pool has no entries"),
            PoolError::ZeroWeight => write!(f, "weight pool has zero total weight"),
        }
    }
}

impl std::error::Error for PoolError {}

/// A weighted-choice table: `(cumulative weight, value)` pairs in entry
/// order, plus the total.
#[derive(Debug, Clone)]
pub struct WeightPool<T> {
    entries: Vec<(u64, T)>,
    total: u64,
}

impl<T: Clone> WeightPool<T> {
    /// Build a pool from weighted entries. Zero-weight entries are kept but
    /// can never be drawn.
    pub fn new(entries: &[Weighted<T>]) -> Result<Self, PoolError> {
        if entries.is_empty() {
            return Err(PoolError::Empty);
        }
        let mut cumulative = 0u64;
        let mut table = Vec::with_capacity(entries.len());
        for entry in entries {
            cumulative += entry.weight as u64;
            table.push((cumulative, entry.value.clone()));
        }
        if cumulative == 0 {
            return Err(PoolError::ZeroWeight);
        }
        Ok(Self {
            entries: table,
            total: cumulative,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total weight across all entries.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Draw one value: a uniform integer in `[0, total)` mapped through the
    /// cumulative table — the first entry whose cumulative weight exceeds
    /// the draw wins.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &T {
        let draw = rng.gen_range(0..self.total);
        let idx = self
            .entries
            .iter()
            .position(|(cumulative, _)| draw < *cumulative)
            .unwrap_or(self.entries.len() - 1);
        &self.entries[idx].1
    }
}
