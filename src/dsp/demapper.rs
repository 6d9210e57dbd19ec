//! Hard-decision demapper
//!
//! Classifies each received sample to the nearest ideal constellation point
//! (minimum Euclidean distance). Equidistant points resolve to the lowest
//! index: a later point only replaces the current best when strictly closer.

use num_complex::Complex64;

use super::constellation::ConstellationTable;
use crate::domain::DemapResult;

/// Minimum-distance demapper over a fixed constellation
#[derive(Debug, Clone)]
pub struct Demapper {
    table: ConstellationTable,
}

impl Demapper {
    pub fn new(table: ConstellationTable) -> Self {
        Self { table }
    }

    /// Nearest ideal point to `sample`, with its index
    pub fn demap(&self, sample: Complex64) -> DemapResult {
        let points = self.table.values();
        let mut best = 0;
        let mut best_dist = (sample - points[0]).norm_sqr();

        for (i, &point) in points.iter().enumerate().skip(1) {
            let dist = (sample - point).norm_sqr();
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }

        DemapResult {
            ideal: points[best],
            index: best,
        }
    }

    pub fn table(&self) -> &ConstellationTable {
        &self.table
    }

    /// Constellation size (N)
    pub fn dimension(&self) -> usize {
        self.table.len()
    }
}
