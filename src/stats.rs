// zipit: Timing Plots and Topology Diagrams of Simulated Zipper Traces
// Copyright (C) 2024-2025 Roland Schmid <roschmi@ethz.ch> and Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//! Derived statistics of the recorded samples: time units, histograms and running moments.

use itertools::Itertools;
use strum::IntoEnumIterator;

/// Number of histogram bins used unless configured otherwise.
pub const DEFAULT_BINS: usize = 10;

/// Unit in which sample times (recorded in seconds) are displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum TimeUnit {
    #[strum(serialize = "s")]
    Seconds,
    #[strum(serialize = "ms")]
    Milliseconds,
    #[strum(serialize = "us")]
    Microseconds,
}

impl TimeUnit {
    /// Factor converting seconds into this unit.
    pub fn multiplier(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Milliseconds => 1e3,
            TimeUnit::Microseconds => 1e6,
        }
    }

    /// Picks the first unit (from seconds downwards) in which `value` is larger than one.
    pub fn pick(value: f64) -> Self {
        Self::pick_above(value, 1.0)
    }

    /// Picks the first unit (from seconds downwards) in which `value` is larger than `past`.
    /// Values too small for every unit are shown in microseconds.
    pub fn pick_above(value: f64, past: f64) -> Self {
        Self::iter()
            .find(|unit| value * unit.multiplier() > past)
            .unwrap_or(TimeUnit::Microseconds)
    }

    /// Converts `seconds` into this unit.
    pub fn scale(self, seconds: f64) -> f64 {
        seconds * self.multiplier()
    }
}

/// Equal-width histogram spanning exactly the range of its samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges in increasing order.
    pub edges: Vec<f64>,
    /// Number of samples per bin. The last bin includes its right edge.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins the finite values of `samples` into `bins` bins between their minimum and maximum.
    /// If all samples are equal, the range is widened by 0.5 on either side.
    ///
    /// Returns `None` if there is nothing to bin.
    pub fn new(samples: &[f64], bins: usize) -> Option<Self> {
        let finite = samples.iter().copied().filter(|x| x.is_finite()).collect_vec();
        if finite.is_empty() || bins == 0 {
            return None;
        }

        let (min, max) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(*x), hi.max(*x))
            });
        let (lo, hi) = if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };

        let width = (hi - lo) / bins as f64;
        let mut edges = (0..bins).map(|i| lo + width * i as f64).collect_vec();
        edges.push(hi);

        let mut counts = vec![0; bins];
        for x in finite {
            let mut idx = (((x - lo) / width) as usize).min(bins - 1);
            // correct for round-off at the bin boundaries
            if idx > 0 && x < edges[idx] {
                idx -= 1;
            } else if idx + 1 < bins && x >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        Some(Self { edges, counts })
    }

    /// Total number of binned samples.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Largest bin count.
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Lower and upper end of the binned range.
    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    /// Outline of the histogram as a step line starting and ending on zero.
    pub fn stairs(&self) -> Vec<(f64, f64)> {
        let mut points = Vec::with_capacity(2 * self.counts.len() + 2);
        points.push((self.edges[0], 0.0));
        for (i, count) in self.counts.iter().enumerate() {
            points.push((self.edges[i], *count as f64));
            points.push((self.edges[i + 1], *count as f64));
        }
        points.push((self.edges[self.edges.len() - 1], 0.0));
        points
    }
}

/// Running count, sum and sum of squares of a sequence of values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl Stats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean of all values, or zero if there are none.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Sample standard deviation, or -1 if there are fewer than two values.
    pub fn rms(&self) -> f64 {
        if self.count <= 1 {
            return -1.0;
        }
        let n = self.count as f64;
        let d = self.sum_sq - self.sum * self.sum / n;
        // round-off can give small negative values
        if d < 0.0 {
            return 0.0;
        }
        (d / (n - 1.0)).sqrt()
    }
}

impl Extend<f64> for Stats {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        iter.into_iter().for_each(|x| self.push(x));
    }
}

impl FromIterator<f64> for Stats {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut stats = Stats::default();
        stats.extend(iter);
        stats
    }
}
