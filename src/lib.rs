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
//! Library for post-processing the JSON traces written by the simzip simulation: per-node timing
//! histograms and a Graphviz diagram of the simulated topology.

pub mod error;
pub mod figure;
pub mod graph;
pub mod msgs;
pub mod render;
pub mod stats;
pub mod trace;
pub mod util;

#[cfg(test)]
mod test;

pub use error::{Result, ZipitError};

/// Settings shared by all rendered figures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotConfig {
    /// Number of histogram bins per sample array.
    pub bins: usize,
    /// Width of static (svg, png) figures in pixels.
    pub width: u32,
    /// Height of static (svg, png) figures in pixels.
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            bins: stats::DEFAULT_BINS,
            width: 640,
            height: 480,
        }
    }
}

pub mod prelude {
    pub use super::{
        figure::TimingFigure,
        graph::{DotGraph, GraphNaming},
        render::FigureFormat,
        stats::{Histogram, Stats, TimeUnit},
        trace::{Direction, Node, NodeIndex, Trace},
        PlotConfig, Result, ZipitError,
    };
}
