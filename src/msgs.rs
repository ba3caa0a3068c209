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
//! Per-node message arrays: payloads, orderings, identities and timestamps of the messages a node
//! has seen, grouped by array name.
use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::trace::Trace;

/// Parallel arrays describing one stream of messages.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct MessageArrays {
    #[serde(default)]
    pub pays: Vec<f64>,
    #[serde(default)]
    pub ords: Vec<i64>,
    #[serde(default)]
    pub ids: Vec<i64>,
    #[serde(default)]
    pub ts: Vec<i64>,
}

impl MessageArrays {
    /// Number of messages. Arrays of unequal length are truncated to the shortest non-empty one.
    pub fn len(&self) -> usize {
        [self.pays.len(), self.ords.len(), self.ids.len(), self.ts.len()]
            .into_iter()
            .filter(|len| *len > 0)
            .min()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Difference between the last and first timestamp.
    pub fn ts_span(&self) -> i64 {
        match (self.ts.first(), self.ts.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }

    /// Whether the ordering values never decrease.
    pub fn is_ordered(&self) -> bool {
        self.ords.iter().tuple_windows().all(|(a, b)| a <= b)
    }
}

/// Message arrays of all timing nodes, by node key and array name. Nodes without messages and
/// null arrays are left out.
pub fn load_messages(trace: &Trace) -> BTreeMap<String, BTreeMap<String, MessageArrays>> {
    trace
        .timing_nodes()
        .filter_map(|node| {
            let arrays = node
                .msgs
                .as_ref()?
                .iter()
                .filter_map(|(name, arrays)| Some((name.clone(), arrays.clone()?)))
                .collect::<BTreeMap<_, _>>();
            Some((node.key(), arrays))
        })
        .collect()
}
