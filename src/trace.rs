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
//! Module defining the trace records written by the simulation and the index used to look up
//! nodes by their `type:name` key.
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    msgs::MessageArrays,
    stats::Stats,
    Result, ZipitError,
};

/// Builds the key of a node: `type:name`, or just `type` if the name is empty.
pub fn node_key(kind: &str, name: &str) -> String {
    if name.is_empty() {
        kind.to_string()
    } else {
        format!("{kind}:{name}")
    }
}

/// Splits a node key into type and name at the first `:`.
pub fn split_key(key: &str) -> (&str, &str) {
    key.split_once(':').unwrap_or((key, ""))
}

/// Node types written by the simulation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    Source,
    Transfer,
    Zipit,
    Sink,
    Random,
}

/// A complete trace: the simulated nodes and the edges between them.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Trace {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Trace {
    /// Reads and parses the trace stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading trace {path:?}");
        let trace: Trace = fs::read_to_string(path)?.parse()?;
        log::info!(
            "Loaded {} nodes and {} edges from {path:?}",
            trace.nodes.len(),
            trace.edges.len()
        );
        Ok(trace)
    }

    /// Index of all nodes by key.
    pub fn index(&self) -> NodeIndex<'_> {
        NodeIndex::new(&self.nodes)
    }

    /// All nodes that carry timing samples, i.e., everything except random distributions.
    pub fn timing_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| !node.is_random())
    }
}

impl FromStr for Trace {
    type Err = ZipitError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// A simulated component.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: NodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgs: Option<BTreeMap<String, Option<MessageArrays>>>,
}

impl Node {
    pub fn key(&self) -> String {
        node_key(&self.kind, &self.name)
    }

    /// The known type of this node, if any.
    pub fn node_kind(&self) -> Option<NodeKind> {
        self.kind.parse().ok()
    }

    pub fn is_random(&self) -> bool {
        self.node_kind() == Some(NodeKind::Random)
    }

    /// Error for a field this node lacks.
    pub(crate) fn missing(&self, field: &'static str) -> ZipitError {
        ZipitError::MissingField {
            node: self.key(),
            field,
        }
    }
}

/// Data recorded for a node. Timing nodes carry the send and receive samples, zipit nodes also
/// their latency bound and fill level, random nodes their distribution parameters.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct NodeData {
    #[serde(rename = "Rsamples", default)]
    pub recv_samples: Vec<f64>,
    #[serde(rename = "Ssamples", default)]
    pub send_samples: Vec<f64>,
    #[serde(rename = "Rn", default, skip_serializing_if = "Option::is_none")]
    pub recv_count: Option<usize>,
    #[serde(rename = "Sn", default, skip_serializing_if = "Option::is_none")]
    pub send_count: Option<usize>,
    #[serde(rename = "Rmu", default, skip_serializing_if = "Option::is_none")]
    pub recv_mean: Option<f64>,
    #[serde(rename = "Smu", default, skip_serializing_if = "Option::is_none")]
    pub send_mean: Option<f64>,
    #[serde(rename = "Rrms", default, skip_serializing_if = "Option::is_none")]
    pub recv_rms: Option<f64>,
    #[serde(rename = "Srms", default, skip_serializing_if = "Option::is_none")]
    pub send_rms: Option<f64>,
    /// Latency bound of a zipit, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_latency: Option<f64>,
    /// Number of messages held by a zipit at the end of the simulation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipsize: Option<usize>,
    /// Delay of the node. For sources, the key of the random node providing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<serde_json::Value>,
    /// Mean period of a random delay distribution, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Message direction of a timing node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Send,
    Recv,
}

impl Direction {
    /// Prefix of the data fields of this direction (`S` or `R`).
    pub fn prefix(self) -> char {
        match self {
            Direction::Send => 'S',
            Direction::Recv => 'R',
        }
    }
}

/// Summary of the samples of one direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing<'a> {
    pub samples: &'a [f64],
    pub count: usize,
    pub mean: f64,
    pub rms: f64,
}

impl NodeData {
    pub fn samples(&self, direction: Direction) -> &[f64] {
        match direction {
            Direction::Send => &self.send_samples,
            Direction::Recv => &self.recv_samples,
        }
    }

    /// Samples and moments of one direction. Moments missing from the trace are computed from
    /// the samples.
    pub fn timing(&self, direction: Direction) -> Timing<'_> {
        let samples = self.samples(direction);
        let (count, mean, rms) = match direction {
            Direction::Send => (self.send_count, self.send_mean, self.send_rms),
            Direction::Recv => (self.recv_count, self.recv_mean, self.recv_rms),
        };
        let stats = if count.is_none() || mean.is_none() || rms.is_none() {
            samples.iter().copied().collect()
        } else {
            Stats::default()
        };
        Timing {
            samples,
            count: count.unwrap_or_else(|| stats.count()),
            mean: mean.unwrap_or_else(|| stats.mean()),
            rms: rms.unwrap_or_else(|| stats.rms()),
        }
    }

    /// Largest sample over both directions, or zero without samples.
    pub fn max_sample(&self) -> f64 {
        self.send_samples
            .iter()
            .chain(self.recv_samples.iter())
            .copied()
            .fold(0.0, f64::max)
    }
}

/// End of an edge.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Endpoint {
    /// Key of the connected node.
    pub node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<serde_json::Value>,
}

/// Message flow from `tail` to `head`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Edge {
    pub tail: Endpoint,
    pub head: Endpoint,
}

/// Nodes of a trace by key.
#[derive(Clone, Debug, Default)]
pub struct NodeIndex<'a> {
    nodes: HashMap<String, &'a Node>,
}

impl<'a> NodeIndex<'a> {
    /// Indexes `nodes` in order. On duplicate keys, the later node wins.
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if index.insert(node.key(), node).is_some() {
                log::warn!("Duplicate node `{}`, keeping the last one", node.key());
            }
        }
        Self { nodes: index }
    }

    pub fn get(&self, key: &str) -> Result<&'a Node> {
        self.nodes
            .get(key)
            .copied()
            .ok_or_else(|| ZipitError::UnknownNode(key.to_string()))
    }

    /// Looks up the node of the given type and instance name.
    pub fn lookup(&self, kind: &str, name: &str) -> Result<&'a Node> {
        self.get(&node_key(kind, name))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
