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
//! Error type of the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Shorthand for results carrying a [`ZipitError`].
pub type Result<T> = std::result::Result<T, ZipitError>;

/// Everything that can go wrong while reading a trace and producing its plots.
#[derive(Debug, Error)]
pub enum ZipitError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The trace is not valid JSON or does not match the expected layout.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// No node with the given key exists in the trace.
    #[error("Unknown node `{0}`")]
    UnknownNode(String),
    /// A node lacks a field required for the requested output.
    #[error("Node `{node}` has no field `{field}`")]
    MissingField { node: String, field: &'static str },
    /// The file extension does not name a supported figure format.
    #[error("Unsupported figure format `{0}`")]
    UnsupportedFormat(String),
    /// The plotting backend failed.
    #[error("Could not render {path:?}: {reason}")]
    Render { path: PathBuf, reason: String },
    /// Graphviz could not be run or reported a failure.
    #[error("Graphviz error: {0}")]
    Graphviz(String),
}
