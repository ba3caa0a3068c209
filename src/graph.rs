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
//! Graphviz diagram of the simulated topology with the timing figure of each node as its image.
use std::{
    fmt::Write as _,
    fs,
    io::Write as _,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use itertools::Itertools;
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;

use crate::{
    figure::TimingFigure,
    render::{render, FigureFormat},
    trace::{node_key, split_key, Node, Trace},
    PlotConfig, Result, ZipitError,
};

lazy_static! {
    static ref BARE_ID: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref NUMERAL_ID: Regex = Regex::new(r"^-?(\.[0-9]+|[0-9]+(\.[0-9]*)?)$").unwrap();
}

const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Writes `id` as a dot identifier, quoting it unless it is a plain identifier or numeral.
pub fn quote(id: &str) -> String {
    let keyword = KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(id));
    if !keyword && (BARE_ID.is_match(id) || NUMERAL_ID.is_match(id)) {
        id.to_string()
    } else {
        format!("\"{}\"", escape(id))
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Builder for directed graphs in dot syntax.
#[derive(Clone, Debug)]
pub struct DotGraph {
    output: String,
}

impl DotGraph {
    pub fn new(name: &str) -> Self {
        let mut output = String::with_capacity(1024);
        let _ = writeln!(output, "digraph {} {{", quote(name));
        Self { output }
    }

    /// Default attributes for all following nodes.
    pub fn node_style(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        let _ = writeln!(self.output, "  node [{}];", attr_list(attrs));
        self
    }

    pub fn node(&mut self, id: &str, attrs: &[(&str, &str)]) -> &mut Self {
        if attrs.is_empty() {
            let _ = writeln!(self.output, "  {};", quote(id));
        } else {
            let _ = writeln!(self.output, "  {} [{}];", quote(id), attr_list(attrs));
        }
        self
    }

    pub fn edge(&mut self, from: &str, to: &str) -> &mut Self {
        let _ = writeln!(self.output, "  {} -> {};", quote(from), quote(to));
        self
    }

    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

fn attr_list(attrs: &[(&str, &str)]) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!("{}={}", quote(key), quote(value)))
        .join(", ")
}

/// Names of the files produced for a graph: every figure is named after the graph's output file
/// and the node, and placed next to the output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNaming {
    pub base: String,
    pub dir: PathBuf,
    pub format: FigureFormat,
}

impl GraphNaming {
    /// Derives the naming from the graph's output file. Figures use the extension `figext`, or the
    /// one of `outfile` if not given, and must be embeddable by Graphviz.
    pub fn from_outfile(outfile: impl AsRef<Path>, figext: Option<&str>) -> Result<Self> {
        let outfile = outfile.as_ref();
        let base = outfile
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let dir = outfile.parent().map(Path::to_path_buf).unwrap_or_default();
        let ext = match figext {
            Some(ext) => ext.trim_start_matches('.').to_string(),
            None => outfile
                .extension()
                .map(|ext| ext.to_string_lossy().to_string())
                .unwrap_or_default(),
        };
        let format = FigureFormat::from_extension(&ext)?;
        if !format.is_embeddable() {
            return Err(ZipitError::UnsupportedFormat(ext));
        }
        Ok(Self { base, dir, format })
    }

    /// Graph node name (and figure file stem) of the node with the given type and name.
    pub fn stem(&self, kind: &str, name: &str) -> String {
        format!("{}_{}", self.base, node_key(kind, name).replacen(':', "_", 1))
    }

    pub fn stem_for_key(&self, key: &str) -> String {
        let (kind, name) = split_key(key);
        self.stem(kind, name)
    }

    pub fn figure_path(&self, node: &Node) -> PathBuf {
        self.dir.join(format!(
            "{}.{}",
            self.stem(&node.kind, &node.name),
            self.format
        ))
    }
}

/// Builds the dot text of `trace`: one image node per timing node and an edge for every edge of
/// the trace.
pub fn dot_text(trace: &Trace, naming: &GraphNaming) -> String {
    let mut dot = DotGraph::new("base");
    dot.node_style(&[("shape", "plain")]);
    for node in trace.timing_nodes() {
        let image = naming.figure_path(node).display().to_string();
        dot.node(
            &naming.stem(&node.kind, &node.name),
            &[("image", &image), ("label", "")],
        );
    }
    for edge in trace.edges.iter() {
        dot.edge(
            &naming.stem_for_key(&edge.tail.node),
            &naming.stem_for_key(&edge.head.node),
        );
    }
    dot.build()
}

/// Renders the timing figure of every timing node, in parallel, and returns the written files in
/// the order of the trace.
pub fn render_figures(
    trace: &Trace,
    naming: &GraphNaming,
    config: &PlotConfig,
) -> Result<Vec<PathBuf>> {
    let index = trace.index();
    let nodes = trace.timing_nodes().collect_vec();
    nodes
        .par_iter()
        .map(|node| -> Result<PathBuf> {
            let figure = TimingFigure::for_node(node, &index, config)?;
            let path = naming.figure_path(node);
            render(&figure, &path, naming.format, config)?;
            Ok(path)
        })
        .collect()
}

/// Writes the dot text to `outfile` if it ends in `.dot`, otherwise lets Graphviz render it in
/// the format given by the extension of `outfile`.
pub fn emit(dot: &str, outfile: impl AsRef<Path>) -> Result<()> {
    let outfile = outfile.as_ref();
    let ext = outfile
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_default();

    if ext == "dot" {
        log::debug!("Writing {outfile:?}");
        fs::write(outfile, dot)?;
        return Ok(());
    }
    if ext.is_empty() {
        return Err(ZipitError::Graphviz(format!(
            "cannot tell the output format of {outfile:?}"
        )));
    }

    log::debug!("Running dot -T{ext} -o {outfile:?}");
    let mut command = Command::new("dot");
    command.arg(format!("-T{ext}")).arg("-o").arg(outfile);
    pipe_to(command, dot)
}

/// Runs `command` with `input` on its stdin and waits for it to finish. The child is waited on
/// even if it stops reading early.
fn pipe_to(mut command: Command, input: &str) -> Result<()> {
    let program = command.get_program().to_string_lossy().to_string();
    let mut child = command
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| ZipitError::Graphviz(format!("could not run `{program}`: {e}")))?;

    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(input.as_bytes()),
        None => Err(std::io::Error::other("no stdin")),
    };
    let status = child
        .wait()
        .map_err(|e| ZipitError::Graphviz(format!("could not wait for `{program}`: {e}")))?;

    if !status.success() {
        return Err(ZipitError::Graphviz(format!("`{program}` exited with {status}")));
    }
    written.map_err(|e| ZipitError::Graphviz(format!("could not write to `{program}`: {e}")))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn quoting() {
        assert_eq!(quote("base_zipit_1"), "base_zipit_1");
        assert_eq!(quote("12"), "12");
        assert_eq!(quote("-1.5"), "-1.5");
        assert_eq!(quote(""), "\"\"");
        assert_eq!(quote("node"), "\"node\"");
        assert_eq!(quote("a b"), "\"a b\"");
        assert_eq!(quote("a-b"), "\"a-b\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("c:\\x"), "\"c:\\\\x\"");
    }

    #[test]
    fn naming_from_outfile() {
        let naming = GraphNaming::from_outfile("plots/graph.png", None).unwrap();
        assert_eq!(naming.base, "graph");
        assert_eq!(naming.dir, PathBuf::from("plots"));
        assert_eq!(naming.format, FigureFormat::Png);
        assert_eq!(naming.stem("zipit", "1"), "graph_zipit_1");
        assert_eq!(naming.stem("sink", ""), "graph_sink");
        assert_eq!(naming.stem_for_key("sink"), "graph_sink");
        assert_eq!(naming.stem_for_key("source:a:b"), "graph_source_a:b");

        let naming = GraphNaming::from_outfile("graph.dot", Some("svg")).unwrap();
        assert_eq!(naming.dir, PathBuf::new());
        assert_eq!(naming.format, FigureFormat::Svg);
    }

    #[test]
    fn naming_needs_embeddable_figures() {
        assert!(matches!(
            GraphNaming::from_outfile("graph.dot", None),
            Err(ZipitError::UnsupportedFormat(ext)) if ext == "dot"
        ));
        assert!(matches!(
            GraphNaming::from_outfile("graph.svg", Some("html")),
            Err(ZipitError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn builder_output() {
        let mut dot = DotGraph::new("base");
        dot.node_style(&[("shape", "plain")])
            .node("a", &[])
            .node("b c", &[("label", "")])
            .edge("a", "b c");
        assert_eq!(
            dot.build(),
            "digraph base {\n  node [shape=plain];\n  a;\n  \"b c\" [label=\"\"];\n  a -> \"b c\";\n}\n"
        );
    }

    #[test]
    fn emit_dot_file() {
        let dir = std::env::temp_dir().join(format!("zipit-emit-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let outfile = dir.join("graph.dot");

        let text = DotGraph::new("base").build();
        emit(&text, &outfile).unwrap();
        assert_eq!(fs::read_to_string(&outfile).unwrap(), text);

        assert!(matches!(
            emit(&text, dir.join("graph")),
            Err(ZipitError::Graphviz(_))
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_program() {
        let command = Command::new("zipit-no-such-program");
        assert!(matches!(
            pipe_to(command, "digraph base {}\n"),
            Err(ZipitError::Graphviz(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn early_exit_is_a_graphviz_error() {
        // the child never reads, so a large input also hits a closed pipe
        let input = "x".repeat(1 << 20);
        let mut command = Command::new("sh");
        command.args(["-c", "exit 3"]);
        match pipe_to(command, &input) {
            Err(ZipitError::Graphviz(reason)) => assert!(reason.contains("exited"), "{reason}"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_pipe() {
        let mut command = Command::new("sh");
        command.args(["-c", "cat > /dev/null"]);
        pipe_to(command, "digraph base {}\n").unwrap();
    }
}
