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
//! Timing figure of a single node: one histogram per message direction, annotated with the
//! moments of the samples and a title summarizing the node.

use strum::IntoEnumIterator;

use crate::{
    stats::{Histogram, TimeUnit},
    trace::{Direction, Node, NodeIndex, NodeKind},
    PlotConfig, Result,
};

/// Histogram of the samples of one direction, already scaled to the figure's time unit.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingSeries {
    pub direction: Direction,
    pub label: String,
    pub histogram: Histogram,
}

/// Everything needed to draw the timing plot of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingFigure {
    pub title: String,
    pub unit: TimeUnit,
    pub series: Vec<TimingSeries>,
}

impl TimingFigure {
    /// Builds the figure of `node`. The `index` is used to resolve the delay distribution of
    /// sources.
    pub fn for_node(node: &Node, index: &NodeIndex<'_>, config: &PlotConfig) -> Result<Self> {
        let data = &node.data;
        let unit = TimeUnit::pick(data.max_sample());

        let series = Direction::iter()
            .filter_map(|direction| {
                let timing = data.timing(direction);
                let scaled = timing
                    .samples
                    .iter()
                    .map(|x| unit.scale(*x))
                    .collect::<Vec<_>>();
                let histogram = Histogram::new(&scaled, config.bins)?;
                let label = format!(
                    "{direction}: {} {:.1}+/-{:.1} {unit}",
                    timing.count,
                    unit.scale(timing.mean),
                    unit.scale(timing.rms),
                );
                Some(TimingSeries {
                    direction,
                    label,
                    histogram,
                })
            })
            .collect();

        Ok(Self {
            title: title(node, index)?,
            unit,
            series,
        })
    }

    pub fn x_label(&self) -> String {
        format!("time [{}]", self.unit)
    }

    /// Largest bin count over all series.
    pub fn max_count(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.histogram.max_count())
            .max()
            .unwrap_or(0)
    }

    /// Range covered by all series, or `(0, 1)` for an empty figure.
    pub fn x_range(&self) -> (f64, f64) {
        self.series
            .iter()
            .map(|s| s.histogram.range())
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
            .unwrap_or((0.0, 1.0))
    }
}

/// Title of the figure: the node's `type:name` followed by kind-specific details.
fn title(node: &Node, index: &NodeIndex<'_>) -> Result<String> {
    let data = &node.data;
    let extra = match node.node_kind() {
        Some(NodeKind::Zipit) => {
            let max_latency = data.max_latency.ok_or_else(|| node.missing("max_latency"))?;
            let holding = data.zipsize.ok_or_else(|| node.missing("zipsize"))?;
            let unit = TimeUnit::pick(max_latency);
            let lost = data.recv_samples.len() as i64
                - data.send_samples.len() as i64
                - holding as i64;
            format!(
                "maxlat:{:.1} {unit}, holding:{holding}, lost:{lost}",
                unit.scale(max_latency)
            )
        }
        Some(NodeKind::Source) => {
            let delay = data
                .delay
                .as_ref()
                .and_then(|delay| delay.as_str())
                .ok_or_else(|| node.missing("delay"))?;
            let delay = index.get(delay)?;
            let lifetime = delay
                .data
                .lifetime
                .ok_or_else(|| delay.missing("lifetime"))?;
            format!("rate:{:.1} Hz", 1.0 / lifetime)
        }
        _ => String::new(),
    };
    Ok(format!("{}:{} {extra}", node.kind, node.name))
}

/// One row of the node listing: key, then count and moments of the received and sent samples.
pub fn summary_line(node: &Node) -> String {
    let [recv, send] = [Direction::Recv, Direction::Send].map(|direction| {
        let timing = node.data.timing(direction);
        format!(
            "{}:{} {:.3}+/-{:.3}",
            direction.prefix(),
            timing.count,
            timing.mean,
            timing.rms
        )
    });
    format!("{:16}{recv:32}{send:32}", node.key())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{trace::Trace, ZipitError};

    fn trace() -> Trace {
        r#"{"nodes": [
            {"type": "random", "name": "sdel", "data": {"lifetime": 0.0001}},
            {"type": "source", "name": "1", "data": {
                "delay": "random:sdel",
                "Ssamples": [0.0001, 0.0003], "Sn": 2, "Smu": 0.0002, "Srms": 0.00014
            }},
            {"type": "zipit", "name": "1", "data": {
                "max_latency": 0.002, "zipsize": 1,
                "Rsamples": [0.002, 0.004, 0.006, 0.008], "Rn": 4, "Rmu": 0.005, "Rrms": 0.0026,
                "Ssamples": [0.003, 0.005], "Sn": 2, "Smu": 0.004, "Srms": 0.0014
            }},
            {"type": "sink", "name": "", "data": {}}
        ]}"#
        .parse()
        .unwrap()
    }

    #[test]
    fn zipit_figure() {
        let trace = trace();
        let index = trace.index();
        let node = index.get("zipit:1").unwrap();
        let figure = TimingFigure::for_node(node, &index, &PlotConfig::default()).unwrap();

        assert_eq!(figure.title, "zipit:1 maxlat:2.0 ms, holding:1, lost:1");
        assert_eq!(figure.unit, TimeUnit::Milliseconds);
        assert_eq!(figure.x_label(), "time [ms]");
        assert_eq!(figure.series.len(), 2);
        assert_eq!(figure.series[0].direction, Direction::Send);
        assert_eq!(figure.series[0].label, "send: 2 4.0+/-1.4 ms");
        assert_eq!(figure.series[1].label, "recv: 4 5.0+/-2.6 ms");

        // each histogram spans its own samples
        let (lo, hi) = figure.series[1].histogram.range();
        assert!((lo - 2.0).abs() < 1e-9 && (hi - 8.0).abs() < 1e-9);
        let (lo, hi) = figure.series[0].histogram.range();
        assert!((lo - 3.0).abs() < 1e-9 && (hi - 5.0).abs() < 1e-9);
        let (lo, hi) = figure.x_range();
        assert!((lo - 2.0).abs() < 1e-9 && (hi - 8.0).abs() < 1e-9);
    }

    #[test]
    fn source_figure() {
        let trace = trace();
        let index = trace.index();
        let node = index.lookup("source", "1").unwrap();
        let figure = TimingFigure::for_node(node, &index, &PlotConfig::default()).unwrap();

        assert_eq!(figure.title, "source:1 rate:10000.0 Hz");
        assert_eq!(figure.unit, TimeUnit::Microseconds);
        assert_eq!(figure.series.len(), 1);
        assert_eq!(figure.series[0].label, "send: 2 200.0+/-140.0 us");
    }

    #[test]
    fn figure_without_samples() {
        let trace = trace();
        let index = trace.index();
        let node = index.get("sink").unwrap();
        let figure = TimingFigure::for_node(node, &index, &PlotConfig::default()).unwrap();

        assert_eq!(figure.title, "sink: ");
        assert!(figure.series.is_empty());
        assert_eq!(figure.max_count(), 0);
        assert_eq!(figure.x_range(), (0.0, 1.0));
    }

    #[test]
    fn missing_delay_node() {
        let trace: Trace = r#"{"nodes": [
            {"type": "source", "name": "1", "data": {"delay": "random:gone"}}
        ]}"#
        .parse()
        .unwrap();
        let index = trace.index();
        let result = TimingFigure::for_node(&trace.nodes[0], &index, &PlotConfig::default());
        assert!(matches!(result, Err(ZipitError::UnknownNode(key)) if key == "random:gone"));
    }

    #[test]
    fn source_delay_must_be_a_key() {
        let trace: Trace = r#"{"nodes": [
            {"type": "source", "name": "1", "data": {"delay": 0.001}},
            {"type": "transfer", "name": "t", "data": {"delay": 0.001, "Rsamples": [0.002]}}
        ]}"#
        .parse()
        .unwrap();
        let index = trace.index();
        let config = PlotConfig::default();

        let result = TimingFigure::for_node(&trace.nodes[0], &index, &config);
        assert!(matches!(
            result,
            Err(ZipitError::MissingField { field: "delay", .. })
        ));

        // other kinds do not look at their delay
        let figure = TimingFigure::for_node(&trace.nodes[1], &index, &config).unwrap();
        assert_eq!(figure.title, "transfer:t ");
        assert_eq!(figure.series.len(), 1);
    }

    #[test]
    fn missing_zipit_fields() {
        let trace: Trace = r#"{"nodes": [{"type": "zipit", "name": "z", "data": {"zipsize": 0}}]}"#
            .parse()
            .unwrap();
        let index = trace.index();
        let result = TimingFigure::for_node(&trace.nodes[0], &index, &PlotConfig::default());
        assert!(matches!(
            result,
            Err(ZipitError::MissingField { field: "max_latency", .. })
        ));
    }

    #[test]
    fn summary_rows() {
        let trace = trace();
        let line = summary_line(&trace.nodes[2]);
        assert_eq!(
            line,
            format!(
                "{:16}{:32}{:32}",
                "zipit:1", "R:4 0.005+/-0.003", "S:2 0.004+/-0.001"
            )
        );
        // moments are derived when the trace lacks them
        assert!(summary_line(&trace.nodes[3]).starts_with(&format!("{:16}R:0 0.000+/--1.000", "sink")));
    }
}
