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
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use itertools::Itertools;

use zipit::{
    figure::{summary_line, TimingFigure},
    graph::{self, GraphNaming},
    msgs::load_messages,
    render::{render, FigureFormat},
    stats::DEFAULT_BINS,
    trace::Trace,
    util, PlotConfig,
};

/// Process simzip output.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of histogram bins per sample array.
    #[arg(long, global = true, default_value_t = DEFAULT_BINS)]
    bins: usize,
    /// Width of svg and png figures in pixels.
    #[arg(long, global = true, default_value_t = 640)]
    width: u32,
    /// Height of svg and png figures in pixels.
    #[arg(long, global = true, default_value_t = 480)]
    height: u32,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plot the timing histograms of a single node.
    PlotNode {
        /// node kind name
        #[arg(short, long)]
        kind: String,
        /// node instance name
        #[arg(short, long, default_value = "")]
        inst: String,
        /// output file (html, svg or png)
        #[arg(short, long)]
        outfile: PathBuf,
        infile: PathBuf,
    },
    /// Plot every node and draw the graph with the plots as node images.
    GraphPlots {
        /// figure extension, defaults to the one of the output file
        #[arg(short, long)]
        figext: Option<String>,
        /// output file, either dot text or any format dot can produce
        #[arg(short, long)]
        outfile: PathBuf,
        infile: PathBuf,
    },
    /// List the timing summary of every node.
    Ls { infile: PathBuf },
    /// List the message arrays recorded per node.
    Msgs { infile: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    util::init_logging();

    let args = Args::parse();
    let config = PlotConfig {
        bins: args.bins,
        width: args.width,
        height: args.height,
    };

    match args.command {
        Command::PlotNode {
            kind,
            inst,
            outfile,
            infile,
        } => {
            let format = FigureFormat::from_path(&outfile)?;
            let trace = Trace::load(&infile)?;
            let index = trace.index();
            let node = index.lookup(&kind, &inst)?;
            let figure = TimingFigure::for_node(node, &index, &config)?;
            render(&figure, &outfile, format, &config)?;
            log::info!("Plotted {} to {outfile:?}", node.key());
        }
        Command::GraphPlots {
            figext,
            outfile,
            infile,
        } => {
            let naming = GraphNaming::from_outfile(&outfile, figext.as_deref())?;
            let trace = Trace::load(&infile)?;
            for figure in graph::render_figures(&trace, &naming, &config)? {
                println!("{}", figure.display());
            }
            graph::emit(&graph::dot_text(&trace, &naming), &outfile)?;
            log::info!("Wrote graph to {outfile:?}");
        }
        Command::Ls { infile } => {
            let trace = Trace::load(&infile)?;
            for node in trace.timing_nodes() {
                println!("{}", summary_line(node));
            }
        }
        Command::Msgs { infile } => {
            let trace = Trace::load(&infile)?;
            for (key, arrays) in load_messages(&trace) {
                for (name, arrays) in arrays
                    .iter()
                    .sorted_by(|a, b| human_sort::compare(a.0, b.0))
                {
                    println!(
                        "{key:16}{name:16}{:>8}{:>12}  {}",
                        arrays.len(),
                        arrays.ts_span(),
                        if arrays.is_ordered() { "ordered" } else { "unordered" }
                    );
                }
            }
        }
    }

    Ok(())
}
