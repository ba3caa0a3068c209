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
//! Writes timing figures to disk. Interactive pages are produced with plotly, static images (which
//! Graphviz can embed) with plotters.
use std::{fs, path::Path};

use plotly::{
    common::{Line, LineShape, Mode, Title},
    layout::{Axis, Layout},
    Plot, Scatter,
};
use plotters::{coord::Shift, drawing::DrawingAreaErrorKind, prelude::*};

use crate::{figure::TimingFigure, PlotConfig, Result, ZipitError};

/// Output format of a figure, derived from the file extension.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FigureFormat {
    Html,
    Svg,
    Png,
}

impl FigureFormat {
    pub fn from_extension(ext: &str) -> Result<Self> {
        ext.parse()
            .map_err(|_| ZipitError::UnsupportedFormat(ext.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }

    /// Whether Graphviz can use files of this format as node images.
    pub fn is_embeddable(self) -> bool {
        matches!(self, FigureFormat::Svg | FigureFormat::Png)
    }
}

/// Writes `figure` to `path` in the given format.
pub fn render(
    figure: &TimingFigure,
    path: impl AsRef<Path>,
    format: FigureFormat,
    config: &PlotConfig,
) -> Result<()> {
    let path = path.as_ref();
    log::debug!("Plotting {path:?} as {format}");

    let size = (config.width, config.height);
    let drawn = match format {
        FigureFormat::Html => {
            fs::write(path, to_html(figure))?;
            Ok(())
        }
        FigureFormat::Svg => draw(SVGBackend::new(path, size).into_drawing_area(), figure),
        FigureFormat::Png => draw(BitMapBackend::new(path, size).into_drawing_area(), figure),
    };
    drawn.map_err(|reason| ZipitError::Render {
        path: path.to_path_buf(),
        reason,
    })
}

/// Plotly page showing each series as a step line.
pub fn to_html(figure: &TimingFigure) -> String {
    let mut plot = Plot::new();
    for series in figure.series.iter() {
        let (x, y): (Vec<f64>, Vec<f64>) = series.histogram.stairs().into_iter().unzip();
        let trace = Scatter::new(x, y)
            .mode(Mode::Lines)
            .line(Line::new().shape(LineShape::Hv))
            .name(&series.label);
        plot.add_trace(trace);
    }

    let layout = Layout::new()
        .title(Title::with_text(&figure.title))
        .x_axis(Axis::new().title(Title::with_text(&figure.x_label())))
        .y_axis(Axis::new().title(Title::with_text("count")));
    plot.set_layout(layout);

    plot.to_html()
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    figure: &TimingFigure,
) -> std::result::Result<(), String> {
    let err = |e: DrawingAreaErrorKind<DB::ErrorType>| e.to_string();

    let (x_lo, x_hi) = figure.x_range();
    let y_hi = figure.max_count().max(1) as f64 * 1.1;

    root.fill(&WHITE).map_err(err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(&figure.title, ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)
        .map_err(err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(figure.x_label())
        .y_desc("count")
        .draw()
        .map_err(err)?;

    for (idx, series) in figure.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(
                series.histogram.stairs(),
                color.stroke_width(2),
            ))
            .map_err(err)?
            .label(series.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    if !figure.series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(err)?;
    }

    root.present().map_err(err)
}
