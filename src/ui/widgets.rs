//! Chart widgets for time series visualization.

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

use crate::ui::view::x_label;

/// One named line on a chart.
pub struct ChartLine<'a> {
    pub name: &'a str,
    pub color: Color,
    pub points: &'a [(f64, f64)],
}

/// Line chart with time on the x axis, scaled to fit every line.
pub fn time_series_chart<'a>(title: String, lines: Vec<ChartLine<'a>>, y_title: &'a str) -> Chart<'a> {
    let (x_min, x_max) = bounds(lines.iter().flat_map(|l| l.points.iter().map(|p| p.0)));
    let (y_min, y_max) = bounds(lines.iter().flat_map(|l| l.points.iter().map(|p| p.1)));
    let y_pad = (y_max - y_min) * 0.05;
    let (y_min, y_max) = (y_min - y_pad, y_max + y_pad);

    let datasets = lines
        .into_iter()
        .map(|line| {
            Dataset::default()
                .name(line.name)
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(line.color))
                .data(line.points)
        })
        .collect();

    Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)))
        .x_axis(
            Axis::default()
                .title("Time (UTC)")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    x_label(x_min),
                    x_label((x_min + x_max) / 2.0),
                    x_label(x_max),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(y_title)
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    format!("{:.1}", y_min),
                    format!("{:.1}", (y_min + y_max) / 2.0),
                    format!("{:.1}", y_max),
                ]),
        )
}

/// Min and max of the values, widened so a flat or empty series still
/// gets a non-degenerate axis.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if max - min < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    (min, max)
}
