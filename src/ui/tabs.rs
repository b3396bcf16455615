//! Per-tab drawing.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Row, Table, TableState, Wrap},
};

use crate::error::DashboardError;
use crate::pipeline::Dashboard;
use crate::ui::view::{
    format_ts, DashboardView, COMBINED_HEADERS, FORECAST_HEADERS, SAMPLE_HEADERS,
};
use crate::ui::widgets::{time_series_chart, ChartLine};

const PAST_COLOR: Color = Color::Cyan;
const FUTURE_COLOR: Color = Color::Yellow;

pub fn draw_history_tab(frame: &mut Frame, area: Rect, dashboard: &Dashboard, view: &DashboardView) {
    let range = match (dashboard.series.first_timestamp(), dashboard.series.last_timestamp()) {
        (Some(first), Some(last)) => format!("{} → {}", format_ts(first), format_ts(last)),
        _ => "no data".to_string(),
    };
    let chart = time_series_chart(
        format!("📊 Historical hourly search interest: {} ({})", dashboard.site, range),
        vec![ChartLine { name: "interest", color: Color::Green, points: &view.history }],
        "Interest",
    );
    frame.render_widget(chart, area);
}

pub fn draw_training_tab(frame: &mut Frame, area: Rect, dashboard: &Dashboard, view: &DashboardView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(5)])
        .split(area);

    draw_model_summary(frame, chunks[0], dashboard);

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    frame.render_widget(
        text_table(
            &view.training_tail,
            SAMPLE_HEADERS,
            format!("🧪 Training data, last {} rows", view.training_tail.len()),
        ),
        tables[0],
    );
    frame.render_widget(
        text_table(
            &view.forecast_tail,
            FORECAST_HEADERS,
            format!("📈 Sample forecast, last {} predictions", view.forecast_tail.len()),
        ),
        tables[1],
    );
}

fn draw_model_summary(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let window_range = match (dashboard.window.points.first(), dashboard.window.end()) {
        (Some(first), Some(end)) => format!("{} → {}", format_ts(first.timestamp), format_ts(end)),
        _ => "empty".to_string(),
    };
    let seasonalities = if dashboard.summary.seasonalities.is_empty() {
        "none (window too short)".to_string()
    } else {
        dashboard.summary.seasonalities.join(", ")
    };

    let lines = vec![
        Line::from(format!("Model: {}", dashboard.summary.name)),
        Line::from(format!(
            "Window: {} ({} hourly points)",
            window_range,
            dashboard.window.len()
        )),
        Line::from(format!(
            "In-sample MAE: {:.3}    Seasonalities: {}",
            dashboard.summary.in_sample_mae, seasonalities
        )),
        Line::from(format!("Run time: {:.1}s", dashboard.elapsed.as_secs_f64())),
    ];

    let summary = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " 🤖 Trained on {} ",
            dashboard.period.label().to_lowercase()
        )));
    frame.render_widget(summary, area);
}

pub fn draw_forecast_tab(
    frame: &mut Frame,
    area: Rect,
    dashboard: &Dashboard,
    view: &DashboardView,
    scroll: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let chart = time_series_chart(
        format!("📈 Forecast: past fit + next {} hours", view.future.len()),
        vec![
            ChartLine { name: "Past Forecast", color: PAST_COLOR, points: &view.past },
            ChartLine { name: "Future Forecast", color: FUTURE_COLOR, points: &view.future },
        ],
        "Forecast",
    );
    frame.render_widget(chart, chunks[0]);

    let rows: Vec<Row> = view
        .combined_tail
        .iter()
        .map(|cells| {
            let color = if cells[2] == "Future Forecast" { FUTURE_COLOR } else { PAST_COLOR };
            Row::new(cells.to_vec()).style(Style::default().fg(color))
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(17), Constraint::Length(10), Constraint::Min(15)],
    )
    .header(Row::new(COMBINED_HEADERS.to_vec()).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(Block::default().borders(Borders::ALL).title(format!(
        " 🕒 {}: last {} rows ",
        dashboard.site,
        view.combined_tail.len()
    )));

    let mut state = TableState::default().with_offset(scroll);
    frame.render_stateful_widget(table, chunks[1], &mut state);
}

pub fn draw_components_tab(frame: &mut Frame, area: Rect, view: &DashboardView) {
    if view.components.is_empty() {
        draw_placeholder(frame, area, "The model reported no components");
        return;
    }

    let constraints = vec![Constraint::Ratio(1, view.components.len() as u32); view.components.len()];
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for ((name, points), chunk) in view.components.iter().zip(chunks.iter()) {
        let chart = time_series_chart(
            format!("📉 Component: {}", name),
            vec![ChartLine { name, color: Color::Magenta, points }],
            "Effect",
        );
        frame.render_widget(chart, *chunk);
    }
}

pub fn draw_error(frame: &mut Frame, area: Rect, err: &DashboardError) {
    let lines = vec![
        Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(err.remedy()),
        Line::from(""),
        Line::from(Span::styled(
            "Change the site or period, or press [Enter] to retry.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(format!(" ⚠ {} ", err.title())),
        );
    frame.render_widget(panel, area);
}

pub fn draw_placeholder(frame: &mut Frame, area: Rect, message: &str) {
    let placeholder = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(placeholder, area);
}

fn text_table<'a, const N: usize>(
    rows: &'a [[String; N]],
    headers: [&'a str; N],
    title: String,
) -> Table<'a> {
    let widths = vec![Constraint::Fill(1); N];
    Table::new(rows.iter().map(|cells| Row::new(cells.to_vec())), widths)
        .header(Row::new(headers.to_vec()).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)))
}
