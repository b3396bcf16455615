//! Main layout for the dashboard.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::data::types::TrainingPeriod;
use crate::ui::app::{App, Tab};
use crate::ui::tabs::{
    draw_components_tab, draw_error, draw_forecast_tab, draw_history_tab, draw_placeholder,
    draw_training_tab,
};

/// Draw the main UI layout.
pub fn draw_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with selectors
            Constraint::Length(3), // Tab bar
            Constraint::Min(10),   // Content
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_tab_bar(frame, chunks[1], app);
    draw_content(frame, chunks[2], app);
    draw_footer(frame, chunks[3], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let sites: String = app
        .sites
        .iter()
        .enumerate()
        .map(|(i, site)| {
            if i == app.site_index {
                format!("[{}]", site)
            } else {
                site.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("  ");

    let periods = TrainingPeriod::all()
        .iter()
        .map(|period| {
            if *period == app.period {
                format!("[{}]", period.label())
            } else {
                period.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ");

    let text = format!("Site: {}    Training: {}", sites, periods);

    let header = Paragraph::new(text)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" ⏱ Hourly Website Traffic Forecast (Google Trends) "),
        );

    frame.render_widget(header, area);
}

fn draw_tab_bar(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, tab.name())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(app.current_tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");

    frame.render_widget(tabs, area);
}

fn draw_content(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(err) = &app.last_error {
        draw_error(frame, area, err);
        return;
    }

    let (Some(dashboard), Some(view)) = (&app.dashboard, &app.view) else {
        let message = if app.loading {
            "Fetching data and training, this can take a few seconds..."
        } else {
            "Press [Enter] to fetch and forecast the selected site"
        };
        draw_placeholder(frame, area, message);
        return;
    };

    match app.current_tab {
        Tab::History => draw_history_tab(frame, area, dashboard, view),
        Tab::Training => draw_training_tab(frame, area, dashboard, view),
        Tab::Forecast => draw_forecast_tab(frame, area, dashboard, view, app.table_scroll),
        Tab::Components => draw_components_tab(frame, area, view),
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let keys = "[s] site  [p] period  [Enter] run  [f] refetch  [C] clear cache  [Tab] switch  [↑↓] scroll  [q] quit";

    let line = match &app.status_message {
        Some((message, _)) => Line::from(vec![
            Span::styled(message.clone(), Style::default().fg(Color::Yellow)),
            Span::raw("  |  "),
            Span::styled(keys, Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(keys, Style::default().fg(Color::DarkGray))),
    };

    frame.render_widget(Paragraph::new(line), area);
}
