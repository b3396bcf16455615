//! Application state for the dashboard.

use std::time::Instant;
use crate::config::UiConfig;
use crate::data::types::TrainingPeriod;
use crate::error::DashboardError;
use crate::pipeline::Dashboard;
use crate::ui::view::DashboardView;

/// What the next loop iteration should do with the pipeline.
///
/// Ordered by how much cached data is dropped before the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunRequest {
    Run,
    /// Drop the selected site's cached series first.
    Refetch,
    /// Drop every cached series first.
    RefetchAll,
}

pub struct App {
    pub sites: Vec<String>,
    pub site_index: usize,
    pub period: TrainingPeriod,
    pub current_tab: Tab,
    pub should_quit: bool,
    pub loading: bool,
    pub dashboard: Option<Dashboard>,
    pub view: Option<DashboardView>,
    pub last_error: Option<DashboardError>,
    pub status_message: Option<(String, Instant)>,
    pub table_scroll: usize,
    pub ui: UiConfig,
    pending: Option<RunRequest>,
}

impl App {
    /// Starts with the first site and the shortest period, and a run queued.
    pub fn new(sites: Vec<String>, ui: UiConfig) -> Self {
        let mut app = Self {
            sites,
            site_index: 0,
            period: TrainingPeriod::default(),
            current_tab: Tab::default(),
            should_quit: false,
            loading: false,
            dashboard: None,
            view: None,
            last_error: None,
            status_message: None,
            table_scroll: 0,
            ui,
            pending: None,
        };
        app.request(RunRequest::Run);
        app
    }

    pub fn selected_site(&self) -> &str {
        self.sites.get(self.site_index).map(String::as_str).unwrap_or_default()
    }

    pub fn next_site(&mut self) {
        if !self.sites.is_empty() {
            self.site_index = (self.site_index + 1) % self.sites.len();
            self.request(RunRequest::Run);
        }
    }

    pub fn previous_site(&mut self) {
        if !self.sites.is_empty() {
            self.site_index = (self.site_index + self.sites.len() - 1) % self.sites.len();
            self.request(RunRequest::Run);
        }
    }

    pub fn next_period(&mut self) {
        self.period = self.period.next();
        self.request(RunRequest::Run);
    }

    /// Queue a run; the dashboard shows progress until it completes.
    pub fn request(&mut self, request: RunRequest) {
        // A queued refetch already implies a plain run.
        self.pending = self.pending.max(Some(request));
        self.loading = true;
        self.set_status(format!(
            "📡 Fetching {} and training on {}...",
            self.selected_site(),
            self.period.label().to_lowercase()
        ));
    }

    pub fn take_pending(&mut self) -> Option<RunRequest> {
        self.pending.take()
    }

    pub fn apply_result(&mut self, result: Result<Dashboard, DashboardError>) {
        self.loading = false;
        self.table_scroll = 0;
        match result {
            Ok(dashboard) => {
                self.set_status(format!(
                    "✅ {} trained on {} in {:.1}s",
                    dashboard.site,
                    dashboard.period.label().to_lowercase(),
                    dashboard.elapsed.as_secs_f64()
                ));
                self.view = Some(DashboardView::build(&dashboard, &self.ui));
                self.dashboard = Some(dashboard);
                self.last_error = None;
            }
            Err(err) => {
                self.set_status(err.title());
                self.last_error = Some(err);
            }
        }
    }

    pub fn scroll_down(&mut self) {
        let rows = self.view.as_ref().map_or(0, |v| v.combined_tail.len());
        if self.table_scroll + 1 < rows {
            self.table_scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.table_scroll = self.table_scroll.saturating_sub(1);
    }

    /// Set a status message that will be displayed temporarily.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Clear expired status messages (older than 5 seconds), unless busy.
    pub fn clear_expired_status(&mut self) {
        if self.loading {
            return;
        }
        if let Some((_, instant)) = &self.status_message {
            if instant.elapsed().as_secs() > 5 {
                self.status_message = None;
            }
        }
    }

    pub fn next_tab(&mut self) {
        self.current_tab = self.current_tab.next();
    }

    pub fn previous_tab(&mut self) {
        self.current_tab = self.current_tab.previous();
    }

    pub fn goto_tab(&mut self, num: u8) {
        self.current_tab = Tab::from_num(num);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    History,
    Training,
    Forecast,
    Components,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::History, Tab::Training, Tab::Forecast, Tab::Components]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::History => "History",
            Tab::Training => "Training",
            Tab::Forecast => "Forecast",
            Tab::Components => "Components",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::History => 0,
            Tab::Training => 1,
            Tab::Forecast => 2,
            Tab::Components => 3,
        }
    }

    pub fn next(&self) -> Self {
        Self::from_num(self.index() as u8 % 4 + 2)
    }

    pub fn previous(&self) -> Self {
        Self::from_num((self.index() as u8 + 3) % 4 + 1)
    }

    /// 1-based, out-of-range numbers fall back to the first tab.
    pub fn from_num(num: u8) -> Self {
        match num {
            2 => Tab::Training,
            3 => Tab::Forecast,
            4 => Tab::Components,
            _ => Tab::History,
        }
    }
}
