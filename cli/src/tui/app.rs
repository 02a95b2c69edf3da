use anyhow::Result;
use chrono::Datelike;
use heatlog_core::{
    Breakdown, CalendarCell, Config, DashboardSession, FileHistoryRepository, FileLabelRepository, PeriodStats,
    TrendSeries, TrendView,
};

pub struct App<'a> {
    pub session: DashboardSession<'a, FileHistoryRepository, FileLabelRepository>,
    pub year: i32,
    pub cells: Vec<CalendarCell>,
    pub trend: TrendSeries,
    pub breakdown: Breakdown,
    pub stats: PeriodStats,
    pub window_days: usize,
    pub status: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(
        history: &'a FileHistoryRepository,
        labels: &'a FileLabelRepository,
        config: &Config,
    ) -> Result<App<'a>> {
        let session = DashboardSession::new(history, labels, config)?;
        let year = session.today().year();
        let mut app = App {
            session,
            year,
            cells: Vec::new(),
            trend: TrendSeries::default(),
            breakdown: Breakdown::default(),
            stats: PeriodStats::default(),
            window_days: config.stats_days,
            status: None,
        };
        app.reload();
        Ok(app)
    }

    pub fn view(&self) -> TrendView {
        self.session.view()
    }

    pub fn next_year(&mut self) {
        if self.year < self.session.today().year() {
            self.year += 1;
            self.reload_calendar();
        }
    }

    pub fn previous_year(&mut self) {
        self.year -= 1;
        self.reload_calendar();
    }

    pub fn set_view(&mut self, view: TrendView) {
        self.session.set_view(view);
        self.reload_trend();
    }

    pub fn toggle_view(&mut self) {
        self.session.toggle_view();
        self.reload_trend();
    }

    /// Re-reads labels and every panel.
    pub fn reload(&mut self) {
        self.status = None;
        if let Err(e) = self.session.reload_labels() {
            self.status = Some(e.to_string());
            return;
        }
        self.reload_calendar();
        self.reload_trend();
        match self.session.breakdown(self.window_days) {
            Ok(b) => self.breakdown = b,
            Err(e) => self.status = Some(e.to_string()),
        }
        match self.session.stats(self.window_days) {
            Ok(s) => self.stats = s,
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn reload_calendar(&mut self) {
        match self.session.calendar(self.year) {
            Ok(cells) => self.cells = cells.to_vec(),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn reload_trend(&mut self) {
        match self.session.trend() {
            Ok(t) => self.trend = t,
            Err(e) => self.status = Some(e.to_string()),
        }
    }
}
