use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::model::{HistorySnapshot, LabelRegistry};
use crate::repository::{HistoryRepository, LabelRepository};
use crate::service::breakdown::activity_breakdown;
use crate::service::calendar::CalendarLayoutEngine;
use crate::service::dto::{Breakdown, CalendarCell, PeriodStats, RangeCalendar, TrendSeries, TrendView};
use crate::service::score::score_history;
use crate::service::stats::{range_calendar, summarize};
use crate::service::trend::trend_series;
use crate::time::{self, week_window, window_bounds, year_bounds};
use chrono::{Duration, NaiveDate};
use log::debug;

const DEFAULT_RANGE_PAST_DAYS: i64 = 365;
const DEFAULT_RANGE_FUTURE_DAYS: i64 = 30;

/// One presentation session: owns its calendar engine and trend view, and
/// reads a fresh snapshot of exactly the range each view needs.
pub struct DashboardSession<'a, H: HistoryRepository, L: LabelRepository> {
    history: &'a H,
    label_repo: &'a L,
    labels: LabelRegistry,
    calendar: CalendarLayoutEngine,
    view: TrendView,
    today: NaiveDate,
    trend_days: usize,
    trend_weeks: usize,
}

impl<'a, H: HistoryRepository, L: LabelRepository> DashboardSession<'a, H, L> {
    pub fn new(history: &'a H, label_repo: &'a L, config: &Config) -> CoreResult<Self> {
        let labels = label_repo.get_labels().map_err(CoreError::provider)?;
        Ok(Self {
            history,
            label_repo,
            labels,
            calendar: CalendarLayoutEngine::new(),
            view: TrendView::default(),
            today: time::today(),
            trend_days: config.trend_days,
            trend_weeks: config.trend_weeks,
        })
    }

    /// Pins "today" instead of reading the clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    pub fn reload_labels(&mut self) -> CoreResult<()> {
        self.labels = self.label_repo.get_labels().map_err(CoreError::provider)?;
        Ok(())
    }

    pub fn view(&self) -> TrendView {
        self.view
    }

    pub fn set_view(&mut self, view: TrendView) {
        self.view = view;
    }

    pub fn toggle_view(&mut self) -> TrendView {
        self.view = self.view.toggle();
        self.view
    }

    pub fn engine(&self) -> &CalendarLayoutEngine {
        &self.calendar
    }

    /// Loads the whole range or fails; nothing is computed from partial data.
    pub fn snapshot(&self, start: NaiveDate, end: NaiveDate) -> CoreResult<HistorySnapshot> {
        if start > end {
            return Err(CoreError::invalid_date(format!("{}..{}", start, end)));
        }
        let records = self.history.get_days(start, end).map_err(CoreError::provider)?;
        debug!("snapshot {}..={} with {} records", start, end, records.len());
        Ok(HistorySnapshot::new(start, end, records))
    }

    pub fn calendar(&mut self, year: i32) -> CoreResult<&[CalendarCell]> {
        let (first, last) = year_bounds(year)?;
        let snapshot = self.snapshot(first, last)?;
        let scores = score_history(&snapshot, &self.labels);
        self.calendar.render(scores, year)
    }

    /// Re-scores one day and applies it to the rendered calendar incrementally.
    pub fn refresh_day(&mut self, date: NaiveDate) -> CoreResult<Vec<CalendarCell>> {
        let snapshot = self.snapshot(date, date)?;
        let mut scores = score_history(&snapshot, &self.labels);
        if !scores.contains(date) {
            scores.insert(date, 0.0);
        }
        Ok(self.calendar.update(&scores))
    }

    /// Recorded scores in a range; defaults to the last year plus a month ahead.
    pub fn calendar_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> CoreResult<RangeCalendar> {
        let start = start.unwrap_or(self.today - Duration::days(DEFAULT_RANGE_PAST_DAYS));
        let end = end.unwrap_or(self.today + Duration::days(DEFAULT_RANGE_FUTURE_DAYS));
        let snapshot = self.snapshot(start, end)?;
        let scores = score_history(&snapshot, &self.labels);
        Ok(range_calendar(&scores, start, end))
    }

    /// Trend for the current view with the configured window length.
    pub fn trend(&self) -> CoreResult<TrendSeries> {
        let count = match self.view {
            TrendView::Daily => self.trend_days,
            TrendView::Weekly => self.trend_weeks,
        };
        self.trend_with(self.view, count)
    }

    pub fn trend_with(&self, view: TrendView, count: usize) -> CoreResult<TrendSeries> {
        let bounds = match view {
            TrendView::Daily => window_bounds(self.today, count)?,
            TrendView::Weekly => week_window(self.today, count)?,
        };
        let snapshot = match bounds {
            Some((start, end)) => self.snapshot(start, end)?,
            None => HistorySnapshot::empty(self.today, self.today),
        };
        let scores = score_history(&snapshot, &self.labels);
        trend_series(&scores, self.today, view, count)
    }

    pub fn breakdown(&self, days: usize) -> CoreResult<Breakdown> {
        let snapshot = self.window_snapshot(days)?;
        activity_breakdown(&snapshot, &self.labels, self.today, days)
    }

    pub fn stats(&self, days: usize) -> CoreResult<PeriodStats> {
        let snapshot = self.window_snapshot(days)?;
        let scores = score_history(&snapshot, &self.labels);
        summarize(&snapshot, &scores, self.today, days)
    }

    fn window_snapshot(&self, days: usize) -> CoreResult<HistorySnapshot> {
        match window_bounds(self.today, days)? {
            Some((start, end)) => self.snapshot(start, end),
            None => Ok(HistorySnapshot::empty(self.today, self.today)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityEntry, DayRecord};
    use anyhow::{anyhow, Result};
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct MockHistoryRepo {
        days: RefCell<BTreeMap<NaiveDate, DayRecord>>,
        requests: RefCell<Vec<(NaiveDate, NaiveDate)>>,
    }

    impl MockHistoryRepo {
        fn log(&self, date: NaiveDate, label: &str, minutes: f64) {
            self.days
                .borrow_mut()
                .entry(date)
                .or_insert_with(|| DayRecord::new(date))
                .activities
                .push(ActivityEntry::new(label, minutes));
        }
    }

    impl HistoryRepository for MockHistoryRepo {
        fn get_days(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayRecord>> {
            self.requests.borrow_mut().push((start, end));
            Ok(self.days.borrow().range(start..=end).map(|(_, d)| d.clone()).collect())
        }
        fn get(&self, date: NaiveDate) -> Result<Option<DayRecord>> {
            Ok(self.days.borrow().get(&date).cloned())
        }
        fn upsert(&self, day: DayRecord) -> Result<()> {
            self.days.borrow_mut().insert(day.date, day);
            Ok(())
        }
    }

    struct MockLabelRepo;
    impl LabelRepository for MockLabelRepo {
        fn get_labels(&self) -> Result<LabelRegistry> { Ok(LabelRegistry::with_defaults()) }
        fn save_labels(&self, _labels: &LabelRegistry) -> Result<()> { Ok(()) }
    }

    struct FailingHistoryRepo;
    impl HistoryRepository for FailingHistoryRepo {
        fn get_days(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<DayRecord>> { Err(anyhow!("read failed")) }
        fn get(&self, _date: NaiveDate) -> Result<Option<DayRecord>> { Err(anyhow!("read failed")) }
        fn upsert(&self, _day: DayRecord) -> Result<()> { unimplemented!() }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_calendar_and_refresh_day() {
        let history = MockHistoryRepo::default();
        history.log(d(2024, 7, 4), "Deep Work", 60.0);
        let labels = MockLabelRepo;
        let config = Config::default();
        let mut session = DashboardSession::new(&history, &labels, &config).unwrap().with_today(d(2024, 7, 10));

        let cells = session.calendar(2024).unwrap();
        assert_eq!(cells.len(), 366);
        assert_eq!(history.requests.borrow().last().copied(), Some((d(2024, 1, 1), d(2024, 12, 31))));
        assert_eq!(session.engine().cell(d(2024, 7, 4)).unwrap().level, 5);

        history.log(d(2024, 7, 5), "Planning", 30.0);
        let touched = session.refresh_day(d(2024, 7, 5)).unwrap();
        assert_eq!(touched.len(), 1);
        assert_eq!(touched[0].level, 2);
        assert_eq!(session.engine().cell(d(2024, 7, 4)).unwrap().level, 5);
    }

    #[test]
    fn test_trend_views_and_stats() {
        let history = MockHistoryRepo::default();
        let today = d(2024, 7, 10);
        history.log(today, "Learning", 20.0);
        history.log(d(2024, 7, 1), "Deep Work", 10.0);
        let labels = MockLabelRepo;
        let config = Config::default();
        let mut session = DashboardSession::new(&history, &labels, &config).unwrap().with_today(today);

        let daily = session.trend().unwrap();
        assert_eq!(daily.len(), config.trend_days);
        assert_eq!(daily.scores.last().copied(), Some(30.0));

        assert_eq!(session.toggle_view(), TrendView::Weekly);
        let weekly = session.trend().unwrap();
        assert_eq!(weekly.len(), config.trend_weeks);
        // week of Sun 2024-06-30 holds Jul 1, week of Sun 2024-07-07 holds today
        assert_eq!(weekly.scores[weekly.len() - 2], 20.0);
        assert_eq!(weekly.scores[weekly.len() - 1], 30.0);

        let stats = session.stats(30).unwrap();
        assert_eq!(stats.productive_days, 2);
        assert_eq!(stats.total_activities, 2);

        let breakdown = session.breakdown(30).unwrap();
        assert_eq!(breakdown.labels, vec!["Learning", "Deep Work"]);
    }

    #[test]
    fn test_calendar_range_defaults_and_errors() {
        let history = MockHistoryRepo::default();
        let today = d(2024, 7, 10);
        history.log(today, "Learning", 20.0);
        history.log(d(2022, 1, 1), "Learning", 20.0);
        let labels = MockLabelRepo;
        let session = DashboardSession::new(&history, &labels, &Config::default()).unwrap().with_today(today);

        let range = session.calendar_range(None, None).unwrap();
        assert_eq!(range.total_days, 1);
        assert_eq!(range.max_score, 30.0);

        let err = session.calendar_range(Some(today), Some(d(2024, 1, 1))).unwrap_err();
        assert!(err.is_invalid_date());
    }

    #[test]
    fn test_provider_failure_aborts() {
        let history = FailingHistoryRepo;
        let labels = MockLabelRepo;
        let mut session = DashboardSession::new(&history, &labels, &Config::default()).unwrap();
        assert!(matches!(session.calendar(2024), Err(CoreError::Provider(_))));
        assert!(matches!(session.stats(7), Err(CoreError::Provider(_))));
        assert!(session.engine().cells().is_empty());
    }

    #[test]
    fn test_zero_windows_need_no_provider() {
        let history = FailingHistoryRepo;
        let labels = MockLabelRepo;
        let session = DashboardSession::new(&history, &labels, &Config::default()).unwrap();
        assert!(session.trend_with(TrendView::Daily, 0).unwrap().is_empty());
        assert!(session.trend_with(TrendView::Weekly, 0).unwrap().is_empty());
        assert_eq!(session.stats(0).unwrap(), PeriodStats::default());
    }

    #[test]
    fn test_oversized_windows_fail_before_loading() {
        let history = MockHistoryRepo::default();
        let labels = MockLabelRepo;
        let session = DashboardSession::new(&history, &labels, &Config::default())
            .unwrap()
            .with_today(d(2024, 5, 15));

        assert!(matches!(session.stats(1_000_000_000), Err(CoreError::InvalidDate { .. })));
        assert!(matches!(session.breakdown(1_000_000_000), Err(CoreError::InvalidDate { .. })));
        assert!(matches!(
            session.trend_with(TrendView::Weekly, 100_000_000),
            Err(CoreError::InvalidDate { .. })
        ));
        assert!(matches!(
            session.trend_with(TrendView::Daily, usize::MAX),
            Err(CoreError::InvalidDate { .. })
        ));
        assert!(history.requests.borrow().is_empty());
    }
}
