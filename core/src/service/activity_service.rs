use crate::error::{CoreError, CoreResult};
use crate::model::{ActivityEntry, DayRecord, LabelRegistry};
use crate::repository::HistoryRepository;
use crate::service::calendar::level;
use crate::service::dto::{ActivityDetail, DayDetails};
use crate::service::score::activity_points;
use chrono::NaiveDate;
use log::info;

pub struct ActivityService<R: HistoryRepository> {
    repo: R,
}

impl<R: HistoryRepository> ActivityService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_day(&self, date: NaiveDate) -> CoreResult<Option<DayRecord>> {
        self.repo.get(date).map_err(CoreError::provider)
    }

    /// Appends one activity to the day, creating the day if needed.
    pub fn log_activity(&self, date: NaiveDate, label: &str, minutes: f64) -> CoreResult<ActivityEntry> {
        let label = label.trim();
        if label.is_empty() {
            return Err(CoreError::Validation("activity label must not be empty".to_string()));
        }
        validate_duration(minutes)?;

        let mut day = self.get_day(date)?.unwrap_or_else(|| DayRecord::new(date));
        let entry = ActivityEntry::new(label, minutes);
        day.activities.push(entry.clone());
        self.repo.upsert(day).map_err(CoreError::provider)?;
        info!("logged {} min of '{}' on {}", minutes, label, date);
        Ok(entry)
    }

    /// Replaces the day's activities wholesale.
    pub fn save_day(&self, date: NaiveDate, activities: Vec<ActivityEntry>) -> CoreResult<DayRecord> {
        for activity in &activities {
            validate_duration(activity.duration_minutes)?;
        }
        let day = DayRecord::with_activities(date, activities);
        self.repo.upsert(day.clone()).map_err(CoreError::provider)?;
        info!("saved {} activities for {}", day.activities.len(), date);
        Ok(day)
    }

    /// Removes the activity whose id starts with `id_prefix`.
    pub fn remove_activity(&self, date: NaiveDate, id_prefix: &str) -> CoreResult<ActivityEntry> {
        let id_prefix = id_prefix.trim().to_lowercase();
        if id_prefix.is_empty() {
            return Err(CoreError::Validation("activity id must not be empty".to_string()));
        }
        let mut day = self
            .get_day(date)?
            .ok_or_else(|| CoreError::NotFound(format!("no activities on {}", date)))?;

        let matches: Vec<usize> = day
            .activities
            .iter()
            .enumerate()
            .filter(|(_, a)| a.id.to_string().starts_with(&id_prefix))
            .map(|(i, _)| i)
            .collect();

        let index = match matches.as_slice() {
            [only] => *only,
            [] => return Err(CoreError::NotFound(format!("activity '{}' on {}", id_prefix, date))),
            _ => {
                return Err(CoreError::Validation(format!(
                    "activity id '{}' is ambiguous on {}",
                    id_prefix, date
                )))
            }
        };

        let removed = day.activities.remove(index);
        self.repo.upsert(day).map_err(CoreError::provider)?;
        info!("removed activity {} from {}", removed.id, date);
        Ok(removed)
    }

    /// Per-activity contributions for one day. A missing day is an empty day.
    pub fn day_details(&self, date: NaiveDate, labels: &LabelRegistry) -> CoreResult<DayDetails> {
        let day = self.get_day(date)?.unwrap_or_else(|| DayRecord::new(date));
        Ok(describe_day(&day, labels))
    }
}

pub fn describe_day(day: &DayRecord, labels: &LabelRegistry) -> DayDetails {
    let activities: Vec<ActivityDetail> = day
        .activities
        .iter()
        .map(|a| ActivityDetail {
            id: a.id,
            label: a.label.clone(),
            duration_minutes: a.duration_minutes,
            rate: labels.rate(&a.label),
            points: activity_points(a, labels),
            known_label: labels.contains(&a.label),
        })
        .collect();
    let total_score: f64 = activities.iter().map(|a| a.points).sum();

    DayDetails {
        date: day.date,
        total_minutes: day.total_minutes(),
        total_score,
        level: level(total_score),
        activities,
    }
}

fn validate_duration(minutes: f64) -> CoreResult<()> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(CoreError::Validation(format!(
            "duration must be a positive number of minutes, got {}",
            minutes
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct MockHistoryRepo {
        days: RefCell<BTreeMap<NaiveDate, DayRecord>>,
    }

    impl HistoryRepository for MockHistoryRepo {
        fn get_days(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayRecord>> {
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

    struct BrokenRepo;
    impl HistoryRepository for BrokenRepo {
        fn get_days(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<DayRecord>> { Err(anyhow!("disk gone")) }
        fn get(&self, _date: NaiveDate) -> Result<Option<DayRecord>> { Err(anyhow!("disk gone")) }
        fn upsert(&self, _day: DayRecord) -> Result<()> { Err(anyhow!("disk gone")) }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_log_and_details() {
        let service = ActivityService::new(MockHistoryRepo::default());
        let labels = LabelRegistry::with_defaults();
        service.log_activity(d(2024, 4, 1), "Deep Work", 60.0).unwrap();
        service.log_activity(d(2024, 4, 1), "Unlisted", 30.0).unwrap();

        let details = service.day_details(d(2024, 4, 1), &labels).unwrap();
        assert_eq!(details.activities.len(), 2);
        assert_eq!(details.total_score, 120.0);
        assert_eq!(details.total_minutes, 90.0);
        assert_eq!(details.level, 5);
        assert!(!details.activities[1].known_label);
        assert_eq!(details.activities[1].points, 0.0);
    }

    #[test]
    fn test_missing_day_details_are_empty() {
        let service = ActivityService::new(MockHistoryRepo::default());
        let details = service.day_details(d(2024, 4, 2), &LabelRegistry::with_defaults()).unwrap();
        assert!(details.activities.is_empty());
        assert_eq!(details.level, 0);
    }

    #[test]
    fn test_log_rejects_non_positive_duration() {
        let service = ActivityService::new(MockHistoryRepo::default());
        assert!(matches!(
            service.log_activity(d(2024, 4, 1), "Learning", 0.0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            service.save_day(d(2024, 4, 1), vec![ActivityEntry::new("Learning", -5.0)]),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_remove_activity_by_prefix() {
        let service = ActivityService::new(MockHistoryRepo::default());
        let keep = service.log_activity(d(2024, 4, 1), "Planning", 10.0).unwrap();
        let drop = service.log_activity(d(2024, 4, 1), "Learning", 10.0).unwrap();

        let prefix = drop.id.to_string()[..8].to_string();
        let removed = service.remove_activity(d(2024, 4, 1), &prefix).unwrap();
        assert_eq!(removed.id, drop.id);

        let day = service.get_day(d(2024, 4, 1)).unwrap().unwrap();
        assert_eq!(day.activities.len(), 1);
        assert_eq!(day.activities[0].id, keep.id);

        assert!(matches!(
            service.remove_activity(d(2024, 4, 1), "zzzz"),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_provider_failure_propagates() {
        let service = ActivityService::new(BrokenRepo);
        let err = service.log_activity(d(2024, 4, 1), "Learning", 10.0).unwrap_err();
        assert!(matches!(err, CoreError::Provider(_)));
        assert!(err.to_string().contains("disk gone"));
    }
}
