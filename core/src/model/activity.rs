use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub label: String,
    /// Minutes spent, always > 0.
    #[serde(rename = "duration")]
    pub duration_minutes: f64,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(label: impl Into<String>, duration_minutes: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            duration_minutes,
            timestamp: Utc::now(),
        }
    }
}

/// One calendar day of logged activities. The day's score is always derived
/// from `activities`, never stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DayRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub activities: Vec<ActivityEntry>,
}

impl DayRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            activities: Vec::new(),
        }
    }

    pub fn with_activities(date: NaiveDate, activities: Vec<ActivityEntry>) -> Self {
        Self { date, activities }
    }

    pub fn total_minutes(&self) -> f64 {
        self.activities.iter().map(|a| a.duration_minutes).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Immutable view of the history for an inclusive date range, taken once
/// per computation. Dates without a record read as zero-activity days.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub start: NaiveDate,
    pub end: NaiveDate,
    days: BTreeMap<NaiveDate, DayRecord>,
}

impl HistorySnapshot {
    /// Records outside `start..=end` are dropped; duplicate dates are merged.
    pub fn new(start: NaiveDate, end: NaiveDate, records: Vec<DayRecord>) -> Self {
        let mut snapshot = Self { start, end, days: BTreeMap::new() };
        for record in records {
            if !snapshot.covers(record.date) {
                continue;
            }
            snapshot
                .days
                .entry(record.date)
                .or_insert_with(|| DayRecord::new(record.date))
                .activities
                .extend(record.activities);
        }
        snapshot
    }

    pub fn empty(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(start, end, Vec::new())
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    pub fn activities(&self, date: NaiveDate) -> &[ActivityEntry] {
        self.days
            .get(&date)
            .map(|d| d.activities.as_slice())
            .unwrap_or(&[])
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Recorded days only, in date order.
    pub fn recorded(&self) -> impl Iterator<Item = &DayRecord> {
        self.days.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_snapshot_missing_day_is_empty() {
        let snapshot = HistorySnapshot::empty(d(2024, 1, 1), d(2024, 1, 7));
        assert!(snapshot.activities(d(2024, 1, 3)).is_empty());
        assert!(snapshot.recorded().next().is_none());
    }

    #[test]
    fn test_snapshot_merges_and_clips() {
        let records = vec![
            DayRecord::with_activities(d(2024, 1, 2), vec![ActivityEntry::new("Learning", 30.0)]),
            DayRecord::with_activities(d(2024, 1, 2), vec![ActivityEntry::new("Planning", 10.0)]),
            DayRecord::with_activities(d(2023, 12, 31), vec![ActivityEntry::new("Planning", 10.0)]),
        ];
        let snapshot = HistorySnapshot::new(d(2024, 1, 1), d(2024, 1, 7), records);
        assert_eq!(snapshot.activities(d(2024, 1, 2)).len(), 2);
        assert_eq!(snapshot.recorded().count(), 1);
        assert!(!snapshot.covers(d(2023, 12, 31)));
    }

    #[test]
    fn test_entry_json_shape() {
        let json = r#"{"date":"2024-03-01","activities":[{"label":"Deep Work","duration":60}]}"#;
        let day: DayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(day.activities[0].duration_minutes, 60.0);
        assert_eq!(day.total_minutes(), 60.0);
    }
}
