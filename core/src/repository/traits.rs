use crate::model::{DayRecord, LabelRegistry};
use anyhow::Result;
use chrono::NaiveDate;

/// Source of logged days.
pub trait HistoryRepository {
    /// Recorded days within `start..=end`, in any order.
    fn get_days(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayRecord>>;
    fn get(&self, date: NaiveDate) -> Result<Option<DayRecord>>;
    fn upsert(&self, day: DayRecord) -> Result<()>;
}

/// Source of the label registry.
pub trait LabelRepository {
    fn get_labels(&self) -> Result<LabelRegistry>;
    fn save_labels(&self, labels: &LabelRegistry) -> Result<()>;
}
