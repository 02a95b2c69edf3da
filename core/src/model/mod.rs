pub mod activity;
pub mod label;

pub use activity::{ActivityEntry, DayRecord, HistorySnapshot};
pub use label::{ActivityLabel, LabelRegistry, DEFAULT_COLOR};
