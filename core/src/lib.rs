pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod input;
pub mod time;
pub mod service;
pub mod usecase;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use model::{ActivityEntry, ActivityLabel, DayRecord, HistorySnapshot, LabelRegistry};
pub use repository::{FileHistoryRepository, FileLabelRepository, HistoryRepository, LabelRepository};
pub use input::{parse_args, expand_key, normalize_fields, ParsedInput, LOG_FIELDS};
pub use time::{parse_human_date, parse_duration, parse_iso_date, week_index};
pub use service::activity_service::ActivityService;
pub use service::calendar::{level, CalendarLayoutEngine};
pub use service::label_service::{LabelService, LabelUpdate};
pub use service::score::{calculate_score, ScoreMap};
pub use service::dto::{Breakdown, CalendarCell, DayDetails, PeriodStats, RangeCalendar, TrendSeries, TrendView};
pub use usecase::dashboard::DashboardSession;
