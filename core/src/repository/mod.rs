pub mod history;
pub mod labels;
pub mod traits;

// Re-export
pub use history::FileHistoryRepository;
pub use labels::FileLabelRepository;
pub use traits::{HistoryRepository, LabelRepository};
