// Data module
// Student records, CSV dataset loading and train/test splitting

mod dataset;
mod record;

pub use dataset::{required_columns, Dataset, ScoreSummary, Split, MATH_SCORE, READING_SCORE, WRITING_SCORE};
pub use record::{Field, ScoredRecord, StudentRecord};
