// Training module - dataset to fitted, evaluated, persisted model

pub mod evaluation;
pub mod report;
pub mod trainer;

pub use evaluation::EvaluationMetrics;
pub use report::{top_features, FeatureWeight, TrainingReport};
pub use trainer::{Trainer, TrainingOutcome, REPORT_FILE};
