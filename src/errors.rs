// Error taxonomy and user-friendly error messages
//
// `ScoreError` names every failure the trainer and predictor can report.
// The helpers below turn the fatal ones into actionable messages for the CLI.

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;

/// Domain errors for training and inference
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    /// Model or feature-name artifact absent
    #[error("artifact not found: {}", path.display())]
    ArtifactMissing { path: PathBuf },

    /// Model and feature list do not belong together
    #[error("artifact mismatch: {reason}")]
    ArtifactMismatch { reason: String },

    /// Training data lacks required columns
    #[error("dataset is missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// A score cell could not be parsed as a number
    #[error("row {row}: invalid value {value:?} in column '{column}'")]
    InvalidScore {
        row: usize,
        column: String,
        value: String,
    },

    /// Dataset contains no rows
    #[error("dataset contains no records")]
    EmptyDataset,

    /// Train/test split would leave one side empty
    #[error("cannot split {rows} records with test fraction {test_fraction}")]
    SplitTooSmall { rows: usize, test_fraction: f64 },

    /// Feature schema lists the same name twice
    #[error("duplicate feature name in schema: {0}")]
    DuplicateFeature(String),

    /// Reference level collides with a feature or repeats a field
    #[error("invalid reference level: {0}")]
    InvalidReferenceLevel(String),
}

/// Wrap an error with user-friendly context
pub trait UserFriendlyError {
    /// Add user-friendly context to this error
    fn user_context(self, message: &str) -> Self;

    /// Add user-friendly context with a suggestion
    fn user_context_with_suggestion(self, problem: &str, suggestion: &str) -> Self;
}

impl<T> UserFriendlyError for Result<T> {
    fn user_context(self, message: &str) -> Self {
        self.with_context(|| message.to_string())
    }

    fn user_context_with_suggestion(self, problem: &str, suggestion: &str) -> Self {
        self.with_context(|| wrap_error_with_suggestion(problem, suggestion))
    }
}

/// Format a missing-artifact error with helpful suggestions
pub fn artifacts_not_found_error(dir: &str) -> String {
    format!(
        "Trained model not found in {}\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • The model has not been trained yet\n\
        • Wrong artifact directory\n\
        • model.json or feature_names.json was deleted\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Train the model:\n\
           \x1b[36mmathscore train --dataset StudentsPerformance.csv\x1b[0m\n\n\
        2. Point at the right directory:\n\
           \x1b[36mmathscore serve --artifacts <dir>\x1b[0m",
        dir
    )
}

/// Format a dataset column error with helpful suggestions
pub fn dataset_columns_error(path: &str, missing: &[String]) -> String {
    format!(
        "Dataset {} cannot be used for training\n\n\
        \x1b[1;33mMissing columns:\x1b[0m {}\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check the header row:\n\
           \x1b[36mhead -n 1 {}\x1b[0m\n\n\
        2. Expected columns:\n\
           gender, race/ethnicity, parental level of education, lunch,\n\
           test preparation course, math score, reading score, writing score",
        path,
        missing.join(", "),
        path
    )
}

/// Format a config parse error with helpful suggestions
pub fn config_parse_error(path: &str, error: &str) -> String {
    format!(
        "Failed to parse config file {}\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check config file syntax:\n\
           \x1b[36mcat {}\x1b[0m\n\n\
        2. Common mistakes:\n\
           • Missing quotes around strings\n\
           • Unclosed brackets []\n\
           • Numbers written as strings",
        path, error, path
    )
}

/// Wrap a generic error with suggestions
pub fn wrap_error_with_suggestion(error: impl fmt::Display, suggestion: &str) -> String {
    format!("{}\n\n\x1b[1;33mSuggestion:\x1b[0m {}", error, suggestion)
}
