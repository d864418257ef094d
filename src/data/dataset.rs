// Training dataset loading, summary statistics and train/test splitting

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use super::record::{Field, ScoredRecord, StudentRecord};
use crate::errors::ScoreError;

pub const MATH_SCORE: &str = "math score";
pub const READING_SCORE: &str = "reading score";
pub const WRITING_SCORE: &str = "writing score";

const SCORE_COLUMNS: [&str; 3] = [MATH_SCORE, READING_SCORE, WRITING_SCORE];

/// Every column the trainer needs, in dataset order
pub fn required_columns() -> Vec<&'static str> {
    Field::ALL
        .iter()
        .map(|field| field.column())
        .chain(SCORE_COLUMNS)
        .collect()
}

/// Descriptive statistics for one score column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub column: String,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Held-out split of a dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<ScoredRecord>,
    pub test: Vec<ScoredRecord>,
}

/// In-memory training dataset
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<ScoredRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ScoredRecord>) -> Self {
        Self { records }
    }

    /// Load a CSV file with a header row
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open dataset {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to load dataset {}", path.display()))
    }

    /// Parse CSV from any reader
    ///
    /// Missing columns abort before any row is read.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().context("Failed to read CSV header")?.clone();
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = required_columns()
            .into_iter()
            .filter(|name| position(name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ScoreError::MissingColumns { columns: missing }.into());
        }

        // Every column was found above
        let index = |name: &str| position(name).unwrap_or_default();
        let field_idx: Vec<usize> = Field::ALL.iter().map(|f| index(f.column())).collect();
        let score_idx: Vec<usize> = SCORE_COLUMNS.iter().map(|&c| index(c)).collect();

        let mut records = Vec::new();
        for (i, row) in reader.records().enumerate() {
            // Header is line 1
            let line = i + 2;
            let row = row.with_context(|| format!("Failed to read CSV row {}", line))?;
            let cell = |idx: usize| row.get(idx).unwrap_or("").to_string();

            let student = StudentRecord::new(
                cell(field_idx[0]),
                cell(field_idx[1]),
                cell(field_idx[2]),
                cell(field_idx[3]),
                cell(field_idx[4]),
            );

            let mut scores = [0.0; 3];
            for (slot, (&idx, column)) in scores.iter_mut().zip(score_idx.iter().zip(SCORE_COLUMNS)) {
                let raw = cell(idx);
                // NaN and inf parse as f64 but would poison the fit
                *slot = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ScoreError::InvalidScore {
                        row: line,
                        column: column.to_string(),
                        value: raw.clone(),
                    })?;
            }

            records.push(ScoredRecord {
                student,
                math_score: scores[0],
                reading_score: scores[1],
                writing_score: scores[2],
            });
        }

        tracing::debug!(rows = records.len(), "Parsed dataset");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ScoredRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Categorical part of every row
    pub fn students(&self) -> Vec<StudentRecord> {
        self.records.iter().map(|r| r.student.clone()).collect()
    }

    /// Mean, sample standard deviation, min and max of each score column
    pub fn summary(&self) -> Vec<ScoreSummary> {
        let columns: [(&str, fn(&ScoredRecord) -> f64); 3] = [
            (MATH_SCORE, |r| r.math_score),
            (READING_SCORE, |r| r.reading_score),
            (WRITING_SCORE, |r| r.writing_score),
        ];

        columns
            .iter()
            .map(|(name, get)| {
                let values: Vec<f64> = self.records.iter().map(get).collect();
                describe(name, &values)
            })
            .collect()
    }

    /// Shuffle with a fixed seed and hold out `ceil(n * test_fraction)` rows
    pub fn split(&self, test_fraction: f64, seed: u64) -> Result<Split> {
        let n = self.records.len();
        if n == 0 {
            return Err(ScoreError::EmptyDataset.into());
        }

        let n_test = (n as f64 * test_fraction).ceil() as usize;
        if !(0.0..1.0).contains(&test_fraction) || n_test == 0 || n_test >= n {
            return Err(ScoreError::SplitTooSmall {
                rows: n,
                test_fraction,
            }
            .into());
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let test = indices[..n_test]
            .iter()
            .map(|&i| self.records[i].clone())
            .collect();
        let train = indices[n_test..]
            .iter()
            .map(|&i| self.records[i].clone())
            .collect();

        Ok(Split { train, test })
    }
}

fn describe(column: &str, values: &[f64]) -> ScoreSummary {
    if values.is_empty() {
        return ScoreSummary {
            column: column.to_string(),
            mean: 0.0,
            std: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        var.sqrt()
    } else {
        0.0
    };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    ScoreSummary {
        column: column.to_string(),
        mean,
        std,
        min,
        max,
    }
}
