// Trainer - fits the math score model from a dataset and persists it

use anyhow::{Context, Result};
use ndarray::Array1;
use std::path::Path;

use super::evaluation::EvaluationMetrics;
use super::report::{top_features, TrainingReport};
use crate::config::TrainingConfig;
use crate::data::{Dataset, ScoredRecord, StudentRecord};
use crate::encoding::SchemaBuilder;
use crate::errors::ScoreError;
use crate::models::{write_atomic, LinearModel, ModelArtifacts};

/// Written next to the model artifacts after each run
pub const REPORT_FILE: &str = "training_report.json";

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifacts: ModelArtifacts,
    pub report: TrainingReport,
}

/// Single-shot trainer
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Derive the schema, fit on the training split and evaluate on the test split
    pub fn train(&self, dataset: &Dataset) -> Result<TrainingOutcome> {
        if dataset.is_empty() {
            return Err(ScoreError::EmptyDataset.into());
        }

        let summary = dataset.summary();
        for s in &summary {
            tracing::info!(
                column = %s.column,
                mean = s.mean,
                std = s.std,
                min = s.min,
                max = s.max,
                "Dataset statistics"
            );
        }

        // Schema comes from the whole dataset, before splitting
        let schema = SchemaBuilder::from_records(dataset.records().iter().map(|r| &r.student))
            .build()?;
        tracing::info!(features = schema.len(), "Encoded categorical fields");

        let split = dataset.split(self.config.test_fraction, self.config.seed)?;
        tracing::info!(
            train = split.train.len(),
            test = split.test.len(),
            seed = self.config.seed,
            "Split dataset"
        );

        let x_train = schema.encode_all(&students(&split.train));
        let y_train = math_scores(&split.train);
        let model = LinearModel::fit(&x_train, &y_train).context("Failed to fit linear model")?;

        let x_test = schema.encode_all(&students(&split.test));
        let y_test = math_scores(&split.test);
        let metrics = EvaluationMetrics::compute(&y_test, &model.predict(&x_test));
        tracing::info!(
            mae = metrics.mae,
            rmse = metrics.rmse,
            r2 = metrics.r2,
            "Evaluated on held-out split"
        );

        let (top_positive, top_negative) = top_features(
            schema.names(),
            model.coefficients().as_slice().unwrap_or(&[]),
            self.config.top_features,
        );

        let artifacts = ModelArtifacts::new(model, schema)?;
        let report = TrainingReport {
            model_id: artifacts.metadata.model_id.clone(),
            dataset_rows: dataset.len(),
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            seed: self.config.seed,
            features: artifacts.schema.names().to_vec(),
            reference_levels: artifacts.schema.reference_levels().to_vec(),
            intercept: artifacts.model.intercept(),
            metrics,
            top_positive,
            top_negative,
            summary,
        };

        Ok(TrainingOutcome { artifacts, report })
    }

    /// Load a CSV, train, and write model + feature names + report into `artifact_dir`
    ///
    /// Nothing is written unless training succeeds.
    pub fn train_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        dataset_path: P,
        artifact_dir: Q,
    ) -> Result<TrainingOutcome> {
        let dataset_path = dataset_path.as_ref();
        let artifact_dir = artifact_dir.as_ref();

        tracing::info!(path = %dataset_path.display(), "Loading dataset");
        let dataset = Dataset::load(dataset_path)?;
        tracing::info!(rows = dataset.len(), "Dataset loaded");

        let outcome = self.train(&dataset)?;
        outcome.artifacts.save(artifact_dir)?;

        let report_json = serde_json::to_string_pretty(&outcome.report)
            .context("Failed to serialize training report")?;
        write_atomic(&artifact_dir.join(REPORT_FILE), &report_json)?;

        Ok(outcome)
    }
}

fn students(rows: &[ScoredRecord]) -> Vec<StudentRecord> {
    rows.iter().map(|r| r.student.clone()).collect()
}

fn math_scores(rows: &[ScoredRecord]) -> Array1<f64> {
    rows.iter().map(|r| r.math_score).collect()
}
