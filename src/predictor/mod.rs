// Predictor - immutable handle over a loaded model and its schema
//
// Loaded once at startup and shared read-only; every prediction is a pure
// function of (model, schema, record).

mod band;

pub use band::ScoreBand;

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::data::{Field, StudentRecord};
use crate::encoding::FeatureSchema;
use crate::errors::ScoreError;
use crate::models::{LinearModel, ModelArtifacts, ModelMetadata};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Clamp a raw model output to the valid score range
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.clamp(MIN_SCORE, MAX_SCORE)
}

/// Points one active feature adds to the prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub feature: String,
    pub points: f64,
}

/// Result of one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Unclamped model output
    pub raw: f64,
    /// Score in [0, 100]
    pub score: f64,
    pub band: ScoreBand,
    /// Intercept the contributions are added to
    pub baseline: f64,
    /// Active features and their coefficients
    pub contributions: Vec<Contribution>,
    /// Fields whose value training never saw, encoded as the baseline
    pub unrecognized: Vec<Field>,
}

#[derive(Debug, Clone)]
pub struct Predictor {
    model: LinearModel,
    schema: FeatureSchema,
    metadata: ModelMetadata,
}

impl Predictor {
    /// Load the model and feature names from an artifact directory
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let artifacts = ModelArtifacts::load(dir)?;
        tracing::info!(
            model_id = %artifacts.metadata.model_id,
            trained_at = %artifacts.metadata.trained_at,
            features = artifacts.schema.len(),
            "Predictor ready"
        );
        Ok(Self::from_artifacts(artifacts))
    }

    /// Build a predictor from an in-memory model and schema
    pub fn new(model: LinearModel, schema: FeatureSchema) -> Result<Self, ScoreError> {
        ModelArtifacts::new(model, schema).map(Self::from_artifacts)
    }

    pub fn from_artifacts(artifacts: ModelArtifacts) -> Self {
        Self {
            model: artifacts.model,
            schema: artifacts.schema,
            metadata: artifacts.metadata,
        }
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Encode the record against the persisted schema and predict
    pub fn predict(&self, record: &StudentRecord) -> Prediction {
        let unrecognized = self.schema.unrecognized_fields(record);
        if !unrecognized.is_empty() {
            tracing::warn!(
                fields = ?unrecognized,
                "Category values unseen in training, encoded as the baseline"
            );
        }

        let encoded = self.schema.encode(record);
        let raw = self.model.predict_one(encoded.view());
        let score = clamp_score(raw);

        let contributions = self
            .model
            .contributions(encoded.view())
            .iter()
            .zip(encoded.iter())
            .zip(self.schema.names())
            .filter(|((_, active), _)| **active != 0.0)
            .map(|((&points, _), feature)| Contribution {
                feature: feature.clone(),
                points,
            })
            .collect();

        tracing::debug!(raw, score, "Prediction");

        Prediction {
            raw,
            score,
            band: ScoreBand::from_score(score),
            baseline: self.model.intercept(),
            contributions,
            unrecognized,
        }
    }
}
