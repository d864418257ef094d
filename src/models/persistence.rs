// Model persistence utilities
// Saves and loads the fitted model together with its feature schema

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::linear::LinearModel;
use crate::encoding::{FeatureSchema, ReferenceLevel};
use crate::errors::ScoreError;

/// Fitted coefficients + intercept
pub const MODEL_FILE: &str = "model.json";
/// Ordered feature-name list
pub const FEATURES_FILE: &str = "feature_names.json";

const FORMAT_VERSION: u32 = 1;

/// Metadata saved alongside the coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Unique id of this training run
    pub model_id: String,
    /// Timestamp of save
    pub trained_at: String,
    /// Fingerprint of the feature schema the coefficients belong to
    pub schema_fingerprint: String,
    /// Version of the persistence format
    pub format_version: u32,
}

/// On-disk layout of model.json
#[derive(Debug, Serialize, Deserialize)]
struct ModelFile {
    #[serde(flatten)]
    metadata: ModelMetadata,
    intercept: f64,
    coefficients: Vec<f64>,
    /// Values folded into the intercept, one per field
    #[serde(default)]
    reference_levels: Vec<ReferenceLevel>,
}

/// A model and the schema it was trained on, kept as a matched pair
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub model: LinearModel,
    pub schema: FeatureSchema,
    pub metadata: ModelMetadata,
}

impl ModelArtifacts {
    /// Pair a freshly fitted model with its schema
    pub fn new(model: LinearModel, schema: FeatureSchema) -> Result<Self, ScoreError> {
        check_counts(&model, &schema)?;
        let metadata = ModelMetadata {
            model_id: uuid::Uuid::new_v4().to_string(),
            trained_at: chrono::Utc::now().to_rfc3339(),
            schema_fingerprint: schema.fingerprint(),
            format_version: FORMAT_VERSION,
        };
        Ok(Self {
            model,
            schema,
            metadata,
        })
    }

    /// Write both files into `dir`
    ///
    /// Each file is written to a temp path and renamed into place.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create artifact directory {:?}", dir))?;

        let model_file = ModelFile {
            metadata: self.metadata.clone(),
            intercept: self.model.intercept(),
            coefficients: self.model.coefficients().to_vec(),
            reference_levels: self.schema.reference_levels().to_vec(),
        };
        let model_json =
            serde_json::to_string_pretty(&model_file).context("Failed to serialize model")?;
        let features_json = serde_json::to_string_pretty(&self.schema)
            .context("Failed to serialize feature names")?;

        write_atomic(&dir.join(FEATURES_FILE), &features_json)?;
        write_atomic(&dir.join(MODEL_FILE), &model_json)?;

        tracing::info!(
            model_id = %self.metadata.model_id,
            features = self.schema.len(),
            dir = %dir.display(),
            "Saved model artifacts"
        );

        Ok(())
    }

    /// Load both files from `dir` and verify they belong together
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let model_path = dir.join(MODEL_FILE);
        let features_path = dir.join(FEATURES_FILE);

        for path in [&model_path, &features_path] {
            if !path.exists() {
                return Err(ScoreError::ArtifactMissing { path: path.clone() }.into());
            }
        }

        let model_json = fs::read_to_string(&model_path)
            .with_context(|| format!("Failed to read model from {:?}", model_path))?;
        let model_file: ModelFile =
            serde_json::from_str(&model_json).context("Failed to parse model JSON")?;

        let features_json = fs::read_to_string(&features_path)
            .with_context(|| format!("Failed to read feature names from {:?}", features_path))?;
        let schema: FeatureSchema =
            serde_json::from_str(&features_json).context("Failed to parse feature names JSON")?;

        if model_file.metadata.format_version != FORMAT_VERSION {
            return Err(mismatch(format!(
                "unsupported format version {} (expected {})",
                model_file.metadata.format_version, FORMAT_VERSION
            ))
            .into());
        }

        let model = LinearModel::new(model_file.coefficients, model_file.intercept);
        check_counts(&model, &schema)?;

        let fingerprint = schema.fingerprint();
        if fingerprint != model_file.metadata.schema_fingerprint {
            return Err(mismatch(format!(
                "feature names do not match the schema the model was trained on \
                 (expected fingerprint {}, found {})",
                model_file.metadata.schema_fingerprint, fingerprint
            ))
            .into());
        }

        let schema = schema
            .with_reference_levels(model_file.reference_levels)
            .map_err(|e| mismatch(e.to_string()))?;

        tracing::debug!(
            model_id = %model_file.metadata.model_id,
            features = schema.len(),
            "Loaded model artifacts"
        );

        Ok(Self {
            model,
            schema,
            metadata: model_file.metadata,
        })
    }
}

/// Check if both artifact files exist
pub fn artifacts_exist<P: AsRef<Path>>(dir: P) -> bool {
    let dir = dir.as_ref();
    dir.join(MODEL_FILE).exists() && dir.join(FEATURES_FILE).exists()
}

fn check_counts(model: &LinearModel, schema: &FeatureSchema) -> Result<(), ScoreError> {
    if model.n_features() != schema.len() {
        return Err(mismatch(format!(
            "model has {} coefficients but schema lists {} features",
            model.n_features(),
            schema.len()
        )));
    }
    Ok(())
}

fn mismatch(reason: String) -> ScoreError {
    ScoreError::ArtifactMismatch { reason }
}

/// Write to a sibling temp file, then rename over the target
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let temp_path: PathBuf = path.with_extension("tmp");
    fs::write(&temp_path, contents)
        .with_context(|| format!("Failed to write {:?}", temp_path))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to move {:?} into place", path))?;
    Ok(())
}
