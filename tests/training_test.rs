// Integration test: train from a CSV file and serve predictions from the artifacts

mod common;

use anyhow::Result;
use mathscore::config::TrainingConfig;
use mathscore::data::StudentRecord;
use mathscore::errors::ScoreError;
use mathscore::models::{artifacts_exist, FEATURES_FILE, MODEL_FILE};
use mathscore::predictor::Predictor;
use mathscore::training::{Trainer, REPORT_FILE};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_train_file_writes_artifacts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dataset = common::write_dataset(temp_dir.path(), 200);
    let artifact_dir = temp_dir.path().join("artifacts");

    let trainer = Trainer::new(TrainingConfig::default());
    let outcome = trainer.train_file(&dataset, &artifact_dir)?;

    assert!(artifacts_exist(&artifact_dir));
    assert!(artifact_dir.join(MODEL_FILE).exists());
    assert!(artifact_dir.join(FEATURES_FILE).exists());
    assert!(artifact_dir.join(REPORT_FILE).exists());

    // 200 rows with a 0.2 hold-out
    assert_eq!(outcome.report.dataset_rows, 200);
    assert_eq!(outcome.report.test_rows, 40);
    assert_eq!(outcome.report.train_rows, 160);
    assert_eq!(outcome.report.features.len(), 12);
    assert_eq!(outcome.report.reference_levels.len(), 5);

    // Noise is bounded by 5 points, so the fit should be close
    assert!(outcome.report.metrics.mae < 5.0, "mae {}", outcome.report.metrics.mae);
    assert!(outcome.report.metrics.r2 > 0.5, "r2 {}", outcome.report.metrics.r2);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(artifact_dir.join(REPORT_FILE))?)?;
    assert_eq!(report["model_id"], outcome.artifacts.metadata.model_id.as_str());
    assert_eq!(report["test_rows"], 40);

    Ok(())
}

#[test]
fn test_training_is_reproducible() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dataset = common::write_dataset(temp_dir.path(), 150);

    let trainer = Trainer::new(TrainingConfig::default());
    let first = trainer.train_file(&dataset, temp_dir.path().join("run1"))?;
    let second = trainer.train_file(&dataset, temp_dir.path().join("run2"))?;

    assert_eq!(first.report.metrics, second.report.metrics);
    assert_eq!(first.artifacts.schema, second.artifacts.schema);
    assert_eq!(first.artifacts.model, second.artifacts.model);
    assert_ne!(first.artifacts.metadata.model_id, second.artifacts.metadata.model_id);

    Ok(())
}

#[test]
fn test_different_seed_changes_split() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dataset = common::write_dataset(temp_dir.path(), 150);

    let a = Trainer::new(TrainingConfig::default()).train_file(&dataset, temp_dir.path().join("a"))?;
    let b = Trainer::new(TrainingConfig {
        seed: 7,
        ..TrainingConfig::default()
    })
    .train_file(&dataset, temp_dir.path().join("b"))?;

    assert_eq!(a.report.test_rows, b.report.test_rows);
    assert_ne!(a.report.metrics, b.report.metrics);

    Ok(())
}

#[test]
fn test_missing_column_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv = common::synthetic_csv(20).replace("math score", "maths");
    let dataset = temp_dir.path().join("broken.csv");
    fs::write(&dataset, csv)?;
    let artifact_dir = temp_dir.path().join("artifacts");

    let err = Trainer::new(TrainingConfig::default())
        .train_file(&dataset, &artifact_dir)
        .unwrap_err();

    match err.downcast_ref::<ScoreError>() {
        Some(ScoreError::MissingColumns { columns }) => {
            assert_eq!(columns, &vec!["math score".to_string()]);
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
    assert!(!artifacts_exist(&artifact_dir));
    assert!(!artifact_dir.join(REPORT_FILE).exists());

    Ok(())
}

#[test]
fn test_non_finite_score_is_fatal_and_keeps_previous_model() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let artifact_dir = temp_dir.path().join("artifacts");
    let trainer = Trainer::new(TrainingConfig::default());

    // A good model already in place must survive a failed retrain
    let good = common::write_dataset(temp_dir.path(), 50);
    let previous = trainer.train_file(&good, &artifact_dir)?;

    let mut csv = common::synthetic_csv(50);
    csv.push_str("\nmale,group A,high school,standard,none,NaN,50,50");
    let poisoned = temp_dir.path().join("poisoned.csv");
    fs::write(&poisoned, csv)?;

    let err = trainer.train_file(&poisoned, &artifact_dir).unwrap_err();
    match err.downcast_ref::<ScoreError>() {
        Some(ScoreError::InvalidScore { row, value, .. }) => {
            assert_eq!(*row, 52);
            assert_eq!(value, "NaN");
        }
        other => panic!("expected InvalidScore, got {:?}", other),
    }

    let predictor = Predictor::load(&artifact_dir)?;
    assert_eq!(predictor.metadata(), &previous.artifacts.metadata);
    assert!(predictor.model().intercept().is_finite());

    // And nothing is written into an empty directory
    let fresh_dir = temp_dir.path().join("fresh");
    assert!(trainer.train_file(&poisoned, &fresh_dir).is_err());
    assert!(!artifacts_exist(&fresh_dir));
    assert!(!fresh_dir.join(REPORT_FILE).exists());

    Ok(())
}

#[test]
fn test_predictor_loads_trained_artifacts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dataset = common::write_dataset(temp_dir.path(), 200);
    let artifact_dir = temp_dir.path().join("artifacts");
    let outcome = Trainer::new(TrainingConfig::default()).train_file(&dataset, &artifact_dir)?;

    let predictor = Predictor::load(&artifact_dir)?;
    assert_eq!(predictor.metadata(), &outcome.artifacts.metadata);

    let strong = StudentRecord::new("male", "group E", "master's degree", "standard", "completed");
    let weak = StudentRecord::new(
        "female",
        "group A",
        "associate's degree",
        "free/reduced",
        "completed",
    );

    let strong_prediction = predictor.predict(&strong);
    let weak_prediction = predictor.predict(&weak);

    for p in [&strong_prediction, &weak_prediction] {
        assert!(p.score.is_finite());
        assert!((0.0..=100.0).contains(&p.score));
        assert!(p.unrecognized.is_empty());
    }
    assert!(strong_prediction.score > weak_prediction.score);

    // The weak record sits on every reference level
    assert!(weak_prediction.contributions.is_empty());
    assert_eq!(weak_prediction.raw, predictor.model().intercept());

    Ok(())
}
