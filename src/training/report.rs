// Training report - metrics, influential features and dataset summary

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Write;

use super::evaluation::EvaluationMetrics;
use crate::data::ScoreSummary;
use crate::encoding::ReferenceLevel;

/// One named coefficient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub coefficient: f64,
}

/// Largest positive and most negative coefficients, at most `n` each
pub fn top_features(
    names: &[String],
    coefficients: &[f64],
    n: usize,
) -> (Vec<FeatureWeight>, Vec<FeatureWeight>) {
    let weights: Vec<FeatureWeight> = names
        .iter()
        .zip(coefficients)
        .map(|(feature, &coefficient)| FeatureWeight {
            feature: feature.clone(),
            coefficient,
        })
        .collect();

    let by_value = |a: &FeatureWeight, b: &FeatureWeight| {
        a.coefficient
            .partial_cmp(&b.coefficient)
            .unwrap_or(Ordering::Equal)
    };

    let mut positive: Vec<FeatureWeight> = weights
        .iter()
        .filter(|w| w.coefficient > 0.0)
        .cloned()
        .collect();
    positive.sort_by(|a, b| by_value(b, a));
    positive.truncate(n);

    let mut negative: Vec<FeatureWeight> = weights
        .into_iter()
        .filter(|w| w.coefficient < 0.0)
        .collect();
    negative.sort_by(by_value);
    negative.truncate(n);

    (positive, negative)
}

/// Everything the trainer reports about one run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub model_id: String,
    pub dataset_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub seed: u64,
    pub features: Vec<String>,
    pub reference_levels: Vec<ReferenceLevel>,
    pub intercept: f64,
    pub metrics: EvaluationMetrics,
    pub top_positive: Vec<FeatureWeight>,
    pub top_negative: Vec<FeatureWeight>,
    pub summary: Vec<ScoreSummary>,
}

impl TrainingReport {
    /// Plain-text report for the terminal
    pub fn render(&self) -> String {
        let rule = "-".repeat(60);
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "Dataset: {} rows", self.dataset_rows);
        for s in &self.summary {
            let _ = writeln!(
                out,
                "  {:<14} mean {:>6.2}  std {:>6.2}  min {:>6.1}  max {:>6.1}",
                s.column, s.mean, s.std, s.min, s.max
            );
        }

        let _ = writeln!(out, "\nFeatures used for prediction ({}):", self.features.len());
        for feature in &self.features {
            let _ = writeln!(out, "  - {}", feature);
        }

        let _ = writeln!(out, "\nReference levels (folded into intercept {:.2}):", self.intercept);
        for level in &self.reference_levels {
            let _ = writeln!(out, "  {:<30} = {}", level.field.column(), level.value);
        }

        let _ = writeln!(
            out,
            "\nSplit: {} train / {} test (seed {})",
            self.train_rows, self.test_rows, self.seed
        );

        let _ = writeln!(out, "\nEVALUATION\n{}", rule);
        let _ = writeln!(out, "MAE  (Mean Absolute Error)          : {:.2}", self.metrics.mae);
        let _ = writeln!(out, "RMSE (Root Mean Squared Error)      : {:.2}", self.metrics.rmse);
        let _ = writeln!(out, "R²   (Coefficient of Determination) : {:.4}", self.metrics.r2);
        let _ = writeln!(
            out,
            "\n  - On average the model misses by {:.2} points",
            self.metrics.mae
        );
        let _ = writeln!(
            out,
            "  - The model explains {:.2}% of the variance in math scores",
            self.metrics.r2 * 100.0
        );

        let _ = writeln!(out, "\nMOST INFLUENTIAL FEATURES\n{}", rule);
        let _ = writeln!(out, "Raise the score:");
        for w in &self.top_positive {
            let _ = writeln!(out, "  {:<50} : +{:.2}", w.feature, w.coefficient);
        }
        let _ = writeln!(out, "Lower the score:");
        for w in &self.top_negative {
            let _ = writeln!(out, "  {:<50} : {:.2}", w.feature, w.coefficient);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Field;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_top_features_split_by_sign() {
        let names = names(&["a", "b", "c", "d", "e"]);
        let coefficients = [3.0, -1.0, 7.0, -4.0, 0.0];
        let (positive, negative) = top_features(&names, &coefficients, 5);

        let pos: Vec<&str> = positive.iter().map(|w| w.feature.as_str()).collect();
        let neg: Vec<&str> = negative.iter().map(|w| w.feature.as_str()).collect();
        assert_eq!(pos, vec!["c", "a"]);
        assert_eq!(neg, vec!["d", "b"]);
    }

    #[test]
    fn test_top_features_truncates() {
        let names = names(&["a", "b", "c"]);
        let (positive, negative) = top_features(&names, &[1.0, 2.0, 3.0], 2);
        assert_eq!(positive.len(), 2);
        assert_eq!(positive[0].feature, "c");
        assert!(negative.is_empty());
    }

    #[test]
    fn test_render_mentions_metrics() {
        let report = TrainingReport {
            model_id: "id".into(),
            dataset_rows: 10,
            train_rows: 8,
            test_rows: 2,
            seed: 42,
            features: names(&["lunch_standard"]),
            reference_levels: vec![ReferenceLevel {
                field: Field::Lunch,
                value: "free/reduced".into(),
            }],
            intercept: 58.0,
            metrics: EvaluationMetrics {
                mae: 11.27,
                rmse: 14.0,
                r2: 0.25,
                samples: 2,
            },
            top_positive: vec![FeatureWeight {
                feature: "lunch_standard".into(),
                coefficient: 11.5,
            }],
            top_negative: vec![],
            summary: vec![],
        };

        let text = report.render();
        assert!(text.contains("MAE  (Mean Absolute Error)          : 11.27"));
        assert!(text.contains("25.00% of the variance"));
        assert!(text.contains("+11.50"));
        assert!(text.contains("free/reduced"));
    }
}
