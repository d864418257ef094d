// Schema builder - derives the feature schema from training records
//
// For each field the distinct values are sorted and the first one becomes the
// reference level. Every other value gets an indicator feature.

use std::collections::{BTreeMap, BTreeSet};

use super::schema::{feature_name, FeatureSchema, ReferenceLevel};
use crate::data::{Field, StudentRecord};
use crate::errors::ScoreError;

#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    observed: BTreeMap<Field, BTreeSet<String>>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a StudentRecord>) -> Self {
        let mut builder = Self::new();
        for record in records {
            builder.observe(record);
        }
        builder
    }

    /// Record every categorical value of one row
    pub fn observe(&mut self, record: &StudentRecord) {
        for field in Field::ALL {
            self.observed
                .entry(field)
                .or_default()
                .insert(record.value(field).to_string());
        }
    }

    /// Lexicographically-first value per field, folded into the intercept
    pub fn reference_levels(&self) -> Vec<(Field, String)> {
        Field::ALL
            .into_iter()
            .filter_map(|field| {
                self.observed
                    .get(&field)
                    .and_then(|values| values.first())
                    .map(|value| (field, value.clone()))
            })
            .collect()
    }

    /// Produce the ordered schema: fields in fixed order, values sorted,
    /// reference level skipped
    pub fn build(&self) -> Result<FeatureSchema, ScoreError> {
        let mut names = Vec::new();
        for field in Field::ALL {
            if let Some(values) = self.observed.get(&field) {
                names.extend(values.iter().skip(1).map(|value| feature_name(field, value)));
            }
        }

        let levels = self
            .reference_levels()
            .into_iter()
            .map(|(field, value)| ReferenceLevel { field, value })
            .collect();

        tracing::debug!(features = names.len(), "Built feature schema");
        FeatureSchema::new(names)?.with_reference_levels(levels)
    }
}
