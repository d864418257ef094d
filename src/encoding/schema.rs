// Feature schema - the ordered list of encoded feature names
//
// The schema is produced once at training time and persisted next to the
// model. Inference encodes records against the persisted copy only.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::data::{Field, StudentRecord};
use crate::errors::ScoreError;

/// Name of the indicator feature for `value` of `field`
///
/// Shared by the schema builder and the encoder; both sides must agree on it.
pub fn feature_name(field: Field, value: &str) -> String {
    format!("{}_{}", field.column(), value)
}

/// Value of a field that has no indicator; its effect lives in the intercept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLevel {
    pub field: Field,
    pub value: String,
}

/// Ordered, immutable feature-name list with a precomputed position index
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    names: Vec<String>,
    positions: HashMap<String, usize>,
    /// At most one per field; empty when the schema was built from names alone
    reference_levels: Vec<ReferenceLevel>,
}

impl FeatureSchema {
    /// Build a schema from names in their persisted order
    pub fn new(names: Vec<String>) -> Result<Self, ScoreError> {
        let mut positions = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if positions.insert(name.clone(), i).is_some() {
                return Err(ScoreError::DuplicateFeature(name.clone()));
            }
        }
        Ok(Self {
            names,
            positions,
            reference_levels: Vec::new(),
        })
    }

    /// Attach the reference level of each field
    ///
    /// A reference level must not have its own feature, and a field has at
    /// most one.
    pub fn with_reference_levels(
        mut self,
        levels: Vec<ReferenceLevel>,
    ) -> Result<Self, ScoreError> {
        for (i, level) in levels.iter().enumerate() {
            let name = feature_name(level.field, &level.value);
            let repeated = levels[..i].iter().any(|other| other.field == level.field);
            if repeated || self.positions.contains_key(&name) {
                return Err(ScoreError::InvalidReferenceLevel(name));
            }
        }
        self.reference_levels = levels;
        Ok(self)
    }

    pub fn reference_levels(&self) -> &[ReferenceLevel] {
        &self.reference_levels
    }

    pub fn reference_level(&self, field: Field) -> Option<&str> {
        self.reference_levels
            .iter()
            .find(|level| level.field == field)
            .map(|level| level.value.as_str())
    }

    /// Whether training saw `value` for `field`: it has an indicator or is
    /// the reference level
    pub fn recognizes(&self, field: Field, value: &str) -> bool {
        self.positions.contains_key(&feature_name(field, value))
            || self.reference_level(field) == Some(value)
    }

    /// Fields whose value encodes to the baseline only because training
    /// never saw it
    pub fn unrecognized_fields(&self, record: &StudentRecord) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&field| !self.recognizes(field, record.value(field)))
            .collect()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Categorical field a feature name belongs to
    pub fn field_of(&self, name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| {
            name.strip_prefix(field.column())
                .is_some_and(|rest| rest.starts_with('_'))
        })
    }

    /// Encode one record as a 0/1 vector over this schema
    ///
    /// A value with no feature in the schema (the reference level, or a value
    /// never seen during training) leaves every indicator of its field at 0.
    pub fn encode(&self, record: &StudentRecord) -> Array1<f64> {
        let mut encoded = Array1::zeros(self.names.len());
        for field in Field::ALL {
            let name = feature_name(field, record.value(field));
            if let Some(i) = self.position(&name) {
                encoded[i] = 1.0;
            }
        }
        encoded
    }

    /// Encode many records into a design matrix, one row per record
    pub fn encode_all(&self, records: &[StudentRecord]) -> Array2<f64> {
        let mut matrix = Array2::zeros((records.len(), self.names.len()));
        for (mut row, record) in matrix.rows_mut().into_iter().zip(records) {
            row.assign(&self.encode(record));
        }
        matrix
    }

    /// SHA-256 over the ordered names
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for name in &self.names {
            hasher.update(name.as_bytes());
            hasher.update(b"\n");
        }
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect()
    }
}

impl Serialize for FeatureSchema {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Only the ordered names are persisted; positions are rebuilt on load
        self.names.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FeatureSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        FeatureSchema::new(names).map_err(serde::de::Error::custom)
    }
}
