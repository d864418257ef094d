// Student records and categorical field definitions

use serde::{Deserialize, Serialize};

/// One of the five categorical input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Gender,
    RaceEthnicity,
    ParentalEducation,
    Lunch,
    TestPreparation,
}

impl Field {
    /// All fields in schema order (same order as the dataset columns)
    pub const ALL: [Field; 5] = [
        Field::Gender,
        Field::RaceEthnicity,
        Field::ParentalEducation,
        Field::Lunch,
        Field::TestPreparation,
    ];

    /// Column header in the training CSV; also the feature-name prefix
    pub fn column(&self) -> &'static str {
        match self {
            Field::Gender => "gender",
            Field::RaceEthnicity => "race/ethnicity",
            Field::ParentalEducation => "parental level of education",
            Field::Lunch => "lunch",
            Field::TestPreparation => "test preparation course",
        }
    }

    /// Human-readable label for forms
    pub fn label(&self) -> &'static str {
        match self {
            Field::Gender => "Gender",
            Field::RaceEthnicity => "Ethnic group",
            Field::ParentalEducation => "Parental education",
            Field::Lunch => "Lunch type",
            Field::TestPreparation => "Test preparation course",
        }
    }

    /// Values the input interface offers for this field
    pub fn legal_values(&self) -> &'static [&'static str] {
        match self {
            Field::Gender => &["female", "male"],
            Field::RaceEthnicity => &["group A", "group B", "group C", "group D", "group E"],
            Field::ParentalEducation => &[
                "some high school",
                "high school",
                "some college",
                "associate's degree",
                "bachelor's degree",
                "master's degree",
            ],
            Field::Lunch => &["standard", "free/reduced"],
            Field::TestPreparation => &["none", "completed"],
        }
    }
}

/// The five categorical attributes of one student
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentRecord {
    pub gender: String,
    pub race_ethnicity: String,
    pub parental_education: String,
    pub lunch: String,
    pub test_preparation: String,
}

impl StudentRecord {
    pub fn new(
        gender: impl Into<String>,
        race_ethnicity: impl Into<String>,
        parental_education: impl Into<String>,
        lunch: impl Into<String>,
        test_preparation: impl Into<String>,
    ) -> Self {
        Self {
            gender: gender.into(),
            race_ethnicity: race_ethnicity.into(),
            parental_education: parental_education.into(),
            lunch: lunch.into(),
            test_preparation: test_preparation.into(),
        }
    }

    /// Value of a categorical field
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Gender => &self.gender,
            Field::RaceEthnicity => &self.race_ethnicity,
            Field::ParentalEducation => &self.parental_education,
            Field::Lunch => &self.lunch,
            Field::TestPreparation => &self.test_preparation,
        }
    }
}

/// A training row: categorical attributes plus the three exam scores
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub student: StudentRecord,
    pub math_score: f64,
    pub reading_score: f64,
    pub writing_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_lookup_matches_field() {
        let record = StudentRecord::new("male", "group C", "high school", "standard", "none");
        assert_eq!(record.value(Field::Gender), "male");
        assert_eq!(record.value(Field::RaceEthnicity), "group C");
        assert_eq!(record.value(Field::ParentalEducation), "high school");
        assert_eq!(record.value(Field::Lunch), "standard");
        assert_eq!(record.value(Field::TestPreparation), "none");
    }

    #[test]
    fn test_legal_values_cover_form_options() {
        assert_eq!(Field::RaceEthnicity.legal_values().len(), 5);
        assert_eq!(Field::ParentalEducation.legal_values().len(), 6);
        assert!(Field::Lunch.legal_values().contains(&"free/reduced"));
    }

    #[test]
    fn test_field_order_matches_columns() {
        let columns: Vec<&str> = Field::ALL.iter().map(|f| f.column()).collect();
        assert_eq!(
            columns,
            vec![
                "gender",
                "race/ethnicity",
                "parental level of education",
                "lunch",
                "test preparation course"
            ]
        );
    }
}
