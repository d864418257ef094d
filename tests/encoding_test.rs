// Encoding contract between training and inference
//
// The schema built at training time and the encoder used at inference must
// agree on names, order and reference levels.

mod common;

use mathscore::data::{Dataset, Field, StudentRecord};
use mathscore::encoding::{feature_name, FeatureSchema, SchemaBuilder};
use mathscore::models::LinearModel;
use mathscore::predictor::Predictor;

fn training_schema() -> (SchemaBuilder, FeatureSchema) {
    let dataset = Dataset::from_reader(common::synthetic_csv(120).as_bytes()).unwrap();
    let builder = SchemaBuilder::from_records(dataset.records().iter().map(|r| &r.student));
    let schema = builder.build().unwrap();
    (builder, schema)
}

/// Every combination of legal values
fn all_legal_records() -> Vec<StudentRecord> {
    let mut records = Vec::new();
    for g in Field::Gender.legal_values() {
        for r in Field::RaceEthnicity.legal_values() {
            for p in Field::ParentalEducation.legal_values() {
                for l in Field::Lunch.legal_values() {
                    for t in Field::TestPreparation.legal_values() {
                        records.push(StudentRecord::new(*g, *r, *p, *l, *t));
                    }
                }
            }
        }
    }
    records
}

#[test]
fn test_schema_has_one_level_less_per_field() {
    let (_, schema) = training_schema();
    // 1 + 4 + 5 + 1 + 1
    assert_eq!(schema.len(), 12);
    assert_eq!(schema.names()[0], "gender_male");
    assert!(schema.position("gender_female").is_none());
    assert!(schema.position("race/ethnicity_group A").is_none());
    assert!(schema.position("lunch_standard").is_some());
    assert!(schema.position("lunch_free/reduced").is_none());
    assert!(schema.position("test preparation course_none").is_some());
}

#[test]
fn test_encoded_length_and_indicator_count() {
    let (builder, schema) = training_schema();
    let reference: Vec<(Field, String)> = builder.reference_levels();

    for record in all_legal_records() {
        let encoded = schema.encode(&record);
        assert_eq!(encoded.len(), schema.len());

        let expected_ones = reference
            .iter()
            .filter(|(field, level)| record.value(*field) != level.as_str())
            .count();
        assert_eq!(encoded.sum() as usize, expected_ones, "record {:?}", record);

        // At most one indicator per field, and it is the record's own value
        for field in Field::ALL {
            let set: Vec<&String> = schema
                .names()
                .iter()
                .zip(encoded.iter())
                .filter(|(name, v)| **v == 1.0 && schema.field_of(name) == Some(field))
                .map(|(name, _)| name)
                .collect();
            assert!(set.len() <= 1);
            if let Some(name) = set.first() {
                assert_eq!(**name, feature_name(field, record.value(field)));
            }
        }
    }
}

#[test]
fn test_reference_level_record_encodes_to_zero() {
    let (builder, schema) = training_schema();
    let levels: Vec<String> = builder.reference_levels().into_iter().map(|(_, v)| v).collect();
    let record = StudentRecord::new(
        levels[0].clone(),
        levels[1].clone(),
        levels[2].clone(),
        levels[3].clone(),
        levels[4].clone(),
    );
    assert_eq!(schema.encode(&record).sum(), 0.0);
}

#[test]
fn test_encoding_is_idempotent() {
    let (_, schema) = training_schema();
    let record = StudentRecord::new("male", "group D", "some college", "standard", "completed");
    assert_eq!(schema.encode(&record), schema.encode(&record));
}

#[test]
fn test_unseen_category_degrades_to_baseline() {
    let (_, schema) = training_schema();
    let known = StudentRecord::new("male", "group A", "high school", "standard", "none");
    let unseen = StudentRecord::new("male", "group Z", "high school", "standard", "none");

    // group A is the reference level, so both encode identically
    assert_eq!(schema.encode(&known), schema.encode(&unseen));

    let model = LinearModel::new(vec![1.0; schema.len()], 60.0);
    let predictor = Predictor::new(model, schema).unwrap();
    let prediction = predictor.predict(&unseen);
    assert!(prediction.score.is_finite());
    assert_eq!(prediction.unrecognized, vec![Field::RaceEthnicity]);
}

#[test]
fn test_end_to_end_scenario() {
    let schema = FeatureSchema::new(vec![
        "gender_male".to_string(),
        "lunch_standard".to_string(),
        "test preparation course_completed".to_string(),
    ])
    .unwrap();
    let record = StudentRecord::new("male", "group B", "high school", "standard", "completed");
    assert_eq!(schema.encode(&record).to_vec(), vec![1.0, 1.0, 1.0]);

    let model = LinearModel::new(vec![4.5, 11.5, 5.6], 59.0);
    let predictor = Predictor::new(model, schema).unwrap();
    let prediction = predictor.predict(&record);

    assert!((prediction.raw - 80.6).abs() < 1e-9);
    assert!((prediction.score - 80.6).abs() < 1e-9);
    assert_eq!(prediction.contributions.len(), 3);
}
