// Encoding module
// Reference-level one-hot encoding shared by training and inference

mod builder;
mod schema;

pub use builder::SchemaBuilder;
pub use schema::{feature_name, FeatureSchema, ReferenceLevel};
