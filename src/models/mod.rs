// Models module
// Linear regression and artifact persistence

mod linear;
mod persistence;

pub use linear::LinearModel;
pub use persistence::{artifacts_exist, ModelArtifacts, ModelMetadata, FEATURES_FILE, MODEL_FILE};
pub(crate) use persistence::write_atomic;
