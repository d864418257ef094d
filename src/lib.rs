// Mathscore - Student math score prediction
// Library exports

pub mod config;
pub mod data;
pub mod encoding;
pub mod errors;
pub mod models;
pub mod predictor;
pub mod server; // HTTP form and JSON API
pub mod training;
