// Mathscore - Student math score prediction
// Main entry point

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use mathscore::config::{load_config, Config};
use mathscore::data::StudentRecord;
use mathscore::errors::{
    artifacts_not_found_error, dataset_columns_error, ScoreError, UserFriendlyError,
};
use mathscore::predictor::Predictor;
use mathscore::server::PredictionServer;
use mathscore::training::{Trainer, REPORT_FILE};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "mathscore")]
#[command(about = "Predict student math scores from social and demographic factors", version)]
struct Args {
    /// Path to a config file (default: ./mathscore.toml or ~/.mathscore/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit the model from a CSV dataset and save the artifacts
    Train(TrainArgs),
    /// Predict the math score for one student
    Predict(PredictArgs),
    /// Run the HTTP form and JSON API
    Serve(ServeArgs),
    /// Show the feature schema and coefficients of a trained model
    Inspect {
        /// Artifact directory
        #[arg(long)]
        artifacts: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct TrainArgs {
    /// Training CSV (default from config)
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Artifact output directory
    #[arg(long)]
    artifacts: Option<PathBuf>,
    /// Shuffle seed for the train/test split
    #[arg(long)]
    seed: Option<u64>,
    /// Share of rows held out for evaluation
    #[arg(long)]
    test_fraction: Option<f64>,
    /// Number of positive/negative coefficients to report
    #[arg(long)]
    top: Option<usize>,
}

impl TrainArgs {
    /// Flags given on the command line win over the config file
    fn apply(self, config: &mut Config) {
        if let Some(dataset) = self.dataset {
            config.training.dataset = dataset;
        }
        if let Some(dir) = self.artifacts {
            config.artifacts.dir = dir;
        }
        if let Some(seed) = self.seed {
            config.training.seed = seed;
        }
        if let Some(fraction) = self.test_fraction {
            config.training.test_fraction = fraction;
        }
        if let Some(top) = self.top {
            config.training.top_features = top;
        }
    }
}

#[derive(clap::Args, Debug)]
struct PredictArgs {
    /// Artifact directory
    #[arg(long)]
    artifacts: Option<PathBuf>,
    #[arg(long)]
    gender: String,
    /// Ethnic group, e.g. "group C"
    #[arg(long = "race")]
    race_ethnicity: String,
    /// e.g. "some college"
    #[arg(long)]
    parental_education: String,
    /// "standard" or "free/reduced"
    #[arg(long)]
    lunch: String,
    /// "none" or "completed"
    #[arg(long = "test-prep")]
    test_preparation: String,
    /// Print the prediction as JSON
    #[arg(long)]
    json: bool,
}

impl PredictArgs {
    fn record(&self) -> StudentRecord {
        StudentRecord::new(
            self.gender.as_str(),
            self.race_ethnicity.as_str(),
            self.parental_education.as_str(),
            self.lunch.as_str(),
            self.test_preparation.as_str(),
        )
    }
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Artifact directory
    #[arg(long)]
    artifacts: Option<PathBuf>,
    /// Bind address (default from config: 127.0.0.1:8501)
    #[arg(long)]
    bind: Option<String>,
}

impl ServeArgs {
    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.artifacts {
            config.artifacts.dir = dir;
        }
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing();

    let mut config = load_config(args.config.as_deref())
        .user_context("Could not load mathscore configuration")?;

    match args.command {
        Command::Train(train) => {
            train.apply(&mut config);
            run_train(config)
        }
        Command::Predict(predict) => {
            let dir = predict.artifacts.clone().unwrap_or(config.artifacts.dir);
            run_predict(&dir, &predict.record(), predict.json)
        }
        Command::Serve(serve) => {
            serve.apply(&mut config);

            // Fatal before accepting any request
            let predictor = load_predictor(&config.artifacts.dir)?;
            let bind_address = config.server.bind_address.clone();
            PredictionServer::new(predictor, config.server)
                .serve()
                .await
                .user_context_with_suggestion(
                    &format!("Server on {} stopped", bind_address),
                    "Check that the address is free, or pass --bind <host:port>",
                )
        }
        Command::Inspect { artifacts } => {
            let dir = artifacts.unwrap_or(config.artifacts.dir);
            run_inspect(&dir)
        }
    }
}

fn init_tracing() {
    // MATHSCORE_DEBUG=1 raises the default level; RUST_LOG still wins
    let show_debug = std::env::var("MATHSCORE_DEBUG")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);
    let default_level = if show_debug { "debug" } else { "info" };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}

fn run_train(config: Config) -> Result<()> {
    let dataset = config.training.dataset.clone();
    let dir = config.artifacts.dir.clone();
    let trainer = Trainer::new(config.training);

    let outcome = trainer.train_file(&dataset, &dir).map_err(|e| {
        match e.downcast_ref::<ScoreError>() {
            Some(ScoreError::MissingColumns { columns }) => {
                anyhow!(dataset_columns_error(&dataset.display().to_string(), columns))
            }
            _ => e,
        }
    })?;

    println!("{}", "=".repeat(60));
    println!("TRAINING MATH SCORE MODEL");
    println!("{}", "=".repeat(60));
    print!("{}", outcome.report.render());
    println!("\nSaved model to {}", dir.display());
    println!("Saved report to {}", dir.join(REPORT_FILE).display());
    println!("\nStart the web form with: mathscore serve --artifacts {}", dir.display());

    Ok(())
}

fn run_predict(dir: &Path, record: &StudentRecord, json: bool) -> Result<()> {
    let predictor = load_predictor(dir)?;
    let prediction = predictor.predict(record);

    if json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    println!("Predicted math score: {:.1}", prediction.score);
    println!("Category: {}", prediction.band.label());
    println!("\nBaseline (reference levels): {:.2}", prediction.baseline);
    for c in &prediction.contributions {
        println!("  {:<50} {:+.2}", c.feature, c.points);
    }
    if prediction.raw != prediction.score {
        println!("\n(raw model output {:.2} clamped to [0, 100])", prediction.raw);
    }

    Ok(())
}

fn run_inspect(dir: &Path) -> Result<()> {
    let predictor = load_predictor(dir)?;
    let metadata = predictor.metadata();

    println!("Model:       {}", metadata.model_id);
    println!("Trained at:  {}", metadata.trained_at);
    println!("Fingerprint: {}", metadata.schema_fingerprint);
    println!("Intercept:   {:.4}", predictor.model().intercept());
    println!("\nFeatures ({}):", predictor.schema().len());
    for (name, coefficient) in predictor
        .schema()
        .names()
        .iter()
        .zip(predictor.model().coefficients().iter())
    {
        println!("  {:<50} {:+.4}", name, coefficient);
    }

    Ok(())
}

/// Load the artifact pair, turning a missing file into an actionable message
fn load_predictor(dir: &Path) -> Result<Predictor> {
    Predictor::load(dir).map_err(|e| match e.downcast_ref::<ScoreError>() {
        Some(ScoreError::ArtifactMissing { path }) => {
            tracing::error!(path = %path.display(), "Model artifact missing");
            anyhow!(artifacts_not_found_error(&dir.display().to_string()))
        }
        _ => e,
    })
}
