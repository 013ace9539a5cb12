use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::info;
use toxguard::{Classifier, ClassifierConfig, Prediction, DEFAULT_MODEL_PATH};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the pipeline artifact
    #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Refuse to load the artifact unless it has this SHA-256 digest
    #[arg(long)]
    sha256: Option<String>,

    /// Print one JSON object per comment
    #[arg(long)]
    json: bool,

    /// Comments to classify. Read one per line from stdin when omitted
    comments: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start_time = Instant::now();
    let mut config = ClassifierConfig::new(&args.model);
    config.expected_sha256 = args.sha256.clone();

    let classifier = Classifier::builder()
        .with_config(config)
        .build()
        .with_context(|| format!("failed to load classifier from {}", args.model.display()))?;
    info!("Classifier loaded (took {:.2?})", start_time.elapsed());

    if args.comments.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read stdin")?;
            report(&classifier, &line, args.json)?;
        }
    } else {
        for comment in &args.comments {
            report(&classifier, comment, args.json)?;
        }
    }

    Ok(())
}

fn report(classifier: &Classifier, comment: &str, json: bool) -> anyhow::Result<()> {
    let prediction: Prediction = classifier
        .predict(comment)
        .with_context(|| format!("failed to classify {:?}", comment))?;

    if json {
        println!("{}", serde_json::to_string(&prediction)?);
    } else {
        println!("{}\t{:.4}\t{}", prediction.label, prediction.confidence, comment);
    }
    Ok(())
}
