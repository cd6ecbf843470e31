use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use credit_classifiers::artifact::ModelArtifact;
use credit_classifiers::io::{read_table, write_results};
use credit_classifiers::predictor::BatchPredictor;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CREDIT_LOG", "error,credit=info"))
        .init();

    let matches = Command::new("credit")
        .version(clap::crate_version!())
        .about("Credit-score prediction over tabular customer data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("predict")
                .about("Classify every row of a CSV file using a trained model artifact")
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help("Path to the model artifact (JSON)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .help("Path to the input CSV file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Path the results CSV will be written to")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no_confidence")
                        .long("no-confidence")
                        .help("Omit the Confidence column from the output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the schema and model variant carried by an artifact")
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help("Path to the model artifact (JSON)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("predict", sub)) => run_predict(sub),
        Some(("inspect", sub)) => run_inspect(sub),
        _ => unreachable!("subcommand is required"),
    }
}

fn run_predict(matches: &ArgMatches) -> Result<()> {
    let model_path: &PathBuf = matches.get_one("model").expect("required");
    let input_path: &PathBuf = matches.get_one("input").expect("required");
    let output_path: &PathBuf = matches.get_one("output").expect("required");
    let with_confidence = !matches.get_flag("no_confidence");

    // A broken artifact is fatal here, before any input is read.
    let artifact = ModelArtifact::from_path(model_path)
        .with_context(|| format!("Could not load model artifact {}", model_path.display()))?;
    let predictor = BatchPredictor::from_artifact(artifact)?;

    let table = read_table(input_path)?;
    log::info!(
        "Read {} rows x {} columns from {}",
        table.rows.len(),
        table.header.len(),
        input_path.display()
    );

    let results = predictor.predict_all(&table).with_context(|| {
        format!("Input {} does not match the model's schema", input_path.display())
    })?;

    write_results(output_path, &results, with_confidence)?;
    println!(
        "Wrote {} rows to {} ({} classified, {} could not be classified)",
        results.rows.len(),
        output_path.display(),
        results.classified_count(),
        results.failed_count()
    );
    Ok(())
}

fn run_inspect(matches: &ArgMatches) -> Result<()> {
    let model_path: &PathBuf = matches.get_one("model").expect("required");
    let artifact = ModelArtifact::from_path(model_path)
        .with_context(|| format!("Could not load model artifact {}", model_path.display()))?;

    println!("Artifact: {}", model_path.display());
    println!("Format version: {}", artifact.format_version);
    if let Some(created_at) = artifact.created_at {
        println!("Created: {}", created_at.to_rfc3339());
    }
    println!("Model variant: {}", artifact.model.variant_name());
    println!("Classes: {}", artifact.schema.class_labels.join(", "));
    println!("Features ({}):", artifact.schema.feature_width());
    for name in artifact.schema.feature_names() {
        println!("  {}", name);
    }
    Ok(())
}
