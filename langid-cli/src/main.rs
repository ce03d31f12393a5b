use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use langid_core::io::read_file;
use langid_core::{
    CasePolicy, Classification, Classifier, FileSink, LangIdConfig, LangIdError, Order, TraceSink,
    WriteMode,
};
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Identify the language of a text with character n-gram models", long_about = None)]
struct Cli {
    /// Folder holding one `<language>.dat` corpus per language
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Folder receiving one `out<N>.txt` report per query
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lowercase queries before scoring instead of rejecting uppercase letters
    #[arg(long, default_value_t = false)]
    lowercase: bool,

    /// Always rebuild models from the corpora and never write `.bin` caches
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// Only score with the model of this order (1, 2 or 3)
    #[arg(long, value_parser = parse_order)]
    order: Option<Order>,

    /// File with one query per line
    #[arg(short, long)]
    queries: Option<PathBuf>,

    /// Queries to classify
    query: Vec<String>,
}

fn parse_order(value: &str) -> Result<Order, String> {
    let width: usize = value.parse().map_err(|_| format!("'{value}' is not a number"))?;
    Order::try_from(width).map_err(|e| e.to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;

    let mut queries = cli.query.clone();
    if let Some(path) = &cli.queries {
        queries.extend(read_file(path)?.into_iter().filter(|line| !line.trim().is_empty()));
    }
    if queries.is_empty() {
        return Err("no query given, pass queries as arguments or with --queries".into());
    }

    let classifier = Classifier::from_config(&config)?;
    info!("languages: {}", classifier.language_names().join(", "));

    for (index, query) in queries.iter().enumerate() {
        let report_path = config.report_path(index + 1);
        let mut sink = FileSink::new(&report_path);

        let results = run_query(&classifier, cli.order, query, &mut sink)?;

        println!("Query {}: {}", index + 1, query);
        for classification in &results {
            print_result(classification);
        }
        println!("Report: {}", report_path.display());
    }

    Ok(())
}

/// Loads the configuration file, if any, then applies flags on top of it.
fn resolve_config(cli: &Cli) -> Result<LangIdConfig, LangIdError> {
    let mut config = match &cli.config {
        Some(path) => LangIdConfig::load(path)?,
        None => LangIdConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.data_dir = data.clone();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    if cli.lowercase {
        config.case_policy = CasePolicy::Lowercase;
    }
    if cli.no_cache {
        config.use_cache = false;
    }
    Ok(config)
}

/// Classifies one query at a single order or at all three.
///
/// A single order always starts a fresh report.
fn run_query<S: TraceSink + ?Sized>(
    classifier: &Classifier,
    order: Option<Order>,
    query: &str,
    sink: &mut S,
) -> Result<Vec<Classification>, LangIdError> {
    match order {
        Some(order) => {
            let classification = classifier.score(order, query)?;
            sink.write_report(WriteMode::Overwrite, &classification.trace().render())?;
            Ok(vec![classification])
        }
        None => classifier.classify_all(query, sink),
    }
}

fn print_result(classification: &Classification) {
    let winner = classification.winner();
    let label = classification.order().label();
    if classification.is_degenerate() {
        warn!("{} model: nothing to score", label);
        println!("    {:<8} undetermined (no n-gram to score)", label);
    } else {
        println!(
            "    {:<8} {} (log10 P = {:.4})",
            label, winner.language, winner.log_probability
        );
    }
}
