use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Catalog, NullableColumn};
use pipeline::{CategoryField, TrainingSet};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Number;
use server::{PredictionRequest, PredictionService, TrainingConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Genres cycled through by the benchmark
const BENCH_GENRES: [&str; 8] = [
    "Action",
    "Comedy",
    "Dramas",
    "Horror",
    "Documentary",
    "Kids",
    "Romance, Comedy",
    "International TV Shows",
];

/// catalog-rating - audience rating predictor for a streaming catalog
#[derive(Parser)]
#[command(name = "catalog-rating")]
#[command(about = "Predict audience rating buckets from genre and duration", long_about = None)]
struct Cli {
    /// Path to the catalog CSV
    #[arg(short, long, global = true, default_value = "netflix_titles.csv")]
    data_path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model and predict one title
    Predict {
        /// Comma-separated genres; the first is the primary genre
        #[arg(long, default_value = "")]
        genre: String,

        /// Duration in minutes (movies) or seasons (shows)
        #[arg(long, value_parser = parse_duration)]
        duration: Number,

        /// Seed for sampling the unobserved fields
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show dataset and training-set statistics
    Summary,

    /// Run benchmark to test prediction latency
    Benchmark {
        /// Number of predictions to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            genre,
            duration,
            seed,
        } => handle_predict(&cli.data_path, genre, duration, seed).await?,
        Commands::Summary => handle_summary(&cli.data_path)?,
        Commands::Benchmark { requests } => handle_benchmark(&cli.data_path, requests).await?,
    }

    Ok(())
}

/// Parse a duration the way it would arrive in a JSON body
fn parse_duration(raw: &str) -> Result<Number, String> {
    serde_json::from_str(raw.trim()).map_err(|_| format!("'{raw}' is not a number"))
}

/// Train the model on a blocking thread
async fn train(data_path: &Path) -> Result<PredictionService> {
    info!("Training model on {}", data_path.display());
    let start = Instant::now();
    let path = data_path.to_path_buf();
    let service = tokio::task::spawn_blocking(move || {
        PredictionService::from_csv(&path, &TrainingConfig::default())
    })
    .await
    .context("Training task failed")?
    .with_context(|| format!("Failed to train on {}", data_path.display()))?;

    info!("Trained model in {:?}", start.elapsed());
    println!("{} Model ready", "✓".green());
    Ok(service)
}

/// Handle the 'predict' command
async fn handle_predict(
    data_path: &Path,
    genre: String,
    duration: Number,
    seed: Option<u64>,
) -> Result<()> {
    let service = train(data_path).await?;
    let request = PredictionRequest::new(genre, duration);

    let prediction = match seed {
        Some(seed) => service.predict(&request, &mut StdRng::seed_from_u64(seed)),
        None => service.predict(&request, &mut rand::rng()),
    }?;

    println!("{}", "Prediction:".bold().blue());
    println!("  {}", prediction.prediction.green());
    println!("  {}", prediction.details);
    Ok(())
}

/// Handle the 'summary' command
fn handle_summary(data_path: &Path) -> Result<()> {
    let catalog = Catalog::load_from_file(data_path)
        .with_context(|| format!("Failed to load {}", data_path.display()))?;
    let config = TrainingConfig::default();
    let training = TrainingSet::build(&catalog, &config.features)?;

    println!("{}", format!("Catalog: {}", data_path.display()).bold().blue());
    println!("{}Titles: {}", "• ".green(), catalog.len());

    println!("{}", "Imputed cells:".bold());
    for column in NullableColumn::ALL {
        match catalog.imputation(column) {
            Some(stats) if stats.filled > 0 => println!(
                "  - {}: {} filled with {:?}",
                column.name(),
                stats.filled,
                stats.fill_value
            ),
            _ => println!("  - {}: none", column.name()),
        }
    }

    println!("{}", "Rating buckets:".bold());
    for (bucket, count) in training.source_counts() {
        println!("  - {}: {}", bucket.label(), count);
    }

    println!("{}Balanced rows: {}", "• ".cyan(), training.len());
    println!("{}Training columns: {}", "• ".cyan(), training.columns().len());
    println!(
        "{}Mean director activity: {:.2}",
        "• ".cyan(),
        training.mean_director_activity()
    );

    println!("{}", "Top countries:".bold());
    for country in training.top_values(CategoryField::Country, config.predictor.sample_pool) {
        println!("  - {}", country);
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(data_path: &Path, requests: usize) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }
    let service = Arc::new(train(data_path).await?);

    // Use tokio::spawn to make concurrent requests
    let mut handles = Vec::with_capacity(requests);
    for i in 0..requests {
        let service = service.clone();
        let request = PredictionRequest::new(
            BENCH_GENRES[i % BENCH_GENRES.len()],
            Number::from(i % 180 + 1),
        );
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            service.predict(&request, &mut rand::rng())?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    info!("Spawned {} prediction tasks", requests);
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / timings.len() as u32;
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {}", requests);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} predictions/second",
        requests as f64 / total_time.as_secs_f64()
    );

    Ok(())
}
