use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use trendline::analysis::emerging::detect_emerging;
use trendline::analysis::relationships::analyze_relationships;
use trendline::analysis::report::generate_report;
use trendline::analysis::YearRange;
use trendline::config::{Config, ExtractorBackend};
use trendline::corpus::{Corpus, CorpusSession};
use trendline::output::{save_json, terminal, DEFAULT_OUTPUT_FILE};
use trendline::topics::generative::GenerativeExtractor;
use trendline::topics::StagedExtractor;

/// Trendline: how research topics rise, fall and cluster across years.
///
/// Reads papers per publication year from a local store or Weaviate,
/// extracts topics with a generative model (TF-IDF when it's unavailable),
/// and writes JSON reports.
#[derive(Parser)]
#[command(name = "trendline", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the local paper store
    Init,

    /// Load papers from a JSON array into the local store
    Import {
        /// JSON file with objects like {"id", "title", "abstract", "summary", "year", "venue"}
        file: PathBuf,
    },

    /// Generate a full topic evolution report for a year range
    Report {
        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        end_year: i32,

        /// Comma-separated topics to track (default: extracted from the papers)
        #[arg(long, value_delimiter = ',')]
        topics: Vec<String>,

        #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,
    },

    /// Find topics growing in recent years compared to earlier ones
    Emerging {
        /// Comma-separated recent years (e.g. 2023,2024)
        #[arg(long, value_delimiter = ',', required = true)]
        recent_years: Vec<i32>,

        /// Comma-separated comparison years (e.g. 2020,2021)
        #[arg(long, value_delimiter = ',', required = true)]
        comparison_years: Vec<i32>,

        /// Minimum growth rate to report (default: 0.1)
        #[arg(long, default_value = "0.1")]
        threshold: f64,

        #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,
    },

    /// Analyze topic co-occurrence for one year
    Relationships {
        #[arg(long)]
        year: i32,

        /// Minimum number of shared papers for an edge (default: 2)
        #[arg(long, default_value = "2")]
        min_cooccurrence: usize,

        #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,
    },

    /// Show corpus status (location, paper counts per year)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trendline=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            config.require_local_store()?;
            init_store(&config).await?;
        }

        Commands::Import { file } => {
            config.require_local_store()?;
            import_papers(&config, &file).await?;
        }

        Commands::Report {
            start_year,
            end_year,
            topics,
            output,
        } => {
            let range = YearRange::new(start_year, end_year)?;
            let topics: Vec<String> = topics
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            if !topics.is_empty() {
                println!("Tracking topics: {}", topics.join(", "));
            }

            let (session, extractor) = open_session(&config)?;
            println!("Generating topic evolution report for {range}...");

            let key_topics = (!topics.is_empty()).then_some(topics.as_slice());
            let report = generate_report(&session, &extractor, range, key_topics).await;
            session.close().await?;

            save_json(&report, &output)?;
            terminal::display_report_summary(&report);
            print_saved(&output);
        }

        Commands::Emerging {
            recent_years,
            comparison_years,
            threshold,
            output,
        } => {
            let (session, extractor) = open_session(&config)?;
            println!("Analyzing emerging topics...");
            println!("  Recent years:     {recent_years:?}");
            println!("  Comparison years: {comparison_years:?}");
            println!("  Growth threshold: {threshold}");

            let result =
                detect_emerging(&session, &extractor, &recent_years, &comparison_years, threshold)
                    .await;
            session.close().await?;

            save_json(&result, &output)?;
            terminal::display_emerging(&result);
            print_saved(&output);
        }

        Commands::Relationships {
            year,
            min_cooccurrence,
            output,
        } => {
            let (session, extractor) = open_session(&config)?;
            println!("Analyzing topic relationships for {year}...");

            let result = analyze_relationships(&session, &extractor, year, min_cooccurrence).await;
            session.close().await?;

            save_json(&result, &output)?;
            terminal::display_relationships(&result);
            print_saved(&output);
        }

        Commands::Status => {
            trendline::status::show(&config).await?;
        }
    }

    Ok(())
}

fn print_saved(path: &std::path::Path) {
    println!(
        "\n{}",
        format!("Analysis complete. Results saved to: {}", path.display()).bold()
    );
}

/// Open the configured corpus and extractor for one analysis run.
fn open_session(config: &Config) -> Result<(CorpusSession, StagedExtractor)> {
    config.require_fetch_limit()?;
    let corpus = open_corpus(config)?;
    let session = CorpusSession::new(corpus, config.fetch_limit);
    let extractor = create_extractor(config)?;
    info!(corpus = %session.describe(), extractor = %extractor.describe(), "Analysis session ready");
    Ok((session, extractor))
}

/// Weaviate when WEAVIATE_URL is set, otherwise the local SQLite store.
fn open_corpus(config: &Config) -> Result<Box<dyn Corpus>> {
    if let Some(url) = &config.weaviate_url {
        info!("Using Weaviate corpus backend");
        let corpus = trendline::corpus::weaviate::WeaviateCorpus::new(
            url,
            &config.weaviate_api_key,
            &config.weaviate_class,
            config.corpus_timeout,
        )?;
        return Ok(Box::new(corpus));
    }

    #[cfg(feature = "sqlite")]
    {
        let corpus = trendline::corpus::sqlite::SqliteCorpus::open(&config.db_path)?;
        Ok(Box::new(corpus))
    }
    #[cfg(not(feature = "sqlite"))]
    anyhow::bail!(
        "WEAVIATE_URL is not set and the 'sqlite' feature is not compiled in.\n\
         Set WEAVIATE_URL or rebuild with: cargo build --features sqlite"
    );
}

/// Generative extractor with TF-IDF fallback, or TF-IDF alone.
fn create_extractor(config: &Config) -> Result<StagedExtractor> {
    match config.extractor_backend {
        ExtractorBackend::Generative => {
            let primary = GenerativeExtractor::new(
                &config.ollama_api_url,
                &config.ollama_model,
                config.llm_timeout,
            )?;
            Ok(StagedExtractor::new(Box::new(primary)))
        }
        ExtractorBackend::TfIdf => Ok(StagedExtractor::fallback_only()),
    }
}

#[cfg(feature = "sqlite")]
async fn init_store(config: &Config) -> Result<()> {
    info!("Initializing paper store...");
    let corpus = trendline::corpus::sqlite::SqliteCorpus::initialize(&config.db_path)?;
    let table_count = corpus.table_count().await?;
    corpus.close().await?;

    println!("Paper store initialized at: {}", config.db_path);
    println!("Tables created: {table_count}");
    println!("\nNext step: trendline import <papers.json>");
    Ok(())
}

#[cfg(feature = "sqlite")]
async fn import_papers(config: &Config, file: &std::path::Path) -> Result<()> {
    use anyhow::Context;
    use indicatif::{ProgressBar, ProgressStyle};
    use trendline::corpus::PaperRecord;

    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let papers: Vec<PaperRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of papers", file.display()))?;

    let corpus = trendline::corpus::sqlite::SqliteCorpus::open(&config.db_path)?;
    println!("Importing {} papers into {}...", papers.len(), corpus.path());

    let pb = ProgressBar::new(papers.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("  Import [{bar:30}] {pos}/{len} ({eta})")?);

    for paper in &papers {
        corpus.upsert_paper(paper).await?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let total = corpus.paper_count().await?;
    corpus.close().await?;

    println!("{}", format!("Imported {} papers.", papers.len()).bold());
    println!("  Papers in store: {total}");
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
async fn init_store(_config: &Config) -> Result<()> {
    anyhow::bail!("The local paper store needs the 'sqlite' feature.\nRebuild with: cargo build --features sqlite")
}

#[cfg(not(feature = "sqlite"))]
async fn import_papers(_config: &Config, _file: &std::path::Path) -> Result<()> {
    anyhow::bail!("The local paper store needs the 'sqlite' feature.\nRebuild with: cargo build --features sqlite")
}
