// Corpus status display — where papers come from and how many there are.

use anyhow::Result;
use std::path::Path;

use crate::config::{Config, ExtractorBackend};

/// Display corpus and extractor status to the terminal.
pub async fn show(config: &Config) -> Result<()> {
    match config.extractor_backend {
        ExtractorBackend::Generative => println!(
            "Topic extractor: {} at {} (TF-IDF fallback)",
            config.ollama_model, config.ollama_api_url
        ),
        ExtractorBackend::TfIdf => println!("Topic extractor: TF-IDF only"),
    }
    println!("Fetch limit: {} papers per year", config.fetch_limit);

    if let Some(url) = &config.weaviate_url {
        println!("Corpus: Weaviate at {url} (class {})", config.weaviate_class);
        return Ok(());
    }

    if !Path::new(&config.db_path).exists() {
        println!("Corpus: not initialized");
        println!("\nRun `trendline init` to set up the local store.");
        return Ok(());
    }

    show_local(&config.db_path).await
}

#[cfg(feature = "sqlite")]
async fn show_local(db_path: &str) -> Result<()> {
    use crate::corpus::sqlite::SqliteCorpus;
    use crate::corpus::Corpus;

    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Corpus: {} ({})", db_path, file_size);

    let corpus = SqliteCorpus::open(db_path)?;
    let total = corpus.paper_count().await?;
    let by_year = corpus.year_counts().await?;
    corpus.close().await?;

    if total == 0 {
        println!("Papers: none imported yet");
        println!("  Run `trendline import <papers.json>` to load some");
        return Ok(());
    }

    println!("Papers: {total} total");
    for (year, count) in by_year {
        println!("  {year}: {count}");
    }

    Ok(())
}

#[cfg(not(feature = "sqlite"))]
async fn show_local(db_path: &str) -> Result<()> {
    println!("Corpus: {db_path} (built without the 'sqlite' feature)");
    Ok(())
}

#[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
