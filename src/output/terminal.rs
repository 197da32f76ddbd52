// Colored terminal summaries for reports, emerging topics and relationships.
//
// Everything here prints; the JSON written by `save_json` is the full result.

use colored::Colorize;

use super::truncate_chars;
use crate::analysis::emerging::{EmergingTopic, EmergingTopics};
use crate::analysis::relationships::TopicRelationships;
use crate::analysis::report::TrendReport;
use crate::analysis::{NoData, Outcome};

/// Topic column width; longer topics are truncated.
const TOPIC_WIDTH: usize = 40;

/// Print the short summary of a trend report.
pub fn display_report_summary(outcome: &Outcome<TrendReport>) {
    let report = match outcome {
        Outcome::Found(report) => report,
        Outcome::NoData(no_data) => return display_no_data(no_data),
    };

    println!("\n{}", "=== Topic Evolution Report ===".bold());
    println!("  Year range:   {}", report.year_range);
    println!("  Total papers: {}", report.total_papers);
    for (year, count) in &report.papers_per_year {
        println!("    {year}: {count}");
    }

    let preview: Vec<&str> = report.key_topics.iter().take(5).map(String::as_str).collect();
    if preview.is_empty() {
        println!("  Key topics:   {}", "none extracted".dimmed());
    } else {
        println!("  Key topics:   {}...", preview.join(", "));
    }

    let emerging = &report.emerging_topics.emerging_topics;
    if !emerging.is_empty() {
        println!("\n  {}", "Top emerging topics:".bold());
        for (i, (topic, data)) in emerging.iter().take(5).enumerate() {
            println!(
                "    {}. {} (growth: {:.2}%)",
                i + 1,
                truncate_chars(topic, TOPIC_WIDTH),
                data.growth_rate * 100.0
            );
        }
    }

    if let Outcome::NoData(no_data) = &report.topic_relationships {
        println!("\n  Relationships: {}", no_data.error.yellow());
    }
}

/// Print the emerging topics, top 10 by growth.
pub fn display_emerging(result: &EmergingTopics) {
    println!(
        "\n{}",
        format!(
            "=== Emerging Topics ({} recent papers vs {} comparison papers) ===",
            result.total_recent_papers, result.total_comparison_papers
        )
        .bold()
    );

    if result.emerging_topics.is_empty() {
        println!("  No topics reached the growth threshold.");
        return;
    }

    println!("  Found {} emerging topics:", result.emerging_topics.len());
    for (i, (topic, data)) in result.emerging_topics.iter().take(10).enumerate() {
        println!(
            "  {:>3}. {:<width$} {:>9.1}%  {}",
            i + 1,
            truncate_chars(topic, TOPIC_WIDTH),
            data.growth_rate * 100.0,
            status_label(data),
            width = TOPIC_WIDTH + 3,
        );
    }
}

/// Print the best-connected topics, top 10 by centrality.
pub fn display_relationships(outcome: &Outcome<TopicRelationships>) {
    let relationships = match outcome {
        Outcome::Found(relationships) => relationships,
        Outcome::NoData(no_data) => return display_no_data(no_data),
    };

    println!(
        "\n{}",
        format!(
            "=== Topic Relationships {} ({} papers) ===",
            relationships.year, relationships.total_papers
        )
        .bold()
    );

    let ranked = relationships.ranked_by_centrality();
    if ranked.is_empty() {
        println!("  No candidate topics extracted.");
        return;
    }

    println!("  Top connected topics:");
    for (i, (topic, connections)) in ranked.into_iter().take(10).enumerate() {
        let papers = relationships.topic_frequencies.get(topic).copied().unwrap_or(0);
        println!(
            "  {:>3}. {:<width$} {} connections, {} papers",
            i + 1,
            truncate_chars(topic, TOPIC_WIDTH),
            connections,
            papers.to_string().dimmed(),
            width = TOPIC_WIDTH + 3,
        );
    }
}

fn display_no_data(no_data: &NoData) {
    println!("\n{} {}", "No data:".yellow().bold(), no_data.error);
}

fn status_label(topic: &EmergingTopic) -> colored::ColoredString {
    if topic.is_new {
        "NEW".green().bold()
    } else {
        "GROWING".cyan()
    }
}
