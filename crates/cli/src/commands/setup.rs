use anyhow::{bail, Context, Result};
use reportlens_core::Config;
use reportlens_index::VectorIndex;
use reportlens_ingest::embedding::create_embedder;
use reportlens_ingest::{chunk_documents, count_pdfs, ChunkConfig, ChunkStats, DocumentLoader};
use tracing::info;

use super::index_config;
use crate::terminal::Terminal;

/// Searches run against a fresh index to confirm it answers.
pub const VERIFICATION_QUERIES: &[&str] = &[
    "BMW revenue 2023",
    "Tesla profit 2023",
    "Ford financial performance 2022",
];

pub async fn run(config: &Config, terminal: &Terminal, assume_yes: bool) -> Result<()> {
    terminal.print_heading("REPORTLENS - SETUP")?;

    terminal.print_info("\nStep 1: Verifying environment...")?;
    if let Err(e) = config.validate_credentials() {
        terminal.print_error(&e.to_string())?;
        terminal.print_warn("Please set your OPENAI_API_KEY in the .env file")?;
        bail!("environment not configured");
    }
    terminal.print_success("Environment variables verified")?;

    terminal.print_info("\nStep 2: Verifying data directory...")?;
    verify_data_directory(config, terminal)?;

    terminal.print_info("\nStep 3: Processing documents with table extraction...")?;
    let chunk_config =
        ChunkConfig::try_from(&config.chunking).context("Invalid CHUNK_SIZE / CHUNK_OVERLAP")?;
    let loader = DocumentLoader::new(&config.data.raw_dir, config.data.companies.clone());
    let documents = loader.load_all().context("Failed to load documents")?;
    let chunks = chunk_documents(&documents, &chunk_config);
    print_stats(terminal, &ChunkStats::from_chunks(&chunks))?;

    terminal.print_info("\nStep 4: Creating vector index...")?;
    let embedder = create_embedder(config).context("Failed to create embedder")?;
    let mut index = VectorIndex::new(index_config(config), embedder);

    if index.exists() {
        if !assume_yes && !terminal.confirm("Vector index already exists. Recreate?")? {
            terminal.print_info("Keeping existing vector index.")?;
            terminal.print_heading("SETUP COMPLETE")?;
            return Ok(());
        }
        index.delete().context("Failed to delete existing index")?;
    }

    let spinner = terminal.start_spinner(&format!("Embedding {} chunks...", chunks.len()))?;
    let created = index.create(chunks).await;
    spinner.stop();
    created.context("Failed to create vector index")?;
    terminal.print_success(&format!(
        "Index written to {} ({} entries)",
        index.persist_dir().display(),
        index.len()
    ))?;

    terminal.print_info("\nStep 5: Verifying vector index...")?;
    verify_index(&index, terminal).await?;

    terminal.print_heading("SETUP COMPLETE")?;
    terminal.print_success("\nYour index is ready!")?;
    terminal.print_info("\nTo start asking questions:\n\n  reportlens chat")?;
    terminal.print_info("\nTo run the sample questions:\n\n  reportlens test-queries --mode test\n")?;
    terminal.print_rule()
}

fn verify_data_directory(config: &Config, terminal: &Terminal) -> Result<()> {
    let root = &config.data.raw_dir;
    if !root.is_dir() {
        terminal.print_error(&format!("Data directory not found: {}", root.display()))?;
        bail!("data directory missing");
    }

    let counts = count_pdfs(root, &config.data.companies)?;
    for (company, count) in counts.iter().filter(|(_, n)| **n > 0) {
        terminal.print_success(&format!(" Found {count} PDF(s) for {company}"))?;
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        terminal.print_error("No PDF files found!")?;
        terminal.print_warn(&format!(
            "Place the reports under {}/<Company>/*.pdf",
            root.display()
        ))?;
        bail!("no PDF files under {}", root.display());
    }
    info!(total, "PDFs found");
    terminal.print_info(&format!("\n Total PDFs found: {total}"))
}

fn print_stats(terminal: &Terminal, stats: &ChunkStats) -> Result<()> {
    terminal.print_heading("DOCUMENT STATISTICS")?;
    for line in stats_lines(stats) {
        terminal.print_line(&line)?;
    }
    Ok(())
}

fn stats_lines(stats: &ChunkStats) -> Vec<String> {
    let mut lines = vec![format!("Total chunks: {}", stats.total), "\nBy Company:".to_string()];
    lines.extend(
        stats
            .by_company
            .iter()
            .map(|(company, count)| format!("  {company}: {count} chunks")),
    );
    lines.push("\nBy Year:".to_string());
    lines.extend(
        stats
            .years_sorted()
            .into_iter()
            .map(|(year, count)| format!("  {year}: {count} chunks")),
    );
    lines
}

/// Failures here are reported as warnings; the index is already built.
async fn verify_index(index: &VectorIndex, terminal: &Terminal) -> Result<()> {
    terminal.print_info("Running test queries...")?;
    for query in VERIFICATION_QUERIES {
        match index.search(query, 1, None).await {
            Ok(hits) if !hits.is_empty() => {
                terminal.print_success(&format!("   '{query}' - Found results"))?
            }
            Ok(_) => terminal.print_warn(&format!("   '{query}' - No results"))?,
            Err(e) => terminal.print_warn(&format!(" Warning: Error during verification: {e}"))?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_stats_lines() {
        let stats = ChunkStats {
            total: 5,
            by_company: IndexMap::from([("Tesla".to_string(), 3), ("BMW".to_string(), 2)]),
            by_year: IndexMap::from([("2023".to_string(), 4), ("2021".to_string(), 1)]),
        };
        assert_eq!(
            stats_lines(&stats),
            vec![
                "Total chunks: 5",
                "\nBy Company:",
                "  Tesla: 3 chunks",
                "  BMW: 2 chunks",
                "\nBy Year:",
                "  2021: 1 chunks",
                "  2023: 4 chunks",
            ]
        );
    }
}
