//! Batch processing command for multiple fax files.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use alarmfax_core::models::config::InputConfig;
use alarmfax_core::{ExtractionResult, ParserRegistry};

use super::config::load_config;
use super::parse::{OutputFormat, decode_fax, fax_lines, format_result, select_parser};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Parser alias (default: from config)
    #[arg(short, long)]
    parser: Option<String>,

    /// Generic layout definition (JSON); selects the generic parser
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let format = OutputFormat::resolve(args.format, &config.output.format)?;

    let (registry, alias) =
        select_parser(args.parser.as_deref(), args.layout.as_deref(), &config)?;
    // Fail before spawning anything
    registry.get(&alias)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let registry = Arc::new(registry);
    let alias: Arc<str> = Arc::from(alias);
    let input = Arc::new(config.input.clone());
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.iter().cloned().enumerate() {
        let registry = Arc::clone(&registry);
        let alias = Arc::clone(&alias);
        let input = Arc::clone(&input);
        let semaphore = Arc::clone(&semaphore);
        let pb = pb.clone();

        tasks.spawn(async move {
            let file_start = Instant::now();
            let outcome = match semaphore.acquire().await {
                Ok(_permit) => process_single_file(&path, &registry, &alias, &input).await,
                Err(e) => Err(anyhow::anyhow!("Worker pool closed: {}", e)),
            };
            pb.inc(1);

            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            let result = match outcome {
                Ok(result) => ProcessResult {
                    path,
                    result: Some(result),
                    error: None,
                    processing_time_ms,
                },
                Err(e) => ProcessResult {
                    path,
                    result: None,
                    error: Some(e.to_string()),
                    processing_time_ms,
                },
            };
            (index, result)
        });
    }

    let mut slots: Vec<Option<ProcessResult>> = files.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        if let Some(message) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                error!("Failed to process {}: {}", result.path.display(), message);
                tasks.abort_all();
                pb.abandon();
                anyhow::bail!("Processing failed: {}", message);
            }
        }
        slots[index] = Some(result);
    }

    pb.finish_with_message("Complete");

    let results: Vec<ProcessResult> = slots.into_iter().flatten().collect();

    // Write outputs
    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        let paths: Vec<&Path> = results.iter().map(|r| r.path.as_path()).collect();
        for (processed, output_name) in results.iter().zip(output_names(&paths)) {
            let Some(result) = &processed.result else {
                continue;
            };

            let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));
            let content =
                format_result(result, format, &config.output, config.output.include_warnings)?;

            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Output file stems for `paths`, unique within one batch. A stem shared by
/// several inputs is prefixed with the parent directory name; a name that is
/// still taken gets a counter.
fn output_names(paths: &[&Path]) -> Vec<String> {
    let stem = |path: &Path| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("fax")
            .to_string()
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    for path in paths {
        *counts.entry(stem(path)).or_default() += 1;
    }

    let mut taken = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let base = stem(path);
            let parent = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|s| s.to_str());
            let name = match parent {
                Some(parent) if counts.get(&base).is_some_and(|&n| n > 1) => {
                    format!("{}_{}", parent, base)
                }
                _ => base,
            };

            let mut candidate = name.clone();
            let mut counter = 2;
            while !taken.insert(candidate.clone()) {
                candidate = format!("{}_{}", name, counter);
                counter += 1;
            }
            candidate
        })
        .collect()
}

async fn process_single_file(
    path: &Path,
    registry: &ParserRegistry,
    alias: &str,
    input: &InputConfig,
) -> anyhow::Result<ExtractionResult> {
    let bytes = tokio::fs::read(path).await?;
    let text = decode_fax(&bytes, input)?;
    let lines = fax_lines(&text);

    if lines.iter().all(|line| line.trim().is_empty()) {
        anyhow::bail!("File contains no text");
    }

    let parser = registry.get(alias)?;
    Ok(parser.parse(&lines))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "operation_number",
        "timestamp",
        "keywords",
        "location",
        "resources",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(extraction) = &result.result {
            let operation = &extraction.operation;
            wtr.write_record([
                filename,
                "success",
                &operation.operation_number,
                &operation.timestamp.format("%d.%m.%Y %H:%M:%S").to_string(),
                &operation.keywords.to_string(),
                &operation.einsatzort.to_string(),
                &operation.resources.len().to_string(),
                &extraction.warnings.len().to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names_keep_unique_stems() {
        let paths = [Path::new("inbox/a.txt"), Path::new("inbox/b.txt")];
        assert_eq!(output_names(&paths), vec!["a", "b"]);
    }

    #[test]
    fn test_output_names_for_shared_stems() {
        let paths = [
            Path::new("nord/fax1.txt"),
            Path::new("sued/fax1.txt"),
            Path::new("sued/fax1.pdf.txt"),
            Path::new("sued/fax1.tif"),
        ];
        assert_eq!(
            output_names(&paths),
            vec!["nord_fax1", "sued_fax1", "fax1.pdf", "sued_fax1_2"]
        );
    }
}
