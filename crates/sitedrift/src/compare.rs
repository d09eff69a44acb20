use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use prettytable::row;
use sitedrift_core::blocks::Block;
use sitedrift_core::diff::Comparison;
use sitedrift_core::matcher::{OpTag, Opcode};
use sitedrift_core::record::{archive_url, ComparisonRecord};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::fetch::{FetchArgs, Fetcher};

/// Longest block text shown in the opcode table
const PREVIEW_LEN: usize = 60;

#[derive(Debug, clap::Args, Clone)]
pub struct CompareOptions {
    /// Live URL to compare against its archived copy
    #[arg(required_unless_present = "reference", conflicts_with = "reference")]
    pub url: Option<String>,

    /// Read the archived document from a local HTML file instead of fetching it
    #[arg(long, requires = "candidate")]
    pub reference: Option<PathBuf>,

    /// Read the live document from a local HTML file instead of fetching it
    #[arg(long, requires = "reference")]
    pub candidate: Option<PathBuf>,

    #[command(flatten)]
    pub fetch: FetchArgs,

    /// List every opcode of the block alignment
    #[arg(long)]
    pub opcodes: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, serde::Serialize)]
struct CompareOutput<'a> {
    record: ComparisonRecord,
    archive_url: Option<&'a str>,
    archive_blocks: usize,
    live_blocks: usize,
    union_size: usize,
    percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    opcodes: Option<&'a [Opcode]>,
}

pub async fn run(options: CompareOptions, global: crate::Global) -> Result<()> {
    let (label, archive_location, comparison) = match (&options.reference, &options.candidate) {
        (Some(reference), Some(candidate)) => {
            let archive = read_document(reference)?;
            let live = read_document(candidate)?;
            (
                candidate.display().to_string(),
                None,
                Comparison::from_documents(&archive, &live),
            )
        }
        _ => {
            let url = options
                .url
                .clone()
                .ok_or_else(|| eyre!("A URL or --reference/--candidate files are required"))?;
            let archive = archive_url(&options.fetch.archive_prefix, &url);
            if global.verbose {
                println!("Archive URL: {}", archive);
            }
            let comparison = compare_url(&options.fetch, &url, &archive).await?;
            (url, Some(archive), comparison)
        }
    };

    let record = ComparisonRecord::new(label, &comparison.stats);

    if options.json {
        let output = CompareOutput {
            record,
            archive_url: archive_location.as_deref(),
            archive_blocks: comparison.reference.len(),
            live_blocks: comparison.candidate.len(),
            union_size: comparison.stats.union_size,
            percentage: comparison.stats.percentage,
            opcodes: options.opcodes.then_some(comparison.opcodes.as_slice()),
        };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| eyre!("Failed to serialize output: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    output_formatted(&record, &comparison);
    if options.opcodes {
        output_opcodes(&comparison);
    }

    Ok(())
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {}", path.display()))
}

async fn compare_url(args: &FetchArgs, url: &str, archive: &str) -> Result<Comparison> {
    let fetcher = Fetcher::new(args.timeout)?;

    let spinner = std::io::stderr().is_terminal().then(new_spinner);
    let pair = fetcher.fetch_pair(url, archive, spinner.as_ref()).await;
    if let Some(s) = spinner.as_ref() {
        s.finish_and_clear();
    }

    let (archive_html, live_html) = pair
        .both()
        .ok_or_else(|| eyre!("Skipped {}: could not fetch both documents", url))?;

    Ok(Comparison::from_documents(archive_html, live_html))
}

fn output_formatted(record: &ComparisonRecord, comparison: &Comparison) {
    let stats = &comparison.stats;

    eprintln!("\n{}", "=".repeat(80).bright_cyan());
    eprintln!("{}", "CONTENT DRIFT".bright_cyan().bold());
    eprintln!("{}", "=".repeat(80).bright_cyan());

    println!("\n{}: {}", "URL".green(), record.url.cyan().underline());
    println!(
        "{}: {} archived, {} live, {} distinct",
        "Blocks".green(),
        comparison.reference.len(),
        comparison.candidate.len(),
        stats.union_size
    );
    println!(
        "{}: {}",
        "Additions".green(),
        record.additions.to_string().bright_yellow()
    );
    println!(
        "{}: {}",
        "Deletions".green(),
        record.deletions.to_string().bright_yellow()
    );
    println!(
        "{}: {}",
        "Inline Changes".green(),
        record.inline_changes.to_string().bright_yellow()
    );
    println!(
        "{}: {}",
        "Content Changed".green(),
        record.percentage.bright_white().bold()
    );
}

fn output_opcodes(comparison: &Comparison) {
    let mut table = new_table();
    table.set_titles(row!["OP", "ARCHIVE", "LIVE", "ARCHIVED BLOCK", "LIVE BLOCK"]);

    for op in &comparison.opcodes {
        let (archived, live) = comparison.spans(op);
        let tag = match op.tag {
            OpTag::Equal => op.tag.to_string().normal(),
            OpTag::Insert => op.tag.to_string().green(),
            OpTag::Delete => op.tag.to_string().red(),
            OpTag::Replace => op.tag.to_string().yellow(),
        };
        table.add_row(row![
            tag,
            format!("{}..{}", op.i1, op.i2),
            format!("{}..{}", op.j1, op.j2),
            preview(archived),
            preview(live),
        ]);
    }

    println!();
    table.printstd();
}

/// First block of a span, shortened, with a count of the rest
fn preview(blocks: &[Block]) -> String {
    let Some(first) = blocks.first() else {
        return String::new();
    };

    let text = first.to_string();
    let mut shown: String = text.chars().take(PREVIEW_LEN).collect();
    if text.chars().count() > PREVIEW_LEN {
        shown.push_str("...");
    }
    if blocks.len() > 1 {
        shown.push_str(&format!(" (+{})", blocks.len() - 1));
    }
    shown
}
