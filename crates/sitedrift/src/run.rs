use crate::prelude::{println, *};
use colored::Colorize;
use sitedrift_core::diff::compare_documents;
use sitedrift_core::record::{archive_url, ComparisonRecord};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::fetch::{FetchArgs, Fetcher};
use crate::store::OutputStore;
use crate::summary::{print_summary, summary_data, DEFAULT_OUTPUT};
use crate::urls::read_url_list;

#[derive(Debug, clap::Args, Clone)]
pub struct RunOptions {
    /// Header-less CSV whose first column lists the live URLs to compare
    #[arg(short, long, env = "SITEDRIFT_INPUT", default_value = "urls.csv")]
    pub input: PathBuf,

    /// CSV file results are appended to (created with a header if missing)
    #[arg(short, long, env = "SITEDRIFT_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Don't print the change summary when the run finishes
    #[arg(long)]
    pub no_summary: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunTally {
    pub compared: usize,
    pub skipped: usize,
}

pub async fn run(options: RunOptions, global: crate::Global) -> Result<()> {
    let urls = read_url_list(&options.input)?;

    if global.verbose {
        println!("Archive prefix: {}", options.fetch.archive_prefix);
        println!(
            "Comparing {} URL(s) from {}, appending to {}",
            urls.len(),
            options.input.display(),
            options.output.display()
        );
        println!();
    }

    let fetcher = Fetcher::new(options.fetch.timeout)?;
    let mut store = OutputStore::open(&options.output)?;
    let tally = compare_all(&fetcher, &urls, &options.fetch.archive_prefix, &mut store).await?;

    log::info!("{} compared, {} skipped", tally.compared, tally.skipped);

    if !options.no_summary {
        let histogram = summary_data(&options.output)?;
        print_summary(&histogram);
    }

    Ok(())
}

/// Compare every URL in order, appending one record per successful pair.
///
/// Pairs where either page couldn't be fetched are skipped and write nothing.
pub async fn compare_all(
    fetcher: &Fetcher,
    urls: &[String],
    archive_prefix: &str,
    store: &mut OutputStore,
) -> Result<RunTally> {
    let mut tally = RunTally::default();

    for live_url in urls {
        let archive = archive_url(archive_prefix, live_url);
        println!("🔍 Comparing: {}", live_url);

        match compare_one(fetcher, live_url, &archive).await {
            Some(record) => {
                store.append(&record)?;
                tally.compared += 1;
                println!("{} Done: {}", "✅".green(), live_url);
            }
            None => {
                tally.skipped += 1;
                println!("{} Skipped: {}", "⚠️".yellow(), live_url);
            }
        }
    }

    Ok(tally)
}

/// Fetch and compare one URL. `None` means the pair was skipped.
async fn compare_one(fetcher: &Fetcher, live_url: &str, archive: &str) -> Option<ComparisonRecord> {
    let spinner = std::io::stderr().is_terminal().then(new_spinner);
    let pair = fetcher.fetch_pair(live_url, archive, spinner.as_ref()).await;
    if let Some(s) = spinner.as_ref() {
        s.finish_and_clear();
    }

    let stats = compare_documents(pair.archive.as_deref(), pair.live.as_deref())?;
    log::debug!(
        "{live_url}: {} change(s) (+{} -{} ~{}) over {} distinct blocks",
        stats.total_changes(),
        stats.additions,
        stats.deletions,
        stats.inline_changes,
        stats.union_size
    );

    Some(ComparisonRecord::new(live_url, &stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::serve;

    /// Nothing listens on the discard port, so every fetch is refused
    const CLOSED: &str = "http://127.0.0.1:9/";

    const HEADER: &str = "URL,Percentage of Content Changed,Additions,Deletions,Inline Changes";

    #[tokio::test]
    async fn test_compare_all_skips_unavailable_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let fetcher = Fetcher::new(1).unwrap();
        let mut store = OutputStore::open(&path).unwrap();
        let urls = vec![format!("{CLOSED}a"), format!("{CLOSED}b")];

        let tally = compare_all(&fetcher, &urls, CLOSED, &mut store).await.unwrap();
        drop(store);

        assert_eq!(
            tally,
            RunTally {
                compared: 0,
                skipped: 2
            }
        );
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().collect::<Vec<_>>(), vec![HEADER]);
    }

    #[tokio::test]
    async fn test_run_writes_only_header_when_every_fetch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("urls.csv");
        let output = dir.path().join("results.csv");
        std::fs::write(&input, format!("{CLOSED}a\n\n{CLOSED}b\n")).unwrap();

        let options = RunOptions {
            input,
            output: output.clone(),
            fetch: FetchArgs {
                archive_prefix: CLOSED.to_string(),
                timeout: 1,
            },
            no_summary: false,
        };
        run(options, crate::Global { verbose: false }).await.unwrap();

        let contents = std::fs::read_to_string(&output).unwrap();
        assert_eq!(contents.lines().collect::<Vec<_>>(), vec![HEADER]);
    }

    #[tokio::test]
    async fn test_compare_all_continues_after_a_skip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let fetcher = Fetcher::new(5).unwrap();
        let mut store = OutputStore::open(&path).unwrap();

        // An empty prefix makes the archive URL the live URL itself
        let up = serve("200 OK", "<h1>Same</h1>").await;
        let down = serve("404 Not Found", "").await;
        let urls = vec![format!("{down}a"), format!("{up}b")];

        let tally = compare_all(&fetcher, &urls, "", &mut store).await.unwrap();
        drop(store);

        assert_eq!(
            tally,
            RunTally {
                compared: 1,
                skipped: 1
            }
        );
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.lines().collect::<Vec<_>>(),
            vec![HEADER.to_string(), format!("{up}b,0.0%,0,0,0")]
        );
    }
}
