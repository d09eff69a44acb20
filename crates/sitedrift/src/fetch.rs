use crate::prelude::{eprintln, *};
use colored::Colorize;
use indicatif::ProgressBar;
use std::time::Duration;

/// Wayback capture the live pages are compared against by default
pub const DEFAULT_ARCHIVE_PREFIX: &str = "https://wayback.archive-it.org/9618/20250701131117/";

#[derive(Debug, clap::Args, Clone)]
pub struct FetchArgs {
    /// Prefix prepended verbatim to a live URL to get its archived copy
    #[arg(
        long,
        env = "SITEDRIFT_ARCHIVE_PREFIX",
        default_value = DEFAULT_ARCHIVE_PREFIX
    )]
    pub archive_prefix: String,

    /// Request timeout in seconds
    #[arg(short, long, env = "SITEDRIFT_TIMEOUT", default_value = "10")]
    pub timeout: u64,
}

/// Live and archived markup of one URL; `None` when the fetch failed
#[derive(Debug, Clone)]
pub struct DocumentPair {
    pub live: Option<String>,
    pub archive: Option<String>,
}

impl DocumentPair {
    pub fn both(&self) -> Option<(&str, &str)> {
        Some((self.archive.as_deref()?, self.live.as_deref()?))
    }
}

pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(timeout: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .wrap_err("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// GET a page and return its body. Non-2xx responses are errors.
    pub async fn fetch_html(&self, url: &str) -> Result<String, Error> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        log::debug!("{url} responded with {status}");
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| Error::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Fetch a page, reporting any failure on the console instead of returning it
    pub async fn fetch_document(&self, url: &str, spinner: Option<&ProgressBar>) -> Option<String> {
        match self.fetch_html(url).await {
            Ok(html) => Some(html),
            Err(err) => {
                let report = || eprintln!("{} {}", "❌".red(), err);
                match spinner {
                    Some(s) => s.suspend(report),
                    None => report(),
                }
                None
            }
        }
    }

    /// Fetch the live page, then its archived copy
    pub async fn fetch_pair(
        &self,
        live_url: &str,
        archive_url: &str,
        spinner: Option<&ProgressBar>,
    ) -> DocumentPair {
        set_spinner_msg(spinner, format!("Fetching {live_url}"));
        let live = self.fetch_document(live_url, spinner).await;

        set_spinner_msg(spinner, format!("Fetching {archive_url}"));
        let archive = self.fetch_document(archive_url, spinner).await;

        DocumentPair { live, archive }
    }
}

/// Helper to set spinner message if spinner is present
fn set_spinner_msg(spinner: Option<&ProgressBar>, msg: impl Into<String>) {
    if let Some(s) = spinner {
        s.set_message(msg.into());
    }
}
