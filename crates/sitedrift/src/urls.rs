use crate::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read the URLs to compare from a header-less CSV.
///
/// Only the first column is used. Rows whose first field is missing or blank
/// are ignored, and every URL is trimmed.
pub fn parse_url_list<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut urls = Vec::new();
    for row in reader.records() {
        let row = row.wrap_err("Failed to read URL list")?;
        match row.get(0).map(str::trim) {
            Some(url) if !url.is_empty() => urls.push(url.to_string()),
            _ => continue,
        }
    }

    Ok(urls)
}

pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .wrap_err_with(|| format!("Failed to open URL list {}", path.display()))?;
    parse_url_list(file)
}
