#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to fetch {url}: {reason}")]
    Request { url: String, reason: String },

    #[error("{path} has no '{column}' column")]
    MissingColumn { path: String, column: String },
}
