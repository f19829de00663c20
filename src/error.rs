use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Engine-level faults. Locator misses and empty containers never show up
/// here; they are absorbed as empty fields or dropped records.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The page could not produce a snapshot or refused an interaction.
    #[error("page error: {0}")]
    Page(String),
    /// An outbound notification could not be delivered.
    #[error("event channel closed: {0}")]
    Channel(String),
    #[error("invalid profile: {0}")]
    Profile(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Other(String),
}

impl ScrapeError {
    pub fn page(msg: impl Into<String>) -> Self {
        ScrapeError::Page(msg.into())
    }

    pub fn profile(msg: impl Into<String>) -> Self {
        ScrapeError::Profile(msg.into())
    }
}

/* Conversions so `?` works smoothly */
impl<W> From<csv::IntoInnerError<W>> for ScrapeError {
    fn from(e: csv::IntoInnerError<W>) -> Self {
        ScrapeError::Io(std::io::Error::new(e.error().kind(), e.error().to_string()))
    }
}
impl From<std::string::FromUtf8Error> for ScrapeError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        ScrapeError::Other(e.to_string())
    }
}
