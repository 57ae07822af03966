use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid HAR file: {0}")]
    InvalidFormat(String),

    #[error("Failed to parse HAR file: {0}")]
    Parsing(String),

    #[error("Memory usage ({used_mb:.1}MB) exceeds limit ({limit_mb}MB)")]
    ResourceExceeded { used_mb: f64, limit_mb: u64 },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Failed to process CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(#[source] Box<Error>),
}

impl Error {
    /// Wrap an error at the orchestration boundary, keeping the cause.
    pub fn analysis_failed(cause: Error) -> Self {
        match cause {
            already @ Error::AnalysisFailed(_) => already,
            other => Error::AnalysisFailed(Box::new(other)),
        }
    }

    /// The innermost error, skipping any `AnalysisFailed` wrapper.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::AnalysisFailed(inner) => inner.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
