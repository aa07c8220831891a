use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FCS file: {0}")]
    InvalidFcs(String),

    #[error("Unsupported FCS data type: {0}")]
    UnsupportedDataType(String),

    #[error("Channel {0} not found")]
    ChannelNotFound(String),

    #[error("Channel {channel} has {actual} events, expected {expected}")]
    ChannelLengthMismatch {
        channel: String,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<GateError>,
    },

    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("Filter intersection failed: {0}")]
    Intersection(String),

    #[error("Failed to export {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: Box<GateError>,
    },

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid gate config: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    #[cfg(feature = "xlsx")]
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Coarse failure class, used by the UI to decide what state survives an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Load,
    Classification,
    Intersection,
    Export,
}

impl GateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_)
            | Self::InvalidFcs(_)
            | Self::UnsupportedDataType(_)
            | Self::ChannelNotFound(_)
            | Self::ChannelLengthMismatch { .. }
            | Self::Load { .. }
            | Self::InvalidConfig(_) => ErrorKind::Load,
            Self::Classification(_) => ErrorKind::Classification,
            Self::Intersection(_) => ErrorKind::Intersection,
            Self::Export { .. } | Self::UnsupportedFormat(_) | Self::Json(_) => ErrorKind::Export,
            #[cfg(feature = "parquet")]
            Self::Parquet(_) | Self::Arrow(_) => ErrorKind::Export,
            #[cfg(feature = "xlsx")]
            Self::Xlsx(_) => ErrorKind::Export,
        }
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
