use std::path::PathBuf;

/// Errors that can occur while opening or using the device handle.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the device node.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No device node matches the requested vendor/product pair.
    #[error("no hidraw device found for {vendor:04x}:{product:04x}")]
    NotFound { vendor: u16, product: u16 },

    /// An I/O error occurred on the device handle.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// The underlying I/O error, if any.
    pub fn io_source(&self) -> Option<&std::io::Error> {
        match self {
            TransportError::Open { source, .. } => Some(source),
            TransportError::Io(err) => Some(err),
            TransportError::NotFound { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
