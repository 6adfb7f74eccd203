/// Errors that can occur while exchanging frames with the reader.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The response status byte is not the success sentinel.
    #[error("bad response status (expected 0x02, found {found:#04x})")]
    BadStatus { found: u8 },

    /// The response does not end with the end-of-frame sentinel.
    #[error("bad end of frame (expected 0x55, found {found:#04x})")]
    BadEndOfFrame { found: u8 },

    /// The response is shorter than the configured report size.
    #[error("truncated response ({len} bytes, expected {expected})")]
    Truncated { len: usize, expected: usize },

    /// The command tag is not one the protocol defines.
    #[error("unknown command tag {0:#04x}")]
    UnknownCommand(u8),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device went away before a complete frame was exchanged.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
