use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid file header (magic, version, or flags).
    #[error("invalid journal header: {0}")]
    InvalidHeader(String),
    /// Invalid frame structure (kind, reserved bytes, or length).
    #[error("invalid frame at offset {offset}: {reason}")]
    InvalidFrame {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Payload exceeds maximum size limit.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Maximum allowed size.
        max: u32,
    },
    /// Invalid UTF-8 in an event payload.
    #[error("invalid UTF-8 in event payload: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// Event payload is not a valid registry event.
    #[error("malformed event: {0}")]
    Json(#[from] serde_json::Error),
    /// File exists but is too short to hold a header.
    #[error("file is not empty but has no journal header")]
    FileNotEmpty,
    /// Truncated frame detected in strict mode.
    #[error("truncated frame at offset {offset}")]
    TruncatedFrame {
        /// Byte offset where truncation occurred.
        offset: u64,
    },
    /// Journal contains no events.
    #[error("journal is empty")]
    Empty,
    /// Journal already holds a registry.
    #[error("journal already initialized with {events} event(s)")]
    AlreadyInitialized {
        /// Number of events found.
        events: u64,
    },
    /// Another writer holds the journal's exclusive lock.
    #[error("journal is locked by another writer")]
    Locked,
    /// The file length changed since this writer's last append.
    #[error("journal length is {found} bytes, expected {expected}; file was modified by another writer")]
    Diverged {
        /// Length after this writer's last append.
        expected: u64,
        /// Length found on disk.
        found: u64,
    },
    /// Registry creation or replay failed.
    #[error("registry operation failed")]
    Registry(#[from] provenant_core::RegistryError),
}
