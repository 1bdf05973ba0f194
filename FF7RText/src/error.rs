//! Error types for `FF7RText`

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Broad classification of an [`Error`].
///
/// Every variant of [`Error`] belongs to exactly one kind. The batch driver
/// uses this to report failures; the codec itself never recovers from any of
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File access or stream bounds.
    Io,
    /// Unrecognized signature or malformed structure.
    Format,
    /// A count field exceeded its documented maximum.
    Bounds,
    /// Data that decodes but contradicts the rest of the asset.
    Consistency,
    /// A merged subtitle does not fit the subtitle box.
    ReflowOverflow,
    /// CSV, JSON or config input that cannot be applied.
    Interchange,
    /// The operation is not available for this asset.
    Unsupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Io => "I/O error",
            Self::Format => "format error",
            Self::Bounds => "bounds violation",
            Self::Consistency => "consistency error",
            Self::ReflowOverflow => "reflow overflow",
            Self::Interchange => "interchange error",
            Self::Unsupported => "unsupported operation",
        };
        f.write_str(name)
    }
}

/// The error type for `FF7RText` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A read would cross the end of the readable region.
    #[error("unexpected end of stream: {requested} bytes at offset {offset} (end is {end})")]
    UnexpectedEof {
        /// Offset the read started at.
        offset: u64,
        /// Number of bytes requested.
        requested: u64,
        /// Recorded end offset of the stream.
        end: u64,
    },

    /// The temporary output file could not be moved into place.
    #[error("failed to persist {path}: {message}")]
    PersistFailed {
        /// Destination path.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// An input path cannot be processed by the requested operation.
    #[error("invalid input {path}: {message}")]
    InvalidInput {
        /// Offending path.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// The worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    // ==================== Format Errors ====================
    /// The header file starts with neither the legacy magic nor the zen marker.
    #[error("unexpected fourCC: {0:02X?}")]
    UnknownSignature([u8; 4]),

    /// The legacy payload does not end with the package magic.
    #[error("unexpected trailing signature: {0:02X?}")]
    InvalidTrailingSignature([u8; 4]),

    /// The zen package summary points outside the header file.
    #[error("malformed package summary: {message}")]
    InvalidSummary {
        /// What is wrong with the summary.
        message: String,
    },

    /// A string payload is not valid in its declared encoding.
    #[error("invalid {encoding} string at offset {offset}")]
    InvalidString {
        /// "UTF-8" or "UTF-16".
        encoding: &'static str,
        /// Offset of the string payload.
        offset: u64,
    },

    /// A legacy header was given without its companion payload.
    #[error("legacy asset needs its .uexp payload")]
    MissingPayload,

    /// The header is too short to hold the payload-size field.
    #[error("header too short for size patch: {len} bytes")]
    HeaderTooShort {
        /// Length of the preserved header buffer.
        len: usize,
    },

    // ==================== Bounds Errors ====================
    /// A count field is at or above its maximum.
    #[error("unexpected {what}: {count} (must be below {max})")]
    CountOutOfBounds {
        /// Which count ("name count", "entry count", "sub entry count").
        what: &'static str,
        /// The decoded value.
        count: u64,
        /// Exclusive upper bound.
        max: u64,
    },

    /// A value does not fit its on-disk field.
    #[error("{what} does not fit its field: {value}")]
    ValueTooLarge {
        /// Which value.
        what: &'static str,
        /// The value.
        value: u64,
    },

    // ==================== Consistency Errors ====================
    /// A reserved 32-bit field is not zero.
    #[error("not null: {value} at offset {offset}")]
    NonZeroReserved {
        /// Offset of the field.
        offset: u64,
        /// The decoded value.
        value: i32,
    },

    /// A sub-entry references a name id past the end of the name table.
    #[error("unexpected name id: {id} (name table has {len} names)")]
    UnknownNameId {
        /// The referenced id.
        id: u32,
        /// Name table length.
        len: usize,
    },

    /// A sub-entry id string does not exist in the name table.
    #[error("sub entry id ({0}) is not found in the uasset name map")]
    NameNotFound(String),

    /// An entry id from edited data does not exist in the asset.
    #[error("unknown entry detected ({0})")]
    UnknownEntry(String),

    /// A sub-entry id from edited data does not exist in its entry.
    #[error("unknown sub entry id detected ({sub_id}) in entry {entry}")]
    UnknownSubEntry {
        /// Parent entry id.
        entry: String,
        /// The unknown sub-entry id.
        sub_id: String,
    },

    /// Two sub-entries of one entry share an id.
    #[error("duplicated sub entry id detected ({sub_id}) in entry {entry}")]
    DuplicateSubEntry {
        /// Parent entry id.
        entry: String,
        /// The duplicated sub-entry id.
        sub_id: String,
    },

    /// A re-encoded asset differs from its source.
    #[error("round trip mismatch: {path}")]
    RoundTripMismatch {
        /// The source asset.
        path: PathBuf,
    },

    /// The language code is not one of the supported codes.
    #[error("unknown language detected ({0})")]
    UnknownLanguage(String),

    // ==================== Dual Subtitle Errors ====================
    /// A merged subtitle needs more lines than the subtitle box shows.
    #[error("unexpected line count detected: {id}, {primary_lines}, {secondary_lines}")]
    LineOverflow {
        /// Entry id.
        id: String,
        /// Line count of the primary language text after reflow.
        primary_lines: usize,
        /// Line count of the secondary language text after reflow.
        secondary_lines: usize,
    },

    // ==================== Interchange Errors ====================
    /// A CSV row cannot be applied.
    #[error("CSV error at line {line}: {message}")]
    InvalidCsv {
        /// 1-based line number.
        line: usize,
        /// What is wrong with the row.
        message: String,
    },

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Config file parsing error.
    #[error("config error: {0}")]
    ConfigError(#[from] toml::de::Error),

    // ==================== Unsupported ====================
    /// The operation does not support this asset version.
    #[error("{operation} is not supported for {version} assets")]
    UnsupportedVersion {
        /// Operation name.
        operation: &'static str,
        /// Version name.
        version: &'static str,
    },

    // ==================== Context ====================
    /// An error annotated with the operation that was running.
    #[error("{context}")]
    Context {
        /// What was being done.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The kind of the innermost error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Context { source, .. } => source.kind(),
            Error::Io(_)
            | Error::UnexpectedEof { .. }
            | Error::PersistFailed { .. }
            | Error::InvalidInput { .. }
            | Error::WorkerPool(_) => ErrorKind::Io,
            Error::UnknownSignature(_)
            | Error::InvalidTrailingSignature(_)
            | Error::InvalidSummary { .. }
            | Error::InvalidString { .. }
            | Error::MissingPayload
            | Error::HeaderTooShort { .. } => ErrorKind::Format,
            Error::CountOutOfBounds { .. } | Error::ValueTooLarge { .. } => ErrorKind::Bounds,
            Error::NonZeroReserved { .. }
            | Error::UnknownNameId { .. }
            | Error::NameNotFound(_)
            | Error::UnknownEntry(_)
            | Error::UnknownSubEntry { .. }
            | Error::DuplicateSubEntry { .. }
            | Error::RoundTripMismatch { .. }
            | Error::UnknownLanguage(_) => ErrorKind::Consistency,
            Error::LineOverflow { .. } => ErrorKind::ReflowOverflow,
            Error::InvalidCsv { .. } | Error::JsonError(_) | Error::ConfigError(_) => {
                ErrorKind::Interchange
            }
            Error::UnsupportedVersion { .. } => ErrorKind::Unsupported,
        }
    }

    /// The innermost error, skipping every context layer.
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Render the context chain, outermost call first.
    ///
    /// ```text
    /// Traceback (most recent call last):
    ///   reading Text.uasset
    ///   entry 12
    /// Error: unexpected sub entry count: 16 (must be below 16)
    /// ```
    #[must_use]
    pub fn trace(&self) -> String {
        let mut out = String::from("Traceback (most recent call last):");
        let mut current = self;
        while let Error::Context { context, source } = current {
            out.push_str("\n  ");
            out.push_str(context);
            current = source;
        }
        out.push_str("\nError: ");
        out.push_str(&current.to_string());
        out
    }

    fn with_context(self, context: String) -> Self {
        Error::Context {
            context,
            source: Box::new(self),
        }
    }
}

/// Attach call-path context to a [`Result`].
pub trait ResultExt<T> {
    /// Wrap the error with a fixed message.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Wrap the error with a lazily built message.
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context.into()))
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.into().with_context(f().into()))
    }
}

/// A specialized Result type for `FF7RText` operations.
pub type Result<T> = std::result::Result<T, Error>;
