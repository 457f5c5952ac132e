/// Crate-level error types for mdlinks diagnostics.
use std::path::PathBuf;

/// All errors in mdlinks carry enough context to produce a useful diagnostic
/// without a debugger. Classification itself never fails — "no match" is a
/// normal return, so the variants here cover filesystem and configuration
/// problems only.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An ATX header classifier was constructed with a level outside 1–6.
    #[error("header level must be 1..=6, got {level}")]
    HeaderLevel {
        /// The rejected level.
        level: u32,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of a report failed.
    #[error("json serialize: {0}")]
    Json(
        /// The wrapped serde_json error.
        #[from]
        serde_json::Error,
    ),

    /// The scan root given on the command line is not a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory {
        /// Path that was expected to be a directory.
        path: PathBuf,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
