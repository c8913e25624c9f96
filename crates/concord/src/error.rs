//! Fatal error taxonomy for the harness.
//!
//! Every variant of [`HarnessError`] aborts the whole run: the harness has
//! no partial-results mode, so errors propagate straight to the process
//! boundary. The one non-error condition worth noting is a `--case` name
//! that matches nothing — that is silently ignored during selection.

/// Error type for harness operations.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The build step for a catalog entry returned non-zero. Nothing runs.
    #[error("build for variant '{variant}' failed with status {status}")]
    BuildFailure { variant: String, status: i32 },

    /// A variant invocation returned non-zero. This is never reinterpreted
    /// as a correctness disagreement; a crash must not pollute the
    /// pass/fail signal.
    #[error(
        "variant '{variant}' (degree {degree}) exited with status {status} on case '{case}':\n{detail}"
    )]
    RunFailure {
        variant: String,
        degree: u32,
        case: String,
        status: i32,
        detail: String,
    },

    /// Two runs for the same case and repetition produced different
    /// trimmed outputs.
    #[error("case '{case}' repetition {repetition}: variants disagreed, distinct results {outputs:?}")]
    ConsistencyFailure {
        case: String,
        repetition: u32,
        outputs: Vec<String>,
    },

    /// Invalid catalog or configuration (duplicate variant names,
    /// unparsable config file, a case no variant can run).
    #[error("configuration error: {0}")]
    Config(String),

    /// A variant was scheduled to run but the build phase produced no
    /// artifact for it.
    #[error("missing artifact for variant '{0}'")]
    MissingArtifact(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
