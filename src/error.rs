use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read HAR file {path}")]
    ReadHar {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse HAR file {path}")]
    ParseHar {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid HAR search pattern")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to walk HAR directory")]
    Glob(#[from] glob::GlobError),
}
