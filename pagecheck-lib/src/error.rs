use crate::style::style_block::CssBlockError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a whole check group or the whole run.
#[derive(Debug, Error)]
pub enum PageCheckError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot build a file:// URL for {0}")]
    FileUrl(PathBuf),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("unexpected result from page script: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Css(#[from] CssBlockError),
}

impl PageCheckError {
    pub(crate) fn browser(err: impl std::fmt::Display) -> Self {
        PageCheckError::Browser(err.to_string())
    }
}

pub type Result<T, E = PageCheckError> = std::result::Result<T, E>;
