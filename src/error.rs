//! Errors raised while loading theme documents

/// Theme document loading errors
#[derive(Debug, thiserror::Error)]
pub enum ThemeJsonError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Malformed document: {0}")]
    Malformed(String),
}
