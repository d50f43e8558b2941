//! Error types for Ayat

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AyatError {
    #[error("Pattern error: {0}")]
    Pattern(String),

    #[error("Corpus not ready: {0}")]
    CorpusNotReady(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("{0}")]
    Other(String),
}

impl From<fancy_regex::Error> for AyatError {
    fn from(err: fancy_regex::Error) -> Self {
        AyatError::Pattern(err.to_string())
    }
}

impl serde::Serialize for AyatError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
