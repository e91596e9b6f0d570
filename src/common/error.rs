use rust_tokenizers::error::TokenizerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PTuneError {
    #[error("Invalid format in {path}, row {row}: expected at least {expected} columns, found {found}")]
    FormatError {
        path: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Task {0} not supported. Choose from {1:?}")]
    UnsupportedTaskError(String, Vec<&'static str>),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("CSV parsing error: {0}")]
    CsvError(String),

    #[error("Tokenizer error: {0}")]
    TokenizerError(String),
}

impl From<std::io::Error> for PTuneError {
    fn from(error: std::io::Error) -> Self {
        PTuneError::IOError(error.to_string())
    }
}

impl From<csv::Error> for PTuneError {
    fn from(error: csv::Error) -> Self {
        PTuneError::CsvError(error.to_string())
    }
}

impl From<TokenizerError> for PTuneError {
    fn from(error: TokenizerError) -> Self {
        PTuneError::TokenizerError(error.to_string())
    }
}
