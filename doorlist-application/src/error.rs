use doorlist_core::{repositories::Error as RepoError, usecases::Error as BusinessError};
use std::io;
use thiserror::Error;

/// A row that could not be read at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Line {line}: {message}")]
pub struct ParseError {
    pub line: u64,
    pub message: String,
}

/// The input as a whole could not be processed.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("The input is empty")]
    EmptyInput,
    #[error("None of the columns {0:?} is known")]
    NoKnownColumns(Vec<String>),
    #[error(transparent)]
    Csv(#[from] ::csv::Error),
    #[error("Failed to read the address index: {0}")]
    Index(#[from] RepoError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Business(#[from] BusinessError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
