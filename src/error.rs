use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Pipeline-level failures. Bad rows never end up here, see [`crate::record::Rejection`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),
    #[error("Couldn't resolve a link against the page url: {0}")]
    InvalidUrl(String),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
