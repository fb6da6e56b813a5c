use taxon_api::{ApiError, CategoryId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid category tree: {0}")]
    Tree(#[from] TreeError),
    #[error("Tree provider error: {0}")]
    Provider(#[from] ApiError),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Structural problems found while validating a tree snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("duplicate category id {0}")]
    DuplicateId(CategoryId),
    #[error("category {id} references unknown parent {parent}")]
    UnknownParent { id: CategoryId, parent: CategoryId },
    #[error("category {0} is part of a parent cycle")]
    Cycle(CategoryId),
    #[error("category {id} is nested deeper than {limit} levels")]
    TooDeep { id: CategoryId, limit: usize },
}

pub type Result<T> = std::result::Result<T, TaxonError>;
