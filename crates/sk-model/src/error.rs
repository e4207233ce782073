//! Error types for model construction and data access.

use sk_core::SkError;
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Missing data for species '{species}': {what}")]
    MissingData { species: String, what: &'static str },

    #[error("Unknown species '{species}' referenced by reaction {reaction}")]
    UnknownSpecies { species: String, reaction: usize },

    #[error("Duplicate species definition: '{species}'")]
    DuplicateSpecies { species: String },

    #[error("Reaction state must contain at least one species term")]
    EmptyState,

    #[error("Species '{species}' occupies undeclared site '{site}'")]
    UndeclaredSite { species: String, site: String },

    #[error("Core error: {0}")]
    Core(#[from] SkError),
}
