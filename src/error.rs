use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or normalizing a dataset.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] jwalk::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A selected class points past the end of the source taxonomy.
    #[error("class '{name}' maps to id {id}, but the source taxonomy only has {taxonomy_len} labels")]
    UnknownClassId {
        name: String,
        id: usize,
        taxonomy_len: usize,
    },

    /// The source produced a label it does not list in its own taxonomy.
    #[error("label '{0}' is not part of the source taxonomy")]
    UnknownLabel(String),

    #[error("split '{0}' not found in source")]
    MissingSplit(String),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
