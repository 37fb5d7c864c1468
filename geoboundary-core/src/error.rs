use thiserror::Error;

use crate::functions::query::SpatialOperation;

#[derive(Debug, Error)]
pub enum GeoBoundaryError {
    #[error("{operation} query requires a {argument}")]
    MissingQueryArgument {
        operation: SpatialOperation,
        argument: &'static str,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, GeoBoundaryError>;
