use thiserror::Error;

/// Rejections from record mutations. None of these change store contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisitError {
    /// Missing or invalid year/place on add or update.
    #[error("invalid visit: {0}")]
    Validation(String),

    /// Edit or delete referencing a stale row.
    #[error("no visit at index {index} (store holds {len})")]
    Index { index: usize, len: usize },

    /// Mutation attempted while the edit gate is closed.
    #[error("edit mode is not enabled")]
    EditLocked,
}

/// Read or write failure against the persistence collaborator.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage read failed: {0}")]
    Read(String),

    #[error("storage write failed: {0}")]
    Write(String),

    #[error("failed to encode visits: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Bootstrap or geography data unavailable or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("fetch error: {0}")]
    Request(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Malformed(String),
}
