use std::time::Duration;

/// Errors from document store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The unique `_id` index rejected an insert.
    #[error("duplicate key {id} in collection {collection}")]
    DuplicateKey { collection: String, id: String },

    /// A document was written without a string `_id`.
    #[error("document in collection {collection} has no string _id")]
    MissingId { collection: String },

    /// The backend could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The request-scoped deadline elapsed before the store answered.
    #[error("store call exceeded its deadline ({budget:?} budget)")]
    DeadlineExceeded { budget: Duration },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
