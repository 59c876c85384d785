//! Handler error types.
//!
//! Client errors (not found, validation, malformed body) are answered inside
//! each operation. Only failures the client cannot fix travel as
//! [`HandlerError`] up to the router, which logs them and answers 500.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("failed to serialize response body: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type HandlerResult<T> = Result<T, HandlerError>;
