//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InsufficientBalance`] thrown when a credit exceeds (or hits an empty)
//!   balance.
//! - [`InvalidRecipient`] thrown when source and recipient are the same
//!   ledgerable.
//! - [`KeyNotFound`] thrown when an entry is not found.
//!
//!  [`InsufficientBalance`]: EngineError::InsufficientBalance
//!  [`InvalidRecipient`]: EngineError::InvalidRecipient
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InsufficientBalance(a), Self::InsufficientBalance(b)) => a == b,
            (Self::InvalidRecipient(a), Self::InvalidRecipient(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::InvalidCursor(a), Self::InvalidCursor(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
