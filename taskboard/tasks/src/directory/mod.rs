//! Existence checks against the users service.
//!
//! Task creation only needs to know whether a user ID is known. The
//! [`UserDirectory`] trait keeps that question separate from the task logic so the
//! lookup strategy (a single HTTP round trip today) can grow retries or a cache
//! without touching the task service.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod http;

pub use http::HttpUserDirectory;

/// Reasons a user ID could not be confirmed.
///
/// Callers of the task API see all of these as the same "invalid user" failure;
/// the variants exist so the logs can tell them apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserLookupError {
    /// The users service answered that the user does not exist.
    #[error("User {0} does not exist")]
    NotFound(u32),
    /// The users service answered with a status other than success or not found.
    #[error("Users service answered with status {0}")]
    UnexpectedStatus(u16),
    /// No answer arrived within the configured timeout.
    #[error("Users service did not answer within {0:?}")]
    Timeout(Duration),
    /// The request could not be sent or the response could not be read.
    #[error("Cannot reach users service: {0}")]
    Transport(String),
}

/// Answers whether a user with a given ID exists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolves to `Ok(())` when the user exists.
    async fn verify_user(&self, user_id: u32) -> Result<(), UserLookupError>;
}
