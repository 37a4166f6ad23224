//! User repository trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::{NewUser, User, UserChanges, UserId};
use super::query::UserQuery;
use crate::domain::DomainError;

/// Repository trait for user storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user. The store assigns the id and both timestamps.
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// List users passing the query's filter, in the query's order
    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, DomainError>;

    /// Apply changes to an existing user and refresh `updated_at`.
    ///
    /// Returns `DomainError::NotFound` when no user has this id.
    async fn update(&self, id: &UserId, changes: &UserChanges) -> Result<User, DomainError>;

    /// Delete a user. Returns whether a record was removed.
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Count all users
    async fn count(&self) -> Result<usize, DomainError>;
}
