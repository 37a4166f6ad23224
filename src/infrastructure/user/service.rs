//! User service for user record management

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::domain::user::{
    present, validate_email, validate_name, validate_new_user, validate_sort, NewUser,
    UserChanges, UserId, UserProjection, UserQuery, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

const USER_NOT_FOUND: &str = "User not found";
const ADD_FAILED: &str = "Failed to add user";
const LIST_FAILED: &str = "Failed to retrieve users";
const GET_FAILED: &str = "Failed to retrieve user";
const UPDATE_FAILED: &str = "Failed to update user";
const COUNT_FAILED: &str = "Failed to count users";

/// Request for creating a new user. Missing fields are rejected by the service.
#[derive(Clone, Default)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Request for listing users
#[derive(Debug, Clone, Default)]
pub struct ListUsersRequest {
    pub search: Option<String>,
    pub sort_type: Option<String>,
    pub sort_order: Option<String>,
}

/// Request for updating a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Creates a user and returns its projection
    async fn create(&self, request: CreateUserRequest) -> Result<UserProjection, DomainError>;

    /// Lists users matching the search, in the requested order
    async fn list(&self, request: ListUsersRequest) -> Result<Vec<UserProjection>, DomainError>;

    /// Gets a user by ID
    async fn get(&self, id: &str) -> Result<UserProjection, DomainError>;

    /// Updates name and/or email of a user
    async fn update(
        &self,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserProjection, DomainError>;

    /// Deletes a user
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    /// Counts stored users
    async fn count(&self) -> Result<usize, DomainError>;
}

/// User service
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }
}

/// Collapse a store fault into the client-facing error for an operation.
/// Not-found keeps its class; anything else is logged and hidden.
fn store_failure(operation: &str, failure: &'static str, error: DomainError) -> DomainError {
    if error.is_not_found() {
        return DomainError::not_found(USER_NOT_FOUND);
    }

    error!(operation, error = %error, "User store operation failed");
    DomainError::internal(failure)
}

fn parse_id(id: &str) -> Result<UserId, DomainError> {
    UserId::parse(id).ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))
}

#[async_trait]
impl<R: UserRepository + 'static, H: PasswordHasher + 'static> UserServiceTrait
    for UserService<R, H>
{
    async fn create(&self, request: CreateUserRequest) -> Result<UserProjection, DomainError> {
        let (name, email, password) = validate_new_user(
            request.name.as_deref(),
            request.email.as_deref(),
            request.password.as_deref(),
        )
        .map_err(|e| DomainError::validation(e.to_string()))?;

        // Hash on the blocking pool
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))
            .and_then(|hashed| hashed)
            .map_err(|e| store_failure("create", ADD_FAILED, e))?;

        let new_user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        };

        let user = self
            .repository
            .create(new_user)
            .await
            .map_err(|e| store_failure("create", ADD_FAILED, e))?;

        info!(user_id = %user.id(), "User created");
        Ok(user.projection())
    }

    async fn list(&self, request: ListUsersRequest) -> Result<Vec<UserProjection>, DomainError> {
        let sort = validate_sort(request.sort_type.as_deref(), request.sort_order.as_deref())
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let mut query = UserQuery::new();

        if let Some(search) = present(request.search.as_deref()) {
            query = query.with_search(search);
        }

        if let Some(sort) = sort {
            query = query.with_sort(sort);
        }

        debug!(?query, "Listing users");

        let users = self
            .repository
            .list(&query)
            .await
            .map_err(|e| store_failure("list", LIST_FAILED, e))?;

        Ok(users.into_iter().map(UserProjection::from).collect())
    }

    async fn get(&self, id: &str) -> Result<UserProjection, DomainError> {
        let user_id = parse_id(id)?;

        let user = self
            .repository
            .get(&user_id)
            .await
            .map_err(|e| store_failure("get", GET_FAILED, e))?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;

        Ok(user.projection())
    }

    async fn update(
        &self,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserProjection, DomainError> {
        validate_name(request.name.as_deref())
            .and_then(|_| validate_email(request.email.as_deref()))
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let user_id = parse_id(id)?;

        let changes = UserChanges {
            name: request.name,
            email: request.email,
        };

        let user = self
            .repository
            .update(&user_id, &changes)
            .await
            .map_err(|e| store_failure("update", UPDATE_FAILED, e))?;

        info!(user_id = %user.id(), "User updated");
        Ok(user.projection())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let user_id = parse_id(id)?;

        let deleted = self
            .repository
            .delete(&user_id)
            .await
            .map_err(|e| store_failure("delete", UPDATE_FAILED, e))?;

        if !deleted {
            return Err(DomainError::not_found(USER_NOT_FOUND));
        }

        info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.repository
            .count()
            .await
            .map_err(|e| store_failure("count", COUNT_FAILED, e))
    }
}
