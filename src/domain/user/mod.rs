//! User domain
//!
//! Domain types and traits for user records: the entity and its
//! client-facing projection, list queries, validation and the repository
//! trait.

mod entity;
mod query;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserChanges, UserId, UserProjection};
pub use query::{SortField, SortOrder, UserQuery, UserSort};
pub use repository::UserRepository;
pub use validation::{
    present, validate_email, validate_name, validate_new_user, validate_sort,
    UserValidationError,
};

#[cfg(test)]
pub use repository::MockUserRepository;
