//! List query for users: search filter plus ordering

use std::cmp::Ordering;
use std::str::FromStr;

use super::entity::User;
use super::validation::UserValidationError;

/// Column a user list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Email,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Database column backing this field
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    fn compare(&self, a: &User, b: &User) -> Ordering {
        match self {
            Self::Id => a.id().as_uuid().cmp(&b.id().as_uuid()),
            Self::Name => a.name().cmp(b.name()),
            Self::Email => a.email().cmp(b.email()),
            Self::CreatedAt => a.created_at().cmp(&b.created_at()),
            Self::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
        }
    }
}

impl FromStr for SortField {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            "updatedAt" | "updated_at" => Ok(Self::UpdatedAt),
            other => Err(UserValidationError::InvalidSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(UserValidationError::InvalidSortOrder(s.trim().to_string())),
        }
    }
}

/// Ordering applied to a user list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl UserSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Compare two users according to this ordering
    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        let ordering = self.field.compare(a, b);

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl Default for UserSort {
    /// Most recently updated first
    fn default() -> Self {
        Self::new(SortField::UpdatedAt, SortOrder::Desc)
    }
}

/// Query parameters for listing users
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Case-insensitive substring matched against name or email
    pub search: Option<String>,
    pub sort: UserSort,
}

impl UserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort: UserSort) -> Self {
        self.sort = sort;
        self
    }

    /// Whether a user passes the search filter
    pub fn matches(&self, user: &User) -> bool {
        match &self.search {
            None => true,
            Some(search) => {
                let needle = search.to_lowercase();
                user.name().to_lowercase().contains(&needle)
                    || user.email().to_lowercase().contains(&needle)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::NewUser;

    fn user(name: &str, email: &str) -> User {
        User::new(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        })
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("id".parse::<SortField>(), Ok(SortField::Id));
        assert_eq!("updatedAt".parse::<SortField>(), Ok(SortField::UpdatedAt));
        assert_eq!("created_at".parse::<SortField>(), Ok(SortField::CreatedAt));
        assert!("password".parse::<SortField>().is_err());
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert_eq!(
            "up".parse::<SortOrder>(),
            Err(UserValidationError::InvalidSortOrder("up".to_string()))
        );
    }

    #[test]
    fn test_default_sort() {
        let sort = UserSort::default();
        assert_eq!(sort.field, SortField::UpdatedAt);
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_search_matches_name_or_email() {
        let query = UserQuery::new().with_search("ann");

        assert!(query.matches(&user("Ann", "a@x.com")));
        assert!(query.matches(&user("Bob", "joANNa@x.com")));
        assert!(!query.matches(&user("Bob", "bob@x.com")));
        assert!(UserQuery::new().matches(&user("Bob", "bob@x.com")));
    }

    #[test]
    fn test_sort_compare() {
        let a = user("Ann", "ann@x.com");
        let b = user("Bob", "bob@x.com");

        let asc = UserSort::new(SortField::Name, SortOrder::Asc);
        let desc = UserSort::new(SortField::Name, SortOrder::Desc);

        assert_eq!(asc.compare(&a, &b), Ordering::Less);
        assert_eq!(desc.compare(&a, &b), Ordering::Greater);
    }
}
