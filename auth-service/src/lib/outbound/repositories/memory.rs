use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Debug, Default)]
struct Users {
    by_email: HashMap<String, User>,
    last_id: i64,
}

/// Process-local user store.
///
/// Enforces email uniqueness under its write lock, so concurrent
/// registrations of the same email resolve exactly like a unique index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Users>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.by_email.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.by_email.contains_key(user.email.as_str()) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        users.last_id += 1;
        let created = User {
            id: UserId(users.last_id),
            email: user.email,
            password_hash: user.password_hash,
            is_superuser: user.is_superuser,
        };
        users
            .by_email
            .insert(created.email.as_str().to_string(), created.clone());

        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.by_email.get(email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::EmailAddress;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "hash".to_string(),
            is_superuser: false,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repository = InMemoryUserRepository::new();

        let first = repository.create(new_user("a@x.com")).await.unwrap();
        let second = repository.create(new_user("b@x.com")).await.unwrap();

        assert_eq!(first.id, UserId(1));
        assert_eq!(second.id, UserId(2));
        assert_eq!(repository.len().await, 2);
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let repository = InMemoryUserRepository::new();
        repository.create(new_user("a@x.com")).await.unwrap();

        let result = repository.create(new_user("a@x.com")).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let repository = InMemoryUserRepository::new();
        assert!(repository.is_empty().await);

        let created = repository.create(new_user("a@x.com")).await.unwrap();

        let found = repository.find_by_email("a@x.com").await.unwrap();
        assert_eq!(found, Some(created));
        assert_eq!(repository.find_by_email("b@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_creates_with_same_email() {
        let repository = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repository = repository.clone();
                tokio::spawn(async move { repository.create(new_user("a@x.com")).await })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(UserError::EmailAlreadyExists(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, 7);
    }
}
