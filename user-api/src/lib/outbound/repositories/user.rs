use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// In-memory user store.
///
/// A single `RwLock` guards the map, so uniqueness checks and writes happen
/// under the same guard and no caller observes a partial update.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &HashMap<UserId, User>, email: &str, except: Option<&UserId>) -> bool {
    users
        .values()
        .any(|u| u.email.as_str() == email && Some(&u.id) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if email_taken(&users, user.email.as_str(), None) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        if email_taken(&users, user.email.as_str(), Some(&user.id)) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::service::tests::sample_user;

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryUserRepository::new();
        let user = sample_user("Ada", "ada@example.com");

        repository.create(user.clone()).await.unwrap();

        assert_eq!(repository.find_by_id(&user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            repository.find_by_email("ada@example.com").await.unwrap(),
            Some(user)
        );
        assert_eq!(repository.find_by_email("other@example.com").await.unwrap(), None);
        assert_eq!(repository.find_by_id(&UserId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let repository = InMemoryUserRepository::new();

        repository
            .create(sample_user("Ada", "ada@example.com"))
            .await
            .unwrap();
        let result = repository
            .create(sample_user("Imposter", "ada@example.com"))
            .await;

        assert_eq!(
            result,
            Err(UserError::EmailAlreadyExists("ada@example.com".to_string()))
        );
        assert_eq!(repository.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_with_same_email() {
        let repository = Arc::new(InMemoryUserRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repository = Arc::clone(&repository);
                tokio::spawn(async move {
                    repository
                        .create(sample_user(&format!("User {}", i), "same@example.com"))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repository.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_oldest_first() {
        let repository = InMemoryUserRepository::new();

        let mut older = sample_user("Older", "older@example.com");
        older.created_at = older.created_at - Duration::hours(1);
        let newer = sample_user("Newer", "newer@example.com");

        repository.create(newer.clone()).await.unwrap();
        repository.create(older.clone()).await.unwrap();

        let users = repository.list_all().await.unwrap();
        assert_eq!(users, vec![older, newer]);
    }

    #[tokio::test]
    async fn test_update() {
        let repository = InMemoryUserRepository::new();
        let mut user = sample_user("Ada", "ada@example.com");
        repository.create(user.clone()).await.unwrap();

        user.email = EmailAddress::new("lovelace@example.com".to_string()).unwrap();
        repository.update(user.clone()).await.unwrap();

        assert_eq!(
            repository
                .find_by_email("lovelace@example.com")
                .await
                .unwrap()
                .map(|u| u.id),
            Some(user.id)
        );
        assert_eq!(repository.find_by_email("ada@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_keeping_own_email() {
        let repository = InMemoryUserRepository::new();
        let user = sample_user("Ada", "ada@example.com");
        repository.create(user.clone()).await.unwrap();

        assert!(repository.update(user).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_to_taken_email() {
        let repository = InMemoryUserRepository::new();
        let ada = sample_user("Ada", "ada@example.com");
        let mut grace = sample_user("Grace", "grace@example.com");
        repository.create(ada).await.unwrap();
        repository.create(grace.clone()).await.unwrap();

        grace.email = EmailAddress::new("ada@example.com".to_string()).unwrap();
        let result = repository.update(grace).await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_missing() {
        let repository = InMemoryUserRepository::new();

        let result = repository.update(sample_user("Ada", "ada@example.com")).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let repository = InMemoryUserRepository::new();
        let user = sample_user("Ada", "ada@example.com");
        repository.create(user.clone()).await.unwrap();

        repository.delete(&user.id).await.unwrap();

        assert_eq!(repository.find_by_id(&user.id).await.unwrap(), None);
        assert!(matches!(
            repository.delete(&user.id).await,
            Err(UserError::NotFound(_))
        ));
    }
}
