use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::auth::repo::{StoreError, UserStore};
use crate::auth::repo_types::{NewUser, User};

/// In-process `UserStore` with the same uniqueness and projection rules as the
/// `users` table.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    /// Full row, activation flag included.
    pub fn get(&self, email: &str) -> Option<User> {
        let rows = self.rows.lock().unwrap();
        rows.iter().find(|u| u.email == email).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(
                "duplicate key value violates unique constraint \"users_email_key\"".into(),
            ));
        }
        let row = User {
            id: rows.len() as i64 + 1,
            uuid: user.uuid,
            email: user.email,
            password_hash: user.password_hash,
            activated: Some(false),
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(row.clone());
        Ok(User {
            activated: None,
            ..row
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.get(email).map(|u| User {
            activated: None,
            ..u
        }))
    }

    async fn find_by_email_with_activation(
        &self,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self.get(email))
    }

    async fn set_activated(&self, id: i64) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(u) = rows.iter_mut().find(|u| u.id == id) {
            u.activated = Some(true);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password_hash: "$argon2id$fake".into(),
            uuid: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn default_projection_hides_activation() {
        let store = MemoryUserStore::default();
        let created = store.create(new_user("a@x.com")).await.unwrap();
        assert_eq!(created.activated, None);

        let plain = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(plain.activated, None);

        let full = store
            .find_by_email_with_activation("a@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(full.activated, Some(false));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryUserStore::default();
        store.create(new_user("a@x.com")).await.unwrap();
        let err = store.create(new_user("a@x.com")).await.unwrap_err();
        assert_eq!(err.kind(), "DUPLICATE_KEY");
        assert_eq!(store.len(), 1);
    }
}
