use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::repo_types::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classification surfaced to callers next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Duplicate(_) => "DUPLICATE_KEY",
            StoreError::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// User persistence. The activation flag is left out of the default projection.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_email_with_activation(&self, email: &str)
        -> Result<Option<User>, StoreError>;
    async fn set_activated(&self, id: i64) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn classify(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Duplicate(db.message().to_string());
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl UserStore for PgUserStore {
    /// Insert a new user; `activated` takes the column default.
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, uuid)
            VALUES ($1, $2, $3)
            RETURNING id, uuid, email, password_hash, created_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.uuid)
        .fetch_one(&self.db)
        .await
        .map_err(classify)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, uuid, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_email_with_activation(
        &self,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, uuid, email, password_hash, activated, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn set_activated(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query(r#"UPDATE users SET activated = TRUE WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod pg_tests {
    use super::*;
    use uuid::Uuid;

    /// Needs a reachable Postgres: `DATABASE_URL=... cargo test -- --ignored`.
    async fn store() -> PgUserStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = crate::db::connect(&url).await.expect("connect");
        crate::db::migrate(&pool).await;
        PgUserStore::new(pool)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password_hash: "$argon2id$fake".into(),
            uuid: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    #[ignore]
    async fn pg_create_and_projection() {
        let store = store().await;
        let email = format!("{}@regmail.test", Uuid::new_v4());

        let created = store.create(new_user(&email)).await.expect("insert");
        assert!(created.id > 0);
        assert_eq!(created.activated, None);

        let plain = store.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(plain.id, created.id);
        assert_eq!(plain.activated, None);

        let full = store
            .find_by_email_with_activation(&email)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(full.activated, Some(false));

        store.set_activated(created.id).await.expect("update");
        let full = store
            .find_by_email_with_activation(&email)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(full.activated, Some(true));
    }

    #[tokio::test]
    #[ignore]
    async fn pg_duplicate_email_is_classified() {
        let store = store().await;
        let email = format!("{}@regmail.test", Uuid::new_v4());

        store.create(new_user(&email)).await.expect("first insert");
        let err = store.create(new_user(&email)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)), "{:?}", err);
        assert_eq!(err.kind(), "DUPLICATE_KEY");
    }
}
