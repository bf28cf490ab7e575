use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, not exposed in JSON
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// Find a user by (normalized) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Create a new user with a hashed password. The unique constraint on
    /// email enforces one account per address atomically; callers match the
    /// unique violation to report a duplicate.
    pub async fn create(db: &PgPool, email: &str, password_hash: &str) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    async fn create_and_find_by_email(db: PgPool) {
        let created = User::create(&db, "alice@example.com", "test-hash")
            .await
            .expect("create user");

        let found = User::find_by_email(&db, "alice@example.com")
            .await
            .expect("query")
            .expect("found");
        assert_eq!(found.id, created.id);
        assert_eq!(found.email, "alice@example.com");
        assert_eq!(found.password_hash, "test-hash");

        assert!(User::find_by_email(&db, "bob@example.com")
            .await
            .expect("query")
            .is_none());
    }

    #[sqlx::test]
    async fn second_register_hits_unique_violation(db: PgPool) {
        User::create(&db, "alice@example.com", "hash-one")
            .await
            .expect("first create");

        // Regardless of password hash, the email constraint rejects the insert
        let err = User::create(&db, "alice@example.com", "hash-two")
            .await
            .unwrap_err();
        match err {
            sqlx::Error::Database(e) => assert!(e.is_unique_violation()),
            other => panic!("expected database error, got {other:?}"),
        }
    }
}
