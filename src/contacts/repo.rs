use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::UpdateContactRequest;

/// Contact record. Every row belongs to exactly one user; `owner_id` is set
/// at creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub timezone: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

// Every statement that targets a single row filters by id AND owner_id, so a
// contact owned by someone else behaves exactly like a missing one.
impl Contact {
    pub async fn create(
        db: &PgPool,
        owner_id: Uuid,
        name: &str,
        email: &str,
        phone: &str,
        address: &str,
        timezone: &str,
    ) -> sqlx::Result<Contact> {
        sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (owner_id, name, email, phone, address, timezone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, name, email, phone, address, timezone, created_at
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(timezone)
        .fetch_one(db)
        .await
    }

    /// All contacts of one owner, in insertion order.
    pub async fn list_by_owner(db: &PgPool, owner_id: Uuid) -> sqlx::Result<Vec<Contact>> {
        sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, owner_id, name, email, phone, address, timezone, created_at
            FROM contacts
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &PgPool, owner_id: Uuid, id: Uuid) -> sqlx::Result<Option<Contact>> {
        sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, owner_id, name, email, phone, address, timezone, created_at
            FROM contacts
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(db)
        .await
    }

    /// Partial update; absent fields fall back to the stored value via
    /// COALESCE. Returns None when no owned row matches.
    pub async fn update(
        db: &PgPool,
        owner_id: Uuid,
        id: Uuid,
        changes: &UpdateContactRequest,
    ) -> sqlx::Result<Option<Contact>> {
        sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET name     = COALESCE($3, name),
                email    = COALESCE($4, email),
                phone    = COALESCE($5, phone),
                address  = COALESCE($6, address),
                timezone = COALESCE($7, timezone)
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, name, email, phone, address, timezone, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.address.as_deref())
        .bind(changes.timezone.as_deref())
        .fetch_optional(db)
        .await
    }

    /// Returns false when no owned row matched.
    pub async fn delete(db: &PgPool, owner_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM contacts
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every contact of one owner; returns the number removed.
    pub async fn clear_all(db: &PgPool, owner_id: Uuid) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM contacts
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}
