use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::auth::repo_types::User;

/// Which identity column a unique-constraint violation was raised on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakenField {
    Username,
    Email,
}

/// Recognises a Postgres unique violation (SQLSTATE 23505) on `users`, so a
/// concurrent insert or rename that slipped past [`User::identity_taken`]
/// still reports as a conflict.
pub fn taken_field(e: &anyhow::Error) -> Option<TakenField> {
    let sqlx::Error::Database(db) = e.downcast_ref::<sqlx::Error>()? else {
        return None;
    };
    if db.code().as_deref() != Some("23505") {
        return None;
    }
    match db.constraint() {
        Some("users_email_key") => Some(TakenField::Email),
        _ => Some(TakenField::Username),
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, verified, otp_code, otp_expires_at, budget, created_at";

impl User {
    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE name = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    /// Whether `username` or `email` belongs to any user other than `except`.
    pub async fn identity_taken(
        db: &PgPool,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<i64>,
    ) -> anyhow::Result<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE (name = $1 OR email = $2)
                  AND ($3::BIGINT IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(except)
        .fetch_one(db)
        .await
        .context("check username/email uniqueness")?;
        Ok(taken)
    }

    /// Create an unverified user with a pending OTP.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        otp_code: &str,
        otp_expires_at: OffsetDateTime,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, otp_code, otp_expires_at, verified)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(otp_code)
        .bind(otp_expires_at)
        .fetch_one(db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    pub async fn set_otp(
        db: &PgPool,
        id: i64,
        otp_code: &str,
        otp_expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET otp_code = $1, otp_expires_at = $2 WHERE id = $3")
            .bind(otp_code)
            .bind(otp_expires_at)
            .bind(id)
            .execute(db)
            .await
            .context("store otp")?;
        Ok(())
    }

    /// Flips `verified` to true and clears the OTP columns.
    pub async fn mark_verified(db: &PgPool, id: i64) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET verified = TRUE, otp_code = NULL, otp_expires_at = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(db)
        .await
        .context("mark user verified")?;
        Ok(())
    }

    /// Overwrites only the provided fields. Returns false if the user is gone.
    pub async fn update_profile(
        db: &PgPool,
        id: i64,
        username: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET name = COALESCE($1, name),
                   email = COALESCE($2, email),
                   password_hash = COALESCE($3, password_hash)
             WHERE id = $4
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(id)
        .execute(db)
        .await
        .context("update profile")?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn set_budget(db: &PgPool, id: i64, budget: f64) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE users SET budget = $1 WHERE id = $2")
            .bind(budget)
            .bind(id)
            .execute(db)
            .await
            .context("update budget")?;
        Ok(res.rows_affected() > 0)
    }
}
