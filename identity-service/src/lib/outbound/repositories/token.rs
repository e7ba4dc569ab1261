use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::identity::models::IdentityId;
use crate::domain::token::errors::TokenError;
use crate::domain::token::models::SetupToken;
use crate::domain::token::models::TokenId;
use crate::domain::token::ports::SetupTokenRepository;

pub struct PostgresSetupTokenRepository {
    pool: PgPool,
}

impl PostgresSetupTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: impl std::fmt::Display) -> TokenError {
    TokenError::DatabaseError(e.to_string())
}

fn token_from_row(row: &PgRow) -> Result<SetupToken, TokenError> {
    Ok(SetupToken {
        id: TokenId(row.try_get("id").map_err(db_err)?),
        identity_id: IdentityId(row.try_get("identity_id").map_err(db_err)?),
        secret: row.try_get("secret").map_err(db_err)?,
        expires_at: row.try_get("expires_at").map_err(db_err)?,
        used: row.try_get("used").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl SetupTokenRepository for PostgresSetupTokenRepository {
    async fn create(&self, token: SetupToken) -> Result<SetupToken, TokenError> {
        sqlx::query(
            r#"
            INSERT INTO password_setup_token (id, identity_id, secret, expires_at, used, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.id.0)
        .bind(token.identity_id.0)
        .bind(&token.secret)
        .bind(token.expires_at)
        .bind(token.used)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(token)
    }

    async fn find_by_secret(&self, secret: &str) -> Result<Option<SetupToken>, TokenError> {
        let row = sqlx::query(
            r#"
            SELECT id, identity_id, secret, expires_at, used, created_at
            FROM password_setup_token
            WHERE secret = $1
            "#,
        )
        .bind(secret)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(token_from_row).transpose()
    }

    async fn redeem(
        &self,
        secret: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SetupToken>, TokenError> {
        // One statement, one winner: the conditional UPDATE only matches a
        // row that is still unused and unexpired, and the identity
        // activation rides in the same data-modifying CTE.
        let row = sqlx::query(
            r#"
            WITH redeemed AS (
                UPDATE password_setup_token
                   SET used = TRUE
                 WHERE secret = $1 AND used = FALSE AND expires_at > $2
             RETURNING id, identity_id, secret, expires_at, used, created_at
            ),
            activated AS (
                UPDATE identity i
                   SET password_hash = $3, active = TRUE
                  FROM redeemed r
                 WHERE i.id = r.identity_id
            )
            SELECT id, identity_id, secret, expires_at, used, created_at
            FROM redeemed
            "#,
        )
        .bind(secret)
        .bind(now)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(token_from_row).transpose()
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, TokenError> {
        let result = sqlx::query(
            r#"
            DELETE FROM password_setup_token
            WHERE expires_at < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected())
    }
}
