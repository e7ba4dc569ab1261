use std::str::FromStr;

use async_trait::async_trait;
use auth::Role;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::EmployeeId;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::IdentityRepository;

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: impl std::fmt::Display) -> IdentityError {
    IdentityError::DatabaseError(e.to_string())
}

fn identity_from_row(row: &PgRow) -> Result<Identity, IdentityError> {
    let role: String = row.try_get("role").map_err(db_err)?;
    let email: String = row.try_get("email").map_err(db_err)?;
    let employee_id: Option<Uuid> = row.try_get("employee_id").map_err(db_err)?;

    Ok(Identity {
        id: IdentityId(row.try_get("id").map_err(db_err)?),
        email: EmailAddress::new(email).map_err(db_err)?,
        password_hash: row.try_get("password_hash").map_err(db_err)?,
        active: row.try_get("active").map_err(db_err)?,
        role: Role::from_str(&role).map_err(db_err)?,
        employee_id: employee_id.map(EmployeeId),
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError> {
        sqlx::query(
            r#"
            INSERT INTO identity (id, email, password_hash, active, role, employee_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.email.as_str())
        .bind(&identity.password_hash)
        .bind(identity.active)
        .bind(identity.role.as_str())
        .bind(identity.employee_id.map(|id| id.0))
        .bind(identity.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("identity_email_key")
                {
                    return IdentityError::EmailTaken(identity.email.as_str().to_string());
                }
            }
            IdentityError::DatabaseError(e.to_string())
        })?;

        Ok(identity)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, active, role, employee_id, created_at
            FROM identity
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(identity_from_row).transpose()
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, active, role, employee_id, created_at
            FROM identity
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(identity_from_row).transpose()
    }
}
