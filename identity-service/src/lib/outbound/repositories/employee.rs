use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::ports::EmployeeRepository;

pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: impl std::fmt::Display) -> EmployeeError {
    EmployeeError::DatabaseError(e.to_string())
}

fn employee_from_row(row: &PgRow) -> Result<Employee, EmployeeError> {
    let status: String = row.try_get("status").map_err(db_err)?;

    Ok(Employee {
        id: EmployeeId(row.try_get("id").map_err(db_err)?),
        first_name: row.try_get("first_name").map_err(db_err)?,
        last_name: row.try_get("last_name").map_err(db_err)?,
        email: EmailAddress::new(row.try_get("email").map_err(db_err)?)?,
        status: status.parse().map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn create(&self, employee: Employee) -> Result<Employee, EmployeeError> {
        sqlx::query(
            r#"
            INSERT INTO employee (id, first_name, last_name, email, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(employee.id.0)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(employee.email.as_str())
        .bind(employee.status.as_str())
        .bind(employee.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return EmployeeError::EmailAlreadyExists(
                        employee.email.as_str().to_string(),
                    );
                }
            }
            EmployeeError::DatabaseError(e.to_string())
        })?;

        Ok(employee)
    }

    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, EmployeeError> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, status, created_at
            FROM employee
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(employee_from_row).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Employee>, EmployeeError> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, status, created_at
            FROM employee
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(employee_from_row).transpose()
    }
}
