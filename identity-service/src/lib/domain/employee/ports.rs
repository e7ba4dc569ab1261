use async_trait::async_trait;

use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::CreateEmployeeCommand;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;

/// Port for employee workflow operations.
#[async_trait]
pub trait EmployeeServicePort: Send + Sync + 'static {
    /// Create a new employee record and provision its login identity.
    ///
    /// Provisioning is best-effort: its failure is logged and never fails
    /// the employee creation itself.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Another employee already uses this email
    /// * `DatabaseError` - Storage operation failed
    async fn create_employee(&self, command: CreateEmployeeCommand)
        -> Result<Employee, EmployeeError>;

    /// Retrieve an employee by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Employee does not exist
    /// * `DatabaseError` - Storage operation failed
    async fn get_employee(&self, id: &EmployeeId) -> Result<Employee, EmployeeError>;
}

/// Persistence operations for the employee record.
#[async_trait]
pub trait EmployeeRepository: Send + Sync + 'static {
    /// Persist a new employee.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Storage operation failed
    async fn create(&self, employee: Employee) -> Result<Employee, EmployeeError>;

    /// Retrieve an employee by identifier, `None` if absent.
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, EmployeeError>;

    /// Retrieve an employee by email address, `None` if absent.
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<Employee>, EmployeeError>;
}
