use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::CreateEmployeeCommand;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::models::EmployeeStatus;
use crate::domain::employee::ports::EmployeeRepository;
use crate::domain::employee::ports::EmployeeServicePort;
use crate::domain::identity::ports::IdentityServicePort;

/// Employee workflow implementation.
///
/// Owns the one coupling the core cares about: creating an employee triggers
/// identity provisioning, and provisioning failure must never fail the
/// employee creation that triggered it.
pub struct EmployeeService<ER, IS>
where
    ER: EmployeeRepository,
    IS: IdentityServicePort,
{
    repository: Arc<ER>,
    provisioner: Arc<IS>,
}

impl<ER, IS> EmployeeService<ER, IS>
where
    ER: EmployeeRepository,
    IS: IdentityServicePort,
{
    pub fn new(repository: Arc<ER>, provisioner: Arc<IS>) -> Self {
        Self {
            repository,
            provisioner,
        }
    }
}

#[async_trait]
impl<ER, IS> EmployeeServicePort for EmployeeService<ER, IS>
where
    ER: EmployeeRepository,
    IS: IdentityServicePort,
{
    async fn create_employee(
        &self,
        command: CreateEmployeeCommand,
    ) -> Result<Employee, EmployeeError> {
        let employee = Employee {
            id: EmployeeId::new(),
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            status: EmployeeStatus::Active,
            created_at: Utc::now(),
        };

        let employee = self.repository.create(employee).await?;

        // Contained: the employee record persists whatever happens here.
        if let Err(e) = self.provisioner.provision(employee.id).await {
            tracing::error!(
                employee_id = %employee.id,
                error = %e,
                "Failed to provision login identity for employee"
            );
        }

        Ok(employee)
    }

    async fn get_employee(&self, id: &EmployeeId) -> Result<Employee, EmployeeError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(EmployeeError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::employee::models::EmailAddress;
    use crate::domain::identity::errors::IdentityError;
    use crate::domain::identity::models::LoginGrant;

    mock! {
        pub TestEmployeeRepository {}

        #[async_trait]
        impl EmployeeRepository for TestEmployeeRepository {
            async fn create(&self, employee: Employee) -> Result<Employee, EmployeeError>;
            async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, EmployeeError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Employee>, EmployeeError>;
        }
    }

    mock! {
        pub TestProvisioner {}

        #[async_trait]
        impl IdentityServicePort for TestProvisioner {
            async fn provision(&self, employee_id: EmployeeId) -> Result<(), IdentityError>;
            async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, IdentityError>;
        }
    }

    fn command() -> CreateEmployeeCommand {
        CreateEmployeeCommand {
            first_name: "Ana".to_string(),
            last_name: "Petrova".to_string(),
            email: EmailAddress::new("ana@x.com".to_string()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_employee_triggers_provisioning() {
        let mut repository = MockTestEmployeeRepository::new();
        repository
            .expect_create()
            .withf(|employee| {
                employee.status == EmployeeStatus::Active && employee.email.as_str() == "ana@x.com"
            })
            .times(1)
            .returning(|employee| Ok(employee));

        let mut provisioner = MockTestProvisioner::new();
        provisioner
            .expect_provision()
            .times(1)
            .returning(|_| Ok(()));

        let service = EmployeeService::new(Arc::new(repository), Arc::new(provisioner));

        let employee = service.create_employee(command()).await.unwrap();
        assert_eq!(employee.display_name(), "Ana Petrova");
    }

    #[tokio::test]
    async fn test_create_employee_survives_provisioning_failure() {
        let mut repository = MockTestEmployeeRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|employee| Ok(employee));

        let mut provisioner = MockTestProvisioner::new();
        provisioner
            .expect_provision()
            .times(1)
            .returning(|_| Err(IdentityError::Issuance("notifier exploded".to_string())));

        let service = EmployeeService::new(Arc::new(repository), Arc::new(provisioner));

        // The employee record must persist even when provisioning fails.
        let result = service.create_employee(command()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_employee_storage_failure_skips_provisioning() {
        let mut repository = MockTestEmployeeRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|employee| Err(EmployeeError::EmailAlreadyExists(
                employee.email.to_string(),
            )));

        let mut provisioner = MockTestProvisioner::new();
        provisioner.expect_provision().times(0);

        let service = EmployeeService::new(Arc::new(repository), Arc::new(provisioner));

        let result = service.create_employee(command()).await;
        assert!(matches!(result, Err(EmployeeError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_get_employee_not_found() {
        let mut repository = MockTestEmployeeRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service =
            EmployeeService::new(Arc::new(repository), Arc::new(MockTestProvisioner::new()));

        let result = service.get_employee(&EmployeeId::new()).await;
        assert!(matches!(result, Err(EmployeeError::NotFound(_))));
    }
}
