use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::ports::EmployeeRepository;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::IdentityRepository;
use crate::domain::records::errors::RecordsError;
use crate::domain::records::models::AttendanceEntry;
use crate::domain::records::models::LeaveBalance;
use crate::domain::records::models::LeaveRequest;
use crate::domain::records::models::Timesheet;
use crate::domain::records::ports::RecordsRepository;
use crate::domain::token::errors::TokenError;
use crate::domain::token::models::SetupToken;
use crate::domain::token::ports::SetupTokenRepository;

#[derive(Default)]
struct MemState {
    employees: HashMap<Uuid, Employee>,
    identities: HashMap<Uuid, Identity>,
    tokens: HashMap<Uuid, SetupToken>,
    attendance: Vec<AttendanceEntry>,
    leave: Vec<LeaveRequest>,
    balances: HashMap<Uuid, LeaveBalance>,
    timesheets: Vec<Timesheet>,
}

/// In-memory store implementing every repository port over one mutex.
///
/// Backs the unit and integration test suites; the single lock is also what
/// makes the redeem primitive atomic here, the same way the conditional CTE
/// does on Postgres.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemState>, String> {
        self.state.lock().map_err(|e| e.to_string())
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn create(&self, employee: Employee) -> Result<Employee, EmployeeError> {
        let mut state = self.lock().map_err(EmployeeError::DatabaseError)?;

        if state
            .employees
            .values()
            .any(|e| e.email == employee.email)
        {
            return Err(EmployeeError::EmailAlreadyExists(
                employee.email.as_str().to_string(),
            ));
        }

        state.employees.insert(employee.id.0, employee.clone());
        Ok(employee)
    }

    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, EmployeeError> {
        let state = self.lock().map_err(EmployeeError::DatabaseError)?;
        Ok(state.employees.get(&id.0).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Employee>, EmployeeError> {
        let state = self.lock().map_err(EmployeeError::DatabaseError)?;
        Ok(state.employees.values().find(|e| &e.email == email).cloned())
    }
}

#[async_trait]
impl IdentityRepository for MemoryStore {
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let mut state = self.lock().map_err(IdentityError::DatabaseError)?;

        // The uniqueness backstop provisioning races rely on.
        if state
            .identities
            .values()
            .any(|i| i.email == identity.email)
        {
            return Err(IdentityError::EmailTaken(
                identity.email.as_str().to_string(),
            ));
        }

        state.identities.insert(identity.id.0, identity.clone());
        Ok(identity)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, IdentityError> {
        let state = self.lock().map_err(IdentityError::DatabaseError)?;
        Ok(state
            .identities
            .values()
            .find(|i| &i.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError> {
        let state = self.lock().map_err(IdentityError::DatabaseError)?;
        Ok(state.identities.get(&id.0).cloned())
    }
}

#[async_trait]
impl SetupTokenRepository for MemoryStore {
    async fn create(&self, token: SetupToken) -> Result<SetupToken, TokenError> {
        let mut state = self.lock().map_err(TokenError::DatabaseError)?;
        state.tokens.insert(token.id.0, token.clone());
        Ok(token)
    }

    async fn find_by_secret(&self, secret: &str) -> Result<Option<SetupToken>, TokenError> {
        let state = self.lock().map_err(TokenError::DatabaseError)?;
        Ok(state.tokens.values().find(|t| t.secret == secret).cloned())
    }

    async fn redeem(
        &self,
        secret: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SetupToken>, TokenError> {
        let mut state = self.lock().map_err(TokenError::DatabaseError)?;

        // Validity check and flip happen under the same lock; only one
        // caller can observe used == false.
        let redeemed = state
            .tokens
            .values_mut()
            .find(|t| t.secret == secret && !t.used && now < t.expires_at)
            .map(|t| {
                t.used = true;
                t.clone()
            });

        if let Some(token) = &redeemed {
            if let Some(identity) = state.identities.get_mut(&token.identity_id.0) {
                identity.password_hash = Some(password_hash.to_string());
                identity.active = true;
            }
        }

        Ok(redeemed)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, TokenError> {
        let mut state = self.lock().map_err(TokenError::DatabaseError)?;

        let before = state.tokens.len();
        state.tokens.retain(|_, t| t.expires_at >= now);

        Ok((before - state.tokens.len()) as u64)
    }
}

#[async_trait]
impl RecordsRepository for MemoryStore {
    async fn list_attendance(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<AttendanceEntry>, RecordsError> {
        let state = self.lock().map_err(RecordsError::DatabaseError)?;
        Ok(state
            .attendance
            .iter()
            .filter(|a| &a.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn insert_attendance(
        &self,
        entry: AttendanceEntry,
    ) -> Result<AttendanceEntry, RecordsError> {
        let mut state = self.lock().map_err(RecordsError::DatabaseError)?;

        if state
            .attendance
            .iter()
            .any(|a| a.employee_id == entry.employee_id && a.date == entry.date)
        {
            return Err(RecordsError::AlreadyMarked);
        }

        state.attendance.push(entry.clone());
        Ok(entry)
    }

    async fn list_leave(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<LeaveRequest>, RecordsError> {
        let state = self.lock().map_err(RecordsError::DatabaseError)?;
        Ok(state
            .leave
            .iter()
            .filter(|l| &l.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn insert_leave(&self, request: LeaveRequest) -> Result<LeaveRequest, RecordsError> {
        let mut state = self.lock().map_err(RecordsError::DatabaseError)?;
        state.leave.push(request.clone());
        Ok(request)
    }

    async fn find_balance(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Option<LeaveBalance>, RecordsError> {
        let state = self.lock().map_err(RecordsError::DatabaseError)?;
        Ok(state.balances.get(&employee_id.0).cloned())
    }

    async fn list_timesheets(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Timesheet>, RecordsError> {
        let state = self.lock().map_err(RecordsError::DatabaseError)?;
        Ok(state
            .timesheets
            .iter()
            .filter(|t| &t.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn insert_timesheet(&self, timesheet: Timesheet) -> Result<Timesheet, RecordsError> {
        let mut state = self.lock().map_err(RecordsError::DatabaseError)?;
        state.timesheets.push(timesheet.clone());
        Ok(timesheet)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn email(s: &str) -> EmailAddress {
        EmailAddress::new(s.to_string()).unwrap()
    }

    async fn store_with_token() -> (MemoryStore, SetupToken) {
        let store = MemoryStore::new();

        let identity = Identity::provisioned(email("ana@x.com"), EmployeeId::new());
        let identity = IdentityRepository::create(&store, identity).await.unwrap();

        let token = SetupToken::issue(identity.id, Utc::now());
        let token = SetupTokenRepository::create(&store, token).await.unwrap();

        (store, token)
    }

    #[tokio::test]
    async fn test_redeem_activates_identity() {
        let (store, token) = store_with_token().await;

        let redeemed = store
            .redeem(&token.secret, "$argon2id$hash", Utc::now())
            .await
            .unwrap()
            .expect("redeem should win");

        assert!(redeemed.used);

        let identity = IdentityRepository::find_by_id(&store, &token.identity_id)
            .await
            .unwrap()
            .unwrap();
        assert!(identity.active);
        assert_eq!(identity.password_hash.as_deref(), Some("$argon2id$hash"));
    }

    #[tokio::test]
    async fn test_second_redeem_loses() {
        let (store, token) = store_with_token().await;

        assert!(store
            .redeem(&token.secret, "$argon2id$first", Utc::now())
            .await
            .unwrap()
            .is_some());
        assert!(store
            .redeem(&token.secret, "$argon2id$second", Utc::now())
            .await
            .unwrap()
            .is_none());

        // The first password stays; the loser must not have overwritten it.
        let identity = IdentityRepository::find_by_id(&store, &token.identity_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.password_hash.as_deref(), Some("$argon2id$first"));
    }

    #[tokio::test]
    async fn test_redeem_at_exact_expiry_instant_loses() {
        let (store, token) = store_with_token().await;

        assert!(store
            .redeem(&token.secret, "$argon2id$hash", token.expires_at)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_redeems_have_exactly_one_winner() {
        let (store, token) = store_with_token().await;

        let attempts = 16;
        let barrier = Arc::new(tokio::sync::Barrier::new(attempts));

        let mut handles = Vec::new();
        for i in 0..attempts {
            let store = store.clone();
            let secret = token.secret.clone();
            let barrier = Arc::clone(&barrier);

            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                store
                    .redeem(&secret, &format!("$argon2id$attempt{}", i), Utc::now())
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);

        // Exactly one surviving active identity state, one password set.
        let identity = IdentityRepository::find_by_id(&store, &token.identity_id)
            .await
            .unwrap()
            .unwrap();
        assert!(identity.active);
        assert!(identity.password_hash.is_some());
    }

    #[tokio::test]
    async fn test_purge_deletes_only_expired_tokens() {
        let store = MemoryStore::new();
        let now = Utc::now();

        let identity = Identity::provisioned(email("ana@x.com"), EmployeeId::new());
        let identity = IdentityRepository::create(&store, identity).await.unwrap();

        let mut expired_unused = SetupToken::issue(identity.id, now);
        expired_unused.expires_at = now - Duration::hours(1);

        let mut expired_used = SetupToken::issue(identity.id, now);
        expired_used.expires_at = now - Duration::minutes(5);
        expired_used.used = true;

        let mut live_used = SetupToken::issue(identity.id, now);
        live_used.used = true;

        let live_unused = SetupToken::issue(identity.id, now);

        for token in [&expired_unused, &expired_used, &live_used, &live_unused] {
            SetupTokenRepository::create(&store, token.clone())
                .await
                .unwrap();
        }

        let deleted = store.purge_expired(now).await.unwrap();
        assert_eq!(deleted, 2);

        // Used-but-unexpired tokens stay until their own expiry passes.
        assert!(store
            .find_by_secret(&live_used.secret)
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_by_secret(&live_unused.secret)
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_by_secret(&expired_used.secret)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_identity_email_uniqueness_is_enforced() {
        let store = MemoryStore::new();

        let first = Identity::provisioned(email("ana@x.com"), EmployeeId::new());
        let second = Identity::provisioned(email("ana@x.com"), EmployeeId::new());

        assert!(IdentityRepository::create(&store, first).await.is_ok());
        assert!(matches!(
            IdentityRepository::create(&store, second).await,
            Err(IdentityError::EmailTaken(_))
        ));
    }
}
