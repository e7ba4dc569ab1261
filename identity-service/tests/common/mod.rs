use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Role;
use auth::SessionClaim;
use auth::SessionCodec;
use identity_service::domain::employee::service::EmployeeService;
use identity_service::domain::identity::service::IdentityService;
use identity_service::domain::records::service::RecordsService;
use identity_service::domain::token::errors::NotifierError;
use identity_service::domain::token::ports::Notifier;
use identity_service::domain::token::service::SetupService;
use identity_service::inbound::http::router::create_router;
use identity_service::inbound::http::router::AppState;
use identity_service::outbound::credentials::ArgonCredentialVerifier;
use identity_service::outbound::repositories::MemoryStore;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

/// Captured notification, so tests can follow the real setup link.
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub address: String,
    pub subject: String,
    pub body: String,
}

/// Notifier that records every message instead of delivering it.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<SentNotification>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentNotification> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifierError> {
        self.messages.lock().unwrap().push(SentNotification {
            address: address.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub store: MemoryStore,
    pub notifier: RecordingNotifier,
    pub api_client: reqwest::Client,
    pub session_codec: SessionCodec,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::default();
        let session_codec = Arc::new(SessionCodec::new(TEST_JWT_SECRET));

        let setup_service = Arc::new(SetupService::new(
            Arc::new(store.clone()),
            Arc::new(notifier.clone()),
            "http://localhost:5173".to_string(),
        ));

        let identity_service = Arc::new(IdentityService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::clone(&setup_service),
            Arc::new(ArgonCredentialVerifier::new()),
            Arc::clone(&session_codec),
            8,
        ));

        let employee_service = Arc::new(EmployeeService::new(
            Arc::new(store.clone()),
            Arc::clone(&identity_service),
        ));

        let records_service = Arc::new(RecordsService::new(Arc::new(store.clone())));

        let state = AppState {
            employee_service,
            identity_service,
            setup_service,
            records_service,
            session_codec,
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(state);
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server crashed");
        });

        Self {
            address,
            store,
            notifier,
            api_client: reqwest::Client::new(),
            session_codec: SessionCodec::new(TEST_JWT_SECRET),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Mint a bearer token for an arbitrary principal.
    pub fn bearer_for(&self, role: Role, employee_id: Option<Uuid>) -> String {
        let claim = SessionClaim::issue(Uuid::new_v4(), role, employee_id, 8);
        self.session_codec.encode(&claim).expect("encode failed")
    }

    /// Setup secret delivered to an address, parsed out of the notification
    /// body the way a real recipient would follow the link.
    pub fn setup_secret_for(&self, address: &str) -> Option<String> {
        self.notifier
            .sent()
            .iter()
            .rev()
            .find(|n| n.address == address)
            .and_then(|n| {
                let start = n.body.find("token=")? + "token=".len();
                let rest = &n.body[start..];
                let end = rest
                    .find(|c: char| c.is_whitespace())
                    .unwrap_or(rest.len());
                Some(rest[..end].to_string())
            })
    }
}
