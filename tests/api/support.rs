use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_session::Session;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use async_trait::async_trait;
use serde_json::Value;

use mailpilot::config::AzureConfig;
use mailpilot::models::email::{EmailRecord, NewEmail};
use mailpilot::models::email_db::{EmailDB, EmailDBError, EmailStore};
use mailpilot::models::user_session::{self, AccessToken, SessionUser};
use mailpilot::routes::app_state::AppState;
use mailpilot::services::llm_service::{CompletionError, CompletionProvider, CompletionRequest};
use mailpilot::services::oauth_service::AzureOAuth;
use mailpilot::services::outlook_service::OutlookBridge;

/// How the fake model answers.
#[derive(Clone)]
pub enum Script {
    Reply(&'static str),
    Quota,
    BadKey,
    Broken,
}

pub struct FakeCompletion {
    script: Script,
    calls: AtomicUsize,
    last: Mutex<Option<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(FakeCompletion {
            script,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request.clone());
        match &self.script {
            Script::Reply(text) => Ok(text.to_string()),
            Script::Quota => Err(CompletionError::QuotaExceeded("insufficient_quota".into())),
            Script::BadKey => Err(CompletionError::InvalidCredentials("invalid_api_key".into())),
            Script::Broken => Err(CompletionError::Provider("server_error".into())),
        }
    }
}

/// Real in-memory store that also counts writes.
pub struct CountingStore {
    inner: EmailDB,
    creates: AtomicUsize,
}

impl CountingStore {
    pub async fn new() -> Arc<Self> {
        Arc::new(CountingStore {
            inner: EmailDB::open_in_memory().await.unwrap(),
            creates: AtomicUsize::new(0),
        })
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailStore for CountingStore {
    async fn list(&self, user_id: &str) -> Result<Vec<EmailRecord>, EmailDBError> {
        self.inner.list(user_id).await
    }

    async fn create(&self, user_id: &str, email: NewEmail) -> Result<EmailRecord, EmailDBError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(user_id, email).await
    }
}

pub struct BrokenStore;

#[async_trait]
impl EmailStore for BrokenStore {
    async fn list(&self, _user_id: &str) -> Result<Vec<EmailRecord>, EmailDBError> {
        Err(EmailDBError::ConnectionError("database is locked".into()))
    }

    async fn create(&self, _user_id: &str, _email: NewEmail) -> Result<EmailRecord, EmailDBError> {
        Err(EmailDBError::ConnectionError("database is locked".into()))
    }
}

/// Stand-in for Microsoft Graph, counting every hit.
pub struct FakeGraph {
    addr: std::net::SocketAddr,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl FakeGraph {
    pub fn start(status: u16, reply: Value) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let (h, b) = (hits.clone(), bodies.clone());
        let server = HttpServer::new(move || {
            let (h, b, reply) = (h.clone(), b.clone(), reply.clone());
            App::new().default_service(web::to(move |_req: HttpRequest, payload: web::Bytes| {
                let (h, b, reply) = (h.clone(), b.clone(), reply.clone());
                async move {
                    h.fetch_add(1, Ordering::SeqCst);
                    if let Ok(body) = serde_json::from_slice::<Value>(&payload) {
                        b.lock().unwrap().push(body);
                    }
                    HttpResponse::build(actix_web::http::StatusCode::from_u16(status).unwrap()).json(reply)
                }
            }))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        FakeGraph { addr, hits, bodies }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

pub fn state(
    completion: Arc<dyn CompletionProvider>,
    emails: Arc<dyn EmailStore>,
    graph_base_url: &str,
) -> AppState {
    let azure = AzureConfig {
        client_id: "client-id".into(),
        client_secret: "client-secret".into(),
        tenant_id: "contoso".into(),
    };
    AppState {
        completion,
        emails,
        outlook: OutlookBridge::new(graph_base_url),
        oauth: AzureOAuth::new(&azure, "http://localhost:8080", graph_base_url).unwrap(),
    }
}

/// Signs in as `?user=<id>` with an optional `&token=<bearer>`.
pub async fn test_login(session: Session, query: web::Query<HashMap<String, String>>) -> HttpResponse {
    let user = SessionUser {
        id: query.get("user").cloned().unwrap_or_else(|| "user-1".into()),
        name: Some("Test User".into()),
        email: Some("test@example.com".into()),
    };
    let token = query.get("token").map(|t| AccessToken::new(t.clone()));
    user_session::sign_in(&session, &user, token.as_ref()).unwrap();
    HttpResponse::Ok().finish()
}
