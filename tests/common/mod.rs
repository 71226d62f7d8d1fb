#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use actix_web::web::{self, Data, Json};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use authsync::api::auth::{AuthResponse, LoginRequest, RegisterRequest};
use authsync::api::user::{ProfilePatch, User};
use authsync::api::Envelope;
use authsync::client::Client;
use authsync::store::memory::MemoryStore;
use authsync::store::CredentialStore;
use once_cell::sync::Lazy;
use serde_json::Value;

static LOGGER: Lazy<()> = Lazy::new(|| {
    let _ = authsync::logs::init("debug");
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutMode {
    Ok,
    Fail,
    Malformed,
    Slow,
}

pub struct Account {
    pub password: String,
    pub user: User,
}

/// What the mock API knows and what it has seen.
pub struct MockState {
    pub accounts: Vec<Account>,
    pub tokens: HashMap<String, String>,
    next_id: u64,
    issued: usize,

    /// Issue this token instead of a generated one.
    pub fixed_token: Option<String>,
    pub logout_mode: LogoutMode,
    pub login_malformed: bool,
    /// Answer login with this body, as is.
    pub login_body: Option<Value>,
    pub profile_failure: Option<String>,
    /// Answer profile reads with this body, as is.
    pub profile_body: Option<Value>,

    pub logout_calls: usize,
    pub profile_requests: usize,
    pub last_authorization: Option<String>,
    pub last_patch: Option<Value>,
}

impl MockState {
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
            tokens: HashMap::new(),
            next_id: 1,
            issued: 0,
            fixed_token: None,
            logout_mode: LogoutMode::Ok,
            login_malformed: false,
            login_body: None,
            profile_failure: None,
            profile_body: None,
            logout_calls: 0,
            profile_requests: 0,
            last_authorization: None,
            last_patch: None,
        }
    }

    pub fn with_account(mut self, username: &str, email: &str, password: &str) -> Self {
        self.add_account(username, email, password);
        self
    }

    fn add_account(&mut self, username: &str, email: &str, password: &str) -> User {
        let user = User {
            id: self.next_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            avatar: None,
            created_at: String::from("2024-01-01T00:00:00Z"),
            updated_at: String::from("2024-01-01T00:00:00Z"),
        };
        self.next_id += 1;
        self.accounts.push(Account {
            password: password.to_string(),
            user: user.clone(),
        });
        user
    }

    fn issue_token(&mut self, user_id: &str) -> String {
        self.issued += 1;
        let token = match self.fixed_token.take() {
            Some(token) => token,
            None => format!("token-{}-{}", user_id, self.issued),
        };
        self.tokens.insert(token.clone(), user_id.to_string());
        token
    }

    fn authorized_user(&mut self, req: &HttpRequest) -> Option<usize> {
        let header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(String::from);
        self.last_authorization = header.clone();

        let token = header?.strip_prefix("Bearer ")?.to_string();
        let user_id = self.tokens.get(&token)?;
        self.accounts.iter().position(|a| &a.user.id == user_id)
    }

    pub fn revoke_all_tokens(&mut self) {
        self.tokens.clear();
    }
}

pub struct MockServer {
    pub url: String,
    state: Arc<Mutex<MockState>>,
}

impl MockServer {
    pub async fn start(state: MockState) -> Self {
        Lazy::force(&LOGGER);

        let state = Arc::new(Mutex::new(state));
        let data = Data::from(state.clone());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/api/auth/login", web::post().to(login))
                .route("/api/auth/register", web::post().to(register))
                .route("/api/auth/logout", web::post().to(logout))
                .route("/api/auth/refresh", web::post().to(refresh))
                .route("/api/user/profile", web::get().to(get_profile))
                .route("/api/user/profile", web::put().to(put_profile))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        tokio::spawn(server.run());

        Self {
            url: format!("http://{addr}/api"),
            state,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn client(&self, store: Arc<dyn CredentialStore>) -> Client {
        Client::new(&self.url, Some(Duration::from_secs(5)), store).unwrap()
    }

    pub fn client_with_timeout(&self, store: Arc<dyn CredentialStore>, timeout: Duration) -> Client {
        Client::new(&self.url, Some(timeout), store).unwrap()
    }
}

/// A url nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

fn failed(message: &str) -> Envelope<Value> {
    Envelope::failed(message)
}

async fn login(state: Data<Mutex<MockState>>, body: Json<LoginRequest>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    if state.login_malformed {
        return HttpResponse::Ok()
            .content_type("text/html")
            .body("<html>502 Bad Gateway</html>");
    }
    if let Some(body) = state.login_body.clone() {
        return HttpResponse::Ok().json(body);
    }

    let user = state
        .accounts
        .iter()
        .find(|a| a.user.email == body.email && a.password == body.password)
        .map(|a| a.user.clone());
    match user {
        Some(user) => {
            let token = state.issue_token(&user.id);
            HttpResponse::Ok().json(Envelope::with_data(AuthResponse {
                token,
                user: user.summary(),
            }))
        }
        None => HttpResponse::Ok().json(failed("invalid credentials")),
    }
}

async fn register(state: Data<Mutex<MockState>>, body: Json<RegisterRequest>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    if state.accounts.iter().any(|a| a.user.email == body.email) {
        return HttpResponse::Conflict().json(failed("email already registered"));
    }

    let user = state.add_account(&body.username, &body.email, &body.password);
    let token = state.issue_token(&user.id);
    HttpResponse::Ok().json(Envelope::with_data(AuthResponse {
        token,
        user: user.summary(),
    }))
}

async fn logout(state: Data<Mutex<MockState>>, req: HttpRequest) -> HttpResponse {
    let mode = {
        let mut state = state.lock().unwrap();
        state.logout_calls += 1;
        if let Some(token) = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            state.tokens.remove(token);
        }
        state.logout_mode
    };

    match mode {
        LogoutMode::Ok => HttpResponse::Ok().json(Envelope::<Value>::ok()),
        LogoutMode::Fail => HttpResponse::InternalServerError().json(failed("session service down")),
        LogoutMode::Malformed => HttpResponse::Ok().content_type("text/plain").body("bye"),
        LogoutMode::Slow => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            HttpResponse::Ok().json(Envelope::<Value>::ok())
        }
    }
}

async fn refresh(state: Data<Mutex<MockState>>, req: HttpRequest) -> HttpResponse {
    let mut state = state.lock().unwrap();
    let idx = match state.authorized_user(&req) {
        Some(idx) => idx,
        None => return HttpResponse::Unauthorized().json(failed("token expired")),
    };

    if let Some(old) = state.last_authorization.clone() {
        if let Some(old) = old.strip_prefix("Bearer ") {
            state.tokens.remove(old);
        }
    }
    let user = state.accounts[idx].user.clone();
    let token = state.issue_token(&user.id);
    HttpResponse::Ok().json(Envelope::with_data(AuthResponse {
        token,
        user: user.summary(),
    }))
}

async fn get_profile(state: Data<Mutex<MockState>>, req: HttpRequest) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.profile_requests += 1;
    if let Some(body) = state.profile_body.clone() {
        return HttpResponse::Ok().json(body);
    }
    let idx = match state.authorized_user(&req) {
        Some(idx) => idx,
        None => {
            return HttpResponse::Unauthorized().json(failed("unauthorized: invalid token"))
        }
    };
    if let Some(message) = state.profile_failure.clone() {
        return HttpResponse::InternalServerError().json(failed(&message));
    }

    HttpResponse::Ok().json(Envelope::with_data(state.accounts[idx].user.clone()))
}

async fn put_profile(
    state: Data<Mutex<MockState>>,
    req: HttpRequest,
    body: Json<Value>,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.profile_requests += 1;
    let idx = match state.authorized_user(&req) {
        Some(idx) => idx,
        None => {
            return HttpResponse::Unauthorized().json(failed("unauthorized: invalid token"))
        }
    };

    let body = body.into_inner();
    state.last_patch = Some(body.clone());
    let patch: ProfilePatch = match serde_json::from_value(body) {
        Ok(patch) => patch,
        Err(_) => return HttpResponse::BadRequest().json(failed("invalid profile")),
    };

    let user = &mut state.accounts[idx].user;
    if let Some(username) = patch.username {
        user.username = username;
    }
    if let Some(email) = patch.email {
        user.email = email;
    }
    if let Some(avatar) = patch.avatar {
        user.avatar = Some(avatar);
    }
    user.updated_at = String::from("2024-06-01T12:00:00Z");

    HttpResponse::Ok().json(Envelope::with_data(user.clone()))
}
