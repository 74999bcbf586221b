use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use gatekeep::router::init_router;
use gatekeep::state::AppState;
use gatekeep_config::JwtConfig;
use gatekeep_core::{BcryptCredentialStore, CredentialError, CredentialStore};
use gatekeep_db::{InMemoryTenantRepository, RepositoryError, RepositoryResult, TenantRepository};
use gatekeep_models::{
    Application, ApplicationId, NewRole, NewUser, Role, RoleAssignment, User, UserRoleRow,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-battery";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-at-least-32-chars".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn generate_unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}.{}", &uuid::Uuid::new_v4().simple().to_string()[..8], email)
}

#[allow(dead_code)]
pub fn generate_name() -> String {
    Name().fake()
}

/// In-memory repository that fails chosen operations.
#[derive(Default)]
pub struct FaultyRepository {
    pub inner: InMemoryTenantRepository,
    failing_roles: Vec<&'static str>,
    fail_assignments: bool,
}

#[allow(dead_code)]
impl FaultyRepository {
    pub fn failing_roles(names: &[&'static str]) -> Self {
        Self {
            failing_roles: names.to_vec(),
            ..Self::default()
        }
    }

    pub fn failing_assignments() -> Self {
        Self {
            fail_assignments: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl TenantRepository for FaultyRepository {
    async fn create_application(&self, name: &str) -> RepositoryResult<Application> {
        self.inner.create_application(name).await
    }

    async fn list_applications(&self) -> RepositoryResult<Vec<Application>> {
        self.inner.list_applications().await
    }

    async fn create_role(&self, role: NewRole) -> RepositoryResult<Role> {
        if self.failing_roles.contains(&role.name.as_str()) {
            return Err(RepositoryError::Unavailable(format!(
                "injected failure creating {}",
                role.name
            )));
        }
        self.inner.create_role(role).await
    }

    async fn find_role_by_name(
        &self,
        application_id: ApplicationId,
        name: &str,
    ) -> RepositoryResult<Option<Role>> {
        self.inner.find_role_by_name(application_id, name).await
    }

    async fn list_roles(&self, application_id: ApplicationId) -> RepositoryResult<Vec<Role>> {
        self.inner.list_roles(application_id).await
    }

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        self.inner.create_user(user).await
    }

    async fn list_users_by_application(
        &self,
        application_id: ApplicationId,
    ) -> RepositoryResult<Vec<User>> {
        self.inner.list_users_by_application(application_id).await
    }

    async fn create_role_assignment(
        &self,
        assignment: RoleAssignment,
    ) -> RepositoryResult<RoleAssignment> {
        if self.fail_assignments {
            return Err(RepositoryError::Unavailable(
                "injected failure creating assignment".to_string(),
            ));
        }
        self.inner.create_role_assignment(assignment).await
    }

    async fn find_user_role_rows(
        &self,
        application_id: ApplicationId,
        email: &str,
    ) -> RepositoryResult<Vec<UserRoleRow>> {
        self.inner.find_user_role_rows(application_id, email).await
    }
}

/// Bcrypt store that counts how often `verify` runs.
#[allow(dead_code)]
pub struct CountingCredentialStore {
    inner: BcryptCredentialStore,
    verifications: AtomicUsize,
}

#[allow(dead_code)]
impl CountingCredentialStore {
    pub fn new() -> Self {
        Self {
            inner: BcryptCredentialStore::with_cost(4),
            verifications: AtomicUsize::new(0),
        }
    }

    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for CountingCredentialStore {
    async fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        self.inner.hash(plaintext).await
    }

    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, CredentialError> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(plaintext, digest).await
    }

    async fn decoy_digest(&self) -> Result<String, CredentialError> {
        self.inner.decoy_digest().await
    }
}

pub struct TestApp {
    pub router: Router,
    pub repository: Arc<dyn TenantRepository>,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        Self::with_repository(Arc::new(InMemoryTenantRepository::new()))
    }

    pub fn with_repository(repository: Arc<dyn TenantRepository>) -> Self {
        Self::with_parts(repository, Arc::new(BcryptCredentialStore::with_cost(4)))
    }

    pub fn with_credentials(credentials: Arc<dyn CredentialStore>) -> Self {
        Self::with_parts(Arc::new(InMemoryTenantRepository::new()), credentials)
    }

    fn with_parts(
        repository: Arc<dyn TenantRepository>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let state =
            AppState::new(repository.clone(), test_jwt_config()).with_credentials(credentials);

        Self {
            router: init_router(state),
            repository,
        }
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    /// Bootstraps an application and returns the provisioning response.
    pub async fn bootstrap(&self, name: &str) -> Value {
        let (status, body) = self
            .send("POST", "/api/applications", Some(json!({ "name": name })), None)
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    pub async fn bootstrap_id(&self, name: &str) -> String {
        self.bootstrap(name).await["application"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn register(
        &self,
        application_id: &str,
        email: &str,
        initial_user: bool,
    ) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/api/users",
            Some(json!({
                "name": generate_name(),
                "email": email,
                "password": PASSWORD,
                "application_id": application_id,
                "initial_user": initial_user,
            })),
            None,
        )
        .await
    }

    pub async fn login(
        &self,
        application_id: &str,
        email: &str,
        password: &str,
    ) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/api/auth/login",
            Some(json!({
                "email": email,
                "password": password,
                "application_id": application_id,
            })),
            None,
        )
        .await
    }

    /// Registers a user and logs it in, returning its access token.
    pub async fn token_for(&self, application_id: &str, email: &str, initial_user: bool) -> String {
        let (status, body) = self.register(application_id, email, initial_user).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        let (status, body) = self.login(application_id, email, PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }
}

/// Scopes carried by a token, as reported by `/api/users/me`, sorted.
#[allow(dead_code)]
pub async fn scopes_of(app: &TestApp, token: &str) -> Vec<String> {
    let (status, body) = app.send("GET", "/api/users/me", None, Some(token)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let mut scopes: Vec<String> = body["scopes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap().to_string())
        .collect();
    scopes.sort();
    scopes
}
