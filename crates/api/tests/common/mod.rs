#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use tradeoff_api::auth::jwt::JwtConfig;
use tradeoff_api::config::{ServerConfig, StoreBackend};
use tradeoff_api::router::build_app_router;
use tradeoff_api::state::AppState;
use tradeoff_core::score_input::ValidScore;
use tradeoff_core::seeding::ScoreSeed;
use tradeoff_core::types::{DbId, UserId};
use tradeoff_db::models::choice::{Choice, NewChoice, UpdateChoice};
use tradeoff_db::models::criterion::{Criterion, NewCriterion, UpdateCriterion};
use tradeoff_db::models::project::{CreateProject, Project, UpdateProject};
use tradeoff_db::models::score::Score;
use tradeoff_db::store::{
    DecisionStore, MemoryStore, ProjectItemQuery, ProjectQuery, ScoreQuery, StoreError,
    StoreResult,
};

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_timeout_secs: 1,
        seed_default_scores: true,
        store_backend: StoreBackend::Memory,
        session_cookie_name: "sb-auth-token".to_string(),
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            audience: None,
        },
    }
}

/// [`test_config`] with default score seeding turned off.
pub fn test_config_without_seeding() -> ServerConfig {
    ServerConfig {
        seed_default_scores: false,
        ..test_config()
    }
}

/// Full application router over a fresh in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(MemoryStore::new()), test_config())
}

/// Full application router over the given store and config, with the same
/// middleware stack production uses.
pub fn build_test_app_with(store: Arc<dyn DecisionStore>, config: ServerConfig) -> Router {
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Sign a session token for `user`, valid for ten minutes.
pub fn token_for(user: UserId) -> String {
    let exp = chrono::Utc::now().timestamp() + 600;
    encode(
        &Header::default(),
        &json!({
            "sub": user,
            "email": format!("{user}@test.local"),
            "role": "authenticated",
            "exp": exp,
        }),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("token encoding should succeed")
}

/// A fresh user id with a matching token.
pub fn new_user() -> (UserId, String) {
    let user = Uuid::new_v4();
    (user, token_for(user))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixture builders (through the HTTP surface)
// ---------------------------------------------------------------------------

pub async fn create_project(app: &Router, token: &str, title: &str) -> DbId {
    let response =
        post_json_auth(app.clone(), "/api/v1/projects", token, json!({ "title": title })).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create criteria `(definition, weight)` and return their ids in order.
pub async fn create_criteria(
    app: &Router,
    token: &str,
    project_id: DbId,
    criteria: &[(&str, Option<f64>)],
) -> Vec<DbId> {
    let criteria: Vec<Value> = criteria
        .iter()
        .map(|(definition, weight)| json!({ "definition": definition, "weight": weight }))
        .collect();
    let response = post_json_auth(
        app.clone(),
        "/api/v1/criteria",
        token,
        json!({ "project_id": project_id, "criteria": criteria }),
    )
    .await;
    assert_eq!(response.status(), 201);
    ids(body_json(response).await)
}

/// Create choices by description and return their ids in order.
pub async fn create_choices(
    app: &Router,
    token: &str,
    project_id: DbId,
    descriptions: &[&str],
) -> Vec<DbId> {
    let choices: Vec<Value> = descriptions
        .iter()
        .map(|description| json!({ "description": description }))
        .collect();
    let response = post_json_auth(
        app.clone(),
        "/api/v1/choices",
        token,
        json!({ "project_id": project_id, "choices": choices }),
    )
    .await;
    assert_eq!(response.status(), 201);
    ids(body_json(response).await)
}

pub async fn put_score(
    app: &Router,
    token: &str,
    criteria_id: DbId,
    choice_id: DbId,
    score: i64,
) -> Response<Body> {
    put_json_auth(
        app.clone(),
        "/api/v1/scores",
        token,
        json!({ "criteria_id": criteria_id, "choice_id": choice_id, "score": score }),
    )
    .await
}

fn ids(body: Value) -> Vec<DbId> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Fault injection
// ---------------------------------------------------------------------------

/// Wraps a [`MemoryStore`] and injects failures into selected operations.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    /// Every `insert_default_scores` call fails.
    pub fail_seeding: bool,
    /// `insert_default_scores` sleeps this long before answering.
    pub slow_seeding: Option<Duration>,
    /// Every `upsert_score` call fails with a constraint error.
    pub fail_upsert: bool,
    /// `list_scores` sleeps this long before answering.
    pub slow_scores: Option<Duration>,
    /// Count of `list_criteria`, `list_choices` and `list_scores` calls.
    pub item_lists: AtomicUsize,
}

impl FaultyStore {
    pub fn item_list_calls(&self) -> usize {
        self.item_lists.load(Ordering::SeqCst)
    }

    fn count_item_list(&self) {
        self.item_lists.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DecisionStore for FaultyStore {
    async fn health_check(&self) -> StoreResult<()> {
        self.inner.health_check().await
    }

    async fn list_projects(&self, query: &ProjectQuery) -> StoreResult<Vec<Project>> {
        self.inner.list_projects(query).await
    }

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        self.inner.find_project(id).await
    }

    async fn create_project(&self, owner: UserId, input: &CreateProject) -> StoreResult<Project> {
        self.inner.create_project(owner, input).await
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> StoreResult<Option<Project>> {
        self.inner.update_project(id, input).await
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        self.inner.delete_project(id).await
    }

    async fn list_criteria(&self, query: &ProjectItemQuery) -> StoreResult<Vec<Criterion>> {
        self.count_item_list();
        self.inner.list_criteria(query).await
    }

    async fn find_criterion(&self, id: DbId) -> StoreResult<Option<Criterion>> {
        self.inner.find_criterion(id).await
    }

    async fn create_criteria(
        &self,
        owner: UserId,
        project_id: DbId,
        inputs: &[NewCriterion],
    ) -> StoreResult<Vec<Criterion>> {
        self.inner.create_criteria(owner, project_id, inputs).await
    }

    async fn update_criterion(
        &self,
        id: DbId,
        input: &UpdateCriterion,
    ) -> StoreResult<Option<Criterion>> {
        self.inner.update_criterion(id, input).await
    }

    async fn delete_criterion(&self, id: DbId) -> StoreResult<bool> {
        self.inner.delete_criterion(id).await
    }

    async fn list_choices(&self, query: &ProjectItemQuery) -> StoreResult<Vec<Choice>> {
        self.count_item_list();
        self.inner.list_choices(query).await
    }

    async fn find_choice(&self, id: DbId) -> StoreResult<Option<Choice>> {
        self.inner.find_choice(id).await
    }

    async fn create_choices(
        &self,
        owner: UserId,
        project_id: DbId,
        inputs: &[NewChoice],
    ) -> StoreResult<Vec<Choice>> {
        self.inner.create_choices(owner, project_id, inputs).await
    }

    async fn update_choice(&self, id: DbId, input: &UpdateChoice) -> StoreResult<Option<Choice>> {
        self.inner.update_choice(id, input).await
    }

    async fn delete_choice(&self, id: DbId) -> StoreResult<bool> {
        self.inner.delete_choice(id).await
    }

    async fn list_scores(&self, query: &ScoreQuery) -> StoreResult<Vec<Score>> {
        self.count_item_list();
        if let Some(delay) = self.slow_scores {
            tokio::time::sleep(delay).await;
        }
        self.inner.list_scores(query).await
    }

    async fn upsert_score(&self, owner: UserId, input: &ValidScore) -> StoreResult<Score> {
        if self.fail_upsert {
            return Err(StoreError::Constraint {
                operation: "upsert_score",
                detail: "injected failure".into(),
            });
        }
        self.inner.upsert_score(owner, input).await
    }

    async fn insert_default_scores(&self, owner: UserId, seeds: &[ScoreSeed]) -> StoreResult<u64> {
        if let Some(delay) = self.slow_seeding {
            tokio::time::sleep(delay).await;
        }
        if self.fail_seeding {
            return Err(StoreError::Constraint {
                operation: "insert_default_scores",
                detail: "injected failure".into(),
            });
        }
        self.inner.insert_default_scores(owner, seeds).await
    }
}
