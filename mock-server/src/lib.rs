use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Prefix every route is mounted under, mirroring the real backend.
pub const API_PREFIX: &str = "/api/v1";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub name: String,
    pub max_users: u32,
    pub active: bool,
}

#[derive(Deserialize)]
pub struct CreateSession {
    pub name: String,
    #[serde(default = "default_max_users")]
    pub max_users: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Deserialize)]
pub struct UpdateSession {
    pub name: Option<String>,
    pub max_users: Option<u32>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct ListSessions {
    pub active: Option<bool>,
}

/// Everything the echo endpoint saw about a request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

fn default_max_users() -> u32 {
    8
}

fn default_active() -> bool {
    true
}

pub type Db = Arc<RwLock<HashMap<Uuid, Session>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    let api = Router::new()
        .route("/echo", any(echo))
        .route("/sessions", get(list_sessions).post(create_session))
        .route(
            "/sessions/{id}",
            get(get_session)
                .put(update_session)
                .patch(update_session)
                .delete(delete_session),
        )
        .with_state(db);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Accept any non-empty bearer token.
fn authorize(headers: &HeaderMap) -> Result<(), StatusCode> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();
    if token.trim().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

async fn echo(
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
    body: String,
) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or(Value::String(body))
    };
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers,
        body,
    })
}

async fn list_sessions(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListSessions>,
) -> Result<Json<Vec<Session>>, StatusCode> {
    authorize(&headers)?;
    let sessions = db.read().await;
    let mut listed: Vec<Session> = sessions
        .values()
        .filter(|s| params.active.map_or(true, |active| s.active == active))
        .cloned()
        .collect();
    listed.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(listed))
}

async fn create_session(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateSession>,
) -> Result<(StatusCode, Json<Session>), StatusCode> {
    authorize(&headers)?;
    let session = Session {
        id: Uuid::new_v4(),
        name: input.name,
        max_users: input.max_users,
        active: input.active,
    };
    db.write().await.insert(session.id, session.clone());
    tracing::debug!(id = %session.id, "session created");
    Ok((StatusCode::CREATED, Json(session)))
}

async fn get_session(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, StatusCode> {
    authorize(&headers)?;
    let sessions = db.read().await;
    sessions.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_session(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSession>,
) -> Result<Json<Session>, StatusCode> {
    authorize(&headers)?;
    let mut sessions = db.write().await;
    let session = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        session.name = name;
    }
    if let Some(max_users) = input.max_users {
        session.max_users = max_users;
    }
    if let Some(active) = input.active {
        session.active = active;
    }
    Ok(Json(session.clone()))
}

async fn delete_session(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    authorize(&headers)?;
    let mut sessions = db.write().await;
    sessions
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
