//! In-memory emulation of the social REST resources.
//!
//! Serves identities and activities under
//! `/rest/private/api/social/v1-alpha3/portal/` behind basic authentication.
//! Identities are read-only and seeded at startup; activities are created
//! and destroyed by the authenticated user.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub const PRIVATE_BASE: &str = "/rest/private/api/social/v1-alpha3/portal";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub provider_id: String,
    pub remote_id: String,
    pub profile: Profile,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub identity_id: String,
    pub posted_time: u64,
    pub liked: bool,
}

#[derive(Deserialize)]
pub struct CreateActivity {
    pub title: String,
}

#[derive(Serialize, Deserialize)]
pub struct IdentityId {
    pub id: String,
}

struct User {
    password: String,
    identity_id: String,
}

#[derive(Default)]
pub struct Store {
    identities: HashMap<String, Identity>,
    users: HashMap<String, User>,
    activities: HashMap<String, Activity>,
}

impl Store {
    /// Register an organization user with a matching identity.
    pub fn add_user(&mut self, username: &str, password: &str, full_name: &str) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.identities.insert(
            id.clone(),
            Identity {
                id: id.clone(),
                provider_id: "organization".to_string(),
                remote_id: username.to_string(),
                profile: Profile {
                    full_name: full_name.to_string(),
                    avatar_url: None,
                },
            },
        );
        self.users.insert(
            username.to_string(),
            User {
                password: password.to_string(),
                identity_id: id.clone(),
            },
        );
        id
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Router seeded with the `demo` and `john` users, both with password `gtn`.
pub fn app() -> Router {
    let mut store = Store::default();
    store.add_user("demo", "gtn", "Demo gtn");
    store.add_user("john", "gtn", "John Anthony");
    app_with(store)
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let private = Router::new()
        .route("/identity/{file}", get(get_identity))
        .route("/identity/{provider}/{remote}/id/show.json", get(get_identity_id))
        .route("/activity.json", post(create_activity))
        .route("/activity/{file}", get(get_activity))
        .route("/activity/destroy/{file}", post(destroy_activity));
    Router::new().nest(PRIVATE_BASE, private).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Identity id of the basic-auth user, or 401.
fn authenticate(store: &Store, headers: &HeaderMap) -> Result<String, StatusCode> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let token = value.strip_prefix("Basic ").ok_or(StatusCode::UNAUTHORIZED)?;
    let decoded = STANDARD.decode(token).map_err(|_| StatusCode::UNAUTHORIZED)?;
    let decoded = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;
    let (username, password) = decoded.split_once(':').ok_or(StatusCode::UNAUTHORIZED)?;
    match store.users.get(username) {
        Some(user) if user.password == password => Ok(user.identity_id.clone()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn json_id(file: &str) -> Result<&str, StatusCode> {
    file.strip_suffix(".json")
        .filter(|id| !id.is_empty())
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_identity(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(file): Path<String>,
) -> Result<Json<Identity>, StatusCode> {
    let store = db.read().await;
    authenticate(&store, &headers)?;
    let id = json_id(&file)?;
    store.identities.get(id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_identity_id(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((provider, remote)): Path<(String, String)>,
) -> Result<Json<IdentityId>, StatusCode> {
    let store = db.read().await;
    authenticate(&store, &headers)?;
    store
        .identities
        .values()
        .find(|identity| identity.provider_id == provider && identity.remote_id == remote)
        .map(|identity| Json(IdentityId { id: identity.id.clone() }))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_activity(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateActivity>,
) -> Result<Json<Activity>, StatusCode> {
    let mut store = db.write().await;
    let identity_id = authenticate(&store, &headers)?;
    let posted_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let activity = Activity {
        id: Uuid::new_v4().simple().to_string(),
        title: input.title,
        identity_id,
        posted_time,
        liked: false,
    };
    debug!(id = %activity.id, owner = %activity.identity_id, "activity created");
    store.activities.insert(activity.id.clone(), activity.clone());
    Ok(Json(activity))
}

async fn get_activity(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(file): Path<String>,
) -> Result<Json<Activity>, StatusCode> {
    let store = db.read().await;
    authenticate(&store, &headers)?;
    let id = json_id(&file)?;
    store.activities.get(id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn destroy_activity(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(file): Path<String>,
) -> Result<Json<Activity>, StatusCode> {
    let mut store = db.write().await;
    let caller = authenticate(&store, &headers)?;
    let id = json_id(&file)?.to_string();
    match store.activities.get(&id) {
        None => return Err(StatusCode::NOT_FOUND),
        Some(activity) if activity.identity_id != caller => return Err(StatusCode::FORBIDDEN),
        Some(_) => {}
    }
    debug!(%id, "activity destroyed");
    store.activities.remove(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}
