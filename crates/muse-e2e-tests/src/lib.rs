use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::{Result, anyhow};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use muse_client::Page;
use muse_content::{
    asset::{AssetKey, AssetUrl},
    resource::{Resource, ResourceDraft, ResourceId, ResourceShort},
};
use muse_types::{ResourceKind, config::BackendConfig};
use rand::Rng as _;
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;

pub const TEST_TOKEN: &str = "test-token";
pub const CUSTOMER_ID: &str = "cust-1";

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(4030..5030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, std::time::Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

/// Backend error, serialized as `{statusCode, message}`
struct MockError(StatusCode, &'static str);

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "statusCode": self.0.as_u16(),
            "message": self.1,
        }));
        (self.0, body).into_response()
    }
}

type MockResult<T> = std::result::Result<T, MockError>;

#[derive(Default)]
struct MockData {
    resources: HashMap<ResourceKind, Vec<Resource>>,
    assets: HashMap<String, Vec<u8>>,
    synthesized: Vec<PreviewRequest>,
    asset_fetches: Vec<String>,
    next_id: u64,
    corrupt_uploads: bool,
}

/// In memory stand-in for the muse.cloud REST backend
#[derive(Clone, Default)]
pub struct MockBackend {
    data: Arc<Mutex<MockData>>,
}

impl MockBackend {
    fn data(&self) -> MutexGuard<'_, MockData> {
        match self.data.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Synthesis requests received so far, as `(language, markup)`
    pub fn synthesized(&self) -> Vec<(String, String)> {
        self.data()
            .synthesized
            .iter()
            .map(|r| (r.language_code.clone(), r.markup.clone()))
            .collect()
    }

    /// Asset URL requests received so far, as `namespace/key`
    pub fn asset_fetches(&self) -> Vec<String> {
        self.data().asset_fetches.clone()
    }

    pub fn stored(&self, kind: ResourceKind, id: &str) -> Option<Resource> {
        self.data()
            .resources
            .get(&kind)
            .and_then(|all| all.iter().find(|r| r.id.as_ref() == id).cloned())
    }

    pub fn has_asset(&self, path: &str) -> bool {
        self.data().assets.contains_key(path)
    }

    /// Uploads will report a wrong hash
    pub fn corrupt_uploads(&self, corrupt: bool) {
        self.data().corrupt_uploads = corrupt;
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewRequest {
    markup: String,
    #[allow(dead_code)]
    voice: String,
    language_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    page_size: Option<usize>,
    page_key: Option<String>,
    parent_id: Option<String>,
    search: Option<String>,
}

async fn require_token(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h == format!("Bearer {TEST_TOKEN}"));
    if authorized {
        next.run(request).await
    } else {
        MockError(StatusCode::UNAUTHORIZED, "errors.api.unauthorized").into_response()
    }
}

async fn session() -> impl IntoResponse {
    Json(json!({
        "customerId": CUSTOMER_ID,
        "customerName": "Muzeum Narodowe",
        "languages": ["pl-PL", "en-GB", "de-DE"],
    }))
}

fn render_audio(data: &mut MockData, id: &ResourceId, resource: &mut Resource) {
    for content in resource.languages.iter_mut() {
        if let Some(audio) = content.audio.as_mut() {
            if audio.asset_key.is_none() {
                data.next_id += 1;
                let key = format!("audio/{}-{}-{}.mp3", id, content.language_code, data.next_id);
                data.assets
                    .insert(format!("permanent/{key}"), audio.markup.clone().into_bytes());
                audio.asset_key = AssetKey::new(key).ok();
            }
        }
    }
}

fn from_draft(id: ResourceId, version: i64, draft: ResourceDraft) -> Resource {
    Resource {
        id,
        version,
        name: draft.name,
        parent_id: draft.parent_id,
        images: draft.images,
        languages: draft.languages,
    }
}

fn check_draft(kind: ResourceKind, draft: &ResourceDraft) -> MockResult<()> {
    draft
        .check(kind)
        .map_err(|_| MockError(StatusCode::BAD_REQUEST, "errors.validation"))
}

async fn list(
    State((backend, kind)): State<(MockBackend, ResourceKind)>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let data = backend.data();
    let empty = Vec::new();
    let all: Vec<&Resource> = data
        .resources
        .get(&kind)
        .unwrap_or(&empty)
        .iter()
        .filter(|r| {
            params
                .parent_id
                .as_deref()
                .is_none_or(|p| r.parent_id.as_ref().is_some_and(|rp| rp.as_ref() == p))
        })
        .filter(|r| {
            params
                .search
                .as_deref()
                .is_none_or(|s| r.name.to_lowercase().contains(&s.to_lowercase()))
        })
        .collect();
    let start: usize = params
        .page_key
        .as_deref()
        .and_then(|k| k.parse().ok())
        .unwrap_or(0);
    let size = params.page_size.unwrap_or(20).max(1);
    let end = (start + size).min(all.len());
    let items = all[start.min(end)..end]
        .iter()
        .map(|r| ResourceShort {
            id: r.id.clone(),
            name: r.name.clone(),
            languages: r.languages.iter().map(|l| l.language_code).collect(),
        })
        .collect();
    Json(Page {
        items,
        next_page_key: (end < all.len()).then(|| end.to_string()),
    })
}

async fn create(
    State((backend, kind)): State<(MockBackend, ResourceKind)>,
    Json(draft): Json<ResourceDraft>,
) -> MockResult<impl IntoResponse> {
    check_draft(kind, &draft)?;
    let mut data = backend.data();
    data.next_id += 1;
    let id = ResourceId::new(format!("{}-{}", kind.as_str(), data.next_id));
    let mut resource = from_draft(id.clone(), 1, draft);
    render_audio(&mut data, &id, &mut resource);
    data.resources.entry(kind).or_default().push(resource.clone());
    debug!("Created {kind} {id}");
    Ok((StatusCode::CREATED, Json(resource)))
}

async fn get_one(
    State((backend, kind)): State<(MockBackend, ResourceKind)>,
    Path(id): Path<String>,
) -> MockResult<Json<Resource>> {
    backend
        .stored(kind, &id)
        .map(Json)
        .ok_or(MockError(StatusCode::NOT_FOUND, "errors.api.not_found"))
}

async fn update(
    State((backend, kind)): State<(MockBackend, ResourceKind)>,
    Path(id): Path<String>,
    Json(draft): Json<ResourceDraft>,
) -> MockResult<Json<Resource>> {
    check_draft(kind, &draft)?;
    let mut data = backend.data();
    let current = data
        .resources
        .get(&kind)
        .and_then(|all| all.iter().find(|r| r.id.as_ref() == id))
        .map(|r| r.version)
        .ok_or(MockError(StatusCode::NOT_FOUND, "errors.api.not_found"))?;
    if draft.version != Some(current) {
        return Err(MockError(StatusCode::CONFLICT, "errors.api.conflict"));
    }
    let id = ResourceId::new(id);
    let mut resource = from_draft(id.clone(), current + 1, draft);
    render_audio(&mut data, &id, &mut resource);
    if let Some(slot) = data
        .resources
        .get_mut(&kind)
        .and_then(|all| all.iter_mut().find(|r| r.id == id))
    {
        *slot = resource.clone();
    }
    Ok(Json(resource))
}

async fn delete(
    State((backend, kind)): State<(MockBackend, ResourceKind)>,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    let mut data = backend.data();
    let all = data.resources.entry(kind).or_default();
    let before = all.len();
    all.retain(|r| r.id.as_ref() != id);
    if all.len() == before {
        Err(MockError(StatusCode::NOT_FOUND, "errors.api.not_found"))
    } else {
        Ok(StatusCode::NO_CONTENT)
    }
}

async fn preview(
    State(backend): State<MockBackend>,
    Json(request): Json<PreviewRequest>,
) -> MockResult<impl IntoResponse> {
    if request.markup.contains("<fail/>") {
        return Err(MockError(StatusCode::BAD_GATEWAY, "errors.audio.synthesis"));
    }
    let mut data = backend.data();
    data.next_id += 1;
    let key = format!("preview/{}.mp3", data.next_id);
    data.assets
        .insert(format!("temporary/{key}"), request.markup.clone().into_bytes());
    data.synthesized.push(request);
    Ok(Json(json!({ "assetKey": key })))
}

async fn asset_url(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path((namespace, key)): Path<(String, String)>,
) -> MockResult<Json<AssetUrl>> {
    let path = format!("{namespace}/{key}");
    let mut data = backend.data();
    if !data.assets.contains_key(&path) {
        return Err(MockError(StatusCode::NOT_FOUND, "errors.api.not_found"));
    }
    data.asset_fetches.push(path.clone());
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let url = format!("http://{host}/files/{path}?signature=test")
        .parse()
        .map_err(|_| MockError(StatusCode::INTERNAL_SERVER_ERROR, "errors.unexpected"))?;
    Ok(Json(AssetUrl {
        url,
        expires_at: Some(time::OffsetDateTime::now_utc() + time::Duration::minutes(15)),
    }))
}

async fn upload(
    State(backend): State<MockBackend>,
    Path((namespace, name)): Path<(String, String)>,
    body: Bytes,
) -> MockResult<impl IntoResponse> {
    if namespace != "temporary" || name.contains('/') {
        return Err(MockError(StatusCode::FORBIDDEN, "errors.api.forbidden"));
    }
    let mut data = backend.data();
    data.next_id += 1;
    let key = format!("images/{}-{name}", data.next_id);
    let hash = if data.corrupt_uploads {
        "0".repeat(64)
    } else {
        base16ct::lower::encode_string(&Sha256::digest(&body))
    };
    let size = body.len();
    data.assets.insert(format!("temporary/{key}"), body.to_vec());
    Ok((
        StatusCode::CREATED,
        Json(json!({ "assetKey": key, "size": size, "hash": hash })),
    ))
}

fn resource_router(backend: MockBackend, kind: ResourceKind) -> Router<MockBackend> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
        .with_state((backend, kind))
}

pub fn mock_router(backend: MockBackend) -> Router<()> {
    Router::new()
        .nest(
            "/api/institution",
            resource_router(backend.clone(), ResourceKind::Institution),
        )
        .nest(
            "/api/exhibition",
            resource_router(backend.clone(), ResourceKind::Exhibition),
        )
        .nest(
            "/api/exhibit",
            resource_router(backend.clone(), ResourceKind::Exhibit),
        )
        .route("/api/session", get(session))
        .route("/api/audio/preview", post(preview))
        .route("/api/asset/{namespace}/{*key}", get(asset_url).post(upload))
        .with_state(backend)
        .layer(middleware::from_fn(require_token))
}

/// Starts mock backend on a free port, returns its API base URL
pub async fn launch_backend() -> Result<(Url, MockBackend)> {
    let backend = MockBackend::default();
    let port = random_port()?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let base_url: Url = format!("http://127.0.0.1:{port}/").parse()?;
    let app = mock_router(backend.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Mock backend failed: {e}");
        }
    });
    debug!("Mock backend listening on {base_url}");
    Ok((base_url, backend))
}

pub fn test_config(base_url: &Url) -> BackendConfig {
    BackendConfig::new(base_url.clone(), Some(TEST_TOKEN.to_string()))
}
