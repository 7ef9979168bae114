//! Tests for the PostgREST-backed store against a fake backend
//!
//! The fake speaks just enough PostgREST for the five store operations:
//! `select`/`order`/`limit` on GET, `id=eq.{id}` on PATCH and DELETE, and
//! the `{code, message}` error body.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use inventory::prelude::*;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

// =============================================================================
// Fake PostgREST backend
// =============================================================================

const API_KEY: &str = "test-anon-key";

#[derive(Clone, Default)]
struct FakeBackend {
    rows: Arc<Mutex<Vec<Value>>>,
    table_missing: bool,
    reject_writes: bool,
}

fn missing_table() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "code": "42P01",
            "message": "relation \"public.shirts\" does not exist",
            "details": null,
            "hint": null
        })),
    )
        .into_response()
}

fn rejected() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "code": "42501",
            "message": "new row violates row-level security policy",
            "details": null,
            "hint": null
        })),
    )
        .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    let expected = format!("Bearer {}", API_KEY);
    apikey == Some(API_KEY) && bearer == Some(expected.as_str())
}

fn id_filter(params: &HashMap<String, String>) -> Option<String> {
    params
        .get("id")
        .and_then(|v| v.strip_prefix("eq."))
        .map(str::to_string)
}

fn created_at(row: &Value) -> DateTime<Utc> {
    row["created_at"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

async fn select(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if backend.table_missing {
        return missing_table();
    }

    let mut rows = backend.rows.lock().unwrap().clone();
    if params.get("order").map(String::as_str) == Some("created_at.desc") {
        rows.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
    }
    if let Some(limit) = params.get("limit").and_then(|l| l.parse().ok()) {
        rows.truncate(limit);
    }
    if params.get("select").map(String::as_str) == Some("id") {
        rows = rows.into_iter().map(|r| json!({ "id": r["id"] })).collect();
    }
    Json(rows).into_response()
}

async fn insert(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(row): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if backend.table_missing {
        return missing_table();
    }
    if backend.reject_writes {
        return rejected();
    }

    backend.rows.lock().unwrap().push(row.clone());
    (StatusCode::CREATED, Json(vec![row])).into_response()
}

async fn patch(
    State(backend): State<FakeBackend>,
    Query(params): Query<HashMap<String, String>>,
    Json(changes): Json<Value>,
) -> Response {
    if backend.reject_writes {
        return rejected();
    }
    let Some(id) = id_filter(&params) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut rows = backend.rows.lock().unwrap();
    let mut updated = Vec::new();
    for row in rows.iter_mut().filter(|r| r["id"] == id.as_str()) {
        if let (Some(row), Some(changes)) = (row.as_object_mut(), changes.as_object()) {
            for (key, value) in changes {
                row.insert(key.clone(), value.clone());
            }
        }
        updated.push(row.clone());
    }
    Json(updated).into_response()
}

async fn remove(
    State(backend): State<FakeBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if backend.reject_writes {
        return rejected();
    }
    let Some(id) = id_filter(&params) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    backend.rows.lock().unwrap().retain(|r| r["id"] != id.as_str());
    StatusCode::NO_CONTENT.into_response()
}

/// Serve the fake on an ephemeral port and return a store pointed at it
async fn spawn_backend(backend: FakeBackend) -> RestGarmentStore {
    let app = Router::new()
        .route(
            "/rest/v1/shirts",
            get(select).post(insert).patch(patch).delete(remove),
        )
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    RestGarmentStore::new(BackendConfig {
        url: format!("http://{}/", addr),
        api_key: API_KEY.to_string(),
        ..BackendConfig::default()
    })
    .unwrap()
}

fn ana_silva() -> NewGarment {
    NewGarment {
        name: "Ana Silva".to_string(),
        size: Size::Medium,
        color: "Rosa".to_string(),
        material: "Algodão".to_string(),
        quantity: 1,
        price: 39.90,
        description: None,
        paid: false,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_create_then_list() {
    let backend = FakeBackend::default();
    let store = spawn_backend(backend.clone()).await;

    let created = store.create(ana_silva()).await.unwrap();
    assert_eq!(created.name, "Ana Silva");
    assert_eq!(created.size, Size::Medium);
    assert!(!created.paid);

    let listed = store.list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(backend.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let store = spawn_backend(FakeBackend::default()).await;

    let first = store.create(ana_silva()).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store.create(ana_silva()).await.unwrap();

    let ids: Vec<Uuid> = store.list().await.into_iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_null_paid_reads_as_false() {
    let backend = FakeBackend::default();
    backend.rows.lock().unwrap().push(json!({
        "id": Uuid::new_v4(),
        "name": "Legacy",
        "size": "G",
        "color": "Preto",
        "material": "Lã",
        "quantity": 3,
        "price": 99.5,
        "description": null,
        "paid": null,
        "created_at": "2024-03-01T12:00:00+00:00"
    }));
    let store = spawn_backend(backend).await;

    let listed = store.list().await;
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].paid);
    assert_eq!(listed[0].size, Size::Large);
}

#[tokio::test]
async fn test_unreadable_rows_are_skipped() {
    let backend = FakeBackend::default();
    let row = |name: &str, size: &str, quantity: i64| {
        json!({
            "id": Uuid::new_v4(),
            "name": name,
            "size": size,
            "color": "Preto",
            "material": "Lã",
            "quantity": quantity,
            "price": 99.5,
            "description": null,
            "paid": false,
            "created_at": "2024-03-01T12:00:00+00:00"
        })
    };
    backend.rows.lock().unwrap().extend([
        row("Bad size", "XL", 1),
        row("Good", "P", 2),
        row("Bad quantity", "M", -1),
    ]);
    let store = spawn_backend(backend).await;

    let listed = store.list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Good");
    assert_eq!(listed[0].size, Size::Small);
}

#[tokio::test]
async fn test_update_returns_confirmed_row() {
    let store = spawn_backend(FakeBackend::default()).await;
    let created = store.create(ana_silva()).await.unwrap();

    let mut changed = created.clone();
    changed.paid = true;
    changed.quantity = 4;

    let updated = store.update(changed).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert!(updated.paid);
    assert_eq!(updated.quantity, 4);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let store = spawn_backend(FakeBackend::default()).await;
    let ghost = ana_silva().into_garment(Uuid::new_v4(), Utc::now());

    let err = store.update(ghost).await.unwrap_err();
    assert!(matches!(err, InventoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = spawn_backend(FakeBackend::default()).await;
    let created = store.create(ana_silva()).await.unwrap();

    store.delete(&created.id).await.unwrap();
    assert!(store.list().await.is_empty());
    store.delete(&created.id).await.unwrap();
}

#[tokio::test]
async fn test_table_exists() {
    let store = spawn_backend(FakeBackend::default()).await;
    assert!(store.is_configured());
    assert!(store.table_exists().await);
}

#[tokio::test]
async fn test_missing_table_lists_empty_and_probes_false() {
    let store = spawn_backend(FakeBackend {
        table_missing: true,
        ..FakeBackend::default()
    })
    .await;

    assert!(store.list().await.is_empty());
    assert!(!store.table_exists().await);
}

#[tokio::test]
async fn test_rejected_write_surfaces_backend_message() {
    let store = spawn_backend(FakeBackend {
        reject_writes: true,
        ..FakeBackend::default()
    })
    .await;

    let err = store.create(ana_silva()).await.unwrap_err();
    assert!(matches!(err, InventoryError::StorageUnavailable { .. }));
    assert!(err.to_string().contains("row-level security"));
    assert!(store.table_exists().await);
}

#[tokio::test]
async fn test_wrong_key_is_storage_error() {
    let backend = FakeBackend::default();
    let store = spawn_backend(backend).await;
    let config = BackendConfig {
        api_key: "wrong".to_string(),
        ..store.config().clone()
    };
    let store = RestGarmentStore::new(config).unwrap();

    assert!(store.list().await.is_empty());
    assert!(matches!(
        store.create(ana_silva()).await,
        Err(InventoryError::StorageUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_backend_degrades() {
    // Bind then drop to get a port nothing listens on
    let addr = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap();
    let store = RestGarmentStore::new(BackendConfig {
        url: format!("http://{}", addr),
        api_key: API_KEY.to_string(),
        timeout_secs: 1,
        ..BackendConfig::default()
    })
    .unwrap();

    assert!(store.list().await.is_empty());
    assert!(store.table_exists().await);
    assert!(store.create(ana_silva()).await.is_err());
}

#[tokio::test]
async fn test_cached_store_over_rest() {
    let store = CachedGarmentStore::new(spawn_backend(FakeBackend::default()).await);
    let mut events = store.events().subscribe();

    let created = store.create(ana_silva()).await.unwrap();
    assert_eq!(store.list().await.len(), 1);
    assert!(store.is_cached());

    store.delete(&created.id).await.unwrap();
    assert!(!store.is_cached());
    assert!(store.list().await.is_empty());

    assert_eq!(events.recv().await.unwrap().event, GarmentEvent::Created { id: created.id });
    assert_eq!(events.recv().await.unwrap().event, GarmentEvent::Deleted { id: created.id });
}
