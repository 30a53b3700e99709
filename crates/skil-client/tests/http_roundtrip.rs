use std::net::{SocketAddr, TcpListener as StdListener};
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use axum::{
    extract::{Multipart, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use skil_client::{
    ComputeBackend, ComputeResource, ConfigStore, Error, MemoryConfigStore, Session,
    SessionOptions,
};
use skil_common::{Credentials, ResourceType};

const TOKEN: &str = "tok-roundtrip";

#[derive(Default)]
struct Recorded {
    authorizations: Vec<Option<String>>,
    added: Vec<Value>,
    deleted: Vec<i64>,
}

type Shared = Arc<Mutex<Recorded>>;

fn check_auth(state: &Shared, headers: &HeaderMap) -> Result<(), StatusCode> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ok = value.as_deref() == Some(format!("Bearer {TOKEN}").as_str());
    state.lock().unwrap().authorizations.push(value);
    if ok {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

fn catalog() -> Vec<Value> {
    vec![
        json!({"resourceId": 1, "resourceName": "emr-prod", "type": "COMPUTE", "subType": "EMR"}),
        json!({"resourceId": 2, "resourceName": "models", "type": "STORAGE", "subType": "S3"}),
        json!({"resourceId": 3, "resourceName": "yarn-lab", "type": "COMPUTE", "subType": "YARN"}),
    ]
}

async fn login(Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    if body["userId"] == "admin" && body["password"] == "admin" {
        Ok(Json(json!({ "token": TOKEN })))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn services(State(state): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    check_auth(&state, &headers)?;
    Ok(Json(json!({
        "serviceInfoList": [
            {"id": "zep-1", "name": "Zeppelin Notebook Server", "status": "STARTED"},
            {"id": "mhs-7", "name": "Model History Server", "status": "STARTED"},
            {"id": "inf-2", "name": "Inference Server", "status": "STOPPED"},
        ]
    })))
}

async fn upload(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, StatusCode> {
    check_auth(&state, &headers)?;
    let mut stored = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.file_name().unwrap_or("unnamed").to_string();
        field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        stored.push(json!({
            "fileName": name,
            "path": format!("/var/skil/storage/{name}"),
            "status": "uploaded",
        }));
    }
    Ok(Json(json!({ "fileUploadResponseList": stored })))
}

async fn by_type(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(kind): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    check_auth(&state, &headers)?;
    let matching: Vec<Value> = catalog()
        .into_iter()
        .filter(|r| r["type"] == kind.as_str())
        .collect();
    Ok(Json(Value::Array(matching)))
}

async fn add(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    check_auth(&state, &headers)?;
    if body["resourceName"] == "" {
        return Err(StatusCode::BAD_REQUEST);
    }
    state.lock().unwrap().added.push(body.clone());
    Ok(Json(json!({
        "resourceId": 42,
        "resourceName": body["resourceName"],
        "type": body["type"],
        "subType": body["subType"],
    })))
}

async fn remove(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    check_auth(&state, &headers)?;
    state.lock().unwrap().deleted.push(id);
    Ok(StatusCode::OK)
}

fn spawn_server() -> (SocketAddr, Shared) {
    let state: Shared = Arc::default();
    let app = Router::new()
        .route("/login", post(login))
        .route("/services", get(services))
        .route("/api/upload/model", post(upload))
        .route("/resources/type/:kind", get(by_type))
        .route("/resources/add", post(add))
        .route("/resources/remove/:id", delete(remove))
        .with_state(state.clone());

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    (rx.recv().unwrap(), state)
}

fn options(addr: SocketAddr) -> SessionOptions {
    SessionOptions::new(addr.ip().to_string(), addr.port())
}

fn scratch_model() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("skil-upload-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("model.zip");
    std::fs::write(&path, b"PK\x03\x04 not really a zip").unwrap();
    path
}

#[test]
fn test_open_discover_and_list_compute() {
    let (addr, state) = spawn_server();
    let store = MemoryConfigStore::new();
    let mut session = Session::open(options(addr), &store).unwrap();

    assert_eq!(session.resolve_default_server().unwrap(), "mhs-7");

    let compute = session.list_compute_resources().unwrap();
    let names: Vec<_> = compute.iter().map(|r| r.resource_name.as_str()).collect();
    assert_eq!(names, ["emr-prod", "yarn-lab"]);
    assert!(compute.iter().all(|r| r.resource_type == ResourceType::Compute));

    let saved = store.load().unwrap().unwrap();
    assert_eq!(saved.host, addr.ip().to_string());
    assert_eq!(saved.port, addr.port());

    let seen = state.lock().unwrap().authorizations.clone();
    assert_eq!(seen.len(), 2);
    assert!(seen
        .iter()
        .all(|h| h.as_deref() == Some(session.authorization().header_value())));

    let reopened = Session::open_from_saved_config(&store).unwrap();
    assert_eq!(reopened.endpoint(), session.endpoint());
}

#[test]
fn test_upload_then_model_path() {
    let (addr, _state) = spawn_server();
    let mut session = Session::open(options(addr), &MemoryConfigStore::new()).unwrap();
    let model = scratch_model();

    session.upload_model(&model).unwrap();

    assert_eq!(
        session.model_path("model.zip").unwrap(),
        "file:///var/skil/storage/model.zip"
    );
    assert_eq!(session.uploaded_model_names().len(), 1);

    std::fs::remove_dir_all(model.parent().unwrap()).unwrap();
}

#[test]
fn test_upload_missing_file_records_nothing() {
    let (addr, state) = spawn_server();
    let mut session = Session::open(options(addr), &MemoryConfigStore::new()).unwrap();
    let missing = std::env::temp_dir()
        .join(format!("skil-upload-{}", uuid::Uuid::new_v4()))
        .join("model.zip");

    let err = session.upload_model(&missing).unwrap_err();
    assert!(matches!(err, Error::RemoteOperation { operation: "model upload", .. }));
    assert!(session.uploads().is_empty());
    assert!(session.uploaded_model_names().is_empty());
    assert!(matches!(session.model_path("model.zip"), Err(Error::NotFound { .. })));
    assert!(state.lock().unwrap().authorizations.is_empty());
}

#[test]
fn test_register_and_delete_compute_resource() {
    let (addr, state) = spawn_server();
    let session = Session::open(options(addr), &MemoryConfigStore::new()).unwrap();

    let resource = ComputeResource::register(
        &session,
        "dataproc-a",
        ComputeBackend::DataProc {
            project_id: "ml-project".to_string(),
            region: "europe-west1".to_string(),
            spark_cluster_name: "spark-a".to_string(),
        },
    )
    .unwrap();
    assert_eq!(resource.id(), 42);

    let rejected = ComputeResource::register(
        &session,
        "",
        ComputeBackend::Yarn {
            local_spark_home: "/opt/spark".to_string(),
        },
    );
    assert_eq!(rejected.unwrap_err().status_code(), Some(400));

    resource.delete(&session).unwrap();

    let recorded = state.lock().unwrap();
    assert_eq!(recorded.added.len(), 1);
    assert_eq!(recorded.added[0]["subType"], "DataProc");
    assert_eq!(recorded.added[0]["resourceDetails"]["sparkClusterName"], "spark-a");
    assert_eq!(recorded.deleted, vec![42]);
}

#[test]
fn test_bad_credentials() {
    let (addr, _state) = spawn_server();
    let store = MemoryConfigStore::new();
    let opts = options(addr).credentials(Credentials::new("admin", "wrong"));

    let err = Session::open(opts, &store).unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
    assert_eq!(err.status_code(), Some(401));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_unreachable_host() {
    let port = {
        let listener = StdListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = Session::open(SessionOptions::new("127.0.0.1", port), &MemoryConfigStore::new())
        .unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
    assert_eq!(err.status_code(), None);
}
