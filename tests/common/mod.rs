//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use persons_gateway::config::GatewayConfig;
use persons_gateway::connectors::{ChannelTransport, KafkaProducer, OutboundMessage, RestConnector};
use persons_gateway::http::HttpServer;
use persons_gateway::lifecycle::{build_manager_with, Shutdown};

/// Id for which the mock person service answers 500.
pub const BROKEN_ID: &str = "boom";

/// Id for which the mock person service answers after [`SLOW_DELAY`].
pub const SLOW_ID: &str = "slow";

pub const SLOW_DELAY: Duration = Duration::from_millis(2500);

/// Id for which the mock person service answers 200 with a payload that is not a person.
pub const MALFORMED_ID: &str = "malformed";

/// Observable state of the mock person service.
#[derive(Default)]
pub struct MockPersons {
    persons: Mutex<HashMap<String, Value>>,
    pub gets: AtomicU32,
    pub deletes: AtomicU32,
    request_ids: Mutex<Vec<String>>,
}

impl MockPersons {
    pub fn insert(&self, id: &str, name: &str, children: &[&str]) {
        self.persons.lock().unwrap().insert(
            id.to_string(),
            json!({
                "person_id": id,
                "name": name,
                "children": children,
                "created_at": "2024-01-01T00:00:00Z"
            }),
        );
    }

    /// `requestid` header values seen so far, in arrival order.
    pub fn request_ids(&self) -> Vec<String> {
        self.request_ids.lock().unwrap().clone()
    }

    pub fn gets(&self) -> u32 {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> u32 {
        self.deletes.load(Ordering::SeqCst)
    }

    fn record(&self, headers: &HeaderMap) {
        if let Some(id) = headers.get("requestid").and_then(|v| v.to_str().ok()) {
            self.request_ids.lock().unwrap().push(id.to_string());
        }
    }
}

async fn special(id: &str) -> Option<Response> {
    match id {
        BROKEN_ID => Some((StatusCode::INTERNAL_SERVER_ERROR, "database is down").into_response()),
        MALFORMED_ID => Some(Json(json!({"unexpected": true})).into_response()),
        SLOW_ID => {
            tokio::time::sleep(SLOW_DELAY).await;
            Some(Json(json!({"person_id": SLOW_ID, "name": "Sloth"})).into_response())
        }
        _ => None,
    }
}

async fn get_person(
    State(state): State<Arc<MockPersons>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.gets.fetch_add(1, Ordering::SeqCst);
    state.record(&headers);
    if let Some(response) = special(&id).await {
        return response;
    }
    match state.persons.lock().unwrap().get(&id) {
        Some(person) => Json(person.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
    }
}

async fn delete_person(
    State(state): State<Arc<MockPersons>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.deletes.fetch_add(1, Ordering::SeqCst);
    state.record(&headers);
    if let Some(response) = special(&id).await {
        return response;
    }
    match state.persons.lock().unwrap().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Start a mock person service on an ephemeral port.
pub async fn start_persons_service() -> (SocketAddr, Arc<MockPersons>) {
    let state = Arc::new(MockPersons::default());
    let router = Router::new()
        .route("/v1/persons/{id}", get(get_person).delete(delete_person))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, state)
}

/// A running gateway plus the handles a test needs to observe it.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub producer: Arc<KafkaProducer>,
    pub notifications: mpsc::UnboundedReceiver<OutboundMessage>,
    pub server: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub fn config_for(service_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.persons.service_url = service_url.to_string();
    config.persons.request_timeout_secs = 1;
    config.persons.delete_notification_topic = "persons.deleted.test".to_string();
    config
}

/// Start the gateway against `service_url` on an ephemeral port.
pub async fn start_gateway(service_url: &str) -> TestGateway {
    start_gateway_with(config_for(service_url)).await
}

pub async fn start_gateway_with(config: GatewayConfig) -> TestGateway {
    let (transport, notifications) = ChannelTransport::new();
    let producer = Arc::new(KafkaProducer::new());
    producer.init(Arc::new(transport)).unwrap();

    let manager = build_manager_with(
        &config,
        RestConnector::with_client(client()),
        producer.clone(),
    )
    .unwrap();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, Arc::new(manager));
    let server = tokio::spawn(server.run(listener, server_shutdown));

    TestGateway {
        addr,
        shutdown,
        producer,
        notifications,
        server,
    }
}

/// HTTP client that ignores proxy settings from the environment.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
