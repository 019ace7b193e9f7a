//! In-process stand-in for the modem's web interface
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use axum_server::tls_rustls::RustlsConfig;
use surfboard_exporter::sources::SurfboardClient;

pub const CREDENTIALS: &str = "dXNlcjpwYXNz";
pub const TOKEN: &str = "0123456789abcdef0123";
pub const SESSION_COOKIE: &str = "sessionId=7f3a9c21";

pub fn fixture() -> String {
    std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/cmconnectionstatus.html"
    ))
    .expect("fixture should be readable")
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub query: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub cookie: Option<String>,
}

pub struct ModemBehaviour {
    pub login_status: StatusCode,
    pub login_body: String,
    pub status_status: StatusCode,
    pub status_body: String,
}

impl Default for ModemBehaviour {
    fn default() -> Self {
        Self {
            login_status: StatusCode::OK,
            login_body: TOKEN.to_string(),
            status_status: StatusCode::OK,
            status_body: fixture(),
        }
    }
}

struct ModemState {
    behaviour: Mutex<ModemBehaviour>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockModem {
    pub base_url: String,
    state: Arc<ModemState>,
}

impl MockModem {
    fn router(behaviour: ModemBehaviour) -> (Router, Arc<ModemState>) {
        let state = Arc::new(ModemState {
            behaviour: Mutex::new(behaviour),
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/cmconnectionstatus.html", get(status_page))
            .with_state(state.clone());
        (app, state)
    }

    pub async fn start(behaviour: ModemBehaviour) -> Self {
        let (app, state) = Self::router(behaviour);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Serve over HTTPS with a freshly generated self-signed certificate
    pub async fn start_tls(behaviour: ModemBehaviour) -> Self {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let (app, state) = Self::router(behaviour);

        let certified = rcgen::generate_simple_self_signed(vec![
            "127.0.0.1".to_string(),
            "localhost".to_string(),
        ])
        .unwrap();
        let tls = RustlsConfig::from_pem(
            certified.cert.pem().into_bytes(),
            certified.key_pair.serialize_pem().into_bytes(),
        )
        .await
        .unwrap();

        let handle = axum_server::Handle::new();
        let server = axum_server::bind_rustls("127.0.0.1:0".parse().unwrap(), tls)
            .handle(handle.clone());
        tokio::spawn(async move {
            server.serve(app.into_make_service()).await.unwrap();
        });
        let addr = handle
            .listening()
            .await
            .expect("TLS modem should report its address");

        Self {
            base_url: format!("https://{addr}"),
            state,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn set_status_body(&self, body: String) {
        self.state.behaviour.lock().unwrap().status_body = body;
    }

    pub fn set_login_status(&self, status: StatusCode) {
        self.state.behaviour.lock().unwrap().login_status = status;
    }

    pub fn client(&self) -> SurfboardClient {
        SurfboardClient::with_timeouts(
            &self.base_url,
            CREDENTIALS,
            Duration::from_secs(2),
            Duration::from_secs(5),
        )
        .unwrap()
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn status_page(
    State(state): State<Arc<ModemState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let query = query.unwrap_or_default();
    state.requests.lock().unwrap().push(RecordedRequest {
        query: query.clone(),
        authorization: header_value(&headers, header::AUTHORIZATION),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        cookie: header_value(&headers, header::COOKIE),
    });

    let behaviour = state.behaviour.lock().unwrap();
    if query.starts_with("login_") {
        (
            behaviour.login_status,
            [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
            behaviour.login_body.clone(),
        )
            .into_response()
    } else if query.starts_with("ct_") {
        (
            behaviour.status_status,
            [(header::CONTENT_TYPE, "text/html")],
            behaviour.status_body.clone(),
        )
            .into_response()
    } else {
        StatusCode::BAD_REQUEST.into_response()
    }
}
