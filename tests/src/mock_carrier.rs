//! # Mock Carrier
//!
//! One axum server that answers both carriers' endpoints on
//! `127.0.0.1:0`. It checks credentials the way the real gateways do and
//! counts every call so tests can assert on token reuse.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Basic credentials of `CanadaPostConfig::for_testing` (`cp-user:cp-pass`).
pub const CANADA_POST_BASIC: &str = "Basic Y3AtdXNlcjpjcC1wYXNz";

/// Label content served for every DHL label (`hello`).
pub const DHL_LABEL_CONTENT: &str = "aGVsbG8=";

/// Body returned on a rejected DHL label request.
pub const DHL_REJECTION_BODY: &str =
    r#"{"type":"VALIDATION","title":"Pickup account 5351244 is suspended"}"#;

/// Counters and switches shared with the handlers.
#[derive(Default)]
pub struct CarrierState {
    token_calls: AtomicUsize,
    label_calls: AtomicUsize,
    return_label_calls: AtomicUsize,
    dhl_tracking_calls: AtomicUsize,
    cp_shipment_calls: AtomicUsize,
    cp_tracking_calls: AtomicUsize,
    issued_tokens: Mutex<Vec<String>>,
    token_lifetime_secs: AtomicI64,
    reject_labels: AtomicBool,
}

impl CarrierState {
    fn issue_token(&self) -> String {
        let n = self.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let token = format!("mock-token-{n}");
        self.issued_tokens.lock().push(token.clone());
        token
    }

    fn bearer_ok(&self, headers: &HeaderMap) -> bool {
        let Some(value) = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        else {
            return false;
        };
        value
            .strip_prefix("Bearer ")
            .map(|t| self.issued_tokens.lock().iter().any(|issued| issued == t))
            .unwrap_or(false)
    }

    fn basic_ok(headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            == Some(CANADA_POST_BASIC)
    }
}

/// Running mock server.
pub struct MockCarrier {
    addr: SocketAddr,
    state: Arc<CarrierState>,
    handle: JoinHandle<()>,
}

impl MockCarrier {
    /// Start on an ephemeral port. Tokens live for an hour.
    pub async fn start() -> Self {
        let state = Arc::new(CarrierState::default());
        state.token_lifetime_secs.store(3600, Ordering::SeqCst);

        let app = Router::new()
            .route("/auth/v4/token", post(dhl_token))
            .route("/shipping/v1/labels/merchant", post(dhl_label))
            .route("/returns/v4/label", post(dhl_return_label))
            .route("/tracking/v4/package", get(dhl_tracking))
            .route("/rs/:mailed_by/:customer/shipment", post(cp_shipment))
            .route("/vis/track/pin/:pin/detail", get(cp_tracking))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock carrier");
        let addr = listener.local_addr().expect("mock carrier address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock carrier server");
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL to point a carrier config at.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Token requests served.
    pub fn token_calls(&self) -> usize {
        self.state.token_calls.load(Ordering::SeqCst)
    }

    /// Outbound DHL label requests served.
    pub fn label_calls(&self) -> usize {
        self.state.label_calls.load(Ordering::SeqCst)
    }

    /// DHL return label requests served.
    pub fn return_label_calls(&self) -> usize {
        self.state.return_label_calls.load(Ordering::SeqCst)
    }

    /// DHL tracking requests served.
    pub fn dhl_tracking_calls(&self) -> usize {
        self.state.dhl_tracking_calls.load(Ordering::SeqCst)
    }

    /// Canada Post shipment requests served.
    pub fn cp_shipment_calls(&self) -> usize {
        self.state.cp_shipment_calls.load(Ordering::SeqCst)
    }

    /// Canada Post tracking requests served.
    pub fn cp_tracking_calls(&self) -> usize {
        self.state.cp_tracking_calls.load(Ordering::SeqCst)
    }

    /// Lifetime advertised in subsequent token responses.
    pub fn set_token_lifetime(&self, secs: i64) {
        self.state.token_lifetime_secs.store(secs, Ordering::SeqCst);
    }

    /// Make DHL label endpoints answer 400.
    pub fn reject_labels(&self, reject: bool) {
        self.state.reject_labels.store(reject, Ordering::SeqCst);
    }
}

impl Drop for MockCarrier {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn json(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn xml(status: StatusCode, content_type: &'static str, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

// =============================================================================
// DHL
// =============================================================================

async fn dhl_token(State(state): State<Arc<CarrierState>>, body: String) -> Response {
    let form: HashMap<String, String> = body
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let valid = form.get("grant_type").map(String::as_str) == Some("client_credentials")
        && form.get("client_id").map(String::as_str) == Some("test-client")
        && form.get("client_secret").map(String::as_str) == Some("test-secret");
    if !valid {
        return json(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"invalid_client"}"#.to_string(),
        );
    }

    let token = state.issue_token();
    let lifetime = state.token_lifetime_secs.load(Ordering::SeqCst);
    json(
        StatusCode::OK,
        serde_json::json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": lifetime,
        })
        .to_string(),
    )
}

fn label_response(state: &CarrierState, headers: &HeaderMap, body: &str) -> Response {
    if !state.bearer_ok(headers) {
        return json(StatusCode::UNAUTHORIZED, r#"{"title":"Unauthorized"}"#.to_string());
    }
    if state.reject_labels.load(Ordering::SeqCst) {
        return json(StatusCode::BAD_REQUEST, DHL_REJECTION_BODY.to_string());
    }

    let request: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return json(StatusCode::BAD_REQUEST, r#"{"title":"Bad JSON"}"#.to_string()),
    };
    let package_id = request["packageDetail"]["packageId"]
        .as_str()
        .unwrap_or("UNKNOWN")
        .to_string();

    json(
        StatusCode::OK,
        serde_json::json!({
            "trackingNumber": "GM60511234500000001",
            "packageId": package_id,
            "label": { "content": DHL_LABEL_CONTENT, "format": "PNG" },
            "pricing": { "total": { "amount": "12.50", "currency": "USD" } },
        })
        .to_string(),
    )
}

async fn dhl_label(
    State(state): State<Arc<CarrierState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.label_calls.fetch_add(1, Ordering::SeqCst);
    label_response(&state, &headers, &body)
}

async fn dhl_return_label(
    State(state): State<Arc<CarrierState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.return_label_calls.fetch_add(1, Ordering::SeqCst);
    label_response(&state, &headers, &body)
}

async fn dhl_tracking(
    State(state): State<Arc<CarrierState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.dhl_tracking_calls.fetch_add(1, Ordering::SeqCst);
    if !state.bearer_ok(&headers) {
        return json(StatusCode::UNAUTHORIZED, r#"{"title":"Unauthorized"}"#.to_string());
    }
    let Some(id) = query.get("trackingId") else {
        return json(StatusCode::BAD_REQUEST, r#"{"title":"trackingId required"}"#.to_string());
    };
    if id.starts_with("UNKNOWN") {
        return json(StatusCode::OK, r#"{"packages":[]}"#.to_string());
    }

    json(
        StatusCode::OK,
        serde_json::json!({
            "packages": [{
                "trackingId": id,
                "estimatedDeliveryDate": "2024-06-03",
                "events": [
                    { "timestamp": "2024-06-02T07:15:00Z", "description": "Out for delivery", "location": "Chicago IL" },
                    { "timestamp": "2024-06-01T19:40:00Z", "description": "Arrived at DHL facility" },
                    { "timestamp": "2024-05-31T12:00:00Z", "description": "Label created" }
                ]
            }]
        })
        .to_string(),
    )
}

// =============================================================================
// Canada Post
// =============================================================================

const CP_SHIPMENT: &str = "application/vnd.cpc.shipment-v8+xml";
const CP_TRACK: &str = "application/vnd.cpc.track-v2+xml";
const CP_MESSAGES: &str = "application/vnd.cpc.messages+xml";

fn cp_error(status: StatusCode, code: &str, description: &str) -> Response {
    xml(
        status,
        CP_MESSAGES,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><messages xmlns="http://www.canadapost.ca/ws/messages"><message><code>{code}</code><description>{description}</description></message></messages>"#
        ),
    )
}

async fn cp_shipment(
    State(state): State<Arc<CarrierState>>,
    Path((mailed_by, customer)): Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.cp_shipment_calls.fetch_add(1, Ordering::SeqCst);
    if !CarrierState::basic_ok(&headers) {
        return cp_error(StatusCode::UNAUTHORIZED, "E002", "AAA Authentication Failure");
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if content_type != Some(CP_SHIPMENT) {
        return cp_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Server", "Unsupported media type");
    }
    if !body.contains(r#"xmlns="http://www.canadapost.ca/ws/shipment-v8""#) {
        return cp_error(StatusCode::BAD_REQUEST, "Server", "Unknown document");
    }

    xml(
        StatusCode::OK,
        CP_SHIPMENT,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<shipment-info xmlns="http://www.canadapost.ca/ws/shipment-v8">
    <shipment-id>406951321983787352</shipment-id>
    <shipment-status>transmitted</shipment-status>
    <tracking-pin>123456789012</tracking-pin>
    <links>
        <link rel="self" href="https://ct.soa-gw.canadapost.ca/rs/{mailed_by}/{customer}/shipment/406951321983787352" media-type="{CP_SHIPMENT}"/>
        <link rel="label" href="https://ct.soa-gw.canadapost.ca/rs/artifact/76108cb5192002d5/10238/0" media-type="application/pdf" index="0"/>
    </links>
</shipment-info>"#
        ),
    )
}

async fn cp_tracking(
    State(state): State<Arc<CarrierState>>,
    Path(pin): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.cp_tracking_calls.fetch_add(1, Ordering::SeqCst);
    if !CarrierState::basic_ok(&headers) {
        return cp_error(StatusCode::UNAUTHORIZED, "E002", "AAA Authentication Failure");
    }
    if pin.starts_with('0') {
        return cp_error(StatusCode::NOT_FOUND, "004", "No Pin History");
    }

    xml(
        StatusCode::OK,
        CP_TRACK,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<tracking-detail xmlns="http://www.canadapost.ca/ws/track-v2">
    <pin>{pin}</pin>
    <active-exists>1</active-exists>
    <archive-exists/>
    <expected-delivery-date>2024-06-03</expected-delivery-date>
    <actual-delivery-date/>
    <service-name>Expedited Parcels</service-name>
    <significant-events>
        <occurrence>
            <event-identifier>0174</event-identifier>
            <event-date>2024-06-03</event-date>
            <event-time>08:05:12</event-time>
            <event-time-zone>EDT</event-time-zone>
            <event-description>Item out for delivery</event-description>
            <signatory-name/>
            <event-site>OTTAWA</event-site>
            <event-province>ON</event-province>
        </occurrence>
        <occurrence>
            <event-identifier>0100</event-identifier>
            <event-date>2024-06-02</event-date>
            <event-time>21:30:00</event-time>
            <event-time-zone>EDT</event-time-zone>
            <event-description>Item processed</event-description>
            <signatory-name/>
            <event-site>MISSISSAUGA</event-site>
            <event-province>ON</event-province>
        </occurrence>
    </significant-events>
</tracking-detail>"#
        ),
    )
}
