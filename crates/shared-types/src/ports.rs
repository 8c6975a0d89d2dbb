//! # Ports
//!
//! Hexagonal architecture ports.
//!
//! - Inbound: [`ShippingCarrierClient`], the capability set every carrier
//!   client implements and callers use interchangeably.
//! - Outbound: [`HttpTransport`] and [`TimeSource`], the two things a
//!   carrier client needs from the outside world.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;

use crate::carrier::Carrier;
use crate::entities::{RateRequest, Shipment, ShipmentRequest, ShippingRate, TrackingInfo, TrackingRequest};
use crate::errors::ShippingError;

// =============================================================================
// Inbound
// =============================================================================

/// Uniform carrier capability set.
#[async_trait]
pub trait ShippingCarrierClient: Send + Sync {
    /// Carrier this client talks to.
    fn carrier(&self) -> Carrier;

    /// Buy a label. One HTTP call to the carrier's label endpoint.
    async fn create_shipment(&self, request: &ShipmentRequest) -> Result<Shipment, ShippingError>;

    /// Live rates. Empty means "no live rate, use the static table".
    async fn get_rates(&self, request: &RateRequest) -> Result<Vec<ShippingRate>, ShippingError>;

    /// Current tracking snapshot.
    async fn track_shipment(&self, request: &TrackingRequest) -> Result<TrackingInfo, ShippingError>;
}

// =============================================================================
// Outbound: HTTP
// =============================================================================

/// HTTP verb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
}

/// Transport-neutral HTTP request.
#[derive(Clone)]
pub struct HttpRequest {
    /// Verb.
    pub method: HttpMethod,
    /// Absolute URL including query string.
    pub url: String,
    /// Header pairs, in order.
    pub headers: Vec<(String, String)>,
    /// Body text.
    pub body: Option<String>,
}

impl HttpRequest {
    /// GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// First header with this name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Authorization carries credentials; body may carry client secrets.
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case("authorization") {
                    (k.as_str(), "***")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(String::len))
            .finish()
    }
}

/// Transport-neutral HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Body text.
    pub body: String,
}

impl HttpResponse {
    /// Build a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP port.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform one exchange. Non-2xx statuses are returned, not raised.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ShippingError>;
}

// =============================================================================
// Outbound: time
// =============================================================================

/// Time source trait for testability.
pub trait TimeSource: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Manually advanced clock.
#[derive(Debug)]
pub struct MockTimeSource {
    now: Mutex<DateTime<Utc>>,
}

impl MockTimeSource {
    /// Start at a fixed instant.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock();
        *now += Duration::seconds(secs);
    }
}

impl Default for MockTimeSource {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000))
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

struct MockRoute {
    method: HttpMethod,
    url_fragment: String,
    responses: VecDeque<HttpResponse>,
}

/// Scripted transport.
///
/// Routes match on method plus a URL substring, first registered wins.
/// Queued responses are served in order; the last one repeats.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<MockRoute>>,
    requests: Mutex<Vec<HttpRequest>>,
    /// Fail every call with a transport error.
    pub should_fail: bool,
}

impl MockTransport {
    /// Empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose every call fails before a response.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Queue a response for `method` + URL fragment.
    pub fn respond(&self, method: HttpMethod, url_fragment: &str, response: HttpResponse) {
        let mut routes = self.routes.lock();
        if let Some(route) = routes
            .iter_mut()
            .find(|r| r.method == method && r.url_fragment == url_fragment)
        {
            route.responses.push_back(response);
            return;
        }
        routes.push(MockRoute {
            method,
            url_fragment: url_fragment.to_string(),
            responses: VecDeque::from([response]),
        });
    }

    /// Every request seen so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Requests matching `method` + URL fragment.
    pub fn count(&self, method: HttpMethod, url_fragment: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url.contains(url_fragment))
            .count()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ShippingError> {
        self.requests.lock().push(request.clone());

        if self.should_fail {
            return Err(ShippingError::Transport("Mock failure".to_string()));
        }

        let mut routes = self.routes.lock();
        let route = routes
            .iter_mut()
            .find(|r| r.method == request.method && request.url.contains(&r.url_fragment))
            .ok_or_else(|| {
                ShippingError::Transport(format!("no mock route for {}", request.url))
            })?;

        let response = if route.responses.len() > 1 {
            route.responses.pop_front()
        } else {
            route.responses.front().cloned()
        };
        response.ok_or_else(|| ShippingError::Transport("mock route exhausted".to_string()))
    }
}
