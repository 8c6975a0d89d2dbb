//! Instrumented carrier HTTP exchange.
//!
//! Wraps one [`HttpTransport::send`] with latency timing, failure counting
//! and the error logging every carrier client needs: a non-2xx body is
//! logged in full here and never travels further than this function.

use shared_types::{Carrier, CarrierOperation, HttpRequest, HttpResponse, HttpTransport, ShippingError};
use tracing::{debug, error};

use crate::metrics::{record_call, CallOutcome, CallTimer};

/// Send `request` and require a 2xx answer.
///
/// Transport failures are passed through. Non-2xx responses become
/// [`ShippingError::CarrierRequestFailed`], whose message carries only the
/// carrier and operation.
pub async fn send_checked(
    transport: &dyn HttpTransport,
    carrier: Carrier,
    operation: CarrierOperation,
    request: HttpRequest,
) -> Result<HttpResponse, ShippingError> {
    let _timer = CallTimer::start(carrier, operation);

    let response = match transport.send(request).await {
        Ok(response) => response,
        Err(e) => {
            error!(carrier = %carrier, operation = %operation, error = %e, "Carrier call failed before a response");
            record_call(carrier, operation, CallOutcome::TransportError);
            return Err(e);
        }
    };

    if !response.is_success() {
        error!(
            carrier = %carrier,
            operation = %operation,
            status = response.status,
            body = %response.body,
            "Carrier rejected request"
        );
        record_call(carrier, operation, CallOutcome::Rejected);
        return Err(ShippingError::request_failed(carrier, operation, response.status));
    }

    debug!(carrier = %carrier, operation = %operation, status = response.status, "Carrier call succeeded");
    Ok(response)
}
