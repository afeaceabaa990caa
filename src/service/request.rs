//! RequestService: request-style endpoints sent through the remote transport.

use crate::accessor::RequestAccessor;
use crate::status::{ExecutionStatus, ERROR_CODE_REQUEST};
use crate::transport::{Headers, ParamMap};

pub struct RequestService;

impl RequestService {
    /// Send `params` to the accessor's resource and decode each response row.
    pub async fn send<R: RequestAccessor>(request: &R, params: &ParamMap) -> ExecutionStatus<R::Response> {
        let Some(transport) = request.provider().transport() else {
            tracing::warn!(resource = %request.resource_name(), "request without a remote transport");
            return ExecutionStatus::failure(ERROR_CODE_REQUEST, "no remote transport configured");
        };
        let empty = Headers::new();
        let headers = request.default_headers().unwrap_or(&empty);
        tracing::debug!(resource = %request.resource_name(), params = ?params, "request");
        let status = transport
            .send_request(request.resource_name(), params, headers)
            .await;
        if !status.ok {
            tracing::warn!(
                resource = %request.resource_name(),
                error_code = ?status.error_code,
                message = ?status.message,
                "request failed"
            );
            return status.cast();
        }
        status.try_map_rows(serde_json::from_value::<R::Response>)
    }
}
