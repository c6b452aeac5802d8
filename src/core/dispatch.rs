use crate::core::binder::BoundRequest;
use crate::core::catalog::OperationDescriptor;
use crate::domain::error::{
    translate_service_error, EndpointHint, IamCtlError, IamCtlResult, ServiceError,
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Remote IAM client handle
#[async_trait]
pub trait IamService: Send + Sync {
    /// Perform one remote call and return the response as a JSON document
    /// keyed by API member name
    async fn invoke(
        &self,
        operation: &'static OperationDescriptor,
        request: &BoundRequest,
    ) -> Result<Value, ServiceError>;

    /// Where calls are headed, for diagnostics
    fn endpoint_hint(&self) -> EndpointHint {
        EndpointHint::default()
    }
}

/// Issues exactly one remote call per dispatch, raced against cancellation
pub struct Dispatcher<'a> {
    service: &'a dyn IamService,
}

impl<'a> Dispatcher<'a> {
    pub fn new(service: &'a dyn IamService) -> Self {
        Self { service }
    }

    pub async fn dispatch(
        &self,
        operation: &'static OperationDescriptor,
        request: &BoundRequest,
        cancel: &CancellationToken,
    ) -> IamCtlResult<Value> {
        if cancel.is_cancelled() {
            warn!(operation = operation.operation, "cancelled before dispatch");
            return Err(IamCtlError::Cancelled);
        }

        info!(operation = operation.operation, "dispatching request");
        let started = Instant::now();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(operation = operation.operation, "in-flight request cancelled");
                return Err(IamCtlError::Cancelled);
            }
            result = self.service.invoke(operation, request) => result,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(response) => {
                info!(operation = operation.operation, elapsed_ms, "request succeeded");
                Ok(response)
            }
            Err(e) => {
                error!(operation = operation.operation, elapsed_ms, error = %e, "request failed");
                Err(translate_service_error(e, &self.service.endpoint_hint()))
            }
        }
    }
}
