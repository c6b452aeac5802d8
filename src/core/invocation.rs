//! The generic invoke-and-project routine shared by every operation.
//!
//! An invocation moves through `Idle -> (Confirming) -> Dispatching ->
//! Succeeded | Failed`, or stops at `Declined` when the gate says no.
//! Binding and selector errors happen before any of that, when the
//! [`InvocationContext`] is built.

use crate::core::binder::{BoundRequest, ParameterBinder, RawParameters};
use crate::core::catalog::OperationDescriptor;
use crate::core::confirm::{ConfirmationGate, ConfirmationOptions, GateDecision};
use crate::core::dispatch::{Dispatcher, IamService};
use crate::core::host::InteractionHost;
use crate::core::selector::Selector;
use crate::domain::error::{IamCtlError, IamCtlResult};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

/// Lifecycle state of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InvocationState {
    Idle,
    Confirming,
    Dispatching,
    Succeeded,
    Failed,
    Declined,
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InvocationState::Idle => "Idle",
            InvocationState::Confirming => "Confirming",
            InvocationState::Dispatching => "Dispatching",
            InvocationState::Succeeded => "Succeeded",
            InvocationState::Failed => "Failed",
            InvocationState::Declined => "Declined",
        };
        f.write_str(name)
    }
}

/// Everything one command execution needs, owned exclusively by it
#[derive(Debug)]
pub struct InvocationContext {
    pub id: Uuid,
    pub operation: &'static OperationDescriptor,
    pub request: BoundRequest,
    pub selector: Selector,
    pub cancel: CancellationToken,
    state: InvocationState,
}

impl InvocationContext {
    /// Bind parameters and resolve the selector. Fails before any prompt or network call.
    pub fn bind(
        operation: &'static OperationDescriptor,
        raw: RawParameters,
        select: Option<&str>,
        cancel: CancellationToken,
    ) -> IamCtlResult<Self> {
        let selector = Selector::resolve(select, operation)?;
        let request = ParameterBinder::new(operation).bind(raw)?;

        Ok(Self {
            id: Uuid::new_v4(),
            operation,
            request,
            selector,
            cancel,
            state: InvocationState::Idle,
        })
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    fn transition(&mut self, next: InvocationState) {
        debug!(from = %self.state, to = %next, "invocation state change");
        self.state = next;
    }
}

/// Final result of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Succeeded,
    /// The gate declined or a what-if run stopped short; not an error
    Declined,
    Failed,
}

/// Projected output paired with the raw response and/or the captured failure
#[derive(Debug)]
pub struct OutputEnvelope {
    pub invocation_id: Uuid,
    pub operation: &'static str,
    pub outcome: Outcome,
    pub output: Option<Value>,
    pub response: Option<Value>,
    pub error: Option<IamCtlError>,
}

impl OutputEnvelope {
    fn declined(context: &InvocationContext) -> Self {
        Self {
            invocation_id: context.id,
            operation: context.operation.operation,
            outcome: Outcome::Declined,
            output: None,
            response: None,
            error: None,
        }
    }

    fn failed(context: &InvocationContext, error: IamCtlError) -> Self {
        Self {
            invocation_id: context.id,
            operation: context.operation.operation,
            outcome: Outcome::Failed,
            output: None,
            response: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Succeeded
    }

    /// The projected output, or the captured failure
    pub fn into_result(self) -> IamCtlResult<Option<Value>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.output),
        }
    }

    /// Hand projected output to the host. Failures come back to the caller, which
    /// reports them once through `InteractionHost::emit_error`.
    pub fn emit_to(self, host: &dyn InteractionHost) -> IamCtlResult<()> {
        match self.into_result()? {
            Some(value) if has_content(&value) => host.emit(&value),
            _ => Ok(()),
        }
    }
}

/// Null and empty objects carry nothing worth showing
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Runs bound invocations against a service through a host
pub struct Invoker<'a> {
    service: &'a dyn IamService,
    host: &'a dyn InteractionHost,
}

impl<'a> Invoker<'a> {
    pub fn new(service: &'a dyn IamService, host: &'a dyn InteractionHost) -> Self {
        Self { service, host }
    }

    pub async fn run(
        &self,
        mut context: InvocationContext,
        options: ConfirmationOptions,
    ) -> OutputEnvelope {
        let span = info_span!(
            "invocation",
            id = %context.id,
            operation = context.operation.operation
        );

        async move {
            if context.operation.is_state_changing() {
                context.transition(InvocationState::Confirming);
            }

            let decision = ConfirmationGate::new(options).check(
                context.operation,
                &context.request,
                self.host,
            );
            match decision {
                Ok(GateDecision::Proceed) => {}
                Ok(GateDecision::Declined) | Ok(GateDecision::WhatIf) => {
                    context.transition(InvocationState::Declined);
                    return OutputEnvelope::declined(&context);
                }
                Err(error) => {
                    context.transition(InvocationState::Failed);
                    return OutputEnvelope::failed(&context, error);
                }
            }

            context.transition(InvocationState::Dispatching);
            let result = Dispatcher::new(self.service)
                .dispatch(context.operation, &context.request, &context.cancel)
                .await;

            match result {
                Ok(response) => {
                    context.transition(InvocationState::Succeeded);
                    let output = context.selector.project(&response, &context.request);
                    OutputEnvelope {
                        invocation_id: context.id,
                        operation: context.operation.operation,
                        outcome: Outcome::Succeeded,
                        output: Some(output),
                        response: Some(response),
                        error: None,
                    }
                }
                Err(error) => {
                    context.transition(InvocationState::Failed);
                    OutputEnvelope::failed(&context, error)
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::domain::error::ServiceError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct EchoService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IamService for EchoService {
        async fn invoke(
            &self,
            operation: &'static OperationDescriptor,
            request: &BoundRequest,
        ) -> Result<Value, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({ "Roles": [request], "Marker": operation.operation }))
        }
    }

    struct EmptyListService;

    #[async_trait]
    impl IamService for EmptyListService {
        async fn invoke(
            &self,
            _operation: &'static OperationDescriptor,
            _request: &BoundRequest,
        ) -> Result<Value, ServiceError> {
            Ok(json!({ "Roles": [], "IsTruncated": false }))
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        emitted: Mutex<Vec<Value>>,
    }

    impl InteractionHost for RecordingHost {
        fn confirm(&self, _message: &str) -> IamCtlResult<bool> {
            Err(IamCtlError::Prompt("no terminal".to_string()))
        }

        fn notice(&self, _message: &str) -> IamCtlResult<()> {
            Ok(())
        }

        fn emit(&self, value: &Value) -> IamCtlResult<()> {
            self.emitted.lock().unwrap().push(value.clone());
            Ok(())
        }

        fn emit_error(&self, _error: &IamCtlError) {}
    }

    fn context(name: &str, params: Value, select: Option<&str>) -> InvocationContext {
        let Value::Object(map) = params else { panic!("object expected") };
        let op = Catalog::builtin().find(name).unwrap();
        InvocationContext::bind(op, map, select, CancellationToken::new()).unwrap()
    }

    #[test]
    fn test_context_starts_idle() {
        let ctx = context("GetRole", json!({"RoleName": "r"}), None);
        assert_eq!(ctx.state(), InvocationState::Idle);
        assert_eq!(ctx.selector, Selector::Field(vec!["Role".to_string()]));
    }

    #[test]
    fn test_bad_selector_fails_at_bind_time() {
        let op = Catalog::builtin().find("GetRole").unwrap();
        let mut params = RawParameters::new();
        params.insert("RoleName".to_string(), json!("r"));
        let err = InvocationContext::bind(op, params, Some("Nope"), CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, IamCtlError::Selector { .. }));
    }

    #[tokio::test]
    async fn test_success_envelope_keeps_raw_response() {
        let service = EchoService { calls: AtomicUsize::new(0) };
        let host = RecordingHost::default();
        let ctx = context("ListRoles", json!({"MaxItems": 5}), None);

        let envelope = Invoker::new(&service, &host)
            .run(ctx, ConfirmationOptions::default())
            .await;

        assert!(envelope.is_success());
        assert_eq!(envelope.output, Some(json!([{"MaxItems": 5}])));
        assert_eq!(envelope.response.as_ref().unwrap()["Marker"], "ListRoles");

        envelope.emit_to(&host).unwrap();
        assert_eq!(host.emitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_prompt_failure_is_captured() {
        let service = EchoService { calls: AtomicUsize::new(0) };
        let host = RecordingHost::default();
        let ctx = context("DeleteRole", json!({"RoleName": "r"}), None);

        let envelope = Invoker::new(&service, &host)
            .run(ctx, ConfirmationOptions::default())
            .await;

        assert_eq!(envelope.outcome, Outcome::Failed);
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        let err = envelope.emit_to(&host).unwrap_err();
        assert!(matches!(err, IamCtlError::Prompt(_)));
        assert!(host.emitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_output_emits_nothing() {
        let service = EchoService { calls: AtomicUsize::new(0) };
        let host = RecordingHost::default();
        let ctx = context("GetUser", json!({}), Some("^UserName"));

        let envelope = Invoker::new(&service, &host)
            .run(ctx, ConfirmationOptions::default())
            .await;

        assert_eq!(envelope.output, Some(Value::Null));
        envelope.emit_to(&host).unwrap();
        assert!(host.emitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_list_emits_nothing() {
        let host = RecordingHost::default();
        let ctx = context("ListRoles", json!({}), None);

        let envelope = Invoker::new(&EmptyListService, &host)
            .run(ctx, ConfirmationOptions::default())
            .await;

        assert!(envelope.is_success());
        assert_eq!(envelope.output, Some(json!([])));
        envelope.emit_to(&host).unwrap();
        assert!(host.emitted.lock().unwrap().is_empty());
    }
}
