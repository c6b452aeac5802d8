use async_trait::async_trait;
use iamctl::core::binder::BoundRequest;
use iamctl::core::dispatch::Dispatcher;
use iamctl::domain::error::{
    translate_service_error, EndpointHint, TransportFailureKind,
};
use iamctl::{Catalog, IamCtlError, IamCtlResult, IamService, OperationDescriptor, ServiceError};
use serde_json::Value;
use std::error::Error;
use tokio_util::sync::CancellationToken;

struct FailingService {
    kind: TransportFailureKind,
    endpoint_url: Option<String>,
}

#[async_trait]
impl IamService for FailingService {
    async fn invoke(
        &self,
        _operation: &'static OperationDescriptor,
        _request: &BoundRequest,
    ) -> Result<Value, ServiceError> {
        Err(ServiceError::transport(self.kind, "connector reported a failure"))
    }

    fn endpoint_hint(&self) -> EndpointHint {
        EndpointHint {
            region: Some("eu-central-1".to_string()),
            endpoint_url: self.endpoint_url.clone(),
        }
    }
}

fn dispatch(service: &FailingService) -> IamCtlResult<Value> {
    let operation = Catalog::builtin().find("ListRoles").unwrap();
    tokio_test::block_on(Dispatcher::new(service).dispatch(
        operation,
        &BoundRequest::default(),
        &CancellationToken::new(),
    ))
}

/// Error handling and resilience tests
#[cfg(test)]
mod error_handling_tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let errors = vec![
            IamCtlError::validation("Missing required parameter(s) for GetRole"),
            IamCtlError::selector("Role.Nope", "no such member"),
            IamCtlError::UnknownOperation("LaunchRockets".to_string()),
            IamCtlError::Cancelled,
            IamCtlError::Prompt("no terminal".to_string()),
            IamCtlError::Config {
                message: "Config error".to_string(),
            },
            IamCtlError::Output("Output error".to_string()),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty(), "Error display should not be empty");
            assert!(error.source().is_none());
        }

        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IamCtlError>();
        assert_send_sync::<ServiceError>();
    }

    #[test]
    fn test_error_conversion() {
        let json_error = serde_json::from_str::<Value>("{").unwrap_err();
        let error: IamCtlError = iamctl::cli::output::OutputError::from(json_error).into();
        assert!(matches!(error, IamCtlError::Output(ref text) if text.contains("JSON")));

        let service_error = ServiceError::Construction("bad request".to_string());
        let error: IamCtlError = service_error.into();
        assert!(matches!(error, IamCtlError::Service(_)));
    }

    #[test]
    fn test_name_resolution_names_the_region() {
        let service = FailingService {
            kind: TransportFailureKind::NameResolution,
            endpoint_url: None,
        };

        let err = dispatch(&service).unwrap_err();
        assert!(matches!(err, IamCtlError::NameResolution { .. }));
        assert!(err.to_string().contains("region 'eu-central-1'"));
        assert!(err.source().unwrap().to_string().contains("connector reported"));
    }

    #[test]
    fn test_name_resolution_names_a_custom_endpoint() {
        let service = FailingService {
            kind: TransportFailureKind::NameResolution,
            endpoint_url: Some("https://iam.internal.example".to_string()),
        };

        let err = dispatch(&service).unwrap_err();
        assert!(err.to_string().contains("endpoint 'https://iam.internal.example'"));
    }

    #[test]
    fn test_other_transport_failures_are_not_rewritten() {
        for kind in [
            TransportFailureKind::Timeout,
            TransportFailureKind::Io,
            TransportFailureKind::Other,
        ] {
            let service = FailingService {
                kind,
                endpoint_url: None,
            };
            let err = dispatch(&service).unwrap_err();
            assert!(
                matches!(err, IamCtlError::Service(ServiceError::Transport { .. })),
                "{:?}",
                kind
            );
        }
    }

    #[test]
    fn test_rejections_pass_through_translation() {
        let rejected = ServiceError::Rejected {
            code: "AccessDenied".to_string(),
            message: "not authorized".to_string(),
        };

        let err = translate_service_error(rejected, &EndpointHint::default());
        assert_eq!(err.to_string(), "AccessDenied: not authorized");
    }

    #[test]
    fn test_result_type() {
        fn success_function() -> IamCtlResult<String> {
            Ok("success".to_string())
        }

        fn error_function() -> IamCtlResult<String> {
            Err(IamCtlError::validation("Test error"))
        }

        assert_eq!(success_function().unwrap(), "success");
        assert!(error_function().is_err());
    }
}
