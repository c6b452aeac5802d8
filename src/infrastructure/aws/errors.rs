use crate::domain::error::{ServiceError, TransportFailureKind};
use aws_sdk_iam::error::{ConnectorError, DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::error::Error as StdError;
use std::fmt::Debug;

// Resolver messages seen across platforms and connectors.
const NAME_RESOLUTION_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "nodename nor servname",
    "no such host is known",
    "temporary failure in name resolution",
    "name resolution",
];

/// Convert an SDK failure into a `ServiceError`, keeping transport failures as the source
pub fn sdk_failure<E, R>(err: SdkError<E, R>) -> ServiceError
where
    E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    let kind = match &err {
        SdkError::ServiceError(context) => {
            let inner = context.err();
            return ServiceError::Rejected {
                code: inner.code().unwrap_or("Unknown").to_string(),
                message: inner.message().unwrap_or_default().to_string(),
            };
        }
        SdkError::ConstructionFailure(_) => {
            return ServiceError::Construction(DisplayErrorContext(&err).to_string());
        }
        SdkError::ResponseError(_) => {
            return ServiceError::Response(DisplayErrorContext(&err).to_string());
        }
        SdkError::TimeoutError(_) => TransportFailureKind::Timeout,
        SdkError::DispatchFailure(failure) => failure
            .as_connector_error()
            .map(classify_connector)
            .unwrap_or(TransportFailureKind::Other),
        _ => TransportFailureKind::Other,
    };

    ServiceError::Transport {
        kind,
        message: DisplayErrorContext(&err).to_string(),
        source: Some(Box::new(err)),
    }
}

/// Classify a dispatch failure by the connector's own error kind.
///
/// Credential and signing failures surface as `Other` connector errors and
/// are never reported as resolver failures, even when a credential provider
/// hit DNS trouble on its own endpoint.
pub fn classify_connector(error: &ConnectorError) -> TransportFailureKind {
    if error.is_timeout() {
        TransportFailureKind::Timeout
    } else if error.is_io() {
        if resolver_failure(error) {
            TransportFailureKind::NameResolution
        } else {
            TransportFailureKind::Io
        }
    } else {
        TransportFailureKind::Other
    }
}

fn resolver_failure(error: &ConnectorError) -> bool {
    let mut cause = error.source();
    while let Some(inner) = cause {
        let text = inner.to_string().to_ascii_lowercase();
        if NAME_RESOLUTION_MARKERS.iter().any(|marker| text.contains(marker)) {
            return true;
        }
        cause = inner.source();
    }
    false
}
