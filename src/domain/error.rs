use std::error::Error as StdError;
use thiserror::Error;

/// Boxed cause carried by transport failures
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// iamctl unified error type
#[derive(Error, Debug)]
pub enum IamCtlError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("{message}")]
    NameResolution {
        message: String,
        #[source]
        source: ServiceError,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Confirmation failed: {0}")]
    Prompt(String),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Output error: {0}")]
    Output(String),
}

impl IamCtlError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Selector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}

pub type IamCtlResult<T> = Result<T, IamCtlError>;

/// Category of a transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    /// The endpoint host name could not be resolved
    NameResolution,
    Timeout,
    Io,
    Other,
}

impl std::fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportFailureKind::NameResolution => write!(f, "name resolution"),
            TransportFailureKind::Timeout => write!(f, "timeout"),
            TransportFailureKind::Io => write!(f, "io"),
            TransportFailureKind::Other => write!(f, "other"),
        }
    }
}

/// Failure reported by an `IamService` implementation
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Transport failure ({kind}): {message}")]
    Transport {
        kind: TransportFailureKind,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{code}: {message}")]
    Rejected { code: String, message: String },

    #[error("Request construction failed: {0}")]
    Construction(String),

    #[error("Unexpected response: {0}")]
    Response(String),
}

impl ServiceError {
    pub fn transport(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn is_name_resolution(&self) -> bool {
        matches!(
            self,
            ServiceError::Transport {
                kind: TransportFailureKind::NameResolution,
                ..
            }
        )
    }
}

/// Where a call was headed, used to enrich transport diagnostics
#[derive(Debug, Clone, Default)]
pub struct EndpointHint {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

/// Rewrap name-resolution failures with a diagnostic; pass everything else through.
pub fn translate_service_error(error: ServiceError, hint: &EndpointHint) -> IamCtlError {
    if !error.is_name_resolution() {
        return IamCtlError::Service(error);
    }

    let region = hint.region.as_deref().unwrap_or("<unresolved>");
    let target = match &hint.endpoint_url {
        Some(url) => format!("endpoint '{}'", url),
        None => format!("the IAM endpoint for region '{}'", region),
    };
    let message = format!(
        "Name resolution failure attempting to reach {}. \
         Check network connectivity, the configured region, and any custom endpoint URL.",
        target
    );

    IamCtlError::NameResolution {
        message,
        source: error,
    }
}
