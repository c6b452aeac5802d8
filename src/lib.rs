//! iamctl library
//!
//! Command-line wrappers for AWS IAM API operations. Every operation is a
//! declarative descriptor in the catalog, run by one generic routine that
//! binds and validates parameters, confirms state-changing calls, dispatches
//! to the service, and projects the response through a selector.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use core::catalog::{Catalog, OperationDescriptor};
pub use core::confirm::ConfirmationOptions;
pub use core::dispatch::IamService;
pub use core::host::InteractionHost;
pub use core::invocation::{InvocationContext, Invoker, OutputEnvelope};
pub use core::selector::Selector;
pub use domain::config::IamCtlConfig;
pub use domain::error::{IamCtlError, IamCtlResult, ServiceError};
pub use infrastructure::aws::SdkIamService;
