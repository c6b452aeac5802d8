// Core module - Operation catalog and the shared invocation pipeline
pub mod binder;
pub mod catalog;
pub mod confirm;
pub mod dispatch;
pub mod host;
pub mod invocation;
pub mod selector;

pub use binder::{merge_parameters, BoundRequest, ParameterBinder, RawParameters};
pub use catalog::{Catalog, FieldKind, FieldSpec, OperationDescriptor, Verb};
pub use confirm::{ConfirmationGate, ConfirmationOptions, GateDecision};
pub use dispatch::{Dispatcher, IamService};
pub use host::InteractionHost;
pub use invocation::{InvocationContext, InvocationState, Invoker, Outcome, OutputEnvelope};
pub use selector::Selector;
