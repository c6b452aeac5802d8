// AWS module - SDK-backed IAM service
pub mod client;
pub mod convert;
pub mod errors;
pub mod service;

pub use service::SdkIamService;
