use crate::domain::error::{IamCtlError, IamCtlResult};
use serde_json::Value;

/// Interactive surface an invocation talks to: prompts, results and errors
pub trait InteractionHost: Send + Sync {
    /// Ask the user to approve an action
    fn confirm(&self, message: &str) -> IamCtlResult<bool>;

    /// Report an informational message, e.g. a what-if summary
    fn notice(&self, message: &str) -> IamCtlResult<()>;

    /// Surface one output value
    fn emit(&self, value: &Value) -> IamCtlResult<()>;

    /// Surface a failure
    fn emit_error(&self, error: &IamCtlError);
}
