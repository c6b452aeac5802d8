use crate::core::binder::BoundRequest;
use crate::core::catalog::OperationDescriptor;
use crate::core::host::InteractionHost;
use crate::domain::error::IamCtlResult;
use tracing::{debug, warn};

/// Flags controlling the confirmation prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfirmationOptions {
    /// Skip the prompt
    pub force: bool,
    /// Report the action and stop before dispatch
    pub what_if: bool,
}

/// Outcome of the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Declined,
    WhatIf,
}

impl GateDecision {
    pub fn should_dispatch(self) -> bool {
        matches!(self, GateDecision::Proceed)
    }
}

/// Asks for approval before state-changing operations
pub struct ConfirmationGate {
    options: ConfirmationOptions,
}

impl ConfirmationGate {
    pub fn new(options: ConfirmationOptions) -> Self {
        Self { options }
    }

    pub fn check(
        &self,
        operation: &OperationDescriptor,
        request: &BoundRequest,
        host: &dyn InteractionHost,
    ) -> IamCtlResult<GateDecision> {
        if !operation.is_state_changing() {
            return Ok(GateDecision::Proceed);
        }

        let action = describe_action(operation, request);

        if self.options.what_if {
            host.notice(&format!("What if: {}", action))?;
            return Ok(GateDecision::WhatIf);
        }

        if self.options.force {
            debug!(operation = operation.operation, "confirmation skipped by --force");
            return Ok(GateDecision::Proceed);
        }

        if host.confirm(&format!("Are you sure you want to perform this action?\n{}", action))? {
            Ok(GateDecision::Proceed)
        } else {
            warn!(operation = operation.operation, "confirmation declined");
            Ok(GateDecision::Declined)
        }
    }
}

/// Human-readable description of what an invocation would do
pub fn describe_action(operation: &OperationDescriptor, request: &BoundRequest) -> String {
    let target = operation
        .target
        .and_then(|field| request.get(field))
        .map(|value| match value.as_str() {
            Some(s) => s.to_string(),
            None => value.to_string(),
        })
        .unwrap_or_else(|| operation.operation.to_string());

    format!(
        "Performing the operation \"{} ({})\" on target \"{}\".",
        operation.cmdlet_name(),
        operation.operation,
        target
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binder::ParameterBinder;
    use crate::core::catalog::Catalog;
    use crate::domain::error::IamCtlError;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct ScriptedHost {
        answer: bool,
        prompts: Mutex<Vec<String>>,
        notices: Mutex<Vec<String>>,
    }

    impl ScriptedHost {
        fn answering(answer: bool) -> Self {
            Self {
                answer,
                prompts: Mutex::new(Vec::new()),
                notices: Mutex::new(Vec::new()),
            }
        }
    }

    impl InteractionHost for ScriptedHost {
        fn confirm(&self, message: &str) -> IamCtlResult<bool> {
            self.prompts.lock().unwrap().push(message.to_string());
            Ok(self.answer)
        }

        fn notice(&self, message: &str) -> IamCtlResult<()> {
            self.notices.lock().unwrap().push(message.to_string());
            Ok(())
        }

        fn emit(&self, _value: &Value) -> IamCtlResult<()> {
            Ok(())
        }

        fn emit_error(&self, _error: &IamCtlError) {}
    }

    fn bound(operation: &'static OperationDescriptor, params: Value) -> BoundRequest {
        let Value::Object(map) = params else { panic!("object expected") };
        ParameterBinder::new(operation).bind(map).unwrap()
    }

    #[test]
    fn test_read_only_operations_never_prompt() {
        let op = Catalog::builtin().find("GetRole").unwrap();
        let host = ScriptedHost::answering(false);
        let decision = ConfirmationGate::new(ConfirmationOptions::default())
            .check(op, &bound(op, json!({"RoleName": "r"})), &host)
            .unwrap();

        assert_eq!(decision, GateDecision::Proceed);
        assert!(host.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_prompt_names_target() {
        let op = Catalog::builtin().find("DeleteRole").unwrap();
        let host = ScriptedHost::answering(true);
        let decision = ConfirmationGate::new(ConfirmationOptions::default())
            .check(op, &bound(op, json!({"RoleName": "legacy"})), &host)
            .unwrap();

        assert_eq!(decision, GateDecision::Proceed);
        let prompts = host.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Remove-IAMRole (DeleteRole)"));
        assert!(prompts[0].contains("\"legacy\""));
    }

    #[test]
    fn test_declined() {
        let op = Catalog::builtin().find("DisableOrganizationsRootSessions").unwrap();
        let host = ScriptedHost::answering(false);
        let decision = ConfirmationGate::new(ConfirmationOptions::default())
            .check(op, &BoundRequest::default(), &host)
            .unwrap();

        assert_eq!(decision, GateDecision::Declined);
        assert!(!decision.should_dispatch());
    }

    #[test]
    fn test_force_skips_prompt() {
        let op = Catalog::builtin().find("DeleteRole").unwrap();
        let host = ScriptedHost::answering(false);
        let options = ConfirmationOptions {
            force: true,
            what_if: false,
        };
        let decision = ConfirmationGate::new(options)
            .check(op, &bound(op, json!({"RoleName": "r"})), &host)
            .unwrap();

        assert_eq!(decision, GateDecision::Proceed);
        assert!(host.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_what_if_wins_over_force() {
        let op = Catalog::builtin().find("DeleteRole").unwrap();
        let host = ScriptedHost::answering(true);
        let options = ConfirmationOptions {
            force: true,
            what_if: true,
        };
        let decision = ConfirmationGate::new(options)
            .check(op, &bound(op, json!({"RoleName": "r"})), &host)
            .unwrap();

        assert_eq!(decision, GateDecision::WhatIf);
        let notices = host.notices.lock().unwrap();
        assert!(notices[0].starts_with("What if: Performing the operation"));
    }

    #[test]
    fn test_describe_action_without_target() {
        let op = Catalog::builtin().find("EnableOrganizationsRootSessions").unwrap();
        let text = describe_action(op, &BoundRequest::default());
        assert!(text.ends_with("on target \"EnableOrganizationsRootSessions\"."));
    }
}
