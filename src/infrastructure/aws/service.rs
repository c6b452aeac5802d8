use super::client::load_sdk_config;
use super::convert;
use super::errors::sdk_failure;
use crate::core::binder::BoundRequest;
use crate::core::catalog::OperationDescriptor;
use crate::core::dispatch::IamService;
use crate::domain::config::ClientConfig;
use crate::domain::error::{EndpointHint, ServiceError};
use async_trait::async_trait;
use aws_sdk_iam::types::{PolicyScopeType, PolicyUsageType, StatusType};
use aws_sdk_iam::Client;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::info;

/// `IamService` backed by the AWS SDK.
///
/// The SDK client is built on first use, so commands that never dispatch
/// (validation failures, declined prompts, what-if runs) never resolve
/// credentials or regions.
pub struct SdkIamService {
    settings: ClientConfig,
    client: OnceCell<Client>,
}

impl SdkIamService {
    pub fn new(settings: ClientConfig) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                let sdk_config = load_sdk_config(&self.settings).await;
                info!(
                    region = ?sdk_config.region(),
                    profile = ?self.settings.profile,
                    "IAM client configured"
                );
                Client::new(&sdk_config)
            })
            .await
    }
}

fn required(request: &BoundRequest, name: &str) -> Result<String, ServiceError> {
    request
        .string(name)
        .ok_or_else(|| ServiceError::Construction(format!("missing required member {}", name)))
}

fn max_items(request: &BoundRequest) -> Option<i32> {
    request
        .integer("MaxItems")
        .and_then(|value| i32::try_from(value).ok())
}

#[async_trait]
impl IamService for SdkIamService {
    async fn invoke(
        &self,
        operation: &'static OperationDescriptor,
        request: &BoundRequest,
    ) -> Result<Value, ServiceError> {
        let client = self.client().await;

        match operation.operation {
            "DisableOrganizationsRootSessions" => {
                let out = client
                    .disable_organizations_root_sessions()
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::organization_features(
                    out.organization_id(),
                    out.enabled_features(),
                ))
            }
            "EnableOrganizationsRootSessions" => {
                let out = client
                    .enable_organizations_root_sessions()
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::organization_features(
                    out.organization_id(),
                    out.enabled_features(),
                ))
            }
            "DisableOrganizationsRootCredentialsManagement" => {
                let out = client
                    .disable_organizations_root_credentials_management()
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::organization_features(
                    out.organization_id(),
                    out.enabled_features(),
                ))
            }
            "EnableOrganizationsRootCredentialsManagement" => {
                let out = client
                    .enable_organizations_root_credentials_management()
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::organization_features(
                    out.organization_id(),
                    out.enabled_features(),
                ))
            }
            "ListOrganizationsFeatures" => {
                let out = client
                    .list_organizations_features()
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::organization_features(
                    out.organization_id(),
                    out.enabled_features(),
                ))
            }
            "GetRole" => {
                let out = client
                    .get_role()
                    .role_name(required(request, "RoleName")?)
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::object([(
                    "Role",
                    out.role().map(convert::role).unwrap_or(Value::Null),
                )]))
            }
            "ListRoles" => {
                let out = client
                    .list_roles()
                    .set_path_prefix(request.string("PathPrefix"))
                    .set_marker(request.string("Marker"))
                    .set_max_items(max_items(request))
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::page(
                    "Roles",
                    out.roles().iter().map(convert::role).collect(),
                    out.marker(),
                ))
            }
            "CreateRole" => {
                let out = client
                    .create_role()
                    .set_path(request.string("Path"))
                    .role_name(required(request, "RoleName")?)
                    .assume_role_policy_document(required(request, "AssumeRolePolicyDocument")?)
                    .set_description(request.string("Description"))
                    .set_max_session_duration(
                        request
                            .integer("MaxSessionDuration")
                            .and_then(|value| i32::try_from(value).ok()),
                    )
                    .set_permissions_boundary(request.string("PermissionsBoundary"))
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::object([(
                    "Role",
                    out.role().map(convert::role).unwrap_or(Value::Null),
                )]))
            }
            "DeleteRole" => {
                client
                    .delete_role()
                    .role_name(required(request, "RoleName")?)
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::empty())
            }
            "GetUser" => {
                let out = client
                    .get_user()
                    .set_user_name(request.string("UserName"))
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::object([(
                    "User",
                    out.user().map(convert::user).unwrap_or(Value::Null),
                )]))
            }
            "ListUsers" => {
                let out = client
                    .list_users()
                    .set_path_prefix(request.string("PathPrefix"))
                    .set_marker(request.string("Marker"))
                    .set_max_items(max_items(request))
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::page(
                    "Users",
                    out.users().iter().map(convert::user).collect(),
                    out.marker(),
                ))
            }
            "CreateUser" => {
                let out = client
                    .create_user()
                    .set_path(request.string("Path"))
                    .user_name(required(request, "UserName")?)
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::object([(
                    "User",
                    out.user().map(convert::user).unwrap_or(Value::Null),
                )]))
            }
            "DeleteUser" => {
                client
                    .delete_user()
                    .user_name(required(request, "UserName")?)
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::empty())
            }
            "ListGroups" => {
                let out = client
                    .list_groups()
                    .set_path_prefix(request.string("PathPrefix"))
                    .set_marker(request.string("Marker"))
                    .set_max_items(max_items(request))
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::page(
                    "Groups",
                    out.groups().iter().map(convert::group).collect(),
                    out.marker(),
                ))
            }
            "ListSAMLProviders" => {
                let out = client
                    .list_saml_providers()
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                let providers: Vec<Value> = out
                    .saml_provider_list()
                    .iter()
                    .map(convert::saml_provider_entry)
                    .collect();
                Ok(convert::object([("SAMLProviderList", Value::Array(providers))]))
            }
            "GetSAMLProvider" => {
                let out = client
                    .get_saml_provider()
                    .saml_provider_arn(required(request, "SAMLProviderArn")?)
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::saml_provider(
                    out.saml_metadata_document(),
                    out.create_date(),
                    out.valid_until(),
                    out.tags(),
                ))
            }
            "DeleteSAMLProvider" => {
                client
                    .delete_saml_provider()
                    .saml_provider_arn(required(request, "SAMLProviderArn")?)
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::empty())
            }
            "GetPolicy" => {
                let out = client
                    .get_policy()
                    .policy_arn(required(request, "PolicyArn")?)
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::object([(
                    "Policy",
                    out.policy().map(convert::policy).unwrap_or(Value::Null),
                )]))
            }
            "ListPolicies" => {
                let out = client
                    .list_policies()
                    .set_scope(request.str("Scope").map(PolicyScopeType::from))
                    .set_only_attached(request.boolean("OnlyAttached"))
                    .set_path_prefix(request.string("PathPrefix"))
                    .set_policy_usage_filter(
                        request.str("PolicyUsageFilter").map(PolicyUsageType::from),
                    )
                    .set_marker(request.string("Marker"))
                    .set_max_items(max_items(request))
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::page(
                    "Policies",
                    out.policies().iter().map(convert::policy).collect(),
                    out.marker(),
                ))
            }
            "AttachRolePolicy" => {
                client
                    .attach_role_policy()
                    .role_name(required(request, "RoleName")?)
                    .policy_arn(required(request, "PolicyArn")?)
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::empty())
            }
            "DetachRolePolicy" => {
                client
                    .detach_role_policy()
                    .role_name(required(request, "RoleName")?)
                    .policy_arn(required(request, "PolicyArn")?)
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::empty())
            }
            "GetAccountSummary" => {
                let out = client
                    .get_account_summary()
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::object([(
                    "SummaryMap",
                    convert::summary_map(out.summary_map()),
                )]))
            }
            "ListAccountAliases" => {
                let out = client
                    .list_account_aliases()
                    .set_marker(request.string("Marker"))
                    .set_max_items(max_items(request))
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::page(
                    "AccountAliases",
                    out.account_aliases()
                        .iter()
                        .map(|alias| Value::String(alias.clone()))
                        .collect(),
                    out.marker(),
                ))
            }
            "CreateAccountAlias" => {
                client
                    .create_account_alias()
                    .account_alias(required(request, "AccountAlias")?)
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::empty())
            }
            "ListAccessKeys" => {
                let out = client
                    .list_access_keys()
                    .set_user_name(request.string("UserName"))
                    .set_marker(request.string("Marker"))
                    .set_max_items(max_items(request))
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::page(
                    "AccessKeyMetadata",
                    out.access_key_metadata()
                        .iter()
                        .map(convert::access_key)
                        .collect(),
                    out.marker(),
                ))
            }
            "UpdateAccessKey" => {
                client
                    .update_access_key()
                    .set_user_name(request.string("UserName"))
                    .access_key_id(required(request, "AccessKeyId")?)
                    .status(StatusType::from(required(request, "Status")?.as_str()))
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::empty())
            }
            "DeleteAccessKey" => {
                client
                    .delete_access_key()
                    .set_user_name(request.string("UserName"))
                    .access_key_id(required(request, "AccessKeyId")?)
                    .send()
                    .await
                    .map_err(sdk_failure)?;
                Ok(convert::empty())
            }
            other => Err(ServiceError::Construction(format!(
                "operation {} has no SDK binding",
                other
            ))),
        }
    }

    fn endpoint_hint(&self) -> EndpointHint {
        let resolved_region = self
            .client
            .get()
            .and_then(|client| client.config().region().map(|region| region.to_string()));

        EndpointHint {
            region: resolved_region.or_else(|| self.settings.region.clone()),
            endpoint_url: self.settings.endpoint_url.clone(),
        }
    }
}
