use super::{FieldSpec, OperationDescriptor, Verb};

// Shared request fields. Constraints follow the IAM API reference.

const NAME_PATTERN: &str = r"[\w+=,.@-]+";

const ROLE_NAME: FieldSpec = FieldSpec::string("RoleName", "Name of the role")
    .required()
    .pattern(NAME_PATTERN)
    .length(1, 64);

const USER_NAME: FieldSpec = FieldSpec::string("UserName", "Name of the user")
    .required()
    .pattern(NAME_PATTERN)
    .length(1, 64);

const USER_NAME_OPTIONAL: FieldSpec = FieldSpec::string(
    "UserName",
    "Name of the user; defaults to the caller's identity",
)
.pattern(NAME_PATTERN)
.length(1, 128);

const PATH: FieldSpec = FieldSpec::string("Path", "Path for the new entity, e.g. /division/")
    .pattern(r"(/)|(/[\x21-\x7E]+/)")
    .length(1, 512);

const PATH_PREFIX: FieldSpec = FieldSpec::string("PathPrefix", "Only return entities under this path")
    .pattern(r"/[\x21-\x7E]*")
    .length(1, 512);

const MARKER: FieldSpec = FieldSpec::string(
    "Marker",
    "Pagination marker returned by a previous truncated call",
)
.pattern(r"[\x20-\x{FF}]+")
.length(1, 320);

const MAX_ITEMS: FieldSpec = FieldSpec::integer("MaxItems", 1, 1000, "Maximum number of items to return");

const POLICY_ARN: FieldSpec = FieldSpec::string("PolicyArn", "ARN of the managed policy")
    .required()
    .length(20, 2048);

const SAML_PROVIDER_ARN: FieldSpec =
    FieldSpec::string("SAMLProviderArn", "ARN of the SAML provider")
        .required()
        .length(20, 2048);

const ACCESS_KEY_ID: FieldSpec = FieldSpec::string("AccessKeyId", "Access key ID")
    .required()
    .pattern(r"[\w]+")
    .length(16, 128);

const NO_FIELDS: &[FieldSpec] = &[];

const ORGANIZATION_FEATURES: &[&str] = &["OrganizationId", "EnabledFeatures"];

const PAGED_LIST: [FieldSpec; 3] = [PATH_PREFIX, MARKER, MAX_ITEMS];

/// The built-in operation table
pub static OPERATIONS: &[OperationDescriptor] = &[
    // Organization-wide root access
    OperationDescriptor {
        operation: "DisableOrganizationsRootSessions",
        verb: Verb::Disable,
        noun: "OrganizationsRootSession",
        summary: "Disable privileged root actions in member accounts",
        fields: NO_FIELDS,
        response: ORGANIZATION_FEATURES,
        default_select: "*",
        target: None,
    },
    OperationDescriptor {
        operation: "EnableOrganizationsRootSessions",
        verb: Verb::Enable,
        noun: "OrganizationsRootSession",
        summary: "Allow the management account to perform privileged root actions in member accounts",
        fields: NO_FIELDS,
        response: ORGANIZATION_FEATURES,
        default_select: "*",
        target: None,
    },
    OperationDescriptor {
        operation: "DisableOrganizationsRootCredentialsManagement",
        verb: Verb::Disable,
        noun: "OrganizationsRootCredentialsManagement",
        summary: "Disable centralized management of member account root credentials",
        fields: NO_FIELDS,
        response: ORGANIZATION_FEATURES,
        default_select: "*",
        target: None,
    },
    OperationDescriptor {
        operation: "EnableOrganizationsRootCredentialsManagement",
        verb: Verb::Enable,
        noun: "OrganizationsRootCredentialsManagement",
        summary: "Enable centralized management of member account root credentials",
        fields: NO_FIELDS,
        response: ORGANIZATION_FEATURES,
        default_select: "*",
        target: None,
    },
    OperationDescriptor {
        operation: "ListOrganizationsFeatures",
        verb: Verb::Get,
        noun: "OrganizationsFeature",
        summary: "List the centralized root access features enabled for the organization",
        fields: NO_FIELDS,
        response: ORGANIZATION_FEATURES,
        default_select: "*",
        target: None,
    },
    // Roles
    OperationDescriptor {
        operation: "GetRole",
        verb: Verb::Get,
        noun: "Role",
        summary: "Retrieve a role, including its trust policy",
        fields: &[ROLE_NAME],
        response: &["Role"],
        default_select: "Role",
        target: Some("RoleName"),
    },
    OperationDescriptor {
        operation: "ListRoles",
        verb: Verb::Get,
        noun: "RoleList",
        summary: "List the roles under a path prefix",
        fields: &PAGED_LIST,
        response: &["Roles", "IsTruncated", "Marker"],
        default_select: "Roles",
        target: None,
    },
    OperationDescriptor {
        operation: "CreateRole",
        verb: Verb::New,
        noun: "Role",
        summary: "Create a role with a trust policy",
        fields: &[
            PATH,
            ROLE_NAME,
            FieldSpec::string("AssumeRolePolicyDocument", "Trust policy document (JSON)")
                .required()
                .pattern(r"[\t\n\r\x20-\x{FF}]+")
                .length(1, 131_072),
            FieldSpec::string("Description", "Description of the role")
                .pattern(r"[\t\n\r\x20-\x7E\x{A1}-\x{FF}]*")
                .length(0, 1000),
            FieldSpec::integer(
                "MaxSessionDuration",
                3600,
                43_200,
                "Maximum session duration in seconds",
            ),
            FieldSpec::string("PermissionsBoundary", "ARN of the permissions boundary policy")
                .length(20, 2048),
        ],
        response: &["Role"],
        default_select: "Role",
        target: Some("RoleName"),
    },
    OperationDescriptor {
        operation: "DeleteRole",
        verb: Verb::Remove,
        noun: "Role",
        summary: "Delete a role",
        fields: &[ROLE_NAME],
        response: &[],
        default_select: "*",
        target: Some("RoleName"),
    },
    // Users
    OperationDescriptor {
        operation: "GetUser",
        verb: Verb::Get,
        noun: "User",
        summary: "Retrieve a user, or the caller when no name is given",
        fields: &[USER_NAME_OPTIONAL],
        response: &["User"],
        default_select: "User",
        target: Some("UserName"),
    },
    OperationDescriptor {
        operation: "ListUsers",
        verb: Verb::Get,
        noun: "UserList",
        summary: "List the users under a path prefix",
        fields: &PAGED_LIST,
        response: &["Users", "IsTruncated", "Marker"],
        default_select: "Users",
        target: None,
    },
    OperationDescriptor {
        operation: "CreateUser",
        verb: Verb::New,
        noun: "User",
        summary: "Create a user",
        fields: &[PATH, USER_NAME],
        response: &["User"],
        default_select: "User",
        target: Some("UserName"),
    },
    OperationDescriptor {
        operation: "DeleteUser",
        verb: Verb::Remove,
        noun: "User",
        summary: "Delete a user",
        fields: &[USER_NAME],
        response: &[],
        default_select: "*",
        target: Some("UserName"),
    },
    // Groups
    OperationDescriptor {
        operation: "ListGroups",
        verb: Verb::Get,
        noun: "GroupList",
        summary: "List the groups under a path prefix",
        fields: &PAGED_LIST,
        response: &["Groups", "IsTruncated", "Marker"],
        default_select: "Groups",
        target: None,
    },
    // SAML providers
    OperationDescriptor {
        operation: "ListSAMLProviders",
        verb: Verb::Get,
        noun: "SAMLProviderList",
        summary: "List the SAML identity providers in the account",
        fields: NO_FIELDS,
        response: &["SAMLProviderList"],
        default_select: "SAMLProviderList",
        target: None,
    },
    OperationDescriptor {
        operation: "GetSAMLProvider",
        verb: Verb::Get,
        noun: "SAMLProvider",
        summary: "Retrieve the metadata document of a SAML provider",
        fields: &[SAML_PROVIDER_ARN],
        response: &["SAMLMetadataDocument", "CreateDate", "ValidUntil", "Tags"],
        default_select: "*",
        target: Some("SAMLProviderArn"),
    },
    OperationDescriptor {
        operation: "DeleteSAMLProvider",
        verb: Verb::Remove,
        noun: "SAMLProvider",
        summary: "Delete a SAML provider",
        fields: &[SAML_PROVIDER_ARN],
        response: &[],
        default_select: "*",
        target: Some("SAMLProviderArn"),
    },
    // Managed policies
    OperationDescriptor {
        operation: "GetPolicy",
        verb: Verb::Get,
        noun: "Policy",
        summary: "Retrieve a managed policy",
        fields: &[POLICY_ARN],
        response: &["Policy"],
        default_select: "Policy",
        target: Some("PolicyArn"),
    },
    OperationDescriptor {
        operation: "ListPolicies",
        verb: Verb::Get,
        noun: "PolicyList",
        summary: "List managed policies",
        fields: &[
            FieldSpec::one_of("Scope", &["All", "AWS", "Local"], "Which policies to list"),
            FieldSpec::boolean("OnlyAttached", "Only list policies that are attached"),
            PATH_PREFIX,
            FieldSpec::one_of(
                "PolicyUsageFilter",
                &["PermissionsPolicy", "PermissionsBoundary"],
                "Only list policies used this way",
            ),
            MARKER,
            MAX_ITEMS,
        ],
        response: &["Policies", "IsTruncated", "Marker"],
        default_select: "Policies",
        target: None,
    },
    OperationDescriptor {
        operation: "AttachRolePolicy",
        verb: Verb::Register,
        noun: "RolePolicy",
        summary: "Attach a managed policy to a role",
        fields: &[ROLE_NAME, POLICY_ARN],
        response: &[],
        default_select: "*",
        target: Some("RoleName"),
    },
    OperationDescriptor {
        operation: "DetachRolePolicy",
        verb: Verb::Unregister,
        noun: "RolePolicy",
        summary: "Detach a managed policy from a role",
        fields: &[ROLE_NAME, POLICY_ARN],
        response: &[],
        default_select: "*",
        target: Some("RoleName"),
    },
    // Account
    OperationDescriptor {
        operation: "GetAccountSummary",
        verb: Verb::Get,
        noun: "AccountSummary",
        summary: "Retrieve entity usage and quotas for the account",
        fields: NO_FIELDS,
        response: &["SummaryMap"],
        default_select: "SummaryMap",
        target: None,
    },
    OperationDescriptor {
        operation: "ListAccountAliases",
        verb: Verb::Get,
        noun: "AccountAlias",
        summary: "List the account alias",
        fields: &[MARKER, MAX_ITEMS],
        response: &["AccountAliases", "IsTruncated", "Marker"],
        default_select: "AccountAliases",
        target: None,
    },
    OperationDescriptor {
        operation: "CreateAccountAlias",
        verb: Verb::New,
        noun: "AccountAlias",
        summary: "Create an alias for the account",
        fields: &[FieldSpec::string("AccountAlias", "Alias to create")
            .required()
            .pattern(r"[a-z0-9][a-z0-9-]*[a-z0-9]")
            .length(3, 63)],
        response: &[],
        default_select: "*",
        target: Some("AccountAlias"),
    },
    // Access keys
    OperationDescriptor {
        operation: "ListAccessKeys",
        verb: Verb::Get,
        noun: "AccessKey",
        summary: "List the access keys of a user",
        fields: &[USER_NAME_OPTIONAL, MARKER, MAX_ITEMS],
        response: &["AccessKeyMetadata", "IsTruncated", "Marker"],
        default_select: "AccessKeyMetadata",
        target: None,
    },
    OperationDescriptor {
        operation: "UpdateAccessKey",
        verb: Verb::Update,
        noun: "AccessKey",
        summary: "Activate or deactivate an access key",
        fields: &[
            USER_NAME_OPTIONAL,
            ACCESS_KEY_ID,
            FieldSpec::one_of("Status", &["Active", "Inactive"], "New key status").required(),
        ],
        response: &[],
        default_select: "*",
        target: Some("AccessKeyId"),
    },
    OperationDescriptor {
        operation: "DeleteAccessKey",
        verb: Verb::Remove,
        noun: "AccessKey",
        summary: "Delete an access key",
        fields: &[USER_NAME_OPTIONAL, ACCESS_KEY_ID],
        response: &[],
        default_select: "*",
        target: Some("AccessKeyId"),
    },
];
