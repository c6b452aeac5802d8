// Typed SDK shapes to JSON documents keyed by API member name
use aws_sdk_iam::primitives::{DateTime, DateTimeFormat};
use aws_sdk_iam::types::{
    AccessKeyMetadata, FeatureType, Group, Policy, Role, SamlProviderListEntry, SummaryKeyType,
    Tag, User,
};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Build an object from members, dropping the ones that are null
pub fn object<I>(members: I) -> Value
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    let map: Map<String, Value> = members
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    Value::Object(map)
}

/// Response of an operation that returns no members
pub fn empty() -> Value {
    Value::Object(Map::new())
}

/// One page of a list operation
pub fn page(key: &'static str, items: Vec<Value>, marker: Option<&str>) -> Value {
    object([
        (key, Value::Array(items)),
        ("IsTruncated", Value::Bool(marker.is_some())),
        ("Marker", text(marker)),
    ])
}

pub fn text(value: Option<&str>) -> Value {
    value.map(|s| Value::String(s.to_string())).unwrap_or(Value::Null)
}

pub fn timestamp(value: &DateTime) -> Value {
    value
        .fmt(DateTimeFormat::DateTime)
        .map(Value::String)
        .unwrap_or(Value::Null)
}

fn optional_timestamp(value: Option<&DateTime>) -> Value {
    value.map(timestamp).unwrap_or(Value::Null)
}

pub fn tags(tags: &[Tag]) -> Value {
    if tags.is_empty() {
        return Value::Null;
    }
    Value::Array(
        tags.iter()
            .map(|tag| {
                object([
                    ("Key", Value::String(tag.key().to_string())),
                    ("Value", Value::String(tag.value().to_string())),
                ])
            })
            .collect(),
    )
}

pub fn role(role: &Role) -> Value {
    let last_used = role.role_last_used().map(|last_used| {
        object([
            ("LastUsedDate", optional_timestamp(last_used.last_used_date())),
            ("Region", text(last_used.region())),
        ])
    });

    object([
        ("Path", Value::String(role.path().to_string())),
        ("RoleName", Value::String(role.role_name().to_string())),
        ("RoleId", Value::String(role.role_id().to_string())),
        ("Arn", Value::String(role.arn().to_string())),
        ("CreateDate", timestamp(role.create_date())),
        ("AssumeRolePolicyDocument", text(role.assume_role_policy_document())),
        ("Description", text(role.description())),
        (
            "MaxSessionDuration",
            role.max_session_duration().map(Value::from).unwrap_or(Value::Null),
        ),
        (
            "PermissionsBoundary",
            text(
                role.permissions_boundary()
                    .and_then(|boundary| boundary.permissions_boundary_arn()),
            ),
        ),
        ("Tags", tags(role.tags())),
        ("RoleLastUsed", last_used.unwrap_or(Value::Null)),
    ])
}

pub fn user(user: &User) -> Value {
    object([
        ("Path", Value::String(user.path().to_string())),
        ("UserName", Value::String(user.user_name().to_string())),
        ("UserId", Value::String(user.user_id().to_string())),
        ("Arn", Value::String(user.arn().to_string())),
        ("CreateDate", timestamp(user.create_date())),
        ("PasswordLastUsed", optional_timestamp(user.password_last_used())),
        ("Tags", tags(user.tags())),
    ])
}

pub fn group(group: &Group) -> Value {
    object([
        ("Path", Value::String(group.path().to_string())),
        ("GroupName", Value::String(group.group_name().to_string())),
        ("GroupId", Value::String(group.group_id().to_string())),
        ("Arn", Value::String(group.arn().to_string())),
        ("CreateDate", timestamp(group.create_date())),
    ])
}

pub fn policy(policy: &Policy) -> Value {
    object([
        ("PolicyName", text(policy.policy_name())),
        ("PolicyId", text(policy.policy_id())),
        ("Arn", text(policy.arn())),
        ("Path", text(policy.path())),
        ("DefaultVersionId", text(policy.default_version_id())),
        ("Description", text(policy.description())),
        ("CreateDate", optional_timestamp(policy.create_date())),
        ("UpdateDate", optional_timestamp(policy.update_date())),
        ("Tags", tags(policy.tags())),
    ])
}

pub fn saml_provider_entry(entry: &SamlProviderListEntry) -> Value {
    object([
        ("Arn", text(entry.arn())),
        ("ValidUntil", optional_timestamp(entry.valid_until())),
        ("CreateDate", optional_timestamp(entry.create_date())),
    ])
}

pub fn saml_provider(
    metadata: Option<&str>,
    create_date: Option<&DateTime>,
    valid_until: Option<&DateTime>,
    provider_tags: &[Tag],
) -> Value {
    object([
        ("SAMLMetadataDocument", text(metadata)),
        ("CreateDate", optional_timestamp(create_date)),
        ("ValidUntil", optional_timestamp(valid_until)),
        ("Tags", tags(provider_tags)),
    ])
}

pub fn access_key(key: &AccessKeyMetadata) -> Value {
    object([
        ("UserName", text(key.user_name())),
        ("AccessKeyId", text(key.access_key_id())),
        ("Status", text(key.status().map(|status| status.as_str()))),
        ("CreateDate", optional_timestamp(key.create_date())),
    ])
}

pub fn organization_features(organization_id: Option<&str>, features: &[FeatureType]) -> Value {
    object([
        ("OrganizationId", text(organization_id)),
        (
            "EnabledFeatures",
            Value::Array(
                features
                    .iter()
                    .map(|feature| Value::String(feature.as_str().to_string()))
                    .collect(),
            ),
        ),
    ])
}

/// Summary entries sorted by key
pub fn summary_map(summary: Option<&HashMap<SummaryKeyType, i32>>) -> Value {
    let Some(summary) = summary else {
        return Value::Null;
    };
    let sorted: BTreeMap<&str, i32> = summary
        .iter()
        .map(|(key, count)| (key.as_str(), *count))
        .collect();
    Value::Object(
        sorted
            .into_iter()
            .map(|(key, count)| (key.to_string(), Value::from(count)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_drops_nulls() {
        let value = object([("A", json!(1)), ("B", Value::Null), ("C", json!("x"))]);
        assert_eq!(value, json!({"A": 1, "C": "x"}));
    }

    #[test]
    fn test_page_marks_truncation() {
        let value = page("Roles", vec![json!({"RoleName": "a"})], Some("next"));
        assert_eq!(value["IsTruncated"], json!(true));
        assert_eq!(value["Marker"], json!("next"));

        let value = page("Roles", Vec::new(), None);
        assert_eq!(value, json!({"Roles": [], "IsTruncated": false}));
    }

    #[test]
    fn test_timestamp_format() {
        let value = timestamp(&DateTime::from_secs(0));
        assert_eq!(value, json!("1970-01-01T00:00:00Z"));
    }

    #[test]
    fn test_organization_features() {
        let value = organization_features(
            Some("o-abc123"),
            &[FeatureType::from("RootSessions")],
        );
        assert_eq!(
            value,
            json!({"OrganizationId": "o-abc123", "EnabledFeatures": ["RootSessions"]})
        );
    }

    #[test]
    fn test_summary_map_is_sorted() {
        let mut summary = HashMap::new();
        summary.insert(SummaryKeyType::from("Users"), 4);
        summary.insert(SummaryKeyType::from("Roles"), 9);

        let value = summary_map(Some(&summary));
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Roles", "Users"]);
        assert_eq!(value["Roles"], json!(9));
        assert_eq!(summary_map(None), Value::Null);
    }
}
