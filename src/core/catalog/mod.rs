//! Operation catalog
//!
//! Every command iamctl exposes is described by one [`OperationDescriptor`]
//! in a static table. The CLI, the binder, the selector and the service
//! adapter all read from that table; none of them carry per-operation code
//! except the SDK adapter.

mod operations;

use std::fmt;

pub use operations::OPERATIONS;

/// Cmdlet verb, the first half of the verb-noun alias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Verb {
    Get,
    New,
    Remove,
    Enable,
    Disable,
    Register,
    Unregister,
    Update,
}

impl Verb {
    pub const ALL: [Verb; 8] = [
        Verb::Get,
        Verb::New,
        Verb::Remove,
        Verb::Enable,
        Verb::Disable,
        Verb::Register,
        Verb::Unregister,
        Verb::Update,
    ];

    /// Whether invoking an operation with this verb changes server state
    pub fn is_state_changing(self) -> bool {
        !matches!(self, Verb::Get)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "Get",
            Verb::New => "New",
            Verb::Remove => "Remove",
            Verb::Enable => "Enable",
            Verb::Disable => "Disable",
            Verb::Register => "Register",
            Verb::Unregister => "Unregister",
            Verb::Update => "Update",
        }
    }

    pub fn parse(value: &str) -> Option<Verb> {
        Verb::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value kind of a request field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    /// Integer with an inclusive range
    Integer { min: i64, max: i64 },
    Boolean,
    /// One of a fixed set of strings
    Enum(&'static [&'static str]),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Integer { min, max } => write!(f, "integer ({}..={})", min, max),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::Enum(values) => write!(f, "one of {}", values.join("|")),
        }
    }
}

/// Request field of an operation
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// API member name (PascalCase)
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Allowed pattern, matched against the whole value
    pub pattern: Option<&'static str>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub help: &'static str,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind, help: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            pattern: None,
            min_len: None,
            max_len: None,
            help,
        }
    }

    pub const fn string(name: &'static str, help: &'static str) -> Self {
        Self::new(name, FieldKind::String, help)
    }

    pub const fn integer(name: &'static str, min: i64, max: i64, help: &'static str) -> Self {
        Self::new(name, FieldKind::Integer { min, max }, help)
    }

    pub const fn boolean(name: &'static str, help: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean, help)
    }

    pub const fn one_of(
        name: &'static str,
        values: &'static [&'static str],
        help: &'static str,
    ) -> Self {
        Self::new(name, FieldKind::Enum(values), help)
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn pattern(self, pattern: &'static str) -> Self {
        Self {
            pattern: Some(pattern),
            ..self
        }
    }

    pub const fn length(self, min: usize, max: usize) -> Self {
        Self {
            min_len: Some(min),
            max_len: Some(max),
            ..self
        }
    }

    /// Command-line option name, e.g. `role-name`
    pub fn flag_name(&self) -> String {
        to_kebab_case(self.name)
    }
}

/// Static description of one IAM API operation
#[derive(Debug)]
pub struct OperationDescriptor {
    /// API operation name, e.g. `GetRole`
    pub operation: &'static str,
    pub verb: Verb,
    /// Noun half of the cmdlet alias, e.g. `Role`
    pub noun: &'static str,
    pub summary: &'static str,
    pub fields: &'static [FieldSpec],
    /// Top-level members of the response
    pub response: &'static [&'static str],
    /// Selector used when the caller does not pass one
    pub default_select: &'static str,
    /// Field whose value names the resource acted upon
    pub target: Option<&'static str>,
}

impl OperationDescriptor {
    /// Subcommand name, e.g. `list-saml-providers`
    pub fn command_name(&self) -> String {
        to_kebab_case(self.operation)
    }

    /// Verb-noun alias, e.g. `Get-IAMSAMLProviderList`
    pub fn cmdlet_name(&self) -> String {
        format!("{}-IAM{}", self.verb, self.noun)
    }

    pub fn is_state_changing(&self) -> bool {
        self.verb.is_state_changing()
    }

    /// Look up a request field by API name, ignoring case
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    /// Look up a top-level response member, ignoring case
    pub fn response_field(&self, name: &str) -> Option<&'static str> {
        self.response
            .iter()
            .copied()
            .find(|member| member.eq_ignore_ascii_case(name))
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|field| field.required)
    }

    /// Whether `name` refers to this operation by API name, command name or alias
    pub fn matches(&self, name: &str) -> bool {
        self.operation.eq_ignore_ascii_case(name)
            || self.command_name() == name.to_ascii_lowercase()
            || self.cmdlet_name().eq_ignore_ascii_case(name)
    }
}

/// Lookup over a table of operation descriptors
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    operations: &'static [OperationDescriptor],
}

impl Catalog {
    /// Catalog of every operation shipped with iamctl
    pub fn builtin() -> Self {
        Self::from_table(OPERATIONS)
    }

    pub fn from_table(operations: &'static [OperationDescriptor]) -> Self {
        Self { operations }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static OperationDescriptor> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&'static OperationDescriptor> {
        self.operations.iter().find(|op| op.matches(name))
    }

    pub fn with_verb(&self, verb: Verb) -> impl Iterator<Item = &'static OperationDescriptor> {
        self.operations.iter().filter(move |op| op.verb == verb)
    }
}

/// Convert a PascalCase API name to kebab case, keeping acronyms together.
///
/// `ListSAMLProviders` becomes `list-saml-providers`.
pub fn to_kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
                if prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_is_lower)
                {
                    out.push('-');
                }
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}
