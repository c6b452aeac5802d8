use crate::cli::args::OutputFormat;
use crate::core::catalog::{FieldSpec, OperationDescriptor};
use crate::domain::config::IamCtlConfig;
use serde::Serialize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_value(&self, value: &Value) -> Result<(), OutputError>;
    fn write_operations(&self, operations: &[&OperationDescriptor]) -> Result<(), OutputError>;
    fn write_operation_detail(&self, operation: &OperationDescriptor) -> Result<(), OutputError>;
    fn write_config(&self, config: &IamCtlConfig) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<OutputError> for crate::domain::error::IamCtlError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_value(&self, value: &Value) -> Result<(), OutputError> {
        let rendered = render_value(self.format, value)?;
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
        Ok(())
    }

    fn write_operations(&self, operations: &[&OperationDescriptor]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                for op in operations {
                    let marker = if op.is_state_changing() { " *" } else { "" };
                    println!("{:<44} {}{}", op.command_name(), op.summary, marker);
                }
            }
            OutputFormat::Json => {
                let infos: Vec<OperationInfo> =
                    operations.iter().map(|op| OperationInfo::from(*op)).collect();
                println!("{}", serde_json::to_string_pretty(&infos)?);
            }
            OutputFormat::Table => {
                if !operations.is_empty() {
                    let rows: Vec<OperationTableRow> =
                        operations.iter().map(|op| OperationTableRow::from(*op)).collect();
                    println!("{}", Table::new(rows));
                }
            }
            OutputFormat::Csv => {
                println!("command,cmdlet,operation,verb,state_changing");
                for op in operations {
                    println!(
                        "{},{},{},{},{}",
                        op.command_name(),
                        op.cmdlet_name(),
                        op.operation,
                        op.verb,
                        op.is_state_changing()
                    );
                }
            }
        }
        Ok(())
    }

    fn write_operation_detail(&self, operation: &OperationDescriptor) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                println!("{} ({})", operation.command_name(), operation.cmdlet_name());
                println!("  {}", operation.summary);
                println!("  API operation: {}", operation.operation);
                println!("  State changing: {}", operation.is_state_changing());
                println!("  Default selector: {}", operation.default_select);
                if operation.fields.is_empty() {
                    println!("  Parameters: none");
                } else {
                    println!("  Parameters:");
                    for field in operation.fields {
                        println!("    {}", describe_field(field));
                    }
                }
                println!("  Response members: {}", operation.response.join(", "));
            }
            OutputFormat::Json => {
                let info = OperationInfo::from(operation);
                println!("{}", serde_json::to_string_pretty(&info)?);
            }
            OutputFormat::Table => {
                if !operation.fields.is_empty() {
                    let rows: Vec<FieldTableRow> =
                        operation.fields.iter().map(FieldTableRow::from).collect();
                    println!("{}", Table::new(rows));
                }
            }
            OutputFormat::Csv => {
                println!("parameter,option,type,required");
                for field in operation.fields {
                    println!(
                        "{},--{},{},{}",
                        field.name,
                        field.flag_name(),
                        csv_escape(&field.kind.to_string()),
                        field.required
                    );
                }
            }
        }
        Ok(())
    }

    fn write_config(&self, config: &IamCtlConfig) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            format => {
                let value = serde_json::to_value(config)?;
                println!("{}", render_value(format, &flatten_config(&value))?);
            }
        }
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "message": message,
                    "level": "info"
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                println!("{}", message);
            }
        }
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "error": error,
                    "level": "error"
                });
                eprintln!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                eprintln!("Error: {}", error);
            }
        }
        Ok(())
    }
}

/// Render one output value in `format`
pub fn render_value(format: OutputFormat, value: &Value) -> Result<String, OutputError> {
    match format {
        OutputFormat::Text => {
            let mut lines = Vec::new();
            render_text(value, 0, &mut lines);
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => {
            let (header, rows) = tabulate(value);
            if rows.is_empty() {
                return Ok(String::new());
            }
            let mut records = Vec::with_capacity(rows.len() + 1);
            records.push(header);
            records.extend(rows);
            Ok(Builder::from(records).build().to_string())
        }
        OutputFormat::Csv => {
            let (header, rows) = tabulate(value);
            let mut lines = Vec::with_capacity(rows.len() + 1);
            lines.push(csv_line(&header));
            lines.extend(rows.iter().map(|row| csv_line(row)));
            Ok(lines.join("\n"))
        }
    }
}

fn render_text(value: &Value, indent: usize, lines: &mut Vec<String>) {
    let pad = " ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, member) in map {
                if is_inline(member) {
                    lines.push(format!("{}{}: {}", pad, key, inline(member)));
                } else {
                    lines.push(format!("{}{}:", pad, key));
                    render_text(member, indent + 2, lines);
                }
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if is_inline(item) {
                    lines.push(format!("{}{}", pad, inline(item)));
                } else {
                    // Blank line between consecutive records
                    if index > 0 && indent == 0 {
                        lines.push(String::new());
                    }
                    render_text(item, indent, lines);
                }
            }
        }
        scalar => lines.push(format!("{}{}", pad, scalar_text(scalar))),
    }
}

fn is_inline(value: &Value) -> bool {
    match value {
        Value::Object(_) => false,
        Value::Array(items) => items.iter().all(|item| !item.is_object() && !item.is_array()),
        _ => true,
    }
}

fn inline(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(scalar_text).collect::<Vec<_>>().join(", "),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Header and rows for tabular formats. Records become rows, scalars a single `Value` column.
fn tabulate(value: &Value) -> (Vec<String>, Vec<Vec<String>>) {
    let records: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    };

    if !records.iter().all(|record| record.is_object()) {
        let rows = records.iter().map(|record| vec![cell(record)]).collect();
        return (vec!["Value".to_string()], rows);
    }

    let mut header: Vec<String> = Vec::new();
    for record in &records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !header.contains(key) {
                    header.push(key.clone());
                }
            }
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            header
                .iter()
                .map(|key| record.get(key).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();
    (header, rows)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => value.to_string(),
        scalar => scalar_text(scalar),
    }
}

fn csv_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| csv_escape(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// `{"global": {"log_level": ..}}` becomes `{"global.log_level": ..}`
fn flatten_config(value: &Value) -> Value {
    let mut flat = Map::new();
    if let Value::Object(sections) = value {
        for (section, members) in sections {
            match members {
                Value::Object(members) => {
                    for (key, member) in members {
                        flat.insert(format!("{}.{}", section, key), member.clone());
                    }
                }
                other => {
                    flat.insert(section.clone(), other.clone());
                }
            }
        }
    }
    Value::Object(flat)
}

fn describe_field(field: &FieldSpec) -> String {
    let mut text = format!("--{} <{}>", field.flag_name(), field.kind);
    if field.required {
        text.push_str(" [required]");
    }
    if !field.help.is_empty() {
        text.push_str("  ");
        text.push_str(field.help);
    }
    text
}

/// Serializable view of an operation descriptor
#[derive(Debug, Serialize)]
struct OperationInfo {
    command: String,
    cmdlet: String,
    operation: &'static str,
    verb: &'static str,
    summary: &'static str,
    state_changing: bool,
    default_select: &'static str,
    parameters: Vec<ParameterInfo>,
    response: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct ParameterInfo {
    name: &'static str,
    option: String,
    kind: String,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<&'static str>,
}

impl From<&OperationDescriptor> for OperationInfo {
    fn from(op: &OperationDescriptor) -> Self {
        Self {
            command: op.command_name(),
            cmdlet: op.cmdlet_name(),
            operation: op.operation,
            verb: op.verb.as_str(),
            summary: op.summary,
            state_changing: op.is_state_changing(),
            default_select: op.default_select,
            parameters: op
                .fields
                .iter()
                .map(|field| ParameterInfo {
                    name: field.name,
                    option: format!("--{}", field.flag_name()),
                    kind: field.kind.to_string(),
                    required: field.required,
                    pattern: field.pattern,
                })
                .collect(),
            response: op.response,
        }
    }
}

/// Table row for the operation list
#[derive(Tabled)]
struct OperationTableRow {
    command: String,
    cmdlet: String,
    verb: String,
    mutating: bool,
    summary: String,
}

impl From<&OperationDescriptor> for OperationTableRow {
    fn from(op: &OperationDescriptor) -> Self {
        Self {
            command: op.command_name(),
            cmdlet: op.cmdlet_name(),
            verb: op.verb.to_string(),
            mutating: op.is_state_changing(),
            summary: op.summary.to_string(),
        }
    }
}

/// Table row for one operation parameter
#[derive(Tabled)]
struct FieldTableRow {
    parameter: String,
    option: String,
    r#type: String,
    required: bool,
}

impl From<&FieldSpec> for FieldTableRow {
    fn from(field: &FieldSpec) -> Self {
        Self {
            parameter: field.name.to_string(),
            option: format!("--{}", field.flag_name()),
            r#type: field.kind.to_string(),
            required: field.required,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use serde_json::json;

    #[test]
    fn test_text_scalars_are_bare() {
        let text = render_value(OutputFormat::Text, &json!("arn:aws:iam::123:role/x")).unwrap();
        assert_eq!(text, "arn:aws:iam::123:role/x");
    }

    #[test]
    fn test_text_objects() {
        let value = json!({"RoleName": "deploy", "Tags": [], "RoleLastUsed": {"Region": "us-east-1"}});
        let text = render_value(OutputFormat::Text, &value).unwrap();
        assert_eq!(text, "RoleName: deploy\nTags: \nRoleLastUsed:\n  Region: us-east-1");
    }

    #[test]
    fn test_text_arrays_emit_each_element() {
        let text = render_value(OutputFormat::Text, &json!(["a", "b"])).unwrap();
        assert_eq!(text, "a\nb");

        let text = render_value(OutputFormat::Text, &json!([{"A": 1}, {"A": 2}])).unwrap();
        assert_eq!(text, "A: 1\n\nA: 2");
    }

    #[test]
    fn test_csv_uses_key_union_and_quotes() {
        let value = json!([{"Name": "a", "Path": "/"}, {"Name": "b,c", "Extra": true}]);
        let csv = render_value(OutputFormat::Csv, &value).unwrap();
        assert_eq!(csv, "Name,Path,Extra\na,/,\n\"b,c\",,true");
    }

    #[test]
    fn test_table_of_scalars() {
        let table = render_value(OutputFormat::Table, &json!(["alias-one"])).unwrap();
        assert!(table.contains("Value"));
        assert!(table.contains("alias-one"));
        assert_eq!(render_value(OutputFormat::Table, &json!([])).unwrap(), "");
    }

    #[test]
    fn test_operation_info() {
        let op = Catalog::builtin().find("DeleteRole").unwrap();
        let info = serde_json::to_value(OperationInfo::from(op)).unwrap();
        assert_eq!(info["command"], "delete-role");
        assert_eq!(info["cmdlet"], "Remove-IAMRole");
        assert_eq!(info["state_changing"], true);
        assert_eq!(info["parameters"][0]["option"], "--role-name");
    }

    #[test]
    fn test_flatten_config() {
        let value = serde_json::to_value(IamCtlConfig::default()).unwrap();
        let flat = flatten_config(&value);
        assert_eq!(flat["global.output"], "text");
        assert_eq!(flat["client.timeout_ms"], 30000);
    }
}
