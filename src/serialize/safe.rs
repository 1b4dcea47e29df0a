//! Cycle-safe serialization of argument graphs.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value as JsonValue};

use super::value::Value;

/// Replaces any node reached again while it is still being serialized.
pub const CIRCULAR: &str = "[Circular]";

/// Default indentation for JSON text and re-indented line breaks.
pub const DEFAULT_INDENT: &str = "  ";

/// Serializes argument lists without ever failing, cycles included.
///
/// Cycle detection keeps a side table of the node addresses on the current
/// path. The table lives for one call only, so caller data is never touched
/// and a later call over the same graph starts clean.
#[derive(Debug, Clone)]
pub struct SafeSerializer {
    indent: String,
}

impl Default for SafeSerializer {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl SafeSerializer {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
        }
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// Structural JSON copy of `value` with cycles cut.
    pub fn to_json(&self, value: &Value) -> JsonValue {
        let mut path = HashSet::new();
        Self::visit(value, &mut path)
    }

    /// JSON array of the arguments, as sent over the wire.
    pub fn to_json_args(&self, args: &[Value]) -> JsonValue {
        JsonValue::Array(args.iter().map(|arg| self.to_json(arg)).collect())
    }

    /// Indented JSON text of `value`.
    pub fn serialize(&self, value: &Value) -> String {
        let json = self.to_json(value);
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(self.indent.as_bytes());
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        match json.serialize(&mut ser) {
            Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| json.to_string()),
            Err(_) => json.to_string(),
        }
    }

    /// Render a whole argument list as one message.
    ///
    /// Strings are taken verbatim, errors by their message chain, everything
    /// else as indented JSON. Embedded newlines are re-indented and the
    /// arguments are joined by an indented line break.
    pub fn stringify_arguments(&self, args: &[Value]) -> String {
        let break_indent = format!("\n{}", self.indent);
        args.iter()
            .map(|arg| {
                let line = match arg {
                    Value::String(s) | Value::Error(s) => s.clone(),
                    other => self.serialize(other),
                };
                line.replace('\n', &break_indent)
            })
            .collect::<Vec<_>>()
            .join(&break_indent)
    }

    fn visit(value: &Value, path: &mut HashSet<usize>) -> JsonValue {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => JsonValue::Number(n.clone()),
            Value::String(s) | Value::Error(s) => JsonValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => {
                let Some(addr) = value.node_addr() else {
                    return JsonValue::Null;
                };
                if !path.insert(addr) {
                    return JsonValue::String(CIRCULAR.to_string());
                }
                let json = match value {
                    Value::Array(node) => JsonValue::Array(
                        node.borrow().iter().map(|item| Self::visit(item, path)).collect(),
                    ),
                    Value::Object(node) => {
                        let mut fields = Map::new();
                        for (key, item) in node.borrow().iter() {
                            fields.insert(key.clone(), Self::visit(item, path));
                        }
                        JsonValue::Object(fields)
                    }
                    _ => JsonValue::Null,
                };
                path.remove(&addr);
                json
            }
        }
    }
}
