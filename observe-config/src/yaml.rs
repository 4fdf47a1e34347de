use std::io::ErrorKind;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::warn;

/// Loads a YAML document as a generic key-value mapping.
///
/// An absent file yields an empty mapping without logging. A file that
/// cannot be read or parsed, or whose top level is not a mapping, also
/// yields an empty mapping and logs a warning. A `null` document counts as
/// empty: regenerated files are sometimes truncated mid-write and must not
/// take the read path down with them.
pub fn load_yaml_mapping(path: &Path) -> Mapping {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Mapping::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read yaml file");
            return Mapping::new();
        }
    };

    match serde_yaml::from_str::<Value>(&raw) {
        Ok(Value::Mapping(mapping)) => mapping,
        Ok(Value::Null) => Mapping::new(),
        Ok(_) => {
            warn!(path = %path.display(), "yaml document is not a mapping");
            Mapping::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse yaml file");
            Mapping::new()
        }
    }
}

/// Renders a scalar the way the check files spell it: booleans as
/// `true`/`false`, numbers in their display form, everything else empty.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Interprets a YAML scalar as a flag: real booleans pass through, strings
/// and numbers go through [`is_truthy`].
pub(crate) fn value_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        other => is_truthy(&value_to_string(other)),
    }
}

/// String values accepted as true, case-insensitively.
const TRUTHY_TOKENS: &[&str] = &["1", "true", "yes", "on"];

/// Returns whether a raw string spells one of the accepted true tokens.
pub(crate) fn is_truthy(raw: &str) -> bool {
    TRUTHY_TOKENS
        .iter()
        .any(|token| raw.trim().eq_ignore_ascii_case(token))
}
