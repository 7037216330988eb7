//! Parsing of free-form command-line attributes
//!
//! Two grammars are supported:
//! - `k1=v1,k2=v2` mappings (e.g. `--extra-config`)
//! - `--key [hint] value...` attribute lists (update bodies and list filters)

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::domain::error::{DomainError, DomainResult};

/// Parse `k1=v1,k2=v2` into a mapping.
///
/// An empty string yields an empty mapping. Values may contain `=`;
/// only the first one separates key from value.
pub fn parse_key_value_map(input: &str) -> DomainResult<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    if input.trim().is_empty() {
        return Ok(map);
    }
    for pair in input.split(',') {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidKeyValue(pair.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::InvalidKeyValue(pair.to_string()));
        }
        map.insert(key.to_string(), value.trim().to_string());
    }
    Ok(map)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueType {
    Str,
    Bool,
    Int,
    Dict,
}

#[derive(Debug, Default)]
struct Attribute {
    key: String,
    value_type: Option<ValueType>,
    list: bool,
    values: Vec<String>,
}

/// Parse `--key value` style attributes into a JSON object.
///
/// - `--key` alone becomes `true`
/// - `--key v` becomes a string, `--key v1 v2` a list
/// - `--key=v` is the same as `--key v`
/// - a first value of `type=bool|int|dict|str` or `list=true` is a hint, not a value
///
/// Dashes in keys become underscores.
pub fn parse_attributes(args: &[String]) -> DomainResult<Map<String, Value>> {
    let mut attributes: Vec<Attribute> = Vec::new();

    for arg in args {
        if let Some(rest) = arg.strip_prefix("--") {
            let (name, inline) = match rest.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (rest, None),
            };
            let key = normalize_key(name)?;
            if attributes.iter().any(|a| a.key == key) {
                return Err(DomainError::DuplicateKey(key));
            }
            let mut attribute = Attribute {
                key,
                ..Default::default()
            };
            if let Some(value) = inline {
                attribute.values.push(value.to_string());
            }
            attributes.push(attribute);
            continue;
        }

        let current = attributes
            .last_mut()
            .ok_or_else(|| DomainError::DanglingValue(arg.clone()))?;
        if current.values.is_empty() && apply_hint(current, arg)? {
            continue;
        }
        current.values.push(arg.clone());
    }

    let mut body = Map::new();
    for attribute in attributes {
        let value = attribute.into_value()?;
        body.insert(value.0, value.1);
    }
    Ok(body)
}

/// Flatten attributes into query parameters; lists repeat the key.
pub fn attributes_to_query(args: &[String]) -> DomainResult<Vec<(String, String)>> {
    let mut query = Vec::new();
    for (key, value) in parse_attributes(args)? {
        match value {
            Value::Array(items) => {
                for item in items {
                    query.push((key.clone(), scalar_to_string(&item)));
                }
            }
            other => query.push((key, scalar_to_string(&other))),
        }
    }
    Ok(query)
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn normalize_key(name: &str) -> DomainResult<String> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':');
    if !valid {
        return Err(DomainError::InvalidKey(name.to_string()));
    }
    Ok(name.replace('-', "_"))
}

/// Returns true when `token` was consumed as a hint.
fn apply_hint(attribute: &mut Attribute, token: &str) -> DomainResult<bool> {
    if let Some(kind) = token.strip_prefix("type=") {
        attribute.value_type = Some(match kind {
            "str" | "string" => ValueType::Str,
            "bool" => ValueType::Bool,
            "int" => ValueType::Int,
            "dict" => ValueType::Dict,
            _ => return Err(DomainError::UnsupportedHint(token.to_string())),
        });
        return Ok(true);
    }
    if let Some(flag) = token.strip_prefix("list=") {
        attribute.list = match flag.to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => return Err(DomainError::UnsupportedHint(token.to_string())),
        };
        return Ok(true);
    }
    Ok(false)
}

impl Attribute {
    fn into_value(self) -> DomainResult<(String, Value)> {
        let value_type = self.value_type.unwrap_or(ValueType::Str);

        if self.values.is_empty() && !self.list {
            // A bare flag: `--enabled`
            return match self.value_type {
                None | Some(ValueType::Bool) => Ok((self.key, Value::Bool(true))),
                Some(_) => Err(DomainError::InvalidValue {
                    key: self.key,
                    value: String::new(),
                    expected: "a value",
                }),
            };
        }

        let mut converted = Vec::with_capacity(self.values.len());
        for raw in &self.values {
            converted.push(convert(&self.key, raw, value_type)?);
        }

        let value = if self.list || converted.len() > 1 {
            Value::Array(converted)
        } else {
            converted.remove(0)
        };
        Ok((self.key, value))
    }
}

fn convert(key: &str, raw: &str, value_type: ValueType) -> DomainResult<Value> {
    let invalid = |expected| DomainError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        expected,
    };
    match value_type {
        ValueType::Str => Ok(Value::String(raw.to_string())),
        ValueType::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Value::Bool(true)),
            "false" | "0" | "no" => Ok(Value::Bool(false)),
            _ => Err(invalid("a boolean")),
        },
        ValueType::Int => raw
            .parse::<i64>()
            .map(|n| Value::Number(Number::from(n)))
            .map_err(|_| invalid("an integer")),
        ValueType::Dict => {
            let map = parse_key_value_map(raw)?;
            Ok(Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ))
        }
    }
}
