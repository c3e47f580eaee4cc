// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema-validated, dotted-key configuration (spec.md §4.2).
//!
//! Loads either a YAML document or a flat `KEY=VALUE` file through the same
//! schema; writes always target the canonical YAML format. Precedence
//! (highest first, spec.md §3 "Global Defaults"): environment overrides,
//! per-project config, global config, built-in defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::StateError;
use crate::schema::{lookup, ValueKind, SCHEMA};

/// A flat, dotted-key configuration document. Values are kept as strings
/// internally and parsed on read, mirroring the flat-file source format and
/// avoiding a second representation to keep in sync with the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    values: BTreeMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in defaults from the schema.
    pub fn defaults() -> Self {
        let mut values = BTreeMap::new();
        for entry in SCHEMA {
            if !entry.default.is_empty() {
                values.insert(entry.key.to_string(), entry.default.to_string());
            }
        }
        Self { values }
    }

    /// Merge `overlay` on top of `self`, overlay values winning.
    pub fn merged_with(&self, overlay: &Config) -> Config {
        let mut values = self.values.clone();
        for (k, v) in &overlay.values {
            values.insert(k.clone(), v.clone());
        }
        Config { values }
    }

    /// Applies `CHECKPOINT_<KEY>` environment overrides, dots in the key
    /// becoming double underscores, e.g. `retention.keep_minimum` ->
    /// `CHECKPOINT_RETENTION__KEEP_MINIMUM`.
    pub fn apply_env_overrides(&mut self) {
        for entry in SCHEMA {
            let var_name = env_var_name(entry.key);
            if let Ok(value) = std::env::var(&var_name) {
                self.values.insert(entry.key.to_string(), value);
            }
        }
    }

    /// Validates a prospective write against the schema and stages it,
    /// returning the previous value (if any) for the caller to audit-log.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<Option<String>, StateError> {
        let schema = lookup(key).ok_or_else(|| StateError::UnknownKey(key.to_string()))?;
        let value = value.into();
        validate(key, schema.kind, &value)?;
        Ok(self.values.insert(key.to_string(), value))
    }

    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_raw(key).map(|s| s.to_string())
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get_raw(key).and_then(|s| s.parse().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_raw(key).and_then(|s| match s {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        })
    }

    pub fn get_duration(&self, key: &str) -> Option<Duration> {
        self.get_int(key).map(|secs| Duration::from_secs(secs.max(0) as u64))
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get_raw(key).filter(|s| !s.is_empty()).map(PathBuf::from)
    }

    pub fn get_enum<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get_raw(key).and_then(|s| s.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses either shape, warning (not failing) on keys the schema does
    /// not recognize.
    pub fn load_str(text: &str) -> Result<Self, StateError> {
        if looks_like_yaml(text) {
            Self::load_yaml_str(text)
        } else {
            Ok(Self::load_flat_str(text))
        }
    }

    pub fn load_yaml_str(text: &str) -> Result<Self, StateError> {
        let doc: serde_yaml::Value = serde_yaml::from_str(text)?;
        let mut values = BTreeMap::new();
        flatten_yaml("", &doc, &mut values);
        warn_unknown_keys(&values);
        Ok(Self { values })
    }

    pub fn load_flat_str(text: &str) -> Self {
        let mut values = BTreeMap::new();
        for line in text.lines() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, raw_value)) = line.split_once('=') else { continue };
            let key = key.trim();
            let value = unquote(raw_value.trim());
            values.insert(key.to_string(), value);
        }
        warn_unknown_keys(&values);
        Self { values }
    }

    /// Renders the canonical YAML form. Writes always target this format
    /// regardless of which shape was loaded (spec.md §6 "Config file").
    pub fn to_yaml_string(&self) -> Result<String, StateError> {
        let map: BTreeMap<&str, &str> =
            self.values.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        Ok(serde_yaml::to_string(&map)?)
    }

    /// Atomic write: temp file in the same directory, then rename.
    pub fn write_atomic(&self, path: &Path) -> Result<(), StateError> {
        let yaml = self.to_yaml_string()?;
        let tmp_path = path.with_extension("yaml.tmp");
        std::fs::write(&tmp_path, yaml)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

fn env_var_name(key: &str) -> String {
    format!("CHECKPOINT_{}", key.to_uppercase().replace('.', "__"))
}

fn validate(key: &str, kind: ValueKind, value: &str) -> Result<(), StateError> {
    match kind {
        ValueKind::Int | ValueKind::Duration => value
            .parse::<i64>()
            .map(|_| ())
            .map_err(|_| StateError::TypeMismatch { key: key.to_string(), expected: "int" }),
        ValueKind::Bool => match value {
            "true" | "false" | "1" | "0" | "yes" | "no" => Ok(()),
            _ => Err(StateError::TypeMismatch { key: key.to_string(), expected: "bool" }),
        },
        ValueKind::String | ValueKind::Path | ValueKind::Enum => Ok(()),
    }
}

fn looks_like_yaml(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| !line.contains('=') || line.trim_end().ends_with(':'))
        .unwrap_or(false)
}

fn flatten_yaml(prefix: &str, value: &serde_yaml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let Some(k) = k.as_str() else { continue };
                let key = if prefix.is_empty() { k.to_string() } else { format!("{prefix}.{k}") };
                flatten_yaml(&key, v, out);
            }
        }
        serde_yaml::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        serde_yaml::Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        serde_yaml::Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
        serde_yaml::Value::Null => {}
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Tagged(_) => {
            out.insert(prefix.to_string(), serde_yaml::to_string(value).unwrap_or_default());
        }
    }
}

fn warn_unknown_keys(values: &BTreeMap<String, String>) {
    for key in values.keys() {
        if lookup(key).is_none() {
            tracing::warn!(%key, "unrecognized config key");
        }
    }
}

fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut quote_char = '"';
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' | '\'' if !in_quotes => {
                in_quotes = true;
                quote_char = ch;
            }
            c if in_quotes && c == quote_char => in_quotes = false,
            '#' if !in_quotes => return &line[..idx],
            _ => {}
        }
    }
    line
}

fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && ((bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\''))
    {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
