use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::edit::Order;
use crate::journal::Layout;

pub(crate) const DEFAULT_JOURNAL_REL: &str = ".bli";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) journal_root: Option<String>,
    #[serde(default)]
    pub(crate) layout: Layout,
    #[serde(default)]
    pub(crate) order: Order,
    #[serde(default)]
    pub(crate) log_path: Option<String>,
}

impl Config {
    /// Journal root with a leading `~/` resolved against `home`.
    pub(crate) fn journal_root(&self, home: &Path) -> PathBuf {
        match self.journal_root.as_deref() {
            Some(raw) => expand_home(raw, home),
            None => home.join(DEFAULT_JOURNAL_REL),
        }
    }

    pub(crate) fn log_path(&self, home: &Path) -> Option<PathBuf> {
        self.log_path.as_deref().map(|raw| expand_home(raw, home))
    }
}

#[derive(Debug)]
pub(crate) struct LoadedConfig {
    pub(crate) config: Config,
    pub(crate) warnings: Vec<String>,
}

pub(crate) fn expand_home(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        return home.to_path_buf();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(raw),
    }
}

pub(crate) fn load_config(path: &Path) -> Result<LoadedConfig, String> {
    let content = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read config {}: {}", path.display(), err))?;
    let value: Value = serde_yaml::from_str(&content)
        .map_err(|err| format!("Failed to parse config {}: {}", path.display(), err))?;
    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        Value::Null => Mapping::new(),
        _ => return Err(format!("Config {} must be a YAML mapping", path.display())),
    };

    let warnings = unknown_top_level_keys(&mapping);
    emit_unknown_key_warnings(&warnings);
    validate_fields(&mapping)?;

    let config: Config = serde_yaml::from_value(Value::Mapping(mapping))
        .map_err(|err| format!("Failed to parse config {}: {}", path.display(), err))?;

    Ok(LoadedConfig { config, warnings })
}

fn emit_unknown_key_warnings(keys: &[String]) {
    for key in keys {
        eprintln!("Warning: unknown config key: {}", key);
    }
}

fn unknown_top_level_keys(mapping: &Mapping) -> Vec<String> {
    let allowed = ["journal_root", "layout", "order", "log_path"];

    mapping
        .keys()
        .filter_map(|key| key.as_str().map(|value| value.to_string()))
        .filter(|key| !allowed.contains(&key.as_str()))
        .collect()
}

fn validate_fields(mapping: &Mapping) -> Result<(), String> {
    optional_non_empty_string(mapping, "journal_root")?;
    optional_non_empty_string(mapping, "log_path")?;
    optional_choice(mapping, "layout", &["flat", "grouped"])?;
    optional_choice(mapping, "order", &["insertion", "status"])?;
    Ok(())
}

fn optional_non_empty_string<'a>(
    mapping: &'a Mapping,
    key_name: &str,
) -> Result<Option<&'a str>, String> {
    let key = Value::String(key_name.to_string());
    match mapping.get(&key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => {
            if value.trim().is_empty() {
                Err(format!("{} must not be empty", key_name))
            } else {
                Ok(Some(value.as_str()))
            }
        }
        Some(_) => Err(format!("{} must be a string", key_name)),
    }
}

fn optional_choice(mapping: &Mapping, key_name: &str, choices: &[&str]) -> Result<(), String> {
    let Some(value) = optional_non_empty_string(mapping, key_name)? else {
        return Ok(());
    };
    if choices.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{} must be one of {} (got {:?})",
            key_name,
            choices.join(", "),
            value
        ))
    }
}
